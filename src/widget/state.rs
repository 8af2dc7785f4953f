//! What the dropdown shows and what the widget remembers

use crate::backend::types::SearchResult;

/// A rendered result row. Keeps its position and url so hover, click and
/// keyboard activation all resolve to the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub result: SearchResult,
}

impl Row {
    pub fn url(&self) -> &str {
        &self.result.url
    }
}

/// Content of the dropdown panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    /// Input is empty
    #[default]
    Prompt,
    Searching {
        query: String,
    },
    /// Fetch failed or nothing matched
    NoMatches {
        query: String,
    },
    Results(Vec<Row>),
}

impl Panel {
    pub fn results(results: Vec<SearchResult>) -> Self {
        Panel::Results(
            results
                .into_iter()
                .enumerate()
                .map(|(index, result)| Row { index, result })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            Panel::Results(rows) => rows,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Panel::Prompt => Some("What is your query?"),
            Panel::Searching { .. } => Some("Searching..."),
            Panel::NoMatches { .. } => Some("No matches found for your query"),
            Panel::Results(_) => None,
        }
    }
}

/// Outcome of the most recent successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSearch {
    pub query: String,
    pub results: Vec<SearchResult>,
}
