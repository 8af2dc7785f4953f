//! Result source: where the dataset comes from and how it is filtered

pub mod api;
pub mod filter;
pub mod types;

use std::path::PathBuf;

use thiserror::Error;

/// Anything that keeps a fetch from producing a result set.
///
/// The widget shows every variant the same way; the distinction only
/// reaches the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("source answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("source reported success=false")]
    Unsuccessful,

    #[error("payload has no best_matches collection")]
    MissingMatches,
}

/// A source string that is neither a usable URL nor a path
#[derive(Debug, Error)]
#[error("invalid source `{input}`: {reason}")]
pub struct InvalidSource {
    pub input: String,
    pub reason: String,
}
