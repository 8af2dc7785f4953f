//! Search widget core
//!
//! A headless state machine that turns input, focus, pointer and keyboard
//! events into dropdown state. It performs no I/O: every side effect
//! (timers, fetches, opening links, dropping focus) is returned as an
//! [`Effect`] for the shell to carry out, and results come back in as
//! [`Input`]s.
//!
//! Timers and fetches are tagged with ids. A timer that is no longer
//! pending is ignored, and a response only renders if it answers the latest
//! request and the input still holds the text it was issued for.

pub mod selection;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

pub use selection::Selection;
pub use state::{LastSearch, Panel, Row};

use crate::backend::filter::filter_matches;
use crate::backend::types::SearchResult;
use crate::backend::FetchError;

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Tag carried by a fetch and its response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Keys the widget reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone)]
pub enum Input {
    TextChanged(String),
    Focused,
    Blurred,
    OutsideClick,
    Key(Key),
    RowHovered(usize),
    RowClicked(usize),
    TimerFired(TimerId),
    FetchCompleted {
        request: RequestId,
        outcome: Result<Vec<SearchResult>, Arc<FetchError>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartTimer { id: TimerId, delay: Duration },
    CancelTimer(TimerId),
    /// Fetch the full dataset; the response must come back as
    /// [`Input::FetchCompleted`] with the same `request`.
    Fetch { request: RequestId, query: String },
    OpenUrl(String),
    ReleaseFocus,
}

/// Delays used by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period after the last keystroke before searching
    pub debounce: Duration,
    /// How long a blur waits before hiding, so a row click still lands
    pub blur_grace: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(200),
        }
    }
}

#[derive(Debug)]
struct PendingSearch {
    timer: TimerId,
    query: String,
}

#[derive(Debug)]
struct InFlight {
    request: RequestId,
    query: String,
}

#[derive(Debug)]
pub struct SearchWidget {
    timings: Timings,
    text: String,
    focused: bool,
    last_search: Option<LastSearch>,
    panel: Panel,
    selection: Selection,
    dropdown_visible: bool,
    pending_search: Option<PendingSearch>,
    pending_hide: Option<TimerId>,
    in_flight: Option<InFlight>,
    next_timer: u64,
    next_request: u64,
}

impl Default for SearchWidget {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

impl SearchWidget {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            text: String::new(),
            focused: false,
            last_search: None,
            panel: Panel::Prompt,
            selection: Selection::none(),
            dropdown_visible: false,
            pending_search: None,
            pending_hide: None,
            in_flight: None,
            next_timer: 0,
            next_request: 0,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn rows(&self) -> &[Row] {
        self.panel.rows()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection.index()
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[cfg(test)]
    pub fn last_search(&self) -> Option<&LastSearch> {
        self.last_search.as_ref()
    }

    /// Debounce timer currently allowed to fire
    #[cfg(test)]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending_search.as_ref().map(|p| p.timer)
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        let mut effects = Vec::new();

        match input {
            Input::TextChanged(raw) => self.text_changed(&raw, &mut effects),
            Input::Focused => self.focus(&mut effects),
            Input::Blurred => self.blur(&mut effects),
            Input::OutsideClick => self.hide(&mut effects),
            Input::Key(key) => self.key(key, &mut effects),
            Input::RowHovered(index) => {
                if self.dropdown_visible {
                    self.selection.hover(index, self.panel.rows().len());
                }
            }
            Input::RowClicked(index) => self.activate(index, &mut effects),
            Input::TimerFired(id) => self.timer_fired(id, &mut effects),
            Input::FetchCompleted { request, outcome } => self.fetch_completed(request, outcome),
        }

        effects
    }

    /// Cancel everything still pending. The widget is inert afterwards
    /// until new input arrives.
    pub fn teardown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(pending) = self.pending_search.take() {
            effects.push(Effect::CancelTimer(pending.timer));
        }
        if let Some(id) = self.pending_hide.take() {
            effects.push(Effect::CancelTimer(id));
        }
        self.in_flight = None;
        self.dropdown_visible = false;
        self.selection.clear();
        effects
    }

    fn text_changed(&mut self, raw: &str, effects: &mut Vec<Effect>) {
        let query = raw.trim().to_string();
        self.text = query.clone();

        if let Some(pending) = self.pending_search.take() {
            effects.push(Effect::CancelTimer(pending.timer));
        }

        // A fetch for other text can no longer render
        if self.in_flight.as_ref().is_some_and(|f| f.query != query) {
            self.in_flight = None;
        }

        if query.is_empty() {
            self.last_search = None;
            self.show(Panel::Prompt);
            return;
        }

        let timer = self.next_timer_id();
        tracing::debug!("Debouncing search for {:?}", query);
        effects.push(Effect::StartTimer {
            id: timer,
            delay: self.timings.debounce,
        });
        self.pending_search = Some(PendingSearch { timer, query });
    }

    fn focus(&mut self, effects: &mut Vec<Effect>) {
        self.focused = true;
        if let Some(id) = self.pending_hide.take() {
            effects.push(Effect::CancelTimer(id));
        }

        if self.text.is_empty() {
            self.show(Panel::Prompt);
            return;
        }

        if let Some(last) = self.last_search.as_ref().filter(|l| !l.results.is_empty()) {
            let panel = Panel::results(last.results.clone());
            self.show(panel);
            return;
        }

        // Already fetching this text
        if matches!(&self.in_flight, Some(f) if f.query == self.text) {
            self.show(Panel::Searching {
                query: self.text.clone(),
            });
            return;
        }

        let query = self.text.clone();
        self.search(query, effects);
    }

    fn blur(&mut self, effects: &mut Vec<Effect>) {
        self.focused = false;
        if let Some(id) = self.pending_hide.take() {
            effects.push(Effect::CancelTimer(id));
        }
        let id = self.next_timer_id();
        effects.push(Effect::StartTimer {
            id,
            delay: self.timings.blur_grace,
        });
        self.pending_hide = Some(id);
    }

    fn key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        match key {
            Key::ArrowDown => {
                if self.dropdown_visible {
                    self.selection.next(self.panel.rows().len());
                }
            }
            Key::ArrowUp => {
                if self.dropdown_visible {
                    self.selection.previous();
                }
            }
            Key::Enter => {
                if self.dropdown_visible {
                    if let Some(index) = self.selection.index() {
                        self.activate(index, effects);
                    }
                }
            }
            Key::Escape => {
                self.hide(effects);
                self.focused = false;
                effects.push(Effect::ReleaseFocus);
            }
        }
    }

    fn timer_fired(&mut self, id: TimerId, effects: &mut Vec<Effect>) {
        if self.pending_search.as_ref().is_some_and(|p| p.timer == id) {
            if let Some(pending) = self.pending_search.take() {
                self.search(pending.query, effects);
            }
        } else if self.pending_hide == Some(id) {
            self.pending_hide = None;
            self.hide(effects);
        } else {
            tracing::trace!("Ignoring superseded timer {:?}", id);
        }
    }

    fn search(&mut self, query: String, effects: &mut Vec<Effect>) {
        if let Some(pending) = self.pending_search.take() {
            effects.push(Effect::CancelTimer(pending.timer));
        }
        self.show(Panel::Searching {
            query: query.clone(),
        });

        let request = self.next_request_id();
        tracing::info!("Searching for {:?} ({:?})", query, request);
        self.in_flight = Some(InFlight {
            request,
            query: query.clone(),
        });
        effects.push(Effect::Fetch { request, query });
    }

    fn fetch_completed(
        &mut self,
        request: RequestId,
        outcome: Result<Vec<SearchResult>, Arc<FetchError>>,
    ) {
        let query = match self.in_flight.take() {
            Some(in_flight) if in_flight.request == request => in_flight.query,
            current => {
                self.in_flight = current;
                tracing::debug!("Dropping stale response for {:?}", request);
                return;
            }
        };

        match outcome {
            Ok(entries) => {
                let results = filter_matches(&query, &entries);
                tracing::info!(
                    "{} of {} entries match {:?}",
                    results.len(),
                    entries.len(),
                    query
                );
                self.last_search = Some(LastSearch {
                    query: query.clone(),
                    results: results.clone(),
                });
                if results.is_empty() {
                    self.show(Panel::NoMatches { query });
                } else {
                    self.show(Panel::results(results));
                }
            }
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", query, e);
                self.last_search = None;
                self.show(Panel::NoMatches { query });
            }
        }
    }

    fn activate(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Some(row) = self.panel.rows().get(index) else {
            return;
        };
        let url = row.url().to_string();
        tracing::info!("Opening result {}: {}", index, url);
        effects.push(Effect::OpenUrl(url));
        self.hide(effects);
    }

    fn show(&mut self, panel: Panel) {
        self.panel = panel;
        self.selection.clear();
        self.dropdown_visible = true;
    }

    fn hide(&mut self, effects: &mut Vec<Effect>) {
        if let Some(id) = self.pending_hide.take() {
            effects.push(Effect::CancelTimer(id));
        }
        self.dropdown_visible = false;
        self.selection.clear();
    }

    fn next_timer_id(&mut self) -> TimerId {
        self.next_timer += 1;
        TimerId(self.next_timer)
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }
}
