//! Per-card stylesheet loading
//!
//! Each card loads the typesetter's stylesheet into its own isolated root.
//! Loading is asynchronous: the primary source is tried first, a failure
//! swaps to the fallback exactly once, and a second failure or a timeout
//! gives up so the formula still renders (unstyled) instead of waiting
//! forever.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetSource {
    Primary,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "source", rename_all = "lowercase")]
pub enum SheetState {
    Loading(SheetSource),
    Ready(SheetSource),
    /// Both sources failed or timed out
    Unavailable,
}

/// What the host page must do after a load event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetTransition {
    /// Nothing further to load
    Settled,
    /// Point the `<link>` at this href and wait again
    Retry(String),
    /// The event belonged to a superseded attempt
    Ignored,
}

/// Identifies one load attempt; events carrying an older ticket are stale
pub type AttemptTicket = u32;

#[derive(Clone, Debug)]
pub struct StylesheetLoader {
    primary: String,
    fallback: String,
    state: SheetState,
    attempt: AttemptTicket,
}

impl StylesheetLoader {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
            state: SheetState::Loading(SheetSource::Primary),
            attempt: 0,
        }
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn attempt(&self) -> AttemptTicket {
        self.attempt
    }

    /// Href the `<link>` should currently point at
    pub fn href(&self) -> &str {
        match self.state {
            SheetState::Loading(SheetSource::Fallback) | SheetState::Ready(SheetSource::Fallback) => {
                &self.fallback
            }
            _ => &self.primary,
        }
    }

    /// Loaded, or given up: rendering may proceed either way
    pub fn is_settled(&self) -> bool {
        !matches!(self.state, SheetState::Loading(_))
    }

    pub fn on_load(&mut self, ticket: AttemptTicket) -> SheetTransition {
        match self.state {
            SheetState::Loading(source) if ticket == self.attempt => {
                log::debug!("stylesheet ready from {:?} source", source);
                self.state = SheetState::Ready(source);
                SheetTransition::Settled
            }
            _ => SheetTransition::Ignored,
        }
    }

    pub fn on_error(&mut self, ticket: AttemptTicket) -> SheetTransition {
        if ticket != self.attempt {
            return SheetTransition::Ignored;
        }
        match self.state {
            SheetState::Loading(SheetSource::Primary) => {
                log::warn!(
                    "failed to load stylesheet from {}, trying {}",
                    self.primary,
                    self.fallback
                );
                self.state = SheetState::Loading(SheetSource::Fallback);
                self.attempt += 1;
                SheetTransition::Retry(self.fallback.clone())
            }
            SheetState::Loading(SheetSource::Fallback) => {
                log::warn!("fallback stylesheet {} failed; rendering unstyled", self.fallback);
                self.state = SheetState::Unavailable;
                SheetTransition::Settled
            }
            _ => SheetTransition::Ignored,
        }
    }

    /// The bounded wait for the current attempt elapsed
    pub fn on_timeout(&mut self, ticket: AttemptTicket) -> SheetTransition {
        if ticket != self.attempt || self.is_settled() {
            return SheetTransition::Ignored;
        }
        log::warn!("stylesheet {} timed out; rendering unstyled", self.href());
        self.state = SheetState::Unavailable;
        SheetTransition::Settled
    }
}
