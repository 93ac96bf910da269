//! Sentinel-driven infinite scroll.
//!
//! Two phases, mirroring `ShowcaseState::is_loading`:
//!
//! ```text
//!   Idle ──(sentinel visible ∧ has_more)──▶ Loading ──(settled)──▶ Idle
//! ```
//!
//! While loading, visibility events are ignored. Once `has_more` is false no
//! transition happens until a filter change resets the cursor.

use std::time::Duration;

use tracing::trace;

use crate::config::ShowcaseConfig;
use crate::state::{AdvanceTicket, ShowcaseState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Idle,
    Loading,
}

/// Outcome of a sentinel visibility event.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadDecision {
    /// A page was appended to the displayed set; the host must mount the
    /// ticket's range and settle it after the configured delay.
    Advance(AdvanceTicket),
    /// The sentinel left the lookahead area.
    NotVisible,
    /// An advance is already in flight.
    Busy,
    /// Every filtered record is displayed.
    Exhausted,
}

/// Observer configuration and transition rules for the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollLoader {
    margin_px: f64,
    settle_delay: Duration,
}

impl Default for ScrollLoader {
    fn default() -> Self {
        Self::from_config(&ShowcaseConfig::default())
    }
}

impl ScrollLoader {
    #[must_use]
    pub fn new(margin_px: f64, settle_delay: Duration) -> Self {
        Self {
            margin_px,
            settle_delay,
        }
    }

    #[must_use]
    pub fn from_config(config: &ShowcaseConfig) -> Self {
        Self::new(
            config.scroll_margin_px,
            Duration::from_millis(config.load_settle_ms),
        )
    }

    /// CSS margin string for the visibility observer (e.g. `"200px"`).
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("{}px", self.margin_px)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    #[must_use]
    pub fn phase(state: &ShowcaseState) -> LoaderPhase {
        if state.is_loading() {
            LoaderPhase::Loading
        } else {
            LoaderPhase::Idle
        }
    }

    /// React to the sentinel entering or leaving the lookahead area.
    pub fn on_sentinel(&self, state: &mut ShowcaseState, visible: bool) -> LoadDecision {
        let decision = if !visible {
            LoadDecision::NotVisible
        } else if state.is_loading() {
            LoadDecision::Busy
        } else {
            match state.begin_advance() {
                Some(ticket) => LoadDecision::Advance(ticket),
                None => LoadDecision::Exhausted,
            }
        };
        trace!(visible, ?decision, "sentinel event");
        decision
    }

    /// Loading → Idle once the appended cards have settled.
    pub fn settle(&self, state: &mut ShowcaseState, ticket: AdvanceTicket) -> LoaderPhase {
        state.finish_advance(ticket);
        Self::phase(state)
    }
}
