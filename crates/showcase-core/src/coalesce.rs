//! Resize stream coalescer.
//!
//! Collapses a burst of viewport resize events into a single layout pass.
//! Time is supplied by the host (milliseconds on any monotonic clock), so
//! identical event sequences always yield identical decisions.
//!
//! # Decision rule
//!
//! 1. No pending event: [`CoalesceAction::None`].
//! 2. Time since the first pending event ≥ `hard_deadline_ms`: apply.
//! 3. Time since the last event ≥ `debounce_ms`: apply.
//! 4. Otherwise wait; the action says how long until the next decision point.
//!
//! # Failure modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `hard_deadline_ms = 0` | Apply immediately |
//! | Clock goes backwards | Elapsed time saturates at zero |

use tracing::trace;

use crate::config::ShowcaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalescerConfig {
    /// Quiet period after the last event before applying.
    pub debounce_ms: u64,
    /// Apply no later than this after the first pending event.
    pub hard_deadline_ms: u64,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self::from(&ShowcaseConfig::default())
    }
}

impl From<&ShowcaseConfig> for CoalescerConfig {
    fn from(config: &ShowcaseConfig) -> Self {
        Self {
            debounce_ms: config.resize_debounce_ms,
            hard_deadline_ms: config.resize_deadline_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalesceAction {
    /// Nothing pending.
    None,
    /// Events pending; ask again in `retry_in_ms`.
    Wait { retry_in_ms: u64 },
    /// Run the layout pass now.
    Apply { coalesced: u32 },
}

#[derive(Debug, Clone)]
pub struct ResizeCoalescer {
    config: CoalescerConfig,
    first_pending_ms: Option<u64>,
    last_event_ms: u64,
    pending_events: u32,
    applied_passes: u64,
}

impl ResizeCoalescer {
    #[must_use]
    pub fn new(config: CoalescerConfig) -> Self {
        Self {
            config,
            first_pending_ms: None,
            last_event_ms: 0,
            pending_events: 0,
            applied_passes: 0,
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.first_pending_ms.is_some()
    }

    /// Total passes applied so far.
    #[must_use]
    pub fn applied_passes(&self) -> u64 {
        self.applied_passes
    }

    /// Record a resize event at `now_ms` and decide.
    pub fn handle_event(&mut self, now_ms: u64) -> CoalesceAction {
        if self.first_pending_ms.is_none() {
            self.first_pending_ms = Some(now_ms);
        }
        self.last_event_ms = now_ms;
        self.pending_events = self.pending_events.saturating_add(1);
        self.tick(now_ms)
    }

    /// Decide without a new event (timer callback).
    pub fn tick(&mut self, now_ms: u64) -> CoalesceAction {
        let Some(first) = self.first_pending_ms else {
            return CoalesceAction::None;
        };
        let since_first = now_ms.saturating_sub(first);
        let since_last = now_ms.saturating_sub(self.last_event_ms);

        if since_first >= self.config.hard_deadline_ms || since_last >= self.config.debounce_ms {
            let coalesced = self.pending_events;
            self.first_pending_ms = None;
            self.pending_events = 0;
            self.applied_passes += 1;
            trace!(coalesced, since_first, since_last, "resize pass applied");
            return CoalesceAction::Apply { coalesced };
        }

        let until_quiet = self.config.debounce_ms - since_last;
        let until_deadline = self.config.hard_deadline_ms - since_first;
        CoalesceAction::Wait {
            retry_in_ms: until_quiet.min(until_deadline),
        }
    }
}
