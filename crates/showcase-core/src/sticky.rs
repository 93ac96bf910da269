//! Sticky filter bar.
//!
//! Independent of the record pipeline. On narrow viewports (width at or below
//! the breakpoint) the filter bar sticks to the top of the viewport once the
//! page has scrolled past the bar's original offset; a placeholder of equal
//! height keeps the content below from jumping. Crossing back above the
//! breakpoint tears the behavior down entirely.
//!
//! Horizontally scrollable filter lists additionally report whether they are
//! scrolled to the start and/or the end so the host can fade the edges.
//!
//! The machine is pure: the host feeds it measurements and applies the
//! returned [`StickyTransition`]s.

use tracing::debug;

/// Slack (px) when deciding whether a horizontal list is at an edge.
const EDGE_TOLERANCE_PX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickyTransition {
    /// Viewport went at or below the breakpoint: install scroll tracking.
    Activated,
    /// Viewport went above the breakpoint: remove scroll tracking, and the
    /// stuck state and placeholder if `was_stuck`.
    Deactivated { was_stuck: bool },
    /// Apply the stuck state and insert a placeholder of this height.
    Stuck { placeholder_height: f64 },
    /// Remove the stuck state and the placeholder.
    Unstuck,
}

/// Horizontal scroll indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeState {
    pub at_start: bool,
    pub at_end: bool,
}

impl Default for EdgeState {
    fn default() -> Self {
        Self {
            at_start: true,
            at_end: true,
        }
    }
}

impl EdgeState {
    /// Derive edge flags from a scroll container's geometry. A list that
    /// does not overflow is at both edges.
    #[must_use]
    pub fn from_scroll(scroll_left: f64, scroll_width: f64, client_width: f64) -> Self {
        let max_scroll = (scroll_width - client_width).max(0.0);
        Self {
            at_start: scroll_left <= EDGE_TOLERANCE_PX,
            at_end: scroll_left >= max_scroll - EDGE_TOLERANCE_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StickyFilterBar {
    breakpoint_px: f64,
    active: bool,
    stuck: bool,
    origin_top: f64,
    bar_height: f64,
    /// Last reported edge state; `None` until the first measurement.
    edges: Option<EdgeState>,
}

impl StickyFilterBar {
    #[must_use]
    pub fn new(breakpoint_px: f64) -> Self {
        Self {
            breakpoint_px,
            active: false,
            stuck: false,
            origin_top: 0.0,
            bar_height: 0.0,
            edges: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Document offset the bar scrolls away from.
    #[must_use]
    pub fn origin_top(&self) -> f64 {
        self.origin_top
    }

    /// Last reported edge state, if any was measured since activation.
    #[must_use]
    pub fn edges(&self) -> Option<EdgeState> {
        self.edges
    }

    /// Feed viewport width and the bar's in-flow geometry. While stuck, the
    /// host must measure the placeholder instead of the bar itself.
    pub fn on_viewport(
        &mut self,
        viewport_width: f64,
        anchor_top: f64,
        bar_height: f64,
    ) -> Option<StickyTransition> {
        let narrow = viewport_width <= self.breakpoint_px;
        if !narrow {
            if !self.active {
                return None;
            }
            let was_stuck = self.stuck;
            self.active = false;
            self.stuck = false;
            self.edges = None;
            debug!(viewport_width, was_stuck, "sticky filter bar deactivated");
            return Some(StickyTransition::Deactivated { was_stuck });
        }

        self.origin_top = anchor_top;
        self.bar_height = bar_height;
        if self.active {
            return None;
        }
        self.active = true;
        debug!(viewport_width, anchor_top, "sticky filter bar activated");
        Some(StickyTransition::Activated)
    }

    /// Feed the page's vertical scroll position.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<StickyTransition> {
        if !self.active {
            return None;
        }
        let past = scroll_y > self.origin_top;
        match (past, self.stuck) {
            (true, false) => {
                self.stuck = true;
                Some(StickyTransition::Stuck {
                    placeholder_height: self.bar_height,
                })
            }
            (false, true) => {
                self.stuck = false;
                Some(StickyTransition::Unstuck)
            }
            _ => None,
        }
    }

    /// Feed the filter list's horizontal scroll geometry. Returns the edge
    /// state on the first measurement and whenever it changes afterwards.
    pub fn on_horizontal_scroll(
        &mut self,
        scroll_left: f64,
        scroll_width: f64,
        client_width: f64,
    ) -> Option<EdgeState> {
        let edges = EdgeState::from_scroll(scroll_left, scroll_width, client_width);
        if self.edges == Some(edges) {
            return None;
        }
        self.edges = Some(edges);
        Some(edges)
    }

    /// Forget everything, as on unmount. Returns the teardown transition if
    /// the bar was active.
    pub fn reset(&mut self) -> Option<StickyTransition> {
        let was_active = self.active;
        let was_stuck = self.stuck;
        *self = Self::new(self.breakpoint_px);
        was_active.then_some(StickyTransition::Deactivated { was_stuck })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_viewport_never_activates() {
        let mut bar = StickyFilterBar::new(782.0);
        assert_eq!(bar.on_viewport(1024.0, 300.0, 48.0), None);
        assert_eq!(bar.on_scroll(5000.0), None);
        assert!(!bar.is_stuck());
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let mut bar = StickyFilterBar::new(782.0);
        assert_eq!(
            bar.on_viewport(782.0, 300.0, 48.0),
            Some(StickyTransition::Activated)
        );
        assert_eq!(bar.on_viewport(700.0, 310.0, 48.0), None);
        assert_eq!(bar.origin_top(), 310.0);
    }

    #[test]
    fn sticks_and_unsticks_around_origin() {
        let mut bar = StickyFilterBar::new(782.0);
        bar.on_viewport(400.0, 300.0, 48.0);
        assert_eq!(bar.on_scroll(300.0), None);
        assert_eq!(
            bar.on_scroll(301.0),
            Some(StickyTransition::Stuck {
                placeholder_height: 48.0
            })
        );
        assert_eq!(bar.on_scroll(900.0), None);
        assert_eq!(bar.on_scroll(10.0), Some(StickyTransition::Unstuck));
    }

    #[test]
    fn widening_tears_down_stuck_bar() {
        let mut bar = StickyFilterBar::new(782.0);
        bar.on_viewport(400.0, 300.0, 48.0);
        bar.on_scroll(500.0);
        assert_eq!(
            bar.on_viewport(1200.0, 300.0, 48.0),
            Some(StickyTransition::Deactivated { was_stuck: true })
        );
        assert!(!bar.is_active());
        assert!(!bar.is_stuck());
        assert_eq!(bar.on_scroll(500.0), None);
    }

    #[test]
    fn edge_state_tracks_horizontal_scroll() {
        let mut bar = StickyFilterBar::new(782.0);
        bar.on_horizontal_scroll(0.0, 300.0, 300.0);
        assert_eq!(
            bar.on_horizontal_scroll(0.0, 600.0, 300.0),
            Some(EdgeState {
                at_start: true,
                at_end: false
            })
        );
        assert_eq!(
            bar.on_horizontal_scroll(150.0, 600.0, 300.0),
            Some(EdgeState {
                at_start: false,
                at_end: false
            })
        );
        assert_eq!(
            bar.on_horizontal_scroll(299.5, 600.0, 300.0),
            Some(EdgeState {
                at_start: false,
                at_end: true
            })
        );
    }

    #[test]
    fn first_edge_measurement_always_reports() {
        let mut bar = StickyFilterBar::new(782.0);
        bar.on_viewport(400.0, 300.0, 48.0);
        let both = EdgeState {
            at_start: true,
            at_end: true,
        };
        assert_eq!(bar.on_horizontal_scroll(0.0, 300.0, 300.0), Some(both));
        assert_eq!(bar.on_horizontal_scroll(0.0, 300.0, 300.0), None);
        assert_eq!(bar.edges(), Some(both));
    }

    #[test]
    fn teardown_forgets_edge_state() {
        let mut bar = StickyFilterBar::new(782.0);
        bar.on_viewport(400.0, 300.0, 48.0);
        bar.on_horizontal_scroll(0.0, 600.0, 300.0);
        bar.on_viewport(1200.0, 300.0, 48.0);
        assert_eq!(bar.edges(), None);

        bar.on_viewport(400.0, 300.0, 48.0);
        assert!(bar.on_horizontal_scroll(0.0, 600.0, 300.0).is_some());
        bar.reset();
        assert_eq!(bar.edges(), None);
        assert!(bar.on_horizontal_scroll(0.0, 600.0, 300.0).is_some());
    }

    #[test]
    fn reset_reports_teardown_only_when_active() {
        let mut bar = StickyFilterBar::new(782.0);
        assert_eq!(bar.reset(), None);
        bar.on_viewport(400.0, 300.0, 48.0);
        assert_eq!(
            bar.reset(),
            Some(StickyTransition::Deactivated { was_stuck: false })
        );
    }
}
