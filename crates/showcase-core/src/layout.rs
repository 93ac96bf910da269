//! Row-height normalization for the card grid.
//!
//! Cards in a responsive grid flow left-to-right, top-to-bottom, and their
//! titles and excerpts vary in length. To line cards up, every card in a
//! visual row gets the row's tallest title height and tallest excerpt height
//! as minimum heights.
//!
//! Rows are detected from measured top offsets, not from a column count: a
//! card joins the current row when its top is within `tolerance` pixels of
//! the row's first card, otherwise it opens a new row. The tolerance absorbs
//! sub-pixel rounding.
//!
//! # Invariants
//!
//! - Heights computed for a row depend only on that row's cards.
//! - Single-card rows are left alone.
//! - A pass always starts by clearing previously forced heights, so repeated
//!   passes converge on natural content height.

use std::ops::Range;

use tracing::trace;

/// Measured geometry of one visible card (after forced heights were cleared).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMetrics {
    /// Top offset of the card in page coordinates.
    pub top: f64,
    pub title_height: f64,
    pub excerpt_height: f64,
}

impl CardMetrics {
    #[must_use]
    pub const fn new(top: f64, title_height: f64, excerpt_height: f64) -> Self {
        Self {
            top,
            title_height,
            excerpt_height,
        }
    }
}

/// Minimum heights applied to every card of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHeights {
    pub title: f64,
    pub excerpt: f64,
}

/// Result of planning one normalization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    /// Card index ranges, one per detected row, in order.
    pub rows: Vec<Range<usize>>,
    /// Per card: the heights to force, or `None` for single-card rows.
    pub heights: Vec<Option<RowHeights>>,
}

impl LayoutPlan {
    /// Number of cards that receive forced heights.
    #[must_use]
    pub fn normalized_cards(&self) -> usize {
        self.heights.iter().filter(|h| h.is_some()).count()
    }
}

/// Group consecutive cards into rows by top offset.
#[must_use]
pub fn group_rows<I>(tops: I, tolerance: f64) -> Vec<Range<usize>>
where
    I: IntoIterator<Item = f64>,
{
    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut row_top: Option<f64> = None;
    let mut count = 0;

    for (idx, top) in tops.into_iter().enumerate() {
        count = idx + 1;
        match row_top {
            Some(current) if (top - current).abs() < tolerance => {}
            Some(_) => {
                rows.push(row_start..idx);
                row_start = idx;
                row_top = Some(top);
            }
            None => row_top = Some(top),
        }
    }
    if count > row_start {
        rows.push(row_start..count);
    }
    rows
}

/// Plan forced heights for `cards` (visible cards only, in grid order).
#[must_use]
pub fn plan_layout(cards: &[CardMetrics], tolerance: f64) -> LayoutPlan {
    let rows = group_rows(cards.iter().map(|card| card.top), tolerance);
    let mut heights = vec![None; cards.len()];

    for row in &rows {
        if row.len() < 2 {
            continue;
        }
        let members = &cards[row.clone()];
        let target = RowHeights {
            title: members.iter().map(|c| c.title_height).fold(0.0, f64::max),
            excerpt: members.iter().map(|c| c.excerpt_height).fold(0.0, f64::max),
        };
        for slot in &mut heights[row.clone()] {
            *slot = Some(target);
        }
    }

    LayoutPlan { rows, heights }
}

/// Host side of a normalization pass.
pub trait LayoutSurface {
    /// Handle to a card element.
    type Card;

    /// Cards currently visible (not hidden by filtering), in grid order.
    fn visible_cards(&self) -> Vec<Self::Card>;

    /// Remove forced minimum heights from the card's title and excerpt.
    fn clear_min_heights(&mut self, card: &Self::Card);

    /// Measure the card. `None` if it has no measurable layout (yet).
    fn measure(&self, card: &Self::Card) -> Option<CardMetrics>;

    /// Force minimum heights on the card's title and excerpt.
    fn apply_min_heights(&mut self, card: &Self::Card, heights: RowHeights);
}

/// Run a full pass against `surface`: clear, measure, group, apply.
/// Returns the plan that was applied.
pub fn normalize<S: LayoutSurface>(surface: &mut S, tolerance: f64) -> LayoutPlan {
    let cards = surface.visible_cards();
    for card in &cards {
        surface.clear_min_heights(card);
    }

    let mut measured = Vec::with_capacity(cards.len());
    let mut metrics = Vec::with_capacity(cards.len());
    for card in cards {
        if let Some(m) = surface.measure(&card) {
            measured.push(card);
            metrics.push(m);
        }
    }

    let plan = plan_layout(&metrics, tolerance);
    for (card, heights) in measured.iter().zip(&plan.heights) {
        if let Some(heights) = heights {
            surface.apply_min_heights(card, *heights);
        }
    }
    trace!(
        cards = metrics.len(),
        rows = plan.rows.len(),
        normalized = plan.normalized_cards(),
        "layout normalized"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_top_with_tolerance() {
        let rows = group_rows([0.0, 0.4, 1.2, 300.0, 300.3, 600.0], 2.0);
        assert_eq!(rows, vec![0..3, 3..5, 5..6]);
    }

    #[test]
    fn compares_against_row_anchor_not_previous_card() {
        // Each card drifts 1.5px from its predecessor; the third is 3px from
        // the row's first card and starts a new row.
        let rows = group_rows([0.0, 1.5, 3.0], 2.0);
        assert_eq!(rows, vec![0..2, 2..3]);
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(group_rows(std::iter::empty(), 5.0).is_empty());
        assert_eq!(plan_layout(&[], 5.0), LayoutPlan::default());
    }

    #[test]
    fn plan_uses_row_maxima_independently() {
        let cards = [
            CardMetrics::new(0.0, 50.0, 80.0),
            CardMetrics::new(0.0, 70.0, 60.0),
            CardMetrics::new(0.0, 60.0, 90.0),
        ];
        let plan = plan_layout(&cards, 5.0);
        let expected = Some(RowHeights {
            title: 70.0,
            excerpt: 90.0,
        });
        assert_eq!(plan.heights, vec![expected; 3]);
        assert_eq!(plan.normalized_cards(), 3);
    }

    #[test]
    fn single_card_rows_are_skipped() {
        let cards = [
            CardMetrics::new(0.0, 50.0, 80.0),
            CardMetrics::new(0.0, 70.0, 60.0),
            CardMetrics::new(400.0, 90.0, 90.0),
        ];
        let plan = plan_layout(&cards, 5.0);
        assert_eq!(plan.rows, vec![0..2, 2..3]);
        assert_eq!(plan.heights[2], None);
        assert_eq!(plan.normalized_cards(), 2);
    }

    struct FakeSurface {
        cards: Vec<(bool, Option<CardMetrics>)>,
        cleared: Vec<usize>,
        applied: Vec<(usize, RowHeights)>,
    }

    impl LayoutSurface for FakeSurface {
        type Card = usize;

        fn visible_cards(&self) -> Vec<usize> {
            (0..self.cards.len()).filter(|&i| self.cards[i].0).collect()
        }

        fn clear_min_heights(&mut self, card: &usize) {
            self.cleared.push(*card);
        }

        fn measure(&self, card: &usize) -> Option<CardMetrics> {
            self.cards[*card].1
        }

        fn apply_min_heights(&mut self, card: &usize, heights: RowHeights) {
            self.applied.push((*card, heights));
        }
    }

    #[test]
    fn normalize_skips_hidden_and_unmeasurable_cards() {
        let mut surface = FakeSurface {
            cards: vec![
                (true, Some(CardMetrics::new(0.0, 10.0, 20.0))),
                (false, Some(CardMetrics::new(0.0, 99.0, 99.0))),
                (true, None),
                (true, Some(CardMetrics::new(0.5, 30.0, 5.0))),
            ],
            cleared: Vec::new(),
            applied: Vec::new(),
        };
        let plan = normalize(&mut surface, 5.0);
        assert_eq!(surface.cleared, vec![0, 2, 3]);
        assert_eq!(plan.rows, vec![0..2]);
        let target = RowHeights {
            title: 30.0,
            excerpt: 20.0,
        };
        assert_eq!(surface.applied, vec![(0, target), (3, target)]);
    }
}
