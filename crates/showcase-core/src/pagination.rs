//! Pagination cursor over the filtered record list.
//!
//! The cursor only tracks counts. Which records those counts refer to is the
//! caller's business, which keeps [`PageCursor::reset`] and
//! [`PageCursor::advance`] trivially deterministic.
//!
//! # Invariants
//!
//! - `offset <= total` at all times.
//! - After `reset(total)`, `offset == min(page_size, total)`.
//! - Each successful `advance` grows `offset` by `min(page_size, total - offset)`.
//! - `advance` is a no-op once `offset == total`.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Counts of displayed versus filtered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page_size: NonZeroUsize,
    offset: usize,
    total: usize,
}

impl PageCursor {
    /// Cursor over an empty list.
    #[must_use]
    pub const fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            offset: 0,
            total: 0,
        }
    }

    /// Cursor over `total` records with the first page displayed.
    #[must_use]
    pub fn first_page(page_size: NonZeroUsize, total: usize) -> Self {
        let mut cursor = Self::new(page_size);
        cursor.reset(total);
        cursor
    }

    /// Point the cursor at a new filtered list of `total` records and display
    /// its first page. Returns the displayed range.
    pub fn reset(&mut self, total: usize) -> Range<usize> {
        self.total = total;
        self.offset = self.page_size.get().min(total);
        0..self.offset
    }

    /// Display the next page. Returns the newly displayed range, or `None`
    /// when everything is already displayed.
    pub fn advance(&mut self) -> Option<Range<usize>> {
        if !self.has_more() {
            return None;
        }
        let start = self.offset;
        let end = start.saturating_add(self.page_size.get()).min(self.total);
        self.offset = end;
        Some(start..end)
    }

    #[must_use]
    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Number of displayed records.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of filtered records.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.offset < self.total
    }

    /// Range of displayed records within the filtered list.
    #[must_use]
    pub const fn displayed(&self) -> Range<usize> {
        0..self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn reset_displays_first_page() {
        let mut cursor = PageCursor::new(size(3));
        assert_eq!(cursor.reset(10), 0..3);
        assert_eq!(cursor.offset(), 3);
        assert!(cursor.has_more());
    }

    #[test]
    fn reset_clamps_to_short_lists() {
        let cursor = PageCursor::first_page(size(3), 2);
        assert_eq!(cursor.offset(), 2);
        assert!(!cursor.has_more());
    }

    #[test]
    fn empty_list_has_nothing_to_show() {
        let mut cursor = PageCursor::first_page(size(3), 0);
        assert_eq!(cursor.displayed(), 0..0);
        assert!(!cursor.has_more());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn advance_takes_partial_tail() {
        let mut cursor = PageCursor::first_page(size(3), 7);
        assert_eq!(cursor.advance(), Some(3..6));
        assert_eq!(cursor.advance(), Some(6..7));
        assert_eq!(cursor.offset(), 7);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.offset(), 7);
    }

    #[test]
    fn reset_after_advancing_starts_over() {
        let mut cursor = PageCursor::first_page(size(2), 9);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.offset(), 6);
        assert_eq!(cursor.reset(4), 0..2);
        assert_eq!(cursor.total(), 4);
    }
}
