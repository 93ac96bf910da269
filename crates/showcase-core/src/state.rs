//! The showcase's single mutable state object.
//!
//! [`ShowcaseState`] owns every record for the lifetime of one mount and is
//! mutated through exactly two paths: [`ShowcaseState::select_category`]
//! (filter change, which resets pagination) and the
//! [`ShowcaseState::begin_advance`] / [`ShowcaseState::finish_advance`] pair
//! (pagination). Derived views (filtered list, displayed prefix, `has_more`,
//! announcement) are recomputed from the stored selection on demand.
//!
//! # Invariants
//!
//! - `selected` is `"all"` or one of the known category slugs.
//! - `filtered == filter_indices(records, selected)`.
//! - displayed records are `filtered[..cursor.offset()]`.
//! - While `loading` is set no other advance can begin.
//! - A filter change clears `loading` and moves to a new epoch; settling an
//!   advance from an older epoch leaves the current epoch untouched.

use std::ops::Range;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{Bootstrap, ShowcaseConfig};
use crate::error::{Result, ShowcaseError};
use crate::filter::{CategoryFilter, filter_indices};
use crate::pagination::PageCursor;
use crate::record::{Category, ProjectRecord, RecordId};

/// Proof that an advance was applied. Hand it back to
/// [`ShowcaseState::finish_advance`] once the appended cards are settled.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an advance stays in flight until its ticket is finished"]
pub struct AdvanceTicket {
    epoch: u64,
    appended: Range<usize>,
}

impl AdvanceTicket {
    /// Range of the newly displayed records within the filtered list.
    #[must_use]
    pub fn appended(&self) -> Range<usize> {
        self.appended.clone()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Serializable summary for hosts and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseSnapshot {
    pub selected_category: String,
    pub selected_category_label: String,
    pub filtered_count: usize,
    pub displayed_ids: Vec<RecordId>,
    pub current_offset: usize,
    pub has_more: bool,
    pub is_loading: bool,
    pub announcement: String,
}

#[derive(Debug, Clone)]
pub struct ShowcaseState {
    records: Vec<ProjectRecord>,
    categories: Vec<Category>,
    all_label: String,
    config: ShowcaseConfig,
    selected: CategoryFilter,
    selected_label: String,
    filtered: Vec<usize>,
    cursor: PageCursor,
    loading: bool,
    epoch: u64,
}

impl ShowcaseState {
    /// Initial state: `"all"` selected, first page displayed.
    #[must_use]
    pub fn new(bootstrap: Bootstrap) -> Self {
        let Bootstrap {
            records,
            page_size,
            categories,
            all_label,
            config,
        } = bootstrap;
        let filtered = filter_indices(&records, &CategoryFilter::All);
        let cursor = PageCursor::first_page(page_size, filtered.len());
        Self {
            records,
            categories,
            selected_label: all_label.clone(),
            all_label,
            config,
            selected: CategoryFilter::All,
            filtered,
            cursor,
            loading: false,
            epoch: 0,
        }
    }

    // --- Read access ---

    #[must_use]
    pub fn all_records(&self) -> &[ProjectRecord] {
        &self.records
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    #[must_use]
    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    #[must_use]
    pub fn selected_category_label(&self) -> &str {
        &self.selected_label
    }

    pub fn filtered_records(&self) -> impl ExactSizeIterator<Item = &ProjectRecord> + '_ {
        self.filtered.iter().map(|&idx| &self.records[idx])
    }

    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn displayed_records(&self) -> impl ExactSizeIterator<Item = &ProjectRecord> + '_ {
        self.records_in(self.cursor.displayed())
    }

    /// Filtered records in `range` (clamped to the filtered list).
    pub fn records_in(
        &self,
        range: Range<usize>,
    ) -> impl ExactSizeIterator<Item = &ProjectRecord> + '_ {
        let end = range.end.min(self.filtered.len());
        let start = range.start.min(end);
        self.filtered[start..end]
            .iter()
            .map(|&idx| &self.records[idx])
    }

    #[must_use]
    pub fn displayed_len(&self) -> usize {
        self.cursor.offset()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.cursor.page_size().get()
    }

    #[must_use]
    pub fn current_offset(&self) -> usize {
        self.cursor.offset()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    #[must_use]
    pub fn has_projects(&self) -> bool {
        !self.filtered.is_empty()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a filter button targeting `slug` is the pressed one.
    #[must_use]
    pub fn is_active(&self, slug: &str) -> bool {
        CategoryFilter::parse(slug) == self.selected
    }

    /// Display label for a slug, `"all"` included.
    #[must_use]
    pub fn label_for(&self, slug: &str) -> Option<&str> {
        match CategoryFilter::parse(slug) {
            CategoryFilter::All => Some(self.all_label.as_str()),
            CategoryFilter::Slug(slug) => self
                .categories
                .iter()
                .find(|category| category.slug == slug)
                .map(|category| category.label.as_str()),
        }
    }

    /// Live-region text: `"Showing {count} project{s} in {label}"`.
    #[must_use]
    pub fn announcement(&self) -> String {
        let count = self.filtered.len();
        let plural = if count == 1 { "" } else { "s" };
        format!(
            "Showing {count} project{plural} in {}",
            self.selected_label
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> ShowcaseSnapshot {
        ShowcaseSnapshot {
            selected_category: self.selected.as_str().to_owned(),
            selected_category_label: self.selected_label.clone(),
            filtered_count: self.filtered.len(),
            displayed_ids: self.displayed_records().map(|r| r.id.clone()).collect(),
            current_offset: self.cursor.offset(),
            has_more: self.cursor.has_more(),
            is_loading: self.loading,
            announcement: self.announcement(),
        }
    }

    // --- Mutation ---

    /// Switch the selected category, recompute the filtered list, and reset
    /// pagination to the first page. Any in-flight advance is abandoned.
    ///
    /// # Errors
    ///
    /// [`ShowcaseError::UnknownCategory`] if `slug` is neither `"all"` nor a
    /// known category. The state is left unchanged.
    pub fn select_category(&mut self, slug: &str) -> Result<()> {
        let filter = CategoryFilter::parse(slug);
        let Some(label) = self.label_for(filter.as_str()).map(str::to_owned) else {
            warn!(slug, "ignoring unknown category");
            return Err(ShowcaseError::UnknownCategory(slug.to_owned()));
        };

        self.filtered = filter_indices(&self.records, &filter);
        self.cursor.reset(self.filtered.len());
        self.selected = filter;
        self.selected_label = label;
        self.loading = false;
        self.epoch = self.epoch.wrapping_add(1);

        debug!(
            category = self.selected.as_str(),
            filtered = self.filtered.len(),
            displayed = self.cursor.offset(),
            epoch = self.epoch,
            "category selected"
        );
        Ok(())
    }

    /// Start a pagination advance. Returns `None` (and changes nothing) while
    /// another advance is in flight or when nothing remains.
    pub fn begin_advance(&mut self) -> Option<AdvanceTicket> {
        if self.loading {
            trace!("advance ignored: already loading");
            return None;
        }
        let appended = self.cursor.advance()?;
        self.loading = true;
        debug!(
            from = appended.start,
            to = appended.end,
            has_more = self.cursor.has_more(),
            epoch = self.epoch,
            "page advanced"
        );
        Some(AdvanceTicket {
            epoch: self.epoch,
            appended,
        })
    }

    /// Settle an advance. Returns `true` if this cleared the loading flag,
    /// `false` if a filter change already superseded it.
    pub fn finish_advance(&mut self, ticket: AdvanceTicket) -> bool {
        if ticket.epoch != self.epoch {
            trace!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "stale advance settled"
            );
            return false;
        }
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: i64, page_size: i64) -> ShowcaseState {
        let records = (1..=n)
            .map(|id| {
                let area = if id % 2 == 0 { "even" } else { "odd" };
                ProjectRecord::new(id, format!("Project {id}")).with_service_areas([area])
            })
            .collect();
        let categories = vec![Category::new("even", "Even"), Category::new("odd", "Odd")];
        ShowcaseState::new(Bootstrap::new(records, page_size, categories).unwrap())
    }

    #[test]
    fn starts_on_all_with_first_page() {
        let state = state(5, 2);
        assert!(state.selected_category().is_all());
        assert_eq!(state.selected_category_label(), "All Projects");
        assert_eq!(state.displayed_len(), 2);
        assert!(state.has_more());
        assert!(!state.is_loading());
    }

    #[test]
    fn unknown_category_leaves_state_untouched() {
        let mut state = state(5, 2);
        let before = state.snapshot();
        assert_eq!(
            state.select_category("solar"),
            Err(ShowcaseError::UnknownCategory("solar".into()))
        );
        assert_eq!(state.snapshot(), before);
        assert_eq!(state.epoch(), 0);
    }

    #[test]
    fn advance_guard_blocks_until_finished() {
        let mut state = state(9, 2);
        let ticket = state.begin_advance().unwrap();
        assert_eq!(ticket.appended(), 2..4);
        assert!(state.is_loading());
        assert!(state.begin_advance().is_none());
        assert_eq!(state.current_offset(), 4);
        assert!(state.finish_advance(ticket));
        assert!(!state.is_loading());
        assert!(state.begin_advance().is_some());
    }

    #[test]
    fn filter_change_supersedes_in_flight_advance() {
        let mut state = state(9, 2);
        let stale = state.begin_advance().unwrap();
        state.select_category("odd").unwrap();
        assert!(!state.is_loading());

        let fresh = state.begin_advance().unwrap();
        assert!(!state.finish_advance(stale));
        assert!(state.is_loading(), "stale settle must not clear a fresh advance");
        assert!(state.finish_advance(fresh));
    }

    #[test]
    fn announcement_pluralizes() {
        let mut state = state(3, 2);
        assert_eq!(state.announcement(), "Showing 3 projects in All Projects");
        state.select_category("even").unwrap();
        assert_eq!(state.announcement(), "Showing 1 project in Even");
    }

    #[test]
    fn active_button_tracks_selection() {
        let mut state = state(3, 2);
        assert!(state.is_active("all"));
        assert!(state.is_active(""));
        state.select_category("odd").unwrap();
        assert!(state.is_active("odd"));
        assert!(!state.is_active("all"));
    }

    #[test]
    fn records_in_clamps_out_of_range() {
        let state = state(3, 2);
        assert_eq!(state.records_in(2..10).count(), 1);
        assert_eq!(state.records_in(5..10).count(), 0);
    }
}
