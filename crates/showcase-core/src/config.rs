//! Bootstrap payload and host configuration.
//!
//! The host hands the showcase a single JSON document at mount time:
//!
//! ```json
//! {
//!   "allRecords": [{ "id": 1, "title": "…", "serviceAreas": ["reforestation"] }],
//!   "pageSize": 6,
//!   "categories": [{ "slug": "reforestation", "label": "Reforestation" }],
//!   "allLabel": "All Projects",
//!   "config": { "showActionLink": true, "actionLinkText": "Explore More" }
//! }
//! ```
//!
//! The keys used by the block's server-rendered context (`allProjects`,
//! `postsPerPage`, `selectedAreaLabel`) are accepted as aliases so the
//! context attribute can be fed through unchanged.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShowcaseError};
use crate::filter::ALL_CATEGORY;
use crate::record::{Category, ProjectRecord, decode_records, lenient};

/// Label shown for the `"all"` pseudo-category when the host gives none.
pub const DEFAULT_ALL_LABEL: &str = "All Projects";
/// Action affordance text when the host gives none.
pub const DEFAULT_ACTION_LINK_TEXT: &str = "Explore More";

/// Host configuration. Every field has a default, so `"config": {}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowcaseConfig {
    /// Render the trailing action affordance on each card.
    pub show_action_link: bool,
    /// Text of the action affordance.
    pub action_link_text: String,
    /// Lookahead margin (px) around the viewport for the scroll sentinel.
    pub scroll_margin_px: f64,
    /// Delay (ms) between appending a page and accepting the next one.
    pub load_settle_ms: u64,
    /// Cards whose tops differ by less than this (px) share a row.
    pub row_tolerance_px: f64,
    /// The filter bar goes sticky at or below this viewport width (px).
    pub sticky_breakpoint_px: f64,
    /// Quiet period (ms) after the last resize before re-normalizing.
    pub resize_debounce_ms: u64,
    /// Upper bound (ms) on how long a resize burst can defer normalization.
    pub resize_deadline_ms: u64,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            show_action_link: true,
            action_link_text: DEFAULT_ACTION_LINK_TEXT.to_owned(),
            scroll_margin_px: 200.0,
            load_settle_ms: 300,
            row_tolerance_px: 5.0,
            sticky_breakpoint_px: 782.0,
            resize_debounce_ms: 150,
            resize_deadline_ms: 500,
        }
    }
}

impl ShowcaseConfig {
    #[must_use]
    pub fn with_action_link(mut self, show: bool, text: impl Into<String>) -> Self {
        self.show_action_link = show;
        self.action_link_text = text.into();
        self
    }

    #[must_use]
    pub fn with_scroll_margin_px(mut self, margin: f64) -> Self {
        self.scroll_margin_px = margin;
        self
    }

    #[must_use]
    pub fn with_load_settle_ms(mut self, ms: u64) -> Self {
        self.load_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn with_row_tolerance_px(mut self, tolerance: f64) -> Self {
        self.row_tolerance_px = tolerance;
        self
    }

    #[must_use]
    pub fn with_sticky_breakpoint_px(mut self, breakpoint: f64) -> Self {
        self.sticky_breakpoint_px = breakpoint;
        self
    }

    #[must_use]
    pub fn with_resize_timing(mut self, debounce_ms: u64, deadline_ms: u64) -> Self {
        self.resize_debounce_ms = debounce_ms;
        self.resize_deadline_ms = deadline_ms;
        self
    }

    /// Reject values that would make the layout or loader misbehave.
    pub fn validate(&self) -> Result<()> {
        if !is_non_negative(self.scroll_margin_px) {
            return Err(ShowcaseError::InvalidConfig(
                "scrollMarginPx must be a non-negative number",
            ));
        }
        if !is_non_negative(self.row_tolerance_px) {
            return Err(ShowcaseError::InvalidConfig(
                "rowTolerancePx must be a non-negative number",
            ));
        }
        if !is_non_negative(self.sticky_breakpoint_px) {
            return Err(ShowcaseError::InvalidConfig(
                "stickyBreakpointPx must be a non-negative number",
            ));
        }
        if self.resize_deadline_ms < self.resize_debounce_ms {
            return Err(ShowcaseError::InvalidConfig(
                "resizeDeadlineMs must not be shorter than resizeDebounceMs",
            ));
        }
        Ok(())
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBootstrap {
    #[serde(default, alias = "allProjects", deserialize_with = "lenient")]
    all_records: Option<Vec<serde_json::Value>>,
    #[serde(alias = "postsPerPage")]
    page_size: i64,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default, alias = "selectedAreaLabel")]
    all_label: Option<String>,
    #[serde(default)]
    config: ShowcaseConfig,
}

/// Validated mount-time input: records, page size, categories, configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Bootstrap {
    pub records: Vec<ProjectRecord>,
    pub page_size: NonZeroUsize,
    pub categories: Vec<Category>,
    pub all_label: String,
    pub config: ShowcaseConfig,
}

impl Bootstrap {
    /// Build a bootstrap with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError::InvalidPageSize`] when `page_size <= 0`.
    pub fn new(
        records: Vec<ProjectRecord>,
        page_size: i64,
        categories: Vec<Category>,
    ) -> Result<Self> {
        let bootstrap = Self {
            records,
            page_size: page_size_from(page_size)?,
            categories,
            all_label: DEFAULT_ALL_LABEL.to_owned(),
            config: ShowcaseConfig::default(),
        };
        bootstrap.validate()?;
        Ok(bootstrap)
    }

    /// Decode and validate the host's JSON payload.
    ///
    /// # Errors
    ///
    /// Malformed JSON, a missing or non-positive page size, an invalid
    /// configuration, or an ill-formed category list.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawBootstrap = serde_json::from_str(json)?;
        let page_size = page_size_from(raw.page_size)?;
        let records: Vec<ProjectRecord> = decode_records(raw.all_records.unwrap_or_default());
        let all_label = raw
            .all_label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ALL_LABEL.to_owned());

        let bootstrap = Self {
            records,
            page_size,
            categories: raw.categories,
            all_label,
            config: raw.config,
        };
        bootstrap.validate()?;
        debug!(
            records = bootstrap.records.len(),
            categories = bootstrap.categories.len(),
            page_size = bootstrap.page_size.get(),
            "bootstrap decoded"
        );
        Ok(bootstrap)
    }

    #[must_use]
    pub fn with_config(mut self, config: ShowcaseConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_all_label(mut self, label: impl Into<String>) -> Self {
        self.all_label = label.into();
        self
    }

    /// Check the category list and configuration.
    ///
    /// # Errors
    ///
    /// A category named `"all"`, an empty or duplicated slug, or an invalid
    /// [`ShowcaseConfig`].
    pub fn validate(&self) -> Result<()> {
        for (idx, category) in self.categories.iter().enumerate() {
            if category.slug.is_empty() {
                return Err(ShowcaseError::InvalidConfig("category slug must not be empty"));
            }
            if category.slug == ALL_CATEGORY {
                return Err(ShowcaseError::InvalidConfig(
                    "category slug `all` is reserved for the unfiltered view",
                ));
            }
            if self.categories[..idx]
                .iter()
                .any(|prev| prev.slug == category.slug)
            {
                return Err(ShowcaseError::InvalidConfig("duplicate category slug"));
            }
        }
        self.config.validate()
    }
}

fn page_size_from(page_size: i64) -> Result<NonZeroUsize> {
    usize::try_from(page_size)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(ShowcaseError::InvalidPageSize(page_size))
}
