#![forbid(unsafe_code)]

//! WASM frontend for the project showcase.
//!
//! This crate is intentionally host-specific (web/WASM). It binds the
//! host-agnostic `showcase-core` engine to the browser:
//! - materializes cards into the grid container,
//! - delegates filter-button clicks,
//! - watches the scroll sentinel with an `IntersectionObserver`,
//! - equalizes row heights in animation frames after coalesced resizes,
//! - drives the sticky filter bar on narrow viewports.

#[cfg(target_arch = "wasm32")]
mod controller;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod sticky;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{ShowcaseWeb, init_logging};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets. The stub keeps the state machine but has no DOM.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct ShowcaseWeb {
    state: Option<showcase_core::ShowcaseState>,
}

#[cfg(not(target_arch = "wasm32"))]
impl ShowcaseWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Decode `bootstrap` and hold the resulting state.
    ///
    /// # Errors
    ///
    /// Any [`showcase_core::ShowcaseError`] from decoding or validation.
    pub fn mount(&mut self, bootstrap: &str) -> showcase_core::Result<()> {
        let bootstrap = showcase_core::Bootstrap::from_json(bootstrap)?;
        self.state = Some(showcase_core::ShowcaseState::new(bootstrap));
        Ok(())
    }

    /// A no-op when unmounted, whatever the slug.
    ///
    /// # Errors
    ///
    /// [`showcase_core::ShowcaseError::UnknownCategory`] for an unknown slug.
    pub fn select_category(&mut self, slug: &str) -> showcase_core::Result<()> {
        match &mut self.state {
            Some(state) => state.select_category(slug),
            None => Ok(()),
        }
    }

    pub fn announcement(&self) -> Option<String> {
        self.state.as_ref().map(showcase_core::ShowcaseState::announcement)
    }

    /// JSON snapshot of the observable state, `None` when unmounted.
    pub fn snapshot(&self) -> Option<String> {
        let state = self.state.as_ref()?;
        serde_json::to_string(&state.snapshot()).ok()
    }

    pub fn has_more(&self) -> bool {
        self.state.as_ref().is_some_and(showcase_core::ShowcaseState::has_more)
    }

    pub fn displayed_count(&self) -> usize {
        self.state
            .as_ref()
            .map_or(0, showcase_core::ShowcaseState::displayed_len)
    }

    pub fn destroy(&mut self) {
        self.state = None;
    }
}

/// No console on native targets; logging is the embedding binary's concern.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(_level: Option<String>) {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOOTSTRAP: &str = r#"{
        "allRecords": [
            {"id": 1, "title": "Mangroves", "serviceAreas": ["reforestation"]},
            {"id": 2, "title": "Direct Air", "serviceAreas": ["carbon-capture"]},
            {"id": 3, "title": "Peatland", "serviceAreas": ["reforestation"]}
        ],
        "pageSize": 2,
        "categories": [
            {"slug": "reforestation", "label": "Reforestation"},
            {"slug": "carbon-capture", "label": "Carbon Capture"}
        ]
    }"#;

    #[test]
    fn unmounted_stub_reports_nothing() {
        let mut web = ShowcaseWeb::new();
        assert_eq!(web.select_category("reforestation"), Ok(()));
        assert_eq!(web.select_category("no-such-slug"), Ok(()));
        assert_eq!(web.announcement(), None);
        assert_eq!(web.snapshot(), None);
        assert!(!web.has_more());
        assert_eq!(web.displayed_count(), 0);
    }

    #[test]
    fn stub_follows_filter_changes() {
        let mut web = ShowcaseWeb::new();
        web.mount(BOOTSTRAP).unwrap();
        assert_eq!(web.displayed_count(), 2);
        assert!(web.has_more());

        web.select_category("reforestation").unwrap();
        assert_eq!(
            web.announcement().as_deref(),
            Some("Showing 2 projects in Reforestation")
        );
        assert!(!web.has_more());
        assert!(web.select_category("solar").is_err());

        let snapshot: serde_json::Value = serde_json::from_str(&web.snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["selectedCategory"], "reforestation");
        assert_eq!(snapshot["filteredCount"], 2);

        web.destroy();
        assert_eq!(web.displayed_count(), 0);
        assert_eq!(web.select_category("reforestation"), Ok(()));
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        let mut web = ShowcaseWeb::new();
        let err = web.mount(r#"{"allRecords": [], "pageSize": 0}"#).unwrap_err();
        assert_eq!(err, showcase_core::ShowcaseError::InvalidPageSize(0));
    }
}
