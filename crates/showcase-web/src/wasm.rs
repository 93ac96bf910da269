#![forbid(unsafe_code)]

use std::rc::Rc;

use showcase_core::{Bootstrap, ShowcaseError};
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::controller::Showcase;
use crate::dom::categories_from_buttons;
use crate::logging;

/// Attribute holding the server-side JSON context on the block root.
const CONTEXT_ATTR: &str = "data-wp-context";

/// Web/WASM project showcase.
///
/// One instance drives one block root. The JS host constructs it, mounts it
/// onto the server-rendered markup, and calls `destroy()` when the block
/// goes away (editor preview, SPA navigation). Dropping the instance from JS
/// (`free()`) has the same effect.
#[wasm_bindgen]
pub struct ShowcaseWeb {
    showcase: Option<Rc<Showcase>>,
}

#[wasm_bindgen]
impl ShowcaseWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { showcase: None }
    }

    /// Mount onto `root` with a JSON bootstrap payload
    /// (`{ allRecords, pageSize, categories, allLabel?, config? }`).
    ///
    /// Mounting again first tears down the previous mount. On error nothing
    /// is attached.
    pub fn mount(&mut self, root: Element, bootstrap: &str) -> Result<(), JsValue> {
        self.destroy();
        let mut bootstrap = Bootstrap::from_json(bootstrap).map_err(to_js)?;
        if bootstrap.categories.is_empty() {
            bootstrap.categories = categories_from_buttons(&root);
            bootstrap.validate().map_err(to_js)?;
        }
        let showcase = Showcase::mount(&root, bootstrap).map_err(to_js)?;
        self.showcase = Some(showcase);
        Ok(())
    }

    /// Mount using the JSON context the server rendered onto `root`.
    #[wasm_bindgen(js_name = mountFromContext)]
    pub fn mount_from_context(&mut self, root: Element) -> Result<(), JsValue> {
        let context = root
            .get_attribute(CONTEXT_ATTR)
            .ok_or_else(|| to_js(ShowcaseError::MissingAnchor(CONTEXT_ATTR)))?;
        self.mount(root, &context)
    }

    /// Switch the visible category (`"all"` or a known slug). A no-op before
    /// mount and after `destroy`.
    #[wasm_bindgen(js_name = selectCategory)]
    pub fn select_category(&self, slug: &str) -> Result<(), JsValue> {
        match &self.showcase {
            Some(showcase) => showcase.select_category(slug).map_err(to_js),
            None => Ok(()),
        }
    }

    /// Current live-region text.
    pub fn announcement(&self) -> Option<String> {
        self.showcase
            .as_ref()
            .map(|showcase| showcase.state().announcement())
    }

    /// JSON snapshot of the observable state, or `null` when unmounted.
    pub fn snapshot(&self) -> Result<Option<String>, JsValue> {
        let Some(showcase) = &self.showcase else {
            return Ok(None);
        };
        let snapshot = showcase.state().snapshot();
        serde_json::to_string(&snapshot)
            .map(Some)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = hasMore)]
    pub fn has_more(&self) -> bool {
        self.showcase
            .as_ref()
            .is_some_and(|showcase| showcase.state().has_more())
    }

    #[wasm_bindgen(js_name = displayedCount)]
    pub fn displayed_count(&self) -> usize {
        self.showcase
            .as_ref()
            .map_or(0, |showcase| showcase.state().displayed_len())
    }

    /// Explicit teardown for JS callers: removes listeners, disconnects the
    /// observer, cancels timers, and restores the sticky bar.
    pub fn destroy(&mut self) {
        if let Some(showcase) = self.showcase.take() {
            showcase.teardown();
        }
    }
}

impl Default for ShowcaseWeb {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `tracing` output to the browser console at `level`
/// (`"error"` .. `"trace"`, default `"info"`).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    logging::init(level.as_deref());
}

fn to_js(err: ShowcaseError) -> JsValue {
    warn!(%err, "showcase call rejected");
    js_sys::Error::new(&err.to_string()).into()
}
