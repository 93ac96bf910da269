#![forbid(unsafe_code)]

//! DOM side of the grid: anchor lookup, card materialization, and the
//! [`CardHost`] / [`LayoutSurface`] implementations over `web-sys`.

use showcase_core::card::{CARD_CLASS, EXCERPT_CLASS, TITLE_CLASS};
use showcase_core::{
    ALL_CATEGORY, CardElement, CardHost, CardMetrics, CardNode, Category, LayoutSurface,
    MountedCard, RowHeights, ShowcaseError,
};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

pub(crate) const FILTER_NAV_SELECTOR: &str = ".gg-filter-buttons";
pub(crate) const FILTER_BUTTON_SELECTOR: &str = ".gg-filter-button";
pub(crate) const GRID_SELECTOR: &str = ".gg-projects-grid";
pub(crate) const SENTINEL_SELECTOR: &str = ".gg-scroll-sentinel";
pub(crate) const EMPTY_STATE_SELECTOR: &str = ".gg-empty-state";
/// Slug attribute on filter buttons.
pub(crate) const BUTTON_AREA_ATTR: &str = "data-area";
pub(crate) const ACTIVE_CLASS: &str = "active";

const MIN_HEIGHT: &str = "min-height";

/// Elements the host markup must provide, resolved once at mount.
#[derive(Debug, Clone)]
pub(crate) struct Anchors {
    pub(crate) document: Document,
    pub(crate) nav: HtmlElement,
    pub(crate) grid: Element,
    pub(crate) sentinel: Element,
    pub(crate) empty_state: HtmlElement,
    pub(crate) live_region: Option<Element>,
}

impl Anchors {
    /// Resolve every anchor inside `root`.
    ///
    /// # Errors
    ///
    /// [`ShowcaseError::MissingAnchor`] naming the first selector that did
    /// not match.
    pub(crate) fn find(root: &Element) -> Result<Self, ShowcaseError> {
        let document = root
            .owner_document()
            .ok_or(ShowcaseError::MissingAnchor("document"))?;
        let nav = query_html(root, FILTER_NAV_SELECTOR)?;
        let grid = query(root, GRID_SELECTOR)?;
        let sentinel = query(root, SENTINEL_SELECTOR)?;
        // The block-level empty state sits directly under the root; the grid
        // may carry a server-rendered one of its own.
        let empty_state = query_html(root, ":scope > .gg-empty-state")
            .or_else(|_| query_html(root, EMPTY_STATE_SELECTOR))?;
        let live_region = query(root, "[aria-live] span")
            .or_else(|_| query(root, "[aria-live]"))
            .ok();

        Ok(Self {
            document,
            nav,
            grid,
            sentinel,
            empty_state,
            live_region,
        })
    }

    /// Remove server-rendered cards (and the grid's own empty-state) so the
    /// grid starts with only synchronizer-owned children.
    pub(crate) fn clear_server_markup(&self) {
        let selector = format!(".{CARD_CLASS}, {EMPTY_STATE_SELECTOR}");
        for el in query_all(&self.grid, &selector) {
            el.remove();
        }
    }

    pub(crate) fn filter_buttons(&self) -> Vec<Element> {
        query_all(&self.nav, FILTER_BUTTON_SELECTOR)
    }
}

/// Categories as the rendered filter buttons list them, for payloads that
/// carry none. The `"all"` button and blank or repeated slugs are skipped.
pub(crate) fn categories_from_buttons(root: &Element) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    for button in query_all(root, FILTER_BUTTON_SELECTOR) {
        let Some(slug) = button.get_attribute(BUTTON_AREA_ATTR) else {
            continue;
        };
        let slug = slug.trim();
        if slug.is_empty() || slug == ALL_CATEGORY || categories.iter().any(|c| c.slug == slug) {
            continue;
        }
        let label = button.text_content().unwrap_or_default();
        categories.push(Category::new(slug, label.trim()));
    }
    categories
}

fn query(root: &Element, selector: &'static str) -> Result<Element, ShowcaseError> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .ok_or(ShowcaseError::MissingAnchor(selector))
}

fn query_html(root: &Element, selector: &'static str) -> Result<HtmlElement, ShowcaseError> {
    query(root, selector)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| ShowcaseError::MissingAnchor(selector))
}

pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_child_html(card: &Element, class: &str) -> Option<HtmlElement> {
    card.query_selector(&format!(".{class}"))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Materialize a card tree into a detached DOM element.
pub(crate) fn build_element(document: &Document, card: &CardElement) -> Result<Element, JsValue> {
    let el = document.create_element(card.tag())?;
    for (name, value) in card.attributes() {
        el.set_attribute(name, value)?;
    }
    for child in card.children() {
        match child {
            CardNode::Element(child) => {
                el.append_child(&build_element(document, child)?)?;
            }
            CardNode::Text(text) => {
                el.append_child(&document.create_text_node(text))?;
            }
        }
    }
    Ok(el)
}

pub(crate) fn set_displayed(el: &HtmlElement, visible: bool) {
    let style = el.style();
    let result = if visible {
        style.remove_property("display").map(drop)
    } else {
        style.set_property("display", "none")
    };
    if let Err(err) = result {
        warn!(?err, "failed to toggle element display");
    }
}

pub(crate) fn current_scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

/// The grid container as seen by the synchronizer.
pub(crate) struct DomGrid {
    document: Document,
    grid: Element,
    empty_state: HtmlElement,
}

impl DomGrid {
    pub(crate) fn new(anchors: &Anchors) -> Self {
        Self {
            document: anchors.document.clone(),
            grid: anchors.grid.clone(),
            empty_state: anchors.empty_state.clone(),
        }
    }
}

impl CardHost for DomGrid {
    type Node = Element;

    fn mount_card(&mut self, card: &CardElement) -> Option<Element> {
        let mounted = build_element(&self.document, card)
            .and_then(|el| self.grid.append_child(&el).map(|_| el));
        match mounted {
            Ok(el) => Some(el),
            Err(err) => {
                warn!(?err, "failed to mount card");
                None
            }
        }
    }

    fn unmount_card(&mut self, node: Element) {
        node.remove();
    }

    fn set_empty_state_visible(&mut self, visible: bool) {
        set_displayed(&self.empty_state, visible);
    }
}

/// Layout view over the mounted cards.
pub(crate) struct DomLayout<'a> {
    cards: &'a [MountedCard<Element>],
    scroll_y: f64,
}

impl<'a> DomLayout<'a> {
    pub(crate) fn new(cards: &'a [MountedCard<Element>]) -> Self {
        Self {
            cards,
            scroll_y: current_scroll_y(),
        }
    }
}

impl LayoutSurface for DomLayout<'_> {
    type Card = HtmlElement;

    fn visible_cards(&self) -> Vec<HtmlElement> {
        self.cards
            .iter()
            .filter_map(|card| card.node.dyn_ref::<HtmlElement>())
            // `display: none` (or a hidden ancestor) leaves no offset parent.
            .filter(|el| el.offset_parent().is_some())
            .cloned()
            .collect()
    }

    fn clear_min_heights(&mut self, card: &HtmlElement) {
        for class in [TITLE_CLASS, EXCERPT_CLASS] {
            if let Some(el) = query_child_html(card, class) {
                let _ = el.style().remove_property(MIN_HEIGHT);
            }
        }
    }

    fn measure(&self, card: &HtmlElement) -> Option<CardMetrics> {
        let title = query_child_html(card, TITLE_CLASS)?;
        let excerpt = query_child_html(card, EXCERPT_CLASS)?;
        let top = card.get_bounding_client_rect().top() + self.scroll_y;
        Some(CardMetrics::new(
            top,
            title.get_bounding_client_rect().height(),
            excerpt.get_bounding_client_rect().height(),
        ))
    }

    fn apply_min_heights(&mut self, card: &HtmlElement, heights: RowHeights) {
        for (class, height) in [(TITLE_CLASS, heights.title), (EXCERPT_CLASS, heights.excerpt)] {
            if let Some(el) = query_child_html(card, class) {
                let _ = el.style().set_property(MIN_HEIGHT, &format!("{height}px"));
            }
        }
    }
}
