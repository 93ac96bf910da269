#![forbid(unsafe_code)]

//! DOM side of the sticky filter bar.
//!
//! The machine lives in `showcase_core::sticky`; this module measures the
//! page, feeds it, and applies its transitions. Scroll listeners exist only
//! while the bar is active (narrow viewport).

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use showcase_core::{EdgeState, StickyFilterBar, StickyTransition};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom::current_scroll_y;

pub(crate) const STUCK_CLASS: &str = "is-stuck";
pub(crate) const PLACEHOLDER_CLASS: &str = "gg-filter-placeholder";
pub(crate) const AT_START_CLASS: &str = "at-start";
pub(crate) const AT_END_CLASS: &str = "at-end";

pub(crate) struct StickyBar {
    document: Document,
    nav: HtmlElement,
    machine: RefCell<StickyFilterBar>,
    placeholder: RefCell<Option<HtmlElement>>,
    scroll_listeners: RefCell<Vec<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl StickyBar {
    pub(crate) fn new(document: Document, nav: HtmlElement, breakpoint_px: f64) -> Rc<Self> {
        Rc::new(Self {
            document,
            nav,
            machine: RefCell::new(StickyFilterBar::new(breakpoint_px)),
            placeholder: RefCell::new(None),
            scroll_listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
        })
    }

    /// Re-measure the viewport and the bar's in-flow position. Called at
    /// mount and after every coalesced resize.
    pub(crate) fn refresh(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        let scroll_y = current_scroll_y();
        // While stuck the bar is out of flow; its placeholder holds the spot.
        let anchor_top = match self.placeholder.borrow().as_ref() {
            Some(placeholder) => placeholder.get_bounding_client_rect().top() + scroll_y,
            None => self.nav.get_bounding_client_rect().top() + scroll_y,
        };
        let bar_height = self.nav.get_bounding_client_rect().height();

        let transition = self
            .machine
            .borrow_mut()
            .on_viewport(width, anchor_top, bar_height);
        if let Some(transition) = transition {
            self.apply(transition);
        }
        if self.machine.borrow().is_active() {
            self.check_scroll();
            self.update_edges();
        }
    }

    /// Remove listeners, the stuck state, and the placeholder.
    pub(crate) fn detach(&self) {
        self.scroll_listeners.borrow_mut().clear();
        self.frame.borrow_mut().take();
        let measured = self.machine.borrow().edges().is_some();
        let transition = self.machine.borrow_mut().reset();
        if let Some(StickyTransition::Deactivated { was_stuck: true }) = transition {
            self.unstick();
        }
        if measured {
            self.clear_edges();
        }
    }

    fn apply(self: &Rc<Self>, transition: StickyTransition) {
        match transition {
            StickyTransition::Activated => self.install_scroll_listeners(),
            StickyTransition::Deactivated { was_stuck } => {
                self.scroll_listeners.borrow_mut().clear();
                self.frame.borrow_mut().take();
                if was_stuck {
                    self.unstick();
                }
                self.clear_edges();
            }
            StickyTransition::Stuck { placeholder_height } => self.stick(placeholder_height),
            StickyTransition::Unstuck => self.unstick(),
        }
    }

    fn install_scroll_listeners(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut listeners = Vec::new();

        let bar = Rc::downgrade(self);
        listeners.push(EventListener::new(&window, "scroll", move |_event| {
            if let Some(bar) = bar.upgrade() {
                bar.schedule_scroll_check();
            }
        }));

        let bar = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.nav, "scroll", move |_event| {
            if let Some(bar) = bar.upgrade() {
                bar.update_edges();
            }
        }));

        *self.scroll_listeners.borrow_mut() = listeners;
    }

    fn schedule_scroll_check(self: &Rc<Self>) {
        if self.frame.borrow().is_some() {
            return;
        }
        let bar = Rc::downgrade(self);
        let handle = request_animation_frame(move |_| {
            let Some(bar) = bar.upgrade() else {
                return;
            };
            bar.frame.borrow_mut().take();
            bar.check_scroll();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn check_scroll(self: &Rc<Self>) {
        let transition = self.machine.borrow_mut().on_scroll(current_scroll_y());
        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    fn update_edges(&self) {
        let edges = self.machine.borrow_mut().on_horizontal_scroll(
            f64::from(self.nav.scroll_left()),
            f64::from(self.nav.scroll_width()),
            f64::from(self.nav.client_width()),
        );
        if let Some(EdgeState { at_start, at_end }) = edges {
            let classes = self.nav.class_list();
            let _ = classes.toggle_with_force(AT_START_CLASS, at_start);
            let _ = classes.toggle_with_force(AT_END_CLASS, at_end);
        }
    }

    fn clear_edges(&self) {
        let _ = self.nav.class_list().remove_2(AT_START_CLASS, AT_END_CLASS);
    }

    fn stick(&self, height: f64) {
        let _ = self.nav.class_list().add_1(STUCK_CLASS);
        if self.placeholder.borrow().is_some() {
            return;
        }
        let placeholder = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let Some(placeholder) = placeholder else {
            warn!("failed to create sticky placeholder");
            return;
        };
        placeholder.set_class_name(PLACEHOLDER_CLASS);
        let _ = placeholder
            .style()
            .set_property("height", &format!("{height}px"));
        if let Err(err) = self.nav.after_with_node_1(&placeholder) {
            warn!(?err, "failed to insert sticky placeholder");
            return;
        }
        *self.placeholder.borrow_mut() = Some(placeholder);
    }

    fn unstick(&self) {
        let _ = self.nav.class_list().remove_1(STUCK_CLASS);
        if let Some(placeholder) = self.placeholder.borrow_mut().take() {
            placeholder.remove();
        }
    }
}
