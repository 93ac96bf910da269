#![forbid(unsafe_code)]

//! The mounted showcase: one shared state, one grid registry, and every
//! listener, observer, and timer that drives them.
//!
//! Callbacks hold a `Weak` handle and do nothing once the showcase is gone.
//! All state mutation happens on the single browser event loop, so an event
//! handler always runs to completion before the next one starts.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use js_sys::Array;
use showcase_core::{
    ALL_CATEGORY, AdvanceTicket, Bootstrap, CardOptions, CoalesceAction, CoalescerConfig,
    GridSynchronizer, LoadDecision, ResizeCoalescer, ScrollLoader, ShowcaseError, ShowcaseState,
    layout,
};
use tracing::{debug, info, warn};
use web_time::Instant;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Element, Event, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::dom::{
    ACTIVE_CLASS, Anchors, BUTTON_AREA_ATTR, DomGrid, DomLayout, FILTER_BUTTON_SELECTOR,
};
use crate::sticky::StickyBar;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Visibility observer on the scroll sentinel. The closure must outlive the
/// observer's registration, so both are kept together.
struct SentinelObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for SentinelObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub(crate) struct Showcase {
    anchors: Anchors,
    state: RefCell<ShowcaseState>,
    grid: RefCell<GridSynchronizer<Element>>,
    host: RefCell<DomGrid>,
    loader: ScrollLoader,
    row_tolerance_px: f64,
    coalescer: RefCell<ResizeCoalescer>,
    /// Clock origin for the coalescer.
    mounted_at: Instant,
    sentinel_visible: Cell<bool>,
    sticky: Rc<StickyBar>,
    listeners: RefCell<Vec<EventListener>>,
    observer: RefCell<Option<SentinelObserver>>,
    settle_timer: RefCell<Option<Timeout>>,
    resize_timer: RefCell<Option<Timeout>>,
    layout_frame: RefCell<Option<AnimationFrame>>,
}

impl Showcase {
    /// Resolve anchors, render the first page, and start listening.
    ///
    /// # Errors
    ///
    /// [`ShowcaseError::MissingAnchor`] when the markup lacks a required
    /// element, [`ShowcaseError::Unsupported`] when the visibility observer
    /// could not be created.
    pub(crate) fn mount(root: &Element, bootstrap: Bootstrap) -> Result<Rc<Self>, ShowcaseError> {
        let anchors = Anchors::find(root)?;
        let state = ShowcaseState::new(bootstrap);
        let config = state.config().clone();

        let showcase = Rc::new(Self {
            host: RefCell::new(DomGrid::new(&anchors)),
            grid: RefCell::new(GridSynchronizer::new(CardOptions::from(&config))),
            sticky: StickyBar::new(
                anchors.document.clone(),
                anchors.nav.clone(),
                config.sticky_breakpoint_px,
            ),
            anchors,
            state: RefCell::new(state),
            loader: ScrollLoader::from_config(&config),
            row_tolerance_px: config.row_tolerance_px,
            coalescer: RefCell::new(ResizeCoalescer::new(CoalescerConfig::from(&config))),
            mounted_at: Instant::now(),
            sentinel_visible: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            settle_timer: RefCell::new(None),
            resize_timer: RefCell::new(None),
            layout_frame: RefCell::new(None),
        });

        // Every fallible step runs before the first DOM mutation, so a failed
        // mount leaves the server-rendered markup as it was.
        showcase.create_sentinel_observer()?;

        showcase.anchors.clear_server_markup();
        showcase.rebuild_grid();
        showcase.sync_chrome();
        showcase.install_listeners();
        showcase.observe_sentinel();
        showcase.sticky.refresh();
        showcase.schedule_layout();

        let state = showcase.state.borrow();
        info!(
            records = state.all_records().len(),
            displayed = state.displayed_len(),
            page_size = state.page_size(),
            "showcase mounted"
        );
        drop(state);
        Ok(showcase)
    }

    pub(crate) fn state(&self) -> Ref<'_, ShowcaseState> {
        self.state.borrow()
    }

    /// Switch category and rebuild the grid. An unknown slug leaves the
    /// showcase untouched.
    pub(crate) fn select_category(self: &Rc<Self>, slug: &str) -> Result<(), ShowcaseError> {
        self.state.borrow_mut().select_category(slug)?;
        // Any in-flight settle belongs to the previous epoch.
        self.settle_timer.borrow_mut().take();
        self.rebuild_grid();
        self.sync_chrome();
        self.schedule_layout();
        self.recheck_sentinel();
        Ok(())
    }

    /// Stop every listener, observer, and timer and release the sticky bar.
    /// Mounted cards stay in the document.
    pub(crate) fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.observer.borrow_mut().take();
        self.settle_timer.borrow_mut().take();
        self.resize_timer.borrow_mut().take();
        self.layout_frame.borrow_mut().take();
        self.sticky.detach();
        debug!("showcase torn down");
    }

    // ── Grid ────────────────────────────────────────────────────────────

    fn rebuild_grid(&self) {
        let state = self.state.borrow();
        let mut host = self.host.borrow_mut();
        self.grid
            .borrow_mut()
            .rebuild(&mut *host, state.displayed_records());
    }

    fn append_page(&self, ticket: &AdvanceTicket) {
        let state = self.state.borrow();
        let mut host = self.host.borrow_mut();
        self.grid
            .borrow_mut()
            .append(&mut *host, state.records_in(ticket.appended()));
    }

    /// Filter buttons and the live region follow the selected category.
    fn sync_chrome(&self) {
        let state = self.state.borrow();
        for button in self.anchors.filter_buttons() {
            let slug = button_slug(&button);
            let active = state.is_active(&slug);
            let _ = button.class_list().toggle_with_force(ACTIVE_CLASS, active);
            let _ = button.set_attribute("aria-pressed", if active { "true" } else { "false" });
        }
        if let Some(live) = &self.anchors.live_region {
            live.set_text_content(Some(&state.announcement()));
        }
    }

    // ── Layout ──────────────────────────────────────────────────────────

    fn schedule_layout(self: &Rc<Self>) {
        if self.layout_frame.borrow().is_some() {
            return;
        }
        let showcase = Rc::downgrade(self);
        let handle = request_animation_frame(move |_| {
            let Some(showcase) = showcase.upgrade() else {
                return;
            };
            showcase.layout_frame.borrow_mut().take();
            showcase.normalize_now();
        });
        *self.layout_frame.borrow_mut() = Some(handle);
    }

    fn normalize_now(&self) {
        let grid = self.grid.borrow();
        let mut surface = DomLayout::new(grid.cards());
        layout::normalize(&mut surface, self.row_tolerance_px);
    }

    fn on_resize(self: &Rc<Self>) {
        let action = self.coalescer.borrow_mut().handle_event(self.now_ms());
        self.apply_resize(action);
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.mounted_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn apply_resize(self: &Rc<Self>, action: CoalesceAction) {
        match action {
            CoalesceAction::None => {}
            CoalesceAction::Wait { retry_in_ms } => {
                let showcase = Rc::downgrade(self);
                let delay = u32::try_from(retry_in_ms).unwrap_or(u32::MAX);
                let timer = Timeout::new(delay, move || {
                    let Some(showcase) = showcase.upgrade() else {
                        return;
                    };
                    showcase.resize_timer.borrow_mut().take();
                    let action = showcase.coalescer.borrow_mut().tick(showcase.now_ms());
                    showcase.apply_resize(action);
                });
                *self.resize_timer.borrow_mut() = Some(timer);
            }
            CoalesceAction::Apply { coalesced } => {
                debug!(coalesced, "viewport resized");
                self.resize_timer.borrow_mut().take();
                self.sticky.refresh();
                self.schedule_layout();
            }
        }
    }

    // ── Infinite scroll ─────────────────────────────────────────────────

    /// Build the observer without observing anything yet.
    fn create_sentinel_observer(self: &Rc<Self>) -> Result<(), ShowcaseError> {
        let showcase = Rc::downgrade(self);
        let callback: ObserverCallback =
            Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                let Some(showcase) = showcase.upgrade() else {
                    return;
                };
                let visible = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .last()
                    .map(|entry| entry.is_intersecting());
                if let Some(visible) = visible {
                    showcase.on_sentinel(visible);
                }
            });

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&self.loader.root_margin());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(|err| {
                    warn!(?err, "failed to create sentinel observer");
                    ShowcaseError::Unsupported("IntersectionObserver")
                })?;
        *self.observer.borrow_mut() = Some(SentinelObserver {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    fn observe_sentinel(&self) {
        if let Some(sentinel) = self.observer.borrow().as_ref() {
            sentinel.observer.observe(&self.anchors.sentinel);
        }
    }

    fn on_sentinel(self: &Rc<Self>, visible: bool) {
        self.sentinel_visible.set(visible);
        let decision = self
            .loader
            .on_sentinel(&mut self.state.borrow_mut(), visible);
        let LoadDecision::Advance(ticket) = decision else {
            return;
        };

        self.append_page(&ticket);
        self.sync_chrome();
        self.schedule_layout();

        let showcase = Rc::downgrade(self);
        let delay = u32::try_from(self.loader.settle_delay().as_millis()).unwrap_or(u32::MAX);
        let timer = Timeout::new(delay, move || {
            if let Some(showcase) = showcase.upgrade() {
                showcase.settle(ticket);
            }
        });
        *self.settle_timer.borrow_mut() = Some(timer);
    }

    fn settle(self: &Rc<Self>, ticket: AdvanceTicket) {
        self.settle_timer.borrow_mut().take();
        self.loader.settle(&mut self.state.borrow_mut(), ticket);
        self.recheck_sentinel();
    }

    /// The observer only reports changes, so a sentinel that never left the
    /// lookahead area needs an explicit second look.
    fn recheck_sentinel(self: &Rc<Self>) {
        let ready = {
            let state = self.state.borrow();
            state.has_more() && !state.is_loading()
        };
        if ready && self.sentinel_visible.get() {
            self.on_sentinel(true);
        }
    }

    // ── Listeners ───────────────────────────────────────────────────────

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();

        let showcase = Rc::downgrade(self);
        listeners.push(EventListener::new(
            &self.anchors.nav,
            "click",
            move |event: &Event| {
                let Some(showcase) = showcase.upgrade() else {
                    return;
                };
                let Some(button) = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(FILTER_BUTTON_SELECTOR).ok().flatten())
                else {
                    return;
                };
                let slug = button_slug(&button);
                if let Err(err) = showcase.select_category(&slug) {
                    warn!(%err, "filter button ignored");
                }
            },
        ));

        if let Some(window) = web_sys::window() {
            let showcase = Rc::downgrade(self);
            listeners.push(EventListener::new(&window, "resize", move |_event| {
                if let Some(showcase) = showcase.upgrade() {
                    showcase.on_resize();
                }
            }));
        }

        *self.listeners.borrow_mut() = listeners;
    }
}

impl Drop for Showcase {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn button_slug(button: &Element) -> String {
    button
        .get_attribute(BUTTON_AREA_ATTR)
        .unwrap_or_else(|| ALL_CATEGORY.to_owned())
}
