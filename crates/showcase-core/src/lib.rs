#![forbid(unsafe_code)]

//! Host-agnostic project showcase engine.
//!
//! `showcase-core` is the platform-independent model behind the filterable,
//! infinitely-scrolling project grid. It owns filter and pagination state,
//! renders cards into a neutral element tree, keeps a registry of mounted
//! cards, and plans row-height normalization, all without touching a DOM.
//! The web frontend (`showcase-web`) feeds it events and measurements and
//! applies its decisions.
//!
//! # Primary responsibilities
//!
//! - **Record**: the project record model and tolerant ingestion.
//! - **Config**: bootstrap payload decoding and validation.
//! - **Filter**: pure category filtering.
//! - **Pagination**: displayed/filtered counts and page advances.
//! - **State**: the single mutable showcase state and its derived views.
//! - **Card**: record → element tree.
//! - **Grid**: rebuild/append synchronization over a host trait.
//! - **Layout**: row detection and per-row height equalization.
//! - **Scroll loader**: sentinel-driven idle/loading machine.
//! - **Sticky**: sticky-on-scroll filter bar machine.
//! - **Coalesce**: resize burst coalescing.
//!
//! # Design principles
//!
//! - **No I/O**: the host supplies events, time, and measurements.
//! - **Deterministic**: identical inputs yield identical state and decisions.
//! - **Explicit ownership**: state is passed to whoever mutates it; there are
//!   no globals.

pub mod card;
pub mod coalesce;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod layout;
pub mod pagination;
pub mod record;
pub mod scroll_loader;
pub mod state;
pub mod sticky;

pub use card::{CardElement, CardNode, CardOptions, render_card};
pub use coalesce::{CoalesceAction, CoalescerConfig, ResizeCoalescer};
pub use config::{Bootstrap, DEFAULT_ACTION_LINK_TEXT, DEFAULT_ALL_LABEL, ShowcaseConfig};
pub use error::{Result, ShowcaseError};
pub use filter::{ALL_CATEGORY, CategoryFilter, filter_indices, filter_records};
pub use grid::{CardHost, GridSynchronizer, MountedCard};
pub use layout::{CardMetrics, LayoutPlan, LayoutSurface, RowHeights, group_rows, normalize, plan_layout};
pub use pagination::PageCursor;
pub use record::{Category, ProjectImage, ProjectRecord, RawProjectRecord, RecordId};
pub use scroll_loader::{LoadDecision, LoaderPhase, ScrollLoader};
pub use state::{AdvanceTicket, ShowcaseSnapshot, ShowcaseState};
pub use sticky::{EdgeState, StickyFilterBar, StickyTransition};
