//! End-to-end scenarios: state, grid synchronizer, loader, and layout wired
//! together over an in-memory host, the way the web frontend wires them over
//! the DOM.

use pretty_assertions::assert_eq;
use showcase_core::card::{ACTION_CLASS, RECORD_KEY_ATTR};
use showcase_core::{
    Bootstrap, CardElement, CardHost, CardMetrics, CardOptions, Category, CategoryFilter,
    GridSynchronizer, LayoutSurface, LoadDecision, ProjectRecord, RecordId, RowHeights,
    ScrollLoader, ShowcaseConfig, ShowcaseState, filter_records, normalize,
};

// ── Fixtures ──────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryGrid {
    children: Vec<(usize, CardElement)>,
    next: usize,
    empty_state_visible: bool,
}

impl MemoryGrid {
    fn keys(&self) -> Vec<String> {
        self.children
            .iter()
            .map(|(_, card)| card.attribute(RECORD_KEY_ATTR).unwrap_or_default().to_owned())
            .collect()
    }
}

impl CardHost for MemoryGrid {
    type Node = usize;

    fn mount_card(&mut self, card: &CardElement) -> Option<usize> {
        self.next += 1;
        self.children.push((self.next, card.clone()));
        Some(self.next)
    }

    fn unmount_card(&mut self, node: usize) {
        self.children.retain(|(n, _)| *n != node);
    }

    fn set_empty_state_visible(&mut self, visible: bool) {
        self.empty_state_visible = visible;
    }
}

fn numbered(n: i64) -> Vec<ProjectRecord> {
    (1..=n)
        .map(|id| ProjectRecord::new(id, format!("Project {id}")).with_service_areas(["reforestation"]))
        .collect()
}

fn bootstrap(records: Vec<ProjectRecord>, page_size: i64) -> Bootstrap {
    Bootstrap::new(
        records,
        page_size,
        vec![
            Category::new("reforestation", "Reforestation"),
            Category::new("carbon-capture", "Carbon Capture"),
            Category::new("solar", "Solar"),
        ],
    )
    .unwrap()
}

fn ids<'a>(records: impl IntoIterator<Item = &'a ProjectRecord>) -> Vec<RecordId> {
    records.into_iter().map(|r| r.id.clone()).collect()
}

fn int_ids(ids: &[i64]) -> Vec<RecordId> {
    ids.iter().copied().map(RecordId::Int).collect()
}

// ── Scenarios ─────────────────────────────────────────────────────────

#[test]
fn scenario_a_ten_records_page_of_three() {
    let mut state = ShowcaseState::new(bootstrap(numbered(10), 3));
    assert_eq!(state.displayed_len(), 3);
    assert!(state.has_more());

    let ticket = state.begin_advance().unwrap();
    assert!(state.finish_advance(ticket));
    assert_eq!(state.displayed_len(), 6);
    assert_eq!(state.current_offset(), 6);

    for _ in 0..3 {
        if let Some(ticket) = state.begin_advance() {
            state.finish_advance(ticket);
        }
    }
    assert_eq!(state.current_offset(), 10);
    assert!(!state.has_more());
    assert_eq!(ids(state.displayed_records()), int_ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]));
}

#[test]
fn scenario_b_filter_preserves_order() {
    let records = vec![
        ProjectRecord::new(1, "One").with_service_areas(["reforestation"]),
        ProjectRecord::new(2, "Two").with_service_areas(["carbon-capture"]),
        ProjectRecord::new(3, "Three").with_service_areas(["reforestation"]),
    ];
    let filtered = filter_records(&records, &CategoryFilter::parse("reforestation"));
    assert_eq!(ids(filtered), int_ids(&[1, 3]));
}

#[test]
fn scenario_c_all_restores_everything() {
    let mut records = numbered(5);
    records[1].service_areas = vec!["solar".into()];
    let mut state = ShowcaseState::new(bootstrap(records, 2));

    state.select_category("solar").unwrap();
    assert_eq!(state.filtered_len(), 1);

    state.select_category("all").unwrap();
    assert_eq!(ids(state.filtered_records()), ids(state.all_records()));
    assert_eq!(state.current_offset(), 2);
    assert_eq!(state.selected_category_label(), "All Projects");
}

#[test]
fn scenario_d_empty_category_shows_empty_state() {
    let mut state = ShowcaseState::new(bootstrap(numbered(4), 2));
    let mut host = MemoryGrid::default();
    let mut grid = GridSynchronizer::new(CardOptions::from(state.config()));
    grid.rebuild(&mut host, state.displayed_records());
    assert!(!host.empty_state_visible);

    state.select_category("carbon-capture").unwrap();
    grid.rebuild(&mut host, state.displayed_records());
    assert_eq!(state.displayed_len(), 0);
    assert!(host.children.is_empty());
    assert!(host.empty_state_visible);
    assert_eq!(state.announcement(), "Showing 0 projects in Carbon Capture");
}

// ── Properties from the controller's contract ─────────────────────────

#[test]
fn reset_is_idempotent() {
    let mut state = ShowcaseState::new(bootstrap(numbered(8), 3));
    state.select_category("reforestation").unwrap();
    let first = state.snapshot();
    state.select_category("reforestation").unwrap();
    assert_eq!(state.snapshot(), first);
}

#[test]
fn near_simultaneous_triggers_mutate_once() {
    let loader = ScrollLoader::default();
    let mut state = ShowcaseState::new(bootstrap(numbered(10), 3));
    let first = loader.on_sentinel(&mut state, true);
    let second = loader.on_sentinel(&mut state, true);
    assert!(matches!(first, LoadDecision::Advance(_)));
    assert_eq!(second, LoadDecision::Busy);
    assert_eq!(state.current_offset(), 6);
}

#[test]
fn grid_follows_filter_and_pagination() {
    let mut records = numbered(7);
    for record in records.iter_mut().skip(3) {
        record.service_areas = vec!["solar".into()];
    }
    let loader = ScrollLoader::default();
    let mut state = ShowcaseState::new(bootstrap(records, 2));
    let mut host = MemoryGrid::default();
    let mut grid = GridSynchronizer::new(CardOptions::from(state.config()));

    grid.rebuild(&mut host, state.displayed_records());
    assert_eq!(host.keys(), vec!["1", "2"]);

    let LoadDecision::Advance(ticket) = loader.on_sentinel(&mut state, true) else {
        panic!("expected advance");
    };
    grid.append(&mut host, state.records_in(ticket.appended()));
    loader.settle(&mut state, ticket);
    assert_eq!(host.keys(), vec!["1", "2", "3", "4"]);

    state.select_category("solar").unwrap();
    grid.rebuild(&mut host, state.displayed_records());
    assert_eq!(host.keys(), vec!["4", "5"]);
    let registry: Vec<RecordId> = grid.ids().cloned().collect();
    assert_eq!(registry, int_ids(&[4, 5]));
}

#[test]
fn action_link_comes_from_configuration_even_on_empty_grid() {
    let config = ShowcaseConfig::default().with_action_link(true, "See project");
    let mut records = numbered(3);
    records.iter_mut().for_each(|r| r.service_areas.clear());
    let mut state = ShowcaseState::new(bootstrap(records, 2).with_config(config));
    let mut host = MemoryGrid::default();
    let mut grid = GridSynchronizer::new(CardOptions::from(state.config()));

    state.select_category("solar").unwrap();
    grid.rebuild(&mut host, state.displayed_records());
    assert!(host.children.is_empty());

    state.select_category("all").unwrap();
    grid.rebuild(&mut host, state.displayed_records());
    let (_, card) = &host.children[0];
    assert_eq!(
        card.find_by_class(ACTION_CLASS).unwrap().text_content(),
        "See project"
    );
}

// ── Layout over a simulated three-column grid ─────────────────────────

struct ColumnGrid {
    columns: usize,
    row_height: f64,
    title_heights: Vec<f64>,
    excerpt_heights: Vec<f64>,
    forced: Vec<Option<RowHeights>>,
}

impl LayoutSurface for ColumnGrid {
    type Card = usize;

    fn visible_cards(&self) -> Vec<usize> {
        (0..self.title_heights.len()).collect()
    }

    fn clear_min_heights(&mut self, card: &usize) {
        self.forced[*card] = None;
    }

    fn measure(&self, card: &usize) -> Option<CardMetrics> {
        let row = (*card / self.columns) as f64;
        // Sub-pixel jitter within a row.
        let jitter = (*card % self.columns) as f64 * 0.3;
        Some(CardMetrics::new(
            row * self.row_height + jitter,
            self.title_heights[*card],
            self.excerpt_heights[*card],
        ))
    }

    fn apply_min_heights(&mut self, card: &usize, heights: RowHeights) {
        self.forced[*card] = Some(heights);
    }
}

#[test]
fn normalization_is_row_local() {
    let mut grid = ColumnGrid {
        columns: 3,
        row_height: 400.0,
        title_heights: vec![20.0, 40.0, 30.0, 20.0, 20.0, 20.0, 25.0],
        excerpt_heights: vec![60.0, 50.0, 70.0, 40.0, 45.0, 40.0, 90.0],
        forced: vec![None; 7],
    };
    let plan = normalize(&mut grid, 5.0);
    assert_eq!(plan.rows, vec![0..3, 3..6, 6..7]);
    let row_one = grid.forced[..3].to_vec();

    grid.excerpt_heights[4] = 400.0;
    grid.title_heights[5] = 300.0;
    normalize(&mut grid, 5.0);
    assert_eq!(grid.forced[..3].to_vec(), row_one);
    assert_eq!(
        grid.forced[3],
        Some(RowHeights {
            title: 300.0,
            excerpt: 400.0
        })
    );
    assert_eq!(grid.forced[6], None);
}
