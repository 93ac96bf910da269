//! Grid synchronizer.
//!
//! Keeps the host's grid container in 1:1 correspondence with the displayed
//! records. The synchronizer owns a typed registry of mounted cards (record
//! id, service areas, host node) so that nothing downstream has to re-parse
//! node attributes to find out which record a node belongs to.
//!
//! Two update shapes exist:
//!
//! - [`GridSynchronizer::rebuild`] after a filter change: unmount every card,
//!   mount the new displayed set, update the empty-state indicator.
//! - [`GridSynchronizer::append`] after a pagination advance: mount only the
//!   new cards and leave existing nodes alone.

use tracing::{debug, warn};

use crate::card::{CardElement, CardOptions, render_card};
use crate::record::{ProjectRecord, RecordId};

/// Host side of the grid: the container, the empty-state element, and the
/// means to create and remove card nodes.
pub trait CardHost {
    /// Handle to a mounted card node.
    type Node;

    /// Materialize `card` and append it to the container. `None` if the host
    /// could not create the node (for instance, after teardown).
    fn mount_card(&mut self, card: &CardElement) -> Option<Self::Node>;

    /// Detach `node` from the container.
    fn unmount_card(&mut self, node: Self::Node);

    /// Show or hide the empty-state indicator.
    fn set_empty_state_visible(&mut self, visible: bool);
}

/// Registry entry for one mounted card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedCard<N> {
    pub id: RecordId,
    pub node: N,
}

/// Mounted-card registry plus the options cards are rendered with.
#[derive(Debug)]
pub struct GridSynchronizer<N> {
    options: CardOptions,
    cards: Vec<MountedCard<N>>,
}

impl<N> GridSynchronizer<N> {
    #[must_use]
    pub fn new(options: CardOptions) -> Self {
        Self {
            options,
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &CardOptions {
        &self.options
    }

    /// Mounted cards in grid order.
    #[must_use]
    pub fn cards(&self) -> &[MountedCard<N>] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> + '_ {
        self.cards.iter().map(|card| &card.id)
    }

    /// Replace every mounted card with cards for `records`, in order, then
    /// toggle the empty state. Returns the number of cards mounted.
    pub fn rebuild<'r, H, I>(&mut self, host: &mut H, records: I) -> usize
    where
        H: CardHost<Node = N>,
        I: IntoIterator<Item = &'r ProjectRecord>,
    {
        self.clear(host);
        let mounted = self.mount_all(host, records);
        host.set_empty_state_visible(self.cards.is_empty());
        debug!(mounted, "grid rebuilt");
        mounted
    }

    /// Mount cards for `records` after the existing ones. Returns the number
    /// of cards mounted.
    pub fn append<'r, H, I>(&mut self, host: &mut H, records: I) -> usize
    where
        H: CardHost<Node = N>,
        I: IntoIterator<Item = &'r ProjectRecord>,
    {
        let mounted = self.mount_all(host, records);
        debug!(mounted, total = self.cards.len(), "grid appended");
        mounted
    }

    /// Unmount every card. Used by `rebuild` and on teardown.
    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: CardHost<Node = N>,
    {
        for card in self.cards.drain(..) {
            host.unmount_card(card.node);
        }
    }

    fn mount_all<'r, H, I>(&mut self, host: &mut H, records: I) -> usize
    where
        H: CardHost<Node = N>,
        I: IntoIterator<Item = &'r ProjectRecord>,
    {
        let mut mounted = 0;
        for record in records {
            let card = render_card(record, &self.options);
            match host.mount_card(&card) {
                Some(node) => {
                    self.cards.push(MountedCard {
                        id: record.id.clone(),
                        node,
                    });
                    mounted += 1;
                }
                None => warn!(id = %record.id, "host failed to mount card"),
            }
        }
        mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::RECORD_KEY_ATTR;

    /// Host that records the container's children as record keys.
    #[derive(Default)]
    struct VecHost {
        children: Vec<(u32, String)>,
        next_node: u32,
        empty_visible: Option<bool>,
        refuse: bool,
    }

    impl CardHost for VecHost {
        type Node = u32;

        fn mount_card(&mut self, card: &CardElement) -> Option<u32> {
            if self.refuse {
                return None;
            }
            self.next_node += 1;
            let key = card.attribute(RECORD_KEY_ATTR).unwrap_or_default().to_owned();
            self.children.push((self.next_node, key));
            Some(self.next_node)
        }

        fn unmount_card(&mut self, node: u32) {
            self.children.retain(|(n, _)| *n != node);
        }

        fn set_empty_state_visible(&mut self, visible: bool) {
            self.empty_visible = Some(visible);
        }
    }

    fn records(ids: &[i64]) -> Vec<ProjectRecord> {
        ids.iter()
            .map(|&id| ProjectRecord::new(id, format!("P{id}")))
            .collect()
    }

    fn keys(host: &VecHost) -> Vec<&str> {
        host.children.iter().map(|(_, k)| k.as_str()).collect()
    }

    #[test]
    fn append_keeps_existing_nodes() {
        let mut host = VecHost::default();
        let mut grid = GridSynchronizer::new(CardOptions::default());
        let all = records(&[1, 2, 3, 4]);
        grid.rebuild(&mut host, &all[..2]);
        let first_nodes: Vec<u32> = host.children.iter().map(|(n, _)| *n).collect();

        assert_eq!(grid.append(&mut host, &all[2..]), 2);
        assert_eq!(keys(&host), vec!["1", "2", "3", "4"]);
        assert_eq!(&host.children[..2].iter().map(|(n, _)| *n).collect::<Vec<_>>(), &first_nodes);
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn rebuild_replaces_everything_and_toggles_empty_state() {
        let mut host = VecHost::default();
        let mut grid = GridSynchronizer::new(CardOptions::default());
        let all = records(&[1, 2, 3]);
        grid.rebuild(&mut host, &all);
        assert_eq!(host.empty_visible, Some(false));

        grid.rebuild(&mut host, &all[2..]);
        assert_eq!(keys(&host), vec!["3"]);

        grid.rebuild(&mut host, std::iter::empty());
        assert!(host.children.is_empty());
        assert!(grid.is_empty());
        assert_eq!(host.empty_visible, Some(true));
    }

    #[test]
    fn failed_mounts_are_skipped() {
        let mut host = VecHost {
            refuse: true,
            ..VecHost::default()
        };
        let mut grid = GridSynchronizer::new(CardOptions::default());
        assert_eq!(grid.rebuild(&mut host, &records(&[1])), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn registry_tracks_ids_in_order() {
        let mut host = VecHost::default();
        let mut grid = GridSynchronizer::new(CardOptions::default());
        grid.rebuild(&mut host, &records(&[7, 5]));
        let ids: Vec<_> = grid.ids().cloned().collect();
        assert_eq!(ids, vec![RecordId::Int(7), RecordId::Int(5)]);
        assert_eq!(
            grid.cards(),
            &[
                MountedCard { id: RecordId::Int(7), node: 1 },
                MountedCard { id: RecordId::Int(5), node: 2 },
            ]
        );
    }
}
