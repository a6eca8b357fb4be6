//! Catalog display ordering.
//!
//! Products carry an optional integer rank. Ranked products come first in
//! ascending rank order, unranked products follow in identifier order.
//!
//! The admin panel edits the order through a [`ReorderDraft`]: a snapshot
//! of the catalog in display order that is renumbered `1..=N` after every
//! move, so the persisted ranks are always dense and unique.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::ProductId;

/// Something that can be placed in display order.
pub trait Ranked {
    /// Identifier type, used as the fallback ordering.
    type Id: Ord;

    /// Explicit rank, lower first.
    fn display_rank(&self) -> Option<i32>;

    /// Stable identifier.
    fn id(&self) -> &Self::Id;
}

/// Compare two items for display.
///
/// - both ranked: ascending rank, ties broken by identifier
/// - one ranked: the ranked item first
/// - neither ranked: identifier order
pub fn compare_display_order<T: Ranked>(a: &T, b: &T) -> Ordering {
    match (a.display_rank(), b.display_rank()) {
        (Some(ra), Some(rb)) => ra.cmp(&rb).then_with(|| a.id().cmp(b.id())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id().cmp(b.id()),
    }
}

/// Sort items into display order in place.
pub fn sort_for_display<T: Ranked>(items: &mut [T]) {
    items.sort_by(compare_display_order);
}

/// Direction for a single-step move in the order manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the front of the catalog.
    Up,
    /// Towards the back of the catalog.
    Down,
}

/// Errors from reorder operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// A drag referenced a position outside the list.
    #[error("position {index} is out of range for {len} items")]
    OutOfRange {
        /// Offending position.
        index: usize,
        /// Number of items in the draft.
        len: usize,
    },
}

/// One row in the order manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    /// Product being ordered.
    pub id: ProductId,
    /// Product name shown in the list.
    pub name: String,
    /// Thumbnail reference.
    pub image_url: String,
    /// Current rank in the draft.
    pub display_rank: Option<i32>,
}

impl From<&Product> for ReorderEntry {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            display_rank: product.display_rank,
        }
    }
}

impl Ranked for ReorderEntry {
    type Id = ProductId;

    fn display_rank(&self) -> Option<i32> {
        self.display_rank
    }

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Editable snapshot of the catalog order.
///
/// Held in the admin's session between requests. Nothing is written to the
/// database until the draft is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderDraft {
    entries: Vec<ReorderEntry>,
    dirty: bool,
}

impl ReorderDraft {
    /// Snapshot `items` in display order.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = ReorderEntry>) -> Self {
        let mut entries: Vec<ReorderEntry> = items.into_iter().collect();
        sort_for_display(&mut entries);
        Self {
            entries,
            dirty: false,
        }
    }

    /// Entries in current draft order.
    #[must_use]
    pub fn entries(&self) -> &[ReorderEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the draft has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any move happened since the draft was loaded.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.dirty
    }

    /// Move the entry at `from` so it ends up at `to`, shifting the rest.
    ///
    /// Dropping an item on itself changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError::OutOfRange`] if either position is past the end.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(ReorderError::OutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.renumber();
        Ok(())
    }

    /// Swap the entry with its predecessor.
    ///
    /// Returns `false` without changing anything if the entry is already
    /// first or is not in the draft.
    pub fn move_up(&mut self, id: &ProductId) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.entries.swap(index, index - 1);
                self.renumber();
                true
            }
            _ => false,
        }
    }

    /// Swap the entry with its successor.
    ///
    /// Returns `false` without changing anything if the entry is already
    /// last or is not in the draft.
    pub fn move_down(&mut self, id: &ProductId) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.entries.len() => {
                self.entries.swap(index, index + 1);
                self.renumber();
                true
            }
            _ => false,
        }
    }

    /// Single-step move in either direction.
    pub fn step(&mut self, id: &ProductId, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.move_up(id),
            Direction::Down => self.move_down(id),
        }
    }

    /// Positional rank each product should be saved with, in draft order.
    #[must_use]
    pub fn assignments(&self) -> Vec<(ProductId, i32)> {
        self.entries
            .iter()
            .zip(1..)
            .map(|(entry, rank): (&ReorderEntry, i32)| (entry.id.clone(), rank))
            .collect()
    }

    /// Drop entries for products that no longer exist.
    ///
    /// Remaining entries are renumbered. Returns how many were removed.
    pub fn remove_products(&mut self, ids: &[ProductId]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !ids.contains(&entry.id));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.renumber();
        }
        removed
    }

    /// Mark the draft as persisted.
    pub const fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    fn renumber(&mut self) {
        for (entry, rank) in self.entries.iter_mut().zip(1..) {
            entry.display_rank = Some(rank);
        }
        self.dirty = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(id: &str, rank: Option<i32>) -> ReorderEntry {
        ReorderEntry {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            image_url: String::new(),
            display_rank: rank,
        }
    }

    fn ids(entries: &[ReorderEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn ranks(draft: &ReorderDraft) -> Vec<Option<i32>> {
        draft.entries().iter().map(|e| e.display_rank).collect()
    }

    #[test]
    fn test_unranked_sort_by_id() {
        let mut items = vec![entry("b", None), entry("a", None)];
        sort_for_display(&mut items);
        assert_eq!(ids(&items), vec!["a", "b"]);
    }

    #[test]
    fn test_ranked_sort_numerically() {
        let mut items = vec![entry("x", Some(2)), entry("y", Some(1))];
        sort_for_display(&mut items);
        assert_eq!(ids(&items), vec!["y", "x"]);
    }

    #[test]
    fn test_ranked_before_unranked() {
        let mut items = vec![
            entry("a", None),
            entry("z", Some(10)),
            entry("m", Some(-1)),
            entry("b", None),
        ];
        sort_for_display(&mut items);
        assert_eq!(ids(&items), vec!["m", "z", "a", "b"]);
    }

    #[test]
    fn test_zero_is_a_real_rank() {
        let mut items = vec![entry("a", Some(1)), entry("b", Some(0)), entry("c", None)];
        sort_for_display(&mut items);
        assert_eq!(ids(&items), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_equal_ranks_fall_back_to_id() {
        let mut items = vec![entry("q", Some(3)), entry("p", Some(3))];
        sort_for_display(&mut items);
        assert_eq!(ids(&items), vec!["p", "q"]);
    }

    #[test]
    fn test_comparator_is_antisymmetric() {
        let items = [
            entry("a", None),
            entry("b", Some(1)),
            entry("c", Some(1)),
            entry("d", Some(0)),
        ];
        for a in &items {
            for b in &items {
                assert_eq!(
                    compare_display_order(a, b),
                    compare_display_order(b, a).reverse()
                );
            }
        }
    }

    #[test]
    fn test_from_items_sorts_and_is_clean() {
        let draft = ReorderDraft::from_items(vec![entry("b", None), entry("a", Some(5))]);
        assert_eq!(ids(draft.entries()), vec!["a", "b"]);
        assert!(!draft.has_changes());
    }

    #[test]
    fn test_drag_renumbers_all() {
        let mut draft = ReorderDraft::from_items(vec![
            entry("a", None),
            entry("b", None),
            entry("c", None),
            entry("d", None),
        ]);
        draft.move_item(3, 1).unwrap();
        assert_eq!(ids(draft.entries()), vec!["a", "d", "b", "c"]);
        assert_eq!(ranks(&draft), vec![Some(1), Some(2), Some(3), Some(4)]);
        assert!(draft.has_changes());
    }

    #[test]
    fn test_drag_forward() {
        let mut draft =
            ReorderDraft::from_items(vec![entry("a", Some(1)), entry("b", Some(2)), entry("c", Some(3))]);
        draft.move_item(0, 2).unwrap();
        assert_eq!(ids(draft.entries()), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_drag_onto_itself_is_noop() {
        let mut draft = ReorderDraft::from_items(vec![entry("a", Some(7)), entry("b", None)]);
        draft.move_item(1, 1).unwrap();
        assert!(!draft.has_changes());
        assert_eq!(ranks(&draft), vec![Some(7), None]);
    }

    #[test]
    fn test_drag_out_of_range() {
        let mut draft = ReorderDraft::from_items(vec![entry("a", None)]);
        assert_eq!(
            draft.move_item(0, 4),
            Err(ReorderError::OutOfRange { index: 4, len: 1 })
        );
        assert!(!draft.has_changes());
    }

    #[test]
    fn test_move_up_and_down() {
        let mut draft =
            ReorderDraft::from_items(vec![entry("a", None), entry("b", None), entry("c", None)]);

        assert!(draft.move_up(&ProductId::new("c")));
        assert_eq!(ids(draft.entries()), vec!["a", "c", "b"]);
        assert_eq!(ranks(&draft), vec![Some(1), Some(2), Some(3)]);

        assert!(draft.step(&ProductId::new("a"), Direction::Down));
        assert_eq!(ids(draft.entries()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_moves_at_edges_are_noops() {
        let mut draft = ReorderDraft::from_items(vec![entry("a", None), entry("b", None)]);
        assert!(!draft.move_up(&ProductId::new("a")));
        assert!(!draft.move_down(&ProductId::new("b")));
        assert!(!draft.move_up(&ProductId::new("missing")));
        assert!(!draft.has_changes());
    }

    #[test]
    fn test_assignments_follow_draft_order() {
        let mut draft = ReorderDraft::from_items(vec![entry("a", None), entry("b", None)]);
        draft.move_item(1, 0).unwrap();
        assert_eq!(
            draft.assignments(),
            vec![(ProductId::new("b"), 1), (ProductId::new("a"), 2)]
        );
        draft.mark_saved();
        assert!(!draft.has_changes());
    }

    #[test]
    fn test_draft_survives_session_serialization() {
        let mut draft = ReorderDraft::from_items(vec![entry("a", None), entry("b", None)]);
        draft.move_item(0, 1).unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        let restored: ReorderDraft = serde_json::from_value(json).unwrap();
        assert_eq!(restored, draft);
    }

    #[test]
    fn test_direction_wire_format() {
        let up: Direction = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(up, Direction::Up);
    }

    #[test]
    fn test_remove_products_renumbers_remaining() {
        let mut draft = ReorderDraft::from_items([entry("a", Some(1)), entry("b", Some(2)), entry("c", Some(3))]);
        draft.move_item(2, 0).unwrap();

        assert_eq!(draft.remove_products(&[ProductId::new("a")]), 1);
        assert_eq!(ids(draft.entries()), vec!["c", "b"]);
        assert_eq!(ranks(&draft), vec![Some(1), Some(2)]);
        assert!(draft.has_changes());
    }

    #[test]
    fn test_remove_unknown_products_changes_nothing() {
        let mut draft = ReorderDraft::from_items([entry("a", None), entry("b", None)]);
        assert_eq!(draft.remove_products(&[ProductId::new("z")]), 0);
        assert!(!draft.has_changes());
        assert_eq!(ranks(&draft), vec![None, None]);
    }
}
