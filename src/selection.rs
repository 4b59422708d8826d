//! Selection model
//!
//! Tracks which tree items are selected. Both the status bar and the
//! floating selection pill read this single model.

use std::collections::HashSet;

use crate::engine::{ChangeStatus, ItemId, TreeIndex};

/// How pointer interactions on tree rows are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Selection is a byproduct of other actions (select by status, context menu)
    #[default]
    Implicit,
    /// Clicks on rows toggle membership
    Explicit,
}

/// Set of selected items, insertion-ordered for display
#[derive(Debug, Default)]
pub struct SelectionModel {
    order: Vec<ItemId>,
    members: HashSet<ItemId>,
    mode: SelectionMode,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Unknown ids are ignored.
    ///
    /// Returns whether the selection changed.
    pub fn toggle<T>(&mut self, id: &ItemId, tree: &T) -> bool
    where
        T: TreeIndex + ?Sized,
    {
        if !tree.contains(id) {
            return false;
        }

        if self.members.remove(id) {
            self.order.retain(|member| member != id);
        } else {
            self.members.insert(id.clone());
            self.order.push(id.clone());
        }
        true
    }

    /// Replace the selection with every item whose status is `status`
    pub fn select_all<T>(&mut self, status: ChangeStatus, tree: &T)
    where
        T: TreeIndex + ?Sized,
    {
        self.clear();
        for id in tree.items_by_status(status) {
            if self.members.insert(id.clone()) {
                self.order.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.members.contains(id)
    }

    /// Selected ids in insertion order
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    /// Owned copy of the current selection
    pub fn snapshot(&self) -> Vec<ItemId> {
        self.order.clone()
    }

    /// Drop the given ids from the selection
    pub fn remove_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) {
        let mut removed = false;
        for id in ids {
            removed |= self.members.remove(id);
        }
        if removed {
            let members = &self.members;
            self.order.retain(|id| members.contains(id));
        }
    }

    /// Prune ids that no longer exist after the tree changed
    pub fn retain_known<T>(&mut self, tree: &T)
    where
        T: TreeIndex + ?Sized,
    {
        self.members.retain(|id| tree.contains(id));
        let members = &self.members;
        self.order.retain(|id| members.contains(id));
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch interaction mode. The selection itself is left untouched.
    ///
    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(match self.mode {
            SelectionMode::Implicit => SelectionMode::Explicit,
            SelectionMode::Explicit => SelectionMode::Implicit,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EntryKind, TreeItem};
    use proptest::prelude::*;

    /// Flat tree of files `f0..fN`
    struct FlatTree(Vec<(ItemId, ChangeStatus)>);

    impl FlatTree {
        fn new(statuses: &[ChangeStatus]) -> Self {
            Self(
                statuses
                    .iter()
                    .enumerate()
                    .map(|(i, status)| (ItemId::new(format!("f{i}")), *status))
                    .collect(),
            )
        }
    }

    impl TreeIndex for FlatTree {
        fn contains(&self, id: &ItemId) -> bool {
            self.0.iter().any(|(item, _)| item == id)
        }

        fn items_by_status(&self, status: ChangeStatus) -> Vec<ItemId> {
            self.0
                .iter()
                .filter(|(_, s)| *s == status)
                .map(|(id, _)| id.clone())
                .collect()
        }

        fn items(&self) -> Vec<TreeItem> {
            self.0
                .iter()
                .map(|(id, status)| TreeItem {
                    id: id.clone(),
                    kind: EntryKind::File,
                    status: *status,
                })
                .collect()
        }
    }

    const STATUSES: [ChangeStatus; 6] = [
        ChangeStatus::Added,
        ChangeStatus::Modified,
        ChangeStatus::Removed,
        ChangeStatus::Modified,
        ChangeStatus::Same,
        ChangeStatus::Modified,
    ];

    proptest! {
        #[test]
        fn property_toggle_keeps_odd_counts(toggles in proptest::collection::vec(0usize..8, 0..64)) {
            let tree = FlatTree::new(&STATUSES);
            let mut selection = SelectionModel::new();
            for index in &toggles {
                selection.toggle(&ItemId::new(format!("f{index}")), &tree);
            }

            let expected: HashSet<ItemId> = (0..STATUSES.len())
                .filter(|i| toggles.iter().filter(|t| *t == i).count() % 2 == 1)
                .map(|i| ItemId::new(format!("f{i}")))
                .collect();
            let actual: HashSet<ItemId> = selection.ids().iter().cloned().collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(selection.count(), selection.ids().len());
        }

        #[test]
        fn property_select_all_replaces(prior in proptest::collection::vec(0usize..6, 0..12)) {
            let tree = FlatTree::new(&STATUSES);
            let mut selection = SelectionModel::new();
            for index in prior {
                selection.toggle(&ItemId::new(format!("f{index}")), &tree);
            }

            selection.select_all(ChangeStatus::Modified, &tree);
            prop_assert_eq!(selection.count(), 3);
            prop_assert!(selection.ids().iter().all(|id| tree.items_by_status(ChangeStatus::Modified).contains(id)));
        }
    }

    #[test]
    fn test_toggle_unknown_is_noop() {
        let tree = FlatTree::new(&STATUSES);
        let mut selection = SelectionModel::new();
        assert!(!selection.toggle(&ItemId::from("missing"), &tree));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let tree = FlatTree::new(&STATUSES);
        let mut selection = SelectionModel::new();
        for id in ["f3", "f0", "f5"] {
            selection.toggle(&ItemId::from(id), &tree);
        }
        selection.toggle(&ItemId::from("f0"), &tree);
        assert_eq!(selection.ids(), &[ItemId::from("f3"), ItemId::from("f5")]);
    }

    #[test]
    fn test_clear_and_mode() {
        let tree = FlatTree::new(&STATUSES);
        let mut selection = SelectionModel::new();
        selection.clear();
        assert_eq!(selection.count(), 0);

        selection.toggle(&ItemId::from("f1"), &tree);
        assert!(selection.set_mode(SelectionMode::Explicit));
        assert!(!selection.set_mode(SelectionMode::Explicit));
        assert_eq!(selection.count(), 1);

        selection.toggle_mode();
        assert_eq!(selection.mode(), SelectionMode::Implicit);
        assert!(selection.contains(&ItemId::from("f1")));
    }

    #[test]
    fn test_remove_many_and_retain_known() {
        let tree = FlatTree::new(&STATUSES);
        let mut selection = SelectionModel::new();
        selection.select_all(ChangeStatus::Modified, &tree);
        selection.remove_many([&ItemId::from("f1"), &ItemId::from("f9")]);
        assert_eq!(selection.ids(), &[ItemId::from("f3"), ItemId::from("f5")]);

        let shrunk = FlatTree::new(&STATUSES[..4]);
        selection.retain_known(&shrunk);
        assert_eq!(selection.ids(), &[ItemId::from("f3")]);
    }
}
