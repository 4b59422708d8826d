//! In-memory comparison engine
//!
//! Holds the tree described by a [`Snapshot`] and applies merges and
//! deletes to the in-memory statuses. Nothing is written to disk.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::{
    ChangeStatus, DiffEngine, EngineError, EntryKind, ItemId, MergeDirection, Side, Snapshot,
    StatsScope, TreeIndex, TreeItem,
};
use crate::stats::{ChangeStats, FileLineStats};

#[derive(Debug, Clone)]
struct Node {
    kind: EntryKind,
    status: ChangeStatus,
    lines: Option<FileLineStats>,
    locked: bool,
}

#[derive(Debug, Default)]
struct Model {
    nodes: BTreeMap<ItemId, Node>,
}

/// Engine backed by an in-memory tree
#[derive(Debug, Default)]
pub struct MemoryEngine {
    model: Mutex<Model>,
}

impl MemoryEngine {
    /// Build the tree from a validated snapshot, adding implied parent folders
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut nodes = BTreeMap::new();

        for entry in &snapshot.items {
            let lines = match (&entry.diff, entry.added, entry.removed, entry.groups) {
                (Some(diff), ..) => Some(FileLineStats::from_unified(diff.lines())),
                (None, None, None, None) => None,
                (None, added, removed, groups) => Some(FileLineStats {
                    added: added.unwrap_or(0),
                    removed: removed.unwrap_or(0),
                    groups: groups.unwrap_or(0),
                }),
            };
            nodes.insert(
                ItemId::new(entry.path.as_str()),
                Node {
                    kind: entry.kind,
                    status: entry.status,
                    lines: lines.filter(|_| entry.kind == EntryKind::File),
                    locked: entry.locked,
                },
            );
        }

        // Parent folders implied by paths
        let listed: Vec<ItemId> = nodes.keys().cloned().collect();
        for id in listed {
            let mut parent = id.parent();
            while let Some(folder) = parent {
                parent = folder.parent();
                nodes.entry(folder).or_insert(Node {
                    kind: EntryKind::Dir,
                    status: ChangeStatus::Same,
                    lines: None,
                    locked: false,
                });
            }
        }

        debug!("Loaded {} tree nodes", nodes.len());

        Self {
            model: Mutex::new(Model { nodes }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Model> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current status of an item
    #[cfg(test)]
    pub fn status(&self, id: &ItemId) -> Option<ChangeStatus> {
        self.lock().nodes.get(id).map(|node| node.status)
    }
}

impl Model {
    fn subtree<'a>(&'a mut self, root: &'a ItemId) -> impl Iterator<Item = (&'a ItemId, &'a mut Node)> {
        self.nodes
            .iter_mut()
            .filter(move |(id, _)| *id == root || id.is_under(root))
    }

    /// Look up a mutation target, rejecting unknown and locked items
    fn target(&self, id: &ItemId) -> Result<ChangeStatus, EngineError> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| EngineError::UnknownItem(id.clone()))?;

        let locked = self
            .nodes
            .iter()
            .find(|(key, node)| node.locked && (*key == id || key.is_under(id)));
        if let Some((key, _)) = locked {
            return Err(EngineError::Locked(key.clone()));
        }

        Ok(node.status)
    }

    fn merge(&mut self, id: &ItemId, direction: MergeDirection) -> Result<(), EngineError> {
        let status = self.target(id)?;
        let source = direction.source();
        if !status.exists_on(source) {
            return Err(EngineError::Missing {
                id: id.clone(),
                side: source,
            });
        }

        // Copy semantics: items missing from the source side are left alone
        for (_, node) in self.subtree(id) {
            if node.status.exists_on(source) {
                node.status = ChangeStatus::Same;
                node.lines = None;
            }
        }
        Ok(())
    }

    fn delete(&mut self, id: &ItemId, side: Side) -> Result<(), EngineError> {
        let status = self.target(id)?;
        if !status.exists_on(side) {
            return Err(EngineError::Missing { id: id.clone(), side });
        }

        let mut gone = Vec::new();
        for (key, node) in self.subtree(id) {
            if !node.status.exists_on(side) {
                continue;
            }
            node.lines = None;
            node.status = match (side, node.status) {
                (Side::Left, ChangeStatus::Removed) | (Side::Right, ChangeStatus::Added) => {
                    gone.push(key.clone());
                    continue;
                }
                (Side::Left, _) => ChangeStatus::Added,
                (Side::Right, _) => ChangeStatus::Removed,
            };
        }

        for key in gone {
            self.nodes.remove(&key);
        }
        Ok(())
    }
}

/// Compare paths component-wise so children always follow their folder
fn tree_order(a: &ItemId, b: &ItemId) -> std::cmp::Ordering {
    a.as_str().split('/').cmp(b.as_str().split('/'))
}

impl TreeIndex for MemoryEngine {
    fn contains(&self, id: &ItemId) -> bool {
        self.lock().nodes.contains_key(id)
    }

    fn items_by_status(&self, status: ChangeStatus) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .lock()
            .nodes
            .iter()
            .filter(|(_, node)| node.kind == EntryKind::File && node.status == status)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_by(tree_order);
        ids
    }

    fn items(&self) -> Vec<TreeItem> {
        let mut items: Vec<TreeItem> = self
            .lock()
            .nodes
            .iter()
            .map(|(id, node)| TreeItem {
                id: id.clone(),
                kind: node.kind,
                status: node.status,
            })
            .collect();
        items.sort_by(|a, b| tree_order(&a.id, &b.id));
        items
    }
}

#[async_trait]
impl DiffEngine for MemoryEngine {
    fn change_stats(&self, scope: StatsScope<'_>) -> Option<ChangeStats> {
        let model = self.lock();
        let folder = match scope {
            StatsScope::Global => None,
            StatsScope::Folder(id) => match model.nodes.get(id) {
                Some(node) if node.kind == EntryKind::Dir => Some(id),
                _ => return None,
            },
        };

        let mut stats = ChangeStats::default();
        for (id, node) in &model.nodes {
            if node.kind != EntryKind::File {
                continue;
            }
            if folder.is_none_or(|folder| id.is_under(folder)) {
                stats.record(node.status);
            }
        }
        Some(stats)
    }

    fn line_stats(&self, file: &ItemId) -> Option<FileLineStats> {
        self.lock()
            .nodes
            .get(file)
            .filter(|node| node.kind == EntryKind::File)
            .and_then(|node| node.lines)
    }

    async fn merge_item(&self, id: &ItemId, direction: MergeDirection) -> Result<(), EngineError> {
        debug!("Merging {} {}", id, direction.label());
        self.lock().merge(id, direction)
    }

    async fn delete_item(&self, id: &ItemId, side: Side) -> Result<(), EngineError> {
        debug!("Deleting {} from {}", id, side);
        self.lock().delete(id, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(yaml: &str) -> MemoryEngine {
        MemoryEngine::from_snapshot(&Snapshot::from_yaml(yaml).unwrap())
    }

    const TREE: &str = r#"
items:
  - path: added.txt
    status: added
  - path: removed.txt
    status: removed
  - path: modified.txt
    status: modified
  - path: same.txt
    status: same
  - path: sub/a.txt
    status: added
"#;

    #[test]
    fn test_global_and_folder_stats() {
        let engine = engine(TREE);
        assert_eq!(
            engine.change_stats(StatsScope::Global),
            Some(ChangeStats { added: 2, removed: 1, modified: 1 })
        );
        assert_eq!(
            engine.change_stats(StatsScope::Folder(&ItemId::from("sub"))),
            Some(ChangeStats { added: 1, removed: 0, modified: 0 })
        );
        // Files are not folders
        assert_eq!(engine.change_stats(StatsScope::Folder(&ItemId::from("same.txt"))), None);
    }

    #[test]
    fn test_items_are_in_tree_order() {
        let engine = engine(
            "items:\n  - path: src-x/b.txt\n    status: added\n  - path: src/a.txt\n    status: added\n",
        );
        let ids: Vec<String> = engine.items().into_iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["src", "src/a.txt", "src-x", "src-x/b.txt"]);
        assert_eq!(
            engine.items_by_status(ChangeStatus::Added),
            vec![ItemId::from("src/a.txt"), ItemId::from("src-x/b.txt")]
        );
    }

    #[test]
    fn test_status_lookup_matches_file_counts() {
        let engine = engine(
            "items:\n  - path: docs\n    kind: dir\n    status: added\n  - path: src/new.rs\n    status: added\n",
        );
        assert_eq!(engine.items_by_status(ChangeStatus::Added), vec![ItemId::from("src/new.rs")]);
        assert_eq!(engine.change_stats(StatsScope::Global).map(|s| s.added), Some(1));

        let folders_only = self::engine("items:\n  - path: docs\n    kind: dir\n    status: added\n");
        assert!(folders_only.items_by_status(ChangeStatus::Added).is_empty());
        assert_eq!(folders_only.change_stats(StatsScope::Global).map(|s| s.added), Some(0));
    }

    #[test]
    fn test_line_stats_from_diff_text() {
        let engine = engine(
            "items:\n  - path: a.txt\n    status: modified\n    added: 99\n    diff: |\n      --- a/a.txt\n      +++ b/a.txt\n      @@ -1 +1 @@\n      -old\n      +new\n",
        );
        assert_eq!(
            engine.line_stats(&ItemId::from("a.txt")),
            Some(FileLineStats { added: 1, removed: 1, groups: 1 })
        );
    }

    #[tokio::test]
    async fn test_merge_requires_source_side() {
        let engine = engine(TREE);
        let added = ItemId::from("added.txt");

        let err = engine
            .merge_item(&added, MergeDirection::LeftToRight)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::Missing { id: added.clone(), side: Side::Left });

        engine.merge_item(&added, MergeDirection::RightToLeft).await.unwrap();
        assert_eq!(engine.status(&added), Some(ChangeStatus::Same));
    }

    #[tokio::test]
    async fn test_delete_one_side() {
        let engine = engine(TREE);

        engine.delete_item(&ItemId::from("modified.txt"), Side::Left).await.unwrap();
        assert_eq!(engine.status(&ItemId::from("modified.txt")), Some(ChangeStatus::Added));

        // Deleting the only copy drops the item
        engine.delete_item(&ItemId::from("added.txt"), Side::Right).await.unwrap();
        assert!(!engine.contains(&ItemId::from("added.txt")));

        let err = engine.delete_item(&ItemId::from("removed.txt"), Side::Right).await;
        assert!(matches!(err, Err(EngineError::Missing { side: Side::Right, .. })));
    }

    #[tokio::test]
    async fn test_folder_merge_and_locks() {
        let engine = engine(
            r#"
items:
  - path: lib/a.rs
    status: modified
    added: 3
  - path: lib/b.rs
    status: added
  - path: vendor/c.rs
    status: modified
    locked: true
"#,
        );

        engine
            .merge_item(&ItemId::from("lib"), MergeDirection::LeftToRight)
            .await
            .unwrap();
        assert_eq!(engine.status(&ItemId::from("lib/a.rs")), Some(ChangeStatus::Same));
        assert_eq!(engine.line_stats(&ItemId::from("lib/a.rs")), None);
        // Right-only content survives a left-to-right copy
        assert_eq!(engine.status(&ItemId::from("lib/b.rs")), Some(ChangeStatus::Added));

        let err = engine
            .delete_item(&ItemId::from("vendor"), Side::Left)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::Locked(ItemId::from("vendor/c.rs")));

        let err = engine
            .merge_item(&ItemId::from("nope"), MergeDirection::LeftToRight)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownItem(ItemId::from("nope")));
    }
}
