//! File tree structure
//!
//! Builds the displayed tree from the engine's item list, supporting
//! collapsible folders with aggregated change counts.

use std::collections::HashMap;

use crate::engine::{ChangeStatus, EntryKind, ItemId, TreeItem};
use crate::stats::ChangeStats;

/// A node in the file tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: ItemId,
    /// Display name for this node
    pub name: String,
    pub is_folder: bool,
    /// Depth in the tree (for indentation)
    pub depth: usize,
    pub status: ChangeStatus,
    /// Changed files below this folder (empty for files)
    pub changes: ChangeStats,
    /// Whether this folder is expanded
    pub expanded: bool,
}

/// Build the tree from items listed in tree order
pub fn build_file_tree(items: &[TreeItem], expanded_folders: &HashMap<ItemId, bool>) -> Vec<TreeNode> {
    let mut folder_changes: HashMap<ItemId, ChangeStats> = HashMap::new();

    // Every file counts towards each of its ancestors
    for item in items.iter().filter(|item| item.kind == EntryKind::File) {
        let mut parent = item.id.parent();
        while let Some(folder) = parent {
            parent = folder.parent();
            folder_changes.entry(folder).or_default().record(item.status);
        }
    }

    items
        .iter()
        .map(|item| {
            let is_folder = item.kind == EntryKind::Dir;
            TreeNode {
                name: item.id.name().to_string(),
                is_folder,
                depth: item.id.depth(),
                status: item.status,
                changes: if is_folder {
                    folder_changes.get(&item.id).copied().unwrap_or_default()
                } else {
                    ChangeStats::default()
                },
                expanded: expanded_folders.get(&item.id).copied().unwrap_or(true),
                id: item.id.clone(),
            }
        })
        .collect()
}

/// Flatten the tree for display, respecting collapsed folders
pub fn flatten_tree(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    let mut result = Vec::new();
    let mut collapsed: Vec<&ItemId> = Vec::new();

    for node in nodes {
        if collapsed.iter().any(|folder| node.id.is_under(folder)) {
            continue;
        }

        result.push(node);

        if node.is_folder && !node.expanded {
            collapsed.push(&node.id);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(path: &str, kind: EntryKind, status: ChangeStatus) -> TreeItem {
        TreeItem {
            id: ItemId::from(path),
            kind,
            status,
        }
    }

    fn sample() -> Vec<TreeItem> {
        vec![
            item("src", EntryKind::Dir, ChangeStatus::Same),
            item("src/a.rs", EntryKind::File, ChangeStatus::Modified),
            item("src/ui", EntryKind::Dir, ChangeStatus::Same),
            item("src/ui/b.rs", EntryKind::File, ChangeStatus::Added),
            item("z.txt", EntryKind::File, ChangeStatus::Removed),
        ]
    }

    #[test]
    fn test_folder_changes_are_recursive() {
        let tree = build_file_tree(&sample(), &HashMap::new());
        let src = &tree[0];
        assert!(src.is_folder);
        assert_eq!(src.changes, ChangeStats { added: 1, removed: 0, modified: 1 });
        assert_eq!(tree[2].changes, ChangeStats { added: 1, removed: 0, modified: 0 });
        assert_eq!(tree[3].depth, 2);
        assert_eq!(tree[3].name, "b.rs");
    }

    #[test]
    fn test_collapsed_folder_hides_children() {
        let mut expanded = HashMap::new();
        expanded.insert(ItemId::from("src"), false);
        let tree = build_file_tree(&sample(), &expanded);

        let visible: Vec<&str> = flatten_tree(&tree).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(visible, vec!["src", "z.txt"]);
    }
}
