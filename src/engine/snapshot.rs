//! Comparison snapshot loading
//!
//! A snapshot is the engine's scan result written as YAML: the two roots
//! and one entry per changed (or explicitly listed) item. Parent folders
//! are implied by the entry paths.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::ChangeStatus;

/// Kind of a tree node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Dir,
}

/// One listed item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotEntry {
    /// Path relative to both roots
    pub path: String,
    #[serde(default)]
    pub kind: EntryKind,
    pub status: ChangeStatus,
    /// Lines added (files only)
    pub added: Option<usize>,
    /// Lines removed (files only)
    pub removed: Option<usize>,
    /// Contiguous change regions (files only)
    pub groups: Option<usize>,
    /// Unified diff text; overrides the line counts above when present
    pub diff: Option<String>,
    /// Refuse merge/delete on this item
    #[serde(default)]
    pub locked: bool,
}

/// A full comparison snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    pub left: Option<PathBuf>,
    pub right: Option<PathBuf>,
    #[serde(default)]
    pub items: Vec<SnapshotEntry>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("snapshot entry #{0} has an empty path")]
    EmptyPath(usize),

    #[error("snapshot lists {0} more than once")]
    Duplicate(String),
}

impl Snapshot {
    /// Load and validate a snapshot file
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate snapshot YAML
    pub fn from_yaml(contents: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Snapshot = serde_yaml::from_str(contents)?;

        let mut seen = HashSet::new();
        for (index, entry) in snapshot.items.iter_mut().enumerate() {
            entry.path = entry.path.trim_matches('/').to_string();
            if entry.path.is_empty() {
                return Err(SnapshotError::EmptyPath(index));
            }
            if !seen.insert(entry.path.clone()) {
                return Err(SnapshotError::Duplicate(entry.path.clone()));
            }
        }

        Ok(snapshot)
    }

    /// Short "left ⇄ right" label for the tree pane title
    pub fn title(&self) -> String {
        let name = |root: &Option<PathBuf>, fallback: &str| {
            root.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| fallback.to_string())
        };
        format!("{} ⇄ {}", name(&self.left, "left"), name(&self.right, "right"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = Snapshot::from_yaml(
            r#"
left: /tmp/a
right: /tmp/b
items:
  - path: src/main.rs
    status: modified
    added: 10
    removed: 2
    groups: 3
  - path: /docs/
    kind: dir
    status: added
  - path: vendor/lib.rs
    status: removed
    locked: true
"#,
        )
        .unwrap();

        assert_eq!(snapshot.items.len(), 3);
        assert_eq!(snapshot.items[0].groups, Some(3));
        assert_eq!(snapshot.items[1].path, "docs");
        assert_eq!(snapshot.items[1].kind, EntryKind::Dir);
        assert!(snapshot.items[2].locked);
        assert_eq!(snapshot.title(), "/tmp/a ⇄ /tmp/b");
    }

    #[test]
    fn test_rejects_empty_and_duplicate_paths() {
        let empty = Snapshot::from_yaml("items:\n  - path: /\n    status: added\n");
        assert!(matches!(empty, Err(SnapshotError::EmptyPath(0))));

        let duplicate = Snapshot::from_yaml(
            "items:\n  - path: a.txt\n    status: added\n  - path: a.txt/\n    status: removed\n",
        );
        assert!(matches!(duplicate, Err(SnapshotError::Duplicate(p)) if p == "a.txt"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = Snapshot::from_yaml("items:\n  - path: a.txt\n    status: renamed\n");
        assert!(matches!(result, Err(SnapshotError::Parse(_))));
    }
}
