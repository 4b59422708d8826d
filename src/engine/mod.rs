//! Comparison engine interface
//!
//! The engine owns the two compared trees, knows the change status of every
//! item and performs the actual merge/delete mutations. The rest of the crate
//! only consumes it through [`TreeIndex`] and [`DiffEngine`]:
//! - Item identifiers and change vocabulary
//! - Snapshot loading (YAML)
//! - An in-memory engine driven by a snapshot

mod memory;
mod snapshot;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::stats::{ChangeStats, FileLineStats};

pub use memory::MemoryEngine;
pub use snapshot::{EntryKind, Snapshot};

/// Key of a node in the comparison tree (a `/`-separated relative path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path component
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Containing folder, `None` for top-level items
    pub fn parent(&self) -> Option<ItemId> {
        self.0.rsplit_once('/').map(|(parent, _)| ItemId::new(parent))
    }

    /// Whether `self` lies strictly below `folder`
    pub fn is_under(&self, folder: &ItemId) -> bool {
        self.0.len() > folder.0.len()
            && self.0.starts_with(folder.as_str())
            && self.0.as_bytes()[folder.0.len()] == b'/'
    }

    /// Nesting depth, 0 for top-level items
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Change status of an item between the left and right tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// Present on the right only
    Added,
    /// Present on the left only
    Removed,
    /// Present on both sides with different content
    Modified,
    /// Present on both sides, identical
    Same,
}

impl ChangeStatus {
    /// Statuses offered by "select by status"
    pub const SELECTABLE: [ChangeStatus; 3] =
        [ChangeStatus::Added, ChangeStatus::Removed, ChangeStatus::Modified];

    pub fn label(self) -> &'static str {
        match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Removed => "removed",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Same => "same",
        }
    }

    /// Single-character marker used in the tree and status bar
    pub fn glyph(self) -> char {
        match self {
            ChangeStatus::Added => '+',
            ChangeStatus::Removed => '-',
            ChangeStatus::Modified => '!',
            ChangeStatus::Same => ' ',
        }
    }

    pub fn exists_on(self, side: Side) -> bool {
        match side {
            Side::Left => self != ChangeStatus::Added,
            Side::Right => self != ChangeStatus::Removed,
        }
    }
}

/// Direction of a merge (copy across panes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeDirection {
    LeftToRight,
    RightToLeft,
}

impl MergeDirection {
    pub fn label(self) -> &'static str {
        match self {
            MergeDirection::LeftToRight => "left-to-right",
            MergeDirection::RightToLeft => "right-to-left",
        }
    }

    pub fn arrow(self) -> char {
        match self {
            MergeDirection::LeftToRight => '→',
            MergeDirection::RightToLeft => '←',
        }
    }

    /// Side the content is copied from
    pub fn source(self) -> Side {
        match self {
            MergeDirection::LeftToRight => Side::Left,
            MergeDirection::RightToLeft => Side::Right,
        }
    }
}

/// One pane of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scope of an aggregate change count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope<'a> {
    Global,
    Folder(&'a ItemId),
}

/// A node as listed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub id: ItemId,
    pub kind: EntryKind,
    pub status: ChangeStatus,
}

/// Errors reported by engine mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("{id} does not exist on the {side} side")]
    Missing { id: ItemId, side: Side },

    #[error("{0} is locked")]
    Locked(ItemId),
}

/// Read-only view over the comparison tree
pub trait TreeIndex {
    /// Whether `id` currently exists in the tree
    fn contains(&self, id: &ItemId) -> bool;

    /// Every file whose status equals `status`, in tree order
    ///
    /// Folders are left out, matching the file counts of `change_stats`.
    fn items_by_status(&self, status: ChangeStatus) -> Vec<ItemId>;

    /// Every node (files and folders), in tree order
    fn items(&self) -> Vec<TreeItem>;
}

/// The diff/tree engine the presentation layer drives
#[async_trait]
pub trait DiffEngine: TreeIndex + Send + Sync {
    /// Aggregate file counts for a scope, `None` when the scope is unknown
    fn change_stats(&self, scope: StatsScope<'_>) -> Option<ChangeStats>;

    /// Line-level stats of a file, `None` when not available
    fn line_stats(&self, file: &ItemId) -> Option<FileLineStats>;

    /// Copy `id` across panes in `direction`
    async fn merge_item(&self, id: &ItemId, direction: MergeDirection) -> Result<(), EngineError>;

    /// Remove `id` from the `side` pane only
    async fn delete_item(&self, id: &ItemId, side: Side) -> Result<(), EngineError>;
}
