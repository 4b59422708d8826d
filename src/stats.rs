//! Change statistics
//!
//! Read-only aggregates supplied by the engine and shown in the status bar.

use crate::engine::{ChangeStatus, DiffEngine, ItemId, StatsScope};

/// File counts by change status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl ChangeStats {
    /// Count one file with the given status
    pub fn record(&mut self, status: ChangeStatus) {
        match status {
            ChangeStatus::Added => self.added += 1,
            ChangeStatus::Removed => self.removed += 1,
            ChangeStatus::Modified => self.modified += 1,
            ChangeStatus::Same => {}
        }
    }

    pub fn count(&self, status: ChangeStatus) -> usize {
        match status {
            ChangeStatus::Added => self.added,
            ChangeStatus::Removed => self.removed,
            ChangeStatus::Modified => self.modified,
            ChangeStatus::Same => 0,
        }
    }
}

/// Line-level stats of a single file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileLineStats {
    pub added: usize,
    pub removed: usize,
    /// Contiguous change regions
    pub groups: usize,
}

impl FileLineStats {
    /// Count added/removed lines and `@@` groups of a unified diff
    pub fn from_unified<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut stats = Self::default();
        for line in lines {
            if line.starts_with("@@") {
                stats.groups += 1;
            } else if line.starts_with('+') && !line.starts_with("+++") {
                stats.added += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                stats.removed += 1;
            }
        }
        stats
    }
}

/// The three optional aggregates shown in the status bar
///
/// A missing slot means the engine has nothing for that scope yet; it is
/// omitted from the display rather than shown as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub global: Option<ChangeStats>,
    pub folder: Option<ChangeStats>,
    pub file: Option<FileLineStats>,
}

impl StatsSnapshot {
    /// Query the engine for the global scope, the current folder and the current file
    pub fn collect<E>(engine: &E, folder: Option<&ItemId>, file: Option<&ItemId>) -> Self
    where
        E: DiffEngine + ?Sized,
    {
        Self {
            global: engine.change_stats(StatsScope::Global),
            folder: folder.and_then(|id| engine.change_stats(StatsScope::Folder(id))),
            file: file.and_then(|id| engine.line_stats(id)),
        }
    }

    /// Whether "select all `status`" has anything to select
    ///
    /// Global counts cover files only, as does `TreeIndex::items_by_status`.
    pub fn has_any(&self, status: ChangeStatus) -> bool {
        self.global.is_some_and(|global| global.count(status) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryEngine, Snapshot, TreeIndex};

    #[test]
    fn test_line_stats_from_unified_diff() {
        let diff = [
            "--- a/file.txt",
            "+++ b/file.txt",
            "@@ -1,3 +1,4 @@",
            " same line",
            "-removed line",
            "+added line",
            "+another added line",
        ];
        let stats = FileLineStats::from_unified(diff);
        assert_eq!(stats, FileLineStats { added: 2, removed: 1, groups: 1 });
    }

    #[test]
    fn test_record_ignores_same() {
        let mut stats = ChangeStats::default();
        stats.record(ChangeStatus::Same);
        assert_eq!(stats, ChangeStats::default());
        stats.record(ChangeStatus::Modified);
        assert_eq!(stats.count(ChangeStatus::Modified), 1);
    }

    #[test]
    fn test_collect_leaves_unknown_scopes_empty() {
        let snapshot = Snapshot::from_yaml(
            "items:\n  - path: src/a.rs\n    status: modified\n    added: 4\n    removed: 1\n    groups: 2\n  - path: b.txt\n    status: added\n",
        )
        .unwrap();
        let engine = MemoryEngine::from_snapshot(&snapshot);

        let stats = StatsSnapshot::collect(&engine, None, None);
        assert_eq!(stats.global, Some(ChangeStats { added: 1, removed: 0, modified: 1 }));
        assert_eq!(stats.folder, None);
        assert_eq!(stats.file, None);

        let src = ItemId::from("src");
        let file = ItemId::from("src/a.rs");
        let stats = StatsSnapshot::collect(&engine, Some(&src), Some(&file));
        assert_eq!(stats.folder, Some(ChangeStats { added: 0, removed: 0, modified: 1 }));
        assert_eq!(stats.file, Some(FileLineStats { added: 4, removed: 1, groups: 2 }));
        assert!(stats.has_any(ChangeStatus::Added));
        assert!(!stats.has_any(ChangeStatus::Removed));
    }

    #[test]
    fn test_trigger_enablement_follows_status_lookup() {
        let snapshot = Snapshot::from_yaml(
            "items:\n  - path: docs\n    kind: dir\n    status: added\n  - path: old.txt\n    status: removed\n",
        )
        .unwrap();
        let engine = MemoryEngine::from_snapshot(&snapshot);
        let stats = StatsSnapshot::collect(&engine, None, None);

        for status in ChangeStatus::SELECTABLE {
            assert_eq!(
                stats.has_any(status),
                !engine.items_by_status(status).is_empty(),
                "{status:?}"
            );
        }
        assert!(!stats.has_any(ChangeStatus::Added));
        assert!(stats.has_any(ChangeStatus::Removed));
    }
}
