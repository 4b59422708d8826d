//! User-triggerable actions
//!
//! Plain data carried by menu entries, pill buttons and status-bar triggers.
//! The app interprets them in one place.

use crate::batch::BatchCommand;
use crate::engine::{ChangeStatus, ItemId, MergeDirection, Side};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a captured command right away
    Batch(BatchCommand),
    /// Run a captured command, confirming first if configured
    RequestBatch(BatchCommand),
    /// Merge the current selection, confirming first if configured
    RequestMerge(MergeDirection),
    /// Delete the current selection from one side, confirming first if configured
    RequestDelete(Side),
    ClearSelection,
    SelectByStatus(ChangeStatus),
    ToggleSelectionMode,
    ToggleItem(ItemId),
    /// Close the popup and do nothing else
    Dismiss,
}

impl Action {
    /// Short description for the log
    pub fn describe(&self) -> String {
        match self {
            Action::Batch(command) => command.describe(),
            Action::RequestBatch(command) => format!("request {}", command.describe()),
            Action::RequestMerge(direction) => format!("request merge {}", direction.label()),
            Action::RequestDelete(side) => format!("request delete from {side}"),
            Action::ClearSelection => "clear selection".to_string(),
            Action::SelectByStatus(status) => format!("select all {}", status.label()),
            Action::ToggleSelectionMode => "toggle selection mode".to_string(),
            Action::ToggleItem(id) => format!("toggle {id}"),
            Action::Dismiss => "dismiss".to_string(),
        }
    }
}
