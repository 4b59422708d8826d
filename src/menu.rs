//! Overlay requests used by the comparison view
//!
//! Context menu, confirm dialog and help dialog, built from plain data so
//! they can be checked without a terminal.

use tracing::debug;

use crate::action::Action;
use crate::batch::{BatchCommand, BatchOp};
use crate::engine::{ChangeStatus, ItemId, MergeDirection, Side};
use crate::overlay::{CloseReason, MenuEntry, MenuItem, OverlayRequest};
use ratatui::layout::Position;

/// Context menu for a tree row
///
/// `targets` are the items the merge/delete entries act on: the whole
/// selection when the row is part of a multi-selection, otherwise the row.
pub fn context_menu(
    anchor: Position,
    row: &ItemId,
    row_selected: bool,
    targets: &[(ItemId, ChangeStatus)],
    has_selection: bool,
) -> OverlayRequest<Action> {
    let suffix = match targets.len() {
        0 | 1 => String::new(),
        n => format!(" ({n} items)"),
    };
    let command = |op: BatchOp| {
        Action::RequestBatch(BatchCommand::for_items(
            op,
            targets.iter().map(|(id, _)| id.clone()),
        ))
    };

    let merge = |direction: MergeDirection, label: &str| -> MenuEntry<Action> {
        let source = direction.source();
        let enabled = targets
            .iter()
            .any(|(_, status)| *status != ChangeStatus::Same && status.exists_on(source));
        MenuItem::new(format!("{label}{suffix}"), command(BatchOp::Merge(direction)))
            .icon(direction.arrow())
            .disabled(!enabled)
            .into()
    };

    let delete = |side: Side, label: &str| -> MenuEntry<Action> {
        let enabled = targets.iter().any(|(_, status)| status.exists_on(side));
        MenuItem::new(format!("{label}{suffix}"), command(BatchOp::Delete(side)))
            .icon('✕')
            .danger()
            .disabled(!enabled)
            .into()
    };

    let toggle = if row_selected { "Deselect" } else { "Select" };

    let mut entries = vec![
        merge(MergeDirection::LeftToRight, "Merge to right"),
        merge(MergeDirection::RightToLeft, "Merge to left"),
        MenuEntry::Separator,
        delete(Side::Left, "Delete from left"),
        delete(Side::Right, "Delete from right"),
        MenuEntry::Separator,
        MenuItem::new(toggle, Action::ToggleItem(row.clone())).into(),
    ];
    if has_selection {
        entries.push(MenuItem::new("Clear selection", Action::ClearSelection).into());
    }

    OverlayRequest::menu(anchor, entries)
}

/// Confirm dialog whose primary button runs `command`
pub fn confirm_request(command: BatchCommand) -> OverlayRequest<Action> {
    let (title, button) = match command.op() {
        BatchOp::Merge(_) => ("Confirm merge", "Merge"),
        BatchOp::Delete(_) => ("Confirm delete", "Delete"),
    };
    let is_delete = matches!(command.op(), BatchOp::Delete(_));
    let prompt = command.confirm_prompt();
    let description = command.describe();

    let mut confirm = MenuItem::new(button, Action::Batch(command));
    if is_delete {
        confirm = confirm.danger();
    }

    OverlayRequest::modal(
        title,
        vec![prompt],
        vec![confirm.into(), MenuItem::new("Cancel", Action::Dismiss).into()],
    )
    .on_close(move |reason| {
        if reason != CloseReason::Activated {
            debug!("Cancelled {} ({:?})", description, reason);
        }
    })
}

const HELP: &[(&str, &str)] = &[
    ("j/k", "Move cursor"),
    ("Enter", "Expand/collapse folder"),
    ("Space", "Toggle item (select mode)"),
    ("v", "Toggle select mode"),
    ("a/r/m", "Select added/removed/modified"),
    (">/<", "Merge selection right/left"),
    ("L/R", "Delete selection from left/right"),
    ("c", "Context menu"),
    ("Esc", "Close popup"),
    ("?", "This help"),
    ("q", "Quit"),
];

/// Keybinding reference
pub fn help_request() -> OverlayRequest<Action> {
    let body = HELP
        .iter()
        .map(|(key, desc)| format!("{key:>7}  {desc}"))
        .collect();
    OverlayRequest::modal("Help", body, vec![MenuItem::new("Close", Action::Dismiss).into()])
}
