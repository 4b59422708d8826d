//! UI module
//!
//! Contains all terminal UI components:
//! - Styles for consistent theming
//! - Comparison tree
//! - Status bar and floating selection pill
//! - Overlays (context menu, modal dialogs) and toasts

mod styles;
mod file_tree;
pub mod tree_view;
mod status_bar;
mod selection_pill;
mod overlay;
mod toast;

use ratatui::layout::{Position, Rect};

use crate::action::Action;

pub use styles::Styles;
pub use file_tree::{TreeNode, build_file_tree, flatten_tree};
pub use tree_view::render_tree;
pub use status_bar::render_status_bar;
pub use selection_pill::render_selection_pill;
pub use overlay::render_overlay;
pub use toast::render_toasts;

/// A clickable region produced while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTarget {
    pub area: Rect,
    pub action: Action,
}

/// Action of the target under `pos`, if any
pub fn hit(targets: &[HitTarget], pos: Position) -> Option<&Action> {
    targets
        .iter()
        .find(|target| target.area.contains(pos))
        .map(|target| &target.action)
}
