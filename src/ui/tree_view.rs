//! Comparison tree rendering
//!
//! Displays the tree with collapsible folders, per-side presence markers,
//! change status and selection state.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::{Styles, TreeNode};
use crate::engine::{ChangeStatus, Side};
use crate::selection::{SelectionMode, SelectionModel};

/// Maximum visual indentation depth (to prevent deep files from being invisible)
const MAX_VISUAL_INDENT: usize = 6;

/// Tree widget
pub struct TreeView<'a> {
    /// Flattened tree nodes to display
    pub nodes: &'a [&'a TreeNode],
    pub cursor: usize,
    pub scroll: usize,
    pub selection: &'a SelectionModel,
    /// Compared roots, shown in the border
    pub title: &'a str,
    pub focused: bool,
    pub styles: &'a Styles,
}

fn block<'a>(title: String, focused: bool, styles: &Styles) -> Block<'a> {
    let border_style = if focused { styles.border_focus } else { styles.border };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, styles.popup_title))
}

/// Index of the flattened node under a screen position
pub fn row_at(area: Rect, scroll: usize, pos: Position) -> Option<usize> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if !inner.contains(pos) {
        return None;
    }
    Some(scroll + (pos.y - inner.y) as usize)
}

/// Screen row of a flattened node, if it is scrolled into view
pub fn node_row(area: Rect, scroll: usize, index: usize) -> Option<u16> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let offset = index.checked_sub(scroll)?;
    (offset < inner.height as usize).then(|| inner.y + offset as u16)
}

impl TreeView<'_> {
    /// Right-hand columns: folder counts, or presence markers and status
    fn trailer(&self, node: &TreeNode, style: ratatui::style::Style) -> Vec<Span<'static>> {
        if node.is_folder {
            let changes = node.changes;
            return vec![
                Span::styled(format!("+{}", changes.added), self.styles.stats_added),
                Span::styled(" ", style),
                Span::styled(format!("-{}", changes.removed), self.styles.stats_removed),
                Span::styled(" ", style),
                Span::styled(format!("~{}", changes.modified), self.styles.stats_modified),
            ];
        }

        let presence = |side: Side| {
            if node.status.exists_on(side) {
                Span::styled(side.label()[..1].to_uppercase(), style)
            } else {
                Span::styled("·", self.styles.tree_absent)
            }
        };
        let status = match node.status {
            ChangeStatus::Same => "same",
            other => other.label(),
        };
        vec![
            presence(Side::Left),
            Span::styled(" ", style),
            presence(Side::Right),
            Span::styled(" ", style),
            Span::styled(format!("{status:>8}"), self.styles.status(node.status)),
        ]
    }
}

impl Widget for TreeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.selection.mode() == SelectionMode::Explicit {
            format!(" {} [select] ", self.title)
        } else {
            format!(" {} ", self.title)
        };
        let block = block(title, self.focused, self.styles);
        let inner = block.inner(area);
        block.render(area, buf);

        let visible_height = inner.height as usize;
        let explicit = self.selection.mode() == SelectionMode::Explicit;

        for (i, node) in self.nodes.iter().skip(self.scroll).take(visible_height).enumerate() {
            let y = inner.y + i as u16;

            let is_cursor = i + self.scroll == self.cursor;
            let is_selected = self.selection.contains(&node.id);
            let style = match (is_cursor, is_selected) {
                (true, _) => self.styles.tree_cursor,
                (false, true) => self.styles.tree_selected,
                (false, false) => self.styles.tree_normal,
            };

            let mut spans = Vec::new();

            let visual_depth = node.depth.min(MAX_VISUAL_INDENT);
            spans.push(Span::styled("  ".repeat(visual_depth), style));

            if node.depth > MAX_VISUAL_INDENT {
                spans.push(Span::styled(
                    format!("{}·", node.depth - MAX_VISUAL_INDENT),
                    self.styles.tree_absent,
                ));
            }

            if explicit {
                let checkbox = if is_selected { "[x] " } else { "[ ] " };
                spans.push(Span::styled(checkbox, style));
            } else if is_selected {
                spans.push(Span::styled("● ", style));
            }

            if node.is_folder {
                let icon = if node.expanded { "▼ " } else { "▶ " };
                spans.push(Span::styled(icon, self.styles.folder_icon));
            } else {
                spans.push(Span::styled(format!("{} ", node.status.glyph()), self.styles.status(node.status)));
            }

            let trailer = self.trailer(node, style);
            let trailer_width: usize = trailer.iter().map(|s| s.content.width()).sum();
            let lead_width: usize = spans.iter().map(|s| s.content.width()).sum();

            let max_name_width = (inner.width as usize).saturating_sub(lead_width + trailer_width + 1);
            let name = smart_truncate(&node.name, max_name_width);
            let name_width = name.width();
            spans.push(Span::styled(name, style));

            let padding = (inner.width as usize).saturating_sub(lead_width + name_width + trailer_width);
            spans.push(Span::styled(" ".repeat(padding), style));
            spans.extend(trailer);

            let line = Line::from(spans);
            buf.set_line(inner.x, y, &line, inner.width);

            if is_cursor || is_selected {
                for x in inner.x..inner.x + inner.width {
                    let cell = &mut buf[(x, y)];
                    cell.set_bg(style.bg.unwrap_or_default());
                }
            }
        }
    }
}

/// Smart truncate: shows beginning…end so extensions stay visible
///
/// "very_long_filename.tsx" with max 12 becomes "very_lo…e.tsx"-style output
/// rather than losing the extension.
fn smart_truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    if max_width < 5 {
        return s.chars().take(max_width).collect();
    }

    let available = max_width - 1;
    // More room for the beginning, where the unique part usually is
    let prefix_len = (available * 2) / 3;
    let suffix_len = available - prefix_len;

    let prefix: String = s.chars().take(prefix_len).collect();
    let suffix: String = s
        .chars()
        .rev()
        .take(suffix_len)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("{prefix}…{suffix}")
}

/// Render the tree pane
pub fn render_tree(
    buf: &mut Buffer,
    area: Rect,
    nodes: &[&TreeNode],
    cursor: usize,
    scroll: usize,
    selection: &SelectionModel,
    title: &str,
    styles: &Styles,
) {
    let tree = TreeView {
        nodes,
        cursor,
        scroll,
        selection,
        title,
        focused: true,
        styles,
    };
    tree.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EntryKind, ItemId, TreeItem};
    use crate::ui::build_file_tree;
    use std::collections::HashMap;

    #[test]
    fn test_smart_truncate_keeps_extension() {
        assert_eq!(smart_truncate("short.rs", 20), "short.rs");
        let truncated = smart_truncate("very_long_filename.tsx", 12);
        assert_eq!(truncated.chars().count(), 12);
        assert!(truncated.ends_with(".tsx"));
        assert!(truncated.contains('…'));
    }

    #[test]
    fn test_row_hit_testing() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(row_at(area, 0, Position::new(5, 0)), None);
        assert_eq!(row_at(area, 0, Position::new(5, 1)), Some(0));
        assert_eq!(row_at(area, 3, Position::new(5, 4)), Some(6));
        assert_eq!(node_row(area, 3, 6), Some(4));
        assert_eq!(node_row(area, 3, 2), None);
    }

    #[test]
    fn test_selected_rows_show_checkbox_in_explicit_mode() {
        let items = vec![
            TreeItem { id: ItemId::from("a.txt"), kind: EntryKind::File, status: ChangeStatus::Added },
            TreeItem { id: ItemId::from("b.txt"), kind: EntryKind::File, status: ChangeStatus::Removed },
        ];
        let tree = build_file_tree(&items, &HashMap::new());
        let nodes: Vec<&TreeNode> = tree.iter().collect();

        struct Known;
        impl crate::engine::TreeIndex for Known {
            fn contains(&self, _id: &ItemId) -> bool {
                true
            }
            fn items_by_status(&self, _status: ChangeStatus) -> Vec<ItemId> {
                Vec::new()
            }
            fn items(&self) -> Vec<TreeItem> {
                Vec::new()
            }
        }

        let mut selection = SelectionModel::new();
        selection.set_mode(SelectionMode::Explicit);
        selection.toggle(&ItemId::from("b.txt"), &Known);

        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        render_tree(&mut buf, area, &nodes, 0, 0, &selection, "l ⇄ r", &Styles::new());

        let row = |y: u16| -> String { (0..40).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(1).contains("[ ] + a.txt"), "{}", row(1));
        assert!(row(2).contains("[x] - b.txt"), "{}", row(2));
        assert!(row(2).contains("L ·  removed"), "{}", row(2));
        assert!(row(0).contains("[select]"));
    }
}
