//! Floating selection pill
//!
//! Shows the selection count and the batch buttons over the bottom edge of
//! the tree pane. Hidden while nothing is selected.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use super::styles::colors;
use super::{HitTarget, Styles};
use crate::action::Action;
use crate::engine::{MergeDirection, Side};

fn buttons() -> [(&'static str, Action); 5] {
    [
        ("L→R", Action::RequestMerge(MergeDirection::LeftToRight)),
        ("R→L", Action::RequestMerge(MergeDirection::RightToLeft)),
        ("Del L", Action::RequestDelete(Side::Left)),
        ("Del R", Action::RequestDelete(Side::Right)),
        ("Clear", Action::ClearSelection),
    ]
}

/// Render the pill for `count` selected items and return its click targets
pub fn render_selection_pill(buf: &mut Buffer, area: Rect, count: usize, styles: &Styles) -> Vec<HitTarget> {
    if count == 0 || area.height == 0 {
        return Vec::new();
    }

    let danger = Style::default().bg(colors::PILL_BG).fg(colors::DANGER);
    let mut spans = vec![Span::styled(format!(" {count} Selected "), styles.pill_count)];
    let mut offsets = Vec::new();
    let mut width: u16 = spans[0].content.width() as u16;

    for (label, action) in buttons() {
        spans.push(Span::styled("│", styles.pill));
        width += 1;

        let style = if matches!(action, Action::RequestDelete(_)) { danger } else { styles.pill };
        let text = format!(" {label} ");
        let button_width = text.width() as u16;
        offsets.push((width, button_width, action));
        spans.push(Span::styled(text, style));
        width += button_width;
    }

    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    let y = area.bottom() - 1;
    buf.set_line(x, y, &Line::from(spans), width);

    offsets
        .into_iter()
        .filter(|(offset, button_width, _)| offset + button_width <= width)
        .map(|(offset, button_width, action)| HitTarget {
            area: Rect::new(x + offset, y, button_width, 1),
            action,
        })
        .collect()
}
