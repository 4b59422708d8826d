//! Toast rendering
//!
//! Stacks active notifications in the top-right corner, oldest on top.
//! Leaving toasts are drawn dimmed until the queue drops them.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::Styles;
use crate::toast::NotificationQueue;

const MAX_TOAST_WIDTH: u16 = 56;
const TOAST_HEIGHT: u16 = 3;

/// Render every toast that fits in `area`
pub fn render_toasts(buf: &mut Buffer, area: Rect, queue: &NotificationQueue, styles: &Styles) {
    let mut y = area.y + 1;

    for toast in queue.iter() {
        if y + TOAST_HEIGHT > area.bottom() {
            break;
        }

        let text = format!("{} {}", toast.severity.icon(), toast.message);
        let width = (text.width() as u16 + 4).min(MAX_TOAST_WIDTH).min(area.width);
        let x = area.right().saturating_sub(width + 1).max(area.x);
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);

        let (accent, body) = if toast.is_leaving() {
            (styles.toast_leaving, styles.toast_leaving)
        } else {
            (styles.severity(toast.severity), styles.toast)
        };

        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(accent)
            .style(body);
        let inner = block.inner(rect);
        block.render(rect, buf);

        let message = truncate(&toast.message, (inner.width as usize).saturating_sub(3));
        let line = Line::from(vec![
            Span::styled(format!(" {} ", toast.severity.icon()), accent),
            Span::styled(message, body),
        ]);
        buf.set_line(inner.x, inner.y, &line, inner.width);

        y += TOAST_HEIGHT;
    }
}

/// Truncate to a display width, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}
