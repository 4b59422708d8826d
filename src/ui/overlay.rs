//! Overlay rendering
//!
//! Draws the live context menu or modal dialog on top of everything else.

use ratatui::{
    buffer::Buffer,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use super::Styles;
use crate::overlay::{LiveOverlay, MenuEntry};

/// Render the mounted overlay at the area the controller placed it
pub fn render_overlay<A>(buf: &mut Buffer, overlay: &LiveOverlay<A>, styles: &Styles) {
    let area = overlay.area();

    Clear.render(area, buf);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.border_focus)
        .style(styles.popup);
    if let Some(title) = overlay.title() {
        block = block.title(Span::styled(format!(" {} ", title), styles.popup_title));
    }

    let inner = block.inner(area);
    block.render(area, buf);

    for (i, text) in overlay.body().iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.bottom() {
            return;
        }
        buf.set_line(inner.x, y, &Line::styled(format!(" {text}"), styles.popup), inner.width);
    }

    for (i, entry) in overlay.entries().iter().enumerate() {
        let y = overlay.entry_row(i);
        if y >= inner.bottom() {
            break;
        }

        let item = match entry {
            MenuEntry::Separator => {
                buf.set_line(
                    inner.x,
                    y,
                    &Line::styled("─".repeat(inner.width as usize), styles.border),
                    inner.width,
                );
                continue;
            }
            MenuEntry::Item(item) => item,
        };

        let mut style = if item.disabled {
            styles.menu_disabled
        } else if item.danger {
            styles.menu_danger
        } else {
            styles.popup
        };
        let highlighted = overlay.highlight() == Some(i);
        if highlighted {
            style = style.patch(styles.menu_highlight);
        }

        let icon = item.icon.map(|c| format!("{c} ")).unwrap_or_default();
        let line = Line::styled(format!(" {icon}{}", item.label), style);
        buf.set_line(inner.x, y, &line, inner.width);

        if highlighted {
            for x in inner.x..inner.right() {
                buf[(x, y)].set_style(styles.menu_highlight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{MenuItem, OverlayController, OverlayRequest};
    use crossterm::event::KeyCode;
    use ratatui::layout::{Position, Rect};

    #[test]
    fn test_menu_renders_entries_and_highlight() {
        let mut overlays = OverlayController::new();
        let entries = vec![
            MenuItem::new("Merge to right", 1).icon('→').into(),
            MenuEntry::Separator,
            MenuItem::new("Delete from left", 2).danger().into(),
        ];
        let viewport = Rect::new(0, 0, 60, 20);
        overlays.open(OverlayRequest::menu(Position::new(3, 2), entries), viewport);
        overlays.handle_key(KeyCode::Down);

        let mut buf = Buffer::empty(viewport);
        let live = overlays.live().unwrap();
        render_overlay(&mut buf, live, &Styles::new());

        let row = |y: u16| -> String { (0..60).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(live.entry_row(0)).contains("→ Merge to right"));
        assert!(row(live.entry_row(1)).contains("───"));
        assert!(row(live.entry_row(2)).contains("Delete from left"));
        assert_eq!(
            buf[(live.area().x + 2, live.entry_row(0))].bg,
            Styles::new().menu_highlight.bg.unwrap()
        );
    }

    #[test]
    fn test_modal_renders_title_and_body() {
        let mut overlays: OverlayController<u8> = OverlayController::new();
        let request = OverlayRequest::modal(
            "Confirm delete",
            vec!["Delete 2 items from the left side?".to_string()],
            vec![MenuItem::new("Delete", 1).into(), MenuItem::new("Cancel", 0).into()],
        );
        let viewport = Rect::new(0, 0, 80, 24);
        overlays.open(request, viewport);

        let mut buf = Buffer::empty(viewport);
        let live = overlays.live().unwrap();
        render_overlay(&mut buf, live, &Styles::new());

        let area = live.area();
        let row = |y: u16| -> String { (area.x..area.right()).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(area.y).contains(" Confirm delete "));
        assert!(row(area.y + 1).contains("Delete 2 items from the left side?"));
        assert!(row(live.entry_row(1)).contains("Cancel"));
    }
}
