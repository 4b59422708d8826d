//! Status bar rendering
//!
//! Displays global, current-folder and current-file stats on the left and
//! the select-by-status triggers plus the selection-mode toggle on the
//! right. Stats the engine has nothing for are left out entirely.

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
use crate::engine::ChangeStatus;
use crate::selection::SelectionMode;
use crate::stats::{ChangeStats, StatsSnapshot};

/// Status bar widget
pub struct StatusBar<'a> {
    pub stats: &'a StatsSnapshot,
    pub mode: SelectionMode,
    pub styles: &'a Styles,
}

/// Spans of one clickable trigger
struct Segment {
    spans: Vec<Span<'static>>,
    action: Option<Action>,
}

impl Segment {
    fn width(&self) -> u16 {
        self.spans.iter().map(|s| s.content.width() as u16).sum()
    }
}

/// Status colors drawn on the bar background
fn on_bar(style: Style) -> Style {
    style.bg(colors::BAR_BG)
}

impl StatusBar<'_> {
    fn counts(&self, label: &str, stats: ChangeStats) -> Vec<Span<'static>> {
        vec![
            Span::styled(format!("{label} "), self.styles.bar_label),
            Span::styled(format!("+{}", stats.added), on_bar(self.styles.stats_added)),
            Span::styled(" ", self.styles.bar),
            Span::styled(format!("-{}", stats.removed), on_bar(self.styles.stats_removed)),
            Span::styled(" ", self.styles.bar),
            Span::styled(format!("~{}", stats.modified), on_bar(self.styles.stats_modified)),
        ]
    }

    fn left(&self) -> Vec<Span<'static>> {
        let mut groups: Vec<Vec<Span<'static>>> = Vec::new();

        if let Some(global) = self.stats.global {
            groups.push(self.counts("all", global));
        }
        if let Some(folder) = self.stats.folder {
            groups.push(self.counts("dir", folder));
        }
        if let Some(file) = self.stats.file {
            groups.push(vec![
                Span::styled("file ", self.styles.bar_label),
                Span::styled(format!("+{}", file.added), on_bar(self.styles.stats_added)),
                Span::styled(" ", self.styles.bar),
                Span::styled(format!("-{}", file.removed), on_bar(self.styles.stats_removed)),
                Span::styled(format!(" in {} groups", file.groups), self.styles.bar),
            ]);
        }

        let mut spans = vec![Span::styled(" ", self.styles.bar)];
        for (i, group) in groups.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", self.styles.bar));
            }
            spans.extend(group);
        }
        spans
    }

    fn triggers(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = ChangeStatus::SELECTABLE
            .iter()
            .map(|&status| {
                let enabled = self.stats.has_any(status);
                let key = status.label()[..1].to_string();
                let (key_style, label_style) = if enabled {
                    (self.styles.bar_key, self.styles.bar)
                } else {
                    (self.styles.bar_disabled, self.styles.bar_disabled)
                };
                Segment {
                    spans: vec![
                        Span::styled(" ", self.styles.bar),
                        Span::styled(key, key_style),
                        Span::styled(format!(" all {} ", status.label()), label_style),
                    ],
                    action: enabled.then_some(Action::SelectByStatus(status)),
                }
            })
            .collect();

        let mode = match self.mode {
            SelectionMode::Implicit => "implicit",
            SelectionMode::Explicit => "explicit",
        };
        segments.push(Segment {
            spans: vec![
                Span::styled(" │ ", self.styles.bar),
                Span::styled("v", self.styles.bar_key),
                Span::styled(format!(" {mode} "), self.styles.bar),
            ],
            action: Some(Action::ToggleSelectionMode),
        });
        segments
    }

    /// The rendered line and the clickable areas inside `area`
    pub fn layout(&self, area: Rect) -> (Line<'static>, Vec<HitTarget>) {
        let mut spans = self.left();
        let left_width: u16 = spans.iter().map(|s| s.content.width() as u16).sum();

        let segments = self.triggers();
        let right_width: u16 = segments.iter().map(Segment::width).sum();

        // Triggers are right-aligned; they follow the stats when space is short
        let padding = area.width.saturating_sub(left_width + right_width);
        spans.push(Span::styled(" ".repeat(padding as usize), self.styles.bar));

        let mut x = area.x + left_width + padding;
        let mut targets = Vec::new();
        for segment in segments {
            let width = segment.width();
            if let Some(action) = segment.action {
                if x + width <= area.right() {
                    targets.push(HitTarget {
                        area: Rect::new(x, area.y, width, 1),
                        action,
                    });
                }
            }
            spans.extend(segment.spans);
            x += width;
        }

        (Line::from(spans), targets)
    }
}

/// Render the status bar and return its click targets
pub fn render_status_bar(
    buf: &mut Buffer,
    area: Rect,
    stats: &StatsSnapshot,
    mode: SelectionMode,
    styles: &Styles,
) -> Vec<HitTarget> {
    if area.height == 0 {
        return Vec::new();
    }

    let bar = StatusBar {
        stats,
        mode,
        styles,
    };
    buf.set_style(Rect::new(area.x, area.y, area.width, 1), styles.bar);
    let (line, targets) = bar.layout(area);
    buf.set_line(area.x, area.y, &line, area.width);
    targets
}
