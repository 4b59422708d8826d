//! UI styles
//!
//! Defines consistent styling for the entire application.
//! Status colors follow the usual diff palette: green added, red removed,
//! yellow modified.

use ratatui::style::{Color, Modifier, Style};

use crate::engine::ChangeStatus;
use crate::toast::Severity;

/// Color palette
pub mod colors {
    use ratatui::style::Color;

    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;

    // Change status
    pub const ADDED: Color = Color::Rgb(120, 200, 120);
    pub const REMOVED: Color = Color::Rgb(200, 120, 120);
    pub const MODIFIED: Color = Color::Rgb(220, 190, 110);

    // Bars
    pub const BAR_BG: Color = Color::Rgb(40, 44, 52);
    pub const BAR_FG: Color = Color::Gray;

    // Selection
    pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
    pub const CURSOR_BG: Color = Color::Rgb(80, 80, 100);

    // Borders
    pub const BORDER: Color = Color::DarkGray;
    pub const BORDER_FOCUS: Color = Color::Cyan;

    // Popup
    pub const POPUP_BG: Color = Color::Rgb(30, 34, 42);
    pub const POPUP_BORDER: Color = Color::Cyan;
    pub const DANGER: Color = Color::Rgb(230, 100, 100);

    // Selection pill
    pub const PILL_BG: Color = Color::Rgb(45, 70, 110);

    // Toasts
    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
}

/// Collection of styles used throughout the UI
#[derive(Clone)]
pub struct Styles {
    // Status bar
    pub bar: Style,
    pub bar_label: Style,
    pub bar_key: Style,
    pub bar_disabled: Style,

    // Stats
    pub stats_added: Style,
    pub stats_removed: Style,
    pub stats_modified: Style,

    // Tree
    pub tree_normal: Style,
    pub tree_selected: Style,
    pub tree_cursor: Style,
    pub tree_absent: Style,
    pub folder_icon: Style,

    // Borders
    pub border: Style,
    pub border_focus: Style,

    // Popup
    pub popup: Style,
    pub popup_title: Style,
    pub menu_highlight: Style,
    pub menu_danger: Style,
    pub menu_disabled: Style,

    // Selection pill
    pub pill: Style,
    pub pill_count: Style,

    // Toasts
    pub toast: Style,
    pub toast_leaving: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

impl Styles {
    /// Create a new Styles instance with default values
    pub fn new() -> Self {
        Self {
            // Status bar
            bar: Style::default().bg(colors::BAR_BG).fg(colors::BAR_FG),
            bar_label: Style::default().bg(colors::BAR_BG).fg(colors::FG),
            bar_key: Style::default()
                .bg(colors::BAR_BG)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            bar_disabled: Style::default().bg(colors::BAR_BG).fg(colors::DIM),

            // Stats
            stats_added: Style::default()
                .fg(colors::ADDED)
                .add_modifier(Modifier::BOLD),
            stats_removed: Style::default()
                .fg(colors::REMOVED)
                .add_modifier(Modifier::BOLD),
            stats_modified: Style::default()
                .fg(colors::MODIFIED)
                .add_modifier(Modifier::BOLD),

            // Tree
            tree_normal: Style::default().fg(colors::FG),
            tree_selected: Style::default().bg(colors::SELECTED_BG).fg(colors::FG),
            tree_cursor: Style::default()
                .bg(colors::CURSOR_BG)
                .fg(colors::FG)
                .add_modifier(Modifier::BOLD),
            tree_absent: Style::default().fg(colors::DIM),
            folder_icon: Style::default().fg(colors::DIM),

            // Borders
            border: Style::default().fg(colors::BORDER),
            border_focus: Style::default().fg(colors::BORDER_FOCUS),

            // Popup
            popup: Style::default().bg(colors::POPUP_BG).fg(colors::FG),
            popup_title: Style::default()
                .fg(colors::POPUP_BORDER)
                .add_modifier(Modifier::BOLD),
            menu_highlight: Style::default().bg(colors::SELECTED_BG),
            menu_danger: Style::default().bg(colors::POPUP_BG).fg(colors::DANGER),
            menu_disabled: Style::default()
                .bg(colors::POPUP_BG)
                .fg(colors::DIM)
                .add_modifier(Modifier::DIM),

            // Selection pill
            pill: Style::default().bg(colors::PILL_BG).fg(colors::FG),
            pill_count: Style::default()
                .bg(colors::PILL_BG)
                .fg(colors::FG)
                .add_modifier(Modifier::BOLD),

            // Toasts
            toast: Style::default().bg(colors::POPUP_BG).fg(colors::FG),
            toast_leaving: Style::default()
                .bg(colors::POPUP_BG)
                .fg(colors::DIM)
                .add_modifier(Modifier::DIM),
        }
    }

    /// Foreground style for a change status marker
    pub fn status(&self, status: ChangeStatus) -> Style {
        match status {
            ChangeStatus::Added => self.stats_added,
            ChangeStatus::Removed => self.stats_removed,
            ChangeStatus::Modified => self.stats_modified,
            ChangeStatus::Same => self.tree_absent,
        }
    }

    /// Accent color of a toast border and icon
    pub fn severity(&self, severity: Severity) -> Style {
        let color = match severity {
            Severity::Success => colors::SUCCESS,
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Info => colors::INFO,
        };
        Style::default().bg(colors::POPUP_BG).fg(color)
    }
}
