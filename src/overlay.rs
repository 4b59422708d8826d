//! Overlay controller
//!
//! Owns the single live floating element (context menu or modal dialog):
//! - Opening, replacing and closing, with one `on_close` call per cycle
//! - Dismissal by outside pointer-down, Escape, or an explicit close
//! - Viewport-safe placement (flip at the right/bottom edge, then clamp)
//! - Hover highlight and activation of menu entries
//!
//! Entries carry plain data actions. Activating one hands the action back
//! to the caller after the overlay has been closed.

use crossterm::event::{KeyCode, MouseButton};
use ratatui::layout::{Position, Rect};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Narrowest popup, borders included
pub const MIN_OVERLAY_WIDTH: u16 = 22;

/// Where a popup is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-left corner at a viewport cell (context menus)
    Anchored(Position),
    /// Centered in the viewport (modal dialogs)
    Centered,
}

/// A clickable menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub label: String,
    pub action: A,
    pub icon: Option<char>,
    pub disabled: bool,
    pub danger: bool,
}

impl<A> MenuItem<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action,
            icon: None,
            disabled: false,
            danger: false,
        }
    }

    pub fn icon(mut self, icon: char) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }
}

/// One row of a popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry<A> {
    Item(MenuItem<A>),
    Separator,
}

impl<A> MenuEntry<A> {
    /// Enabled items only; separators and disabled items are inert
    pub fn is_focusable(&self) -> bool {
        matches!(self, MenuEntry::Item(item) if !item.disabled)
    }

    fn width(&self) -> usize {
        match self {
            MenuEntry::Item(item) => {
                let icon = if item.icon.is_some() { 2 } else { 0 };
                icon + item.label.width()
            }
            MenuEntry::Separator => 0,
        }
    }
}

impl<A> From<MenuItem<A>> for MenuEntry<A> {
    fn from(item: MenuItem<A>) -> Self {
        MenuEntry::Item(item)
    }
}

/// Why an overlay went away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Explicit,
    OutsidePointer,
    Escape,
    Activated,
    Replaced,
    Teardown,
}

type CloseHook = Box<dyn FnOnce(CloseReason)>;

/// A popup waiting to be mounted
pub struct OverlayRequest<A> {
    pub placement: Placement,
    pub title: Option<String>,
    pub body: Vec<String>,
    pub entries: Vec<MenuEntry<A>>,
    on_close: Option<CloseHook>,
}

impl<A> OverlayRequest<A> {
    /// Context menu anchored at a viewport cell
    pub fn menu(anchor: Position, entries: Vec<MenuEntry<A>>) -> Self {
        Self {
            placement: Placement::Anchored(anchor),
            title: None,
            body: Vec::new(),
            entries,
            on_close: None,
        }
    }

    /// Centered dialog with a title, message lines and buttons
    pub fn modal(title: impl Into<String>, body: Vec<String>, entries: Vec<MenuEntry<A>>) -> Self {
        Self {
            placement: Placement::Centered,
            title: Some(title.into()),
            body,
            entries,
            on_close: None,
        }
    }

    /// Callback run once when this overlay is unmounted
    pub fn on_close(mut self, hook: impl FnOnce(CloseReason) + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    fn gap_rows(&self) -> u16 {
        u16::from(!self.body.is_empty() && !self.entries.is_empty())
    }

    /// Natural size, borders included
    fn size(&self) -> (u16, u16) {
        let title = self.title.as_ref().map_or(0, |t| t.width() + 2);
        let body = self.body.iter().map(|line| line.width()).max().unwrap_or(0);
        let entries = self.entries.iter().map(MenuEntry::width).max().unwrap_or(0);
        // borders + one cell of padding on each side
        let content = title.max(body).max(entries) + 4;
        let width = u16::try_from(content).unwrap_or(u16::MAX).max(MIN_OVERLAY_WIDTH);

        let rows = self.body.len() + usize::from(self.gap_rows()) + self.entries.len() + 2;
        let height = u16::try_from(rows).unwrap_or(u16::MAX);
        (width, height)
    }
}

/// Place a `width` x `height` box in `viewport`
///
/// Anchored boxes that would overflow the right or bottom edge open toward
/// the other side of the anchor; the result is then clamped into the viewport.
pub fn place(placement: Placement, width: u16, height: u16, viewport: Rect) -> Rect {
    let width = width.min(viewport.width);
    let height = height.min(viewport.height);

    let (x, y) = match placement {
        Placement::Centered => (
            viewport.x + (viewport.width - width) / 2,
            viewport.y + (viewport.height - height) / 2,
        ),
        Placement::Anchored(anchor) => (
            place_axis(anchor.x, width, viewport.x, viewport.right()),
            place_axis(anchor.y, height, viewport.y, viewport.bottom()),
        ),
    };

    Rect::new(x, y, width, height)
}

fn place_axis(anchor: u16, len: u16, start: u16, end: u16) -> u16 {
    let pos = if anchor.saturating_add(len) > end {
        anchor.saturating_sub(len)
    } else {
        anchor
    };
    pos.min(end.saturating_sub(len)).max(start)
}

/// The mounted popup
pub struct LiveOverlay<A> {
    request: OverlayRequest<A>,
    area: Rect,
    highlight: Option<usize>,
}

impl<A> LiveOverlay<A> {
    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn title(&self) -> Option<&str> {
        self.request.title.as_deref()
    }

    pub fn body(&self) -> &[String] {
        &self.request.body
    }

    pub fn entries(&self) -> &[MenuEntry<A>] {
        &self.request.entries
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn is_modal(&self) -> bool {
        self.request.placement == Placement::Centered
    }

    /// Screen row of entry `index`
    pub fn entry_row(&self, index: usize) -> u16 {
        let body = u16::try_from(self.request.body.len()).unwrap_or(u16::MAX);
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        self.area
            .y
            .saturating_add(1)
            .saturating_add(body)
            .saturating_add(self.request.gap_rows())
            .saturating_add(index)
    }

    /// Entry under a screen position, if any
    fn entry_at(&self, pos: Position) -> Option<usize> {
        let inner = Rect::new(
            self.area.x + 1,
            self.area.y + 1,
            self.area.width.saturating_sub(2),
            self.area.height.saturating_sub(2),
        );
        if !inner.contains(pos) {
            return None;
        }
        (0..self.request.entries.len()).find(|&i| self.entry_row(i) == pos.y)
    }

    fn step_highlight(&mut self, forward: bool) {
        let focusable: Vec<usize> = self
            .request
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_focusable())
            .map(|(i, _)| i)
            .collect();
        if focusable.is_empty() {
            self.highlight = None;
            return;
        }

        let current = self
            .highlight
            .and_then(|h| focusable.iter().position(|&i| i == h));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => focusable.len() - 1,
            (Some(pos), true) => (pos + 1) % focusable.len(),
            (Some(pos), false) => (pos + focusable.len() - 1) % focusable.len(),
        };
        self.highlight = Some(focusable[next]);
    }
}

/// Result of routing an input event through the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayResponse<A> {
    /// Nothing mounted; the event belongs to the caller
    Ignored,
    /// Handled by the overlay, nothing else to do
    Consumed,
    /// The overlay was closed by this event
    Dismissed,
    /// An entry was activated and the overlay closed; run the action
    Activated(A),
}

/// Lifecycle owner for the single live overlay
pub struct OverlayController<A> {
    live: Option<LiveOverlay<A>>,
    on_close: Option<CloseHook>,
}

impl<A> Default for OverlayController<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> OverlayController<A> {
    pub fn new() -> Self {
        Self {
            live: None,
            on_close: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.live.is_some()
    }

    pub fn live(&self) -> Option<&LiveOverlay<A>> {
        self.live.as_ref()
    }

    /// Mount `request`, closing any live overlay first
    pub fn open(&mut self, mut request: OverlayRequest<A>, viewport: Rect) {
        self.unmount(CloseReason::Replaced);

        let (width, height) = request.size();
        let area = place(request.placement, width, height, viewport);
        debug!("Overlay opened at {:?} with {} entries", area, request.entries.len());

        self.on_close = request.on_close.take();
        self.live = Some(LiveOverlay {
            request,
            area,
            highlight: None,
        });
    }

    /// Close the live overlay. No-op when nothing is mounted.
    pub fn close(&mut self) -> bool {
        self.unmount(CloseReason::Explicit).is_some()
    }

    /// Close on host teardown
    pub fn dispose(&mut self) {
        self.unmount(CloseReason::Teardown);
    }

    /// Re-run placement after the viewport changed
    pub fn reposition(&mut self, viewport: Rect) {
        if let Some(live) = self.live.as_mut() {
            let (width, height) = live.request.size();
            live.area = place(live.request.placement, width, height, viewport);
        }
    }

    fn unmount(&mut self, reason: CloseReason) -> Option<OverlayRequest<A>> {
        let live = self.live.take()?;
        debug!("Overlay closed: {:?}", reason);
        if let Some(hook) = self.on_close.take() {
            hook(reason);
        }
        Some(live.request)
    }

    /// Route a key press
    pub fn handle_key(&mut self, code: KeyCode) -> OverlayResponse<A> {
        let Some(live) = self.live.as_mut() else {
            return OverlayResponse::Ignored;
        };

        match code {
            KeyCode::Esc => {
                self.unmount(CloseReason::Escape);
                OverlayResponse::Dismissed
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                live.step_highlight(false);
                OverlayResponse::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                live.step_highlight(true);
                OverlayResponse::Consumed
            }
            KeyCode::Enter | KeyCode::Char(' ') => match live.highlight {
                Some(index) => self.activate(index),
                None => OverlayResponse::Consumed,
            },
            _ => OverlayResponse::Consumed,
        }
    }

    /// Route a pointer press
    ///
    /// Presses inside the popup never leak out; a secondary press inside is
    /// swallowed so it cannot re-open a context menu underneath.
    pub fn pointer_down(&mut self, pos: Position, button: MouseButton) -> OverlayResponse<A> {
        let Some(live) = self.live.as_ref() else {
            return OverlayResponse::Ignored;
        };

        if !live.area.contains(pos) {
            self.unmount(CloseReason::OutsidePointer);
            return OverlayResponse::Dismissed;
        }

        if button != MouseButton::Left {
            return OverlayResponse::Consumed;
        }

        match live.entry_at(pos) {
            Some(index) => self.activate(index),
            None => OverlayResponse::Consumed,
        }
    }

    /// Update the hover highlight. Returns whether it changed.
    pub fn hover(&mut self, pos: Position) -> bool {
        let Some(live) = self.live.as_mut() else {
            return false;
        };

        let target = live
            .entry_at(pos)
            .filter(|&i| live.request.entries[i].is_focusable());
        let changed = live.highlight != target;
        live.highlight = target;
        changed
    }

    fn activate(&mut self, index: usize) -> OverlayResponse<A> {
        let focusable = self
            .live
            .as_ref()
            .and_then(|live| live.request.entries.get(index))
            .is_some_and(MenuEntry::is_focusable);
        if !focusable {
            return OverlayResponse::Consumed;
        }

        match self
            .unmount(CloseReason::Activated)
            .and_then(|request| request.entries.into_iter().nth(index))
        {
            Some(MenuEntry::Item(item)) => OverlayResponse::Activated(item.action),
            _ => OverlayResponse::Dismissed,
        }
    }
}
