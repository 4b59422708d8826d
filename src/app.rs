//! Main application struct and event loop
//!
//! Contains the App struct with all application state,
//! and the main event loop for input, batch outcomes and rendering.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    Terminal,
};
use tracing::{debug, info};

use crate::action::Action;
use crate::batch::{BatchCommand, BatchOp, BatchOutcome, BatchWorker};
use crate::config::Config;
use crate::engine::{ChangeStatus, DiffEngine, ItemId, MergeDirection, Side, TreeIndex};
use crate::menu;
use crate::overlay::{OverlayController, OverlayResponse};
use crate::selection::{SelectionMode, SelectionModel};
use crate::stats::StatsSnapshot;
use crate::toast::NotificationQueue;
use crate::ui::{
    self, HitTarget, Styles, TreeNode,
    build_file_tree, flatten_tree,
    render_overlay, render_selection_pill, render_status_bar, render_toasts, render_tree,
    tree_view,
};

const MOUSE_SCROLL_LINES: i32 = 3;

/// Main application state
pub struct App {
    // Window dimensions
    width: u16,
    height: u16,

    // Comparison
    engine: Arc<dyn DiffEngine>,
    title: String,
    config: Config,

    // File tree
    file_tree: Vec<TreeNode>,
    expanded_folders: HashMap<ItemId, bool>,
    cursor: usize,
    scroll: usize,

    // Services
    selection: SelectionModel,
    overlays: OverlayController<Action>,
    toasts: NotificationQueue,
    worker: BatchWorker,

    // Layout from the last frame
    tree_area: Rect,
    hit_targets: Vec<HitTarget>,

    styles: Styles,
}

impl App {
    /// Create a new App instance
    pub fn new(engine: Arc<dyn DiffEngine>, title: String, config: Config) -> Result<Self> {
        let worker = BatchWorker::spawn(Arc::clone(&engine)).context("Failed to start batch worker")?;
        let toasts = NotificationQueue::new(config.toast_timings());

        let mut app = Self {
            width: 0,
            height: 0,
            engine,
            title,
            config,
            file_tree: Vec::new(),
            expanded_folders: HashMap::new(),
            cursor: 0,
            scroll: 0,
            selection: SelectionModel::new(),
            overlays: OverlayController::new(),
            toasts,
            worker,
            tree_area: Rect::default(),
            hit_targets: Vec::new(),
            styles: Styles::new(),
        };

        app.rebuild_tree();

        Ok(app)
    }

    /// Rebuild the displayed tree from the engine, keeping the cursor on the same item
    fn rebuild_tree(&mut self) {
        let current = self.current_node().map(|node| node.id.clone());
        self.file_tree = build_file_tree(&self.engine.items(), &self.expanded_folders);
        match current {
            Some(id) => self.restore_cursor(&id),
            None => self.set_cursor(self.cursor),
        }
    }

    fn viewport(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Run the application
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        info!("Started with {} tree nodes", self.file_tree.len());

        // Main loop
        let result = self.event_loop(&mut terminal);

        // Teardown
        self.overlays.dispose();
        self.toasts.dispose();
        self.worker.shutdown();

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        )?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.drain_outcomes();
            self.settle_toasts(Instant::now());

            // Draw
            terminal.draw(|frame| {
                self.width = frame.area().width;
                self.height = frame.area().height;
                self.render(frame);
            })?;

            // Handle events
            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                    }
                    Event::Resize(w, h) => {
                        self.width = w;
                        self.height = h;
                        let viewport = self.viewport();
                        self.overlays.reposition(viewport);
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Apply finished batches between frames
    fn drain_outcomes(&mut self) {
        let mut changed = false;
        while let Some(outcome) = self.worker.try_next() {
            outcome.apply(&mut self.selection);
            if let Some((message, severity)) = outcome.notification() {
                self.toasts.show(message, severity, None);
            }
            changed |= matches!(outcome, BatchOutcome::Completed(_));
        }

        if changed {
            self.selection.retain_known(&*self.engine);
            self.rebuild_tree();
            // Context menu entries were built against the old tree
            if self.overlays.live().is_some_and(|overlay| !overlay.is_modal()) {
                self.overlays.close();
            }
        }
    }

    /// Expire toasts and drop those whose fade-out has played
    fn settle_toasts(&mut self, now: Instant) {
        self.toasts.tick(now);
        for id in self.toasts.exit_settled(now) {
            self.toasts.finish_exit(id);
        }
    }

    /// Render the application
    fn render(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Layout: tree + status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let tree_area = chunks[0];
        let status_area = chunks[1];
        self.tree_area = tree_area;

        let stats = self.stats();
        let nodes = flatten_tree(&self.file_tree);
        let title = if self.worker.is_busy() {
            format!("{} (working…)", self.title)
        } else {
            self.title.clone()
        };
        let buf = frame.buffer_mut();

        render_tree(
            buf,
            tree_area,
            &nodes,
            self.cursor,
            self.scroll,
            &self.selection,
            &title,
            &self.styles,
        );

        let mut targets = render_selection_pill(buf, tree_area, self.selection.count(), &self.styles);
        targets.extend(render_status_bar(
            buf,
            status_area,
            &stats,
            self.selection.mode(),
            &self.styles,
        ));
        self.hit_targets = targets;

        render_toasts(buf, tree_area, &self.toasts, &self.styles);

        if let Some(overlay) = self.overlays.live() {
            render_overlay(buf, overlay, &self.styles);
        }
    }

    /// Stats for the whole tree, the folder under the cursor and the file under the cursor
    fn stats(&self) -> StatsSnapshot {
        let (folder, file) = match self.current_node() {
            Some(node) if node.is_folder => (Some(node.id.clone()), None),
            Some(node) => (node.id.parent(), Some(node.id.clone())),
            None => (None, None),
        };
        StatsSnapshot::collect(&*self.engine, folder.as_ref(), file.as_ref())
    }

    fn current_node(&self) -> Option<&TreeNode> {
        flatten_tree(&self.file_tree).get(self.cursor).copied()
    }

    fn status_of(&self, id: &ItemId) -> Option<ChangeStatus> {
        self.file_tree
            .iter()
            .find(|node| node.id == *id)
            .map(|node| node.status)
    }

    /// Handle keyboard input. Returns true if app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.overlays.handle_key(key.code) {
            OverlayResponse::Ignored => {}
            OverlayResponse::Activated(action) => {
                self.perform(action);
                return false;
            }
            OverlayResponse::Consumed | OverlayResponse::Dismissed => return false,
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,

            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.set_cursor(0),
            KeyCode::Char('G') | KeyCode::End => self.set_cursor(usize::MAX),
            KeyCode::PageDown => self.move_cursor(self.visible_height() as i32),
            KeyCode::PageUp => self.move_cursor(-(self.visible_height() as i32)),

            KeyCode::Enter => self.toggle_folder(),
            KeyCode::Char(' ') => {
                if self.selection.mode() == SelectionMode::Explicit {
                    if let Some(id) = self.current_node().map(|node| node.id.clone()) {
                        self.perform(Action::ToggleItem(id));
                    }
                } else {
                    self.toggle_folder();
                }
            }

            KeyCode::Char('v') => self.perform(Action::ToggleSelectionMode),
            KeyCode::Char('a') => self.perform(Action::SelectByStatus(ChangeStatus::Added)),
            KeyCode::Char('r') => self.perform(Action::SelectByStatus(ChangeStatus::Removed)),
            KeyCode::Char('m') => self.perform(Action::SelectByStatus(ChangeStatus::Modified)),
            KeyCode::Char('>') => self.perform(Action::RequestMerge(MergeDirection::LeftToRight)),
            KeyCode::Char('<') => self.perform(Action::RequestMerge(MergeDirection::RightToLeft)),
            KeyCode::Char('L') => self.perform(Action::RequestDelete(Side::Left)),
            KeyCode::Char('R') => self.perform(Action::RequestDelete(Side::Right)),

            KeyCode::Char('c') => {
                if let Some(row) = tree_view::node_row(self.tree_area, self.scroll, self.cursor) {
                    self.open_context_menu(Position::new(self.tree_area.x + 4, row));
                }
            }
            KeyCode::Char('?') => {
                let viewport = self.viewport();
                self.overlays.open(menu::help_request(), viewport);
            }
            _ => {}
        }
        false
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Moved => {
                self.overlays.hover(pos);
            }
            MouseEventKind::ScrollDown => {
                if !self.overlays.is_open() {
                    self.scroll_tree(MOUSE_SCROLL_LINES);
                }
            }
            MouseEventKind::ScrollUp => {
                if !self.overlays.is_open() {
                    self.scroll_tree(-MOUSE_SCROLL_LINES);
                }
            }
            MouseEventKind::Down(button) => {
                match self.overlays.pointer_down(pos, button) {
                    OverlayResponse::Ignored => {}
                    OverlayResponse::Activated(action) => {
                        self.perform(action);
                        return;
                    }
                    OverlayResponse::Consumed => return,
                    // A right-click outside re-opens the menu at the new spot
                    OverlayResponse::Dismissed if button == MouseButton::Right => {}
                    OverlayResponse::Dismissed => return,
                }

                match button {
                    MouseButton::Left => self.handle_left_click(pos),
                    MouseButton::Right => self.handle_right_click(pos),
                    MouseButton::Middle => {}
                }
            }
            _ => {}
        }
    }

    fn handle_left_click(&mut self, pos: Position) {
        if let Some(action) = ui::hit(&self.hit_targets, pos).cloned() {
            self.perform(action);
            return;
        }

        let Some(index) = self.row_at(pos) else {
            return;
        };
        self.set_cursor(index);
        if self.selection.mode() == SelectionMode::Explicit {
            if let Some(id) = self.current_node().map(|node| node.id.clone()) {
                self.perform(Action::ToggleItem(id));
            }
        }
    }

    fn handle_right_click(&mut self, pos: Position) {
        if let Some(index) = self.row_at(pos) {
            self.set_cursor(index);
            self.open_context_menu(pos);
        }
    }

    fn row_at(&self, pos: Position) -> Option<usize> {
        tree_view::row_at(self.tree_area, self.scroll, pos)
            .filter(|&index| index < flatten_tree(&self.file_tree).len())
    }

    /// Open the context menu for the cursor row
    fn open_context_menu(&mut self, anchor: Position) {
        let Some(node) = self.current_node() else {
            return;
        };
        let row = node.id.clone();
        let row_selected = self.selection.contains(&row);

        let targets: Vec<(ItemId, ChangeStatus)> = if row_selected && self.selection.count() > 1 {
            self.selection
                .ids()
                .iter()
                .filter_map(|id| self.status_of(id).map(|status| (id.clone(), status)))
                .collect()
        } else {
            vec![(row.clone(), node.status)]
        };

        let request = menu::context_menu(anchor, &row, row_selected, &targets, !self.selection.is_empty());
        let viewport = self.viewport();
        self.overlays.open(request, viewport);
    }

    /// Interpret an action from a key, a menu entry or a button
    fn perform(&mut self, action: Action) {
        debug!("Action: {}", action.describe());

        match action {
            Action::Batch(command) => self.submit(command),
            Action::RequestBatch(command) => self.request_batch(command),
            Action::RequestMerge(direction) => {
                let command = BatchCommand::capture(BatchOp::Merge(direction), &self.selection);
                self.request_batch(command);
            }
            Action::RequestDelete(side) => {
                let command = BatchCommand::capture(BatchOp::Delete(side), &self.selection);
                self.request_batch(command);
            }
            Action::ClearSelection => self.selection.clear(),
            Action::SelectByStatus(status) => {
                self.selection.select_all(status, &*self.engine);
                if self.selection.is_empty() {
                    self.toasts.warning(format!("No {} items", status.label()));
                }
            }
            Action::ToggleSelectionMode => {
                self.selection.toggle_mode();
                self.toasts.info(match self.selection.mode() {
                    SelectionMode::Explicit => "Select mode: click rows to toggle them",
                    SelectionMode::Implicit => "Select mode off",
                });
            }
            Action::ToggleItem(id) => {
                self.selection.toggle(&id, &*self.engine);
            }
            Action::Dismiss => {}
        }
    }

    /// Ask for confirmation when configured, otherwise run right away
    fn request_batch(&mut self, command: BatchCommand) {
        let confirm = match command.op() {
            BatchOp::Merge(_) => self.config.confirm_merge,
            BatchOp::Delete(_) => self.config.confirm_delete,
        };

        if confirm && !command.is_empty() {
            let viewport = self.viewport();
            self.overlays.open(menu::confirm_request(command), viewport);
        } else {
            self.submit(command);
        }
    }

    fn submit(&mut self, command: BatchCommand) {
        if !self.worker.submit(command) {
            self.toasts.error("Batch worker is not running");
        }
    }

    fn visible_height(&self) -> usize {
        self.tree_area.height.saturating_sub(2) as usize
    }

    fn set_cursor(&mut self, index: usize) {
        let total = flatten_tree(&self.file_tree).len();
        if total == 0 {
            self.cursor = 0;
            self.scroll = 0;
            return;
        }

        self.cursor = index.min(total - 1);
        self.ensure_cursor_visible(total);
    }

    fn move_cursor(&mut self, delta: i32) {
        let new_cursor = if delta >= 0 {
            self.cursor.saturating_add(delta as usize)
        } else {
            self.cursor.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.set_cursor(new_cursor);
    }

    fn scroll_tree(&mut self, delta: i32) {
        let total = flatten_tree(&self.file_tree).len();
        let visible = self.visible_height();
        if total <= visible || visible == 0 {
            self.scroll = 0;
            return;
        }

        let max_scroll = total - visible;
        let new_scroll = if delta >= 0 {
            self.scroll.saturating_add(delta as usize)
        } else {
            self.scroll.saturating_sub(delta.unsigned_abs() as usize)
        };

        self.scroll = new_scroll.min(max_scroll);
    }

    fn ensure_cursor_visible(&mut self, total: usize) {
        let visible = self.visible_height();
        if visible == 0 {
            return;
        }

        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + visible {
            self.scroll = self.cursor + 1 - visible;
        }

        self.scroll = self.scroll.min(total.saturating_sub(visible));
    }

    fn toggle_folder(&mut self) {
        let Some(node) = self.current_node() else {
            return;
        };
        if !node.is_folder {
            return;
        }

        let id = node.id.clone();
        let expanded = self.expanded_folders.entry(id.clone()).or_insert(true);
        *expanded = !*expanded;

        self.file_tree = build_file_tree(&self.engine.items(), &self.expanded_folders);
        self.restore_cursor(&id);
    }

    fn restore_cursor(&mut self, id: &ItemId) {
        let nodes = flatten_tree(&self.file_tree);
        let index = nodes
            .iter()
            .position(|node| node.id == *id)
            .unwrap_or(self.cursor);
        self.set_cursor(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryEngine, Snapshot};
    use crate::overlay::MenuEntry;
    use crate::toast::Severity;

    const TREE: &str = r#"
items:
  - path: a.txt
    status: modified
  - path: b.txt
    status: modified
  - path: c.txt
    status: added
"#;

    fn app(config: Config) -> App {
        let snapshot = Snapshot::from_yaml(TREE).unwrap();
        let engine: Arc<dyn DiffEngine> = Arc::new(MemoryEngine::from_snapshot(&snapshot));
        let mut app = App::new(engine, "left ⇄ right".to_string(), config).unwrap();
        // Layout normally recorded by the first frame
        app.width = 80;
        app.height = 24;
        app.tree_area = Rect::new(0, 0, 80, 23);
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(button: MouseButton, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Drain outcomes until every submitted batch has come back
    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.drain_outcomes();
            if !app.worker.is_busy() {
                return;
            }
            assert!(Instant::now() < deadline, "batch did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn label(app: &App, index: usize) -> String {
        match app.overlays.live().map(|live| &live.entries()[index]) {
            Some(MenuEntry::Item(item)) => item.label.clone(),
            other => panic!("expected a menu item, got {:?}", other.is_some()),
        }
    }

    fn toast_messages(app: &App) -> Vec<String> {
        app.toasts.iter().map(|toast| toast.message.clone()).collect()
    }

    #[test]
    fn test_escape_without_overlay_keeps_selection() {
        let mut app = app(Config::default());
        app.perform(Action::SelectByStatus(ChangeStatus::Modified));
        assert_eq!(app.selection.count(), 2);
        assert!(!app.overlays.is_open());

        assert!(!app.handle_key(key(KeyCode::Esc)));
        assert_eq!(app.selection.count(), 2);
        assert!(!app.overlays.is_open());
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_feedback_toasts_for_selection_commands() {
        let mut app = app(Config::default());
        app.perform(Action::SelectByStatus(ChangeStatus::Removed));
        app.perform(Action::ToggleSelectionMode);

        let toasts: Vec<(Severity, String)> = app
            .toasts
            .iter()
            .map(|toast| (toast.severity, toast.message.clone()))
            .collect();
        assert_eq!(
            toasts,
            vec![
                (Severity::Warning, "No removed items".to_string()),
                (Severity::Info, "Select mode: click rows to toggle them".to_string()),
            ]
        );
        assert!(app.selection.is_empty());
    }

    #[test]
    fn test_delete_asks_first_and_runs_on_confirm() {
        let mut app = app(Config::default());

        // Nothing selected: no dialog, and the empty batch stays silent
        app.perform(Action::RequestDelete(Side::Left));
        assert!(!app.overlays.is_open());
        settle(&mut app);
        assert!(app.toasts.is_empty());

        app.perform(Action::SelectByStatus(ChangeStatus::Modified));
        app.perform(Action::RequestDelete(Side::Left));
        let live = app.overlays.live().unwrap();
        assert!(live.is_modal());
        assert_eq!(live.title(), Some("Confirm delete"));
        assert!(!app.worker.is_busy());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.overlays.is_open());
        settle(&mut app);

        assert!(app.selection.is_empty());
        assert_eq!(app.engine.items_by_status(ChangeStatus::Added).len(), 3);
        assert_eq!(toast_messages(&app), vec!["Deleted 2 items from left".to_string()]);
    }

    #[test]
    fn test_cancel_leaves_everything_alone() {
        let mut app = app(Config::default());
        app.perform(Action::SelectByStatus(ChangeStatus::Modified));
        app.perform(Action::RequestMerge(MergeDirection::LeftToRight));
        assert!(app.overlays.is_open());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.overlays.is_open());
        assert!(!app.worker.is_busy());
        assert_eq!(app.selection.count(), 2);
    }

    #[test]
    fn test_merge_without_confirmation_runs_right_away() {
        let mut app = app(Config {
            confirm_merge: false,
            ..Config::default()
        });
        app.perform(Action::SelectByStatus(ChangeStatus::Modified));
        app.perform(Action::RequestMerge(MergeDirection::LeftToRight));
        assert!(!app.overlays.is_open());
        assert!(app.worker.is_busy());

        settle(&mut app);
        assert!(app.selection.is_empty());
        assert!(app.engine.items_by_status(ChangeStatus::Modified).is_empty());
        assert_eq!(toast_messages(&app), vec!["Merged 2 items left-to-right".to_string()]);
    }

    #[test]
    fn test_finished_batch_closes_stale_menu_only() {
        let mut app = app(Config::default());
        let merge_b = BatchCommand::for_items(
            BatchOp::Merge(MergeDirection::LeftToRight),
            [ItemId::from("b.txt")],
        );

        app.handle_mouse(press(MouseButton::Right, 10, 1));
        assert!(app.overlays.live().is_some_and(|live| !live.is_modal()));
        app.submit(merge_b);
        settle(&mut app);
        assert!(!app.overlays.is_open());

        app.perform(Action::SelectByStatus(ChangeStatus::Modified));
        app.perform(Action::RequestDelete(Side::Right));
        assert!(app.overlays.live().is_some_and(|live| live.is_modal()));
        let merge_a = BatchCommand::for_items(
            BatchOp::Merge(MergeDirection::LeftToRight),
            [ItemId::from("a.txt")],
        );
        app.submit(merge_a);
        settle(&mut app);
        assert!(app.overlays.live().is_some_and(|live| live.is_modal()));
    }

    #[test]
    fn test_right_click_outside_reopens_menu_there() {
        let mut app = app(Config::default());

        app.handle_mouse(press(MouseButton::Right, 10, 1));
        let first = app.overlays.live().map(|live| live.area()).unwrap();
        assert_eq!(app.cursor, 0);
        assert_eq!(label(&app, 6), "Select");

        app.handle_mouse(press(MouseButton::Right, 70, 3));
        let second = app.overlays.live().map(|live| live.area()).unwrap();
        assert_ne!(first, second);
        assert_eq!(app.cursor, 2);
        assert_eq!(
            app.overlays.live().map(|live| &live.entries()[6]),
            Some(&MenuEntry::Item(
                crate::overlay::MenuItem::new("Select", Action::ToggleItem(ItemId::from("c.txt")))
            ))
        );

        // A left press outside only dismisses
        app.handle_mouse(press(MouseButton::Left, 5, 2));
        assert!(!app.overlays.is_open());
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_menu_targets_selection_only_from_selected_row() {
        let mut app = app(Config::default());
        app.perform(Action::ToggleItem(ItemId::from("a.txt")));
        app.perform(Action::ToggleItem(ItemId::from("b.txt")));

        app.handle_mouse(press(MouseButton::Right, 10, 1));
        assert_eq!(label(&app, 0), "Merge to right (2 items)");
        assert_eq!(label(&app, 6), "Deselect");

        app.handle_key(key(KeyCode::Esc));
        app.handle_mouse(press(MouseButton::Right, 10, 3));
        assert_eq!(label(&app, 1), "Merge to left");
        assert_eq!(label(&app, 6), "Select");
        assert_eq!(app.selection.count(), 2);
    }
}
