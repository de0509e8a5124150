//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA): events flow through
//! [`App::update`], and [`App::view`] draws the current state. The keyboard
//! acts as the drag sensor: `m` picks a row up, moving the cursor chooses the
//! drop position and `enter` drops it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use serde_json::Value;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::data::apply_order_updates;
use crate::events::{key_name, Event, KeyAction, KeyBindings, KeyContext};
use crate::table::{
    format_value, CheckboxProps, ColumnConfig, Debouncer, DragResult, DraggableConfig,
    NativeEvent, Record, RowAction, RowEvent, RowKey, RowKeySpec, RowSelectionConfig,
    SelectionStatus, SelectionType, Table, Throttle, Viewport,
};
use crate::ui::{render_context_help, NotificationManager, NotificationType, TableView};

/// Messages pushed by table callbacks, drained into toasts after each event.
type Feed = Rc<RefCell<Vec<(NotificationType, String)>>>;

/// Options chosen on the command line.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Record field used as the row key.
    pub row_key: Option<String>,
    /// Single-row selection.
    pub radio: bool,
    /// Turn reordering off regardless of the configuration.
    pub no_drag: bool,
}

/// The main application struct that holds all state.
pub struct App {
    should_quit: bool,
    table: Table<Value>,
    view: TableView,
    viewport: Viewport,
    keys: KeyBindings,
    resize_debounce: Option<Debouncer<u16>>,
    drag_throttle: Throttle,
    notifications: NotificationManager,
    feed: Feed,
    last_reorder: Option<String>,
}

impl App {
    /// Create the application for a terminal `width` cells wide.
    pub fn new(
        config: &Config,
        columns: Vec<ColumnConfig<Value>>,
        records: Vec<Value>,
        options: &AppOptions,
        width: u16,
    ) -> Self {
        debug!(rows = records.len(), ?options, "Creating application");
        let feed: Feed = Rc::default();
        let viewport = Viewport::new(config.cell_breakpoints(), u32::from(width));

        let mut selection = selection_config(&feed);
        if options.radio {
            selection = selection.selection_type(SelectionType::Radio);
        }
        let row_key = options
            .row_key
            .as_ref()
            .map_or(RowKeySpec::Auto, |field| RowKeySpec::field(field.clone()));

        let mut table = Table::new(columns, records)
            .with_settings(config.settings.clone())
            .row_key(row_key)
            .row_selection(selection)
            .draggable(drag_config(&feed).enabled(config.drag.enabled && !options.no_drag))
            .on_data_change(|items: &[Value]| info!(rows = items.len(), "Rows reordered"))
            .on_row(row_handler(&feed));
        table.set_breakpoint(viewport.breakpoint());

        let settings = &config.settings;
        Self {
            should_quit: false,
            table,
            view: TableView::new(),
            viewport,
            keys: KeyBindings::new(settings.vim_mode),
            resize_debounce: settings
                .resize_debounce_ms
                .map(|ms| Debouncer::new(Duration::from_millis(ms))),
            drag_throttle: Throttle::new(Duration::from_millis(settings.drag_repeat_ms)),
            notifications: NotificationManager::new(),
            feed,
            last_reorder: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn table(&self) -> &Table<Value> {
        &self.table
    }

    pub fn cursor(&self) -> usize {
        self.view.cursor()
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    fn key_context(&self) -> KeyContext {
        if self.table.is_dragging() {
            KeyContext::Moving
        } else {
            KeyContext::Browsing
        }
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        let now = Instant::now();
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event, now);
            }
            Event::Click { column, row } => self.handle_click(RowEvent::Click { column, row }),
            Event::ContextClick { column, row } => {
                self.handle_click(RowEvent::ContextMenu { column, row })
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
                match self.resize_debounce.as_mut() {
                    Some(debounce) => debounce.push(width, now),
                    None => self.apply_resize(width),
                }
            }
            Event::Tick => self.handle_tick(now),
        }
        self.drain_feed();
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) {
        let context = self.key_context();
        let Some(action) = self.keys.action_for(&key_event, context) else {
            return;
        };
        let len = self.table.len();
        let is_move = matches!(
            action,
            KeyAction::MoveUp | KeyAction::MoveDown | KeyAction::First | KeyAction::Last
        );
        if is_move && context == KeyContext::Moving && !self.drag_throttle.try_fire(now) {
            return;
        }

        match action {
            KeyAction::MoveUp => self.view.move_up(len),
            KeyAction::MoveDown => self.view.move_down(len),
            KeyAction::First => self.view.first(len),
            KeyAction::Last => self.view.last(len),
            KeyAction::ToggleRow => {
                let event = NativeEvent::Key(key_name(&key_event));
                self.table.toggle_row(self.view.cursor(), &event);
            }
            KeyAction::ToggleAll => {
                if !self.table.toggle_all() {
                    self.notifications
                        .warning("Select all is only available with checkboxes");
                }
            }
            KeyAction::ClearSelection => self.table.clear_selection(),
            KeyAction::StartMove => self.start_move(),
            KeyAction::Drop => self.drop_at_cursor(),
            KeyAction::CancelMove => {
                self.table.drag_cancel();
            }
            KeyAction::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
        }
    }

    /// Move the cursor to the row under the pointer and hand the event to
    /// the table's row handler. While a row is picked up the pointer only
    /// chooses the drop position.
    fn handle_click(&mut self, event: RowEvent) {
        let (column, row) = event.position();
        let Some(index) = self.view.row_at(column, row).filter(|i| *i < self.table.len()) else {
            return;
        };
        self.view.set_cursor(index, self.table.len());
        if !self.table.is_dragging() {
            self.table.row_event(index, &event);
        }
    }

    fn handle_tick(&mut self, now: Instant) {
        if let Some(width) = self.resize_debounce.as_mut().and_then(|d| d.poll(now)) {
            self.apply_resize(width);
        }
        self.notifications.tick(now);
    }

    fn apply_resize(&mut self, width: u16) {
        if self.viewport.resize(u32::from(width)) {
            self.table.set_breakpoint(self.viewport.breakpoint());
        }
    }

    fn start_move(&mut self) {
        let Some(key) = self.table.key_at(self.view.cursor()) else {
            return;
        };
        if !self.table.drag_start(key) {
            self.notifications.warning("Reordering is disabled");
        }
    }

    /// Drop the picked-up row at the cursor and renumber the `order` field.
    fn drop_at_cursor(&mut self) {
        let Some(active) = self.table.active_id().cloned() else {
            return;
        };
        let over = self.table.key_at(self.view.cursor());
        let Some(result) = self.table.drag_end(&active, over.as_ref()) else {
            return;
        };

        let updates = result.order_updates(self.table.row_key_spec());
        let mut records = self.table.data().to_vec();
        apply_order_updates(&mut records, &updates, self.table.row_key_spec());
        self.table.set_data(records);

        self.view.set_cursor(result.new_index, self.table.len());
        self.last_reorder = Some(format!(
            "moved {} {}→{}",
            active,
            result.old_index + 1,
            result.new_index + 1
        ));
    }

    fn drain_feed(&mut self) {
        for (kind, message) in self.feed.borrow_mut().drain(..) {
            match kind {
                NotificationType::Info => self.notifications.info(message),
                NotificationType::Success => self.notifications.success(message),
                NotificationType::Warning => self.notifications.warning(message),
            }
        }
    }

    /// Status line: selection count and state, the row being moved, the last
    /// reorder and the breakpoint.
    pub fn status_text(&self) -> String {
        let count = self.table.selected_keys().len();
        let mut parts = vec![match self.table.selection_status() {
            SelectionStatus::NoSelection => "none selected".to_string(),
            SelectionStatus::Partial => format!("{} selected (partial)", count),
            SelectionStatus::All => format!("{} selected (all)", count),
        }];
        if let Some(record) = self.table.active_record() {
            parts.push(format!("moving {}", record_label(record)));
        }
        if let Some(reorder) = &self.last_reorder {
            parts.push(reorder.clone());
        }
        parts.push(self.table.breakpoint().to_string());
        parts.join(" | ")
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        self.view.render(frame, chunks[0], &self.table);
        render_context_help(frame, chunks[1], &self.status_text(), self.key_context());
        self.notifications.render(frame, chunks[0]);
    }
}

fn selection_config(feed: &Feed) -> RowSelectionConfig<Value> {
    let on_select = Rc::clone(feed);
    let on_select_all = Rc::clone(feed);
    RowSelectionConfig::<Value>::new()
        .on_select(move |record: &Value, selected, _rows, _event| {
            let verb = if selected { "Selected" } else { "Deselected" };
            on_select
                .borrow_mut()
                .push((NotificationType::Info, format!("{} {}", verb, record_label(record))));
        })
        .on_select_all(move |selected, rows, changed| {
            let message = if selected {
                format!("Selected all {} rows ({} changed)", rows.len(), changed.len())
            } else {
                format!("Cleared {} rows", changed.len())
            };
            on_select_all
                .borrow_mut()
                .push((NotificationType::Info, message));
        })
        .get_checkbox_props(|record: &Value| CheckboxProps {
            disabled: record.field("disabled") == Some(Value::Bool(true)),
            name: record.field("name").map(|v| format_value(&v)),
        })
}

fn drag_config(feed: &Feed) -> DraggableConfig<Value> {
    let on_start = Rc::clone(feed);
    let on_end = Rc::clone(feed);
    let on_cancel = Rc::clone(feed);
    DraggableConfig::<Value>::new()
        .on_drag_start(move |key: &RowKey| {
            on_start
                .borrow_mut()
                .push((NotificationType::Info, format!("Moving row {}", key)));
        })
        .on_drag_end(move |result: &DragResult<Value>| {
            on_end.borrow_mut().push((
                NotificationType::Success,
                format!(
                    "Moved {} to position {}",
                    record_label(&result.item),
                    result.new_index + 1
                ),
            ));
        })
        .on_drag_cancel(move || {
            on_cancel
                .borrow_mut()
                .push((NotificationType::Warning, "Move cancelled".to_string()));
        })
}

/// Left click toggles the row; right click names it in a toast.
fn row_handler(feed: &Feed) -> impl FnMut(&Value, usize, &RowEvent) -> RowAction + 'static {
    let feed = Rc::clone(feed);
    move |record: &Value, index: usize, event: &RowEvent| match event {
        RowEvent::Click { .. } => RowAction::ToggleSelection,
        RowEvent::ContextMenu { .. } => {
            feed.borrow_mut().push((
                NotificationType::Info,
                format!("Row {}: {}", index + 1, record_label(record)),
            ));
            RowAction::Nothing
        }
    }
}

/// Short label for a record: its `name`, else its `title`, else `row`.
fn record_label(record: &Value) -> String {
    record
        .field("name")
        .or_else(|| record.field("title"))
        .map(|v| format_value(&v))
        .unwrap_or_else(|| "row".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_columns, sample_records};
    use crate::table::Breakpoint;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn app_with(config: &Config, options: &AppOptions) -> App {
        App::new(config, sample_columns(), sample_records(), options, 120)
    }

    fn app() -> App {
        app_with(&Config::default(), &AppOptions::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn ids(app: &App) -> Vec<String> {
        app.table()
            .data()
            .iter()
            .map(|r| r["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_app_new() {
        let app = app();
        assert!(!app.should_quit());
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.table().len(), 5);
        // 120 cells is lg with the default thresholds
        assert_eq!(app.table().breakpoint(), Breakpoint::Lg);
    }

    #[test]
    fn test_quit_on_q_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_on_ctrl_c() {
        let mut app = app();
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.table().selected_keys(), &[RowKey::from("2")]);
        assert!(app.status_text().starts_with("1 selected (partial)"));
        assert_eq!(app.notifications().len(), 1);

        press(&mut app, KeyCode::Char('a'));
        assert!(app.table().is_all_selected());
        assert!(app.status_text().starts_with("5 selected (all)"));

        press(&mut app, KeyCode::Char('a'));
        assert!(app.table().selected_keys().is_empty());

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.table().selection_status(), SelectionStatus::NoSelection);
    }

    #[test]
    fn test_radio_mode() {
        let options = AppOptions {
            radio: true,
            ..AppOptions::default()
        };
        let mut app = app_with(&Config::default(), &options);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.table().selected_keys(), &[RowKey::from("2")]);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.table().selected_keys(), &[RowKey::from("2")]);
        assert!(app
            .notifications()
            .iter()
            .any(|n| n.notification_type == NotificationType::Warning));
    }

    #[test]
    fn test_keyboard_move() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.table().is_dragging());
        assert!(app.status_text().contains("moving User management"));

        // space is ignored while moving
        press(&mut app, KeyCode::Char(' '));
        assert!(app.table().selected_keys().is_empty());

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);

        assert!(!app.table().is_dragging());
        assert_eq!(ids(&app), vec!["2", "3", "4", "1", "5"]);
        assert_eq!(app.cursor(), 3);
        assert_eq!(app.table().data()[0]["order"], 1);
        assert_eq!(app.table().data()[3]["order"], 4);
        assert!(app.status_text().contains("moved 1 1→4"));
    }

    #[test]
    fn test_drop_on_itself_and_cancel() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(ids(&app), vec!["1", "2", "3", "4", "5"]);
        assert!(!app.table().is_dragging());

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.table().is_dragging());
        assert_eq!(ids(&app), vec!["1", "2", "3", "4", "5"]);
        assert!(app
            .notifications()
            .iter()
            .any(|n| n.message == "Move cancelled"));
    }

    #[test]
    fn test_move_disabled() {
        let options = AppOptions {
            no_drag: true,
            ..AppOptions::default()
        };
        let mut app = app_with(&Config::default(), &options);
        press(&mut app, KeyCode::Char('m'));
        assert!(!app.table().is_dragging());
        assert!(!app.table().is_draggable());
    }

    #[test]
    fn test_move_throttled_while_dragging() {
        let mut config = Config::default();
        config.settings.drag_repeat_ms = 60_000;
        let mut app = app_with(&config, &AppOptions::default());

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_resize_changes_breakpoint() {
        let mut app = app();
        app.update(Event::Resize(60, 30));
        assert_eq!(app.table().breakpoint(), Breakpoint::Sm);
        app.update(Event::Resize(200, 30));
        assert_eq!(app.table().breakpoint(), Breakpoint::Xl);
    }

    #[test]
    fn test_resize_debounced() {
        let mut config = Config::default();
        config.settings.resize_debounce_ms = Some(0);
        let mut app = app_with(&config, &AppOptions::default());

        app.update(Event::Resize(60, 30));
        assert_eq!(app.table().breakpoint(), Breakpoint::Lg);
        app.update(Event::Tick);
        assert_eq!(app.table().breakpoint(), Breakpoint::Sm);
    }

    #[test]
    fn test_row_key_option() {
        let options = AppOptions {
            row_key: Some("name".to_string()),
            ..AppOptions::default()
        };
        let mut app = app_with(&Config::default(), &options);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(
            app.table().selected_keys(),
            &[RowKey::from("User management")]
        );
    }

    #[test]
    fn test_disabled_rows_cannot_be_selected() {
        let records = vec![
            json!({"id": 1, "name": "open"}),
            json!({"id": 2, "name": "locked", "disabled": true}),
        ];
        let mut app = App::new(
            &Config::default(),
            sample_columns(),
            records,
            &AppOptions::default(),
            120,
        );
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.table().selected_keys().is_empty());
    }

    #[test]
    fn test_click_toggles_row() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        // border, header, then the third row
        app.update(Event::Click { column: 10, row: 4 });
        assert_eq!(app.cursor(), 2);
        assert_eq!(app.table().selected_keys(), &[RowKey::from("3")]);

        app.update(Event::Click { column: 10, row: 11 });
        assert_eq!(app.table().selected_keys(), &[RowKey::from("3")]);
    }

    #[test]
    fn test_right_click_reports_row_without_selecting() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        app.update(Event::ContextClick { column: 10, row: 3 });
        assert_eq!(app.cursor(), 1);
        assert!(app.table().selected_keys().is_empty());
        assert!(app
            .notifications()
            .iter()
            .any(|n| n.message.starts_with("Row 2: ")));
    }

    #[test]
    fn test_click_while_moving_only_moves_cursor() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        press(&mut app, KeyCode::Char('m'));
        app.update(Event::Click { column: 10, row: 4 });
        assert_eq!(app.cursor(), 2);
        assert!(app.table().is_dragging());
        assert!(app.table().selected_keys().is_empty());
    }

    #[test]
    fn test_vim_mode_from_settings() {
        let mut config = Config::default();
        config.settings.vim_mode = false;
        let mut app = app_with(&config, &AppOptions::default());
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor(), 0);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_view_renders_status() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let footer: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 11)].symbol().to_string())
            .collect();
        assert!(footer.contains("none selected"));
        assert!(footer.contains("[space]"));
    }
}
