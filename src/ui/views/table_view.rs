//! Table view.
//!
//! Renders an assembled [`Table`] as a ratatui table and keeps the cursor.
//! While a row is picked up the cursor doubles as the drop position.

use ratatui::{
    layout::{Alignment as TextAlignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, TableState},
    Frame,
};

use crate::table::{
    resolve_width, Alignment, Record, RowDescriptor, SelectionHeader, SelectionType, Table,
    TableBody, TableColumn,
};
use crate::ui::theme::theme;

const DRAG_HANDLE: &str = "≡";
const DRAG_HANDLE_ACTIVE: &str = "↕";

/// Cursor and layout state of the table view.
#[derive(Debug, Default)]
pub struct TableView {
    state: TableState,
    /// Where data rows were last drawn, for mapping clicks.
    rows_area: Rect,
    row_height: u16,
}

impl TableView {
    pub fn new() -> Self {
        Self {
            state: TableState::default().with_selected(Some(0)),
            rows_area: Rect::default(),
            row_height: 1,
        }
    }

    /// Index of the cursor row.
    pub fn cursor(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    /// Move the cursor to `index`, clamped to `len` rows.
    pub fn set_cursor(&mut self, index: usize, len: usize) {
        let index = index.min(len.saturating_sub(1));
        self.state.select(Some(index));
    }

    pub fn move_up(&mut self, len: usize) {
        self.set_cursor(self.cursor().saturating_sub(1), len);
    }

    pub fn move_down(&mut self, len: usize) {
        self.set_cursor(self.cursor() + 1, len);
    }

    pub fn first(&mut self, len: usize) {
        self.set_cursor(0, len);
    }

    pub fn last(&mut self, len: usize) {
        self.set_cursor(len.saturating_sub(1), len);
    }

    /// Data row under the terminal cell `(column, row)`, as last rendered.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.rows_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let offset = usize::from((row - area.y) / self.row_height.max(1));
        Some(self.state.offset() + offset)
    }

    /// Draw `table` into `area`.
    pub fn render<T: Record + Clone>(&mut self, frame: &mut Frame, area: Rect, table: &Table<T>) {
        let settings = table.settings();
        let block = if settings.bordered {
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme().border_style())
                .title(" LazyTable ")
        } else {
            Block::default()
        };
        let inner = block.inner(area);

        let columns = table.columns();
        let spacing = settings.size.column_spacing();
        let widths = column_widths(&columns, inner.width, spacing);
        let header = Row::new(columns.iter().map(header_cell)).style(theme().header_style());

        let rows = match table.body() {
            TableBody::Rows(rows) => rows,
            TableBody::Loading => {
                self.render_message(frame, area, block, "Loading...");
                return;
            }
            TableBody::Empty(text) => {
                self.render_message(frame, area, block, text);
                return;
            }
        };

        let padding = settings.size.row_padding();
        let dragging = table.is_dragging();
        let rows: Vec<Row> = rows
            .iter()
            .map(|row| body_row(row, &columns, &widths).bottom_margin(padding))
            .collect();

        let highlight = if dragging {
            Style::default()
                .fg(theme().drop_target)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
        } else {
            theme().cursor_style()
        };
        let widget = TableWidget::new(rows, widths.iter().map(|w| Constraint::Length(*w)))
            .header(header)
            .block(block)
            .column_spacing(spacing)
            .highlight_style(highlight)
            .highlight_symbol(if dragging { "→ " } else { "▶ " });

        // header takes the first inner line
        self.rows_area = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        self.row_height = 1 + padding;
        frame.render_stateful_widget(widget, area, &mut self.state);
    }

    fn render_message(&mut self, frame: &mut Frame, area: Rect, block: Block<'_>, text: &str) {
        self.rows_area = Rect::default();
        let line = Line::styled(text.to_string(), Style::default().fg(theme().muted));
        let paragraph = Paragraph::new(line)
            .alignment(TextAlignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Widths of the rendered columns within `table_width` cells.
///
/// Synthetic columns and columns with a fixed or percent width are laid out
/// first; the rest share what remains.
fn column_widths<T>(columns: &[TableColumn<'_, T>], table_width: u16, spacing: u16) -> Vec<u16> {
    let gaps = spacing.saturating_mul(columns.len().saturating_sub(1) as u16);
    // two cells for the highlight symbol
    let available = table_width.saturating_sub(gaps).saturating_sub(2);

    let mut widths: Vec<Option<u16>> = columns
        .iter()
        .map(|column| match column {
            TableColumn::Selection { width, .. } | TableColumn::DragHandle { width } => {
                Some(*width)
            }
            TableColumn::Data(config) if config.width.is_some() => {
                Some(resolve_width(*config, available, columns.len()))
            }
            TableColumn::Data(_) => None,
        })
        .collect();

    let used: u16 = widths.iter().flatten().fold(0, |sum, w| sum.saturating_add(*w));
    let remaining = available.saturating_sub(used);
    let flexible = widths.iter().filter(|w| w.is_none()).count();
    for (width, column) in widths.iter_mut().zip(columns) {
        if let TableColumn::Data(config) = column {
            if width.is_none() {
                *width = Some(resolve_width(*config, remaining, flexible));
            }
        }
    }
    widths.into_iter().map(|w| w.unwrap_or(0)).collect()
}

fn header_cell<T>(column: &TableColumn<'_, T>) -> Cell<'static> {
    match column {
        TableColumn::Selection { header, .. } => Cell::from(match header {
            SelectionHeader::SelectAll { checked: true, .. } => "[x]",
            SelectionHeader::SelectAll { indeterminate: true, .. } => "[-]",
            SelectionHeader::SelectAll { .. } => "[ ]",
            SelectionHeader::Blank => "",
        }),
        TableColumn::DragHandle { .. } => Cell::from(""),
        TableColumn::Data(config) => Cell::from(aligned(config.title.clone(), config.align)),
    }
}

fn body_row<T>(
    row: &RowDescriptor<'_, T>,
    columns: &[TableColumn<'_, T>],
    widths: &[u16],
) -> Row<'static> {
    let mut cells = Vec::with_capacity(columns.len());
    let mut data_cells = row.cells.iter();

    for (column, width) in columns.iter().zip(widths) {
        let cell = match column {
            TableColumn::Selection { .. } => {
                let style = if row.checkbox.disabled {
                    Style::default().fg(theme().disabled)
                } else {
                    Style::default()
                };
                Cell::from(selection_marker(row)).style(style)
            }
            TableColumn::DragHandle { .. } => Cell::from(if row.is_dragging {
                DRAG_HANDLE_ACTIVE
            } else {
                DRAG_HANDLE
            }),
            TableColumn::Data(config) => {
                let text = data_cells.next().cloned().unwrap_or_default();
                let text = if config.ellipsis {
                    truncate(&text, usize::from(*width))
                } else {
                    text
                };
                Cell::from(aligned(text, config.align))
            }
        };
        cells.push(cell);
    }

    let style = if row.is_dragging {
        Style::default()
            .fg(theme().dragging)
            .add_modifier(Modifier::ITALIC)
    } else if row.selected {
        Style::default().fg(theme().selected)
    } else {
        Style::default().fg(theme().fg)
    };
    Row::new(cells).style(style)
}

fn selection_marker<T>(row: &RowDescriptor<'_, T>) -> &'static str {
    match (row.selection_type, row.selected) {
        (Some(SelectionType::Checkbox), true) => "[x]",
        (Some(SelectionType::Checkbox), false) => "[ ]",
        (Some(SelectionType::Radio), true) => "(•)",
        (Some(SelectionType::Radio), false) => "( )",
        (None, _) => "",
    }
}

fn aligned(text: String, align: Alignment) -> Text<'static> {
    let alignment = match align {
        Alignment::Left => TextAlignment::Left,
        Alignment::Center => TextAlignment::Center,
        Alignment::Right => TextAlignment::Right,
    };
    Text::from(text).alignment(alignment)
}

/// Cut `text` to `width` characters, ending in an ellipsis when shortened.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}
