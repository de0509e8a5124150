//! Table assembly.
//!
//! [`Table`] owns a cached copy of the caller's data and wires key
//! resolution, responsive columns, selection and reordering into
//! rendering-ready column and row descriptors.

use tracing::{debug, trace, warn};

use crate::config::TableSettings;

use super::column::{visible_columns, Breakpoint, ColumnConfig};
use super::key::{KeyedRows, Record, RowKey, RowKeySpec};
use super::reorder::{DragResult, DraggableConfig, Reorder};
use super::selection::{
    CheckboxProps, NativeEvent, RowSelection, RowSelectionConfig, SelectionStatus, SelectionType,
};

/// Key of the synthetic selection column.
pub const SELECTION_COLUMN_KEY: &str = "__selection__";
/// Key of the synthetic drag-handle column.
pub const DRAG_COLUMN_KEY: &str = "__drag__";

const DRAG_COLUMN_TITLE: &str = "Sort";

pub type DataChangeHandler<T> = Box<dyn FnMut(&[T])>;
pub type RowHandler<T> = Box<dyn FnMut(&T, usize, &RowEvent) -> RowAction>;

/// Pointer activity on a row, at a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    Click { column: u16, row: u16 },
    ContextMenu { column: u16, row: u16 },
}

impl RowEvent {
    pub fn position(&self) -> (u16, u16) {
        match *self {
            RowEvent::Click { column, row } | RowEvent::ContextMenu { column, row } => {
                (column, row)
            }
        }
    }
}

/// What the table does after a row handler has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAction {
    #[default]
    Nothing,
    /// Flip the row's selection, reporting a pointer event.
    ToggleSelection,
}

/// Header of the selection column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionHeader {
    /// Select-all checkbox.
    SelectAll { checked: bool, indeterminate: bool },
    /// Radio mode, or select-all hidden.
    Blank,
}

/// A rendered column.
#[derive(Debug)]
pub enum TableColumn<'a, T> {
    Selection { width: u16, header: SelectionHeader },
    DragHandle { width: u16 },
    Data(&'a ColumnConfig<T>),
}

impl<T> TableColumn<'_, T> {
    pub fn key(&self) -> &str {
        match self {
            TableColumn::Selection { .. } => SELECTION_COLUMN_KEY,
            TableColumn::DragHandle { .. } => DRAG_COLUMN_KEY,
            TableColumn::Data(column) => &column.key,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            TableColumn::Selection { .. } => "",
            TableColumn::DragHandle { .. } => DRAG_COLUMN_TITLE,
            TableColumn::Data(column) => &column.title,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        !matches!(self, TableColumn::Data(_))
    }
}

/// A rendering-ready row.
#[derive(Debug)]
pub struct RowDescriptor<'a, T> {
    pub key: RowKey,
    pub index: usize,
    pub record: &'a T,
    /// Selection mode, `None` when selection is off.
    pub selection_type: Option<SelectionType>,
    pub selected: bool,
    pub checkbox: CheckboxProps,
    pub draggable: bool,
    /// This row is the one being dragged.
    pub is_dragging: bool,
    /// Text of each visible data column, in column order.
    pub cells: Vec<String>,
}

/// What the table body shows.
#[derive(Debug)]
pub enum TableBody<'a, T> {
    Loading,
    Empty(&'a str),
    Rows(Vec<RowDescriptor<'a, T>>),
}

/// A reorderable, selectable table.
pub struct Table<T> {
    columns: Vec<ColumnConfig<T>>,
    data: Vec<T>,
    row_key: RowKeySpec<T>,
    settings: TableSettings,
    breakpoint: Breakpoint,
    loading: bool,
    selection: Option<RowSelection<T>>,
    reorder: Reorder<T>,
    on_data_change: Option<DataChangeHandler<T>>,
    on_row: Option<RowHandler<T>>,
}

impl<T: Record + Clone> Table<T> {
    /// Create a table with selection and reordering off.
    pub fn new(columns: Vec<ColumnConfig<T>>, data: Vec<T>) -> Self {
        Self {
            columns,
            data,
            row_key: RowKeySpec::Auto,
            settings: TableSettings::default(),
            breakpoint: Breakpoint::default(),
            loading: false,
            selection: None,
            reorder: Reorder::default(),
            on_data_change: None,
            on_row: None,
        }
    }

    /// Use `settings` for defaults.
    ///
    /// Call before [`Table::row_selection`] so the default selection mode
    /// applies.
    pub fn with_settings(mut self, settings: TableSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Identify rows with `spec`. Duplicate keys are reported here and on
    /// every [`Table::set_data`].
    pub fn row_key(mut self, spec: RowKeySpec<T>) -> Self {
        self.row_key = spec;
        self.warn_duplicate_keys();
        self
    }

    /// Enable row selection.
    pub fn row_selection(mut self, config: RowSelectionConfig<T>) -> Self {
        self.selection = Some(RowSelection::new(config, self.settings.selection_type));
        self
    }

    /// Configure reordering.
    pub fn draggable(mut self, config: impl Into<DraggableConfig<T>>) -> Self {
        self.reorder = Reorder::new(config.into());
        self
    }

    /// Called with the new sequence whenever a drop reorders the data.
    pub fn on_data_change(mut self, f: impl FnMut(&[T]) + 'static) -> Self {
        self.on_data_change = Some(Box::new(f));
        self
    }

    /// Called with the record and index of a row that receives pointer
    /// activity. The returned action is applied to the row.
    pub fn on_row(mut self, f: impl FnMut(&T, usize, &RowEvent) -> RowAction + 'static) -> Self {
        self.on_row = Some(Box::new(f));
        self
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Replace the cached data wholesale.
    pub fn set_data(&mut self, data: Vec<T>) {
        debug!(rows = data.len(), "Table data replaced");
        self.data = data;
        self.warn_duplicate_keys();
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The data paired with the table's key spec.
    pub fn keyed(&self) -> KeyedRows<'_, T> {
        KeyedRows::new(&self.data, &self.row_key)
    }

    pub fn key_at(&self, index: usize) -> Option<RowKey> {
        self.keyed().key_at(index)
    }

    pub fn row_key_spec(&self) -> &RowKeySpec<T> {
        &self.row_key
    }

    fn warn_duplicate_keys(&self) {
        let duplicates = self.keyed().duplicate_keys();
        if !duplicates.is_empty() {
            let keys: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
            warn!(keys = ?keys, "Duplicate row keys; lookups use the first match");
        }
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        if breakpoint != self.breakpoint {
            debug!(%breakpoint, "Table breakpoint changed");
            self.breakpoint = breakpoint;
        }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnConfig<T>>) {
        self.columns = columns;
    }

    /// Declared columns visible at the current breakpoint.
    pub fn visible_columns(&self) -> Vec<&ColumnConfig<T>> {
        visible_columns(&self.columns, self.breakpoint)
    }

    /// Rendered columns: selection, then drag handle, then visible data columns.
    pub fn columns(&self) -> Vec<TableColumn<'_, T>> {
        let width = self.settings.synthetic_column_width;
        let mut columns = Vec::with_capacity(self.columns.len() + 2);

        if let Some(selection) = &self.selection {
            let header = if selection.selection_type() == SelectionType::Checkbox
                && !selection.hide_select_all()
            {
                let rows = self.keyed();
                SelectionHeader::SelectAll {
                    checked: selection.is_all_selected(rows),
                    indeterminate: selection.is_indeterminate(rows),
                }
            } else {
                SelectionHeader::Blank
            };
            columns.push(TableColumn::Selection { width, header });
        }
        if self.reorder.is_enabled() {
            columns.push(TableColumn::DragHandle { width });
        }
        columns.extend(self.visible_columns().into_iter().map(TableColumn::Data));
        columns
    }

    /// Row descriptors for the current data.
    pub fn rows(&self) -> Vec<RowDescriptor<'_, T>> {
        let keyed = self.keyed();
        let visible = self.visible_columns();
        let active = self.reorder.active_id();

        self.data
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let key = keyed.key_of(record, index);
                let (selection_type, selected, checkbox) = match &self.selection {
                    Some(selection) => (
                        Some(selection.selection_type()),
                        selection.is_key_selected(&key),
                        selection.checkbox_props(record),
                    ),
                    None => (None, false, CheckboxProps::default()),
                };
                RowDescriptor {
                    is_dragging: active == Some(&key),
                    cells: visible
                        .iter()
                        .map(|column| column.cell_text(record, index))
                        .collect(),
                    key,
                    index,
                    record,
                    selection_type,
                    selected,
                    checkbox,
                    draggable: self.reorder.is_enabled(),
                }
            })
            .collect()
    }

    /// Body content: loading, the empty text, or the rows.
    pub fn body(&self) -> TableBody<'_, T> {
        if self.loading {
            TableBody::Loading
        } else if self.data.is_empty() {
            TableBody::Empty(&self.settings.empty_text)
        } else {
            TableBody::Rows(self.rows())
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selection(&self) -> Option<&RowSelection<T>> {
        self.selection.as_ref()
    }

    pub fn selected_keys(&self) -> &[RowKey] {
        self.selection
            .as_ref()
            .map(|s| s.selected_keys())
            .unwrap_or(&[])
    }

    pub fn selected_rows(&self) -> Vec<&T> {
        match &self.selection {
            Some(selection) => selection.selected_rows(self.keyed()),
            None => Vec::new(),
        }
    }

    /// Select or deselect the row at `index`.
    pub fn select_row(&mut self, index: usize, selected: bool, event: &NativeEvent) -> bool {
        let (Some(selection), Some(record)) = (self.selection.as_mut(), self.data.get(index))
        else {
            return false;
        };
        let rows = KeyedRows::new(&self.data, &self.row_key);
        selection.select_row(rows, record, index, selected, event)
    }

    /// Flip the selection of the row at `index`.
    pub fn toggle_row(&mut self, index: usize, event: &NativeEvent) -> bool {
        let Some(key) = self.key_at(index) else {
            return false;
        };
        let selected = self
            .selection
            .as_ref()
            .is_some_and(|s| s.is_key_selected(&key));
        self.select_row(index, !selected, event)
    }

    pub fn select_all(&mut self, selected: bool) -> bool {
        let rows = KeyedRows::new(&self.data, &self.row_key);
        self.selection
            .as_mut()
            .is_some_and(|s| s.select_all(rows, selected))
    }

    /// Select all rows unless all are already selected, in which case
    /// deselect them.
    pub fn toggle_all(&mut self) -> bool {
        let all = self.is_all_selected();
        self.select_all(!all)
    }

    pub fn clear_selection(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.clear_selection();
        }
    }

    pub fn set_selection(&mut self, keys: Vec<RowKey>) {
        let rows = KeyedRows::new(&self.data, &self.row_key);
        if let Some(selection) = self.selection.as_mut() {
            selection.set_selection(rows, keys);
        }
    }

    pub fn is_row_selected(&self, index: usize) -> bool {
        match (&self.selection, self.data.get(index)) {
            (Some(selection), Some(record)) => {
                selection.is_row_selected(self.keyed(), record, index)
            }
            _ => false,
        }
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.is_all_selected(self.keyed()))
    }

    pub fn is_indeterminate(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.is_indeterminate(self.keyed()))
    }

    pub fn selection_status(&self) -> SelectionStatus {
        self.selection
            .as_ref()
            .map_or(SelectionStatus::NoSelection, |s| s.status(self.keyed()))
    }

    /// Hand pointer activity on the row at `index` to the row handler.
    ///
    /// Returns the action applied, or `None` without a handler or row.
    pub fn row_event(&mut self, index: usize, event: &RowEvent) -> Option<RowAction> {
        let record = self.data.get(index)?;
        let handler = self.on_row.as_mut()?;
        let action = handler(record, index, event);
        trace!(index, ?event, ?action, "Row event");
        if action == RowAction::ToggleSelection {
            let (column, row) = event.position();
            self.toggle_row(index, &NativeEvent::Pointer { column, row });
        }
        Some(action)
    }

    pub fn is_draggable(&self) -> bool {
        self.reorder.is_enabled()
    }

    pub fn is_dragging(&self) -> bool {
        self.reorder.is_dragging()
    }

    pub fn active_id(&self) -> Option<&RowKey> {
        self.reorder.active_id()
    }

    /// The record being dragged, for a drag overlay.
    pub fn active_record(&self) -> Option<&T> {
        let active = self.reorder.active_id()?;
        let index = self.keyed().position(active)?;
        self.data.get(index)
    }

    pub fn drag_start(&mut self, active: RowKey) -> bool {
        self.reorder.drag_start(active)
    }

    /// Drop `active` onto `over`, committing the move to the cached data.
    pub fn drag_end(&mut self, active: &RowKey, over: Option<&RowKey>) -> Option<DragResult<T>> {
        let rows = KeyedRows::new(&self.data, &self.row_key);
        let on_data_change = &mut self.on_data_change;
        let result = self.reorder.drag_end(active, over, rows, |items| {
            if let Some(f) = on_data_change.as_mut() {
                f(items);
            }
        })?;
        self.data = result.items.clone();
        Some(result)
    }

    pub fn drag_cancel(&mut self) -> bool {
        self.reorder.drag_cancel()
    }
}
