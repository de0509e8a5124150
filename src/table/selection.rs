//! Row selection state machine.
//!
//! Selection is a list of row keys. Whether the table is fully, partially or
//! not selected is always derived from that list against the current data,
//! never stored. Keys of rows that are no longer in the data are kept until
//! the selection is explicitly cleared or overwritten.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::key::{KeyedRows, Record, RowKey};

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionType {
    /// Any number of rows.
    #[default]
    Checkbox,
    /// At most one row.
    Radio,
}

/// Per-row checkbox properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckboxProps {
    /// The row cannot be toggled.
    pub disabled: bool,
    pub name: Option<String>,
}

/// The input that triggered a row selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    /// A key press, named the way the host shows it, e.g. `space`.
    Key(String),
    Pointer { column: u16, row: u16 },
    Programmatic,
}

/// Derived selection status of the current data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    NoSelection,
    Partial,
    All,
}

pub type ChangeHandler<T> = Box<dyn FnMut(&[RowKey], &[&T])>;
pub type SelectHandler<T> = Box<dyn FnMut(&T, bool, &[&T], &NativeEvent)>;
pub type SelectAllHandler<T> = Box<dyn FnMut(bool, &[&T], &[&T])>;
pub type CheckboxPropsFn<T> = Box<dyn Fn(&T) -> CheckboxProps>;

/// Row selection configuration.
pub struct RowSelectionConfig<T> {
    /// Selection mode. `None` defers to the table settings.
    pub selection_type: Option<SelectionType>,
    /// Initially selected keys, taking precedence over the defaults.
    pub selected_row_keys: Option<Vec<RowKey>>,
    pub default_selected_row_keys: Option<Vec<RowKey>>,
    /// Called with every selected key and the matching rows.
    pub on_change: Option<ChangeHandler<T>>,
    /// Called when a single row is toggled.
    pub on_select: Option<SelectHandler<T>>,
    /// Called after select-all with the rows that flipped.
    pub on_select_all: Option<SelectAllHandler<T>>,
    pub get_checkbox_props: Option<CheckboxPropsFn<T>>,
    /// Hide the select-all checkbox in the header.
    pub hide_select_all: bool,
}

impl<T> Default for RowSelectionConfig<T> {
    fn default() -> Self {
        Self {
            selection_type: None,
            selected_row_keys: None,
            default_selected_row_keys: None,
            on_change: None,
            on_select: None,
            on_select_all: None,
            get_checkbox_props: None,
            hide_select_all: false,
        }
    }
}

impl<T> RowSelectionConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkbox() -> Self {
        Self::new().selection_type(SelectionType::Checkbox)
    }

    pub fn radio() -> Self {
        Self::new().selection_type(SelectionType::Radio)
    }

    pub fn selection_type(mut self, selection_type: SelectionType) -> Self {
        self.selection_type = Some(selection_type);
        self
    }

    pub fn selected_row_keys(mut self, keys: Vec<RowKey>) -> Self {
        self.selected_row_keys = Some(keys);
        self
    }

    pub fn default_selected_row_keys(mut self, keys: Vec<RowKey>) -> Self {
        self.default_selected_row_keys = Some(keys);
        self
    }

    pub fn on_change(mut self, f: impl FnMut(&[RowKey], &[&T]) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_select(mut self, f: impl FnMut(&T, bool, &[&T], &NativeEvent) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn on_select_all(mut self, f: impl FnMut(bool, &[&T], &[&T]) + 'static) -> Self {
        self.on_select_all = Some(Box::new(f));
        self
    }

    pub fn get_checkbox_props(mut self, f: impl Fn(&T) -> CheckboxProps + 'static) -> Self {
        self.get_checkbox_props = Some(Box::new(f));
        self
    }

    pub fn hide_select_all(mut self, hide: bool) -> Self {
        self.hide_select_all = hide;
        self
    }
}

/// Selection state for one table.
pub struct RowSelection<T> {
    config: RowSelectionConfig<T>,
    selection_type: SelectionType,
    selected: Vec<RowKey>,
}

impl<T: Record> RowSelection<T> {
    /// Create the selection. An unset mode falls back to `default_type`.
    pub fn new(config: RowSelectionConfig<T>, default_type: SelectionType) -> Self {
        let initial = config
            .selected_row_keys
            .clone()
            .or_else(|| config.default_selected_row_keys.clone())
            .unwrap_or_default();
        Self {
            selection_type: config.selection_type.unwrap_or(default_type),
            selected: dedup(initial),
            config,
        }
    }

    pub fn selection_type(&self) -> SelectionType {
        self.selection_type
    }

    pub fn hide_select_all(&self) -> bool {
        self.config.hide_select_all
    }

    /// Selected keys in selection order.
    pub fn selected_keys(&self) -> &[RowKey] {
        &self.selected
    }

    /// Selected rows of `rows`, in data order.
    pub fn selected_rows<'a>(&self, rows: KeyedRows<'a, T>) -> Vec<&'a T> {
        rows.rows_with_keys(&self.selected)
    }

    pub fn checkbox_props(&self, record: &T) -> CheckboxProps {
        self.config
            .get_checkbox_props
            .as_ref()
            .map(|f| f(record))
            .unwrap_or_default()
    }

    /// Select or deselect one row.
    ///
    /// Returns false if the row's checkbox is disabled.
    pub fn select_row(
        &mut self,
        rows: KeyedRows<'_, T>,
        record: &T,
        index: usize,
        selected: bool,
        event: &NativeEvent,
    ) -> bool {
        if self.checkbox_props(record).disabled {
            debug!(index, "Ignoring selection of disabled row");
            return false;
        }

        let key = rows.key_of(record, index);
        match self.selection_type {
            SelectionType::Radio => {
                self.selected.clear();
                if selected {
                    self.selected.push(key.clone());
                }
            }
            SelectionType::Checkbox => {
                if selected {
                    if !self.selected.contains(&key) {
                        self.selected.push(key.clone());
                    }
                } else {
                    self.selected.retain(|k| *k != key);
                }
            }
        }
        debug!(%key, selected, count = self.selected.len(), "Row selection changed");

        let selected_rows = rows.rows_with_keys(&self.selected);
        if let Some(on_change) = self.config.on_change.as_mut() {
            on_change(&self.selected, &selected_rows);
        }
        if let Some(on_select) = self.config.on_select.as_mut() {
            on_select(record, selected, &selected_rows, event);
        }
        true
    }

    /// Select or deselect every row of `rows`.
    ///
    /// Only meaningful in checkbox mode; returns false in radio mode.
    pub fn select_all(&mut self, rows: KeyedRows<'_, T>, selected: bool) -> bool {
        if self.selection_type != SelectionType::Checkbox {
            return false;
        }

        let keys = rows.keys();
        let previous = std::mem::take(&mut self.selected);
        let change_rows: Vec<&T> = rows
            .data()
            .iter()
            .zip(&keys)
            .filter(|(_, key)| previous.contains(key) != selected)
            .map(|(record, _)| record)
            .collect();

        self.selected = if selected {
            dedup(previous.into_iter().chain(keys).collect())
        } else {
            previous.into_iter().filter(|k| !keys.contains(k)).collect()
        };
        debug!(
            selected,
            changed = change_rows.len(),
            count = self.selected.len(),
            "Select all"
        );

        let selected_rows = rows.rows_with_keys(&self.selected);
        if let Some(on_change) = self.config.on_change.as_mut() {
            on_change(&self.selected, &selected_rows);
        }
        if let Some(on_select_all) = self.config.on_select_all.as_mut() {
            on_select_all(selected, &selected_rows, &change_rows);
        }
        true
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        debug!("Selection cleared");
        if let Some(on_change) = self.config.on_change.as_mut() {
            on_change(&[], &[]);
        }
    }

    /// Overwrite the selection with `keys`.
    pub fn set_selection(&mut self, rows: KeyedRows<'_, T>, keys: Vec<RowKey>) {
        self.selected = dedup(keys);
        debug!(count = self.selected.len(), "Selection replaced");
        let selected_rows = rows.rows_with_keys(&self.selected);
        if let Some(on_change) = self.config.on_change.as_mut() {
            on_change(&self.selected, &selected_rows);
        }
    }

    pub fn is_row_selected(&self, rows: KeyedRows<'_, T>, record: &T, index: usize) -> bool {
        self.selected.contains(&rows.key_of(record, index))
    }

    pub fn is_key_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    /// True iff there is data and every row is selected.
    pub fn is_all_selected(&self, rows: KeyedRows<'_, T>) -> bool {
        let all = !rows.is_empty() && rows.keys().iter().all(|k| self.selected.contains(k));
        trace!(all, "is_all_selected");
        all
    }

    /// True iff something is selected but not every row.
    pub fn is_indeterminate(&self, rows: KeyedRows<'_, T>) -> bool {
        !self.selected.is_empty() && !self.is_all_selected(rows)
    }

    pub fn status(&self, rows: KeyedRows<'_, T>) -> SelectionStatus {
        if self.is_all_selected(rows) {
            SelectionStatus::All
        } else if self.selected.is_empty() {
            SelectionStatus::NoSelection
        } else {
            SelectionStatus::Partial
        }
    }
}

fn dedup(keys: Vec<RowKey>) -> Vec<RowKey> {
    let mut out: Vec<RowKey> = Vec::with_capacity(keys.len());
    for key in keys {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}
