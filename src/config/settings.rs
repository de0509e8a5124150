//! Table settings.

use serde::{Deserialize, Serialize};

use crate::table::SelectionType;

/// Row density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSize {
    #[default]
    Default,
    Small,
    Large,
}

impl TableSize {
    /// Blank lines drawn below each row.
    pub fn row_padding(&self) -> u16 {
        match self {
            TableSize::Small | TableSize::Default => 0,
            TableSize::Large => 1,
        }
    }

    /// Spacing between columns in cells.
    pub fn column_spacing(&self) -> u16 {
        match self {
            TableSize::Small => 1,
            TableSize::Default | TableSize::Large => 2,
        }
    }
}

/// Defaults applied to every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Row density.
    pub size: TableSize,
    /// Selection mode used when a table does not choose one.
    pub selection_type: SelectionType,
    /// Draw a border around the table.
    pub bordered: bool,
    /// Text shown when there are no rows.
    pub empty_text: String,
    /// Width of the selection and drag-handle columns, in cells.
    pub synthetic_column_width: u16,
    /// Pixels per terminal cell, used to map breakpoint thresholds to cells.
    pub cell_px: u16,
    /// Debounce resize events by this many milliseconds. Unset applies them
    /// immediately.
    pub resize_debounce_ms: Option<u64>,
    /// Minimum interval between drop-target moves while a key is held.
    pub drag_repeat_ms: u64,
    /// Accept `j/k/g/G` navigation keys alongside the arrows.
    pub vim_mode: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            size: TableSize::Default,
            selection_type: SelectionType::Checkbox,
            bordered: true,
            empty_text: "No data".to_string(),
            synthetic_column_width: 4,
            cell_px: 8,
            resize_debounce_ms: None,
            drag_repeat_ms: 0,
            vim_mode: true,
        }
    }
}
