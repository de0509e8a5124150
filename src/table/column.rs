//! Column declarations and responsive visibility.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::key::Record;

/// Viewport size tier, ordered from narrowest to widest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    #[default]
    Xl,
}

impl Breakpoint {
    /// All breakpoints in rank order.
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    /// Position in the ordered set, `sm` being 0.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sm" => Ok(Breakpoint::Sm),
            "md" => Ok(Breakpoint::Md),
            "lg" => Ok(Breakpoint::Lg),
            "xl" => Ok(Breakpoint::Xl),
            other => Err(format!("unknown breakpoint '{}'", other)),
        }
    }
}

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Requested column width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Fixed width in cells.
    Fixed(u16),
    /// Share of the table width, 0-100.
    Percent(u16),
}

/// Cell rendering transform: `(value, record, index) -> text`.
pub type CellRenderer<T> = Arc<dyn Fn(Option<&Value>, &T, usize) -> String>;

/// A declared table column.
pub struct ColumnConfig<T> {
    /// Unique column key.
    pub key: String,
    /// Header text.
    pub title: String,
    /// Record field shown in this column.
    pub data_index: Option<String>,
    /// Optional rendering transform.
    pub render: Option<CellRenderer<T>>,
    /// Breakpoints at which the column may appear. Empty means always.
    pub responsive: Vec<Breakpoint>,
    pub width: Option<ColumnWidth>,
    pub min_width: Option<u16>,
    pub max_width: Option<u16>,
    pub align: Alignment,
    /// Truncate overflowing content with an ellipsis.
    pub ellipsis: bool,
    /// Opaque style hint for the renderer.
    pub class_name: Option<String>,
}

impl<T> ColumnConfig<T> {
    /// Create a column with the given key and header.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            data_index: None,
            render: None,
            responsive: Vec::new(),
            width: None,
            min_width: None,
            max_width: None,
            align: Alignment::Left,
            ellipsis: false,
            class_name: None,
        }
    }

    /// Read values from the named record field.
    pub fn data_index(mut self, field: impl Into<String>) -> Self {
        self.data_index = Some(field.into());
        self
    }

    /// Render cells with a custom transform.
    pub fn render(mut self, f: impl Fn(Option<&Value>, &T, usize) -> String + 'static) -> Self {
        self.render = Some(Arc::new(f));
        self
    }

    /// Restrict visibility to the given breakpoints.
    pub fn responsive(mut self, breakpoints: impl IntoIterator<Item = Breakpoint>) -> Self {
        self.responsive = breakpoints.into_iter().collect();
        self
    }

    /// Fixed width in cells.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = Some(ColumnWidth::Fixed(width));
        self
    }

    /// Width as a percentage of the table.
    pub fn percent(mut self, percent: u16) -> Self {
        self.width = Some(ColumnWidth::Percent(percent.min(100)));
        self
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn max_width(mut self, width: u16) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Lowest breakpoint at which the column appears, `None` if untagged.
    pub fn min_breakpoint(&self) -> Option<Breakpoint> {
        self.responsive.iter().copied().min()
    }

    /// Whether the column is shown at `breakpoint`.
    pub fn is_visible_at(&self, breakpoint: Breakpoint) -> bool {
        self.min_breakpoint()
            .map_or(true, |min| breakpoint.rank() >= min.rank())
    }
}

impl<T: Record> ColumnConfig<T> {
    /// The raw value this column reads from `record`.
    pub fn value(&self, record: &T) -> Option<Value> {
        self.data_index
            .as_deref()
            .and_then(|field| record.field(field))
    }

    /// Cell text for `record` at `index`.
    pub fn cell_text(&self, record: &T, index: usize) -> String {
        let value = self.value(record);
        match &self.render {
            Some(render) => render(value.as_ref(), record, index),
            None => value.as_ref().map(format_value).unwrap_or_default(),
        }
    }
}

impl<T> Clone for ColumnConfig<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            data_index: self.data_index.clone(),
            render: self.render.clone(),
            responsive: self.responsive.clone(),
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            align: self.align,
            ellipsis: self.ellipsis,
            class_name: self.class_name.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnConfig")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("data_index", &self.data_index)
            .field("render", &self.render.as_ref().map(|_| ".."))
            .field("responsive", &self.responsive)
            .field("width", &self.width)
            .field("align", &self.align)
            .finish_non_exhaustive()
    }
}

/// Default text for a cell value.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Columns shown at `breakpoint`, in declaration order.
pub fn visible_columns<T>(
    columns: &[ColumnConfig<T>],
    breakpoint: Breakpoint,
) -> Vec<&ColumnConfig<T>> {
    columns
        .iter()
        .filter(|column| column.is_visible_at(breakpoint))
        .collect()
}

/// Resolve the rendered width of `column` within a table of `table_width`
/// cells showing `total_columns` columns.
///
/// Columns without a width share the table evenly. The result is clamped to
/// the column's min/max hints.
pub fn resolve_width<T>(column: &ColumnConfig<T>, table_width: u16, total_columns: usize) -> u16 {
    let width = match column.width {
        Some(ColumnWidth::Fixed(w)) => w,
        Some(ColumnWidth::Percent(p)) => (u32::from(table_width) * u32::from(p) / 100) as u16,
        None => {
            let share = usize::from(table_width) / total_columns.max(1);
            u16::try_from(share).unwrap_or(table_width)
        }
    };
    let width = column.min_width.map_or(width, |min| width.max(min));
    column.max_width.map_or(width, |max| width.min(max))
}
