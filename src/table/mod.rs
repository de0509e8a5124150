//! Table core: key resolution, responsive columns, selection, reordering and
//! the assembled [`Table`].

mod assembly;
mod column;
mod key;
mod reorder;
mod responsive;
mod selection;
mod timing;

pub use assembly::{
    DataChangeHandler, RowAction, RowDescriptor, RowEvent, RowHandler, SelectionHeader, Table,
    TableBody, TableColumn, DRAG_COLUMN_KEY, SELECTION_COLUMN_KEY,
};
pub use column::{
    format_value, resolve_width, visible_columns, Alignment, Breakpoint, CellRenderer,
    ColumnConfig, ColumnWidth,
};
pub use key::{resolve_key, KeyFn, KeyedRows, Record, RowKey, RowKeySpec};
pub use reorder::{
    move_item, DragCancelHandler, DragEndHandler, DragResult, DragStartHandler, DragState,
    DraggableConfig, OrderUpdate, Reorder,
};
pub use responsive::{BreakpointThresholds, Viewport};
pub use selection::{
    ChangeHandler, CheckboxProps, CheckboxPropsFn, NativeEvent, RowSelection, RowSelectionConfig,
    SelectAllHandler, SelectHandler, SelectionStatus, SelectionType,
};
pub use timing::{Debouncer, Throttle};
