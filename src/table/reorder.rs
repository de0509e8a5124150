//! Drag-reorder state machine.
//!
//! `idle -> dragging -> idle`. The machine never keeps the data sequence; each
//! drop is computed against the rows the caller passes in, and the proposed
//! order is handed back as a [`DragResult`].

use serde::Serialize;
use tracing::debug;

use super::key::{KeyedRows, Record, RowKey, RowKeySpec};

/// Outcome of a committed drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DragResult<T> {
    pub old_index: usize,
    pub new_index: usize,
    /// The moved record.
    pub item: T,
    /// The full sequence after the move.
    pub items: Vec<T>,
}

/// New position of a record, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    pub key: RowKey,
    pub order: usize,
}

impl<T: Record> DragResult<T> {
    /// Order updates for every record of the new sequence.
    pub fn order_updates(&self, spec: &RowKeySpec<T>) -> Vec<OrderUpdate> {
        KeyedRows::new(&self.items, spec)
            .keys()
            .into_iter()
            .enumerate()
            .map(|(index, key)| OrderUpdate {
                key,
                order: index + 1,
            })
            .collect()
    }
}

pub type DragStartHandler = Box<dyn FnMut(&RowKey)>;
pub type DragEndHandler<T> = Box<dyn FnMut(&DragResult<T>)>;
pub type DragCancelHandler = Box<dyn FnMut()>;

/// Reordering configuration. `false` disables it, `true` enables it without
/// callbacks.
pub struct DraggableConfig<T> {
    pub enabled: bool,
    pub on_drag_start: Option<DragStartHandler>,
    pub on_drag_end: Option<DragEndHandler<T>>,
    pub on_drag_cancel: Option<DragCancelHandler>,
}

impl<T> Default for DraggableConfig<T> {
    fn default() -> Self {
        Self {
            enabled: true,
            on_drag_start: None,
            on_drag_end: None,
            on_drag_cancel: None,
        }
    }
}

impl<T> From<bool> for DraggableConfig<T> {
    fn from(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }
}

impl<T> DraggableConfig<T> {
    /// An enabled configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_drag_start(mut self, f: impl FnMut(&RowKey) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    pub fn on_drag_end(mut self, f: impl FnMut(&DragResult<T>) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }

    pub fn on_drag_cancel(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_drag_cancel = Some(Box::new(f));
        self
    }
}

/// In-progress drag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    pub active_id: Option<RowKey>,
    pub is_dragging: bool,
}

/// Reorder state machine for one table.
pub struct Reorder<T> {
    config: DraggableConfig<T>,
    state: DragState,
}

impl<T> Default for Reorder<T> {
    fn default() -> Self {
        Self {
            config: DraggableConfig::from(false),
            state: DragState::default(),
        }
    }
}

impl<T: Record + Clone> Reorder<T> {
    pub fn new(config: DraggableConfig<T>) -> Self {
        Self {
            config,
            state: DragState::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active_id(&self) -> Option<&RowKey> {
        self.state.active_id.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    /// Begin dragging the row `active`. No-op when reordering is disabled.
    pub fn drag_start(&mut self, active: RowKey) -> bool {
        if !self.config.enabled {
            return false;
        }
        debug!(%active, "Drag started");
        if let Some(on_drag_start) = self.config.on_drag_start.as_mut() {
            on_drag_start(&active);
        }
        self.state = DragState {
            active_id: Some(active),
            is_dragging: true,
        };
        true
    }

    /// Drop `active` onto `over`.
    ///
    /// Always returns to idle. A drop outside any row, onto itself, or
    /// involving a key missing from `rows` emits nothing. Otherwise
    /// `on_data_change` receives the new sequence, then the drag-end callback
    /// receives the result.
    pub fn drag_end(
        &mut self,
        active: &RowKey,
        over: Option<&RowKey>,
        rows: KeyedRows<'_, T>,
        on_data_change: impl FnOnce(&[T]),
    ) -> Option<DragResult<T>> {
        if !self.config.enabled {
            return None;
        }
        self.state = DragState::default();

        let over = over?;
        if active == over {
            debug!(%active, "Dropped on itself");
            return None;
        }
        let (Some(old_index), Some(new_index)) = (rows.position(active), rows.position(over))
        else {
            debug!(%active, %over, "Drop target not in data");
            return None;
        };

        let items = move_item(rows.data(), old_index, new_index);
        let result = DragResult {
            old_index,
            new_index,
            item: rows.data()[old_index].clone(),
            items,
        };
        debug!(%active, old_index, new_index, "Drag committed");

        on_data_change(&result.items);
        if let Some(on_drag_end) = self.config.on_drag_end.as_mut() {
            on_drag_end(&result);
        }
        Some(result)
    }

    /// Abandon the current drag. Returns true if a drag was in progress.
    pub fn drag_cancel(&mut self) -> bool {
        if !self.state.is_dragging {
            return false;
        }
        debug!(active = ?self.state.active_id, "Drag cancelled");
        self.state = DragState::default();
        if let Some(on_drag_cancel) = self.config.on_drag_cancel.as_mut() {
            on_drag_cancel();
        }
        true
    }
}

/// Move the element at `from` to `to`, shifting the elements in between.
///
/// An out-of-range `from` returns an unchanged copy; `to` is clamped to the
/// end of the sequence.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    let to = to.min(moved.len());
    moved.insert(to, item);
    moved
}
