//! LazyTable - a reorderable, selectable table core with a terminal front end.
//!
//! The [`table`] module holds the state machines and is usable on its own;
//! the remaining modules make up the `lazytable` binary.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logging;
pub mod table;
pub mod ui;
