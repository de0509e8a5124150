//! User interface components and views.
//!
//! This module contains all TUI rendering logic: the table view and the
//! components drawn around it.

mod components;
pub mod theme;
mod views;

pub use components::{render_context_help, Notification, NotificationManager, NotificationType};
pub use views::TableView;
