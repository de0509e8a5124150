//! Reusable UI components.

mod help_bar;
mod notification;

pub use help_bar::render_context_help;
pub use notification::{Notification, NotificationManager, NotificationType};
