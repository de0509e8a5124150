//! Theme and styling configuration.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

static THEME: OnceLock<Theme> = OnceLock::new();

/// Color theme for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Highlight color for the cursor row.
    pub highlight: Color,
    /// Foreground of selected rows.
    pub selected: Color,
    /// The row being dragged.
    pub dragging: Color,
    /// Marker of the drop position.
    pub drop_target: Color,
    /// Rows whose checkbox is disabled.
    pub disabled: Color,
    pub header: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            highlight: Color::Cyan,
            selected: Color::Green,
            dragging: Color::Yellow,
            drop_target: Color::Magenta,
            disabled: Color::DarkGray,
            header: Color::Cyan,
            border: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}

/// The application theme.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
