//! Viewport watching.
//!
//! Maps a viewport width onto a [`Breakpoint`]. The host feeds every resize
//! notification straight into [`Viewport::resize`]; nothing is debounced here.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::column::Breakpoint;

/// Minimum widths at which each tier above `sm` starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakpointThresholds {
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
}

impl Default for BreakpointThresholds {
    fn default() -> Self {
        Self {
            md: 640,
            lg: 768,
            xl: 1024,
        }
    }
}

impl BreakpointThresholds {
    /// Breakpoint for a viewport `width` wide.
    pub fn breakpoint_for(&self, width: u32) -> Breakpoint {
        if width < self.md {
            Breakpoint::Sm
        } else if width < self.lg {
            Breakpoint::Md
        } else if width < self.xl {
            Breakpoint::Lg
        } else {
            Breakpoint::Xl
        }
    }

    /// Whether the thresholds are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.md < self.lg && self.lg < self.xl
    }

    /// Divide every threshold by `unit`, e.g. pixels per terminal cell.
    pub fn scaled_down(&self, unit: u32) -> Self {
        let unit = unit.max(1);
        Self {
            md: self.md / unit,
            lg: self.lg / unit,
            xl: self.xl / unit,
        }
    }
}

/// Tracks the current viewport width and its breakpoint.
#[derive(Debug, Clone)]
pub struct Viewport {
    thresholds: BreakpointThresholds,
    width: u32,
    breakpoint: Breakpoint,
}

impl Viewport {
    /// Create a viewport of the given width.
    pub fn new(thresholds: BreakpointThresholds, width: u32) -> Self {
        Self {
            thresholds,
            width,
            breakpoint: thresholds.breakpoint_for(width),
        }
    }

    /// Apply a resize. Returns true if the breakpoint changed.
    pub fn resize(&mut self, width: u32) -> bool {
        self.width = width;
        let next = self.thresholds.breakpoint_for(width);
        if next == self.breakpoint {
            return false;
        }
        debug!(from = %self.breakpoint, to = %next, width, "Breakpoint changed");
        self.breakpoint = next;
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn is_mobile(&self) -> bool {
        self.breakpoint == Breakpoint::Sm
    }

    pub fn is_tablet(&self) -> bool {
        self.breakpoint == Breakpoint::Md
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self.breakpoint, Breakpoint::Lg | Breakpoint::Xl)
    }

    pub fn is_large_desktop(&self) -> bool {
        self.breakpoint == Breakpoint::Xl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = BreakpointThresholds::default();
        assert_eq!(t.breakpoint_for(320), Breakpoint::Sm);
        assert_eq!(t.breakpoint_for(639), Breakpoint::Sm);
        assert_eq!(t.breakpoint_for(640), Breakpoint::Md);
        assert_eq!(t.breakpoint_for(767), Breakpoint::Md);
        assert_eq!(t.breakpoint_for(768), Breakpoint::Lg);
        assert_eq!(t.breakpoint_for(1023), Breakpoint::Lg);
        assert_eq!(t.breakpoint_for(1024), Breakpoint::Xl);
    }

    #[test]
    fn test_scaled_down_to_cells() {
        let cells = BreakpointThresholds::default().scaled_down(8);
        assert_eq!(cells, BreakpointThresholds { md: 80, lg: 96, xl: 128 });
        assert_eq!(cells.breakpoint_for(100), Breakpoint::Lg);
    }

    #[test]
    fn test_ordered() {
        assert!(BreakpointThresholds::default().is_ordered());
        assert!(!BreakpointThresholds { md: 10, lg: 10, xl: 20 }.is_ordered());
    }

    #[test]
    fn test_resize_reports_changes_only() {
        let mut viewport = Viewport::new(BreakpointThresholds::default(), 1200);
        assert!(viewport.is_large_desktop());
        assert!(viewport.is_desktop());

        assert!(!viewport.resize(1100));
        assert_eq!(viewport.width(), 1100);

        assert!(viewport.resize(700));
        assert_eq!(viewport.breakpoint(), Breakpoint::Md);
        assert!(viewport.is_tablet());
        assert!(!viewport.is_desktop());

        assert!(viewport.resize(300));
        assert!(viewport.is_mobile());
    }
}
