//! Terminal setup and teardown.
//!
//! The guard restores the terminal when dropped, when setup fails partway and
//! when the program panics.

use std::io::{self, Stdout};
use std::panic;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

pub type Backend = CrosstermBackend<Stdout>;

/// Owns the terminal while the UI runs.
pub struct TerminalGuard {
    terminal: Terminal<Backend>,
    restored: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen with mouse capture.
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        match enter() {
            Ok(terminal) => Ok(Self {
                terminal,
                restored: false,
            }),
            Err(e) => {
                if let Err(restore_err) = restore_terminal() {
                    warn!(error = %restore_err, "Failed to restore terminal after setup error");
                }
                Err(e)
            }
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal<Backend> {
        &mut self.terminal
    }

    /// Restore the terminal now, reporting the first failure.
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        restore_terminal()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore_terminal();
        }
    }
}

fn enter() -> io::Result<Terminal<Backend>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    run_teardown(disable_raw_mode, || {
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
    })
}

/// Run both teardown steps even if the first fails.
fn run_teardown(
    leave_raw_mode: impl FnOnce() -> io::Result<()>,
    leave_screen: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let raw = leave_raw_mode();
    let screen = leave_screen();
    raw.and(screen)
}
