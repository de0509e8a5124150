//! LazyTable - a reorderable, selectable table in the terminal.
//!
//! Loads JSON records (or a built-in sample set) and shows them in a table
//! whose rows can be selected and reordered from the keyboard.

mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{error, info};

use lazytable::app::{App, AppOptions};
use lazytable::config::Config;
use lazytable::data;
use lazytable::error::AppError;
use lazytable::events::EventHandler;
use lazytable::logging;
use lazytable::table::ColumnConfig;

use crate::terminal::TerminalGuard;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "lazytable", version, about = "A reorderable, selectable table in the terminal")]
struct Cli {
    /// JSON file holding an array of records. Defaults to a sample data set.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Configuration file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Record field to use as the row key.
    #[arg(long)]
    row_key: Option<String>,

    /// Allow only one selected row.
    #[arg(long)]
    radio: bool,

    /// Disable row reordering.
    #[arg(long)]
    no_drag: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = load(&cli).and_then(|(config, columns, records)| {
        let options = AppOptions {
            row_key: cli.row_key.clone(),
            radio: cli.radio,
            no_drag: cli.no_drag,
        };
        run(&config, columns, records, &options)
    });

    if let Err(e) = &result {
        error!(error = %e, "Exiting with error");
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            eprintln!("{}", app_error.user_message());
            if let Some(action) = app_error.suggested_action() {
                eprintln!("{}", action);
            }
        }
    }
    logging::shutdown();
    result
}

type Loaded = (Config, Vec<ColumnConfig<Value>>, Vec<Value>);

fn load(cli: &Cli) -> Result<Loaded> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(AppError::from)?;

    let (columns, records) = match &cli.data {
        Some(path) => {
            let mut records = data::load_records(path).map_err(AppError::from)?;
            data::sort_by_order(&mut records);
            (data::infer_columns(&records), records)
        }
        None => (data::sample_columns(), data::sample_records()),
    };
    info!(rows = records.len(), columns = columns.len(), "Data ready");
    Ok((config, columns, records))
}

fn run(
    config: &Config,
    columns: Vec<ColumnConfig<Value>>,
    records: Vec<Value>,
    options: &AppOptions,
) -> Result<()> {
    let mut guard = TerminalGuard::new()
        .map_err(|e| AppError::terminal(e.to_string()))
        .context("set up terminal")?;
    let width = guard.terminal().size().map(|size| size.width).unwrap_or(80);

    let mut app = App::new(config, columns, records, options, width);
    let events = EventHandler::new();

    let mut result = Ok(());
    while !app.should_quit() {
        if let Err(e) = guard.terminal().draw(|frame| app.view(frame)) {
            result = Err(e).context("draw frame");
            break;
        }
        match events.next() {
            Ok(event) => app.update(event),
            Err(e) => {
                result = Err(e).context("read event");
                break;
            }
        }
    }

    let restored = guard.restore().context("restore terminal");
    result.and(restored)
}
