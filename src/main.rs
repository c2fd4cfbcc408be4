mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use staycal_core::config::StayCalConfig;
use staycal_core::window::DateWindow;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "staycal")]
#[command(about = "Inspect booking calendar feeds as merged stays and blocks")]
struct Cli {
    /// Directory of *.json day feeds (overrides feed_dir from config)
    #[arg(long, global = true)]
    feed_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WindowArgs {
    /// First month to load (YYYY-MM), defaults to the current month
    #[arg(long)]
    from: Option<String>,

    /// Number of months to load
    #[arg(long)]
    months: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stays and unavailability blocks in the window
    Events {
        #[command(flatten)]
        window: WindowArgs,

        /// Print events and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which event a date belongs to and where it sits in it
    Day {
        /// Date to look up (YYYY-MM-DD)
        date: String,
    },
    /// Report data-quality problems in the feed
    Check {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Export events as an .ics calendar
    Export {
        #[command(flatten)]
        window: WindowArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show config and feed paths
    Config,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = StayCalConfig::load()?;
    let feed_dir = cli.feed_dir.unwrap_or_else(|| config.feed_path());

    match cli.command {
        Commands::Events { window, json } => {
            commands::events::run(&feed_dir, resolve_window(&window, &config)?, json)
        }
        Commands::Day { date } => commands::day::run(&feed_dir, &date),
        Commands::Check { window } => {
            commands::check::run(&feed_dir, resolve_window(&window, &config)?)
        }
        Commands::Export { window, output } => commands::export::run(
            &feed_dir,
            resolve_window(&window, &config)?,
            output.as_deref(),
        ),
        Commands::Config => commands::config::run(&config, &feed_dir),
    }
}

/// Log to stderr; STAYCAL_LOG takes an EnvFilter directive (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("STAYCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// An explicit --from wins; otherwise the window is placed around the
/// current month as configured.
fn resolve_window(args: &WindowArgs, config: &StayCalConfig) -> Result<DateWindow> {
    let months = args.months.unwrap_or(config.window_months).max(1);

    let window = match args.from.as_deref() {
        Some(from) => DateWindow::from_args(Some(from), Some(months))?,
        None => {
            let before = config.months_before.min(months - 1);
            DateWindow::around(Local::now().date_naive(), before, months - 1 - before)?
        }
    };

    Ok(window)
}
