use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use tokio::io::BufReader;

mod app;
mod config;
mod console;
mod datetime;
mod error;
mod format;
mod ledger;
mod logger;
mod session;
mod timer;
mod tracker;

use config::{parse_tick_interval, EmptyProjectPolicy, ResetPolicy, TrackerConfig};
use console::ConsoleMarkdownList;
use datetime::SystemClock;
use logger::init_logger;
use tracker::TimeTracker;

/// プロジェクトごとの作業時間を計測するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run
/// $ cargo run -- --keep-suggestions --empty-project unnamed
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        long = "tick-ms",
        help = "Sets the display refresh interval in milliseconds",
        default_value = "16",
        value_parser = parse_tick_interval,
    )]
    tick_interval: Duration,

    #[clap(long = "keep-suggestions", help = "Keep project suggestions on reset")]
    keep_suggestions: bool,

    #[clap(
        long = "empty-project",
        help = "How to treat an empty project name",
        value_enum,
        default_value = "reject"
    )]
    empty_project: EmptyProjectPolicy,

    #[clap(
        long = "log-level",
        help = "Sets the log level",
        value_parser,
        default_value = "warn"
    )]
    log_level: LevelFilter,

    #[clap(long = "log-file", help = "Writes logs to a file instead of stderr", value_parser)]
    log_file: Option<PathBuf>,
}

impl From<&Args> for TrackerConfig {
    fn from(args: &Args) -> Self {
        let reset_policy = if args.keep_suggestions {
            ResetPolicy::KeepSuggestions
        } else {
            ResetPolicy::ClearSuggestions
        };

        Self {
            reset_policy,
            empty_project_policy: args.empty_project,
            tick_interval: args.tick_interval,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.log_level, args.log_file.as_deref())?;
    let config = TrackerConfig::from(&args);
    info!("Config: {:?}", config);

    let tick_interval = config.tick_interval;
    let mut tracker = TimeTracker::new(SystemClock, config);
    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut stdout);
    let input = BufReader::new(tokio::io::stdin());

    app::run(&mut tracker, &mut presenter, input, tick_interval)
        .await
        .context("Failed to run time tracker")?;

    Ok(())
}
