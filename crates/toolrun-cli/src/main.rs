//! toolrun - inspect, replay and view agent tool runs

mod config;
mod replay;
mod summarize;
mod viewer;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use toolrun_core::SyncStatus;
use toolrun_tui::widgets::SyncStatusBadge;

/// toolrun - agent tool run inspector
#[derive(Parser, Debug)]
#[command(name = "toolrun")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a turn state JSON document
    Summarize {
        /// Path to the state file
        path: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Apply a JSONL event log and print each finished turn
    Replay {
        /// Path to the event log
        path: PathBuf,
        /// Emit one JSON summary per finished turn
        #[arg(long)]
        json: bool,
        /// Output width for tool cards
        #[arg(long, default_value_t = 100)]
        width: usize,
    },

    /// Replay an event log in the terminal viewer
    View {
        /// Path to the event log
        path: PathBuf,
        /// Delay between events in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Start paused
        #[arg(long)]
        paused: bool,
    },

    /// Print the badge for a knowledge sync status
    SyncStatus {
        /// QUEUED, RUNNING, SUCCEEDED or FAILED
        status: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("toolrun_core=debug,toolrun_cli=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        let path = config::Config::init().context("Error creating config")?;
        println!("Config file created at: {}", path.display());
        println!("\nExample config:\n{}", config::example_config());
        return Ok(());
    }

    let cfg = config::Config::load();

    let Some(command) = args.command else {
        eprintln!("No command given. Try `toolrun --help`.");
        std::process::exit(2);
    };

    match command {
        Command::Summarize { path, pretty } => {
            let state = summarize::load_state(&path)?;
            let stdout = std::io::stdout();
            summarize::write_summary(&state, pretty, &mut stdout.lock())
        }
        Command::Replay { path, json, width } => {
            let events = replay::load_events(&path)?;
            let options = replay::ReplayOptions {
                json,
                theme: cfg.theme(),
                width,
                result_preview: cfg.result_preview_chars(),
                progress_label: cfg.progress_label(),
            };
            let stdout = std::io::stdout();
            replay::replay(events, &options, &mut stdout.lock())
        }
        Command::View {
            path,
            interval_ms,
            paused,
        } => {
            let events = replay::load_events(&path)?;
            run_viewer(events, &cfg, interval_ms, paused).await
        }
        Command::SyncStatus { status } => {
            let status: SyncStatus = status.parse()?;
            let theme = cfg.theme();
            let line = SyncStatusBadge::new(status, &theme).line();
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            println!("{}", text);
            Ok(())
        }
    }
}

async fn run_viewer(
    events: Vec<toolrun_core::TurnEvent>,
    cfg: &config::Config,
    interval_ms: Option<u64>,
    paused: bool,
) -> anyhow::Result<()> {
    let interval = Duration::from_millis(interval_ms.unwrap_or_else(|| cfg.replay_interval_ms()));
    let mut viewer = viewer::ReplayViewer::new(events, interval, cfg.theme())
        .with_progress_label(cfg.progress_label())
        .with_result_preview(cfg.result_preview_chars())
        .with_paused(paused);

    let mut app = toolrun_tui::App::new()?;
    app.run_async(&mut viewer).await?;
    Ok(())
}
