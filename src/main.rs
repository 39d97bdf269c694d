// SpecDeck - terminal dashboard for spec-driven projects
//
// A client of the local dashboard HTTP API. Shows projects with their
// changes, a command palette over changes, documents, the AI index and
// memory, git status of the active project and architecture diagrams.
//
// Architecture:
// - API client (reqwest): typed calls against the dashboard server
// - Dashboard state: sidebar tree, palette, reorder, diagram viewport
// - TUI (ratatui): event loop that applies input and API results to state
// - Effects: every API call runs as its own task and reports back over mpsc

mod api;
mod cli;
mod config;
mod dashboard;
mod logging;
mod theme;
mod tui;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::LogBuffer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management never needs logging or the API
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = cli.command
    {
        cli::handle_config(show, reset, edit, path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    // TUI mode captures logs into the buffer so they don't garble the display;
    // headless commands log to stderr. The guard flushes the log file on exit.
    let tui_mode = cli.command.is_none();
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, tui_mode, &log_buffer);

    let api = api::ApiClient::new(&config.api).with_context(|| {
        format!("Invalid dashboard API base URL: {}", config.api.base_url)
    })?;
    tracing::debug!("SpecDeck {} starting", config::VERSION);

    match cli.command {
        None => tui::run_tui(config, api, log_buffer).await,
        Some(command) => cli::run_headless(command, &config, &api).await,
    }
}
