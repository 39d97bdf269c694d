// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the dashboard TUI starts. Subcommands:
// - config --show|--path|--reset|--edit: configuration management
// - projects: list projects
// - status [project-id]: git status of a project (default: active)
// - search <query>: one palette search, printed by section

use crate::api::{ApiClient, Project};
use crate::config::{Config, VERSION};
use crate::dashboard::palette::PaletteItem;
use crate::dashboard::{CommandPalette, DashboardCache, SearchResults};
use crate::tui::effects::degrade;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::Command;
use std::time::Instant;

/// SpecDeck - terminal dashboard for spec-driven projects
#[derive(Parser)]
#[command(name = "specdeck")]
#[command(version = VERSION)]
#[command(about = "Terminal dashboard for spec-driven projects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
    /// List registered projects
    Projects,
    /// Show git status of a project (defaults to the active one)
    Status {
        project_id: Option<String>,
    },
    /// Search changes, documents, AI index and memory
    Search {
        query: String,

        /// Maximum results per remote source
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else if edit {
        handle_config_edit();
    } else {
        println!("Usage: specdeck config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless commands
// ─────────────────────────────────────────────────────────────────────────────

pub async fn run_headless(command: Commands, config: &Config, api: &ApiClient) -> Result<()> {
    match command {
        Commands::Config {
            show,
            reset,
            edit,
            path,
        } => {
            handle_config(show, reset, edit, path);
            Ok(())
        }
        Commands::Projects => print_projects(api).await,
        Commands::Status { project_id } => print_status(api, project_id).await,
        Commands::Search { query, limit } => {
            let mut palette_config = config.palette.clone();
            if let Some(limit) = limit {
                palette_config.result_limit = limit;
            }
            let palette = search_once(api, &palette_config, &query).await?;
            for line in section_lines(&palette) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

async fn print_projects(api: &ApiClient) -> Result<()> {
    let projects = api
        .list_projects()
        .await
        .context("Failed to list projects")?;
    if projects.is_empty() {
        println!("No projects registered.");
    }
    for project in &projects {
        println!("{}", project_line(project));
    }
    Ok(())
}

/// `* web  (2 changes)  /home/dev/web`, `*` marking the active project
pub fn project_line(project: &Project) -> String {
    let count = project.changes.len();
    format!(
        "{} {}  ({} change{})  {}",
        if project.is_active { "*" } else { " " },
        project.name,
        count,
        if count == 1 { "" } else { "s" },
        project.path
    )
}

async fn print_status(api: &ApiClient, project_id: Option<String>) -> Result<()> {
    let projects = api
        .list_projects()
        .await
        .context("Failed to list projects")?;
    let project = match &project_id {
        Some(id) => projects.iter().find(|p| &p.id == id),
        None => projects.iter().find(|p| p.is_active),
    }
    .context(match project_id {
        Some(id) => format!("No project with id {}", id),
        None => "No active project".to_string(),
    })?;

    let status = api
        .git_status(&project.id)
        .await
        .with_context(|| format!("Failed to get git status for {}", project.name))?;

    println!("{}  {}", project.name, project.path);
    println!("branch  {}  ↑{} ↓{}", status.branch, status.ahead, status.behind);
    for (label, files) in [
        ("staged", &status.staged),
        ("modified", &status.modified),
        ("untracked", &status.untracked),
    ] {
        for file in files {
            println!("  {:<10} {}", label, file);
        }
    }
    if !status.is_dirty() {
        println!("  clean");
    }
    Ok(())
}

/// Run the palette search once, without debounce, and wait for every source
async fn search_once(
    api: &ApiClient,
    config: &crate::config::PaletteConfig,
    query: &str,
) -> Result<CommandPalette> {
    let mut cache = DashboardCache::default();
    match api.list_projects().await {
        Ok(projects) => cache.replace_projects(projects),
        Err(e) => tracing::warn!("Searching without local changes: {}", e),
    }

    let mut palette = CommandPalette::new(config);
    palette.open();
    palette.set_query(query, Instant::now());
    let Some(request) = palette.fire(&cache) else {
        return Ok(palette);
    };

    let (docs, semantic, memory) = futures::future::join3(
        api.search_docs(&request.query, request.limit),
        api.search_semantic(&request.query, request.limit),
        api.search_memory(&request.query, request.limit),
    )
    .await;
    palette.apply(request.generation, SearchResults::Docs(degrade("docs", docs)));
    palette.apply(
        request.generation,
        SearchResults::Semantic(degrade("semantic", semantic)),
    );
    palette.apply(
        request.generation,
        SearchResults::Memory(degrade("memory", memory)),
    );
    Ok(palette)
}

/// Palette sections as plain text, in palette order
pub fn section_lines(palette: &CommandPalette) -> Vec<String> {
    let mut lines = Vec::new();
    for section in palette.sections() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("## {}", section.kind.title()));
        lines.extend(section.items.iter().map(|item| item_line(item)));
    }
    if lines.is_empty() {
        lines.push("No results.".to_string());
    }
    lines
}

fn item_line(item: &PaletteItem) -> String {
    let detail = item.detail();
    if detail.is_empty() {
        format!("  {}", item.label())
    } else {
        format!("  {}  ({})", item.label(), detail)
    }
}
