//! Hospitalia - a terminal ledger form with spreadsheet export.
//!
//! Without arguments this runs the interactive form. The `--cache-*`
//! commands drive the offline asset cache lifecycle from the command line.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hospitalia_core::cache::{CacheShell, DiskCacheStorage, HttpNetwork, InstallOutcome};
use hospitalia_core::Config;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "hospitalia.log";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr (command-line mode)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a daily file while the terminal UI owns the screen.
/// The returned guard must be held until exit.
fn init_file_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--cache-install" {
        init_tracing();
        return cache_install(&config).await;
    }
    if args.len() > 1 && args[1] == "--cache-activate" {
        init_tracing();
        return cache_activate(&config).await;
    }
    if args.len() > 1 && args[1] == "--cache-fetch" {
        let path = args
            .get(2)
            .ok_or_else(|| anyhow::anyhow!("Usage: hospitalia --cache-fetch <path>"))?;
        init_tracing();
        return cache_fetch(&config, path).await;
    }
    if args.len() > 1 && args[1] == "--write-config" {
        config.save()?;
        eprintln!("Configuration written");
        return Ok(());
    }

    let _guard = init_file_tracing(&config)?;
    info!("Hospitalia starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Hospitalia shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// Cache commands
// ============================================================================

fn build_shell(config: &Config) -> Result<CacheShell<DiskCacheStorage, HttpNetwork>> {
    let storage = DiskCacheStorage::new(config.store_dir()?)
        .context("Failed to open cache store directory")?;
    let network = HttpNetwork::new(&config.cache.base_url, config.cache.request_timeout())
        .context("Failed to build HTTP client")?;
    Ok(CacheShell::new(
        &config.cache.version(),
        config.cache.assets.clone(),
        storage,
        network,
    ))
}

async fn cache_install(config: &Config) -> Result<()> {
    let shell = build_shell(config)?;
    match shell.install().await {
        InstallOutcome::Cached(count) => {
            eprintln!("Cached {} assets in {}", count, shell.store_name());
        }
        InstallOutcome::Failed(reason) => {
            eprintln!("Install failed, nothing cached: {}", reason);
        }
    }
    Ok(())
}

async fn cache_activate(config: &Config) -> Result<()> {
    let shell = build_shell(config)?;
    let deleted = shell
        .activate()
        .await
        .context("Failed to delete old caches")?;
    if deleted.is_empty() {
        eprintln!("No old caches to delete; current is {}", shell.store_name());
    } else {
        for name in &deleted {
            eprintln!("Deleted {}", name);
        }
    }
    Ok(())
}

async fn cache_fetch(config: &Config, path: &str) -> Result<()> {
    let shell = build_shell(config)?;
    let served = shell.fetch(path).await;

    eprintln!(
        "{} {} ({})",
        served.response.status,
        served.response.content_type.as_deref().unwrap_or("-"),
        served.source.label()
    );
    io::stdout().write_all(&served.response.body)?;
    io::stdout().flush()?;
    Ok(())
}
