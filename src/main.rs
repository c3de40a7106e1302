mod app;
mod cli;
mod infra;
mod ui;

use std::io;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use lv_base::config::constants::STORE_DIR;
use lv_base::config::{self, AppConfig};
use lv_base::logging;
use lv_base::storage::FileStorage;
use lv_mod_params::ParameterStore;

use app::App;
use app::host::Host;
use cli::Cli;
use infra::analyzer::{AnalyzerEvent, HttpAnalyzer};
use infra::opener::CommandOpener;
use infra::server::{AnalyzerServer, find_free_port};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut cfg = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut cfg);
    config::install(cfg.clone());

    let log_path = logging::init(Path::new(STORE_DIR), cli.log.as_deref()).context("failed to set up logging")?;

    let launch_file = std::path::absolute(&cli.launch_file)
        .with_context(|| format!("invalid launch file path {}", cli.launch_file.display()))?;
    let file_path = launch_file.display().to_string();
    tracing::info!(file = %file_path, log = %log_path.display(), "starting");

    let analyzer = &cfg.analyzer;
    let port = if analyzer.spawn && analyzer.port == 0 {
        find_free_port().context("no free port for the analyzer")?
    } else {
        analyzer.port
    };

    // Killed on drop
    let _server = if analyzer.spawn {
        let mut server = AnalyzerServer::spawn(&analyzer.program, port)
            .with_context(|| format!("failed to start {}", analyzer.program))?;
        if !server.wait_until_ready(&analyzer.host, Duration::from_millis(analyzer.startup_wait_ms)) {
            tracing::warn!(port = server.port(), "analyzer not ready yet, requests may fail");
        }
        Some(server)
    } else {
        None
    };

    let client = HttpAnalyzer::new(&analyzer.host, port, analyzer.request_timeout_secs)
        .context("failed to build analyzer client")?;
    tracing::info!(url = client.base_url(), "analyzer client ready");

    let mut store = ParameterStore::new(Box::new(FileStorage::new(STORE_DIR)));
    store.load();
    let opener = CommandOpener::new(&cfg.opener);

    // Panic hook: restore terminal state and log the panic.
    // A panic would otherwise leave the terminal in raw mode + alternate screen.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let backtrace = std::backtrace::Backtrace::force_capture();
        tracing::error!("panic: {}\n\n{}", info, backtrace);
        default_hook(info);
    }));

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let (tx, rx) = mpsc::channel::<AnalyzerEvent>();
    let host = Host::new(file_path, Arc::new(client), tx, store, Box::new(opener), cfg.tree.clone());
    let mut app = App::new(host, rx);
    let result = app.run(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result.context("terminal error")?;
    tracing::info!("bye");
    Ok(())
}
