mod action;
mod api;
mod app;
mod app_state;
mod component;
mod components;
mod dashboard;
mod format;
mod log_layer;
mod mpv;
mod player;
mod search;
mod theme;
mod widgets;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vidboard_proto::config::Config;
use vidboard_proto::trim::TrimStore;

/// Terminal dashboard for browsing and trimming the video catalog.
#[derive(Debug, Parser)]
#[command(name = "vidboard", version)]
struct Args {
    /// Base URL of the catalog server (overrides [dashboard].server_url)
    #[arg(long)]
    server_url: Option<String>,

    /// Use mpv from PATH instead of a bundled copy
    #[arg(long)]
    system_mpv: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    vidboard_proto::platform::set_use_system_deps(args.system_mpv);

    let data_dir = vidboard_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("dashboard.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    let (log_tx, log_rx) = mpsc::unbounded_channel();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false),
        )
        .with(log_layer::LogBarLayer::new(log_tx))
        .with(tracing_subscriber::EnvFilter::new(log_filter))
        .init();

    eprintln!("vidboard log: {}", log_path.display());
    tracing::info!("vidboard starting…");

    // Leave the terminal usable if anything panics inside the UI.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = ratatui::crossterm::terminal::disable_raw_mode();
        let _ = ratatui::crossterm::execute!(
            std::io::stdout(),
            ratatui::crossterm::terminal::LeaveAlternateScreen,
            ratatui::crossterm::event::DisableMouseCapture
        );
        eprintln!("Something went wrong: {}", info);
        default_hook(info);
    }));

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {}; using defaults", e);
        Config::default()
    });
    let server_url = args
        .server_url
        .unwrap_or_else(|| config.dashboard.server_url.clone());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let store = TrimStore::open(config.paths.trims_file.clone());
    let app = app::App::new(&config, server_url, store, log_path, log_rx);
    app.run().await?;

    tracing::info!("vidboard exiting");
    Ok(())
}
