mod http;
mod store;

use clap::Parser;
use std::sync::Arc;
use store::CatalogStore;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vidboard_proto::catalog::CatalogSource;
use vidboard_proto::config::Config;

/// Paginated read API over the bundled video catalog.
#[derive(Debug, Parser)]
#[command(name = "vidboard-server", version)]
struct Args {
    /// Address to bind (overrides [server].bind_address)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides [server].port)
    #[arg(long)]
    port: Option<u16>,

    /// `bundled`, a catalog file path or an http(s) URL (overrides [server].catalog)
    #[arg(long)]
    catalog: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = vidboard_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("server.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,vidboard_server=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    let bind = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let source = CatalogSource::parse(args.catalog.as_deref().unwrap_or(&config.server.catalog));
    info!("Catalog source: {}", source);

    let store = Arc::new(CatalogStore::new(source));
    http::start_server(bind, port, store).await?;
    Ok(())
}
