use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crypto_icon_api::{config::Config, icons::IconStore, manifest::ManifestService, web::WebServer};

#[derive(Parser)]
#[command(name = "crypto-icon-api")]
#[command(version)]
#[command(about = "A small HTTP API serving a static collection of cryptocurrency icons")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("crypto_icon_api={},tower_http=trace", cli.log_level)
    } else {
        format!("crypto_icon_api={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Crypto Icon API v{}", env!("CARGO_PKG_VERSION"));

    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let store = IconStore::new(config.storage.icons_dir.clone());
    let manifest = ManifestService::new(
        store.clone(),
        config.storage.manifest_path.clone(),
        config.web.base_url.clone(),
    );

    // Startup rebuild is best-effort: a failure leaves the previous artifact
    // in place and the server still comes up.
    if let Err(e) = manifest.rebuild().await {
        error!("Failed to build manifest at startup: {}", e);
    }

    let web_server = WebServer::new(config, store, manifest)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
