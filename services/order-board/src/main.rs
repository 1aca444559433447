//! Order board - Main Entry Point

use anyhow::Result;
use clap::{Arg, Command};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_board::{BoardConfig, start_server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_board=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let matches = Command::new("order-board")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Restaurant order board with live kitchen display")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("order-board.toml"),
        )
        .arg(
            Arg::new("routes")
                .long("routes")
                .help("Print available routes and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Print routes if requested
    if matches.get_flag("routes") {
        order_board::server::print_routes();
        return Ok(());
    }

    // Load configuration
    let config_path = matches
        .get_one::<String>("config")
        .map_or("order-board.toml", String::as_str);
    let config = match BoardConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path, e);
            info!("Using default configuration");
            BoardConfig::default()
        }
    };

    info!(
        "Starting order board v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Server will bind to: {}", config.server_address());
    info!("Order store: {}", config.database.url);
    info!("Features enabled:");
    info!("  CORS: {}", config.cors.enabled);
    info!("  Metrics: {}", config.monitoring.metrics_enabled);

    // Start the server
    if let Err(e) = start_server(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
