//! Paysheet Server
//!
//! A payment back office that keeps purchases, referrals and refunds in a
//! spreadsheet and reconciles them against PayMongo payment links.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use paysheet_core::gateway::PaymongoGateway;
use paysheet_core::sheets::{GoogleSheets, ServiceAccount};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Paysheet - spreadsheet-backed payment back office
#[derive(Parser, Debug)]
#[command(name = "paysheet-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "PAYSHEET_CONFIG", default_value = "./paysheet.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting paysheet-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let gateway_url = loaded_config.gateway.base_url.clone();
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Reloadable sections go behind locks; the spreadsheet connection is fixed
    let (shared_config, sheets_config) = loaded_config.into_shared();

    let account = ServiceAccount::new(
        sheets_config.service_account_email,
        &sheets_config.private_key,
    )
    .map_err(|e| {
        tracing::error!("Failed to load service account: {}", e);
        e
    })?;
    let sheets = GoogleSheets::new(sheets_config.spreadsheet_id, account);
    tracing::info!(gateway = %gateway_url, "Spreadsheet and gateway clients ready");
    let gateway = PaymongoGateway::new(gateway_url);

    // Create application state
    let state = AppState::new(Arc::new(sheets), Arc::new(gateway), shared_config);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
