//! BookPay bridge.
//!
//! Hosts the in-app payment bridge for the web-view shell: opens checkout
//! sessions against the booking backend, classifies what the embedded
//! checkout page does, and tells the shell which screen to show next.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use bookpay_core::store::{FileStore, WalletTrail};
use bookpay_sdk::client::BackendClient;
use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// BookPay bridge - in-app payment bridge for the booking app shell
#[derive(Parser, Debug)]
#[command(name = "bookpay-bridge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "BOOKPAY_CONFIG", default_value = "./bookpay.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 127.0.0.1:8787)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting bookpay-bridge v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let http = reqwest::Client::builder()
        .timeout(loaded.backend.timeout)
        .build()?;
    let mut backend = BackendClient::new(loaded.backend.base_url.clone()).with_http_client(http);
    if let Some(token) = &loaded.backend.access_token {
        backend = backend.with_access_token(token.clone());
    }
    let backend = Arc::new(backend);

    let store = Arc::new(FileStore::open(&loaded.storage_path).await.map_err(|e| {
        tracing::error!(path = %loaded.storage_path.display(), "Failed to open local state: {}", e);
        e
    })?);
    report_leftover_trail(&WalletTrail::new(store.clone())).await;

    let (state, pipeline) = AppState::new(
        backend.clone(),
        backend,
        store,
        loaded.channel,
        loaded.amount,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let processors = pipeline.spawn(shutdown_rx);

    let reload_notify = spawn_config_reload_handler(state.clone(), config_loader);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", loaded.listen);
    let result = run_server(router, loaded.listen).await;

    reload_notify.notify_one();

    tracing::info!("Stopping payment processors...");
    let _ = shutdown_tx.send(true);
    for handle in processors {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Processor task failed");
        }
    }
    tracing::info!("Bridge shutdown complete");

    result.map_err(Into::into)
}

/// A trail left on disk means the app died with a wallet deposit open.
async fn report_leftover_trail(trail: &WalletTrail) {
    match trail.load().await {
        Ok(Some(entry)) => tracing::warn!(
            wallet_id = %entry.wallet_id,
            order_code = %entry.order_code,
            amount = entry.amount,
            "Found an unfinished wallet deposit from a previous run"
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read wallet deposit trail"),
    }
}

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
