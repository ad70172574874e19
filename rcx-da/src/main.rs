//! rcx-da - Deal Automation Microservice
//!
//! Runs the RUNE document-intake pipeline: upload → extraction → mapped
//! financial summary → Deal Quality Index → draft deal, all trackable by
//! polling job status. State is held in process memory for the life of
//! the service.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rcx_da::config::DaConfig;
use rcx_da::AppState;

#[derive(Debug, Parser)]
#[command(name = "rcx-da", about = "RCX deal automation microservice")]
struct Args {
    /// Path to a TOML config file (overrides the resolution chain)
    #[arg(long)]
    config: Option<String>,

    /// Listener port (overrides config file and RCX_DA_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = DaConfig::load(args.config.as_deref(), args.port)?;

    info!("Starting rcx-da (Deal Automation) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config);
    let shutdown = state.shutdown.clone();
    let app = rcx_da::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::error!("Failed to install shutdown signal handler");
                return;
            }
            info!("Shutdown signal received");
            // In-flight pipeline runs fold into job errors instead of
            // lingering in `processing`
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
