use std::path::PathBuf;

use clap::Parser;
use invoice_server::{config, AppState, Database};
use tokio::net::TcpListener;

/// REST backend for customers and invoices.
#[derive(Parser, Debug)]
#[command(name = "invoice-server", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (default: ./invoice-server.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), invoice_server::Error> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    }
    .map_err(Box::new)?;

    init_tracing(&config.log_level);

    let db = Database::open(&config.database_path).await?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        database = %config.database_path,
        recompute_totals = config.recompute_totals,
        "listening"
    );
    invoice_server::run_until(listener, AppState::new(db, &config), shutdown_signal()).await?;
    tracing::info!("shut down");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("invoice_server={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
