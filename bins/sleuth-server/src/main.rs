//! Sleuth API server.
//!
//! Serves suspicion scores for the configured ledger over HTTP. Every request
//! recomputes the analysis from the ledger file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sleuth_service::logging::init_logging;
use sleuth_service::{AppState, LogFormat, SleuthConfig, router};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "sleuth-server",
    version,
    about = "HTTP API exposing wallet suspicion scores"
)]
struct Args {
    /// TOML config file (default: ./sleuth.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ledger CSV to analyze (overrides config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:5000 (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    /// Load the layered config, then apply command-line overrides.
    fn into_config(self) -> Result<SleuthConfig> {
        let mut config = SleuthConfig::load(self.config.as_deref())?;
        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config.log_level, config.log_format);

    info!("Sleuth server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        data = %config.data_path.display(),
        bind = %config.bind_addr,
        max_hops = config.detection.max_hops,
        max_seeds = config.detection.max_seeds,
        edge_mode = ?config.detection.edge_mode,
        "starting"
    );

    let bind_addr = config.bind_addr.clone();
    let app = router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received Ctrl+C, shutting down");
            }
        })
        .await?;

    info!("Sleuth server stopped");
    Ok(())
}
