//! # sleuth-service — Configuration, analysis runs, and the HTTP API.
//!
//! - [`config::SleuthConfig`] — layered configuration (defaults, TOML file, environment)
//! - [`analysis`] — ingest a ledger file and run the engine over it
//! - [`api`] — axum router exposing health, analysis summary, and results
//! - [`export`] — suspicious-wallet CSV export
//! - [`logging`] — tracing subscriber setup shared by the binaries

pub mod analysis;
pub mod api;
pub mod config;
pub mod export;
pub mod logging;

pub use analysis::{RunOutput, run_file};
pub use api::{AppState, router};
pub use config::{LogFormat, SleuthConfig};
pub use export::{DEFAULT_EXPORT_FILE, export_suspects, write_suspects};
