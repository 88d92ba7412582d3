//! Configuration for the Sleuth service and CLI.
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults ([`SleuthConfig::default`]);
//! 2. a TOML file (`sleuth.toml` in the working directory if present, or an
//!    explicit path, which must exist);
//! 3. environment variables prefixed `SLEUTH__`, with `__` between nesting
//!    levels, e.g. `SLEUTH__BIND_ADDR` or `SLEUTH__DETECTION__MAX_HOPS`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sleuth_engine::DetectionParams;

/// Config file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sleuth.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleuthConfig {
    /// Ledger CSV analyzed by the service.
    pub data_path: PathBuf,
    /// Socket address for the HTTP server.
    pub bind_addr: String,
    /// Log level filter string (e.g. "info", "debug", "sleuth_engine=trace").
    pub log_level: String,
    pub log_format: LogFormat,
    pub detection: DetectionParams,
}

impl Default for SleuthConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/transactions.csv"),
            bind_addr: "127.0.0.1:5000".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            detection: DetectionParams::default(),
        }
    }
}

impl SleuthConfig {
    /// Load from the layered sources and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("SLEUTH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to build configuration")?;

        let cfg: Self = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.detection
            .validate()
            .context("invalid detection parameters")?;
        anyhow::ensure!(!self.bind_addr.trim().is_empty(), "bind_addr must not be empty");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::graph::EdgeMode;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let cfg = SleuthConfig::default();
        assert_eq!(cfg.bind_addr, "127.0.0.1:5000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.data_path, PathBuf::from("data/transactions.csv"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_toml(
            r#"
            bind_addr = "0.0.0.0:9000"
            log_format = "json"

            [detection]
            max_hops = 2
            edge_mode = "per_transaction"

            [detection.weights]
            peeling = 5
            "#,
        );
        let cfg = SleuthConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.detection.max_hops, 2);
        assert_eq!(cfg.detection.edge_mode, EdgeMode::PerTransaction);
        assert_eq!(cfg.detection.weights.peeling, 5);
        assert_eq!(cfg.detection.weights.fan_out, 3);
        assert_eq!(cfg.detection.fan_min_degree, 5);
    }

    #[test]
    fn invalid_detection_rejected() {
        let file = write_toml("[detection]\npeel_retain_ratio = 1.5\n");
        assert!(SleuthConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SleuthConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }
}
