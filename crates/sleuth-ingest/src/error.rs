//! Ingestion errors. Row-level variants carry the 1-based file line.
use sleuth_core::error::WalletError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("csv: {0}")] Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")] MissingColumn(&'static str),
    #[error("line {line}: invalid value '{value}'")] InvalidValue { line: u64, value: String },
    #[error("line {line}: invalid timestamp '{value}'")] InvalidTimestamp { line: u64, value: String },
    #[error("line {line}: {source}")] InvalidWallet { line: u64, source: WalletError },
}
