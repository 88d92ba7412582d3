//! # sleuth-ingest — Ledger ingestion.
//!
//! Turns a CSV export into the validated [`TxRecord`](sleuth_core::TxRecord)
//! sequence the engine consumes:
//! - header aliases are normalized (`sender`/`from`, `receiver`/`to`,
//!   `amount`/`value`, `timestamp`/`time`), other columns are ignored;
//! - rows with a non-positive value are dropped and counted;
//! - timestamps may be Unix seconds or RFC 3339.

pub mod columns;
pub mod error;
pub mod reader;

pub use error::IngestError;
pub use reader::{IngestReport, parse_timestamp, read_records, read_records_from_path};
