//! CSV ledger reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use sleuth_core::constants::MILLIS_PER_SEC;
use sleuth_core::types::{Timestamp, TxRecord, Wallet};
use tracing::{debug, info};

use crate::columns::{Columns, Field};
use crate::error::IngestError;

/// Records accepted from a ledger, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub records: Vec<TxRecord>,
    /// Data rows read, including dropped ones.
    pub rows: usize,
    /// Rows dropped because their value was zero, negative or NaN.
    pub dropped_non_positive: usize,
}

/// Parse a timestamp cell into Unix milliseconds.
///
/// Accepts integer or fractional Unix seconds (rounded to the nearest
/// millisecond), RFC 3339, and `YYYY-MM-DD HH:MM:SS[.fff]` read as UTC.
///
/// # Examples
///
/// ```
/// use sleuth_ingest::parse_timestamp;
/// assert_eq!(parse_timestamp("1700000000"), Some(1_700_000_000_000));
/// assert_eq!(parse_timestamp("1700000000.9"), Some(1_700_000_000_900));
/// assert_eq!(parse_timestamp("1970-01-01T01:00:00.250Z"), Some(3_600_250));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return secs.checked_mul(MILLIS_PER_SEC);
    }
    if let Ok(secs) = raw.parse::<f64>() {
        let millis = (secs * MILLIS_PER_SEC as f64).round();
        // Range check before the cast; `as` would saturate silently.
        if millis.is_finite() && millis.abs() < i64::MAX as f64 {
            return Some(millis as i64);
        }
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

enum Row {
    Accepted(TxRecord),
    NonPositive,
}

fn cell<'r>(record: &'r StringRecord, cols: &Columns, field: Field) -> &'r str {
    record.get(cols.get(field)).unwrap_or("")
}

fn parse_row(record: &StringRecord, cols: &Columns, line: u64) -> Result<Row, IngestError> {
    let raw_value = cell(record, cols, Field::Value);
    let value: f64 = raw_value.parse().map_err(|_| IngestError::InvalidValue {
        line,
        value: raw_value.to_string(),
    })?;
    // `!(v > 0)` also drops NaN.
    if !(value > 0.0) {
        return Ok(Row::NonPositive);
    }

    let wallet = |field| {
        cell(record, cols, field)
            .parse::<Wallet>()
            .map_err(|source| IngestError::InvalidWallet { line, source })
    };
    let from = wallet(Field::From)?;
    let to = wallet(Field::To)?;

    let raw_time = cell(record, cols, Field::Time);
    let time = parse_timestamp(raw_time).ok_or_else(|| IngestError::InvalidTimestamp {
        line,
        value: raw_time.to_string(),
    })?;

    Ok(Row::Accepted(TxRecord { from, to, value, time }))
}

/// Read a headered CSV ledger.
pub fn read_records<R: Read>(reader: R) -> Result<IngestReport, IngestError> {
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let cols = Columns::resolve(csv.headers()?)?;
    debug!(?cols, "ledger columns resolved");

    let mut report = IngestReport::default();
    for (i, result) in csv.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(i as u64 + 2, |p| p.line());
        report.rows += 1;
        match parse_row(&record, &cols, line)? {
            Row::Accepted(tx) => report.records.push(tx),
            Row::NonPositive => report.dropped_non_positive += 1,
        }
    }

    info!(
        rows = report.rows,
        accepted = report.records.len(),
        dropped_non_positive = report.dropped_non_positive,
        "ledger ingested"
    );
    Ok(report)
}

pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening ledger");
    read_records(File::open(path)?)
}
