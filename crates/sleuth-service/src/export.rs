//! Suspicious-wallet CSV export.
//!
//! Writes every wallet at medium risk or above, in discovery order, with the
//! columns `wallet,suspicion_score,fan_out,fan_in,peeling_chain`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sleuth_engine::{RiskLevel, WalletReport};
use tracing::info;

/// Default export file name.
pub const DEFAULT_EXPORT_FILE: &str = "suspicious_wallets.csv";

const HEADER: [&str; 5] = ["wallet", "suspicion_score", "fan_out", "fan_in", "peeling_chain"];

#[derive(Serialize)]
struct SuspectRow<'a> {
    wallet: &'a str,
    suspicion_score: f64,
    fan_out: bool,
    fan_in: bool,
    peeling_chain: bool,
}

/// Write suspect rows to `writer`. The header is always written. Returns the
/// number of rows.
pub fn write_suspects<W: Write>(writer: W, reports: &[WalletReport]) -> Result<usize, csv::Error> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(HEADER)?;

    let mut rows = 0;
    for r in reports.iter().filter(|r| r.risk() != RiskLevel::Safe) {
        csv.serialize(SuspectRow {
            wallet: r.wallet.as_str(),
            suspicion_score: r.score,
            fan_out: r.fan_out,
            fan_in: r.fan_in,
            peeling_chain: r.peeling_chain,
        })?;
        rows += 1;
    }
    csv.flush()?;
    Ok(rows)
}

pub fn export_suspects(path: &Path, reports: &[WalletReport]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let rows = write_suspects(file, reports).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows, "suspicious wallets exported");
    Ok(rows)
}
