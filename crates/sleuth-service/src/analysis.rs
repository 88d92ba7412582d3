//! One analysis run over a ledger file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sleuth_engine::{Analysis, Summary, SuspicionEngine};
use sleuth_ingest::read_records_from_path;
use tracing::info;

/// Ingestion counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows: usize,
    pub accepted: usize,
    pub dropped_non_positive: usize,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestStats,
    pub analysis: Analysis,
}

impl RunOutput {
    pub fn summary(&self) -> Summary {
        self.analysis.summary()
    }
}

/// Read `path` and analyze it. Synchronous; callers on an async runtime
/// should use `spawn_blocking`.
pub fn run_file(path: &Path, engine: &SuspicionEngine) -> Result<RunOutput> {
    let report = read_records_from_path(path)
        .with_context(|| format!("failed to ingest ledger {}", path.display()))?;
    let ingest = IngestStats {
        rows: report.rows,
        accepted: report.records.len(),
        dropped_non_positive: report.dropped_non_positive,
    };

    let analysis = engine.analyze(&report.records);
    info!(
        path = %path.display(),
        wallets = analysis.len(),
        seeds = analysis.seeds().count(),
        "ledger analyzed"
    );
    Ok(RunOutput { ingest, analysis })
}
