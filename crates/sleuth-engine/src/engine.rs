//! The analysis pipeline.
//!
//! records → graph → flags → seeds → proximity → scores → reports.
//! Every stage reads the graph through a shared reference; nothing mutates it
//! after [`TxGraph::build`] returns.

use std::time::Instant;

use sleuth_core::error::ParamsError;
use sleuth_core::graph::{NodeIx, TxGraph};
use sleuth_core::types::{TxRecord, Wallet};
use tracing::info;

use crate::detect::Detectors;
use crate::params::DetectionParams;
use crate::proximity::{propagate, select_seeds};
use crate::report::{RiskLevel, Summary, WalletReport};
use crate::score::{SuspicionRecord, score_all};
use crate::subgraph::{Neighborhood, Subgraph};

/// Runs the detection and scoring pipeline with fixed parameters.
#[derive(Debug, Clone)]
pub struct SuspicionEngine {
    params: DetectionParams,
    detectors: Detectors,
}

impl SuspicionEngine {
    pub fn new(params: DetectionParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let detectors = Detectors::from_params(&params);
        Ok(Self { params, detectors })
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Analyze a validated record sequence. Infallible; an empty input yields
    /// an empty analysis.
    pub fn analyze(&self, records: &[TxRecord]) -> Analysis {
        let started = Instant::now();

        let graph = TxGraph::build(records, self.params.edge_mode);
        let flags = self.detectors.detect_all(&graph);
        let seeds = select_seeds(&flags, self.params.max_seeds);
        let proximity = propagate(&graph, &seeds, self.params.max_hops);
        let (scored, max_raw) = score_all(&graph, &flags, &proximity, &self.params.weights);

        info!(
            records = records.len(),
            wallets = graph.node_count(),
            edges = graph.edge_count(),
            seeds = seeds.len(),
            max_raw,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Analysis {
            graph,
            records: scored,
            seeds,
            max_raw,
        }
    }
}

impl Default for SuspicionEngine {
    fn default() -> Self {
        let params = DetectionParams::default();
        let detectors = Detectors::from_params(&params);
        Self { params, detectors }
    }
}

/// Output of one run. Records are in wallet discovery order.
#[derive(Debug, Clone)]
pub struct Analysis {
    graph: TxGraph,
    records: Vec<SuspicionRecord>,
    seeds: Vec<NodeIx>,
    max_raw: u32,
}

impl Analysis {
    pub fn graph(&self) -> &TxGraph {
        &self.graph
    }

    pub fn records(&self) -> &[SuspicionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest raw score of the run; 0 when nothing scored.
    pub fn max_raw(&self) -> u32 {
        self.max_raw
    }

    /// Propagation seeds in selection order.
    pub fn seeds(&self) -> impl Iterator<Item = &Wallet> + '_ {
        self.seeds.iter().map(|&ix| self.graph.wallet(ix))
    }

    pub fn get(&self, wallet: &str) -> Option<&SuspicionRecord> {
        self.graph.index_of(wallet).map(|ix| &self.records[ix])
    }

    /// The full, unfiltered result contract.
    pub fn reports(&self) -> Vec<WalletReport> {
        self.records.iter().map(WalletReport::from).collect()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_reports(&self.reports())
    }

    /// Wallets at medium risk or above, in discovery order.
    pub fn suspects(&self) -> impl Iterator<Item = &SuspicionRecord> + '_ {
        self.records
            .iter()
            .filter(|r| RiskLevel::of(r.normalized_score) != RiskLevel::Safe)
    }

    /// Suspects plus their direct counterparties.
    pub fn suspect_subgraph(&self) -> Subgraph {
        let centers: Vec<NodeIx> = self
            .graph
            .nodes()
            .filter(|&n| RiskLevel::of(self.records[n].normalized_score) != RiskLevel::Safe)
            .collect();
        Subgraph::around(&self.graph, &centers)
    }

    pub fn neighborhood(&self, wallet: &str) -> Option<Neighborhood> {
        self.graph
            .index_of(wallet)
            .map(|ix| Neighborhood::of(&self.graph, ix))
    }

    /// Neighborhood of the first fan-out wallet, if any.
    pub fn fan_out_example(&self) -> Option<Neighborhood> {
        self.first_where(SuspicionRecord::fan_out)
    }

    /// Neighborhood of the first fan-in wallet, if any.
    pub fn fan_in_example(&self) -> Option<Neighborhood> {
        self.first_where(SuspicionRecord::fan_in)
    }

    fn first_where(&self, pred: impl Fn(&SuspicionRecord) -> bool) -> Option<Neighborhood> {
        self.graph
            .nodes()
            .find(|&n| pred(&self.records[n]))
            .map(|n| Neighborhood::of(&self.graph, n))
    }
}

/// Analyze `records` with default parameters.
pub fn analyze(records: &[TxRecord]) -> Vec<WalletReport> {
    SuspicionEngine::default().analyze(records).reports()
}
