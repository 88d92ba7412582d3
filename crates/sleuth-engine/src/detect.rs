//! Laundering-pattern detectors.
//!
//! Each detector looks only at one wallet's incident edges:
//! - **Fan-out**: at least `min_degree` outgoing edges whose timestamps span
//!   no more than `window_ms`.
//! - **Fan-in**: the same condition on incoming edges.
//! - **Peeling**: exactly one incoming and one outgoing edge, forwarding
//!   strictly between `retain_ratio` and 100% of the received value.
//!
//! In [`EdgeMode::PerPair`](sleuth_core::EdgeMode::PerPair) graphs a degree is
//! the number of distinct counterparties.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sleuth_core::constants::MILLIS_PER_SEC;
use sleuth_core::graph::{Edge, NodeIx, TxGraph};
use sleuth_core::traits::PatternDetector;
use tracing::debug;

use crate::params::DetectionParams;

#[derive(Debug, Clone, Copy)]
pub struct FanOutDetector {
    pub min_degree: usize,
    pub window_ms: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct FanInDetector {
    pub min_degree: usize,
    pub window_ms: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct PeelingDetector {
    pub retain_ratio: f64,
}

/// Whether a set of edges is wide enough and tight enough in time.
fn is_fan<'a>(degree: usize, edges: impl Iterator<Item = &'a Edge>, min_degree: usize, window_ms: i64) -> bool {
    if degree < min_degree {
        return false;
    }
    let bounds = edges.fold(None, |acc: Option<(i64, i64)>, e| match acc {
        None => Some((e.time, e.time)),
        Some((lo, hi)) => Some((lo.min(e.time), hi.max(e.time))),
    });
    match bounds {
        // abs_diff cannot overflow for any pair of i64 timestamps.
        Some((lo, hi)) => hi.abs_diff(lo) <= window_ms.max(0) as u64,
        None => false,
    }
}

impl PatternDetector for FanOutDetector {
    fn name(&self) -> &'static str {
        "fan_out"
    }

    fn is_flagged(&self, graph: &TxGraph, node: NodeIx) -> bool {
        is_fan(graph.out_degree(node), graph.outgoing(node), self.min_degree, self.window_ms)
    }
}

impl PatternDetector for FanInDetector {
    fn name(&self) -> &'static str {
        "fan_in"
    }

    fn is_flagged(&self, graph: &TxGraph, node: NodeIx) -> bool {
        is_fan(graph.in_degree(node), graph.incoming(node), self.min_degree, self.window_ms)
    }
}

impl PatternDetector for PeelingDetector {
    fn name(&self) -> &'static str {
        "peeling"
    }

    fn is_flagged(&self, graph: &TxGraph, node: NodeIx) -> bool {
        if graph.in_degree(node) != 1 || graph.out_degree(node) != 1 {
            return false;
        }
        match (graph.incoming(node).next(), graph.outgoing(node).next()) {
            (Some(inbound), Some(outbound)) => {
                outbound.value < inbound.value && outbound.value > self.retain_ratio * inbound.value
            }
            _ => false,
        }
    }
}

/// Detector verdicts for one wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternFlags {
    pub fan_out: bool,
    pub fan_in: bool,
    pub peeling: bool,
}

/// The three detectors configured from one [`DetectionParams`].
#[derive(Debug, Clone, Copy)]
pub struct Detectors {
    pub fan_out: FanOutDetector,
    pub fan_in: FanInDetector,
    pub peeling: PeelingDetector,
}

impl Detectors {
    pub fn from_params(params: &DetectionParams) -> Self {
        let window_ms = params.fan_window_secs.saturating_mul(MILLIS_PER_SEC);
        Self {
            fan_out: FanOutDetector {
                min_degree: params.fan_min_degree,
                window_ms,
            },
            fan_in: FanInDetector {
                min_degree: params.fan_min_degree,
                window_ms,
            },
            peeling: PeelingDetector {
                retain_ratio: params.peel_retain_ratio,
            },
        }
    }

    pub fn classify(&self, graph: &TxGraph, node: NodeIx) -> PatternFlags {
        PatternFlags {
            fan_out: self.fan_out.is_flagged(graph, node),
            fan_in: self.fan_in.is_flagged(graph, node),
            peeling: self.peeling.is_flagged(graph, node),
        }
    }

    /// Classify every node, indexed by [`NodeIx`].
    ///
    /// Nodes are classified in parallel; the result is in discovery order.
    pub fn detect_all(&self, graph: &TxGraph) -> Vec<PatternFlags> {
        let flags: Vec<PatternFlags> = graph
            .nodes()
            .into_par_iter()
            .map(|node| self.classify(graph, node))
            .collect();

        debug!(
            wallets = flags.len(),
            fan_out = flags.iter().filter(|f| f.fan_out).count(),
            fan_in = flags.iter().filter(|f| f.fan_in).count(),
            peeling = flags.iter().filter(|f| f.peeling).count(),
            "pattern detection complete"
        );
        flags
    }
}

impl Default for Detectors {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}
