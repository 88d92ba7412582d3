//! Trait interfaces for Sleuth.
//!
//! - [`PatternDetector`] — per-wallet laundering heuristic (sleuth-engine implements)

use crate::graph::{NodeIx, TxGraph};

/// A per-wallet classifier over a built [`TxGraph`].
///
/// Implementations must be pure functions of the node's incident edges so
/// that nodes can be classified independently and in parallel.
pub trait PatternDetector: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether `node` exhibits the pattern.
    fn is_flagged(&self, graph: &TxGraph, node: NodeIx) -> bool;

    /// All flagged nodes in discovery order.
    ///
    /// Default implementation checks every node with [`is_flagged`](Self::is_flagged).
    fn flagged(&self, graph: &TxGraph) -> Vec<NodeIx> {
        graph.nodes().filter(|&n| self.is_flagged(graph, n)).collect()
    }
}
