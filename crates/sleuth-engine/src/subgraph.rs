//! Local structure around flagged wallets.
//!
//! A [`Neighborhood`] is one wallet with its distinct counterparties. A
//! [`Subgraph`] is the induced subgraph over a set of centers plus all of
//! their direct successors and predecessors.

use std::collections::HashSet;

use serde::Serialize;
use sleuth_core::graph::{NodeIx, TxGraph};
use sleuth_core::types::Wallet;

/// Distinct nodes in first-seen order.
fn distinct(nodes: impl Iterator<Item = NodeIx>) -> Vec<NodeIx> {
    let mut seen = HashSet::new();
    nodes.filter(|n| seen.insert(*n)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    pub wallet: Wallet,
    /// Wallets this wallet paid, in adjacency order.
    pub successors: Vec<Wallet>,
    /// Wallets that paid this wallet, in adjacency order.
    pub predecessors: Vec<Wallet>,
}

impl Neighborhood {
    pub fn of(graph: &TxGraph, node: NodeIx) -> Self {
        let wallets = |nodes: Vec<NodeIx>| -> Vec<Wallet> {
            nodes.into_iter().map(|n| graph.wallet(n).clone()).collect()
        };
        Self {
            wallet: graph.wallet(node).clone(),
            successors: wallets(distinct(graph.successors(node))),
            predecessors: wallets(distinct(graph.predecessors(node))),
        }
    }
}

/// Induced subgraph around a set of center wallets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subgraph {
    /// Member wallets in discovery order.
    pub wallets: Vec<Wallet>,
    /// Edges of the graph with both endpoints in `wallets`.
    pub edges: usize,
}

impl Subgraph {
    pub fn around(graph: &TxGraph, centers: &[NodeIx]) -> Self {
        let mut member = vec![false; graph.node_count()];
        for &center in centers {
            member[center] = true;
            for n in graph.successors(center).chain(graph.predecessors(center)) {
                member[n] = true;
            }
        }

        let edges = graph.edges().iter().filter(|e| member[e.from] && member[e.to]).count();
        let wallets = graph
            .nodes()
            .filter(|&n| member[n])
            .map(|n| graph.wallet(n).clone())
            .collect();
        Self { wallets, edges }
    }

    pub fn node_count(&self) -> usize {
        self.wallets.len()
    }
}
