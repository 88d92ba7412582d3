//! Directed transaction graph keyed by wallet.
//!
//! Nodes are wallets, indexed by [`NodeIx`] in canonical discovery order: the
//! order in which each wallet first appears as either endpoint of a record,
//! sender before receiver. Every order-sensitive step downstream (seed
//! selection, report order) iterates nodes in this order.
//!
//! Edge semantics depend on [`EdgeMode`]:
//! - [`EdgeMode::PerPair`]: one edge per ordered `(from, to)` pair. A later
//!   record for the same pair overwrites the edge's value and time but the
//!   edge keeps its original adjacency position.
//! - [`EdgeMode::PerTransaction`]: every record is its own edge.
//!
//! The graph has no public mutators; it is read-only once built.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Timestamp, TxRecord, Wallet};

/// Index of a wallet in discovery order.
pub type NodeIx = usize;

/// How repeated transfers between the same ordered pair are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMode {
    /// One edge per counterparty direction, last record wins.
    #[default]
    PerPair,
    /// One edge per record (multigraph).
    PerTransaction,
}

/// A directed, attributed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeIx,
    pub to: NodeIx,
    pub value: f64,
    pub time: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct TxGraph {
    wallets: Vec<Wallet>,
    index: HashMap<Wallet, NodeIx>,
    edges: Vec<Edge>,
    /// Edge ids leaving each node, in first-insertion order.
    outgoing: Vec<Vec<usize>>,
    /// Edge ids entering each node, in first-insertion order.
    incoming: Vec<Vec<usize>>,
    mode: EdgeMode,
}

impl TxGraph {
    /// Build a graph from records processed in slice order.
    pub fn build(records: &[TxRecord], mode: EdgeMode) -> Self {
        let mut graph = Self {
            mode,
            ..Self::default()
        };
        let mut pairs: HashMap<(NodeIx, NodeIx), usize> = HashMap::new();

        for record in records {
            let from = graph.intern(&record.from);
            let to = graph.intern(&record.to);

            let existing = match mode {
                EdgeMode::PerPair => pairs.get(&(from, to)).copied(),
                EdgeMode::PerTransaction => None,
            };

            match existing {
                Some(id) => {
                    let edge = &mut graph.edges[id];
                    edge.value = record.value;
                    edge.time = record.time;
                }
                None => {
                    let id = graph.edges.len();
                    graph.edges.push(Edge {
                        from,
                        to,
                        value: record.value,
                        time: record.time,
                    });
                    graph.outgoing[from].push(id);
                    graph.incoming[to].push(id);
                    if mode == EdgeMode::PerPair {
                        pairs.insert((from, to), id);
                    }
                }
            }
        }

        debug!(
            records = records.len(),
            self_transfers = records.iter().filter(|r| r.is_self_transfer()).count(),
            wallets = graph.node_count(),
            edges = graph.edge_count(),
            ?mode,
            "transaction graph built"
        );
        graph
    }

    fn intern(&mut self, wallet: &Wallet) -> NodeIx {
        if let Some(&ix) = self.index.get(wallet) {
            return ix;
        }
        let ix = self.wallets.len();
        self.wallets.push(wallet.clone());
        self.index.insert(wallet.clone(), ix);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        ix
    }

    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    pub fn node_count(&self) -> usize {
        self.wallets.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// All node indices in discovery order.
    pub fn nodes(&self) -> Range<NodeIx> {
        0..self.wallets.len()
    }

    /// Wallets in discovery order.
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    /// # Panics
    ///
    /// Panics if `ix` is not a node of this graph.
    pub fn wallet(&self, ix: NodeIx) -> &Wallet {
        &self.wallets[ix]
    }

    pub fn index_of(&self, wallet: &str) -> Option<NodeIx> {
        self.index.get(wallet).copied()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn outgoing(&self, ix: NodeIx) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[ix].iter().map(|&id| &self.edges[id])
    }

    pub fn incoming(&self, ix: NodeIx) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming[ix].iter().map(|&id| &self.edges[id])
    }

    /// Destination nodes of outgoing edges. May repeat in
    /// [`EdgeMode::PerTransaction`].
    pub fn successors(&self, ix: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.outgoing(ix).map(|e| e.to)
    }

    /// Source nodes of incoming edges. May repeat in
    /// [`EdgeMode::PerTransaction`].
    pub fn predecessors(&self, ix: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.incoming(ix).map(|e| e.from)
    }

    pub fn out_degree(&self, ix: NodeIx) -> usize {
        self.outgoing[ix].len()
    }

    pub fn in_degree(&self, ix: NodeIx) -> usize {
        self.incoming[ix].len()
    }
}
