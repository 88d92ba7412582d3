//! # sleuth-core
//! Foundation types, the transaction graph, and detector traits for Sleuth.

pub mod constants;
pub mod error;
pub mod graph;
pub mod traits;
pub mod types;

pub use graph::{Edge, EdgeMode, NodeIx, TxGraph};
pub use types::{Timestamp, TxRecord, Wallet};
