//! # sleuth-engine — Laundering-pattern detection and suspicion scoring.
//!
//! A run is a single forward pass over an immutable [`TxGraph`](sleuth_core::TxGraph):
//! - **Detectors**: fan-out, fan-in, and peeling-chain flags per wallet.
//! - **Proximity**: bounded breadth-first propagation from the first fan-out
//!   wallets, combined across seeds with `max`.
//! - **Scoring**: weighted flags plus proximity, rescaled to `[0, 10]`
//!   against the run's highest raw score.
//! - **Reports**: one [`WalletReport`] per wallet in discovery order.
//! - **Subgraphs**: neighborhoods of flagged wallets for drill-down.

pub mod detect;
pub mod engine;
pub mod params;
pub mod proximity;
pub mod report;
pub mod score;
pub mod subgraph;

pub use detect::{Detectors, FanInDetector, FanOutDetector, PatternFlags, PeelingDetector};
pub use engine::{Analysis, SuspicionEngine, analyze};
pub use params::DetectionParams;
pub use report::{ReportFilter, RiskLevel, Summary, WalletReport};
pub use score::{Evidence, ScoreWeights, SuspicionRecord};
pub use subgraph::{Neighborhood, Subgraph};
