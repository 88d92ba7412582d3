//! Suspicion scoring and normalization.
//!
//! A wallet's evidence is a fixed-shape record (three flags and a proximity
//! influence). The raw score is a weighted sum of that evidence; the
//! normalized score rescales every raw score against the run's maximum:
//!
//! `normalized = round(raw / max_raw * 10, 2)`
//!
//! Rounding is half-to-even, so `0.625` becomes `0.62`.
//!
//! When the run has no wallets, or no wallet has a positive raw score, the
//! denominator is 1 and every normalized score is 0.

use serde::{Deserialize, Serialize};
use sleuth_core::constants::{FAN_IN_WEIGHT, FAN_OUT_WEIGHT, PEELING_WEIGHT, SCORE_DECIMALS, SCORE_SCALE};
use sleuth_core::graph::TxGraph;
use sleuth_core::types::Wallet;

use crate::detect::PatternFlags;

/// Raw-score weight of each detector flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub fan_out: u32,
    pub fan_in: u32,
    pub peeling: u32,
}

impl ScoreWeights {
    pub fn sum(&self) -> u64 {
        u64::from(self.fan_out) + u64::from(self.fan_in) + u64::from(self.peeling)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            fan_out: FAN_OUT_WEIGHT,
            fan_in: FAN_IN_WEIGHT,
            peeling: PEELING_WEIGHT,
        }
    }
}

/// Everything the scorer knows about one wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub flags: PatternFlags,
    pub proximity: u32,
}

/// `w.fan_out*[fan_out] + w.fan_in*[fan_in] + w.peeling*[peeling] + proximity`,
/// saturating at `u32::MAX`.
pub fn raw_score(evidence: &Evidence, weights: &ScoreWeights) -> u32 {
    let flag = |on: bool, weight: u32| if on { weight } else { 0 };
    flag(evidence.flags.fan_out, weights.fan_out)
        .saturating_add(flag(evidence.flags.fan_in, weights.fan_in))
        .saturating_add(flag(evidence.flags.peeling, weights.peeling))
        .saturating_add(evidence.proximity)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Rescale `raw` into `[0, 10]` relative to `global_max`.
///
/// # Examples
///
/// ```
/// use sleuth_engine::score::normalize;
/// assert_eq!(normalize(7, 7), 10.0);
/// assert_eq!(normalize(3, 7), 4.29);
/// assert_eq!(normalize(0, 0), 0.0);
/// ```
pub fn normalize(raw: u32, global_max: u32) -> f64 {
    let denominator = if global_max == 0 { 1 } else { global_max };
    round_to(f64::from(raw) / f64::from(denominator) * SCORE_SCALE, SCORE_DECIMALS)
}

/// Scored evidence for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionRecord {
    pub wallet: Wallet,
    pub evidence: Evidence,
    pub raw_score: u32,
    pub normalized_score: f64,
}

impl SuspicionRecord {
    pub fn fan_out(&self) -> bool {
        self.evidence.flags.fan_out
    }

    pub fn fan_in(&self) -> bool {
        self.evidence.flags.fan_in
    }

    pub fn peeling(&self) -> bool {
        self.evidence.flags.peeling
    }

    pub fn proximity(&self) -> u32 {
        self.evidence.proximity
    }
}

/// Score every wallet of `graph`, in discovery order.
///
/// `flags` and `proximity` are indexed by node. Returns the records and the
/// maximum raw score (0 for an empty graph).
pub fn score_all(
    graph: &TxGraph,
    flags: &[PatternFlags],
    proximity: &[u32],
    weights: &ScoreWeights,
) -> (Vec<SuspicionRecord>, u32) {
    let evidence: Vec<Evidence> = graph
        .nodes()
        .map(|n| Evidence {
            flags: flags[n],
            proximity: proximity.get(n).copied().unwrap_or(0),
        })
        .collect();
    let raw: Vec<u32> = evidence.iter().map(|e| raw_score(e, weights)).collect();
    let max_raw = raw.iter().copied().max().unwrap_or(0);

    let records = graph
        .nodes()
        .map(|n| SuspicionRecord {
            wallet: graph.wallet(n).clone(),
            evidence: evidence[n],
            raw_score: raw[n],
            normalized_score: normalize(raw[n], max_raw),
        })
        .collect();
    (records, max_raw)
}
