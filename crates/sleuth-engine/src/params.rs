//! Tunable detection parameters.

use serde::{Deserialize, Serialize};
use sleuth_core::constants::{
    FAN_MIN_DEGREE, FAN_WINDOW_SECS, MAX_HOPS, MAX_HOPS_LIMIT, MAX_SEEDS, MAX_WEIGHT_SUM, PEEL_RETAIN_RATIO,
};
use sleuth_core::error::ParamsError;
use sleuth_core::graph::EdgeMode;

use crate::score::ScoreWeights;

/// Parameters for one analysis run.
///
/// Every field defaults to the constant of the same meaning in
/// [`sleuth_core::constants`], so a partially specified config file only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Minimum distinct counterparties for a fan-out or fan-in flag.
    pub fan_min_degree: usize,
    /// Maximum timestamp span, in seconds, of a fan pattern's edges.
    pub fan_window_secs: i64,
    /// Exclusive lower bound of `out_value / in_value` for a peeling hop.
    pub peel_retain_ratio: f64,
    /// Number of fan-out wallets used as propagation seeds.
    pub max_seeds: usize,
    /// Hop bound for proximity propagation.
    pub max_hops: u32,
    pub weights: ScoreWeights,
    pub edge_mode: EdgeMode,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            fan_min_degree: FAN_MIN_DEGREE,
            fan_window_secs: FAN_WINDOW_SECS,
            peel_retain_ratio: PEEL_RETAIN_RATIO,
            max_seeds: MAX_SEEDS,
            max_hops: MAX_HOPS,
            weights: ScoreWeights::default(),
            edge_mode: EdgeMode::default(),
        }
    }
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.fan_min_degree == 0 {
            return Err(ParamsError::ZeroFanDegree);
        }
        if self.fan_window_secs < 0 {
            return Err(ParamsError::NegativeWindow(self.fan_window_secs));
        }
        // Also rejects NaN.
        if !(0.0..1.0).contains(&self.peel_retain_ratio) {
            return Err(ParamsError::RetainRatioOutOfRange(self.peel_retain_ratio));
        }
        if self.max_hops > MAX_HOPS_LIMIT {
            return Err(ParamsError::HopsOutOfRange {
                max_hops: self.max_hops,
                limit: MAX_HOPS_LIMIT,
            });
        }
        let sum = self.weights.sum();
        if sum > MAX_WEIGHT_SUM {
            return Err(ParamsError::WeightSumTooLarge {
                sum,
                limit: MAX_WEIGHT_SUM,
            });
        }
        Ok(())
    }
}
