//! Error types for Sleuth.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("empty wallet identifier")] Empty,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("fan minimum degree must be at least 1")] ZeroFanDegree,
    #[error("fan window must be non-negative, got {0}")] NegativeWindow(i64),
    #[error("peel retain ratio must lie in [0, 1), got {0}")] RetainRatioOutOfRange(f64),
    #[error("max hops {max_hops} exceeds limit {limit}")] HopsOutOfRange { max_hops: u32, limit: u32 },
    #[error("score weights sum to {sum}, limit is {limit}")] WeightSumTooLarge { sum: u64, limit: u64 },
}
