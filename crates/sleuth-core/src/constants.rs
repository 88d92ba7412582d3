//! Detection and scoring constants.
//!
//! Timestamps are Unix milliseconds; configured windows are whole seconds.

/// Timestamp units per second.
pub const MILLIS_PER_SEC: i64 = 1000;

/// Minimum number of distinct counterparties for a fan-out or fan-in flag.
pub const FAN_MIN_DEGREE: usize = 5;

/// Maximum span between the earliest and latest edge of a fan pattern (one hour).
pub const FAN_WINDOW_SECS: i64 = 3600;

/// Lower (exclusive) bound of `out_value / in_value` for a peeling hop.
///
/// A wallet forwarding more than 90% but less than 100% of what it received
/// is treated as a peel.
pub const PEEL_RETAIN_RATIO: f64 = 0.9;

/// Number of fan-out wallets used as propagation seeds.
pub const MAX_SEEDS: usize = 3;

/// Hop bound for proximity propagation.
pub const MAX_HOPS: u32 = 3;

/// Largest accepted `max_hops` setting.
pub const MAX_HOPS_LIMIT: u32 = 64;

/// Largest accepted sum of the three flag weights.
pub const MAX_WEIGHT_SUM: u64 = 1_000_000;

/// Raw score contributed by a fan-out flag.
pub const FAN_OUT_WEIGHT: u32 = 3;
/// Raw score contributed by a fan-in flag.
pub const FAN_IN_WEIGHT: u32 = 3;
/// Raw score contributed by a peeling flag.
pub const PEELING_WEIGHT: u32 = 2;

/// Upper end of the normalized score range `[0, SCORE_SCALE]`.
pub const SCORE_SCALE: f64 = 10.0;

/// Normalized scores are rounded to this many decimal places.
pub const SCORE_DECIMALS: i32 = 2;

/// Normalized score at or above which a wallet is high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 7.0;

/// Normalized score at or above which a wallet is medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 3.0;

/// Proximity influence of a wallet `distance` hops away from a seed.
///
/// The seed itself (distance 0) receives `max_hops + 1`; wallets beyond
/// `max_hops` receive nothing. Saturates at `u32::MAX`.
///
/// # Examples
///
/// ```
/// use sleuth_core::constants::{hop_influence, MAX_HOPS};
/// assert_eq!(hop_influence(0, MAX_HOPS), 4);
/// assert_eq!(hop_influence(3, MAX_HOPS), 1);
/// assert_eq!(hop_influence(4, MAX_HOPS), 0);
/// ```
pub const fn hop_influence(distance: u32, max_hops: u32) -> u32 {
    if distance > max_hops {
        0
    } else {
        (max_hops - distance).saturating_add(1)
    }
}
