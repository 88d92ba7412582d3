//! Result records and presentation helpers.
//!
//! [`WalletReport`] is the engine's output contract: one record per wallet,
//! unfiltered. Risk bucketing, search and top-N selection are helpers for
//! front ends and never change the underlying scores.

use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer, Serialize};
use sleuth_core::constants::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use sleuth_core::types::Wallet;
use thiserror::Error;

use crate::score::SuspicionRecord;

/// Per-wallet result, serialized with the field names consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletReport {
    pub wallet: Wallet,
    /// Normalized score in `[0, 10]`.
    pub score: f64,
    pub fan_out: bool,
    pub fan_in: bool,
    pub peeling_chain: bool,
}

impl From<&SuspicionRecord> for WalletReport {
    fn from(r: &SuspicionRecord) -> Self {
        Self {
            wallet: r.wallet.clone(),
            score: r.normalized_score,
            fan_out: r.fan_out(),
            fan_in: r.fan_in(),
            peeling_chain: r.peeling(),
        }
    }
}

impl WalletReport {
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::of(self.score)
    }
}

/// Risk bucket of a normalized score.
///
/// Serializes lowercase; deserializes through [`FromStr`], so every spelling
/// the CLI accepts is accepted over serde too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Medium,
    High,
}

impl RiskLevel {
    /// High at 7 and above, medium at 3 and above, otherwise safe.
    pub fn of(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Safe
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Safe => "safe",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown risk level '{0}' (expected high, medium or safe)")]
pub struct UnknownRiskLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.trim_end_matches(" risk").trim_end_matches("-risk") {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "safe" | "low" => Ok(Self::Safe),
            _ => Err(UnknownRiskLevel(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Headline counts over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub safe: usize,
    pub fan_out: usize,
    pub fan_in: usize,
    pub peeling_chains: usize,
}

impl Summary {
    pub fn from_reports(reports: &[WalletReport]) -> Self {
        let mut s = Self {
            total: reports.len(),
            ..Self::default()
        };
        for r in reports {
            match r.risk() {
                RiskLevel::High => s.high += 1,
                RiskLevel::Medium => s.medium += 1,
                RiskLevel::Safe => s.safe += 1,
            }
            s.fan_out += usize::from(r.fan_out);
            s.fan_in += usize::from(r.fan_in);
            s.peeling_chains += usize::from(r.peeling_chain);
        }
        s
    }
}

/// Selection over a result set: risk bucket, wallet search, top-N.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub risk: Option<RiskLevel>,
    /// Case-insensitive substring of the wallet identifier.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl ReportFilter {
    pub fn matches(&self, report: &WalletReport) -> bool {
        if self.risk.is_some_and(|risk| report.risk() != risk) {
            return false;
        }
        match &self.search {
            Some(needle) if !needle.is_empty() => report
                .wallet
                .as_str()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    /// Matching reports, highest score first. Ties keep their input order.
    pub fn apply(&self, reports: &[WalletReport]) -> Vec<WalletReport> {
        let mut selected: Vec<WalletReport> = reports.iter().filter(|r| self.matches(r)).cloned().collect();
        selected.sort_by_key(|r| std::cmp::Reverse(OrderedFloat(r.score)));
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
