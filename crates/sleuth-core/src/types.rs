//! Ledger types: wallets and validated transaction records.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Milliseconds since the Unix epoch. Sub-second precision matters for the
/// fan window; only differences between timestamps are compared.
pub type Timestamp = i64;

/// Opaque wallet identifier.
///
/// A wallet exists as soon as it appears as the sender or receiver of a
/// record; identity is the only attribute.
///
/// # Examples
///
/// ```
/// use sleuth_core::types::Wallet;
/// let w: Wallet = " 0xabc ".parse().unwrap();
/// assert_eq!(w.as_str(), "0xabc");
/// assert!("   ".parse::<Wallet>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wallet(String);

impl Wallet {
    /// Wrap an identifier as-is, without trimming or validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Wallet {
    type Err = WalletError;

    /// Parse a wallet from untrusted text, trimming surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(WalletError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for Wallet {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Wallet {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Wallet {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Wallet {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A validated transfer between two wallets.
///
/// Produced by ingestion. The engine relies on `value > 0` and does not
/// check it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRecord {
    pub from: Wallet,
    pub to: Wallet,
    pub value: f64,
    pub time: Timestamp,
}

impl TxRecord {
    pub fn new(from: impl Into<Wallet>, to: impl Into<Wallet>, value: f64, time: Timestamp) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            value,
            time,
        }
    }

    pub fn is_self_transfer(&self) -> bool {
        self.from == self.to
    }
}
