//! Shared ledger builders for integration tests.

use sleuth_core::types::{Timestamp, TxRecord};
use sleuth_engine::WalletReport;

/// A single record.
pub fn tx(from: &str, to: &str, value: f64, time: Timestamp) -> TxRecord {
    TxRecord::new(from, to, value, time)
}

/// `hub` pays each recipient in turn, one record per recipient.
pub fn fan_out(hub: &str, recipients: &[&str], value: f64, times: &[Timestamp]) -> Vec<TxRecord> {
    recipients
        .iter()
        .zip(times)
        .map(|(to, &t)| tx(hub, to, value, t))
        .collect()
}

/// Each sender pays `sink` in turn.
pub fn fan_in(senders: &[&str], sink: &str, value: f64, times: &[Timestamp]) -> Vec<TxRecord> {
    senders
        .iter()
        .zip(times)
        .map(|(from, &t)| tx(from, sink, value, t))
        .collect()
}

/// `w0 -> w1 -> ...`, each hop forwarding `keep` of the previous value.
pub fn peel_chain(prefix: &str, hops: usize, start: f64, keep: f64) -> Vec<TxRecord> {
    let mut value = start;
    (0..hops)
        .map(|i| {
            let r = tx(&format!("{prefix}{i}"), &format!("{prefix}{}", i + 1), value, i as i64 * 60_000);
            value *= keep;
            r
        })
        .collect()
}

/// Report for `wallet`, panicking if absent.
pub fn find<'a>(reports: &'a [WalletReport], wallet: &str) -> &'a WalletReport {
    reports
        .iter()
        .find(|r| r.wallet.as_str() == wallet)
        .unwrap_or_else(|| panic!("wallet {wallet} missing from reports"))
}

/// Millisecond timestamp as decimal Unix seconds, e.g. `1700000000.250`.
pub fn unix_seconds(time: Timestamp) -> String {
    format!("{}.{:03}", time.div_euclid(1000), time.rem_euclid(1000))
}

/// CSV text with the raw export header.
pub fn to_csv(records: &[TxRecord]) -> String {
    let mut out = String::from("Unnamed: 0,sender,receiver,amount,timestamp\n");
    for (i, r) in records.iter().enumerate() {
        out.push_str(&format!("{i},{},{},{},{}\n", r.from, r.to, r.value, unix_seconds(r.time)));
    }
    out
}
