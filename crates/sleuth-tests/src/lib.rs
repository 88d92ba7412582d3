//! End-to-end test suite for Sleuth.
//!
//! Integration tests drive the full pipeline from records (or CSV files)
//! to result records and check the scoring contract on crafted ledgers
//! and generated ones.

pub mod helpers;
