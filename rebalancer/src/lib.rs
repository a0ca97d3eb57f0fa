//! qtbalance-rebalancer: read-only Questrade portfolio rebalancer.
//!
//! Reads target fractions from a JSON file, fetches the account's positions
//! and buying power from Questrade, and computes the whole-share buys and
//! sells that would move each holding toward its target. Orders are reported,
//! never placed.

pub mod broker;
pub mod config;
pub mod diff;
pub mod error;
pub mod execution;
pub mod report;
pub mod target;
