//! Sum-to-one arbitrage scanner for Polymarket ultra-short crypto markets.
//!
//! Ultra-short up/down markets are binary pairs whose YES and NO outcomes
//! should price to exactly $1.00 combined. This crate enumerates upcoming
//! market windows from the wall clock, pulls live pricing from the Gamma API,
//! measures each pair's deviation from parity, ranks the flagged
//! opportunities, and can record paper trades for them:
//!
//! ```text
//! YES price:  $0.54
//! NO price:   $0.48
//! ─────────────────
//! Total:      $1.02  →  edge = +2.00%
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`window`]: Deterministic market-window generation
//! - [`market`]: Gamma API acquisition and normalization
//! - [`arbitrage`]: Edge detection, ranking, and trade simulation
//! - [`ledger`]: Append-only trade ledger and scan reports

pub mod arbitrage;
pub mod config;
pub mod error;
pub mod ledger;
pub mod market;
pub mod window;

pub use config::Config;
pub use error::{BotError, Result};
