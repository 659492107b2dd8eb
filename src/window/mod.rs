//! Deterministic market-window generation for ultra-short crypto markets.
//!
//! Up/down markets live at predictable timestamp-based slugs
//! (`btc-updown-15m-{close_ts}`), so upcoming markets can be enumerated from
//! the wall clock alone, with no network calls.

pub mod generator;
pub mod types;

pub use generator::{active_windows, active_windows_at, generate_windows, generate_windows_at};
pub use types::{Interval, MarketWindow};
