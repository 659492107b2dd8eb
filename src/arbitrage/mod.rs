//! Sum-to-one arbitrage detection and paper-trade simulation.

pub mod detector;
pub mod simulator;

pub use detector::{detect, Opportunity, DEFAULT_FLAG_EDGE};
pub use simulator::{execute_live, simulate, Trade, TradeStatus};
