//! Sum-to-one pricing edge detection and ranking.
//!
//! A binary pair should price to exactly $1.00. The detector measures the
//! signed deviation (`edge = yes + no - 1`), filters on liquidity and edge
//! floors, and ranks the survivors best edge first. Pure and idempotent:
//! the same market list always produces the same ordered result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market::Market;

/// Fixed edge threshold (1.5%) for the boolean `has_arbitrage` flag,
/// independent of any caller-supplied cutoff.
pub const DEFAULT_FLAG_EDGE: Decimal = dec!(0.015);

/// A market annotated with derived sum-to-one metrics.
///
/// Derived fresh on every scan, never cached across fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    /// The underlying market snapshot.
    #[serde(flatten)]
    pub market: Market,
    /// `yes_price + no_price`.
    pub total: Decimal,
    /// Signed deviation from $1.00 parity; positive means the pair prices
    /// above what settlement pays.
    pub edge: Decimal,
    /// `edge * 100`.
    pub edge_pct: Decimal,
    /// Whether this record cleared both caller-supplied thresholds.
    pub qualifies: bool,
}

impl Opportunity {
    /// Compute metrics for one market against the given thresholds.
    pub fn evaluate(market: Market, min_edge: Decimal, min_liquidity: Decimal) -> Self {
        let total = market.yes_price + market.no_price;
        let edge = total - Decimal::ONE;
        let qualifies = edge >= min_edge && market.liquidity >= min_liquidity;

        Self {
            market,
            total,
            edge,
            edge_pct: edge * Decimal::ONE_HUNDRED,
            qualifies,
        }
    }

    /// Boolean flag at the fixed [`DEFAULT_FLAG_EDGE`] threshold, for callers
    /// that want a yes/no answer rather than a ranked list.
    pub fn has_arbitrage(&self) -> bool {
        self.edge >= DEFAULT_FLAG_EDGE
    }
}

/// Detect and rank qualifying opportunities, best edge first.
///
/// Markets below the liquidity floor are discarded, the remainder filtered to
/// `edge >= min_edge`, then sorted by edge descending with stable ties
/// (original order preserved).
pub fn detect(markets: Vec<Market>, min_edge: Decimal, min_liquidity: Decimal) -> Vec<Opportunity> {
    let total_scanned = markets.len();

    let mut opportunities: Vec<Opportunity> = markets
        .into_iter()
        .filter(|m| m.liquidity >= min_liquidity)
        .map(|m| Opportunity::evaluate(m, min_edge, min_liquidity))
        .filter(|o| o.edge >= min_edge)
        .collect();

    // Vec::sort_by is stable, so equal edges keep input order.
    opportunities.sort_by(|a, b| b.edge.cmp(&a.edge));

    debug!(
        scanned = total_scanned,
        qualified = opportunities.len(),
        %min_edge,
        %min_liquidity,
        "Detection pass complete"
    );

    opportunities
}
