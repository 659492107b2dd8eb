//! Two-legged trade simulation and settlement accounting.
//!
//! The simulator models buying BOTH legs of a flagged pair at their quoted
//! prices. Settlement pays exactly $1.00 per unit to the winning side, so
//! `profit = lot * (1 - (yes + no))`. Note the sign: the detector flags pairs
//! pricing ABOVE parity, and buying both legs of such a pair locks in a loss
//! of `lot * edge`, so the reported profit is negative for every flagged
//! opportunity. The numbers are kept as the underlying strategy defines them;
//! callers decide what to do with the sign.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::detector::Opportunity;

/// Lifecycle status of a trade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TradeStatus {
    /// Paper trade, computed only.
    Simulated,
    /// Real order placed and filled.
    Executed,
    /// Live path invoked but not wired up; numbers computed as a simulation.
    NotImplemented,
}

/// A settlement record for one two-legged position. Immutable once created;
/// appended to the ledger, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// When the trade was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Market identifier.
    pub market_id: String,
    /// Market question text.
    pub question: String,
    /// Originating event grouping, when known.
    pub event_slug: Option<String>,
    /// Notional USD per leg.
    pub lot_size: Decimal,
    /// YES entry price.
    pub yes_entry: Decimal,
    /// NO entry price.
    pub no_entry: Decimal,
    /// Cost of the YES leg (`lot_size * yes_entry`).
    pub yes_cost: Decimal,
    /// Cost of the NO leg (`lot_size * no_entry`).
    pub no_cost: Decimal,
    /// Combined cost of both legs.
    pub total_cost: Decimal,
    /// Settlement payout (`lot_size * 1.0`, binary markets pay the winner $1
    /// per unit).
    pub settlement_value: Decimal,
    /// `settlement_value - total_cost`.
    pub profit: Decimal,
    /// `profit / total_cost * 100`, 0 when cost is 0.
    pub profit_pct: Decimal,
    /// Edge at detection time.
    pub edge: Decimal,
    /// Record status.
    pub status: TradeStatus,
}

/// Compute a hypothetical two-legged fill and settlement outcome.
///
/// Pure arithmetic; always succeeds for finite non-negative inputs.
pub fn simulate(opportunity: &Opportunity, lot_size: Decimal) -> Trade {
    build_trade(opportunity, lot_size, TradeStatus::Simulated)
}

/// Placeholder for live execution.
///
/// Returns the same arithmetic as [`simulate`] with status
/// [`TradeStatus::NotImplemented`]: a deliberate hard stop, visibly distinct
/// from an executed or simulated trade. Callers must not count it as success.
pub fn execute_live(opportunity: &Opportunity, lot_size: Decimal) -> Trade {
    warn!(
        market = %opportunity.market.slug,
        "Live trading is not implemented; recording a not_implemented placeholder"
    );
    build_trade(opportunity, lot_size, TradeStatus::NotImplemented)
}

fn build_trade(opportunity: &Opportunity, lot_size: Decimal, status: TradeStatus) -> Trade {
    let market = &opportunity.market;

    let yes_cost = market.yes_price * lot_size;
    let no_cost = market.no_price * lot_size;
    let total_cost = yes_cost + no_cost;

    // Exactly one side settles at $1.00 per unit.
    let settlement_value = lot_size;
    let profit = settlement_value - total_cost;
    let profit_pct = if total_cost.is_zero() {
        Decimal::ZERO
    } else {
        profit / total_cost * Decimal::ONE_HUNDRED
    };

    info!(
        market = %market.slug,
        %status,
        %lot_size,
        %total_cost,
        %profit,
        "Trade recorded"
    );

    Trade {
        timestamp: OffsetDateTime::now_utc(),
        market_id: market.market_id.clone(),
        question: market.question.clone(),
        event_slug: market.event_slug.clone(),
        lot_size,
        yes_entry: market.yes_price,
        no_entry: market.no_price,
        yes_cost,
        no_cost,
        total_cost,
        settlement_value,
        profit,
        profit_pct,
        edge: opportunity.edge,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Market;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn opportunity(yes: Decimal, no: Decimal) -> Opportunity {
        let market = Market {
            market_id: "market-id".to_string(),
            slug: "btc-updown-15m-900".to_string(),
            question: "Bitcoin Up or Down?".to_string(),
            event_slug: Some("crypto-15m".to_string()),
            event_title: None,
            yes_price: yes,
            no_price: no,
            yes_token_id: None,
            no_token_id: None,
            volume_24h: Decimal::ZERO,
            liquidity: dec!(6000),
            end_date: None,
            active: true,
            closed: false,
            resolved: false,
            url: "https://polymarket.com/event/crypto-15m/btc-updown-15m-900".to_string(),
        };
        Opportunity::evaluate(market, dec!(0.02), dec!(5000))
    }

    #[test]
    fn simulate_settlement_arithmetic() {
        let trade = simulate(&opportunity(dec!(0.54), dec!(0.48)), dec!(10));

        assert_eq!(trade.yes_cost, dec!(5.4));
        assert_eq!(trade.no_cost, dec!(4.8));
        assert_eq!(trade.total_cost, dec!(10.2));
        assert_eq!(trade.settlement_value, dec!(10));
        // Both legs bought above parity: the flagged edge settles at a loss.
        assert_eq!(trade.profit, dec!(-0.2));
        assert!(trade.profit_pct > dec!(-1.97) && trade.profit_pct < dec!(-1.96));
        assert_eq!(trade.status, TradeStatus::Simulated);
    }

    #[test]
    fn below_parity_pair_settles_at_a_gain() {
        let trade = simulate(&opportunity(dec!(0.48), dec!(0.51)), dec!(10));
        assert_eq!(trade.total_cost, dec!(9.9));
        assert_eq!(trade.profit, dec!(0.1));
    }

    #[test]
    fn execute_live_matches_simulate_numerically() {
        let opp = opportunity(dec!(0.54), dec!(0.48));
        let simulated = simulate(&opp, dec!(10));
        let live = execute_live(&opp, dec!(10));

        assert_eq!(live.status, TradeStatus::NotImplemented);
        assert_eq!(live.profit, simulated.profit);
        assert_eq!(live.total_cost, simulated.total_cost);
        assert_eq!(live.profit_pct, simulated.profit_pct);
    }

    #[test]
    fn zero_lot_size_has_zero_profit_pct() {
        let trade = simulate(&opportunity(dec!(0.54), dec!(0.48)), Decimal::ZERO);
        assert_eq!(trade.total_cost, Decimal::ZERO);
        assert_eq!(trade.profit_pct, Decimal::ZERO);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TradeStatus::NotImplemented).unwrap();
        assert_eq!(json, "\"not_implemented\"");
        assert_eq!(TradeStatus::NotImplemented.to_string(), "not_implemented");
    }
}
