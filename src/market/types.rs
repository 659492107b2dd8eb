//! Normalized market records and Gamma API payload shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MarketError;

/// Default price applied to each side when upstream price data is absent or
/// unparseable-but-recoverable; the pair sums to exactly 1.0.
fn default_price() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

/// A normalized snapshot of one binary outcome pair at fetch time.
///
/// Constructed fresh on every fetch and never mutated afterwards; persisted
/// only embedded in opportunity and trade records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier.
    pub market_id: String,
    /// Market slug.
    pub slug: String,
    /// Market question text.
    pub question: String,
    /// Originating event grouping slug (bulk path only).
    pub event_slug: Option<String>,
    /// Originating event title (bulk path only).
    pub event_title: Option<String>,
    /// YES outcome price in [0, 1].
    pub yes_price: Decimal,
    /// NO outcome price in [0, 1].
    pub no_price: Decimal,
    /// YES CLOB token ID, when upstream provides exactly two tokens.
    pub yes_token_id: Option<String>,
    /// NO CLOB token ID, when upstream provides exactly two tokens.
    pub no_token_id: Option<String>,
    /// 24-hour traded volume in USD; 0 when absent upstream.
    pub volume_24h: Decimal,
    /// Market liquidity in USD; 0 when absent upstream.
    pub liquidity: Decimal,
    /// ISO end date, when provided.
    pub end_date: Option<String>,
    /// Whether the market is accepting trades.
    pub active: bool,
    /// Whether the market has closed.
    pub closed: bool,
    /// Whether the market has resolved.
    pub resolved: bool,
    /// Canonical event page URL for display/audit.
    pub url: String,
}

impl Market {
    /// Whether this market should survive bulk discovery filtering.
    pub fn is_tradeable(&self) -> bool {
        self.active && !self.closed && !self.resolved
    }
}

/// Raw market object as the Gamma API returns it.
///
/// Price and token fields are kept as raw [`Value`]s because upstream sends
/// them either as a native JSON array or as a JSON-string-encoded array.
#[derive(Debug, Clone, Deserialize)]
pub struct GammaMarketRaw {
    /// Market ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Market question.
    #[serde(default)]
    pub question: Option<String>,
    /// Market slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Outcome prices, array or JSON-encoded string.
    #[serde(rename = "outcomePrices", default)]
    pub outcome_prices: Option<Value>,
    /// CLOB token IDs, array or JSON-encoded string.
    #[serde(rename = "clobTokenIds", default)]
    pub clob_token_ids: Option<Value>,
    /// 24-hour volume; string, number or null.
    #[serde(rename = "volume24hr", default)]
    pub volume_24hr: Option<Value>,
    /// Liquidity; string, number or null.
    #[serde(default)]
    pub liquidity: Option<Value>,
    /// ISO end date.
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
    /// Whether the market is accepting trades.
    #[serde(default)]
    pub active: Option<bool>,
    /// Whether the market has closed.
    #[serde(default)]
    pub closed: Option<bool>,
    /// Whether the market has resolved.
    #[serde(default)]
    pub resolved: Option<bool>,
}

/// Raw event grouping object from the Gamma API. Member markets stay as raw
/// values so one malformed record drops only itself.
#[derive(Debug, Clone, Deserialize)]
pub struct GammaEventRaw {
    /// Event ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Event title.
    #[serde(default)]
    pub title: Option<String>,
    /// Event slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Member markets.
    #[serde(default)]
    pub markets: Vec<Value>,
}

/// Parse a value that is either a JSON array of decimals or a JSON-string
/// encoding of one. Both forms decode to the same sequence.
pub fn decimal_seq(value: &Value) -> Result<Vec<Decimal>, MarketError> {
    match value {
        Value::String(s) => serde_json::from_str(s)
            .map_err(|e| MarketError::ParseError(format!("decimal sequence {:?}: {}", s, e))),
        Value::Array(_) => serde_json::from_value(value.clone())
            .map_err(|e| MarketError::ParseError(format!("decimal sequence: {}", e))),
        other => Err(MarketError::ParseError(format!(
            "expected array or JSON-string array, got {}",
            other
        ))),
    }
}

/// Same dual-representation rule for token ID sequences.
pub fn string_seq(value: &Value) -> Result<Vec<String>, MarketError> {
    match value {
        Value::String(s) => serde_json::from_str(s)
            .map_err(|e| MarketError::ParseError(format!("token sequence {:?}: {}", s, e))),
        Value::Array(_) => serde_json::from_value(value.clone())
            .map_err(|e| MarketError::ParseError(format!("token sequence: {}", e))),
        other => Err(MarketError::ParseError(format!(
            "expected array or JSON-string array, got {}",
            other
        ))),
    }
}

/// Parse a liquidity/volume field: null or absent means 0, strings and
/// numbers must parse, anything else fails the record.
pub fn decimal_or_zero(value: Option<&Value>, field: &str) -> Result<Decimal, MarketError> {
    match value {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|e| MarketError::ParseError(format!("{} {:?}: {}", field, s, e))),
        Some(v @ Value::Number(_)) => serde_json::from_value(v.clone())
            .map_err(|e| MarketError::ParseError(format!("{}: {}", field, e))),
        Some(other) => Err(MarketError::ParseError(format!(
            "{}: expected number, string or null, got {}",
            field, other
        ))),
    }
}

impl GammaMarketRaw {
    /// Normalize into a [`Market`], tagged with the originating grouping when
    /// fetched through the bulk path.
    ///
    /// Missing price data defaults to `[0.5, 0.5]`; a malformed liquidity or
    /// volume field fails this record alone.
    pub fn normalize(
        self,
        event: Option<&GammaEventRaw>,
        site_url: &str,
    ) -> Result<Market, MarketError> {
        // Absent price data falls back to parity defaults; present-but-
        // malformed data fails this record alone.
        let (yes_price, no_price) = match self.outcome_prices.as_ref() {
            Some(value) => {
                let prices = decimal_seq(value)?;
                let yes = prices.first().copied().unwrap_or_else(default_price);
                let no = prices
                    .get(1)
                    .copied()
                    .unwrap_or_else(|| Decimal::ONE - yes);
                (yes, no)
            }
            None => (default_price(), default_price()),
        };

        let tokens = match self.clob_token_ids.as_ref() {
            Some(value) => string_seq(value)?,
            None => Vec::new(),
        };
        // Token handles only make sense as a pair.
        let (yes_token_id, no_token_id) = if tokens.len() == 2 {
            (Some(tokens[0].clone()), Some(tokens[1].clone()))
        } else {
            (None, None)
        };

        let volume_24h = decimal_or_zero(self.volume_24hr.as_ref(), "volume24hr")?;
        let liquidity = decimal_or_zero(self.liquidity.as_ref(), "liquidity")?;

        let slug = self.slug.unwrap_or_default();
        let url = canonical_url(site_url, event.and_then(|e| e.slug.as_deref()), &slug);

        Ok(Market {
            market_id: self.id.unwrap_or_default(),
            slug,
            question: self.question.unwrap_or_default(),
            event_slug: event.and_then(|e| e.slug.clone()),
            event_title: event.and_then(|e| e.title.clone()),
            yes_price,
            no_price,
            yes_token_id,
            no_token_id,
            volume_24h,
            liquidity,
            end_date: self.end_date,
            active: self.active.unwrap_or(false),
            closed: self.closed.unwrap_or(false),
            resolved: self.resolved.unwrap_or(false),
            url,
        })
    }
}

/// Derive the canonical detail page address from grouping and market slugs.
fn canonical_url(site_url: &str, event_slug: Option<&str>, market_slug: &str) -> String {
    let base = site_url.trim_end_matches('/');
    match event_slug {
        Some(event) => format!("{}/event/{}/{}", base, event, market_slug),
        None => format!("{}/event/{}", base, market_slug),
    }
}
