//! Best-effort price extraction from event page bodies.
//!
//! Fallback for markets the Gamma API cannot resolve by slug: the event page
//! embeds the same `outcomePrices` pair in its serialized state. Contract is
//! deliberately loose: given a page body, return the price pair or nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

static PRICES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""outcomePrices"\s*:\s*\[([^\]]+)\]"#).expect("valid regex"));

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\d+").expect("valid regex"));

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<title>([^<]+)</title>").expect("valid regex"));

/// Price pair scraped from an event page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPrices {
    /// Page title, with the site suffix stripped.
    pub title: String,
    /// YES outcome price.
    pub yes_price: Decimal,
    /// NO outcome price.
    pub no_price: Decimal,
}

/// Extract the YES/NO price pair from a page body, or nothing.
pub fn extract_prices(html: &str) -> Option<ScrapedPrices> {
    let captures = PRICES_RE.captures(html)?;
    let body = captures.get(1)?.as_str();

    let mut prices = NUMBER_RE
        .find_iter(body)
        .filter_map(|m| m.as_str().parse::<Decimal>().ok());
    let yes_price = prices.next()?;
    let no_price = prices.next()?;

    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("Unknown");
    let title = title.split('|').next().unwrap_or(title).trim().to_string();

    Some(ScrapedPrices {
        title,
        yes_price,
        no_price,
    })
}

/// Fetch an event page and scrape its price pair. Every failure collapses to
/// `None`; this path is advisory only.
#[instrument(skip(http))]
pub async fn scrape_market_prices(http: &reqwest::Client, url: &str) -> Option<ScrapedPrices> {
    let response = http
        .get(url)
        .header("User-Agent", "Mozilla/5.0")
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        debug!(url = %url, status = %response.status(), "Scrape fetch failed");
        return None;
    }

    let body = response.text().await.ok()?;
    extract_prices(&body)
}
