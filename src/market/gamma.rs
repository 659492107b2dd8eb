//! Polymarket Gamma API client.
//!
//! Two acquisition modes, both fault-isolated per item: bulk-by-grouping
//! (event slug → member markets, filtered to tradeable) and direct-by-slug
//! (one market per slug, unfiltered). A bad grouping or slug never aborts the
//! batch; the result is the subset that succeeded.

use futures::{stream, StreamExt};
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::MarketError;

use super::types::{GammaEventRaw, GammaMarketRaw, Market};

/// HTTP client for the Polymarket Gamma API.
#[derive(Debug, Clone)]
pub struct GammaClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Gamma API base URL.
    base_url: String,
    /// Site base URL for canonical page addresses.
    site_url: String,
    /// Max in-flight requests in the direct-by-slug fan-out.
    fetch_concurrency: usize,
}

impl GammaClient {
    /// Create a new Gamma client from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.gamma_api_url.trim_end_matches('/').to_string(),
            site_url: config.site_url.clone(),
            fetch_concurrency: config.fetch_concurrency.max(1),
        }
    }

    /// Get the HTTP client reference.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Bulk-by-grouping acquisition: fetch each event's member markets in
    /// sequence, dropping markets that are closed, resolved or inactive.
    ///
    /// A failed grouping is logged and skipped; the rest proceed. Result
    /// order follows input order modulo drops.
    #[instrument(skip(self))]
    pub async fn event_markets(&self, slugs: &[String]) -> Vec<Market> {
        let mut markets = Vec::new();

        for slug in slugs {
            match self.fetch_event(slug).await {
                Ok(event) => {
                    let before = markets.len();
                    for raw_market in &event.markets {
                        match serde_json::from_value::<GammaMarketRaw>(raw_market.clone()) {
                            Ok(raw) => match raw.normalize(Some(&event), &self.site_url) {
                                Ok(market) if market.is_tradeable() => markets.push(market),
                                Ok(market) => {
                                    debug!(slug = %market.slug, "Skipping non-tradeable market")
                                }
                                Err(e) => {
                                    warn!(event = %slug, error = %e, "Dropping malformed market")
                                }
                            },
                            Err(e) => {
                                warn!(event = %slug, error = %e, "Dropping unreadable market")
                            }
                        }
                    }
                    debug!(
                        event = %slug,
                        kept = markets.len() - before,
                        total = event.markets.len(),
                        "Fetched event markets"
                    );
                }
                Err(e) => {
                    warn!(event = %slug, error = %e, "Skipping event grouping");
                }
            }
        }

        markets
    }

    /// Direct-by-slug acquisition: fetch each market individually with a
    /// bounded order-preserving fan-out. A failed or empty lookup yields
    /// `None` for that slug only.
    ///
    /// Unlike the bulk path, no tradeability filter is applied: callers name
    /// a specific market and want to see its status flags.
    #[instrument(skip(self, slugs), fields(count = slugs.len()))]
    pub async fn markets_by_slugs(&self, slugs: &[String]) -> Vec<Option<Market>> {
        stream::iter(slugs)
            .map(|slug| async move {
                match self.fetch_market(slug).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(slug = %slug, error = %e, "Market lookup failed");
                        None
                    }
                }
            })
            .buffered(self.fetch_concurrency)
            .collect()
            .await
    }

    /// Fetch one event grouping by slug.
    async fn fetch_event(&self, slug: &str) -> Result<GammaEventRaw, MarketError> {
        let url = format!("{}/events/{}", self.base_url, slug);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::FetchFailed {
                slug: slug.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("event {}: {}", slug, e)))
    }

    /// Fetch and normalize a single market by slug, `None` when not found.
    async fn fetch_market(&self, slug: &str) -> Result<Option<Market>, MarketError> {
        let url = format!("{}/markets", self.base_url);

        let response = self.http.get(&url).query(&[("slug", slug)]).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::FetchFailed {
                slug: slug.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let raw: Vec<GammaMarketRaw> = response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("market {}: {}", slug, e)))?;

        match raw.into_iter().next() {
            Some(raw) => raw.normalize(None, &self.site_url).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config() -> Config {
        serde_json::from_value(serde_json::json!({})).expect("defaults deserialize")
    }

    #[test]
    fn client_creation_works() {
        let client = GammaClient::new(&test_config());
        assert_eq!(client.base_url, "https://gamma-api.polymarket.com");
        assert_eq!(client.fetch_concurrency, 4);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let mut config = test_config();
        config.gamma_api_url = "https://example.test/".to_string();
        let client = GammaClient::new(&config);
        assert_eq!(client.base_url, "https://example.test");
    }

    #[tokio::test]
    async fn unreachable_grouping_is_isolated() {
        // Bogus loopback port: the transport fault must not panic or abort,
        // the result is simply the empty surviving subset.
        let mut config = test_config();
        config.gamma_api_url = "http://127.0.0.1:1".to_string();
        config.http_timeout_ms = 200;
        let client = GammaClient::new(&config);

        let markets = client
            .event_markets(&["crypto-5m".to_string(), "crypto-15m".to_string()])
            .await;
        assert!(markets.is_empty());
    }

    #[tokio::test]
    async fn failed_slug_lookup_yields_none_per_item() {
        let mut config = test_config();
        config.gamma_api_url = "http://127.0.0.1:1".to_string();
        config.http_timeout_ms = 200;
        let client = GammaClient::new(&config);

        let slugs = vec![
            "btc-updown-5m-300".to_string(),
            "btc-updown-15m-900".to_string(),
        ];
        let results = client.markets_by_slugs(&slugs).await;

        // Order preserved, one outcome per input slug.
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Option::is_none));
    }
}
