//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Detection Thresholds ===
    /// Minimum edge (fraction) for an opportunity to qualify (0.02 = 2%).
    #[serde(default = "default_min_edge")]
    pub min_edge: Decimal,

    /// Minimum market liquidity in USD for an opportunity to qualify.
    #[serde(default = "default_min_liquidity")]
    pub min_liquidity: Decimal,

    // === Market Discovery ===
    /// Event slugs to scan in the bulk path (comma-separated in env).
    #[serde(default = "default_event_slugs")]
    pub event_slugs: Vec<String>,

    // === Trading Parameters ===
    /// Simulation mode (no real orders).
    #[serde(default = "default_true")]
    pub dry_run: bool,

    /// Notional USD per leg of a simulated position.
    #[serde(default = "default_lot_size")]
    pub lot_size: Decimal,

    /// Maximum trades to take from the ranked list per run.
    #[serde(default = "default_max_trades")]
    pub max_trades: usize,

    // === Endpoints ===
    /// Gamma API base URL.
    #[serde(default = "default_gamma_api_url")]
    pub gamma_api_url: String,

    /// Polymarket site base URL (for canonical event page addresses).
    #[serde(default = "default_site_url")]
    pub site_url: String,

    // === HTTP Tuning ===
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Max in-flight requests in the direct-by-slug fan-out.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    // === Persistence ===
    /// Directory for scan reports and trade ledgers.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_min_edge() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_min_liquidity() -> Decimal {
    Decimal::new(5000, 0) // $5,000
}

fn default_event_slugs() -> Vec<String> {
    vec![
        "crypto-5m".to_string(),
        "crypto-15m".to_string(),
        "crypto-hourly".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_lot_size() -> Decimal {
    Decimal::new(10, 0) // $10 per leg
}

fn default_max_trades() -> usize {
    1
}

fn default_gamma_api_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_site_url() -> String {
    "https://polymarket.com".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_fetch_concurrency() -> usize {
    4
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_edge < Decimal::ZERO {
            return Err("MIN_EDGE must be non-negative".to_string());
        }

        if self.min_liquidity < Decimal::ZERO {
            return Err("MIN_LIQUIDITY must be non-negative".to_string());
        }

        if self.lot_size <= Decimal::ZERO {
            return Err("LOT_SIZE must be positive".to_string());
        }

        if self.max_trades == 0 {
            return Err("MAX_TRADES must be at least 1".to_string());
        }

        if self.event_slugs.is_empty() {
            return Err("EVENT_SLUGS must name at least one grouping".to_string());
        }

        if self.fetch_concurrency == 0 {
            return Err("FETCH_CONCURRENCY must be at least 1".to_string());
        }

        url::Url::parse(&self.gamma_api_url)
            .map_err(|e| format!("GAMMA_API_URL is not a valid URL: {}", e))?;
        url::Url::parse(&self.site_url)
            .map_err(|e| format!("SITE_URL is not a valid URL: {}", e))?;

        Ok(())
    }

    /// Ledger file path for the current mode.
    pub fn ledger_path(&self) -> std::path::PathBuf {
        let file = if self.dry_run {
            "paper_trades.json"
        } else {
            "live_trades.json"
        };
        std::path::Path::new(&self.data_dir).join(file)
    }

    /// Scan report file path (overwritten each run).
    pub fn scan_report_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("arbitrage_scan.json")
    }
}
