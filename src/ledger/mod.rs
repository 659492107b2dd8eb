//! Append-only trade ledger and latest-scan report persistence.
//!
//! The ledger is a JSON file holding an ordered `{"trades": [...]}` sequence.
//! Appending is a read-modify-write of the full sequence with no cross-process
//! locking: a single concurrent writer per ledger is assumed. The sink sits
//! behind a trait so a database or object store can replace the file later
//! without touching the pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::arbitrage::{Opportunity, Trade};
use crate::error::LedgerError;

/// Append-only persistence of trade records.
pub trait LedgerSink {
    /// Append records in order; returns the total record count after append.
    fn append(&self, trades: &[Trade]) -> Result<usize, LedgerError>;

    /// Read the full ordered sequence (empty when nothing persisted yet).
    fn read_all(&self) -> Result<Vec<Trade>, LedgerError>;
}

/// Persisted ledger file shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    trades: Vec<Trade>,
}

/// File-backed JSON ledger.
#[derive(Debug, Clone)]
pub struct JsonLedger {
    path: PathBuf,
}

impl JsonLedger {
    /// Create a ledger over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LedgerFile, LedgerError> {
        if !self.path.exists() {
            return Ok(LedgerFile::default());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| LedgerError::ReadFailed {
            path: self.path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| LedgerError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn store(&self, file: &LedgerFile) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| LedgerError::WriteFailed {
                path: self.path.display().to_string(),
                source,
            })?;
        }

        let raw = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, raw).map_err(|source| LedgerError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl LedgerSink for JsonLedger {
    fn append(&self, trades: &[Trade]) -> Result<usize, LedgerError> {
        // Read-modify-write of the full sequence; existing entries are never
        // rewritten, a run only appends.
        let mut file = self.load()?;
        file.trades.extend(trades.iter().cloned());
        self.store(&file)?;

        info!(
            path = %self.path.display(),
            appended = trades.len(),
            total = file.trades.len(),
            "Ledger updated"
        );
        Ok(file.trades.len())
    }

    fn read_all(&self) -> Result<Vec<Trade>, LedgerError> {
        Ok(self.load()?.trades)
    }
}

/// Thresholds a scan ran with, persisted alongside its results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Minimum edge threshold (fraction).
    pub min_edge: Decimal,
    /// Minimum liquidity threshold (USD).
    pub min_liquidity: Decimal,
    /// Event groupings scanned.
    pub slugs: Vec<String>,
}

/// Latest scan's ranked opportunities; overwritten each run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanReport {
    /// When the scan ran.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Configuration used.
    pub config: ScanSettings,
    /// Ranked opportunities, best edge first.
    pub opportunities: Vec<Opportunity>,
}

impl ScanReport {
    /// Build a report stamped with the current time.
    pub fn new(config: ScanSettings, opportunities: Vec<Opportunity>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            config,
            opportunities,
        }
    }

    /// Overwrite the report file with this scan's results.
    pub fn write(&self, path: &Path) -> Result<(), LedgerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LedgerError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;
        }

        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|source| LedgerError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), count = self.opportunities.len(), "Scan report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Market;
    use crate::arbitrage::{simulate, Opportunity};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "updown-arb-test-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    fn sample_trade(slug: &str) -> Trade {
        let market = Market {
            market_id: format!("id-{}", slug),
            slug: slug.to_string(),
            question: "Bitcoin Up or Down?".to_string(),
            event_slug: Some("crypto-15m".to_string()),
            event_title: None,
            yes_price: dec!(0.54),
            no_price: dec!(0.48),
            yes_token_id: None,
            no_token_id: None,
            volume_24h: Decimal::ZERO,
            liquidity: dec!(6000),
            end_date: None,
            active: true,
            closed: false,
            resolved: false,
            url: String::new(),
        };
        let opp = Opportunity::evaluate(market, dec!(0.02), dec!(5000));
        simulate(&opp, dec!(10))
    }

    #[test]
    fn append_starts_empty_and_accumulates() {
        let path = scratch_path("accumulate");
        let _ = fs::remove_file(&path);
        let ledger = JsonLedger::new(&path);

        assert!(ledger.read_all().unwrap().is_empty());

        assert_eq!(ledger.append(&[sample_trade("a")]).unwrap(), 1);
        assert_eq!(
            ledger.append(&[sample_trade("b"), sample_trade("c")]).unwrap(),
            3
        );

        let trades = ledger.read_all().unwrap();
        let ids: Vec<&str> = trades.iter().map(|t| t.market_id.as_str()).collect();
        assert_eq!(ids, vec!["id-a", "id-b", "id-c"]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn round_trip_preserves_settlement_fields() {
        let path = scratch_path("roundtrip");
        let _ = fs::remove_file(&path);
        let ledger = JsonLedger::new(&path);

        let trade = sample_trade("a");
        ledger.append(std::slice::from_ref(&trade)).unwrap();

        let read_back = &ledger.read_all().unwrap()[0];
        assert_eq!(read_back.total_cost, trade.total_cost);
        assert_eq!(read_back.profit, trade.profit);
        assert_eq!(read_back.status, trade.status);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_ledger_is_a_read_error() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json at all").unwrap();
        let ledger = JsonLedger::new(&path);

        assert!(matches!(
            ledger.read_all(),
            Err(LedgerError::Corrupt { .. })
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn scan_report_round_trips() {
        let path = scratch_path("report");
        let _ = fs::remove_file(&path);

        let market = Market {
            market_id: "id-a".to_string(),
            slug: "btc-updown-5m-300".to_string(),
            question: "Bitcoin Up or Down?".to_string(),
            event_slug: Some("crypto-5m".to_string()),
            event_title: None,
            yes_price: dec!(0.54),
            no_price: dec!(0.48),
            yes_token_id: None,
            no_token_id: None,
            volume_24h: Decimal::ZERO,
            liquidity: dec!(6000),
            end_date: None,
            active: true,
            closed: false,
            resolved: false,
            url: String::new(),
        };
        let report = ScanReport::new(
            ScanSettings {
                min_edge: dec!(0.02),
                min_liquidity: dec!(5000),
                slugs: vec!["crypto-5m".to_string()],
            },
            vec![Opportunity::evaluate(market, dec!(0.02), dec!(5000))],
        );

        report.write(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: ScanReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.opportunities.len(), 1);
        assert_eq!(parsed.config.min_edge, dec!(0.02));
        assert_eq!(parsed.opportunities[0].edge, dec!(0.02));

        let _ = fs::remove_file(&path);
    }
}
