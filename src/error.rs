//! Unified error types for the scanner.

use thiserror::Error;

/// Unified error type for the scanner binary.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Market acquisition error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// Ledger persistence error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Market acquisition and normalization errors.
///
/// These are isolated per grouping or per record during acquisition; they
/// surface in logs, never as a batch-level failure.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Failed to fetch a grouping or market.
    #[error("failed to fetch {slug}: {reason}")]
    FetchFailed {
        /// The event or market slug that failed.
        slug: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to parse market data into a normalized record.
    #[error("failed to parse market data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Ledger and scan-report persistence errors.
///
/// Fatal to the persistence step only; computed in-memory results stay
/// available to the caller.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to read the existing ledger file.
    #[error("failed to read ledger {path}: {source}")]
    ReadFailed {
        /// Ledger file path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Existing ledger contents did not parse.
    #[error("ledger {path} is corrupt: {source}")]
    Corrupt {
        /// Ledger file path.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to write the ledger file back.
    #[error("failed to write ledger {path}: {source}")]
    WriteFailed {
        /// Ledger file path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to serialize records.
    #[error("failed to serialize ledger records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
