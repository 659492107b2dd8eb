//! Market acquisition: Gamma API client, normalized records, scrape fallback.

pub mod gamma;
pub mod scrape;
pub mod types;

pub use gamma::GammaClient;
pub use types::Market;
