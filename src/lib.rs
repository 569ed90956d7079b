//! # Drugcomb - Drug-combination synergy lookup service
//!
//! Read-only query service over a precomputed table of pairwise
//! drug-combination synergy scores (Bliss, Loewe, HSA, ZIP plus
//! uncertainties), keyed by (drug_1, drug_2, cell_line).
//!
//! Drugcomb provides:
//! - SQLite-backed storage of precomputed synergy records
//! - Autocomplete queries: drug search, partner drugs, cell lines
//! - Point and batch synergy lookups with a stable JSON contract
//! - An axum HTTP server exposing the query surface under /api

pub mod config;
pub mod query;
pub mod record;
pub mod server;
pub mod storage;

// Re-exports for convenient access
pub use config::DrugcombConfig;
pub use query::SynergyService;
pub use record::SynergyRecord;
pub use storage::SqliteStore;

/// Result type alias for Drugcomb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Drugcomb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
