//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with one table:
//! - synergy_scores(drug_1, drug_2, cell_line, bliss, loewe, hsa, zip,
//!   bliss_uncertainty, loewe_uncertainty, hsa_uncertainty, zip_uncertainty)

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;
