//! Synergy record type - one row of the precomputed score table
//!
//! Every record is keyed by (drug_1, drug_2, cell_line) and carries
//! four synergy model scores with their uncertainties:
//! - `bliss`: Bliss independence excess
//! - `loewe`: Loewe additivity excess
//! - `hsa`: Highest Single Agent excess
//! - `zip`: Zero Interaction Potency delta

use serde::{Deserialize, Serialize};

/// A precomputed synergy record for one drug pair in one cell line.
///
/// Drug ordering is not normalized: a combination stored as (A, B)
/// is only reachable as (A, B), never as (B, A). Scores are nullable
/// because not every model converges for every combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRecord {
    /// Primary drug of the combination
    pub drug_1: String,
    /// Partner drug of the combination
    pub drug_2: String,
    /// Cell line the combination was tested in
    pub cell_line: String,
    /// Bliss independence synergy score
    pub bliss: Option<f64>,
    /// Loewe additivity synergy score
    pub loewe: Option<f64>,
    /// Highest Single Agent synergy score
    pub hsa: Option<f64>,
    /// Zero Interaction Potency synergy score
    pub zip: Option<f64>,
    pub bliss_uncertainty: Option<f64>,
    pub loewe_uncertainty: Option<f64>,
    pub hsa_uncertainty: Option<f64>,
    pub zip_uncertainty: Option<f64>,
}

impl SynergyRecord {
    /// Create a record with no scores set
    pub fn new(
        drug_1: impl Into<String>,
        drug_2: impl Into<String>,
        cell_line: impl Into<String>,
    ) -> Self {
        Self {
            drug_1: drug_1.into(),
            drug_2: drug_2.into(),
            cell_line: cell_line.into(),
            bliss: None,
            loewe: None,
            hsa: None,
            zip: None,
            bliss_uncertainty: None,
            loewe_uncertainty: None,
            hsa_uncertainty: None,
            zip_uncertainty: None,
        }
    }

    /// Set all four synergy scores
    pub fn with_scores(mut self, bliss: f64, loewe: f64, hsa: f64, zip: f64) -> Self {
        self.bliss = Some(bliss);
        self.loewe = Some(loewe);
        self.hsa = Some(hsa);
        self.zip = Some(zip);
        self
    }

    /// Set all four uncertainty values
    pub fn with_uncertainties(mut self, bliss: f64, loewe: f64, hsa: f64, zip: f64) -> Self {
        self.bliss_uncertainty = Some(bliss);
        self.loewe_uncertainty = Some(loewe);
        self.hsa_uncertainty = Some(hsa);
        self.zip_uncertainty = Some(zip);
        self
    }
}
