//! Query service implementation
//!
//! The single functional component of the crate: validates request
//! parameters, issues parameterized lookups against the store, and
//! shapes the results. Three outcomes are kept distinct and never
//! conflated:
//! - `InvalidRequest`: a required parameter is missing; the store is
//!   never touched
//! - `NotFound`: a well-formed lookup matched no record
//! - `Store`: the store itself failed; the description is surfaced

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::record::SynergyRecord;
use crate::storage::SqliteStore;

/// Default row cap for drug search
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Queries shorter than this (after trimming) short-circuit to an
/// empty result instead of scanning the whole drug column
const MIN_SEARCH_LEN: usize = 2;

/// Operation-level error taxonomy, mapped to status codes at the
/// transport boundary only
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Combination not found")]
    NotFound,

    #[error("{0}")]
    Store(String),
}

impl From<crate::Error> for ServiceError {
    fn from(err: crate::Error) -> Self {
        ServiceError::Store(err.to_string())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub total_records: usize,
}

/// Body of the batch lookup endpoint
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub queries: Vec<BatchQueryInput>,
}

/// One lookup specification inside a batch request.
///
/// Fields default to `None` so a sparse entry deserializes instead of
/// failing the whole batch; missing fields are reported per entry.
#[derive(Debug, Default, Deserialize)]
pub struct BatchQueryInput {
    #[serde(default)]
    pub drug_1: Option<String>,
    #[serde(default)]
    pub drug_2: Option<String>,
    #[serde(default)]
    pub cell_line: Option<String>,
}

/// Per-entry result of a batch lookup.
///
/// The three shapes are deliberately asymmetric: `not_found` entries
/// carry explicit nulls for the four score fields and omit the
/// uncertainty fields entirely.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Found {
        #[serde(flatten)]
        record: SynergyRecord,
        status: &'static str,
    },
    NotFound {
        drug_1: String,
        drug_2: String,
        cell_line: String,
        status: &'static str,
        bliss: Option<f64>,
        loewe: Option<f64>,
        hsa: Option<f64>,
        zip: Option<f64>,
    },
    Invalid {
        drug_1: String,
        drug_2: String,
        cell_line: String,
        status: &'static str,
        error: String,
    },
}

impl BatchEntry {
    fn found(record: SynergyRecord) -> Self {
        BatchEntry::Found { record, status: "found" }
    }

    fn not_found(drug_1: &str, drug_2: &str, cell_line: &str) -> Self {
        BatchEntry::NotFound {
            drug_1: drug_1.to_string(),
            drug_2: drug_2.to_string(),
            cell_line: cell_line.to_string(),
            status: "not_found",
            bliss: None,
            loewe: None,
            hsa: None,
            zip: None,
        }
    }

    fn invalid(drug_1: &str, drug_2: &str, cell_line: &str) -> Self {
        BatchEntry::Invalid {
            drug_1: drug_1.to_string(),
            drug_2: drug_2.to_string(),
            cell_line: cell_line.to_string(),
            status: "invalid",
            error: "Missing required fields".to_string(),
        }
    }
}

/// Response wrapper for batch lookups; `results` preserves the input
/// order and cardinality
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchEntry>,
}

/// Stateless query service over the synergy store.
///
/// Holds only the store location; every operation opens its own
/// connection and releases it on return, error paths included.
pub struct SynergyService {
    database: PathBuf,
}

impl SynergyService {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self { database: database.into() }
    }

    fn open_store(&self) -> ServiceResult<SqliteStore> {
        SqliteStore::open_read_only(&self.database).map_err(Into::into)
    }

    /// Trivial count query to confirm the store is reachable
    pub fn health(&self) -> ServiceResult<Health> {
        let store = self.open_store()?;
        let total_records = store.count_records()?;
        Ok(Health { status: "healthy", total_records })
    }

    /// All distinct primary drugs, sorted ascending
    pub fn all_drugs(&self) -> ServiceResult<Vec<String>> {
        let store = self.open_store()?;
        Ok(store.all_drugs()?)
    }

    /// Case-insensitive substring search over primary drugs.
    ///
    /// Trimmed queries shorter than two characters return an empty
    /// list without touching the store.
    pub fn search_drugs(&self, q: &str, limit: Option<i64>) -> ServiceResult<Vec<String>> {
        let query = q.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let store = self.open_store()?;
        Ok(store.search_drugs(query, limit)?)
    }

    /// All partner drugs recorded for an exact primary drug
    pub fn partners(&self, drug1: Option<&str>) -> ServiceResult<Vec<String>> {
        let drug1 = required(drug1).ok_or_else(|| {
            ServiceError::InvalidRequest("drug1 parameter required".to_string())
        })?;

        let store = self.open_store()?;
        Ok(store.partners_of(drug1)?)
    }

    /// All cell lines recorded for an exact (drug1, drug2) pair
    pub fn cell_lines(
        &self,
        drug1: Option<&str>,
        drug2: Option<&str>,
    ) -> ServiceResult<Vec<String>> {
        let (drug1, drug2) = match (required(drug1), required(drug2)) {
            (Some(d1), Some(d2)) => (d1, d2),
            _ => {
                return Err(ServiceError::InvalidRequest(
                    "drug1 and drug2 parameters required".to_string(),
                ))
            }
        };

        let store = self.open_store()?;
        Ok(store.cell_lines_for(drug1, drug2)?)
    }

    /// Point lookup of the full record for one combination
    pub fn synergy(
        &self,
        drug1: Option<&str>,
        drug2: Option<&str>,
        cellline: Option<&str>,
    ) -> ServiceResult<SynergyRecord> {
        let (drug1, drug2, cellline) =
            match (required(drug1), required(drug2), required(cellline)) {
                (Some(d1), Some(d2), Some(cl)) => (d1, d2, cl),
                _ => {
                    return Err(ServiceError::InvalidRequest(
                        "drug1, drug2, and cellline parameters required".to_string(),
                    ))
                }
            };

        let store = self.open_store()?;
        store
            .get_synergy(drug1, drug2, cellline)?
            .ok_or(ServiceError::NotFound)
    }

    /// Resolve every batch entry independently on one store connection.
    ///
    /// Invalid and not-found entries are recorded in-line and never
    /// abort the batch; the first store failure aborts the whole batch.
    pub fn synergy_batch(&self, request: &BatchRequest) -> ServiceResult<BatchResponse> {
        let store = self.open_store()?;
        let mut results = Vec::with_capacity(request.queries.len());

        for query in &request.queries {
            let drug1 = query.drug_1.as_deref().unwrap_or("").trim();
            let drug2 = query.drug_2.as_deref().unwrap_or("").trim();
            let cell_line = query.cell_line.as_deref().unwrap_or("").trim();

            if drug1.is_empty() || drug2.is_empty() || cell_line.is_empty() {
                results.push(BatchEntry::invalid(drug1, drug2, cell_line));
                continue;
            }

            match store.get_synergy(drug1, drug2, cell_line)? {
                Some(record) => results.push(BatchEntry::found(record)),
                None => results.push(BatchEntry::not_found(drug1, drug2, cell_line)),
            }
        }

        Ok(BatchResponse { results })
    }
}

/// Trimmed, non-empty parameter or None
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Service pointed at an unopenable path: any store access fails,
    /// so an Ok result proves the guard fired before the store
    fn unreachable_service() -> SynergyService {
        SynergyService::new("/nonexistent/dir/drugcomb.db")
    }

    fn service_with_records(records: &[SynergyRecord]) -> (TempDir, SynergyService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drugcomb.db");
        let store = SqliteStore::open(&path).unwrap();
        for record in records {
            store.insert_record(record).unwrap();
        }
        (dir, SynergyService::new(path))
    }

    fn sample_record() -> SynergyRecord {
        SynergyRecord::new("Aspirin", "Carboplatin", "MCF7")
            .with_scores(0.1, 0.2, 0.3, 0.4)
            .with_uncertainties(0.01, 0.02, 0.03, 0.04)
    }

    #[test]
    fn test_short_search_skips_store() {
        let service = unreachable_service();

        assert!(service.search_drugs("", None).unwrap().is_empty());
        assert!(service.search_drugs("a", None).unwrap().is_empty());
        assert!(service.search_drugs("  a  ", None).unwrap().is_empty());

        // Two characters is long enough to reach the (broken) store
        assert!(matches!(
            service.search_drugs("ab", None),
            Err(ServiceError::Store(_))
        ));
    }

    #[test]
    fn test_missing_params_skip_store() {
        let service = unreachable_service();

        assert!(matches!(
            service.partners(None),
            Err(ServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.partners(Some("   ")),
            Err(ServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.cell_lines(Some("A"), None),
            Err(ServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.synergy(Some("A"), Some("B"), Some("")),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_store_failure_is_store_error() {
        let service = unreachable_service();

        assert!(matches!(service.health(), Err(ServiceError::Store(_))));
        assert!(matches!(service.all_drugs(), Err(ServiceError::Store(_))));
        assert!(matches!(
            service.partners(Some("Aspirin")),
            Err(ServiceError::Store(_))
        ));
    }

    #[test]
    fn test_health_counts_records() {
        let (_dir, service) = service_with_records(&[sample_record()]);
        let health = service.health().unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.total_records, 1);
    }

    #[test]
    fn test_synergy_echoes_key_fields() {
        let (_dir, service) = service_with_records(&[sample_record()]);

        let record = service
            .synergy(Some("Aspirin"), Some("Carboplatin"), Some("MCF7"))
            .unwrap();
        assert_eq!(record.drug_1, "Aspirin");
        assert_eq!(record.drug_2, "Carboplatin");
        assert_eq!(record.cell_line, "MCF7");
        assert_eq!(record.bliss, Some(0.1));
    }

    #[test]
    fn test_synergy_trims_params() {
        let (_dir, service) = service_with_records(&[sample_record()]);

        let record = service
            .synergy(Some(" Aspirin "), Some("Carboplatin"), Some("MCF7"))
            .unwrap();
        assert_eq!(record.drug_1, "Aspirin");
    }

    #[test]
    fn test_absent_combination_is_not_found() {
        let (_dir, service) = service_with_records(&[sample_record()]);

        assert!(matches!(
            service.synergy(Some("Aspirin"), Some("Carboplatin"), Some("A549")),
            Err(ServiceError::NotFound)
        ));
        // Reversed drug order does not match either
        assert!(matches!(
            service.synergy(Some("Carboplatin"), Some("Aspirin"), Some("MCF7")),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn test_reads_are_idempotent() {
        let (_dir, service) = service_with_records(&[sample_record()]);

        let first = service.all_drugs().unwrap();
        let second = service.all_drugs().unwrap();
        assert_eq!(first, second);

        let a = service.search_drugs("asp", None).unwrap();
        let b = service.search_drugs("asp", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_preserves_order_and_cardinality() {
        let (_dir, service) = service_with_records(&[sample_record()]);

        let request = BatchRequest {
            queries: vec![
                BatchQueryInput {
                    drug_1: Some("Aspirin".into()),
                    drug_2: Some("Carboplatin".into()),
                    cell_line: Some("MCF7".into()),
                },
                BatchQueryInput {
                    drug_1: Some("".into()),
                    drug_2: Some("B".into()),
                    cell_line: Some("X".into()),
                },
                BatchQueryInput {
                    drug_1: Some("Nope".into()),
                    drug_2: Some("Nada".into()),
                    cell_line: Some("X".into()),
                },
            ],
        };

        let response = service.synergy_batch(&request).unwrap();
        assert_eq!(response.results.len(), 3);
        assert!(matches!(response.results[0], BatchEntry::Found { .. }));
        assert!(matches!(response.results[1], BatchEntry::Invalid { .. }));
        assert!(matches!(response.results[2], BatchEntry::NotFound { .. }));
    }

    #[test]
    fn test_batch_entry_with_no_fields_is_invalid() {
        let (_dir, service) = service_with_records(&[]);

        let request = BatchRequest {
            queries: vec![BatchQueryInput::default()],
        };

        let response = service.synergy_batch(&request).unwrap();
        assert!(matches!(response.results[0], BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_batch_not_found_shape() {
        let (_dir, service) = service_with_records(&[]);

        let request = BatchRequest {
            queries: vec![BatchQueryInput {
                drug_1: Some("A".into()),
                drug_2: Some("B".into()),
                cell_line: Some("X".into()),
            }],
        };

        let response = service.synergy_batch(&request).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        let entry = &json["results"][0];

        assert_eq!(entry["status"], "not_found");
        assert_eq!(entry["drug_1"], "A");
        // Score fields are explicit nulls, uncertainty fields are absent
        assert!(entry["bliss"].is_null());
        assert!(entry.get("bliss_uncertainty").is_none());
    }

    #[test]
    fn test_batch_found_shape() {
        let (_dir, service) = service_with_records(&[sample_record()]);

        let request = BatchRequest {
            queries: vec![BatchQueryInput {
                drug_1: Some("Aspirin".into()),
                drug_2: Some("Carboplatin".into()),
                cell_line: Some("MCF7".into()),
            }],
        };

        let response = service.synergy_batch(&request).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        let entry = &json["results"][0];

        assert_eq!(entry["status"], "found");
        assert_eq!(entry["bliss"], 0.1);
        assert_eq!(entry["zip_uncertainty"], 0.04);
    }

    #[test]
    fn test_batch_invalid_shape() {
        let (_dir, service) = service_with_records(&[]);

        let request = BatchRequest {
            queries: vec![BatchQueryInput {
                drug_1: Some("A".into()),
                drug_2: None,
                cell_line: Some("X".into()),
            }],
        };

        let response = service.synergy_batch(&request).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        let entry = &json["results"][0];

        assert_eq!(entry["status"], "invalid");
        assert_eq!(entry["error"], "Missing required fields");
        // Supplied fields are echoed, missing ones echo as empty
        assert_eq!(entry["drug_1"], "A");
        assert_eq!(entry["drug_2"], "");
    }
}
