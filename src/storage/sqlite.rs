//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use crate::Result;
use crate::record::SynergyRecord;
use super::schema;

/// Columns selected for a full synergy record, in `row_to_record` order
const RECORD_COLUMNS: &str = "drug_1, drug_2, cell_line, \
     bliss, loewe, hsa, zip, \
     bliss_uncertainty, loewe_uncertainty, hsa_uncertainty, zip_uncertainty";

/// SQLite-backed storage for precomputed synergy scores.
///
/// The service only reads; `insert_record` exists for the import
/// command and for tests.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an existing database read-only, without touching the
    /// schema. The query service only ever reads.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Read Operations ==========

    /// Count all synergy records
    pub fn count_records(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM synergy_scores", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All distinct primary drugs, sorted ascending
    pub fn all_drugs(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT drug_1 FROM synergy_scores ORDER BY drug_1")?;

        let drugs = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(drugs)
    }

    /// Case-insensitive substring search over the primary drug column.
    ///
    /// LIKE wildcards in the query are escaped so the caller's text is
    /// matched literally.
    pub fn search_drugs(&self, query: &str, limit: i64) -> Result<Vec<String>> {
        let pattern = format!("%{}%", escape_like(query));

        let mut stmt = self.conn.prepare(
            r"SELECT DISTINCT drug_1
              FROM synergy_scores
              WHERE LOWER(drug_1) LIKE LOWER(?1) ESCAPE '\'
              ORDER BY drug_1
              LIMIT ?2",
        )?;

        let drugs = stmt
            .query_map(params![pattern, limit], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(drugs)
    }

    /// All distinct partner drugs for an exact primary drug, sorted ascending
    pub fn partners_of(&self, drug1: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT drug_2 FROM synergy_scores WHERE drug_1 = ?1 ORDER BY drug_2",
        )?;

        let partners = stmt
            .query_map([drug1], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(partners)
    }

    /// All distinct cell lines for an exact (drug_1, drug_2) pair, sorted ascending
    pub fn cell_lines_for(&self, drug1: &str, drug2: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT cell_line FROM synergy_scores \
             WHERE drug_1 = ?1 AND drug_2 = ?2 ORDER BY cell_line",
        )?;

        let cell_lines = stmt
            .query_map(params![drug1, drug2], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(cell_lines)
    }

    /// Look up the record for an exact (drug_1, drug_2, cell_line) key.
    ///
    /// Drug order is the caller's order; (A, B) does not match a row
    /// stored as (B, A).
    pub fn get_synergy(
        &self,
        drug1: &str,
        drug2: &str,
        cell_line: &str,
    ) -> Result<Option<SynergyRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM synergy_scores \
             WHERE drug_1 = ?1 AND drug_2 = ?2 AND cell_line = ?3"
        );

        self.conn
            .query_row(&sql, params![drug1, drug2, cell_line], row_to_record)
            .optional()
            .map_err(Into::into)
    }

    // ========== Write Operations (import/tests only) ==========

    /// Insert a synergy record
    pub fn insert_record(&self, record: &SynergyRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO synergy_scores (drug_1, drug_2, cell_line,
                bliss, loewe, hsa, zip,
                bliss_uncertainty, loewe_uncertainty, hsa_uncertainty, zip_uncertainty)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.drug_1,
                record.drug_2,
                record.cell_line,
                record.bliss,
                record.loewe,
                record.hsa,
                record.zip,
                record.bliss_uncertainty,
                record.loewe_uncertainty,
                record.hsa_uncertainty,
                record.zip_uncertainty,
            ],
        )?;
        Ok(())
    }

    /// Begin a transaction for bulk inserts
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Load records from a CSV export whose header row matches the
    /// column names. All rows go in under one transaction; a bad row
    /// aborts the import and the open transaction rolls back when the
    /// connection drops.
    pub fn import_csv(&mut self, path: &Path) -> Result<usize> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut total = 0usize;

        self.begin_transaction()?;
        for result in reader.deserialize() {
            let record: SynergyRecord = result?;
            self.insert_record(&record)?;
            total += 1;
        }
        self.commit()?;

        Ok(total)
    }
}

/// Escape LIKE wildcards so user input matches literally (ESCAPE '\')
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Helper to convert a row to a SynergyRecord
fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SynergyRecord> {
    Ok(SynergyRecord {
        drug_1: row.get(0)?,
        drug_2: row.get(1)?,
        cell_line: row.get(2)?,
        bliss: row.get(3)?,
        loewe: row.get(4)?,
        hsa: row.get(5)?,
        zip: row.get(6)?,
        bliss_uncertainty: row.get(7)?,
        loewe_uncertainty: row.get(8)?,
        hsa_uncertainty: row.get(9)?,
        zip_uncertainty: row.get(10)?,
    })
}
