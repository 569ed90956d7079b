//! Database schema definitions

/// SQL to create the synergy_scores table
pub const CREATE_SYNERGY_SCORES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS synergy_scores (
    drug_1 TEXT NOT NULL,
    drug_2 TEXT NOT NULL,
    cell_line TEXT NOT NULL,
    bliss REAL,
    loewe REAL,
    hsa REAL,
    zip REAL,
    bliss_uncertainty REAL,
    loewe_uncertainty REAL,
    hsa_uncertainty REAL,
    zip_uncertainty REAL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_synergy_drug_1 ON synergy_scores(drug_1)",
    "CREATE INDEX IF NOT EXISTS idx_synergy_combination ON synergy_scores(drug_1, drug_2, cell_line)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_SYNERGY_SCORES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
