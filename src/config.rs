use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of an optional `drugcomb.toml` next to the binary.
///
/// Command-line flags take precedence over values found here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DrugcombConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("drugcomb.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("drugcomb.db")
}

/// Port the original service listened on
pub const DEFAULT_PORT: u16 = 5000;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DrugcombConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DrugcombConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drugcomb.toml");
        assert!(load_config(Some(&path)).unwrap().is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drugcomb.toml");
        std::fs::write(&path, "database = \"scores.db\"\nport = 8080\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("scores.db"));
        assert_eq!(config.port, Some(8080));
    }

    #[test]
    fn test_ensure_db_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("drugcomb.db");
        ensure_db_dir(&db_path).unwrap();
        assert!(db_path.parent().unwrap().exists());
    }
}
