// ⚙️ Configuration - file locations and naming convention
//
// Every path the pipeline touches comes from here, so a test can point a whole
// session at its own temporary directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filename::{NamingConvention, NAMING_CONVENTION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    /// Directory holding the sales store, ledger and database
    pub data_dir: PathBuf,

    /// Directory import files are resolved against
    pub import_dir: PathBuf,

    /// Flat-file store, relative to `data_dir`
    pub all_sales_file: String,

    /// Import ledger, relative to `data_dir`
    pub imported_files_file: String,

    /// SQLite database, relative to `data_dir`
    pub db_file: String,

    pub naming_convention: String,

    /// CSV field delimiter for import files and the store
    pub delimiter: char,
}

impl Default for SalesConfig {
    fn default() -> Self {
        SalesConfig::in_dir("p01_files")
    }
}

impl SalesConfig {
    /// All files inside one directory; import files are looked up there too
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        SalesConfig {
            import_dir: dir.clone(),
            data_dir: dir,
            all_sales_file: "all_sales.csv".to_string(),
            imported_files_file: "imported_files.txt".to_string(),
            db_file: "sales_db.sqlite".to_string(),
            naming_convention: NAMING_CONVENTION.to_string(),
            delimiter: ',',
        }
    }

    /// Read a JSON config file; keys that are left out take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: SalesConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.naming()?;
        config.delimiter_byte()?;
        Ok(config)
    }

    pub fn all_sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.all_sales_file)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.imported_files_file)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn import_path(&self, filename: &str) -> PathBuf {
        self.import_dir.join(filename)
    }

    pub fn naming(&self) -> Result<NamingConvention> {
        NamingConvention::new(&self.naming_convention)
    }

    /// The csv crate wants a single byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .with_context(|| format!("Delimiter {:?} is not a single ASCII character", self.delimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_paths() {
        let config = SalesConfig::default();
        assert_eq!(config.all_sales_path(), Path::new("p01_files/all_sales.csv"));
        assert_eq!(config.ledger_path(), Path::new("p01_files/imported_files.txt"));
        assert_eq!(config.db_path(), Path::new("p01_files/sales_db.sqlite"));
        assert_eq!(
            config.import_path("sales_q1_2021_w.csv"),
            Path::new("p01_files/sales_q1_2021_w.csv")
        );
        assert_eq!(config.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "data_dir": "/tmp/sales", "import_dir": "/tmp/sales/incoming" }"#,
        )
        .unwrap();

        let config = SalesConfig::load(&path).unwrap();
        assert_eq!(config.all_sales_path(), Path::new("/tmp/sales/all_sales.csv"));
        assert_eq!(
            config.import_path("sales_q1_2021_w.csv"),
            Path::new("/tmp/sales/incoming/sales_q1_2021_w.csv")
        );
        assert_eq!(config.naming_convention, NAMING_CONVENTION);
    }

    #[test]
    fn test_load_rejects_bad_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "delimiter": "€" }"#).unwrap();

        assert!(SalesConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(SalesConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
