// 📒 Import ledger - file names already imported, one per line, append-only

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ImportLedger {
    path: PathBuf,
}

impl ImportLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ImportLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the base name of `file_path` is already recorded.
    ///
    /// A missing ledger file is an empty ledger.
    pub fn already_imported(&self, file_path: &Path) -> Result<bool> {
        let Some(name) = base_name(file_path) else {
            return Ok(false);
        };

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read import ledger: {}", self.path.display())
                })
            }
        };

        Ok(contents.lines().any(|line| line == name))
    }

    /// Append the base name of `file_path`. No deduplication, check `already_imported` first.
    pub fn record_imported(&self, file_path: &Path) -> Result<()> {
        let name = base_name(file_path)
            .with_context(|| format!("No file name in path: {}", file_path.display()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open import ledger: {}", self.path.display()))?;

        writeln!(file, "{}", name)
            .with_context(|| format!("Failed to write import ledger: {}", self.path.display()))?;

        debug!(file = name, ledger = %self.path.display(), "recorded import");
        Ok(())
    }
}

fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_ledger_is_empty() {
        let dir = tempdir().unwrap();
        let ledger = ImportLedger::new(dir.path().join("imported_files.txt"));

        assert!(!ledger.already_imported(Path::new("sales_q1_2021_w.csv")).unwrap());
    }

    #[test]
    fn test_record_then_lookup_by_base_name() {
        let dir = tempdir().unwrap();
        let ledger = ImportLedger::new(dir.path().join("imported_files.txt"));

        ledger
            .record_imported(&dir.path().join("imports").join("sales_q2_2021_w.csv"))
            .unwrap();

        assert!(ledger.already_imported(Path::new("sales_q2_2021_w.csv")).unwrap());
        assert!(ledger
            .already_imported(Path::new("/somewhere/else/sales_q2_2021_w.csv"))
            .unwrap());
        assert!(!ledger.already_imported(Path::new("sales_q3_2021_w.csv")).unwrap());
    }

    #[test]
    fn test_ledger_is_append_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("imported_files.txt");
        let ledger = ImportLedger::new(&path);

        ledger.record_imported(Path::new("sales_q1_2021_w.csv")).unwrap();
        ledger.record_imported(Path::new("sales_q1_2021_w.csv")).unwrap();
        ledger.record_imported(Path::new("sales_q4_2021_e.csv")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "sales_q1_2021_w.csv\nsales_q1_2021_w.csv\nsales_q4_2021_e.csv\n"
        );
    }

    #[test]
    fn test_partial_name_does_not_match() {
        let dir = tempdir().unwrap();
        let ledger = ImportLedger::new(dir.path().join("imported_files.txt"));
        ledger.record_imported(Path::new("sales_q1_2021_w.csv")).unwrap();

        assert!(!ledger.already_imported(Path::new("q1_2021_w.csv")).unwrap());
    }
}
