// 📥 Import pipeline - region files and the bulk sales store
//
// Two storage formats:
// - import files: `amount,date`, region taken from the file name
// - the all-sales store: `amount,date,region_code`

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::SalesConfig;
use crate::filename::NamingConvention;
use crate::ledger::ImportLedger;
use crate::prompt::Prompter;
use crate::region::{region_name, Region, INVALID_REGION};
use crate::report::render_sales;
use crate::sales::{coerce_amount, coerce_date, correct_data_types, SalesCollection, SalesRecord};

// ============================================================================
// IMPORT FROM FILE
// ============================================================================

/// Read every `amount,date` row of an import file.
///
/// Rows are never rejected here: bad fields become `Field::Invalid` and the
/// region is whatever the file name says (`INVALID` if it says nothing usable).
/// A field that is not valid UTF-8 is a bad field too.
/// Failing to open or read the file is an error.
pub fn import_from_file(
    file_path: &Path,
    naming: &NamingConvention,
    delimiter: u8,
) -> Result<Vec<SalesRecord>> {
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let region_code = naming
        .get_region_code(filename)
        .unwrap_or_else(|| INVALID_REGION.to_string());

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_path(file_path)
        .with_context(|| format!("Failed to open import file: {}", file_path.display()))?;

    let mut imported = Vec::new();
    for (line_num, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to read line {} of {}", line_num + 1, file_path.display())
        })?;

        let amount = field_text(&record, 0);
        let sales_date = field_text(&record, 1);
        imported.push(correct_data_types(amount, sales_date, &region_code));
    }

    debug!(file = filename, rows = imported.len(), "parsed import file");
    Ok(imported)
}

/// Field `index` as text; missing or non-UTF-8 fields read as empty and coerce to bad
fn field_text(record: &ByteRecord, index: usize) -> &str {
    record
        .get(index)
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .unwrap_or("")
}

// ============================================================================
// BULK LOAD
// ============================================================================

/// Load the all-sales store. Rows with fewer than three fields are skipped and
/// reported on `out`.
pub fn load_all_sales<W: Write>(
    store_path: &Path,
    delimiter: u8,
    out: &mut W,
) -> Result<SalesCollection> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_path(store_path)
        .with_context(|| format!("Failed to open sales store: {}", store_path.display()))?;

    let mut sales = SalesCollection::new();
    for (line_num, result) in reader.byte_records().enumerate() {
        let row = result.with_context(|| {
            format!("Failed to read line {} of {}", line_num + 1, store_path.display())
        })?;

        match store_row_to_record(&row) {
            Some(record) => sales.push(record),
            None => {
                let fields: Vec<String> = row
                    .iter()
                    .map(|f| String::from_utf8_lossy(f).into_owned())
                    .collect();
                warn!(line = line_num + 1, ?fields, "skipping incomplete row");
                writeln!(out, "Skipping incomplete row: {:?}", fields)?;
            }
        }
    }

    info!(path = %store_path.display(), count = sales.len(), "loaded sales store");
    Ok(sales)
}

fn store_row_to_record(row: &ByteRecord) -> Option<SalesRecord> {
    if row.len() < 3 {
        return None;
    }
    Some(SalesRecord {
        amount: coerce_amount(field_text(row, 0)),
        sales_date: coerce_date(field_text(row, 1)),
        region: region_name(field_text(row, 2)).to_string(),
    })
}

// ============================================================================
// GATED IMPORT
// ============================================================================

/// How a gated import ended. Only I/O failures are errors; these are all normal outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    InvalidFilename { filename: String, convention: String },
    InvalidRegion { filename: String },
    AlreadyImported { filename: String },
    BadData { filename: String },
    Empty { filename: String },
    Imported { filename: String, count: usize },
}

impl ImportOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportOutcome::InvalidFilename { filename, convention } => write!(
                f,
                "Filename '{}' doesn't follow the expected format of '{}'.",
                filename, convention
            ),
            ImportOutcome::InvalidRegion { filename } => write!(
                f,
                "Filename '{}' doesn't include one of the following region codes: {}.",
                filename,
                Region::codes_display()
            ),
            ImportOutcome::AlreadyImported { filename } => {
                write!(f, "File '{}' has already been imported.", filename)
            }
            ImportOutcome::BadData { filename } => write!(
                f,
                "File '{}' contains bad data.\nPlease correct the data in the file and try again.",
                filename
            ),
            ImportOutcome::Empty { filename } => {
                write!(f, "File '{}' contains no sales.", filename)
            }
            ImportOutcome::Imported { .. } => write!(f, "Imported sales added to list."),
        }
    }
}

/// Runs the import gates against one configuration
pub struct Importer<'a> {
    config: &'a SalesConfig,
    naming: NamingConvention,
    ledger: ImportLedger,
    delimiter: u8,
}

impl<'a> Importer<'a> {
    pub fn new(config: &'a SalesConfig) -> Result<Self> {
        Ok(Importer {
            config,
            naming: config.naming()?,
            ledger: ImportLedger::new(config.ledger_path()),
            delimiter: config.delimiter_byte()?,
        })
    }

    pub fn ledger(&self) -> &ImportLedger {
        &self.ledger
    }

    /// Import `filename` from the import directory into `sales`.
    ///
    /// # Gates, in order:
    /// 1. file name follows the naming convention
    /// 2. embedded region code is one of the four regions
    /// 3. file is not in the import ledger
    /// 4. every row is clean (the batch is shown; any bad row rejects all of it)
    /// 5. a clean, non-empty batch is appended and the file recorded
    pub fn import_named<W: Write>(
        &self,
        filename: &str,
        sales: &mut SalesCollection,
        out: &mut W,
    ) -> Result<ImportOutcome> {
        let filename = filename.trim().to_string();
        let file_path = self.config.import_path(&filename);

        if !self.naming.is_valid_filename_format(&filename) {
            return Ok(ImportOutcome::InvalidFilename {
                filename,
                convention: self.naming.template().to_string(),
            });
        }

        let region_ok = self
            .naming
            .get_region_code(&filename)
            .is_some_and(|code| Region::from_code(&code).is_some());
        if !region_ok {
            return Ok(ImportOutcome::InvalidRegion { filename });
        }

        if self.ledger.already_imported(&file_path)? {
            return Ok(ImportOutcome::AlreadyImported { filename });
        }

        let imported = import_from_file(&file_path, &self.naming, self.delimiter)?;
        let summary = render_sales(&imported, out)?;

        if summary.has_bad_data {
            warn!(file = %filename, "rejected import with bad data");
            return Ok(ImportOutcome::BadData { filename });
        }
        if imported.is_empty() {
            return Ok(ImportOutcome::Empty { filename });
        }

        // Ledger first: a batch is only merged once its file is recorded
        self.ledger.record_imported(&file_path)?;
        let count = imported.len();
        sales.extend(imported);
        info!(file = %filename, count, "imported sales");

        Ok(ImportOutcome::Imported { filename, count })
    }

    /// Ask for a file name, then run `import_named` and print the outcome
    pub fn import_interactive<R: BufRead, W: Write>(
        &self,
        sales: &mut SalesCollection,
        prompter: &mut Prompter<R, W>,
    ) -> Result<ImportOutcome> {
        let filename = prompter.input_line("Enter name of file to import: ")?;
        let outcome = self.import_named(&filename, sales, prompter.output())?;
        writeln!(prompter.output(), "{}", outcome)?;
        if outcome.is_imported() {
            writeln!(prompter.output())?;
        }
        Ok(outcome)
    }
}

// ============================================================================
// TESTS
// ============================================================================
