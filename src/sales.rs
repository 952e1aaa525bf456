// 📦 Sales records - data model and row coercion
//
// A field read from a file is either a typed value or explicitly Invalid.
// Nothing is ever coerced to 0 or to a magic string.

use chrono::{Datelike, NaiveDate};

use crate::region::{region_name, Region};
use crate::validators::{parse_date_string, quarter_of_month};

/// Date format shared by every storage format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Marker printed and stored in place of an invalid field
pub const BAD_MARKER: &str = "?";

// ============================================================================
// FIELD
// ============================================================================

/// A value read from untrusted text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<T> {
    Valid(T),
    Invalid,
}

impl<T> Field<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Field::Valid(_))
    }

    pub fn valid(&self) -> Option<&T> {
        match self {
            Field::Valid(value) => Some(value),
            Field::Invalid => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Valid(v),
            None => Field::Invalid,
        }
    }
}

// ============================================================================
// SALES RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub amount: Field<f64>,
    pub sales_date: Field<NaiveDate>,
    /// Full region name, or `INVALID`
    pub region: String,
}

impl SalesRecord {
    /// A fully valid record, as produced by manual entry
    pub fn new(amount: f64, sales_date: NaiveDate, region: Region) -> Self {
        SalesRecord {
            amount: Field::Valid(amount),
            sales_date: Field::Valid(sales_date),
            region: region.name().to_string(),
        }
    }

    pub fn has_bad_amount(&self) -> bool {
        !self.amount.is_valid()
    }

    pub fn has_bad_date(&self) -> bool {
        !self.sales_date.is_valid()
    }

    pub fn has_bad_data(&self) -> bool {
        self.has_bad_amount() || self.has_bad_date()
    }

    /// Quarter of the sales date, 0 when the date is bad
    pub fn quarter(&self) -> u32 {
        match self.sales_date {
            Field::Valid(date) => quarter_of_month(date.month()),
            Field::Invalid => 0,
        }
    }

    /// `YYYY-MM-DD`, or the bad marker
    pub fn date_text(&self) -> String {
        match self.sales_date {
            Field::Valid(date) => date.format(DATE_FORMAT).to_string(),
            Field::Invalid => BAD_MARKER.to_string(),
        }
    }

    /// Amount as stored in CSV, or the bad marker
    pub fn amount_text(&self) -> String {
        match self.amount {
            Field::Valid(amount) => amount.to_string(),
            Field::Invalid => BAD_MARKER.to_string(),
        }
    }

    /// Region code for the flat-file store; unknown regions are kept as `INVALID`
    pub fn region_code(&self) -> &str {
        match Region::from_name(&self.region) {
            Some(region) => region.code(),
            None => crate::region::INVALID_REGION,
        }
    }
}

// ============================================================================
// ROW COERCION
// ============================================================================

/// Parse an amount field. Anything that is not a finite, strictly positive number is Invalid.
pub fn coerce_amount(text: &str) -> Field<f64> {
    match text.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Field::Valid(amount),
        _ => Field::Invalid,
    }
}

/// Parse a `YYYY-MM-DD` date field
pub fn coerce_date(text: &str) -> Field<NaiveDate> {
    parse_date_string(text.trim()).ok().into()
}

/// Turn a raw `(amount, date)` row into a typed record.
///
/// The region comes from the import filename, never from the row. An unknown
/// code resolves to `INVALID` so the caller can report it. Never fails.
pub fn correct_data_types(amount: &str, sales_date: &str, region_code: &str) -> SalesRecord {
    SalesRecord {
        amount: coerce_amount(amount),
        sales_date: coerce_date(sales_date),
        region: region_name(region_code).to_string(),
    }
}

// ============================================================================
// SALES COLLECTION
// ============================================================================

/// Ordered, append-only list of sales for one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesCollection {
    records: Vec<SalesRecord>,
}

impl SalesCollection {
    pub fn new() -> Self {
        SalesCollection::default()
    }

    pub fn push(&mut self, record: SalesRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = SalesRecord>) {
        self.records.extend(records);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<SalesRecord>> for SalesCollection {
    fn from(records: Vec<SalesRecord>) -> Self {
        SalesCollection { records }
    }
}

impl<'a> IntoIterator for &'a SalesCollection {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_amount_and_bad_date() {
        let record = correct_data_types("abc", "2024-02-30", "w");

        assert_eq!(record.amount, Field::Invalid);
        assert_eq!(record.sales_date, Field::Invalid, "Feb 30 is invalid even in a leap year");
        assert!(record.has_bad_amount());
        assert!(record.has_bad_date());
        assert_eq!(record.region, "West");
    }

    #[test]
    fn test_fully_valid_row() {
        let record = correct_data_types("150.00", "2024-02-29", "m");

        assert_eq!(record.amount, Field::Valid(150.0));
        assert_eq!(
            record.sales_date,
            Field::Valid(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(record.region, "Mountain");
        assert!(!record.has_bad_data());
        assert_eq!(record.quarter(), 1);
    }

    #[test]
    fn test_unknown_region_code_propagates_invalid() {
        let record = correct_data_types("10", "2021-05-01", "x");
        assert_eq!(record.region, "INVALID");
        assert!(!record.has_bad_data(), "region does not count as bad data");
    }

    #[test]
    fn test_amount_coercion_edge_cases() {
        assert_eq!(coerce_amount(" 12.5 "), Field::Valid(12.5));
        assert_eq!(coerce_amount("0"), Field::Invalid);
        assert_eq!(coerce_amount("-4.00"), Field::Invalid);
        assert_eq!(coerce_amount("NaN"), Field::Invalid);
        assert_eq!(coerce_amount("inf"), Field::Invalid);
        assert_eq!(coerce_amount(""), Field::Invalid);
    }

    #[test]
    fn test_bad_date_renders_marker_and_zero_quarter() {
        let record = correct_data_types("10", "not a date", "e");
        assert_eq!(record.date_text(), "?");
        assert_eq!(record.quarter(), 0);
        assert_eq!(record.amount_text(), "10");
    }

    #[test]
    fn test_region_code_for_store() {
        let date = NaiveDate::from_ymd_opt(2022, 10, 3).unwrap();
        let record = SalesRecord::new(99.5, date, Region::Central);
        assert_eq!(record.region_code(), "c");
        assert_eq!(record.quarter(), 4);

        let unknown = correct_data_types("1", "2022-10-03", "q");
        assert_eq!(unknown.region_code(), "INVALID");
    }

    #[test]
    fn test_collection_keeps_order_and_duplicates() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut sales = SalesCollection::new();
        assert!(sales.is_empty());

        sales.push(SalesRecord::new(1.0, date, Region::West));
        sales.push(SalesRecord::new(1.0, date, Region::West));
        sales.extend(vec![SalesRecord::new(2.0, date, Region::East)]);

        assert_eq!(sales.len(), 3);
        assert_eq!(sales.records()[0], sales.records()[1]);
        assert_eq!(sales.records()[2].region, "East");
    }
}
