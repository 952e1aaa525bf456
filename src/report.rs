// 📊 Reporting - fixed-width sales table with a running total
//
// Rows with a bad amount or date get an asterisk after their index.
// Only valid amounts are summed.

use anyhow::Result;
use std::io::{self, Write};

use crate::sales::{Field, SalesRecord, BAD_MARKER};

const INDEX_W: usize = 5;
const DATE_W: usize = 15;
const QUARTER_W: usize = 15;
const REGION_W: usize = 15;
const AMOUNT_W: usize = 15;
const TOTAL_W: usize = INDEX_W + DATE_W + QUARTER_W + REGION_W + AMOUNT_W;

/// What a rendered table added up to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesSummary {
    pub count: usize,
    pub total: f64,
    pub has_bad_data: bool,
}

/// Sum of the valid amounts; bad amounts are skipped, not counted as zero
pub fn sales_total<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> f64 {
    records.into_iter().filter_map(|r| r.amount.valid()).sum()
}

/// Index column text: `3.` or `3.*` for a flagged row
pub fn index_label(index: usize, record: &SalesRecord) -> String {
    if record.has_bad_data() {
        format!("{}.*", index)
    } else {
        format!("{}.", index)
    }
}

/// Amount column text, two decimals or the bad marker
pub fn amount_label(amount: &Field<f64>) -> String {
    match amount {
        Field::Valid(value) => format!("{:.2}", value),
        Field::Invalid => BAD_MARKER.to_string(),
    }
}

/// Write the table for `records` to `out`
pub fn render_sales<W: Write>(records: &[SalesRecord], out: &mut W) -> Result<SalesSummary> {
    if records.is_empty() {
        writeln!(out, "No sales to view.\n")?;
        return Ok(SalesSummary {
            count: 0,
            total: 0.0,
            has_bad_data: false,
        });
    }

    writeln!(
        out,
        "{:INDEX_W$}{:DATE_W$}{:QUARTER_W$}{:REGION_W$}{:>AMOUNT_W$}",
        "", "Date", "Quarter", "Region", "Amount"
    )?;
    let horizontal_line = "-".repeat(TOTAL_W);
    writeln!(out, "{}", horizontal_line)?;

    let mut has_bad_data = false;
    for (idx, sales) in records.iter().enumerate() {
        has_bad_data |= sales.has_bad_data();

        writeln!(
            out,
            "{:<INDEX_W$}{:DATE_W$}{:<QUARTER_W$}{:REGION_W$}{:>AMOUNT_W$}",
            index_label(idx + 1, sales),
            sales.date_text(),
            sales.quarter(),
            sales.region,
            amount_label(&sales.amount),
        )?;
    }

    let total = sales_total(records);
    writeln!(out, "{}", horizontal_line)?;
    writeln!(
        out,
        "{:INDEX_W$}{:width$}{:>AMOUNT_W$.2}\n",
        "TOTAL",
        "",
        total,
        width = DATE_W + QUARTER_W + REGION_W
    )?;

    Ok(SalesSummary {
        count: records.len(),
        total,
        has_bad_data,
    })
}

/// Print the table to stdout and return whether any row was flagged bad
pub fn view_sales(records: &[SalesRecord]) -> Result<bool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    Ok(render_sales(records, &mut out)?.has_bad_data)
}
