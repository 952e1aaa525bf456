// 💾 Flat-file sales store - `amount,date,region_code`, no header, rewritten wholesale

use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};
use std::path::Path;
use tracing::info;

use crate::sales::SalesCollection;

/// Replace the store at `store_path` with every record in `sales`
pub fn save_all_sales(sales: &SalesCollection, store_path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_path(store_path)
        .with_context(|| format!("Failed to create sales store: {}", store_path.display()))?;

    for record in sales {
        writer
            .write_record([
                record.amount_text().as_str(),
                record.date_text().as_str(),
                record.region_code(),
            ])
            .with_context(|| format!("Failed to write sales store: {}", store_path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush sales store: {}", store_path.display()))?;

    info!(path = %store_path.display(), count = sales.len(), "saved sales store");
    Ok(())
}
