use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::region::Region;
use crate::sales::{SalesCollection, DATE_FORMAT};

/// Row of the `Sales` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbSales {
    pub id: i64,
    pub amount: f64,
    pub sales_date: NaiveDate,
    /// Region code, as stored
    pub region: String,
}

/// Row of the `Region` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbRegion {
    pub code: String,
    pub name: String,
}

/// SQLite access. Every call opens its own connection and drops it when done.
pub struct SalesDb {
    path: PathBuf,
}

impl SalesDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SalesDb { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path)
            .with_context(|| format!("SQLite connection error: {}", self.path.display()))
    }

    /// Create the tables and seed the region table
    pub fn setup(&self) -> Result<()> {
        let conn = self.connect()?;
        setup_database(&conn)
    }

    /// First sale on `sales_date` in `region_code`, if any
    pub fn retrieve_sales_by_date_region(
        &self,
        sales_date: NaiveDate,
        region_code: &str,
    ) -> Result<Option<DbSales>> {
        let conn = self.connect()?;
        let date_str = sales_date.format(DATE_FORMAT).to_string();

        let row = conn
            .query_row(
                "SELECT id, amount, salesDate, region
                 FROM Sales
                 WHERE salesDate = ?1 AND region = ?2
                 ORDER BY id",
                params![date_str, region_code],
                |row| {
                    let id: i64 = row.get(0)?;
                    let amount: f64 = row.get(1)?;
                    let date_str: String = row.get(2)?;
                    let region: String = row.get(3)?;
                    Ok((id, amount, date_str, region))
                },
            )
            .optional()
            .context("Error retrieving sales by date and region")?;

        match row {
            Some((id, amount, date_str, region)) => Ok(Some(DbSales {
                id,
                amount,
                sales_date: parse_db_date(&date_str)?,
                region,
            })),
            None => Ok(None),
        }
    }

    /// Overwrite amount, date and region of the row with `sales.id`.
    ///
    /// Returns the number of rows changed (0 when the id does not exist).
    pub fn update_sales(&self, sales: &DbSales) -> Result<usize> {
        let conn = self.connect()?;
        let changed = conn
            .execute(
                "UPDATE Sales
                 SET amount = ?1, salesDate = ?2, region = ?3
                 WHERE id = ?4",
                params![
                    sales.amount,
                    sales.sales_date.format(DATE_FORMAT).to_string(),
                    sales.region,
                    sales.id,
                ],
            )
            .context("Error updating sales record")?;

        debug!(id = sales.id, changed, "updated sales row");
        Ok(changed)
    }

    /// Every region code and name
    pub fn retrieve_regions(&self) -> Result<Vec<DbRegion>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT regionCode, regionName FROM Region")
            .context("Error retrieving regions")?;

        let regions = stmt
            .query_map([], |row| {
                Ok(DbRegion {
                    code: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Error retrieving regions")?;

        Ok(regions)
    }

    /// Insert one sale and return its id
    pub fn insert_sales(&self, amount: f64, sales_date: NaiveDate, region_code: &str) -> Result<i64> {
        let conn = self.connect()?;
        insert_sales(&conn, amount, sales_date, region_code)
    }

    /// Copy every valid record of a collection into the `Sales` table.
    ///
    /// Records with a bad field or unknown region are skipped. Returns (inserted, skipped).
    pub fn load_collection(&self, sales: &SalesCollection) -> Result<(usize, usize)> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let mut inserted = 0;
        let mut skipped = 0;
        for record in sales {
            match (record.amount.valid(), record.sales_date.valid(), Region::from_name(&record.region)) {
                (Some(amount), Some(date), Some(region)) => {
                    insert_sales(&tx, *amount, *date, region.code())?;
                    inserted += 1;
                }
                _ => skipped += 1,
            }
        }

        tx.commit()?;
        Ok((inserted, skipped))
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Region (
            regionCode TEXT PRIMARY KEY,
            regionName TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Sales (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL,
            salesDate TEXT NOT NULL,
            region TEXT NOT NULL REFERENCES Region(regionCode)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sales_date_region ON Sales(salesDate, region)",
        [],
    )?;

    for region in Region::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO Region (regionCode, regionName) VALUES (?1, ?2)",
            params![region.code(), region.name()],
        )?;
    }

    Ok(())
}

pub fn insert_sales(conn: &Connection, amount: f64, sales_date: NaiveDate, region_code: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO Sales (amount, salesDate, region) VALUES (?1, ?2, ?3)",
        params![amount, sales_date.format(DATE_FORMAT).to_string(), region_code],
    )
    .context("Error inserting sales record")?;

    Ok(conn.last_insert_rowid())
}

fn parse_db_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .with_context(|| format!("Invalid salesDate in database: {}", text))
}
