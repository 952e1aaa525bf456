// Sales Keeper - Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod db;
pub mod error;
pub mod filename;
pub mod import;
pub mod ledger;
pub mod prompt;
pub mod region;
pub mod report;
pub mod sales;
pub mod session;
pub mod store;
pub mod validators;

// Re-export commonly used types
pub use config::SalesConfig;
pub use db::{DbRegion, DbSales, SalesDb};
pub use error::InputError;
pub use filename::{NamingConvention, NAMING_CONVENTION};
pub use import::{import_from_file, load_all_sales, ImportOutcome, Importer};
pub use ledger::ImportLedger;
pub use prompt::Prompter;
pub use region::{region_name, Region, INVALID_REGION};
pub use report::{render_sales, view_sales, SalesSummary};
pub use sales::{correct_data_types, Field, SalesCollection, SalesRecord};
pub use session::{Command, Session};
pub use store::save_all_sales;
pub use validators::{
    is_leap_year, is_valid_date_string, is_valid_region_code, max_day_of_month,
    quarter_of_month,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
