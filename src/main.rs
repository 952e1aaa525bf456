// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Select};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sales_keeper::sales::DATE_FORMAT;
use sales_keeper::validators::parse_date_string;
use sales_keeper::{
    load_all_sales, save_all_sales, view_sales, Command, DbSales, Importer, InputError, Prompter,
    Region, SalesConfig, SalesDb, Session,
};

#[derive(Parser)]
#[command(name = "sales-keeper", version, about = "Record, import and report regional sales")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the sales store, import ledger and database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Interactive session (default)
    Session,
    /// Show every stored sale
    View {
        /// Browse in a terminal table instead of printing
        #[arg(long)]
        tui: bool,
    },
    /// Import one file from the import directory and save
    Import { file: String },
    /// SQLite sales database
    Db {
        #[command(subcommand)]
        action: DbCommand,
    },
}

#[derive(Subcommand)]
enum DbCommand {
    /// Create tables and seed regions
    Init,
    /// List region codes and names
    Regions,
    /// Find the sale for a date and region
    Lookup {
        #[arg(long)]
        date: String,
        #[arg(long)]
        region: String,
    },
    /// Overwrite the sale with the given id
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        date: String,
        #[arg(long)]
        region: String,
    },
    /// Copy the flat-file store into the database
    Load,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(?config, "configuration loaded");

    match cli.command.unwrap_or(CliCommand::Session) {
        CliCommand::Session => run_session(&config),
        CliCommand::View { tui } => run_view(&config, tui),
        CliCommand::Import { file } => run_import(&config, &file),
        CliCommand::Db { action } => run_db(&config, action),
    }
}

fn load_config(cli: &Cli) -> Result<SalesConfig> {
    let mut config = match &cli.config {
        Some(path) => SalesConfig::load(path)?,
        None => SalesConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config = SalesConfig {
            data_dir: dir.clone(),
            import_dir: dir.clone(),
            ..config
        };
    }
    Ok(config)
}

fn run_session(config: &SalesConfig) -> Result<()> {
    println!("Sales Keeper v{} - {}", sales_keeper::VERSION, today());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut session = Session::open(config, Prompter::stdio())?;
    session.execute(Command::View)?;

    // Piped input gets the plain command loop; a terminal gets a menu
    if !io::stdin().is_terminal() {
        return session.run();
    }

    let items: Vec<&str> = Command::ALL.iter().map(|c| c.description()).collect();
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&items)
            .default(0)
            .interact()?;

        if !session.execute(Command::ALL[choice])? {
            return Ok(());
        }
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

fn run_view(config: &SalesConfig, tui: bool) -> Result<()> {
    let sales = load_all_sales(
        &config.all_sales_path(),
        config.delimiter_byte()?,
        &mut io::stdout(),
    )?;

    if tui {
        return run_tui(sales.records().to_vec());
    }

    view_sales(sales.records())?;
    Ok(())
}

#[cfg(feature = "tui")]
fn run_tui(sales: Vec<sales_keeper::SalesRecord>) -> Result<()> {
    let mut app = ui::App::new(sales);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_tui(_sales: Vec<sales_keeper::SalesRecord>) -> Result<()> {
    anyhow::bail!("TUI mode not available, rebuild with: cargo build --features tui")
}

fn run_import(config: &SalesConfig, file: &str) -> Result<()> {
    let delimiter = config.delimiter_byte()?;
    let mut sales = load_all_sales(&config.all_sales_path(), delimiter, &mut io::stdout())?;
    let importer = Importer::new(config)?;

    let stdout = io::stdout();
    let outcome = importer.import_named(file, &mut sales, &mut stdout.lock())?;
    println!("{}", outcome);

    if outcome.is_imported() {
        save_all_sales(&sales, &config.all_sales_path(), delimiter)?;
        println!(
            "All sales data has been saved to '{}'.",
            config.all_sales_path().display()
        );
    }
    Ok(())
}

fn run_db(config: &SalesConfig, action: DbCommand) -> Result<()> {
    let db = SalesDb::new(config.db_path());

    match action {
        DbCommand::Init => {
            db.setup()?;
            println!("✓ Database initialized: {}", db.path().display());
        }
        DbCommand::Regions => {
            for region in db.retrieve_regions()? {
                println!("{:5}{}", region.code, region.name);
            }
        }
        DbCommand::Lookup { date, region } => {
            let sales_date = parse_date_string(&date)?;
            let region = parse_region(&region)?;
            match db.retrieve_sales_by_date_region(sales_date, region.code())? {
                Some(sales) => println!(
                    "{:5}{:15}{:15}{:>15.2}",
                    sales.id,
                    sales.sales_date.to_string(),
                    region.name(),
                    sales.amount
                ),
                None => println!("No sales found for {} in {}.", date, region.name()),
            }
        }
        DbCommand::Update {
            id,
            amount,
            date,
            region,
        } => {
            if !(amount.is_finite() && amount > 0.0) {
                return Err(InputError::AmountNotPositive.into());
            }
            let sales = DbSales {
                id,
                amount,
                sales_date: parse_date_string(&date)?,
                region: parse_region(&region)?.code().to_string(),
            };
            match db.update_sales(&sales)? {
                0 => println!("No sales with id {}.", id),
                _ => println!("✓ Sales {} updated.", id),
            }
        }
        DbCommand::Load => {
            db.setup()?;
            let sales = load_all_sales(
                &config.all_sales_path(),
                config.delimiter_byte()?,
                &mut io::stdout(),
            )?;
            let (inserted, skipped) = db.load_collection(&sales)?;
            println!("✓ Inserted: {} sales", inserted);
            println!("✓ Skipped bad records: {}", skipped);
        }
    }

    Ok(())
}

fn parse_region(code: &str) -> Result<Region> {
    Region::from_code(code)
        .with_context(|| format!("Region must be one of the following: {}.", Region::codes_display()))
}
