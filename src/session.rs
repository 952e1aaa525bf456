// 🧾 Interactive session - load, edit, import, save
//
// The session owns the in-memory collection for one run. Commands come from the
// caller (a menu in the binary, a script in tests).

use anyhow::Result;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::error;

use crate::config::SalesConfig;
use crate::import::{load_all_sales, ImportOutcome, Importer};
use crate::prompt::Prompter;
use crate::report::render_sales;
use crate::sales::{SalesCollection, SalesRecord};
use crate::store::save_all_sales;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    View,
    /// Amount, then year / month / day separately, then region
    AddByParts,
    /// Amount, then a full date, then region
    AddByDate,
    Import,
    Save,
    Exit,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::View,
        Command::AddByParts,
        Command::AddByDate,
        Command::Import,
        Command::Save,
        Command::Exit,
    ];

    pub fn name(&self) -> &str {
        match self {
            Command::View => "view",
            Command::AddByParts => "add1",
            Command::AddByDate => "add2",
            Command::Import => "import",
            Command::Save => "save",
            Command::Exit => "exit",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Command::View => "View all sales",
            Command::AddByParts => "Add sales (amount, year, month, day)",
            Command::AddByDate => "Add sales (amount, date)",
            Command::Import => "Import sales from file",
            Command::Save => "Save all sales",
            Command::Exit => "Save and exit",
        }
    }

    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim().to_lowercase();
        Command::ALL.into_iter().find(|c| c.name() == text)
    }
}

pub struct Session<'a, R, W> {
    config: &'a SalesConfig,
    importer: Importer<'a>,
    sales: SalesCollection,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Start a session from the sales store on disk
    pub fn open(config: &'a SalesConfig, mut prompter: Prompter<R, W>) -> Result<Self> {
        let sales = load_all_sales(
            &config.all_sales_path(),
            config.delimiter_byte()?,
            prompter.output(),
        )?;
        Session::with_sales(config, sales, prompter)
    }

    pub fn with_sales(
        config: &'a SalesConfig,
        sales: SalesCollection,
        prompter: Prompter<R, W>,
    ) -> Result<Self> {
        Ok(Session {
            config,
            importer: Importer::new(config)?,
            sales,
            prompter,
        })
    }

    pub fn sales(&self) -> &SalesCollection {
        &self.sales
    }

    pub fn prompter(&mut self) -> &mut Prompter<R, W> {
        &mut self.prompter
    }

    pub fn into_parts(self) -> (SalesCollection, Prompter<R, W>) {
        (self.sales, self.prompter)
    }

    /// Run one command. Returns false once the session is over.
    ///
    /// A failing import is reported and the session carries on; other errors propagate.
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::View => {
                render_sales(self.sales.records(), self.prompter.output())?;
            }
            Command::AddByParts => self.add_by_parts()?,
            Command::AddByDate => self.add_by_date()?,
            Command::Import => {
                if let Err(e) = self.import() {
                    error!("import failed: {:#}", e);
                    writeln!(self.prompter.output(), "Fail to import sales: {:#}", e)?;
                }
            }
            Command::Save => self.save()?,
            Command::Exit => {
                self.save()?;
                writeln!(self.prompter.output(), "Bye!")?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Read command names until `exit` or end of input
    pub fn run(&mut self) -> Result<()> {
        let names: Vec<&str> = Command::ALL.iter().map(|c| c.name()).collect();
        let prompt = format!("Command ({}): ", names.join(", "));
        loop {
            let entry = self.prompter.input_line(&prompt)?;
            match Command::parse(&entry) {
                Some(command) => {
                    if !self.execute(command)? {
                        return Ok(());
                    }
                }
                None => writeln!(self.prompter.output(), "Unknown command '{}'.", entry)?,
            }
        }
    }

    fn add_by_parts(&mut self) -> Result<()> {
        let amount = self.prompter.input_amount()?;
        let year = self.prompter.input_year()?;
        let month = self.prompter.input_month()?;
        let day = self.prompter.input_day(year, month)?;
        let region = self.prompter.input_region_code()?;

        // Prompts already bound every part to a real calendar day
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            anyhow::bail!("{}-{:02}-{:02} is not a calendar date", year, month, day);
        };
        self.add(SalesRecord::new(amount, date, region))
    }

    fn add_by_date(&mut self) -> Result<()> {
        let amount = self.prompter.input_amount()?;
        let date = self.prompter.input_date()?;
        let region = self.prompter.input_region_code()?;
        self.add(SalesRecord::new(amount, date, region))
    }

    fn add(&mut self, record: SalesRecord) -> Result<()> {
        let date = record.date_text();
        self.sales.push(record);
        writeln!(self.prompter.output(), "Sales for {} is added.", date)?;
        Ok(())
    }

    fn import(&mut self) -> Result<ImportOutcome> {
        self.importer
            .import_interactive(&mut self.sales, &mut self.prompter)
    }

    fn save(&mut self) -> Result<()> {
        let path = self.config.all_sales_path();
        save_all_sales(&self.sales, &path, self.config.delimiter_byte()?)?;
        writeln!(
            self.prompter.output(),
            "All sales data has been saved to '{}'.",
            path.display()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::Field;
    use std::fs;
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    type Scripted = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

    fn setup(store: &str) -> (TempDir, SalesConfig) {
        let dir = tempdir().unwrap();
        let config = SalesConfig::in_dir(dir.path());
        fs::write(config.all_sales_path(), store).unwrap();
        (dir, config)
    }

    fn scripted(input: &str) -> Scripted {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(session: Session<'_, Cursor<Vec<u8>>, Vec<u8>>) -> (SalesCollection, String) {
        let (sales, prompter) = session.into_parts();
        (sales, String::from_utf8(prompter.into_output()).unwrap())
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::parse("ADD1"), Some(Command::AddByParts));
        assert_eq!(Command::parse(" import "), Some(Command::Import));
        assert_eq!(Command::parse("quit"), None);
    }

    #[test]
    fn test_add_by_parts() {
        let (_dir, config) = setup("");
        let mut session = Session::open(&config, scripted("125.5\n2024\n2\n30\n29\nw\n")).unwrap();

        assert!(session.execute(Command::AddByParts).unwrap());

        let (sales, shown) = output(session);
        assert_eq!(sales.len(), 1);
        assert_eq!(sales.records()[0].date_text(), "2024-02-29");
        assert_eq!(sales.records()[0].region, "West");
        assert!(shown.contains("Day must be between 1 and 29."));
        assert!(shown.contains("Sales for 2024-02-29 is added."));
    }

    #[test]
    fn test_add_by_date() {
        let (_dir, config) = setup("10,2021-01-01,e\n");
        let mut session = Session::open(&config, scripted("99\n2021-13-01\n2021-12-01\nc\n")).unwrap();

        session.execute(Command::AddByDate).unwrap();

        let (sales, shown) = output(session);
        assert_eq!(sales.len(), 2);
        assert_eq!(sales.records()[1].amount, Field::Valid(99.0));
        assert_eq!(sales.records()[1].region, "Central");
        assert!(shown.contains("2021-13-01 is not in a valid date format."));
    }

    #[test]
    fn test_failed_import_keeps_session_alive() {
        let (_dir, config) = setup("");
        let mut session = Session::open(&config, scripted("sales_q1_2021_w.csv\n")).unwrap();

        assert!(session.execute(Command::Import).unwrap());

        let (sales, shown) = output(session);
        assert!(sales.is_empty());
        assert!(shown.contains("Fail to import sales"), "{}", shown);
    }

    #[test]
    fn test_run_until_exit_saves() {
        let (dir, config) = setup("100,2021-01-01,w\n");
        fs::write(dir.path().join("sales_q2_2021_m.csv"), "50,2021-04-04\n").unwrap();

        let script = "view\nbogus\nimport\nsales_q2_2021_m.csv\nexit\n";
        let mut session = Session::open(&config, scripted(script)).unwrap();
        session.run().unwrap();

        let (sales, shown) = output(session);
        assert_eq!(sales.len(), 2);
        assert!(shown.contains("Unknown command 'bogus'."));
        assert!(shown.contains("Imported sales added to list."));
        assert!(shown.contains("Bye!"));
        assert_eq!(
            fs::read_to_string(config.all_sales_path()).unwrap(),
            "100,2021-01-01,w\n50,2021-04-04,m\n"
        );
    }

    #[test]
    fn test_run_stops_on_closed_input() {
        let (_dir, config) = setup("");
        let mut session = Session::open(&config, scripted("view\n")).unwrap();
        assert!(session.run().is_err());
    }

    #[test]
    fn test_open_without_store_fails() {
        let dir = tempdir().unwrap();
        let config = SalesConfig::in_dir(dir.path());
        assert!(Session::open(&config, scripted("")).is_err());
    }
}
