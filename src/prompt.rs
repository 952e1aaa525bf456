// ⌨️ Console input - prompt, validate, re-prompt
//
// On a terminal, prompts go through dialoguer. Otherwise lines are read from the
// reader, so piped input and scripted tests share one code path.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use crate::error::InputError;
use crate::region::Region;
use crate::validators::{max_day_of_month, parse_date_string, MAX_YEAR, MIN_YEAR};

/// Width prompts are padded to, so answers line up
const PROMPT_W: usize = 20;

pub struct Prompter<R, W> {
    input: R,
    output: W,
    terminal: bool,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process's stdin/stdout; uses dialoguer when stdin is a terminal
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let terminal = stdin.is_terminal();
        Prompter {
            input: stdin.lock(),
            output: io::stdout(),
            terminal,
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Line-based prompter over any reader and writer
    pub fn new(input: R, output: W) -> Self {
        Prompter {
            input,
            output,
            terminal: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Show `prompt` and read one trimmed line. End of input is an error.
    pub fn input_line(&mut self, prompt: &str) -> Result<String> {
        if self.terminal {
            let entry: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(dialog_prompt(prompt))
                .allow_empty(true)
                .interact_text()?;
            return Ok(entry.trim().to_string());
        }

        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            bail!("input closed");
        }
        Ok(line.trim().to_string())
    }

    /// Keep asking until `parse` accepts the answer, showing each rejection
    pub fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T> {
        if self.terminal {
            // dialoguer re-prompts with the validator's message until it passes
            let entry: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(dialog_prompt(prompt))
                .validate_with(|entry: &String| parse(entry.trim()).map(|_| ()))
                .interact_text()?;
            return Ok(parse(entry.trim())?);
        }

        let prompt = format!("{:PROMPT_W$}", prompt);
        loop {
            let entry = self.input_line(&prompt)?;
            match parse(&entry) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    /// A sales amount greater than zero
    pub fn input_amount(&mut self) -> Result<f64> {
        self.ask("Amount:", parse_amount)
    }

    /// An integer in `low..=high`
    pub fn input_int(&mut self, entry_item: &str, high: i64, low: i64) -> Result<i64> {
        let item = capitalize(entry_item);
        let prompt = format!("{} ({}-{}):", item, low, high);
        self.ask(&prompt, |entry| parse_int_in_range(entry, &item, low, high))
    }

    pub fn input_year(&mut self) -> Result<i32> {
        let year = self.input_int("year", MAX_YEAR as i64, MIN_YEAR as i64)?;
        Ok(year as i32)
    }

    pub fn input_month(&mut self) -> Result<u32> {
        let month = self.input_int("month", 12, 1)?;
        Ok(month as u32)
    }

    /// A day that exists in the given month
    pub fn input_day(&mut self, year: i32, month: u32) -> Result<u32> {
        let max_day = max_day_of_month(year, month);
        let day = self.input_int("day", max_day as i64, 1)?;
        Ok(day as u32)
    }

    pub fn input_region_code(&mut self) -> Result<Region> {
        let prompt = format!("Region {}:", Region::codes_display());
        self.ask(&prompt, parse_region_code)
    }

    /// A full `yyyy-mm-dd` date in the accepted year range
    pub fn input_date(&mut self) -> Result<NaiveDate> {
        self.ask("Date (yyyy-mm-dd):", parse_date_string)
    }
}

// ============================================================================
// PARSERS
// ============================================================================

pub fn parse_amount(entry: &str) -> Result<f64, InputError> {
    let amount: f64 = entry
        .parse()
        .ok()
        .filter(|a: &f64| a.is_finite())
        .ok_or_else(|| InputError::NotANumber(entry.to_string()))?;
    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(InputError::AmountNotPositive)
    }
}

pub fn parse_int_in_range(entry: &str, item: &str, low: i64, high: i64) -> Result<i64, InputError> {
    let value: i64 = entry
        .parse()
        .map_err(|_| InputError::NotANumber(entry.to_string()))?;
    if (low..=high).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::OutOfRange {
            item: item.to_string(),
            low,
            high,
        })
    }
}

pub fn parse_region_code(entry: &str) -> Result<Region, InputError> {
    Region::from_code(entry).ok_or_else(|| InputError::InvalidRegion(Region::codes_display()))
}

/// dialoguer's theme adds its own separator after the prompt
fn dialog_prompt(prompt: &str) -> &str {
    prompt.trim_end().trim_end_matches(':')
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
