//! Line-oriented prompts for the interactive menu
//!
//! Every typed prompt repeats until the answer is valid. End of input is
//! reported as [`PromptError::Closed`] so the menu can end the session.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{date, parse_date, parse_yes_no, ExpenseId, Money, MoneyParseError};

/// Why a prompt could not produce an answer
#[derive(Debug, Error)]
pub enum PromptError {
    /// Standard input reached end of file
    #[error("input closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Reads answers from `input` and writes prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for everything that is not a prompt
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print a line
    pub fn say(&mut self, text: impl AsRef<str>) -> PromptResult<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    /// Print a prompt and read one trimmed line
    pub fn line(&mut self, prompt: &str) -> PromptResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(buffer.trim().to_string())
    }

    /// Read a line that must not be empty
    pub fn required(&mut self, prompt: &str) -> PromptResult<String> {
        loop {
            let answer = self.line(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say("Error: This field cannot be empty.")?;
        }
    }

    /// Read a positive amount like `12.50` or `$12.50`
    pub fn amount(&mut self, prompt: &str) -> PromptResult<Money> {
        loop {
            let answer = self.line(prompt)?;
            if let Some(amount) = self.check_amount(&answer)? {
                return Ok(amount);
            }
        }
    }

    /// Read an amount; an empty answer means none
    pub fn optional_amount(&mut self, prompt: &str) -> PromptResult<Option<Money>> {
        loop {
            let answer = self.line(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(amount) = self.check_amount(&answer)? {
                return Ok(Some(amount));
            }
        }
    }

    /// Read a `YYYY-MM-DD` date
    pub fn date(&mut self, prompt: &str) -> PromptResult<NaiveDate> {
        loop {
            let answer = self.line(prompt)?;
            if let Some(date) = self.check_date(&answer)? {
                return Ok(date);
            }
        }
    }

    /// Read a date; an empty answer means today
    pub fn date_or_today(&mut self, prompt: &str) -> PromptResult<NaiveDate> {
        Ok(self.optional_date(prompt)?.unwrap_or_else(date::today))
    }

    /// Read a date; an empty answer means none
    pub fn optional_date(&mut self, prompt: &str) -> PromptResult<Option<NaiveDate>> {
        loop {
            let answer = self.line(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(date) = self.check_date(&answer)? {
                return Ok(Some(date));
            }
        }
    }

    /// Read a yes/no answer
    pub fn yes_no(&mut self, prompt: &str) -> PromptResult<bool> {
        loop {
            match self.optional_yes_no(prompt)? {
                Some(answer) => return Ok(answer),
                None => self.say("Error: Please answer y or n.")?,
            }
        }
    }

    /// Read a yes/no answer; an empty answer means none
    pub fn optional_yes_no(&mut self, prompt: &str) -> PromptResult<Option<bool>> {
        loop {
            let answer = self.line(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match parse_yes_no(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("Error: Please answer y or n.")?,
            }
        }
    }

    /// Read a whole number in `min..=max`
    pub fn choice(&mut self, prompt: &str, min: u32, max: u32) -> PromptResult<u32> {
        loop {
            let answer = self.line(prompt)?;
            match answer.parse::<u32>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                Ok(_) => self.say(format!(
                    "Error: Please enter a number between {} and {}.",
                    min, max
                ))?,
                Err(_) => self.say("Error: Please enter a valid number.")?,
            }
        }
    }

    /// Read an expense id, with or without a leading '#'
    pub fn id(&mut self, prompt: &str) -> PromptResult<ExpenseId> {
        loop {
            let answer = self.line(prompt)?;
            match answer.parse::<ExpenseId>() {
                Ok(id) if id.value() > 0 => return Ok(id),
                _ => self.say("Error: Please enter a valid expense ID.")?,
            }
        }
    }

    fn check_amount(&mut self, answer: &str) -> PromptResult<Option<Money>> {
        match Money::parse(answer) {
            Ok(amount) if amount.is_positive() => Ok(Some(amount)),
            Err(e @ MoneyParseError::TooLarge(_)) => {
                self.say(format!("Error: {}.", e))?;
                Ok(None)
            }
            _ => {
                self.say("Error: Invalid amount. Enter a positive number like 10.50.")?;
                Ok(None)
            }
        }
    }

    fn check_date(&mut self, answer: &str) -> PromptResult<Option<NaiveDate>> {
        match parse_date(answer) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                self.say(format!("Error: {}", e))?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn written(prompter: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.output.clone()).unwrap()
    }

    #[test]
    fn test_line_trims_and_reports_eof() {
        let mut p = prompter("  hello  \n");
        assert_eq!(p.line("> ").unwrap(), "hello");
        assert!(matches!(p.line("> "), Err(PromptError::Closed)));
    }

    #[test]
    fn test_required_repeats_on_empty() {
        let mut p = prompter("\n   \nLunch\n");
        assert_eq!(p.required("Description: ").unwrap(), "Lunch");
        assert_eq!(
            written(&p).matches("Error: This field cannot be empty.").count(),
            2
        );
    }

    #[test]
    fn test_amount_repeats_until_valid() {
        let mut p = prompter("abc\n0\n-5\n$12.5\n");
        assert_eq!(p.amount("Amount: ").unwrap(), Money::from_cents(1250));
        assert_eq!(written(&p).matches("Error: Invalid amount").count(), 3);
    }

    #[test]
    fn test_amount_above_maximum_is_refused() {
        let mut p = prompter("50000000000000000
999999999.99
");
        assert_eq!(p.amount("Amount: ").unwrap(), Money::MAX);
        assert!(written(&p).contains("Error: Amount '50000000000000000' exceeds the maximum of 999999999.99."));
    }

    #[test]
    fn test_optional_values() {
        let mut p = prompter("\n2024-02-30\n2024-02-29\n\n");
        assert_eq!(p.optional_amount("Min: ").unwrap(), None);
        assert_eq!(
            p.optional_date("Start: ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(written(&p).contains("Error: "));
        assert_eq!(p.optional_yes_no("Recurring: ").unwrap(), None);
    }

    #[test]
    fn test_choice_bounds() {
        let mut p = prompter("17\nseven\n7\n");
        assert_eq!(p.choice("Choice: ", 0, 16).unwrap(), 7);
        let output = written(&p);
        assert!(output.contains("between 0 and 16"));
        assert!(output.contains("Please enter a valid number."));
    }

    #[test]
    fn test_id_and_yes_no() {
        let mut p = prompter("0\n#12\nmaybe\nY\n");
        assert_eq!(p.id("ID: ").unwrap(), ExpenseId::new(12));
        assert!(p.yes_no("Sure? ").unwrap());
    }
}
