//! Interactive quote form using rustyline
//!
//! Each field shows its default in brackets; an empty line accepts it.
//! Invalid answers print the reason and ask again with the same bounds.

use crate::errors::{RiskError, Result};
use crate::types::features::{
    normalize_city, validate_age, validate_range, HEIGHT_RANGE, INCOME_RANGE, WEIGHT_RANGE,
};
use crate::types::{Occupation, RawUserInput};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Source of answer lines
pub trait LineReader {
    /// `Ok(None)` means the user abandoned the form (Ctrl-C / Ctrl-D)
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// rustyline-backed reader for the terminal
pub struct TerminalReader {
    editor: DefaultEditor,
}

impl TerminalReader {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(readline_error(err)),
        }
    }
}

fn readline_error(err: ReadlineError) -> RiskError {
    match err {
        ReadlineError::Io(e) => RiskError::Io(e),
        other => RiskError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}

/// The quote form; remembers the last submission as the next defaults
pub struct QuoteForm<R: LineReader> {
    reader: R,
    defaults: RawUserInput,
}

impl<R: LineReader> QuoteForm<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            defaults: RawUserInput::default(),
        }
    }

    pub fn defaults(&self) -> &RawUserInput {
        &self.defaults
    }

    /// Walk through every field. `Ok(None)` if the user bailed out.
    pub fn collect(&mut self) -> Result<Option<RawUserInput>> {
        let d = self.defaults.clone();

        println!("\n{}", "1. Health metrics".bold().cyan());
        let Some(age) = self.ask("Age", &d.age.to_string(), parse_age)? else {
            return Ok(None);
        };
        let Some(weight_kg) = self.ask("Weight (kg)", &d.weight_kg.to_string(), |s| {
            parse_bounded("weight", s, &WEIGHT_RANGE)
        })?
        else {
            return Ok(None);
        };
        let Some(height_m) = self.ask("Height (m)", &d.height_m.to_string(), |s| {
            parse_bounded("height", s, &HEIGHT_RANGE)
        })?
        else {
            return Ok(None);
        };

        println!("\n{}", "2. Lifestyle & details".bold().cyan());
        let Some(income_lpa) = self.ask("Annual income (LPA)", &d.income_lpa.to_string(), |s| {
            parse_bounded("income_lpa", s, &INCOME_RANGE)
        })?
        else {
            return Ok(None);
        };

        for (i, occupation) in Occupation::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, occupation.display_name());
        }
        let Some(occupation) = self.ask("Occupation", d.occupation.display_name(), parse_occupation_choice)?
        else {
            return Ok(None);
        };
        let Some(city) = self.ask("City", &d.city, parse_city)? else {
            return Ok(None);
        };
        let smoker_default = if d.smoker { "y" } else { "n" };
        let Some(smoker) = self.ask("Do you smoke? (y/n)", smoker_default, parse_yes_no)? else {
            return Ok(None);
        };

        let input = RawUserInput {
            age,
            weight_kg,
            height_m,
            income_lpa,
            smoker,
            city,
            occupation,
        };
        self.defaults = input.clone();
        Ok(Some(input))
    }

    /// Yes/no question; bailing out counts as "no"
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let default_text = if default { "y" } else { "n" };
        Ok(self
            .ask(question, default_text, parse_yes_no)?
            .unwrap_or(false))
    }

    fn ask<T>(
        &mut self,
        label: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        let prompt = format!("{} [{}]: ", label, default);
        loop {
            let Some(line) = self.reader.read_line(&prompt)? else {
                return Ok(None);
            };
            let answer = if line.trim().is_empty() {
                default
            } else {
                line.trim()
            };
            match parse(answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => println!("{}", e.to_string().red()),
            }
        }
    }
}

fn parse_age(s: &str) -> Result<u32> {
    let age: u32 = s
        .parse()
        .map_err(|_| RiskError::invalid_input("age", format!("'{}' is not a whole number", s)))?;
    validate_age(age)?;
    Ok(age)
}

fn parse_bounded(field: &str, s: &str, range: &std::ops::RangeInclusive<f64>) -> Result<f64> {
    let value: f64 = s
        .parse()
        .map_err(|_| RiskError::invalid_input(field, format!("'{}' is not a number", s)))?;
    validate_range(field, value, range)?;
    Ok(value)
}

/// Menu number or occupation name
fn parse_occupation_choice(s: &str) -> Result<Occupation> {
    if let Ok(index) = s.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| Occupation::ALL.get(i).copied())
            .ok_or_else(|| {
                RiskError::invalid_input(
                    "occupation",
                    format!("choose 1..={}", Occupation::ALL.len()),
                )
            });
    }
    Occupation::parse(s)
}

fn parse_city(s: &str) -> Result<String> {
    let city = normalize_city(s);
    if city.is_empty() {
        return Err(RiskError::invalid_input("city", "must not be empty"));
    }
    Ok(city)
}

fn parse_yes_no(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(RiskError::invalid_input(
            "answer",
            format!("expected y or n, got '{}'", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<&'static str>);

    impl Scripted {
        fn new(lines: &[&'static str]) -> Self {
            Self(lines.iter().copied().collect())
        }
    }

    impl LineReader for Scripted {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.0.pop_front().map(str::to_string))
        }
    }

    #[test]
    fn test_all_defaults() {
        let mut form = QuoteForm::new(Scripted::new(&["", "", "", "", "", "", ""]));
        let input = form.collect().unwrap().unwrap();
        assert_eq!(input, RawUserInput::default());
    }

    #[test]
    fn test_reprompts_out_of_range_age() {
        let mut form = QuoteForm::new(Scripted::new(&[
            "17", "101", "abc", "100", "", "", "", "", "", "",
        ]));
        let input = form.collect().unwrap().unwrap();
        assert_eq!(input.age, 100);
    }

    #[test]
    fn test_full_answers() {
        let mut form = QuoteForm::new(Scripted::new(&[
            "45",
            "92.5",
            "1.68",
            "35",
            "4",
            "  pune ",
            "yes",
        ]));
        let input = form.collect().unwrap().unwrap();
        assert_eq!(input.age, 45);
        assert_eq!(input.weight_kg, 92.5);
        assert_eq!(input.occupation, Occupation::BusinessOwner);
        assert_eq!(input.city, "Pune");
        assert!(input.smoker);
        assert_eq!(form.defaults(), &input);
    }

    #[test]
    fn test_abandon_midway() {
        let mut form = QuoteForm::new(Scripted::new(&["30", "70"]));
        assert!(form.collect().unwrap().is_none());
    }

    #[test]
    fn test_occupation_choice() {
        assert_eq!(parse_occupation_choice("1").unwrap(), Occupation::Student);
        assert_eq!(parse_occupation_choice("7").unwrap(), Occupation::Retired);
        assert!(parse_occupation_choice("0").is_err());
        assert!(parse_occupation_choice("8").is_err());
        assert_eq!(
            parse_occupation_choice("government job").unwrap(),
            Occupation::GovernmentJob
        );
    }

    #[test]
    fn test_confirm() {
        let mut form = QuoteForm::new(Scripted::new(&["maybe", "n"]));
        assert!(!form.confirm("Again?", true).unwrap());

        let mut form = QuoteForm::new(Scripted::new(&[""]));
        assert!(form.confirm("Again?", true).unwrap());

        let mut form = QuoteForm::new(Scripted::new(&[]));
        assert!(!form.confirm("Again?", true).unwrap());
    }
}
