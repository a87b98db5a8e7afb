// src/prompt.rs
use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::{debug, info};

use crate::filters::{City, DayFilter, FilterSelection, MonthFilter};
use crate::input::LineSource;

/// Printed between report sections.
pub const SEPARATOR: &str = "----------------------------------------";

/// Result of a single prompt attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome<T> {
    Valid(T),
    /// The raw (lower-cased, trimmed) input that failed validation.
    Invalid(String),
    /// Input ended, or Ctrl-C was pressed, before an answer was given.
    Aborted,
}

/// Line-oriented terminal: answers come from `input`, everything else goes to `out`.
/// Once input has closed or been interrupted, every later prompt is aborted too.
pub struct Console<R, W> {
    input: R,
    out: W,
    closed: bool,
}

impl<R: LineSource, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.out)
    }

    /// Print `question` and read one line. `None` means end of input or Ctrl-C.
    pub fn read_answer(&mut self, question: &str) -> Result<Option<String>> {
        if self.closed {
            return Ok(None);
        }
        writeln!(self.out, "{}", question)?;
        self.out.flush()?;

        match self.input.next_line() {
            Ok(Some(line)) => Ok(Some(line.trim().to_lowercase())),
            Ok(None) => {
                debug!(question, "input closed");
                self.closed = true;
                Ok(None)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                info!(question, "prompt interrupted");
                self.closed = true;
                writeln!(self.out)?;
                Ok(None)
            }
            Err(e) => Err(e).context("reading answer from stdin"),
        }
    }

    /// One attempt at `question`, validated by `parse`.
    pub fn ask_once<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<PromptOutcome<T>> {
        Ok(match self.read_answer(question)? {
            None => PromptOutcome::Aborted,
            Some(answer) => match parse(&answer) {
                Some(v) => PromptOutcome::Valid(v),
                None => PromptOutcome::Invalid(answer),
            },
        })
    }

    /// Re-ask until `parse` accepts the answer. `None` if input ended first.
    pub fn ask<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let outcome = self.ask_once(question, &parse)?;
            writeln!(self.out)?;
            match outcome {
                PromptOutcome::Valid(v) => return Ok(Some(v)),
                PromptOutcome::Aborted => return Ok(None),
                PromptOutcome::Invalid(raw) => {
                    writeln!(self.out, "{} is not a valid input! Please try again.", raw)?;
                }
            }
        }
    }

    /// Yes/no question. Only "yes" counts as yes; end of input or Ctrl-C counts as no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(matches!(self.read_answer(question)?.as_deref(), Some("yes")))
    }
}

/// Ask for city, month and day in turn. `None` if the user ended input at any prompt.
pub fn get_filters<R: LineSource, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Option<FilterSelection>> {
    writeln!(console.out(), "Hello! Let's explore some US bikeshare data!")?;

    let Some(city) = console.ask(
        "Please enter the city you would like to investigate: \n\
         Choose between Chicago, New York City, and Washington.",
        City::from_str,
    )?
    else {
        return Ok(None);
    };
    writeln!(console.out(), "Selecting data for {}", city.title())?;
    writeln!(console.out(), "{}", SEPARATOR)?;

    let Some(month) = console.ask(
        "Which month would you like to investigate?\n\
         Type Jan, Feb, Mar, Apr, May or Jun to select a month \n\
         or type \"all\" to select all months.",
        MonthFilter::from_str,
    )?
    else {
        return Ok(None);
    };
    writeln!(console.out(), "{}", SEPARATOR)?;

    let Some(day) = console.ask(
        "Which day would you like to investigate?\n\
         Type Mon, Tue, Wed, Thu, Fri, Sat or Sun to select a day \n\
         or type \"all\" to select all days.",
        DayFilter::from_str,
    )?
    else {
        return Ok(None);
    };

    let selection = FilterSelection { city, month, day };
    writeln!(console.out(), "Selected filters: {}", selection)?;
    writeln!(console.out(), "{}", SEPARATOR)?;
    debug!(%selection, "filters collected");
    Ok(Some(selection))
}
