// src/session.rs
use anyhow::Result;
use std::io::Write;
use tracing::info;

use crate::config::Settings;
use crate::input::LineSource;
use crate::load::load_data;
use crate::pager::show_raw_data;
use crate::prompt::{get_filters, Console};
use crate::stats::{station_stats, time_stats, trip_duration_stats, user_stats};

/// How a session iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    /// Reports were printed; the user may restart.
    Completed,
    /// Input ended, or Ctrl-C was pressed, at a prompt.
    Aborted,
}

/// Drives collect → load → report → page, and the restart loop.
pub struct Session<R, W> {
    console: Console<R, W>,
    settings: Settings,
}

impl<R: LineSource, W: Write> Session<R, W> {
    pub fn new(console: Console<R, W>, settings: Settings) -> Self {
        Self { console, settings }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// One pass through prompts, reports and pager.
    pub fn run_once(&mut self) -> Result<Iteration> {
        let Some(selection) = get_filters(&mut self.console)? else {
            writeln!(self.console.out(), "No input taken. Exiting program...")?;
            return Ok(Iteration::Aborted);
        };

        let mut table = load_data(&self.settings.data_dir, &selection)?;

        let out = self.console.out();
        time_stats(&mut table, &selection, out)?;
        station_stats(&mut table, out)?;
        trip_duration_stats(&table, out)?;
        user_stats(&mut table, out)?;

        show_raw_data(&table, &mut self.console, &self.settings.pager)?;
        if self.console.is_closed() {
            writeln!(self.console.out(), "No input taken. Exiting program...")?;
            return Ok(Iteration::Aborted);
        }
        Ok(Iteration::Completed)
    }

    /// Repeat until the user declines to restart or input ends.
    pub fn run(&mut self) -> Result<()> {
        let mut iterations = 0usize;
        loop {
            iterations += 1;
            if self.run_once()? == Iteration::Aborted {
                info!(iterations, "session aborted");
                break;
            }
            if !self
                .console
                .confirm("\nWould you like to restart? Enter yes or no.")?
            {
                break;
            }
        }
        info!(iterations, "session finished");
        Ok(())
    }
}
