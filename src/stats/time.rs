use anyhow::{anyhow, Result};
use arrow::array::{ArrayRef, StringArray, TimestampMillisecondArray, UInt32Array};
use chrono::{DateTime, Timelike, Utc};
use std::{io::Write, sync::Arc};
use tracing::instrument;

use super::{mode, or_no_data, report_section};
use crate::filters::{month_name, FilterSelection};
use crate::table::{col, TripTable};

/// Most frequent month, day and start hour. Month and day are only
/// computed when that dimension was not filtered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TravelTimes {
    pub month: Option<u32>,
    pub day: Option<String>,
    pub start_hour: Option<u32>,
}

/// Adds the `start_hour` column to `table` and returns the most frequent times.
pub fn most_frequent_times(
    table: &mut TripTable,
    selection: &FilterSelection,
) -> Result<TravelTimes> {
    let mut times = TravelTimes::default();

    if selection.month.is_all() {
        times.month = mode(table.column_as::<UInt32Array>(col::MONTH)?.iter().flatten());
    }
    if selection.day.is_all() {
        times.day = mode(table.column_as::<StringArray>(col::DAY_OF_WEEK)?.iter().flatten())
            .map(str::to_string);
    }

    let hours: UInt32Array = table
        .column_as::<TimestampMillisecondArray>(col::START_TIME)?
        .iter()
        .map(|ms| {
            ms.map(|ms| {
                DateTime::<Utc>::from_timestamp_millis(ms)
                    .map(|dt| dt.naive_utc().hour())
                    .ok_or_else(|| anyhow!("start time {} out of range", ms))
            })
            .transpose()
        })
        .collect::<Result<_>>()?;
    times.start_hour = mode(hours.iter().flatten());
    table.set_column(col::START_HOUR, Arc::new(hours) as ArrayRef)?;

    Ok(times)
}

/// Print the most frequent times of travel.
#[instrument(level = "debug", skip_all, fields(rows = table.num_rows()))]
pub fn time_stats<W: Write>(
    table: &mut TripTable,
    selection: &FilterSelection,
    out: &mut W,
) -> Result<()> {
    report_section(out, "Calculating The Most Frequent Times of Travel...", |out| {
        let times = most_frequent_times(table, selection)?;

        if selection.month.is_all() {
            let name = times.month.and_then(month_name);
            writeln!(out, "The most common month is: {}", or_no_data(name))?;
        }
        if selection.day.is_all() {
            writeln!(out, "The most common day is: {}", or_no_data(times.day))?;
        }
        writeln!(
            out,
            "The most common start hour is: {}",
            or_no_data(times.start_hour)
        )?;
        Ok(())
    })
}
