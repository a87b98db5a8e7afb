use anyhow::Result;
use arrow::array::Float64Array;
use std::io::Write;
use tracing::instrument;

use super::{decimal, report_section, round2};
use crate::table::{col, TripTable};

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationSummary {
    /// Sum of all durations, in days, rounded to 2 places.
    pub total_days: f64,
    /// Mean duration in minutes, rounded to 2 places. `None` without any durations.
    pub average_minutes: Option<f64>,
}

/// Aggregate trip durations (seconds), skipping nulls.
pub fn summarize_durations(durations: &Float64Array) -> DurationSummary {
    let (sum, n) = durations
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), secs| (sum + secs, n + 1));

    DurationSummary {
        total_days: round2(sum / SECONDS_PER_DAY),
        average_minutes: (n > 0).then(|| round2(sum / n as f64 / SECONDS_PER_MINUTE)),
    }
}

/// Print total and average trip duration.
#[instrument(level = "debug", skip_all, fields(rows = table.num_rows()))]
pub fn trip_duration_stats<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    report_section(out, "Calculating Trip Duration...", |out| {
        let summary = summarize_durations(table.column_as::<Float64Array>(col::TRIP_DURATION)?);
        writeln!(
            out,
            "The total time traveled in the selected period is {} days.",
            decimal(summary.total_days)
        )?;
        match summary.average_minutes {
            Some(avg) => writeln!(
                out,
                "The average time traveled in the selected period is {} minutes.",
                decimal(avg)
            )?,
            None => writeln!(out, "No trips in the selected period to average.")?,
        }
        Ok(())
    })
}
