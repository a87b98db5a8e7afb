use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use std::{collections::BTreeMap, io::Write, sync::Arc};
use tracing::{debug, instrument};

use super::{mode, or_no_data, report_section, value_counts, NONE_SPECIFIED};
use crate::table::{col, TripTable};

/// Earliest, most recent and most common birth year, truncated to whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BirthYears {
    pub earliest: Option<i64>,
    pub most_recent: Option<i64>,
    pub most_common: Option<i64>,
}

/// Replace nulls in string column `name` with `None Specified`.
pub fn fill_missing(table: &mut TripTable, name: &str) -> Result<()> {
    let filled: StringArray = table
        .column_as::<StringArray>(name)?
        .iter()
        .map(|v| Some(v.unwrap_or(NONE_SPECIFIED)))
        .collect();
    table.set_column(name, Arc::new(filled) as ArrayRef)
}

/// Rows per distinct value of string column `name`, with nulls counted as `None Specified`.
pub fn count_by(table: &mut TripTable, name: &str) -> Result<BTreeMap<String, usize>> {
    fill_missing(table, name)?;
    let counts = value_counts(
        table
            .column_as::<StringArray>(name)?
            .iter()
            .flatten()
            .map(str::to_string),
    );
    Ok(counts)
}

pub fn birth_years(years: &Float64Array) -> BirthYears {
    let whole: Vec<i64> = years.iter().flatten().map(|y| y as i64).collect();
    BirthYears {
        earliest: whole.iter().min().copied(),
        most_recent: whole.iter().max().copied(),
        most_common: mode(whole),
    }
}

const LABEL_WIDTH: usize = 20;

/// One `label  count` line per entry. The label column widens to fit the longest label.
fn write_counts<W: Write>(
    out: &mut W,
    heading: &str,
    counts: &BTreeMap<String, usize>,
) -> Result<()> {
    writeln!(out, "{}", heading)?;
    let width = counts
        .keys()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .max(LABEL_WIDTH);
    for (label, n) in counts {
        writeln!(out, "{:<width$} {:>8}", label, n, width = width)?;
    }
    Ok(())
}

/// Print user-type counts, and gender and birth-year stats where the city records them.
#[instrument(level = "debug", skip_all, fields(city = %table.city(), rows = table.num_rows()))]
pub fn user_stats<W: Write>(table: &mut TripTable, out: &mut W) -> Result<()> {
    report_section(out, "Calculating User Stats...", |out| {
        let by_type = count_by(table, col::USER_TYPE)?;
        write_counts(out, "Breakdown of user numbers by type:\n", &by_type)?;

        if !table.city().has_demographics() {
            debug!("city has no demographic columns");
            writeln!(
                out,
                "\nNo data on user gender and birth year available for this city.\n"
            )?;
            return Ok(());
        }

        let by_gender = count_by(table, col::GENDER)?;
        write_counts(out, "\nBreakdown of user numbers by gender:\n", &by_gender)?;

        let years = birth_years(table.column_as::<Float64Array>(col::BIRTH_YEAR)?);
        writeln!(out, "\nBreakdown of user age:\n")?;
        writeln!(
            out,
            "The earliest year of birth is {}.",
            or_no_data(years.earliest)
        )?;
        writeln!(
            out,
            "The most recent year of birth is {}.",
            or_no_data(years.most_recent)
        )?;
        writeln!(
            out,
            "The most common year of birth is {}.",
            or_no_data(years.most_common)
        )?;
        Ok(())
    })
}
