use anyhow::Result;
use arrow::array::{ArrayRef, StringArray};
use std::{io::Write, sync::Arc};
use tracing::instrument;

use super::{mode, or_no_data, report_section};
use crate::table::{col, TripTable};

/// Joins start and end station into a trip label.
pub const TRIP_ARROW: &str = " --> ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopularStations {
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub trip: Option<String>,
}

/// Adds the `Trip` column to `table` and returns the most popular stations and trip.
pub fn popular_stations(table: &mut TripTable) -> Result<PopularStations> {
    let starts = table.column_as::<StringArray>(col::START_STATION)?;
    let ends = table.column_as::<StringArray>(col::END_STATION)?;

    let start_station = mode(starts.iter().flatten()).map(str::to_string);
    let end_station = mode(ends.iter().flatten()).map(str::to_string);

    let trips: StringArray = starts
        .iter()
        .zip(ends.iter())
        .map(|pair| match pair {
            (Some(s), Some(e)) => Some(format!("{}{}{}", s, TRIP_ARROW, e)),
            _ => None,
        })
        .collect();
    let trip = mode(trips.iter().flatten()).map(str::to_string);
    table.set_column(col::TRIP, Arc::new(trips) as ArrayRef)?;

    Ok(PopularStations {
        start_station,
        end_station,
        trip,
    })
}

/// Print the most popular start station, end station and trip.
#[instrument(level = "debug", skip_all, fields(rows = table.num_rows()))]
pub fn station_stats<W: Write>(table: &mut TripTable, out: &mut W) -> Result<()> {
    report_section(out, "Calculating The Most Popular Stations and Trip...", |out| {
        let popular = popular_stations(table)?;
        writeln!(
            out,
            "The most commonly used start station is: {}",
            or_no_data(popular.start_station)
        )?;
        writeln!(
            out,
            "The most commonly used end station is: {}",
            or_no_data(popular.end_station)
        )?;
        writeln!(out, "The most common trip is: {}", or_no_data(popular.trip))?;
        Ok(())
    })
}
