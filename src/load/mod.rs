// src/load/mod.rs
use anyhow::{Context, Result};
use arrow::array::{BooleanArray, StringArray, UInt32Array};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, info, instrument};

use crate::filters::{DayFilter, FilterSelection, MonthFilter};
use crate::table::{col, TripTable};

pub mod convert;
pub mod date_parser;

/// One CSV record as exported by the bike-share operators.
///
/// The first column has an empty header and holds the exporter's row index.
/// Washington files stop after `User Type`.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRow {
    #[serde(rename = "", alias = "Unnamed: 0", default)]
    pub id: Option<i64>,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time", default)]
    pub end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    pub trip_duration: Option<f64>,
    #[serde(rename = "Start Station", default)]
    pub start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    pub end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,
}

/// Deserialize every record of a city export.
pub fn read_trips<R: Read>(reader: R) -> Result<Vec<TripRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let row: TripRow = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load the selected city's trips from `data_dir` and apply the month/day filters.
#[instrument(level = "info", skip(data_dir), fields(city = %selection.city))]
pub fn load_data(data_dir: &Path, selection: &FilterSelection) -> Result<TripTable> {
    let path = data_dir.join(selection.city.file_name());
    let file =
        File::open(&path).with_context(|| format!("Failed to open city data: {:?}", path))?;
    let rows = read_trips(file).with_context(|| format!("Failed to read {:?}", path))?;
    debug!(rows = rows.len(), path = %path.display(), "read city export");

    let batch = convert::trips_to_batch(&rows, selection.city.has_demographics())
        .with_context(|| format!("Failed to build trip table from {:?}", path))?;
    let table = apply_filters(
        TripTable::new(selection.city, batch),
        selection.month,
        selection.day,
    )?;

    info!(
        total = rows.len(),
        kept = table.num_rows(),
        month = %selection.month,
        day = %selection.day,
        "loaded trips"
    );
    Ok(table)
}

/// Keep only the rows matching `month` and `day`. `All` leaves that dimension untouched.
pub fn apply_filters(table: TripTable, month: MonthFilter, day: DayFilter) -> Result<TripTable> {
    let mut table = table;

    if let MonthFilter::Month(m) = month {
        let mask: BooleanArray = table
            .column_as::<UInt32Array>(col::MONTH)?
            .iter()
            .map(|v| Some(v == Some(m)))
            .collect();
        table = table.filter(&mask)?;
    }

    if let Some(name) = day.day_name() {
        let mask: BooleanArray = table
            .column_as::<StringArray>(col::DAY_OF_WEEK)?
            .iter()
            .map(|v| Some(v == Some(name)))
            .collect();
        table = table.filter(&mask)?;
    }

    Ok(table)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::{fs, path::Path};

    pub const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-01-01 09:07:57,2017-01-01 09:20:53,776,Canal St & Adams St,Clinton St & Madison St,Subscriber,Male,1984.0
955915,2017-01-01 09:15:00,2017-01-01 09:25:00,600,Canal St & Adams St,Clinton St & Madison St,Subscriber,Female,1990.0
9031,2017-01-02 17:30:00,2017-01-02 17:50:00,1200,Clinton St & Madison St,Canal St & Adams St,Customer,,
304487,2017-01-02 17:45:00,2017-01-02 17:50:00,300,Canal St & Adams St,Michigan Ave & Oak St,Subscriber,Male,1984.0
45207,2017-02-06 08:00:00,2017-02-06 08:15:00,900,Michigan Ave & Oak St,Canal St & Adams St,Subscriber,Male,1975.0
1473887,2017-02-06 17:05:00,2017-02-06 17:12:30,450,Canal St & Adams St,Clinton St & Madison St,,Female,1990.0
961916,2017-03-05 17:10:00,2017-03-05 17:35:00,1500,Michigan Ave & Oak St,Clinton St & Madison St,Customer,,
65924,2017-01-03 17:00:00,2017-01-03 17:06:00,360,Canal St & Adams St,Clinton St & Madison St,Subscriber,Male,1984.0
";

    pub const NEW_YORK_CITY_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
5688089,2017-06-11 14:55:05,2017-06-11 15:08:21,795,Suffolk St & Stanton St,W Broadway & Spring St,Subscriber,Male,1998.0
4096714,2017-05-11 15:30:11,2017-05-11 15:41:43,692,Lexington Ave & E 63 St,1 Ave & E 78 St,Subscriber,Male,1981.0
";

    pub const WASHINGTON_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Subscriber
1330770,2017-05-30 01:02:59,2017-05-30 01:13:37,637.251,14th & Belmont St NW,15th & K St NW,
";

    /// Write all three city exports into `dir`.
    pub fn write_city_files(dir: &Path) {
        fs::write(dir.join("chicago.csv"), CHICAGO_CSV).unwrap();
        fs::write(dir.join("new_york_city.csv"), NEW_YORK_CITY_CSV).unwrap();
        fs::write(dir.join("washington.csv"), WASHINGTON_CSV).unwrap();
    }
}
