use crate::filters::DAY_NAMES;
use crate::load::{date_parser, TripRow};
use crate::table::col;
use anyhow::{anyhow, Result};
use arrow::{
    array::{
        ArrayRef, Float64Builder, Int64Builder, StringBuilder, TimestampMillisecondBuilder,
        UInt32Builder,
    },
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use chrono::Datelike;
use std::sync::Arc;

/// Build the trip table from deserialized rows, deriving `month` and `day_of_week`.
///
/// `Gender` and `Birth Year` are only emitted when `with_demographics` is set.
pub fn trips_to_batch(rows: &[TripRow], with_demographics: bool) -> Result<RecordBatch> {
    let n = rows.len();
    let mut id = Int64Builder::with_capacity(n);
    let mut start = TimestampMillisecondBuilder::with_capacity(n);
    let mut end = StringBuilder::new();
    let mut duration = Float64Builder::with_capacity(n);
    let mut start_station = StringBuilder::new();
    let mut end_station = StringBuilder::new();
    let mut user_type = StringBuilder::new();
    let mut gender = StringBuilder::new();
    let mut birth_year = Float64Builder::with_capacity(n);
    let mut month = UInt32Builder::with_capacity(n);
    let mut day_of_week = StringBuilder::new();

    for (idx, row) in rows.iter().enumerate() {
        let ts = date_parser::parse_start_time(&row.start_time).ok_or_else(|| {
            anyhow!(
                "record {}: unparseable start time {:?}",
                idx,
                row.start_time
            )
        })?;

        id.append_value(row.id.unwrap_or(idx as i64));
        start.append_value(ts.and_utc().timestamp_millis());
        end.append_option(row.end_time.as_deref());
        duration.append_option(row.trip_duration);
        start_station.append_option(row.start_station.as_deref());
        end_station.append_option(row.end_station.as_deref());
        user_type.append_option(row.user_type.as_deref());
        gender.append_option(row.gender.as_deref());
        birth_year.append_option(row.birth_year);
        month.append_value(ts.month());
        day_of_week.append_value(DAY_NAMES[ts.weekday().num_days_from_sunday() as usize]);
    }

    let mut fields = vec![
        Field::new(col::ID, DataType::Int64, false),
        Field::new(
            col::START_TIME,
            DataType::Timestamp(TimeUnit::Millisecond, None),
            false,
        ),
        Field::new(col::END_TIME, DataType::Utf8, true),
        Field::new(col::TRIP_DURATION, DataType::Float64, true),
        Field::new(col::START_STATION, DataType::Utf8, true),
        Field::new(col::END_STATION, DataType::Utf8, true),
        Field::new(col::USER_TYPE, DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(id.finish()),
        Arc::new(start.finish()),
        Arc::new(end.finish()),
        Arc::new(duration.finish()),
        Arc::new(start_station.finish()),
        Arc::new(end_station.finish()),
        Arc::new(user_type.finish()),
    ];

    if with_demographics {
        fields.push(Field::new(col::GENDER, DataType::Utf8, true));
        fields.push(Field::new(col::BIRTH_YEAR, DataType::Float64, true));
        columns.push(Arc::new(gender.finish()));
        columns.push(Arc::new(birth_year.finish()));
    }

    fields.push(Field::new(col::MONTH, DataType::UInt32, false));
    fields.push(Field::new(col::DAY_OF_WEEK, DataType::Utf8, false));
    columns.push(Arc::new(month.finish()));
    columns.push(Arc::new(day_of_week.finish()));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}
