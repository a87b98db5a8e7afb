// src/stats/mod.rs
use anyhow::Result;
use std::{collections::BTreeMap, io::Write, time::Instant};

use crate::prompt::SEPARATOR;

pub mod duration;
pub mod station;
pub mod time;
pub mod users;

pub use duration::trip_duration_stats;
pub use station::station_stats;
pub use time::time_stats;
pub use users::user_stats;

/// Substituted for missing categorical values before counting.
pub const NONE_SPECIFIED: &str = "None Specified";

/// Printed in place of a statistic that has no non-null input.
pub const NO_DATA: &str = "No data available.";

/// Most frequent value. Ties go to the lowest value; empty input gives `None`.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    // ascending order, and only a strictly higher count replaces the leader
    for (value, n) in value_counts(values) {
        let leads = match &best {
            Some((_, top)) => n > *top,
            None => true,
        };
        if leads {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

/// Occurrences of each distinct value, keyed in ascending order.
pub fn value_counts<T: Ord>(values: impl IntoIterator<Item = T>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Round half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Render a float the way a decimal column prints: whole values keep `.0`.
pub fn decimal(x: f64) -> String {
    format!("{:?}", x)
}

/// Print `title`, run `body`, then the elapsed time and a separator.
pub(crate) fn report_section<W: Write>(
    out: &mut W,
    title: &str,
    body: impl FnOnce(&mut W) -> Result<()>,
) -> Result<()> {
    writeln!(out, "\n{}\n", title)?;
    let start = Instant::now();
    body(out)?;
    writeln!(out, "\nThis took {} seconds.", start.elapsed().as_secs_f64())?;
    writeln!(out, "{}", SEPARATOR)?;
    Ok(())
}

/// `None` prints as the no-data notice.
pub(crate) fn or_no_data<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NO_DATA.to_string())
}
