use chrono::NaiveDateTime;

/// Layouts seen in the city exports, most common first.
const FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a trip start time such as `"2017-01-01 09:07:57"` (no timezone).
pub fn parse_start_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
