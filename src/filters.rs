// src/filters.rs
use std::fmt;

/// Abbreviations accepted at the month prompt. Position + 1 is the month number.
pub const MONTH_ABBREVIATIONS: [&str; 6] = ["jan", "feb", "mar", "apr", "may", "jun"];

/// Display names indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Abbreviations accepted at the day prompt, Sunday first.
pub const DAY_ABBREVIATIONS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Full day names, Sunday first. Shares its indexing with `DAY_ABBREVIATIONS`.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Keyword that disables a month or day filter.
pub const ALL: &str = "all";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lower-case name, as typed at the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// Source file for this city, relative to the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Washington's export has no gender or birth-year columns.
    pub fn has_demographics(&self) -> bool {
        !matches!(self, City::Washington)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        City::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// 1-based month number.
    Month(u32),
}

impl MonthFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s == ALL {
            return Some(MonthFilter::All);
        }
        MONTH_ABBREVIATIONS
            .iter()
            .position(|m| *m == s)
            .map(|idx| MonthFilter::Month(idx as u32 + 1))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, MonthFilter::All)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(m) => f.write_str(month_name(*m).unwrap_or("unknown")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayFilter {
    All,
    /// 0-based index into `DAY_NAMES`.
    Day(usize),
}

impl DayFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s == ALL {
            return Some(DayFilter::All);
        }
        DAY_ABBREVIATIONS
            .iter()
            .position(|d| *d == s)
            .map(DayFilter::Day)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, DayFilter::All)
    }

    /// Full day name for a concrete day filter.
    pub fn day_name(&self) -> Option<&'static str> {
        match self {
            DayFilter::All => None,
            DayFilter::Day(idx) => DAY_NAMES.get(*idx).copied(),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str(ALL),
            DayFilter::Day(_) => f.write_str(self.day_name().unwrap_or("unknown")),
        }
    }
}

/// The (city, month, day) triple chosen for one session iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city = {}, month = {}, day = {}",
            self.city, self.month, self.day
        )
    }
}

/// `month` is 1-based.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    MONTH_NAMES.get(idx).copied()
}
