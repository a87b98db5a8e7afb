// src/pager.rs
use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use std::io::Write;
use tracing::debug;

use crate::config::PagerSettings;
use crate::input::LineSource;
use crate::prompt::{Console, SEPARATOR};
use crate::table::TripTable;

/// Whether a page starting at `offset` may be shown for a table of `rows` rows.
pub fn has_next_page(offset: usize, rows: usize, settings: &PagerSettings) -> bool {
    if settings.show_partial_last_page {
        offset < rows
    } else {
        offset + settings.page_size < rows
    }
}

/// Offer to print `table` a page at a time. Returns the number of pages shown.
pub fn show_raw_data<R: LineSource, W: Write>(
    table: &TripTable,
    console: &mut Console<R, W>,
    settings: &PagerSettings,
) -> Result<usize> {
    let size = settings.page_size;
    let rows = table.num_rows();
    let mut offset = 0;
    let mut pages = 0;

    let mut wants_more = console.confirm(&format!(
        "Would you like to see {} lines of raw data? Type yes or no.",
        size
    ))?;
    while wants_more && has_next_page(offset, rows, settings) {
        let page = table.slice(offset, size);
        let rendered = pretty_format_batches(&[page]).context("rendering raw data page")?;
        writeln!(console.out(), "{}", rendered)?;
        offset += size;
        pages += 1;
        writeln!(console.out(), "{}", SEPARATOR)?;

        wants_more = console.confirm(&format!(
            "\nWould you like to see {} more rows of raw data? Please type yes or no.",
            size
        ))?;
    }
    writeln!(console.out(), "{}", SEPARATOR)?;

    debug!(pages, offset, rows, "raw data pager done");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{City, DayFilter, FilterSelection, MonthFilter};
    use crate::load::{fixtures, load_data};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn chicago() -> Result<TripTable> {
        let tmp = tempdir()?;
        fixtures::write_city_files(tmp.path());
        let sel = FilterSelection {
            city: City::Chicago,
            month: MonthFilter::All,
            day: DayFilter::All,
        };
        load_data(tmp.path(), &sel)
    }

    fn run(table: &TripTable, answers: &str, settings: PagerSettings) -> Result<(usize, String)> {
        let mut console = Console::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());
        let pages = show_raw_data(table, &mut console, &settings)?;
        let (_, out) = console.into_parts();
        Ok((pages, String::from_utf8(out)?))
    }

    #[test]
    fn test_boundary_rule() {
        let strict = PagerSettings::default();
        assert!(has_next_page(0, 8, &strict));
        assert!(!has_next_page(5, 8, &strict));
        // exactly one full page left is not shown either
        assert!(!has_next_page(5, 10, &strict));

        let partial = PagerSettings {
            show_partial_last_page: true,
            ..PagerSettings::default()
        };
        assert!(has_next_page(5, 8, &partial));
        assert!(!has_next_page(10, 8, &partial));
    }

    #[test]
    fn test_decline_shows_nothing() -> Result<()> {
        let table = chicago()?;
        let (pages, text) = run(&table, "no\n", PagerSettings::default())?;
        assert_eq!(pages, 0);
        assert!(!text.contains("Start Station"));
        Ok(())
    }

    #[test]
    fn test_strict_rule_drops_trailing_short_page() -> Result<()> {
        let table = chicago()?;
        let (pages, text) = run(&table, "yes\nyes\nyes\n", PagerSettings::default())?;
        assert_eq!(pages, 1);
        assert!(text.contains("1423854"));
        assert!(!text.contains("65924"));
        assert_eq!(text.matches("more rows of raw data").count(), 1);
        Ok(())
    }

    #[test]
    fn test_partial_pages_cover_every_row_once() -> Result<()> {
        let table = chicago()?;
        let settings = PagerSettings {
            show_partial_last_page: true,
            ..PagerSettings::default()
        };
        let (pages, text) = run(&table, "yes\nyes\nyes\n", settings)?;
        assert_eq!(pages, 2);
        // first row of page one, last row of page two
        let first = text.find("1423854").unwrap();
        let last = text.find("65924").unwrap();
        assert!(first < last);
        assert_eq!(text.matches("45207").count(), 1);
        Ok(())
    }

    #[test]
    fn test_stops_when_user_declines() -> Result<()> {
        let table = chicago()?;
        let settings = PagerSettings {
            page_size: 2,
            show_partial_last_page: false,
        };
        let (pages, text) = run(&table, "YES\nyes\nnope\nyes\n", settings)?;
        assert_eq!(pages, 2);
        assert!(text.contains("Would you like to see 2 lines of raw data?"));
        Ok(())
    }
}
