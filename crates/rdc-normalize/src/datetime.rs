//! Permissive date/time parsing.
//!
//! Source dates arrive in whatever shape the upstream system typed them:
//! ISO dates, slash-separated dates, and free-form dates with a spelled-out
//! month in any position (`1968 October 16`, `January 2001 25`). Every
//! format is tried in a fixed order and the first match wins.
//!
//! Ambiguous numeric dates read month first (`01/02/2020` is 2 January);
//! day-first forms only match when the month-first reading is impossible
//! (`25/12/2020`). Values carrying a UTC offset are converted to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m.%d.%Y",
    "%d.%m.%Y",
    // Spelled-out months, in every position seen upstream.
    "%Y %B %d",
    "%Y %b %d",
    "%B %Y %d",
    "%b %Y %d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%Y-%b-%d",
];

/// Parse a date or date/time string into a timestamp.
///
/// Date-only input lands at midnight. Returns `None` when no format
/// matches; the caller decides what a failure means.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    try_parse_zoned(value)
        .or_else(|| try_parse_datetime(value))
        .or_else(|| try_parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn try_parse_zoned(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| {
            ZONED_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        })
        .map(|dt| dt.naive_utc())
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_iso_and_slash_dates() {
        assert_eq!(parse_timestamp("2020-01-01"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_timestamp("2005/07/26"), Some(ymd(2005, 7, 26)));
        assert_eq!(parse_timestamp(" 1990-12-03 "), Some(ymd(1990, 12, 3)));
    }

    #[test]
    fn parses_month_names_in_any_position() {
        assert_eq!(parse_timestamp("1968 October 16"), Some(ymd(1968, 10, 16)));
        assert_eq!(parse_timestamp("January 2001 25"), Some(ymd(2001, 1, 25)));
        assert_eq!(parse_timestamp("16 October 1968"), Some(ymd(1968, 10, 16)));
        assert_eq!(parse_timestamp("October 16, 1968"), Some(ymd(1968, 10, 16)));
        assert_eq!(parse_timestamp("Oct 16 1968"), Some(ymd(1968, 10, 16)));
    }

    #[test]
    fn parses_time_component() {
        let ts = parse_timestamp("2015-11-25 09:39:26").unwrap();
        assert_eq!(ts.format("%H:%M:%S").to_string(), "09:39:26");
    }

    #[test]
    fn ambiguous_slash_dates_read_month_first() {
        assert_eq!(parse_timestamp("01/02/2020"), Some(ymd(2020, 1, 2)));
        assert_eq!(parse_timestamp("12/25/2020"), Some(ymd(2020, 12, 25)));
        assert_eq!(parse_timestamp("25/12/2020"), Some(ymd(2020, 12, 25)));
        assert_eq!(parse_timestamp("01-02-2020"), Some(ymd(2020, 1, 2)));
    }

    #[test]
    fn parses_us_datetimes() {
        let ts = parse_timestamp("12/25/2020 10:00").unwrap();
        assert_eq!(ts.to_string(), "2020-12-25 10:00:00");
        let ts = parse_timestamp("12/25/2020 10:00:30").unwrap();
        assert_eq!(ts.to_string(), "2020-12-25 10:00:30");
        let ts = parse_timestamp("25/12/2020 10:00").unwrap();
        assert_eq!(ts.to_string(), "2020-12-25 10:00:00");
    }

    #[test]
    fn zoned_values_convert_to_utc() {
        let ts = parse_timestamp("2015-11-25T09:39:26Z").unwrap();
        assert_eq!(ts.to_string(), "2015-11-25 09:39:26");
        let ts = parse_timestamp("2015-11-25T09:39:26+02:00").unwrap();
        assert_eq!(ts.to_string(), "2015-11-25 07:39:26");
        let ts = parse_timestamp("2015-11-25 09:39:26+0100").unwrap();
        assert_eq!(ts.to_string(), "2015-11-25 08:39:26");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("NULL"), None);
        assert_eq!(parse_timestamp("GFWJLFXZBP"), None);
        assert_eq!(parse_timestamp("2020-13-45"), None);
    }
}
