//! Calendar date -> ledger day resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default date layout of ledger rows: day/month/year.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// How a calendar date maps onto the integer day axis used for matching.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBasis {
    /// Zero-based day of the date's own year (resets every January 1).
    ///
    /// Durations are only meaningful when acquisition and disposal fall in
    /// the same calendar year.
    #[default]
    YearRelative,
    /// Days since 0001-01-01, comparable across years.
    Absolute,
}

impl DayBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayBasis::YearRelative => "year_relative",
            DayBasis::Absolute => "absolute",
        }
    }
}

impl fmt::Display for DayBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year_relative" | "year-relative" | "year" => Ok(DayBasis::YearRelative),
            "absolute" | "abs" => Ok(DayBasis::Absolute),
            other => Err(format!(
                "invalid day basis '{other}'. expected one of: year_relative | absolute"
            )),
        }
    }
}

/// Resolve `date` to a day number on the given basis.
pub fn resolve_day(date: NaiveDate, basis: DayBasis) -> i64 {
    match basis {
        DayBasis::YearRelative => i64::from(date.ordinal0()),
        DayBasis::Absolute => i64::from(date.num_days_from_ce()),
    }
}

/// Parse a date with `format`, tolerating surrounding whitespace and a
/// leading UTF-8 BOM.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim().trim_start_matches('\u{feff}');
    NaiveDate::parse_from_str(raw, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn year_relative_is_zero_based() {
        assert_eq!(resolve_day(d(2024, 1, 1), DayBasis::YearRelative), 0);
        assert_eq!(resolve_day(d(2023, 2, 1), DayBasis::YearRelative), 31);
        assert_eq!(resolve_day(d(2023, 12, 31), DayBasis::YearRelative), 364);
        // leap year
        assert_eq!(resolve_day(d(2024, 12, 31), DayBasis::YearRelative), 365);
    }

    #[test]
    fn absolute_days_cross_year_boundaries() {
        let dec = resolve_day(d(2023, 12, 31), DayBasis::Absolute);
        let jan = resolve_day(d(2024, 1, 1), DayBasis::Absolute);
        assert_eq!(jan - dec, 1);
    }

    #[test]
    fn parses_unpadded_day_month_year() {
        assert_eq!(parse_date("5/3/2024", DEFAULT_DATE_FORMAT), Some(d(2024, 3, 5)));
        assert_eq!(parse_date(" 05/03/2024 ", DEFAULT_DATE_FORMAT), Some(d(2024, 3, 5)));
        assert_eq!(parse_date("\u{feff}1/1/2024", DEFAULT_DATE_FORMAT), Some(d(2024, 1, 1)));
        assert_eq!(parse_date("2024-03-05", "%Y-%m-%d"), Some(d(2024, 3, 5)));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_date("date", DEFAULT_DATE_FORMAT), None);
        assert_eq!(parse_date("", DEFAULT_DATE_FORMAT), None);
        assert_eq!(parse_date("31/2/2024", DEFAULT_DATE_FORMAT), None);
    }

    #[test]
    fn day_basis_parses_aliases() {
        assert_eq!("absolute".parse::<DayBasis>(), Ok(DayBasis::Absolute));
        assert_eq!("YEAR_RELATIVE".parse::<DayBasis>(), Ok(DayBasis::YearRelative));
        assert!("weekly".parse::<DayBasis>().is_err());
    }
}
