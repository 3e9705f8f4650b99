//! Local-date helpers for mapping plan day offsets onto calendar dates.
//!
//! All arithmetic uses local calendar fields, never UTC: formatting
//! through UTC can land on the previous or next day depending on the
//! machine's timezone offset.

use chrono::{Days, Local, NaiveDate};

/// Format a date as zero-padded `YYYY-MM-DD`.
pub fn format_date_local(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// Tolerant by policy: if any component is missing or non-numeric, or
/// the components don't form a real date, this falls back to today
/// instead of failing.
pub fn parse_local_date(ymd: &str) -> NaiveDate {
    let mut parts = ymd.splitn(3, '-');
    let year = parts.next().and_then(|p| p.parse::<i32>().ok());
    let month = parts.next().and_then(|p| p.parse::<u32>().ok());
    let day = parts.next().and_then(|p| p.parse::<u32>().ok());

    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(today),
        _ => today(),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Date for the plan day at `day_index`, counting calendar days from
/// `start_date` with month/year rollover. 0-based: day 1 of the plan is
/// offset 0 and lands on the start date itself.
pub fn day_to_date(start_date: &str, day_index: u64) -> String {
    let start = parse_local_date(start_date);
    let date = start.checked_add_days(Days::new(day_index)).unwrap_or(start);
    format_date_local(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_to_date_rolls_over_month() {
        assert_eq!(day_to_date("2024-01-31", 0), "2024-01-31");
        assert_eq!(day_to_date("2024-01-31", 1), "2024-02-01");
    }

    #[test]
    fn test_day_to_date_rolls_over_year() {
        assert_eq!(day_to_date("2024-12-31", 1), "2025-01-01");
    }

    #[test]
    fn test_day_to_date_handles_leap_day() {
        assert_eq!(day_to_date("2024-02-28", 1), "2024-02-29");
        assert_eq!(day_to_date("2023-02-28", 1), "2023-03-01");
    }

    #[test]
    fn test_format_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date_local(date), "2024-03-05");
    }

    #[test]
    fn test_parse_format_roundtrip() {
        for ymd in ["2024-01-01", "2024-02-29", "1999-12-31"] {
            assert_eq!(format_date_local(parse_local_date(ymd)), ymd);
        }
    }

    #[test]
    fn test_parse_accepts_unpadded_components() {
        assert_eq!(format_date_local(parse_local_date("2024-3-5")), "2024-03-05");
    }

    #[test]
    fn test_parse_falls_back_to_today() {
        // Bracket "today" to stay correct across a midnight boundary.
        for bad in ["", "not-a-date", "2024-xx-01", "2024-02", "2024-02-31"] {
            let before = Local::now().date_naive();
            let parsed = parse_local_date(bad);
            let after = Local::now().date_naive();
            assert!(parsed == before || parsed == after, "input {:?} gave {}", bad, parsed);
        }
    }
}
