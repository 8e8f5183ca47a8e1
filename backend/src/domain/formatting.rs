//! Human-facing date and time rendering.

use chrono::{NaiveDate, NaiveTime};
use std::fmt::Write;

pub const DATE_DISPLAY_FORMAT: &str = "%d.%m. %Y";
pub const TIME_DISPLAY_FORMAT: &str = "%H:%M";

/// Placeholder shown when a value cannot be rendered.
pub const UNKNOWN_TEXT: &str = "<Unknown>";

/// Render a date as `15.03. 2024`; degrades to the placeholder instead of
/// panicking when the formatter reports an error.
pub fn format_date(date: NaiveDate) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(DATE_DISPLAY_FORMAT)) {
        Ok(()) => out,
        Err(_) => UNKNOWN_TEXT.to_string(),
    }
}

/// Render a time as `21:05`, with the same degrade behavior as
/// [`format_date`].
pub fn format_time(time: NaiveTime) -> String {
    let mut out = String::new();
    match write!(out, "{}", time.format(TIME_DISPLAY_FORMAT)) {
        Ok(()) => out,
        Err(_) => UNKNOWN_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "05.03. 2024");
    }

    #[test]
    fn test_format_time_drops_seconds() {
        let time = NaiveTime::from_hms_opt(21, 5, 33).unwrap();
        assert_eq!(format_time(time), "21:05");
    }
}
