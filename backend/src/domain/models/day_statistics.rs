//! Presentation form of the per-day gap statistics.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use crate::domain::formatting;
use shared::DayStatistic;

/// One day of feeding statistics, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DayStatisticsView {
    /// Day rendered as `15.03. 2024`
    pub date: String,
    /// Number of feedings that day, one more than the number of gaps
    pub feeding_count: i64,
    /// Mean time between consecutive feedings
    pub average_gap: NaiveTime,
    /// Longest time between consecutive feedings
    pub max_gap: NaiveTime,
}

impl DayStatisticsView {
    pub fn from_statistic(statistic: &DayStatistic) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&statistic.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid statistics date '{}'", statistic.date))?;

        Ok(Self {
            date: formatting::format_date(date),
            feeding_count: statistic.total + 1,
            average_gap: hours_to_time(statistic.average),
            max_gap: hours_to_time(statistic.maximum),
        })
    }
}

/// Convert fractional hours into a wall-clock style duration.
///
/// The minute part rounds to the nearest minute; gaps within one day stay
/// below 24 hours, so the hour part always fits.
fn hours_to_time(value: f64) -> NaiveTime {
    let mut hours = value.trunc() as u32;
    let mut minutes = ((value - value.trunc()) * 60.0).round() as u32;
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }
    NaiveTime::from_hms_opt(hours % 24, minutes, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statistic(average: f64, maximum: f64, total: i64) -> DayStatistic {
        DayStatistic {
            date: "2024-03-14".to_string(),
            average,
            maximum,
            total,
        }
    }

    #[test]
    fn test_view_from_statistic() {
        let view = DayStatisticsView::from_statistic(&statistic(3.0, 4.0, 2)).unwrap();

        assert_eq!(view.date, "14.03. 2024");
        assert_eq!(view.feeding_count, 3);
        assert_eq!(view.average_gap, NaiveTime::from_hms_opt(3, 0, 0).unwrap());
        assert_eq!(view.max_gap, NaiveTime::from_hms_opt(4, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let mut bad = statistic(1.0, 1.0, 1);
        bad.date = "14.03.2024".to_string();
        assert!(DayStatisticsView::from_statistic(&bad).is_err());
    }

    #[test]
    fn test_hours_to_time_rounds_minutes() {
        assert_eq!(hours_to_time(2.5), NaiveTime::from_hms_opt(2, 30, 0).unwrap());
        assert_eq!(hours_to_time(1.99), NaiveTime::from_hms_opt(1, 59, 0).unwrap());
        assert_eq!(hours_to_time(0.0), NaiveTime::MIN);
    }

    #[test]
    fn test_hours_to_time_carries_rounded_minutes() {
        // 59.97 minutes round up to a whole hour
        assert_eq!(hours_to_time(2.9995), NaiveTime::from_hms_opt(3, 0, 0).unwrap());
    }
}
