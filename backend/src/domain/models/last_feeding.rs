//! Next-feeding prediction model.

use chrono::{Duration, Local, NaiveDateTime};

use crate::domain::formatting;
use shared::Feeding;

/// Pure view of the most recent feeding and the predicted next one.
///
/// The prediction is computed once at construction time from the stored
/// record and the configured interval; the model performs no I/O of its own.
#[derive(Debug, Clone)]
pub struct LastFeedingModel {
    feeding: Feeding,
    next_feeding_at: NaiveDateTime,
    empty: bool,
}

impl LastFeedingModel {
    pub fn new(feeding: Feeding, next_feeding_hours: i64) -> Self {
        Self::build(feeding, next_feeding_hours, false)
    }

    /// Sentinel for an empty store.
    ///
    /// Carries the current instant so the formatted accessors stay usable
    /// while `is_empty()` tells observers there is no real record behind it.
    pub fn empty(next_feeding_hours: i64) -> Self {
        let now = Local::now().naive_local();
        Self::build(
            Feeding::new(now.date(), now.time(), 0, 0),
            next_feeding_hours,
            true,
        )
    }

    pub fn from_store(last: Option<Feeding>, next_feeding_hours: i64) -> Self {
        match last {
            Some(feeding) => Self::new(feeding, next_feeding_hours),
            None => Self::empty(next_feeding_hours),
        }
    }

    fn build(feeding: Feeding, next_feeding_hours: i64, empty: bool) -> Self {
        let next_feeding_at = NaiveDateTime::new(feeding.date, feeding.timestamp)
            + Duration::hours(next_feeding_hours);
        Self {
            feeding,
            next_feeding_at,
            empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn feeding(&self) -> &Feeding {
        &self.feeding
    }

    /// Predicted instant of the next feeding
    pub fn next_feeding_at(&self) -> NaiveDateTime {
        self.next_feeding_at
    }

    /// True when the predicted next feeding falls on a later calendar day
    pub fn is_next_feeding_tomorrow(&self) -> bool {
        self.next_feeding_at.date() > self.feeding.date
    }

    /// Feeding date as `15.03. 2024`
    pub fn date_text(&self) -> String {
        formatting::format_date(self.feeding.date)
    }

    /// Feeding time as `21:05`
    pub fn time_text(&self) -> String {
        formatting::format_time(self.feeding.timestamp)
    }

    /// Predicted next feeding time as `23:05`
    pub fn next_time_text(&self) -> String {
        formatting::format_time(self.next_feeding_at.time())
    }

    pub fn fed_left(&self) -> bool {
        self.feeding.fed_left()
    }

    pub fn fed_right(&self) -> bool {
        self.feeding.fed_right()
    }

    pub fn has_vigantol(&self) -> bool {
        self.feeding.has_vigantol()
    }

    pub fn has_espumisan(&self) -> bool {
        self.feeding.has_espumisan()
    }

    pub fn has_probiotics(&self) -> bool {
        self.feeding.has_probiotics()
    }
}
