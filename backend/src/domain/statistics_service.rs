//! Per-day gap statistics assembled for display.

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use log::debug;

use crate::domain::models::DayStatisticsView;
use crate::storage::traits::{FeedingStorage, SettingsStorage};

/// Builds the trailing-window statistics view from the raw store aggregates
#[derive(Clone)]
pub struct StatisticsService {
    feeding_repository: Arc<dyn FeedingStorage>,
    settings: Arc<dyn SettingsStorage>,
}

impl StatisticsService {
    pub fn new(
        feeding_repository: Arc<dyn FeedingStorage>,
        settings: Arc<dyn SettingsStorage>,
    ) -> Self {
        Self {
            feeding_repository,
            settings,
        }
    }

    /// Gap statistics for the trailing window, newest day first.
    ///
    /// The window length comes from the live `history_length` setting. Today
    /// is excluded; days with fewer than two feedings contribute nothing. A
    /// window larger than the recorded history simply yields a shorter list.
    pub async fn day_statistics(&self) -> Result<Vec<DayStatisticsView>> {
        let history_length = self.settings.settings().history_length;
        let today = Local::now().date_naive();

        let raw = self
            .feeding_repository
            .get_day_statistics(today, history_length)
            .await?;
        debug!(
            "Loaded {} day statistic(s) over a {}-day window",
            raw.len(),
            history_length
        );

        raw.iter().map(DayStatisticsView::from_statistic).collect()
    }
}
