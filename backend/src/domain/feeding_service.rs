//! Feeding service domain logic for the feeding tracker.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use log::error;
use tokio::sync::watch;

use crate::domain::models::LastFeedingModel;
use crate::storage::traits::{FeedingStorage, SettingsStorage};
use shared::{additions, breast, Feeding};

/// High-level operations on the feeding history
#[derive(Clone)]
pub struct FeedingService {
    feeding_repository: Arc<dyn FeedingStorage>,
    settings: Arc<dyn SettingsStorage>,
}

impl FeedingService {
    pub fn new(
        feeding_repository: Arc<dyn FeedingStorage>,
        settings: Arc<dyn SettingsStorage>,
    ) -> Self {
        Self {
            feeding_repository,
            settings,
        }
    }

    /// Record a feeding.
    ///
    /// The write happens in the background: the call returns immediately and
    /// a storage failure is logged, never surfaced to the caller.
    pub fn record_feeding(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        left: bool,
        right: bool,
        vigantol: bool,
        espumisan: bool,
        probiotics: bool,
    ) {
        let feeding = Feeding::new(
            date,
            time,
            compose_breast_flags(left, right),
            compose_addition_flags(vigantol, espumisan, probiotics),
        );

        let repository = self.feeding_repository.clone();
        tokio::spawn(async move {
            if let Err(e) = repository.insert(&feeding).await {
                error!("Failed to store feeding: {:#}", e);
            }
        });
    }

    /// Today's feedings, newest first
    pub async fn feedings_for_today(&self) -> Result<Vec<Feeding>> {
        self.feeding_repository
            .get_by_date(Local::now().date_naive())
            .await
    }

    /// The most recent feeding together with the predicted next one
    pub async fn last_feeding(&self) -> Result<LastFeedingModel> {
        let last = self.feeding_repository.get_last_feeding().await?;
        let interval = self.settings.settings().next_feeding_hour;
        Ok(LastFeedingModel::from_store(last, interval))
    }

    /// Observe the data-version counter of the underlying store
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.feeding_repository.subscribe_changes()
    }
}

fn compose_breast_flags(left: bool, right: bool) -> i32 {
    let mut mask = 0;
    if left {
        mask |= breast::LEFT;
    }
    if right {
        mask |= breast::RIGHT;
    }
    mask
}

fn compose_addition_flags(vigantol: bool, espumisan: bool, probiotics: bool) -> i32 {
    let mut mask = 0;
    if vigantol {
        mask |= additions::VIGANTOL;
    }
    if espumisan {
        mask |= additions::ESPUMISAN;
    }
    if probiotics {
        mask |= additions::PROBIOTICS;
    }
    mask
}
