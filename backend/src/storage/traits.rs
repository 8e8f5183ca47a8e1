//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{AppSettings, DayStatistic, Feeding};
use tokio::sync::watch;

/// Trait defining the interface for feeding storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work with different storage backends
/// without modification.
#[async_trait]
pub trait FeedingStorage: Send + Sync {
    /// Store a feeding; a record with a known id replaces the stored one
    async fn insert(&self, feeding: &Feeding) -> Result<()>;

    /// Store a batch of feedings in a single transaction
    async fn insert_many(&self, feedings: &[Feeding]) -> Result<()>;

    /// Retrieve every stored feeding
    async fn get_all(&self) -> Result<Vec<Feeding>>;

    /// Retrieve the feedings of one calendar day, newest first
    async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<Feeding>>;

    /// Retrieve the most recent feeding overall
    async fn get_last_feeding(&self) -> Result<Option<Feeding>>;

    /// Per-day gap aggregates for days strictly before `before`,
    /// newest day first, at most `limit` days
    async fn get_day_statistics(&self, before: NaiveDate, limit: i64) -> Result<Vec<DayStatistic>>;

    /// Number of stored feedings
    async fn count(&self) -> Result<i64>;

    /// Data-version counter bumped after every successful mutation
    fn subscribe_changes(&self) -> watch::Receiver<u64>;
}

/// Trait defining the interface for settings storage operations
///
/// Reads are served from an in-memory snapshot and never fail; any fault
/// while loading the backing file degrades to the defaults.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Current settings snapshot
    fn settings(&self) -> AppSettings;

    /// Continuous observation: yields the current value immediately and
    /// every subsequent change
    fn subscribe(&self) -> watch::Receiver<AppSettings>;

    /// Persist a new prediction interval in whole hours
    async fn set_next_feeding_hour(&self, hours: i64) -> Result<()>;

    /// Persist the reminder style toggle
    async fn set_use_dialog(&self, use_dialog: bool) -> Result<()>;

    /// Persist the statistics window length in days
    async fn set_history_length(&self, days: i64) -> Result<()>;
}
