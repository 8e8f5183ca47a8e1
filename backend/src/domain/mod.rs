//! # Domain Module
//!
//! Contains all business logic for the feeding tracker application.
//!
//! This module encapsulates the core rules that define how feedings are
//! recorded, how the next feeding is predicted, and how the per-day gap
//! statistics are assembled. It operates independently of any specific UI
//! framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **feeding_service**: Recording feedings and loading the day view
//! - **statistics_service**: Trailing-window gap statistics for display
//! - **models**: Pure domain models (next-feeding prediction, statistics view)
//! - **formatting**: Human-facing date and time rendering
//!
//! ## Core Concepts
//!
//! - **Feeding**: A single nursing event with breast and supplement flags
//! - **Gap**: The time between two consecutive feedings of the same day
//! - **Prediction**: Last feeding plus the configured interval
//!
//! ## Business Rules
//!
//! - Writes to the feeding history never block or fail the caller
//! - Statistics cover whole days only; the current day is excluded
//! - A day with a single feeding has no gaps and therefore no statistics

pub mod feeding_service;
pub mod formatting;
pub mod models;
pub mod statistics_service;

pub use feeding_service::FeedingService;
pub use models::{DayStatisticsView, LastFeedingModel};
pub use statistics_service::StatisticsService;
