//! # Storage Module
//!
//! Handles all data persistence operations for the feeding tracker.
//!
//! This module abstracts away the specific storage implementation details and
//! provides a consistent interface for persisting and retrieving data. The
//! feeding history lives in a SQLite database; the user settings live in a
//! single YAML document. Both are reachable only through the traits in
//! [`traits`], so the domain layer never touches sqlx or the filesystem
//! directly.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Saving feedings and settings to disk
//! - **Data Retrieval**: Loading stored data back into memory
//! - **Aggregation**: Computing the per-day gap statistics inside the store
//! - **Change Signals**: Publishing data-version and settings updates through
//!   watch channels so observers can re-read without polling

pub mod connection;
pub mod repositories;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{FeedingRepository, SettingsRepository};
pub use traits::{FeedingStorage, SettingsStorage};
