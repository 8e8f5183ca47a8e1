//! # Feeding Tracker Backend
//!
//! Contains all non-UI logic for the breastfeeding tracker application.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Feeding records, next-feeding prediction, and gap statistics
//! - **Storage**: Data persistence (SQLite feedings store, YAML settings file)
//! - **Backup**: Export/import of the feeding history as JSON backup files
//!
//! The backend is designed to be UI-agnostic, meaning it could support
//! different frontend frameworks or even CLI interfaces without modification.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! UI Layer (any frontend)
//!     ↓
//! Domain Layer (feeding service, statistics, prediction)
//!     ↓
//! Storage Layer (SQLite feedings, YAML settings)
//! ```
//!
//! The backup machinery sits beside the domain layer and coordinates the
//! feeding store with the filesystem through its own state machine.
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Coordinate between domain logic and data persistence
//! - Provide a clean separation of concerns for maintainability

pub mod backup;
pub mod domain;
pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::backup::{BackupFileManager, BackupManager};
use crate::domain::{FeedingService, StatisticsService};
use crate::storage::repositories::{FeedingRepository, SettingsRepository};
use crate::storage::traits::{FeedingStorage, SettingsStorage};
use crate::storage::DbConnection;

// File name of the settings document inside the config directory.
const SETTINGS_FILE_NAME: &str = "settings.yaml";
const CONFIG_DIR_NAME: &str = "feeding-tracker";

/// Main application state that holds all services
#[derive(Clone)]
pub struct Backend {
    pub feeding_service: FeedingService,
    pub statistics_service: StatisticsService,
    pub backup_manager: BackupManager,
    pub settings: Arc<dyn SettingsStorage>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<Backend> {
    info!("Setting up database");
    let db_conn = DbConnection::init().await?;
    let feeding_repository: Arc<dyn FeedingStorage> =
        Arc::new(FeedingRepository::new(db_conn.clone()));

    info!("Loading settings");
    let settings: Arc<dyn SettingsStorage> =
        Arc::new(SettingsRepository::new(default_settings_path()?)?);

    info!("Setting up domain model");
    let feeding_service = FeedingService::new(feeding_repository.clone(), settings.clone());
    let statistics_service = StatisticsService::new(feeding_repository.clone(), settings.clone());

    info!("Setting up backup manager");
    let file_manager = Arc::new(BackupFileManager::new_default()?);
    let backup_manager = BackupManager::new(feeding_repository, file_manager);

    Ok(Backend {
        feeding_service,
        statistics_service,
        backup_manager,
        settings,
    })
}

/// Settings file location inside the platform config directory.
fn default_settings_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine a config directory"))?;
    Ok(base.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
}
