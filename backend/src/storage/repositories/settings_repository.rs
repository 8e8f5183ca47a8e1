//! # Settings Repository
//!
//! This module stores the user-tunable settings in a single YAML file.
//!
//! ## YAML Format
//!
//! ```yaml
//! next_feeding_hour: 2
//! use_dialog: true
//! history_length: 5
//! ```
//!
//! ## Features
//!
//! - Reads never fail: a missing, unreadable, or malformed file degrades to
//!   the default values with a warning
//! - Atomic file writes with temp files
//! - Serialized writers: concurrent setters apply one at a time, each on top
//!   of the previous result
//! - Watch-based subscription delivering the current value immediately and
//!   every later change

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::storage::traits::SettingsStorage;
use shared::AppSettings;

/// YAML-file based settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    path: PathBuf,
    current: Arc<watch::Sender<AppSettings>>,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsRepository {
    /// Open the settings file at `path`, falling back to defaults when it
    /// cannot be loaded
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        // Ensure the parent directory exists so later saves can succeed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let settings = Self::load_or_default(&path);
        let (current, _) = watch::channel(settings);

        Ok(Self {
            path,
            current: Arc::new(current),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Load settings from file; any fault degrades to the defaults
    fn load_or_default(path: &Path) -> AppSettings {
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return AppSettings::default();
        }

        match fs::read_to_string(path) {
            Ok(yaml_content) => match serde_yaml::from_str(&yaml_content) {
                Ok(settings) => {
                    debug!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Settings file {:?} is malformed ({}), using defaults", path, e);
                    AppSettings::default()
                }
            },
            Err(e) => {
                warn!("Could not read settings file {:?} ({}), using defaults", path, e);
                AppSettings::default()
            }
        }
    }

    /// Save settings to file
    fn save(&self, settings: &AppSettings) -> Result<()> {
        let yaml_content = serde_yaml::to_string(settings)?;

        // Use atomic write pattern: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    /// Persist a modified copy of the current settings and publish it.
    ///
    /// The write lock covers the whole read-modify-save-publish sequence, so
    /// concurrent setters serialize and each one starts from the previous
    /// result instead of a shared stale snapshot.
    async fn apply_update<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(&mut AppSettings),
    {
        let _write_guard = self.write_lock.lock().await;

        let mut settings = self.current.borrow().clone();
        update(&mut settings);
        self.save(&settings)?;
        self.current.send_replace(settings);
        Ok(())
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    fn settings(&self) -> AppSettings {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AppSettings> {
        self.current.subscribe()
    }

    async fn set_next_feeding_hour(&self, hours: i64) -> Result<()> {
        self.apply_update(|settings| settings.next_feeding_hour = hours).await?;
        info!("Set next feeding interval to {} hours", hours);
        Ok(())
    }

    async fn set_use_dialog(&self, use_dialog: bool) -> Result<()> {
        self.apply_update(|settings| settings.use_dialog = use_dialog).await?;
        info!("Set reminder style to use_dialog={}", use_dialog);
        Ok(())
    }

    async fn set_history_length(&self, days: i64) -> Result<()> {
        self.apply_update(|settings| settings.history_length = days).await?;
        info!("Set statistics history length to {} days", days);
        Ok(())
    }
}
