//! Backup orchestration.
//!
//! A single watch channel holds the machine state (Idle, Exporting,
//! Importing). Requests claim the channel atomically, so of two racing
//! requests exactly one wins; the loser is dropped with a warning. Every job
//! restores Idle when it finishes, whatever happened in between, and emits
//! exactly one user-facing message describing the outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use log::{debug, error, info, warn};
use tokio::sync::{broadcast, watch};
use tokio::time::sleep;

use crate::backup::file_manager::{self, BackupFileManager};
use crate::backup::serializer;
use crate::storage::traits::FeedingStorage;
use shared::{BackupMessage, BackupMessageKind, BackupState};

// Busy states stay observable for at least this long.
const JOB_LINGER: Duration = Duration::from_millis(1000);

const MESSAGE_CHANNEL_CAPACITY: usize = 16;

/// Coordinates exports and imports of the feeding history
#[derive(Clone)]
pub struct BackupManager {
    feeding_repository: Arc<dyn FeedingStorage>,
    file_manager: Arc<BackupFileManager>,
    state: Arc<watch::Sender<BackupState>>,
    messages: broadcast::Sender<BackupMessage>,
}

impl BackupManager {
    pub fn new(
        feeding_repository: Arc<dyn FeedingStorage>,
        file_manager: Arc<BackupFileManager>,
    ) -> Self {
        let (state, _) = watch::channel(BackupState::Idle);
        let (messages, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);

        Self {
            feeding_repository,
            file_manager,
            state: Arc::new(state),
            messages,
        }
    }

    /// Current machine state
    pub fn state(&self) -> BackupState {
        self.state.borrow().clone()
    }

    /// Observe every state transition
    pub fn subscribe_state(&self) -> watch::Receiver<BackupState> {
        self.state.subscribe()
    }

    /// Receive the one-shot completion messages
    pub fn subscribe_messages(&self) -> broadcast::Receiver<BackupMessage> {
        self.messages.subscribe()
    }

    /// Export the whole feeding history into a new backup file.
    ///
    /// Silently dropped when another backup job is running.
    pub fn export(&self) {
        let file_name = file_manager::generate_file_name(&Local::now());
        let claimed = self.claim(BackupState::Exporting {
            file_name: file_name.clone(),
        });
        if !claimed {
            warn!("A backup job is already running, dropping export request");
            return;
        }
        info!("📦 Starting export to {}", file_name);

        let manager = self.clone();
        tokio::spawn(async move {
            let kind = match manager.run_export(&file_name).await {
                Ok(()) => BackupMessageKind::ExportFinished,
                Err(e) => {
                    error!("Export to {} failed: {:#}", file_name, e);
                    outcome_for_error(&e, BackupMessageKind::ExportFinished)
                }
            };
            sleep(JOB_LINGER).await;
            manager.finish_job(kind, file_name);
        });
    }

    /// Import a backup file into the feeding store.
    ///
    /// Silently dropped when another backup job is running.
    pub fn import(&self, path: PathBuf) {
        let file_name = BackupFileManager::display_name(&path);
        let claimed = self.claim(BackupState::Importing {
            file_name: file_name.clone(),
        });
        if !claimed {
            warn!("A backup job is already running, dropping import request");
            return;
        }
        info!("📦 Starting import of {}", file_name);

        let manager = self.clone();
        tokio::spawn(async move {
            let kind = match manager.run_import(&path).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Queued {} imported feeding(s)", count);
                    }
                    BackupMessageKind::ImportFinished
                }
                Err(e) => {
                    error!("Import of {} failed: {:#}", file_name, e);
                    outcome_for_error(&e, BackupMessageKind::ImportFinished)
                }
            };
            sleep(JOB_LINGER).await;
            manager.finish_job(kind, file_name);
        });
    }

    /// Atomic Idle to busy transition; false when the machine was busy
    fn claim(&self, busy: BackupState) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_idle() {
                *state = busy;
                true
            } else {
                false
            }
        })
    }

    async fn run_export(&self, file_name: &str) -> Result<()> {
        let feedings = self.feeding_repository.get_all().await?;
        let content = serializer::encode(&feedings)?;
        if self.file_manager.write(file_name, &content).await? {
            info!("✅ Exported {} feeding(s) to {}", feedings.len(), file_name);
        }
        Ok(())
    }

    async fn run_import(&self, path: &Path) -> Result<usize> {
        let content = self.file_manager.read(path).await?;
        let feedings = serializer::decode(&content)?;
        if feedings.is_empty() {
            info!("Backup {:?} holds no feedings, nothing to import", path);
            return Ok(0);
        }

        // Imported records are queued like any other write; a storage
        // failure is logged inside the task and does not change the outcome
        let repository = self.feeding_repository.clone();
        let count = feedings.len();
        tokio::spawn(async move {
            if let Err(e) = repository.insert_many(&feedings).await {
                error!("Failed to store imported feedings: {:#}", e);
            }
        });

        Ok(count)
    }

    /// Restore Idle and emit the completion message.
    ///
    /// Finding the machine already Idle means the busy-to-Idle transition
    /// happened twice; that is logged and no message is sent.
    fn finish_job(&self, kind: BackupMessageKind, file_name: String) {
        let was_busy = self.state.send_if_modified(|state| {
            if state.is_idle() {
                false
            } else {
                *state = BackupState::Idle;
                true
            }
        });

        if !was_busy {
            error!("Duplicate idle transition for {}", file_name);
            return;
        }

        if self.messages.send(BackupMessage { kind, file_name }).is_err() {
            debug!("Backup message had no subscribers");
        }
    }
}

/// Permission failures get their own message kind; everything else keeps
/// the normal completion kind.
fn outcome_for_error(error: &anyhow::Error, finished: BackupMessageKind) -> BackupMessageKind {
    let permission_denied = error
        .downcast_ref::<std::io::Error>()
        .map(|io_error| io_error.kind() == std::io::ErrorKind::PermissionDenied)
        .unwrap_or(false);

    if permission_denied {
        BackupMessageKind::PermissionError
    } else {
        finished
    }
}
