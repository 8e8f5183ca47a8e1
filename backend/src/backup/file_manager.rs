//! Backup file storage.
//!
//! Backup files live in one fixed directory (the user's download directory
//! by default) and are never overwritten: writing a name that already exists
//! is skipped with a warning.

use anyhow::Result;
use chrono::{Datelike, Timelike};
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

const BACKUP_FILE_PREFIX: &str = "kApp";
const BACKUP_FILE_EXTENSION: &str = ".txt";

/// Backup file name derived from the moment of the export:
/// `kApp_<hour>_<minute>_<day>_<month>` with a 12-hour clock hour and a
/// zero-based month, no zero padding. The extension is appended on write.
pub fn generate_file_name(now: &(impl Datelike + Timelike)) -> String {
    format!(
        "{}_{}_{}_{}_{}",
        BACKUP_FILE_PREFIX,
        now.hour() % 12,
        now.minute(),
        now.day(),
        now.month0()
    )
}

/// Writes and reads backup files in a fixed directory
#[derive(Clone)]
pub struct BackupFileManager {
    backup_directory: PathBuf,
}

impl BackupFileManager {
    /// Create a file manager rooted at `backup_directory`
    pub fn new<P: AsRef<Path>>(backup_directory: P) -> Result<Self> {
        let path = backup_directory.as_ref().to_path_buf();

        // Create the backup directory if it doesn't exist
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        Ok(Self {
            backup_directory: path,
        })
    }

    /// Create a file manager in the user's download directory, falling back
    /// to the home directory
    pub fn new_default() -> Result<Self> {
        let directory = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine a backup directory"))?;
        Self::new(directory)
    }

    pub fn backup_directory(&self) -> &Path {
        &self.backup_directory
    }

    /// Full path a backup name resolves to
    pub fn backup_path(&self, file_name: &str) -> PathBuf {
        self.backup_directory
            .join(format!("{}{}", file_name, BACKUP_FILE_EXTENSION))
    }

    /// Write `content` into a new backup file.
    ///
    /// Returns `Ok(false)` without touching anything when a file with the
    /// same name already exists.
    pub async fn write(&self, file_name: &str, content: &str) -> Result<bool> {
        let path = self.backup_path(file_name);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(content.as_bytes()).await?;
                info!("Wrote backup file {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!("Backup file {:?} already exists, skipping write", path);
                Ok(false)
            }
            Err(e) => {
                error!("Could not create backup file {:?}: {}", path, e);
                Err(e.into())
            }
        }
    }

    /// Read a backup file as a string
    pub async fn read(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    /// Final path segment, for user-facing messages
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn moment(date: (i32, u32, u32), hour: u32, minute: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_generate_file_name_uses_12_hour_clock_and_zero_based_month() {
        let name = generate_file_name(&moment((2024, 3, 7), 21, 7));
        assert_eq!(name, "kApp_9_7_7_2");
    }

    #[test]
    fn test_generate_file_name_noon_and_midnight_render_as_zero() {
        assert_eq!(generate_file_name(&moment((2024, 1, 1), 12, 5)), "kApp_0_5_1_0");
        assert_eq!(generate_file_name(&moment((2024, 1, 1), 0, 5)), "kApp_0_5_1_0");
    }

    #[test]
    fn test_generate_file_name_has_no_padding() {
        let name = generate_file_name(&moment((2024, 12, 31), 9, 5));
        assert_eq!(name, "kApp_9_5_31_11");
    }

    #[tokio::test]
    async fn test_write_appends_extension() {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupFileManager::new(temp_dir.path()).unwrap();

        let written = manager.write("kApp_1_2_3_4", "[]").await.unwrap();
        assert!(written);
        assert!(temp_dir.path().join("kApp_1_2_3_4.txt").exists());
    }

    #[tokio::test]
    async fn test_write_skips_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupFileManager::new(temp_dir.path()).unwrap();

        assert!(manager.write("backup", "first").await.unwrap());
        let written = manager.write("backup", "second").await.unwrap();
        assert!(!written);

        let content = manager.read(&manager.backup_path("backup")).await.unwrap();
        assert_eq!(content, "first");
    }

    #[tokio::test]
    async fn test_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupFileManager::new(temp_dir.path()).unwrap();

        manager.write("roundtrip", "[{\"id\":1}]").await.unwrap();
        let content = manager.read(&manager.backup_path("roundtrip")).await.unwrap();
        assert_eq!(content, "[{\"id\":1}]");
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("backups");

        let manager = BackupFileManager::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(manager.backup_directory(), nested.as_path());
    }

    #[test]
    fn test_display_name_is_final_segment() {
        let path = PathBuf::from("/downloads/kApp_9_5_31_11.txt");
        assert_eq!(BackupFileManager::display_name(&path), "kApp_9_5_31_11.txt");
    }
}
