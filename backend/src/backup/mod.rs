//! # Backup Module
//!
//! Export and import of the feeding history as JSON backup files.
//!
//! ## Module Organization
//!
//! - **serializer**: the wire codec (flat JSON entries, epoch milliseconds)
//! - **file_manager**: backup file storage in the download directory
//! - **manager**: the single-flight Idle/Exporting/Importing state machine

pub mod file_manager;
pub mod manager;
pub mod serializer;

pub use file_manager::BackupFileManager;
pub use manager::BackupManager;
