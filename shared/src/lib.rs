use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Breast-side flags stored in `Feeding::breast` as independent bits.
pub mod breast {
    pub const LEFT: i32 = 1;
    pub const RIGHT: i32 = 2;
}

/// Supplement flags stored in `Feeding::additions` as independent bits.
pub mod additions {
    pub const VIGANTOL: i32 = 1;
    pub const ESPUMISAN: i32 = 2;
    pub const PROBIOTICS: i32 = 4;
}

/// True when every bit of `flag` is set in `mask`.
pub fn has_flag(mask: i32, flag: i32) -> bool {
    mask & flag == flag
}

/// A single recorded feeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeding {
    /// Store-assigned identifier; 0 means "not yet persisted"
    pub id: i64,
    /// Local calendar date of the feeding
    pub date: NaiveDate,
    /// Local wall-clock time of the feeding
    pub timestamp: NaiveTime,
    /// Bitmask of `breast::*` flags (0 = not recorded)
    pub breast: i32,
    /// Bitmask of `additions::*` flags (0 = none)
    pub additions: i32,
}

impl Feeding {
    /// New unpersisted record; the store assigns the id on insert.
    pub fn new(date: NaiveDate, timestamp: NaiveTime, breast: i32, additions: i32) -> Self {
        Self {
            id: 0,
            date,
            timestamp,
            breast,
            additions,
        }
    }

    pub fn fed_left(&self) -> bool {
        has_flag(self.breast, breast::LEFT)
    }

    pub fn fed_right(&self) -> bool {
        has_flag(self.breast, breast::RIGHT)
    }

    pub fn has_vigantol(&self) -> bool {
        has_flag(self.additions, additions::VIGANTOL)
    }

    pub fn has_espumisan(&self) -> bool {
        has_flag(self.additions, additions::ESPUMISAN)
    }

    pub fn has_probiotics(&self) -> bool {
        has_flag(self.additions, additions::PROBIOTICS)
    }
}

/// Raw per-day gap aggregate as produced by the store.
///
/// `average` and `maximum` are fractional hours between consecutive feedings
/// on that day; `total` is the number of gaps, which is one less than the
/// number of feedings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatistic {
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    pub average: f64,
    pub maximum: f64,
    pub total: i64,
}

/// User-tunable application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Hours between a feeding and the predicted next one
    pub next_feeding_hour: i64,
    /// Whether reminders use a dialog instead of a passive notice
    pub use_dialog: bool,
    /// Trailing number of days shown in statistics
    pub history_length: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            next_feeding_hour: 2,
            use_dialog: true,
            history_length: 5,
        }
    }
}

/// Current phase of the backup machinery.
///
/// Busy variants carry the user-visible file name of the backup being
/// processed so observers can display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackupState {
    Idle,
    Exporting { file_name: String },
    Importing { file_name: String },
}

impl BackupState {
    pub fn is_idle(&self) -> bool {
        matches!(self, BackupState::Idle)
    }

    /// File name carried by a busy state, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            BackupState::Idle => None,
            BackupState::Exporting { file_name } | BackupState::Importing { file_name } => {
                Some(file_name)
            }
        }
    }
}

/// What a finished backup job should tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackupMessageKind {
    ExportFinished,
    ImportFinished,
    PermissionError,
}

/// One-shot user-facing notification emitted when a backup job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupMessage {
    pub kind: BackupMessageKind,
    /// Name of the file the finished job worked with
    pub file_name: String,
}
