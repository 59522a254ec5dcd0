use chrono::{DateTime, Local};
use thiserror::Error;

/// タイマー、集計処理で発生するエラー。
///
/// いずれも回復可能なエラーであり、発生した場合も集計状態は変更されない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Timer is already running")]
    AlreadyRunning,

    #[error("Timer is not running")]
    NotRunning,

    #[error("Project name must not be empty")]
    EmptyProjectName,

    #[error("Session stop ({stop}) must be after its start ({start})")]
    InvalidInterval {
        start: DateTime<Local>,
        stop: DateTime<Local>,
    },
}
