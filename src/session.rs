use chrono::{DateTime, Duration, Local};

use crate::error::TrackerError;

/// 開始から停止までの1回分の計測記録。
///
/// 作成後は変更されない。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    project: String,
    start: DateTime<Local>,
    stop: DateTime<Local>,
}

impl Session {
    /// 新しい`Session`を返す。
    ///
    /// `stop`が`start`より後でない場合は`TrackerError::InvalidInterval`を返す。
    pub fn new(
        project: impl Into<String>,
        start: DateTime<Local>,
        stop: DateTime<Local>,
    ) -> Result<Self, TrackerError> {
        if stop <= start {
            return Err(TrackerError::InvalidInterval { start, stop });
        }

        Ok(Self {
            project: project.into(),
            start,
            stop,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn start(&self) -> DateTime<Local> {
        self.start
    }

    pub fn stop(&self) -> DateTime<Local> {
        self.stop
    }

    /// 計測時間を返す。常に正の値となる。
    pub fn duration(&self) -> Duration {
        self.stop - self.start
    }

    /// 計測時間を秒未満切り捨ての整数秒で返す。
    pub fn whole_seconds(&self) -> i64 {
        self.duration().num_seconds()
    }
}
