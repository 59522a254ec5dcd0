use chrono::{DateTime, Local};
#[cfg(test)]
use mockall::automock;

/// 現在時刻を取得するためのtrait。
///
/// テスト時に実時間を経過させずに済むよう、時刻の取得はこのtraitを経由する。
#[cfg_attr(test, automock)]
pub trait Clock {
    /// 現在のLocal時刻を返す。
    fn now(&self) -> DateTime<Local>;
}

/// システムの時計を利用する`Clock`。
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        now()
    }
}

#[cfg(not(test))]
/// 現在のLocal時間を取得する。
pub fn now() -> DateTime<Local> {
    Local::now()
}


#[cfg(test)]
pub use mock_datetime::now;
