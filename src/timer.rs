use chrono::{DateTime, Duration, Local};
use log::debug;

use crate::error::TrackerError;
use crate::session::Session;

/// タイマーの状態。
#[derive(Clone, Debug, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running {
        project: String,
        start: DateTime<Local>,
    },
}

/// 計測中のセッションを1つだけ保持するストップウォッチ。
///
/// `Idle` -> `start` -> `Running` -> `stop` -> `Idle` の遷移のみを持つ。
#[derive(Clone, Debug)]
pub struct Timer {
    state: TimerState,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// 停止状態の`Timer`を返す。
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// 計測中のプロジェクト名を返す。停止中は`None`。
    pub fn project(&self) -> Option<&str> {
        match &self.state {
            TimerState::Running { project, .. } => Some(project),
            TimerState::Idle => None,
        }
    }

    /// 計測を開始する。
    ///
    /// # Arguments
    ///
    /// * `project` - 計測対象のプロジェクト名
    /// * `now` - 開始時刻
    pub fn start(&mut self, project: String, now: DateTime<Local>) -> Result<(), TrackerError> {
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }

        debug!("timer started for {:?} at {}", project, now);
        self.state = TimerState::Running {
            project,
            start: now,
        };
        Ok(())
    }

    /// 計測を停止し、完了した`Session`を返す。
    ///
    /// 失敗した場合、タイマーは計測中のまま残る。
    pub fn stop(&mut self, now: DateTime<Local>) -> Result<Session, TrackerError> {
        let session = match &self.state {
            TimerState::Running { project, start } => Session::new(project.clone(), *start, now)?,
            TimerState::Idle => return Err(TrackerError::NotRunning),
        };

        debug!("timer stopped at {}", now);
        self.state = TimerState::Idle;
        Ok(session)
    }

    /// 計測中のセッションを記録せずに破棄する。
    pub fn discard(&mut self) {
        self.state = TimerState::Idle;
    }

    /// 開始からの経過時間を返す。
    ///
    /// 停止中はエラーにせずゼロを返す。`now`が開始時刻より前の場合もゼロとする。
    pub fn live_elapsed(&self, now: DateTime<Local>) -> Duration {
        match &self.state {
            TimerState::Running { start, .. } => (now - *start).max(Duration::zero()),
            TimerState::Idle => Duration::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone};

    use super::Timer;
    use crate::error::TrackerError;

    fn base_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_start_then_stop() {
        let mut timer = Timer::new();
        let t0 = base_time();

        timer.start("Alpha".to_string(), t0).unwrap();
        assert!(timer.is_running());
        assert_eq!(timer.project(), Some("Alpha"));

        let session = timer.stop(t0 + Duration::seconds(125)).unwrap();

        assert!(!timer.is_running());
        assert_eq!(session.project(), "Alpha");
        assert_eq!(session.start(), t0);
        assert_eq!(session.whole_seconds(), 125);
        assert_eq!(timer.project(), None);
    }

    #[test]
    fn test_start_while_running() {
        let mut timer = Timer::new();
        let t0 = base_time();
        timer.start("Alpha".to_string(), t0).unwrap();

        let result = timer.start("Beta".to_string(), t0 + Duration::seconds(1));

        assert_eq!(result, Err(TrackerError::AlreadyRunning));
        assert_eq!(timer.project(), Some("Alpha"));
        assert_eq!(timer.live_elapsed(t0 + Duration::seconds(2)), Duration::seconds(2));
    }

    #[test]
    fn test_stop_while_idle() {
        let mut timer = Timer::new();

        let result = timer.stop(base_time());

        assert_eq!(result, Err(TrackerError::NotRunning));
    }

    /// 不正な停止時刻で失敗した場合に計測中のままであることを確認する。
    #[test]
    fn test_stop_with_invalid_interval_keeps_running() {
        let mut timer = Timer::new();
        let t0 = base_time();
        timer.start("Alpha".to_string(), t0).unwrap();

        let result = timer.stop(t0);

        assert!(matches!(result, Err(TrackerError::InvalidInterval { .. })));
        assert!(timer.is_running());
    }

    #[test]
    fn test_live_elapsed_while_idle_is_zero() {
        let timer = Timer::new();

        assert_eq!(timer.live_elapsed(base_time()), Duration::zero());
    }

    #[test]
    fn test_live_elapsed_while_running() {
        let mut timer = Timer::new();
        let t0 = base_time();
        timer.start("Alpha".to_string(), t0).unwrap();

        assert_eq!(
            timer.live_elapsed(t0 + Duration::milliseconds(1500)),
            Duration::milliseconds(1500)
        );
        assert_eq!(timer.live_elapsed(t0 - Duration::seconds(1)), Duration::zero());
    }

    #[test]
    fn test_discard() {
        let mut timer = Timer::new();
        let t0 = base_time();
        timer.start("Alpha".to_string(), t0).unwrap();

        timer.discard();

        assert!(!timer.is_running());
        assert_eq!(timer.live_elapsed(t0 + Duration::seconds(10)), Duration::zero());
    }
}
