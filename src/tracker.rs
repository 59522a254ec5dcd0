use chrono::{DateTime, Local};
use log::{info, trace, warn};

use crate::config::{EmptyProjectPolicy, TrackerConfig, UNNAMED_PROJECT};
use crate::datetime::Clock;
use crate::error::TrackerError;
use crate::format::format_duration;
use crate::ledger::ProjectLedger;
use crate::session::Session;
use crate::timer::Timer;

/// リセットを実行してよいかをユーザーに確認するためのtrait。
pub trait ConfirmReset {
    /// リセットしてよい場合に`true`を返す。
    fn confirm_reset(&mut self) -> bool;
}

impl<F: FnMut() -> bool> ConfirmReset for F {
    fn confirm_reset(&mut self) -> bool {
        self()
    }
}

/// 画面更新1回分の表示内容。
#[derive(Clone, Debug, PartialEq)]
pub struct TickSnapshot {
    pub running: bool,
    pub project: Option<String>,
    pub elapsed_seconds: f64,
    pub total_seconds: f64,
    pub elapsed: String,
    pub total: String,
    pub rows: Vec<(String, i64)>,
}

/// タイマーと集計をまとめて扱うアプリケーションの状態。
///
/// 表示側はコマンド(`on_start`, `on_stop`, `on_reset`)と定期的な`tick`を通してのみ操作する。
pub struct TimeTracker<C: Clock> {
    clock: C,
    config: TrackerConfig,
    timer: Timer,
    ledger: ProjectLedger,
    last_project: Option<String>,
}

impl<C: Clock> TimeTracker<C> {
    /// 新しい`TimeTracker`を返す。
    ///
    /// # Arguments
    ///
    /// * `clock` - 現在時刻の取得に利用する時計
    /// * `config` - リセット、空のプロジェクト名の扱いなどの設定
    pub fn new(clock: C, config: TrackerConfig) -> Self {
        Self {
            clock,
            config,
            timer: Timer::new(),
            ledger: ProjectLedger::new(),
            last_project: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn ledger(&self) -> &ProjectLedger {
        &self.ledger
    }

    /// 最後に計測を開始したプロジェクト名を返す。
    pub fn last_project(&self) -> Option<&str> {
        self.last_project.as_deref()
    }

    /// プロジェクト名の候補を返す。
    pub fn known_projects(&self) -> &[String] {
        self.ledger.known_projects()
    }

    /// 指定したプロジェクトの計測を開始する。
    ///
    /// プロジェクト名の前後の空白は取り除く。
    pub fn on_start(&mut self, project: &str) -> Result<(), TrackerError> {
        if self.timer.is_running() {
            warn!("start requested for {:?} while already running", project);
            return Err(TrackerError::AlreadyRunning);
        }
        let project = self.normalize_project(project)?;
        let now = self.clock.now();

        self.timer.start(project.clone(), now)?;
        info!("started {:?} at {}", project, now);
        self.last_project = Some(project);
        Ok(())
    }

    /// 計測を停止し、セッションを記録する。
    pub fn on_stop(&mut self) -> Result<Session, TrackerError> {
        let now = self.clock.now();
        let session = self.timer.stop(now).map_err(|e| {
            warn!("stop rejected: {}", e);
            e
        })?;
        info!(
            "stopped {:?} after {}",
            session.project(),
            format_duration(session.whole_seconds() as f64)
        );

        self.ledger.record(session.clone());
        Ok(session)
    }

    /// 停止中なら開始し、計測中なら停止する。
    ///
    /// 停止した場合は記録した`Session`を返す。
    pub fn on_toggle(&mut self, project: &str) -> Result<Option<Session>, TrackerError> {
        if self.timer.is_running() {
            self.on_stop().map(Some)
        } else {
            self.on_start(project).map(|_| None)
        }
    }

    /// 確認が得られた場合に全ての状態をリセットする。
    ///
    /// 計測中のセッションは記録せずに破棄する。リセットした場合に`true`を返す。
    pub fn on_reset(&mut self, confirm: &mut impl ConfirmReset) -> bool {
        if !confirm.confirm_reset() {
            info!("reset cancelled");
            return false;
        }

        if self.timer.is_running() {
            warn!("discarding running session of {:?}", self.timer.project());
        }
        self.timer.discard();
        self.ledger.reset(self.config.reset_policy);
        self.last_project = None;
        true
    }

    /// 指定した時刻での表示内容を返す。状態は変更しない。
    pub fn on_tick(&self, now: DateTime<Local>) -> TickSnapshot {
        let live = self.timer.live_elapsed(now);
        let elapsed_seconds = live.num_milliseconds() as f64 / 1000.0;
        let total_seconds = self.ledger.grand_total(live);
        trace!("tick at {}: elapsed {}s", now, elapsed_seconds);

        TickSnapshot {
            running: self.timer.is_running(),
            project: self.timer.project().map(str::to_string),
            elapsed_seconds,
            total_seconds,
            elapsed: format_duration(elapsed_seconds),
            total: format_duration(total_seconds),
            rows: self.ledger.ordered_sessions(),
        }
    }

    /// 現在時刻での表示内容を返す。
    pub fn tick(&self) -> TickSnapshot {
        self.on_tick(self.clock.now())
    }

    fn normalize_project(&self, project: &str) -> Result<String, TrackerError> {
        let project = project.trim();
        if !project.is_empty() {
            return Ok(project.to_string());
        }

        match self.config.empty_project_policy {
            EmptyProjectPolicy::Reject => {
                warn!("rejected empty project name");
                Err(TrackerError::EmptyProjectName)
            }
            EmptyProjectPolicy::Unnamed => Ok(UNNAMED_PROJECT.to_string()),
        }
    }
}
