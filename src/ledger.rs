use std::collections::HashMap;

use chrono::Duration;
use log::{debug, info};

use crate::config::ResetPolicy;
use crate::session::Session;

/// プロジェクトごとに集計した記録時間。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub recorded_seconds: i64,
    // 最後にセッションが記録された順番。大きいほど新しい。
    touched: u64,
}

/// 完了したセッションの記録と、プロジェクトごとの集計を保持する。
///
/// セッションのログは記録順に追記するだけで変更しない。
/// 集計はプロジェクト名をキーとして別に保持し、同じプロジェクトのセッションは1つの`ProjectEntry`にまとめる。
#[derive(Clone, Debug, Default)]
pub struct ProjectLedger {
    sessions: Vec<Session>,
    entries: HashMap<String, ProjectEntry>,
    known_projects: Vec<String>,
    touch_counter: u64,
}

impl ProjectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 完了したセッションを記録する。
    ///
    /// 記録される秒数は秒未満を切り捨てた値とする。
    /// 0.9秒のセッションも、集計には0秒として加算されるがログには残る。
    pub fn record(&mut self, session: Session) {
        let seconds = session.whole_seconds();
        let name = session.project().to_string();
        self.touch_counter += 1;
        let touched = self.touch_counter;

        let entry = self
            .entries
            .entry(name.clone())
            .or_insert_with(|| ProjectEntry {
                name: name.clone(),
                recorded_seconds: 0,
                touched,
            });
        entry.recorded_seconds += seconds;
        entry.touched = touched;
        info!(
            "recorded {}s for {:?} (project total {}s)",
            seconds, name, entry.recorded_seconds
        );

        if !self.known_projects.contains(&name) {
            debug!("new project {:?}", name);
            self.known_projects.push(name);
        }
        self.sessions.push(session);
    }

    /// 記録済みの秒数の合計を返す。
    pub fn recorded_seconds(&self) -> i64 {
        self.entries.values().map(|entry| entry.recorded_seconds).sum()
    }

    /// 記録済みの秒数に計測中の経過時間を加えた合計秒数を返す。
    ///
    /// 計測中の経過時間は切り捨てずに加算するため、小数を含む。
    pub fn grand_total(&self, live_extra: Duration) -> f64 {
        let live = live_extra.num_milliseconds().max(0) as f64 / 1000.0;
        self.recorded_seconds() as f64 + live
    }

    /// プロジェクト名に対応する記録済み秒数を返す。
    pub fn project_seconds(&self, project: &str) -> Option<i64> {
        self.entries.get(project).map(|entry| entry.recorded_seconds)
    }

    /// プロジェクトごとの集計を、最後に記録されたものから順に返す。
    pub fn ordered_sessions(&self) -> Vec<(String, i64)> {
        let mut entries: Vec<&ProjectEntry> = self.entries.values().collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.touched));
        entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry.recorded_seconds))
            .collect()
    }

    /// 記録したセッションを新しいものから順に返す。
    pub fn session_log(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().rev()
    }

    /// これまでに記録したプロジェクト名を、初めて記録した順に返す。
    pub fn known_projects(&self) -> &[String] {
        &self.known_projects
    }

    /// `prefix`で始まるプロジェクト名を返す。大文字小文字は区別しない。
    pub fn suggestions(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        self.known_projects
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// 全ての記録を消去する。
    ///
    /// プロジェクト名の候補を残すかどうかは`policy`に従う。
    pub fn reset(&mut self, policy: ResetPolicy) {
        self.sessions.clear();
        self.entries.clear();
        self.touch_counter = 0;
        if policy == ResetPolicy::ClearSuggestions {
            self.known_projects.clear();
        }
        info!("ledger reset ({:?})", policy);
    }
}
