use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{interval, MissedTickBehavior};

use crate::console::ConsolePresenter;
use crate::datetime::Clock;
use crate::format::format_duration;
use crate::session::Session;
use crate::tracker::TimeTracker;

const HELP: &str = "commands: start <project> | stop | <enter> (toggle) | reset | projects | log | suggest <prefix> | help | quit";

/// Consoleから入力されるコマンド。
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Start(String),
    Stop,
    Toggle,
    Reset,
    Projects,
    Log,
    Suggest(String),
    Help,
    Quit,
}

impl Command {
    /// 1行分の入力をコマンドにする。不明なコマンドの場合は`None`を返す。
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "" => Command::Toggle,
            "start" => Command::Start(rest.to_string()),
            "stop" => Command::Stop,
            "reset" => Command::Reset,
            "projects" => Command::Projects,
            "log" => Command::Log,
            "suggest" => Command::Suggest(rest.to_string()),
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// 入力を処理した後にループを続けるかどうか。
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Consoleの入力と定期的な画面更新を処理する。
///
/// `tick_interval`ごとに`TimeTracker::tick`の結果を`presenter`に渡し、その合間に`input`から1行ずつコマンドを読む。
/// `quit`が入力されるか、入力が終わった時点で終了する。
///
/// # Arguments
///
/// * `tracker` - 操作対象の`TimeTracker`
/// * `presenter` - 表示先
/// * `input` - コマンドの入力元
/// * `tick_interval` - 画面更新の間隔
pub async fn run<C, P, R>(
    tracker: &mut TimeTracker<C>,
    presenter: &mut P,
    input: R,
    tick_interval: Duration,
) -> Result<()>
where
    C: Clock,
    P: ConsolePresenter,
    R: AsyncBufRead + Unpin,
{
    presenter.show_message(&format!("TimeTracker v{}", env!("CARGO_PKG_VERSION")))?;
    presenter.show_message(HELP)?;

    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = input.lines();
    let mut awaiting_reset = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                presenter.show_status(&tracker.tick())?;
            }
            line = lines.next_line() => {
                let line = line.context("Failed to read command")?;
                let Some(line) = line else {
                    debug!("input closed");
                    break;
                };

                if awaiting_reset {
                    awaiting_reset = false;
                    answer_reset(tracker, presenter, &line)?;
                    continue;
                }
                match Command::parse(&line) {
                    Some(Command::Reset) => {
                        awaiting_reset = true;
                        presenter.show_message("Reset all timing data? [y/N]")?;
                    }
                    Some(command) => {
                        if handle_command(tracker, presenter, command)? == Flow::Quit {
                            break;
                        }
                    }
                    None => presenter.show_message(&format!("unknown command: {}", line.trim()))?,
                }
            }
        }
    }

    let snapshot = tracker.tick();
    presenter.show_projects(&snapshot.rows)?;
    presenter.show_message(&format!("total {}", snapshot.total))?;
    info!("exiting with {} recorded", snapshot.total);

    Ok(())
}

/// リセットの確認に対する回答を処理する。
fn answer_reset<C: Clock, P: ConsolePresenter>(
    tracker: &mut TimeTracker<C>,
    presenter: &mut P,
    answer: &str,
) -> Result<()> {
    let accepted = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
    if tracker.on_reset(&mut || accepted) {
        presenter.show_message("all timing data cleared")
    } else {
        presenter.show_message("reset cancelled")
    }
}

fn handle_command<C: Clock, P: ConsolePresenter>(
    tracker: &mut TimeTracker<C>,
    presenter: &mut P,
    command: Command,
) -> Result<Flow> {
    let result = match command {
        Command::Start(project) => tracker.on_start(&project).map(|_| None),
        Command::Stop => tracker.on_stop().map(Some),
        Command::Toggle => {
            let project = tracker.last_project().unwrap_or_default().to_string();
            tracker.on_toggle(&project)
        }
        Command::Projects => {
            presenter.show_projects(&tracker.tick().rows)?;
            return Ok(Flow::Continue);
        }
        Command::Log => {
            let sessions: Vec<&Session> = tracker.ledger().session_log().collect();
            presenter.show_sessions(&sessions)?;
            return Ok(Flow::Continue);
        }
        Command::Suggest(prefix) => {
            let suggestions = tracker.ledger().suggestions(&prefix);
            presenter.show_message(&suggestions.join(", "))?;
            return Ok(Flow::Continue);
        }
        Command::Help => {
            presenter.show_message(HELP)?;
            return Ok(Flow::Continue);
        }
        Command::Quit => return Ok(Flow::Quit),
        // 確認が必要なため`run`で処理する。
        Command::Reset => return Ok(Flow::Continue),
    };

    match result {
        Ok(Some(session)) => {
            let project_total = tracker
                .ledger()
                .project_seconds(session.project())
                .unwrap_or_default();
            presenter.show_message(&format!(
                "stopped {}: {} (project total {})",
                session.project(),
                format_duration(session.whole_seconds() as f64),
                format_duration(project_total as f64)
            ))?
        }
        Ok(None) => presenter.show_message(&format!(
            "started {}",
            tracker.last_project().unwrap_or_default()
        ))?,
        Err(e) => presenter.show_message(&format!("error: {}", e))?,
    }
    Ok(Flow::Continue)
}
