use std::io::Write;

use anyhow::{Context, Result};

use crate::format::{format_clock, format_duration};
use crate::session::Session;
use crate::tracker::TickSnapshot;

/// Consoleに計測状態を表示するためのtrait。
pub trait ConsolePresenter {
    /// 経過時間と合計時間の状態行を表示する。
    fn show_status(&mut self, snapshot: &TickSnapshot) -> Result<()>;

    /// プロジェクトごとの集計を表示する。
    fn show_projects(&mut self, rows: &[(String, i64)]) -> Result<()>;

    /// セッションのログを表示する。
    ///
    /// # Arguments
    ///
    /// * `sessions` - 表示するセッション。渡された順に表示する。
    fn show_sessions(&mut self, sessions: &[&Session]) -> Result<()>;

    /// メッセージを1行表示する。
    fn show_message(&mut self, message: &str) -> Result<()>;
}

/// 状態行と一覧をMarkdownのlist形式で表示する。
///
/// 状態行は表示内容が変わった時だけ書き直す。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
    last_status: Option<String>,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            last_status: None,
        }
    }

    /// 状態行の途中で別の出力をする前に改行する。
    fn break_status_line(&mut self) -> Result<()> {
        if self.last_status.take().is_some() {
            writeln!(self.writer).context("Failed to end status line")?;
        }
        Ok(())
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    fn show_status(&mut self, snapshot: &TickSnapshot) -> Result<()> {
        let project = match (snapshot.running, snapshot.project.as_deref()) {
            (true, Some(project)) => project,
            _ => "-",
        };
        let status = format!(
            "[{}] elapsed {} | total {}",
            project, snapshot.elapsed, snapshot.total
        );
        if self.last_status.as_deref() == Some(status.as_str()) {
            return Ok(());
        }

        write!(self.writer, "\r{}", status)
            .with_context(|| format!("Failed to write status: {}", status))?;
        self.writer.flush().context("Failed to flush status")?;
        self.last_status = Some(status);
        Ok(())
    }

    fn show_projects(&mut self, rows: &[(String, i64)]) -> Result<()> {
        self.break_status_line()?;
        if rows.is_empty() {
            writeln!(self.writer, "(no projects)").context("Failed to write projects")?;
        }
        for (project, seconds) in rows {
            writeln!(
                self.writer,
                "- {}: {}",
                project,
                format_duration(*seconds as f64)
            )
            .with_context(|| format!("Failed to write project: {}", project))?;
        }
        Ok(())
    }

    // sessionをlist形式で表示する。
    fn show_sessions(&mut self, sessions: &[&Session]) -> Result<()> {
        self.break_status_line()?;
        if sessions.is_empty() {
            writeln!(self.writer, "(no sessions)").context("Failed to write sessions")?;
        }
        for session in sessions {
            writeln!(
                self.writer,
                "- {} ~ {}: {} ({})",
                format_clock(&session.start()),
                format_clock(&session.stop()),
                session.project(),
                format_duration(session.whole_seconds() as f64)
            )
            .with_context(|| format!("Failed to write session: {:?}", session))?;
        }
        Ok(())
    }

    fn show_message(&mut self, message: &str) -> Result<()> {
        self.break_status_line()?;
        writeln!(self.writer, "{}", message)
            .with_context(|| format!("Failed to write message: {}", message))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use rstest::rstest;

    use super::ConsoleMarkdownList;
    use super::ConsolePresenter;
    use crate::session::Session;
    use crate::tracker::TickSnapshot;

    fn snapshot(project: Option<&str>, elapsed: &str, total: &str) -> TickSnapshot {
        TickSnapshot {
            running: project.is_some(),
            project: project.map(str::to_string),
            elapsed_seconds: 0.0, // 利用しないのでなんでも良い
            total_seconds: 0.0,   // 利用しないのでなんでも良い
            elapsed: elapsed.to_string(),
            total: total.to_string(),
            rows: vec![], // 利用しないのでなんでも良い
        }
    }

    /// 同じ内容の状態行は書き直さないことを確認する。
    #[test]
    fn test_show_status_only_redraws_on_change() {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        let first = snapshot(Some("Alpha"), "00h 00m 01s", "00h 00m 01s");
        presenter.show_status(&first).unwrap();
        presenter.show_status(&first).unwrap();
        presenter
            .show_status(&snapshot(None, "00h 00m 00s", "00h 00m 01s"))
            .unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "\r[Alpha] elapsed 00h 00m 01s | total 00h 00m 01s\
             \r[-] elapsed 00h 00m 00s | total 00h 00m 01s"
        );
    }

    #[rstest]
    #[case::no_project(&[], "(no projects)\n")]
    #[case::single(&[("Alpha".to_string(), 125)], "- Alpha: 00h 02m 05s\n")]
    #[case::double(
        &[("Beta".to_string(), 3725), ("Alpha".to_string(), 0)],
        "- Beta: 01h 02m 05s\n- Alpha: 00h 00m 00s\n",
    )]
    fn test_show_projects(#[case] rows: &[(String, i64)], #[case] expected: &str) {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        presenter.show_projects(rows).unwrap();

        assert_eq!(String::from_utf8(writer).unwrap(), expected);
    }

    #[test]
    fn test_show_sessions() {
        let alpha = Session::new(
            "Alpha",
            Local.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2021, 1, 1, 2, 0, 5).unwrap(),
        )
        .unwrap();
        let beta = Session::new(
            "Beta",
            Local.with_ymd_and_hms(2021, 1, 1, 3, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2021, 1, 1, 3, 30, 0).unwrap(),
        )
        .unwrap();
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        presenter.show_sessions(&[&beta, &alpha]).unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "- 03:00 ~ 03:30: Beta (00h 30m 00s)\n- 01:00 ~ 02:00: Alpha (01h 00m 05s)\n"
        );
    }

    /// 状態行の後に出力する場合は改行が入ることを確認する。
    #[test]
    fn test_message_after_status_breaks_line() {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        presenter
            .show_status(&snapshot(None, "00h 00m 00s", "00h 00m 00s"))
            .unwrap();
        presenter.show_message("bye").unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "\r[-] elapsed 00h 00m 00s | total 00h 00m 00s\nbye\n"
        );
    }
}
