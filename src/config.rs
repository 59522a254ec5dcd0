use std::time::Duration;

use anyhow::{ensure, Context, Result};

/// リセット時にプロジェクト名の候補を残すかどうか。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// 候補も含めて全て消去する。
    #[default]
    ClearSuggestions,
    /// 候補は残す。
    KeepSuggestions,
}

/// 空のプロジェクト名の扱い。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EmptyProjectPolicy {
    /// `TrackerError::EmptyProjectName`として拒否する。
    #[default]
    Reject,
    /// `(unnamed)`というプロジェクトとして扱う。
    Unnamed,
}

/// `EmptyProjectPolicy::Unnamed`で利用するプロジェクト名。
pub const UNNAMED_PROJECT: &str = "(unnamed)";

/// 画面更新の既定の間隔。
pub const DEFAULT_TICK_MS: u64 = 16;

/// `TimeTracker`とスケジューラの設定。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    pub reset_policy: ResetPolicy,
    pub empty_project_policy: EmptyProjectPolicy,
    pub tick_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            reset_policy: ResetPolicy::default(),
            empty_project_policy: EmptyProjectPolicy::default(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

/// 画面更新の間隔をミリ秒でパースする。
pub fn parse_tick_interval(s: &str) -> Result<Duration> {
    let millis: u64 = s
        .parse()
        .with_context(|| format!("Failed to parse tick interval: {}", s))?;
    ensure!(millis > 0, "Tick interval must be greater than 0 ms");

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{parse_tick_interval, EmptyProjectPolicy, ResetPolicy, TrackerConfig};

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();

        assert_eq!(config.reset_policy, ResetPolicy::ClearSuggestions);
        assert_eq!(config.empty_project_policy, EmptyProjectPolicy::Reject);
        assert_eq!(config.tick_interval, Duration::from_millis(16));
    }

    #[rstest]
    #[case::default("16", Duration::from_millis(16))]
    #[case::one_second("1000", Duration::from_secs(1))]
    fn test_parse_tick_interval(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_tick_interval(input).unwrap(), expected);
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-5")]
    #[case::not_a_number("fast")]
    fn test_parse_tick_interval_invalid(#[case] input: &str) {
        assert!(parse_tick_interval(input).is_err());
    }
}
