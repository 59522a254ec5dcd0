use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// ログの出力先を設定する。
///
/// `log_file`が指定された場合はファイルに色なしで、指定されない場合は標準エラー出力に色付きで出力する。
///
/// # Arguments
///
/// * `level` - 出力するログレベル
/// * `log_file` - ログファイルのパス
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let dispatch = fern::Dispatch::new().level(level);

    let dispatch = match log_file {
        Some(path) => dispatch
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}: {}",
                    Local::now().format(TIMESTAMP_FORMAT),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(
                fern::log_file(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?,
            ),
        None => {
            let colors = ColoredLevelConfig::new()
                .error(Color::Red)
                .warn(Color::Yellow)
                .info(Color::Green)
                .debug(Color::Blue)
                .trace(Color::BrightBlack);
            dispatch
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] {}: {}",
                        Local::now().format(TIMESTAMP_FORMAT),
                        colors.color(record.level()),
                        record.target(),
                        message
                    ))
                })
                .chain(std::io::stderr())
        }
    };

    dispatch.apply().context("Failed to initialize logger")?;

    Ok(())
}
