use chrono::{DateTime, Local};

/// 秒数を`HHh MMm SSs`形式の文字列にする。
///
/// 秒未満は切り捨てる。時間は桁あふれさせずそのまま表示する。
///
/// # Examples
///
/// ```
/// assert_eq!(format_duration(3661.0), "01h 01m 01s");
/// ```
pub fn format_duration(total_seconds: f64) -> String {
    let whole = total_seconds.floor() as i64;
    let seconds = whole % 60;
    let minutes = (whole / 60) % 60;
    let hours = whole / 3600;
    format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
}

/// 時刻を`HH:MM`形式の文字列にする。
pub fn format_clock(datetime: &DateTime<Local>) -> String {
    datetime.format("%H:%M").to_string()
}
