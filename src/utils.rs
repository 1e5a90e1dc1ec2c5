//! Small helpers shared by commands

use chrono::{DateTime, Local, TimeZone, Utc};
use std::io;
use std::path::{Path, PathBuf};

/// Wall-clock milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

/// Render epoch millis as local time for humans (`2023-11-14 22:13:20 +0000`)
///
/// Falls back to the raw number when the value is out of chrono's range.
pub fn format_millis(millis: i64) -> String {
  match Local.timestamp_millis_opt(millis).single() {
    Some(time) => time.format("%Y-%m-%d %H:%M:%S %z").to_string(),
    None => millis.to_string(),
  }
}

/// RFC 3339 in UTC, for JSON output
pub fn rfc3339_millis(millis: i64) -> Option<String> {
  DateTime::<Utc>::from_timestamp_millis(millis).map(|t| t.to_rfc3339())
}

/// Absolute form of `path`, relative to the current directory
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    Ok(std::env::current_dir()?.join(path))
  }
}

/// `path` relative to `root` when it lives under it, for shorter output
pub fn display_path(path: &Path, root: &Path) -> String {
  path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Human-friendly duration for gaps (`45m`, `2h 5m`, `3d 4h`)
pub fn format_gap(millis: i64) -> String {
  let minutes = millis.max(0) / 60_000;
  let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
  match (days, hours) {
    (0, 0) => format!("{}m", mins),
    (0, _) => format!("{}h {}m", hours, mins),
    _ => format!("{}d {}h", days, hours),
  }
}
