//! Log record capture.
//!
//! A [`LogRecord`] is built once at the call site and never mutated
//! afterwards. Everything the renderer may need later is snapshotted here:
//! the timestamp, the emitting thread's label, and its scope depth. In
//! async mode the record crosses a thread boundary before rendering, so
//! these snapshots are what keep the output deterministic.

use crate::config::DatetimePrecision;
use crate::level::Level;
use crate::scope;

use std::thread;

use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub(crate) struct LogRecord {
  pub(crate) level: Level,
  pub(crate) verbosity: u32,
  /// Short display name of the source file (basename, not the full path).
  pub(crate) file: String,
  pub(crate) line: u32,
  pub(crate) timestamp: DateTime<Local>,
  pub(crate) message_template: String,
  /// Positional substitution values, already stringified by the call site.
  pub(crate) message_args: Vec<String>,
  /// Emitting thread's label, captured only when the active line format
  /// contains `{thread}`.
  pub(crate) thread: Option<String>,
  /// Emitting thread's scope depth at capture time.
  pub(crate) indent_depth: usize,
}

impl LogRecord {
  pub(crate) fn capture(
    level: Level,
    verbosity: u32,
    file: &str,
    line: u32,
    message_template: &str,
    message_args: Vec<String>,
    capture_thread: bool,
  ) -> Self {
    Self {
      level,
      verbosity,
      file: basename(file).to_string(),
      line,
      timestamp: Local::now(),
      message_template: message_template.to_string(),
      message_args,
      thread: capture_thread.then(thread_label),
      indent_depth: scope::current_depth(),
    }
  }

  /// Renders the `{datetime}` tag value: the strftime output plus a
  /// fractional-seconds suffix per the configured precision.
  pub(crate) fn format_timestamp(&self, format: &str, precision: DatetimePrecision) -> String {
    let base = self.timestamp.format(format).to_string();
    let digits = precision.subsec_digits();
    if digits == 0 {
      return base;
    }
    let nanos = self.timestamp.timestamp_subsec_nanos() % 1_000_000_000;
    let fraction = nanos / 10u32.pow(9 - digits as u32);
    format!("{}.{:0width$}", base, fraction, width = digits)
  }

  /// Renders the `{file}` tag value: `name:line` with the name right-aligned
  /// (or middle-truncated, keeping the extension) in `name_width` columns and
  /// the line number left-aligned in `line_width` columns.
  pub(crate) fn file_display(&self, name_width: usize, line_width: usize) -> String {
    let name = fit_filename(&self.file, name_width);
    format!(
      "{:>name_width$}:{:<line_width$}",
      name,
      self.line,
      name_width = name_width,
      line_width = line_width
    )
  }
}

fn basename(path: &str) -> &str {
  path
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or(path)
}

fn thread_label() -> String {
  let current = thread::current();
  match current.name() {
    Some(name) => name.to_string(),
    None => format!("{:?}", current.id()),
  }
}

/// Shortens `name` to `width` characters by eliding the middle of the stem:
/// the start, the last two stem characters, and the extension stay visible
/// (`some_lon...me.rs`). Names that fit are returned unchanged; the caller
/// pads them.
fn fit_filename(name: &str, width: usize) -> String {
  let chars: Vec<char> = name.chars().collect();
  if chars.len() <= width {
    return name.to_string();
  }
  let (stem, ext) = match name.rsplit_once('.') {
    Some((stem, ext)) => (stem, ext),
    None => (name, ""),
  };
  let stem_chars: Vec<char> = stem.chars().collect();
  // Budget: the extension plus its dot, a three-dot ellipsis, and the last
  // two stem characters all stay; the remainder shows the start.
  let reserved = ext.chars().count() + 3 + 1 + 2;
  if width <= reserved || stem_chars.len() < reserved {
    return stem_chars[..width.min(stem_chars.len())].iter().collect();
  }
  let head = width - reserved;
  let mut out: String = stem_chars[..head].iter().collect();
  out.push_str("...");
  out.extend(&stem_chars[stem_chars.len() - 2..]);
  out.push('.');
  out.push_str(ext);
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use chrono::Timelike;
  use pretty_assertions::assert_eq;

  fn record_at(nanos: u32) -> LogRecord {
    let timestamp = Local
      .with_ymd_and_hms(2024, 3, 5, 13, 14, 15)
      .unwrap()
      .with_nanosecond(nanos)
      .unwrap();
    LogRecord {
      level: Level::Info,
      verbosity: 0,
      file: "record.rs".to_string(),
      line: 42,
      timestamp,
      message_template: String::new(),
      message_args: Vec::new(),
      thread: None,
      indent_depth: 0,
    }
  }

  #[test]
  fn test_capture_shortens_file_path() {
    let record = LogRecord::capture(Level::Debug, 0, "src/deep/module.rs", 7, "x", vec![], false);
    assert_eq!(record.file, "module.rs");
    assert!(record.thread.is_none());

    let windows = LogRecord::capture(Level::Debug, 0, r"src\win\module.rs", 7, "x", vec![], true);
    assert_eq!(windows.file, "module.rs");
    assert!(windows.thread.is_some());
  }

  #[test]
  fn test_timestamp_precision_suffixes() {
    let record = record_at(123_456_789);
    assert_eq!(
      record.format_timestamp("%T", DatetimePrecision::Seconds),
      "13:14:15"
    );
    assert_eq!(
      record.format_timestamp("%T", DatetimePrecision::Millis),
      "13:14:15.123"
    );
    assert_eq!(
      record.format_timestamp("%T", DatetimePrecision::Micros),
      "13:14:15.123456"
    );
    assert_eq!(
      record.format_timestamp("%T", DatetimePrecision::Nanos),
      "13:14:15.123456789"
    );
  }

  #[test]
  fn test_timestamp_fraction_is_zero_padded() {
    let record = record_at(4_056_000);
    assert_eq!(
      record.format_timestamp("%T", DatetimePrecision::Millis),
      "13:14:15.004"
    );
  }

  #[test]
  fn test_file_display_right_aligns_name_and_left_aligns_line() {
    let record = record_at(0);
    assert_eq!(record.file_display(12, 4), "   record.rs:42  ");
  }

  #[test]
  fn test_file_display_truncation_keeps_start_and_extension() {
    let mut record = record_at(0);
    record.file = "very_long_module_name.rs".to_string();
    let display = record.file_display(12, 4);
    assert_eq!(display, "very...me.rs:42  ");
    assert_eq!(display.split(':').next().unwrap().len(), 12);
  }

  #[test]
  fn test_file_display_tiny_width_shows_the_stem_prefix() {
    let mut record = record_at(0);
    record.file = "something_long.rs".to_string();
    assert_eq!(record.file_display(6, 4), "someth:42  ");
  }
}
