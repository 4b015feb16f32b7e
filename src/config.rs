use crate::error::{Error, Result};
use crate::level::Level;

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Sub-second precision appended to the rendered `{datetime}` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatetimePrecision {
  #[serde(rename = "s")]
  Seconds,
  #[serde(rename = "ms")]
  Millis,
  #[serde(rename = "us")]
  Micros,
  #[serde(rename = "ns")]
  Nanos,
}

impl DatetimePrecision {
  /// Number of fractional digits appended after the strftime output.
  pub(crate) fn subsec_digits(&self) -> usize {
    match self {
      DatetimePrecision::Seconds => 0,
      DatetimePrecision::Millis => 3,
      DatetimePrecision::Micros => 6,
      DatetimePrecision::Nanos => 9,
    }
  }
}

/// Resolved pipeline configuration.
///
/// The pipeline consumes this as a plain value; loading it from a file (or
/// flags, or anything else) is the embedding application's job. All fields
/// carry defaults, so a loader may supply only what it overrides. After
/// [`init`](crate::init) the configuration is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Write records to per-severity files under `output_dir`.
  #[serde(default)]
  pub log_to_file: bool,
  /// Write records to the console (stderr).
  #[serde(default = "default_log_to_console")]
  pub log_to_console: bool,
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,
  /// File name stem for destinations. Empty means "use the program name",
  /// resolved once at init.
  #[serde(default)]
  pub base_name: String,
  /// Resolve color tags for console output. File output is never colored.
  #[serde(default = "default_colorize")]
  pub colorize: bool,
  #[serde(default = "default_min_level_console")]
  pub min_level_console: Level,
  #[serde(default = "default_min_level_file")]
  pub min_level_file: Level,
  /// Records with a verbosity above this are rejected regardless of level.
  #[serde(default)]
  pub verbosity_ceiling: u32,
  /// Size at which a destination file rotates to its `.old` sibling.
  #[serde(default = "default_max_file_size_bytes")]
  pub max_file_size_bytes: u64,
  /// Rotated generations to keep per destination (`.old`, `.old.2`, ...).
  #[serde(default = "default_retained_file_count")]
  pub retained_file_count: u32,
  /// Tag template every record line is rendered through.
  #[serde(default = "default_line_format")]
  pub line_format: String,
  /// strftime-style format for the `{datetime}` tag.
  #[serde(default = "default_datetime_format")]
  pub datetime_format: String,
  #[serde(default = "default_datetime_precision")]
  pub datetime_precision: DatetimePrecision,
  /// Deliver through the bounded queue and a worker thread instead of
  /// writing on the emitting thread.
  #[serde(default)]
  pub async_logging: bool,
  /// Delivery queue capacity; producers block while the queue is full.
  #[serde(default = "default_queue_capacity")]
  pub queue_capacity: usize,
  /// Fixed display width of the file-name part of the `{file}` tag.
  #[serde(default = "default_max_filename_display_len")]
  pub max_filename_display_len: usize,
  /// Fixed display width of the line-number part of the `{file}` tag.
  #[serde(default = "default_max_line_number_display_len")]
  pub max_line_number_display_len: usize,
  /// Emit scope entry/exit markers and indent enclosed records.
  #[serde(default = "default_scoped_logging")]
  pub scoped_logging: bool,
  /// Spaces per scope depth step in the `{indent}` tag.
  #[serde(default = "default_scoped_indent_width")]
  pub scoped_indent_width: usize,
  /// Surface sink I/O failures on the handle's report channel instead of
  /// only falling back to stderr.
  #[serde(default)]
  pub report_internal_errors: bool,
}

fn default_log_to_console() -> bool {
  true
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("log")
}

fn default_colorize() -> bool {
  true
}

fn default_min_level_console() -> Level {
  Level::Info
}

fn default_min_level_file() -> Level {
  Level::Trace
}

fn default_max_file_size_bytes() -> u64 {
  50 * 1024 * 1024
}

fn default_retained_file_count() -> u32 {
  1
}

fn default_line_format() -> String {
  "{nc}{lc}{level}{nc} {gray}{thread}{nc} {bold}{white}@{nc} {gray}{datetime}{nc} : \
   {white}{italic}{file}{nc} {bold}{white}::{nc} {lc}{indent}{message}{nc}"
    .to_string()
}

fn default_datetime_format() -> String {
  "%a %b %d %T".to_string()
}

fn default_datetime_precision() -> DatetimePrecision {
  DatetimePrecision::Micros
}

fn default_queue_capacity() -> usize {
  10_000
}

fn default_max_filename_display_len() -> usize {
  20
}

fn default_max_line_number_display_len() -> usize {
  4
}

fn default_scoped_logging() -> bool {
  true
}

fn default_scoped_indent_width() -> usize {
  2
}

impl Default for Config {
  fn default() -> Self {
    Self {
      log_to_file: false,
      log_to_console: default_log_to_console(),
      output_dir: default_output_dir(),
      base_name: String::new(),
      colorize: default_colorize(),
      min_level_console: default_min_level_console(),
      min_level_file: default_min_level_file(),
      verbosity_ceiling: 0,
      max_file_size_bytes: default_max_file_size_bytes(),
      retained_file_count: default_retained_file_count(),
      line_format: default_line_format(),
      datetime_format: default_datetime_format(),
      datetime_precision: default_datetime_precision(),
      async_logging: false,
      queue_capacity: default_queue_capacity(),
      max_filename_display_len: default_max_filename_display_len(),
      max_line_number_display_len: default_max_line_number_display_len(),
      scoped_logging: default_scoped_logging(),
      scoped_indent_width: default_scoped_indent_width(),
      report_internal_errors: false,
    }
  }
}

impl Config {
  /// Checks the configuration for values the pipeline cannot run with.
  /// Called by [`init`](crate::init); loaders may also call it early to
  /// fail fast.
  pub fn validate(&self) -> Result<()> {
    if self.async_logging && self.queue_capacity == 0 {
      return Err(Error::InvalidConfigValue {
        field: "queue_capacity".to_string(),
        message: "must be at least 1 when async_logging is enabled".to_string(),
      });
    }
    if self.log_to_file {
      if self.output_dir.as_os_str().is_empty() {
        return Err(Error::InvalidConfigValue {
          field: "output_dir".to_string(),
          message: "must not be empty when log_to_file is enabled".to_string(),
        });
      }
      if self.max_file_size_bytes == 0 {
        return Err(Error::InvalidConfigValue {
          field: "max_file_size_bytes".to_string(),
          message: "must be at least 1 byte".to_string(),
        });
      }
      if self.retained_file_count == 0 {
        return Err(Error::InvalidConfigValue {
          field: "retained_file_count".to_string(),
          message: "must keep at least one rotated generation".to_string(),
        });
      }
    }
    // An invalid strftime string would otherwise surface as a formatting
    // panic on the first rendered record.
    if StrftimeItems::new(&self.datetime_format).any(|item| matches!(item, Item::Error)) {
      return Err(Error::InvalidConfigValue {
        field: "datetime_format".to_string(),
        message: format!("'{}' is not a valid strftime format", self.datetime_format),
      });
    }
    Ok(())
  }

  /// Fills derived fields. Currently: an empty `base_name` becomes the
  /// program name (file stem of the current executable).
  pub(crate) fn resolve(mut self) -> Self {
    if self.base_name.is_empty() {
      self.base_name = program_name();
    }
    self
  }
}

fn program_name() -> String {
  std::env::current_exe()
    .ok()
    .as_deref()
    .and_then(|p| p.file_stem())
    .and_then(|s| s.to_str())
    .map(|s| s.to_string())
    .unwrap_or_else(|| "logpipe".to_string())
}
