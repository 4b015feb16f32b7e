use crate::error::Error;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Message severity, ordered from least to most severe.
///
/// The ordering is total: `Level::Trace < Level::Fatal`. Filtering and the
/// per-level file cascade both rely on this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
  Trace = 0,
  Debug = 1,
  Info = 2,
  Warning = 3,
  Error = 4,
  Fatal = 5,
}

impl Level {
  /// All levels, in ascending severity order.
  pub const ALL: [Level; 6] = [
    Level::Trace,
    Level::Debug,
    Level::Info,
    Level::Warning,
    Level::Error,
    Level::Fatal,
  ];

  /// Single-letter form used by the `{level}` line tag.
  pub fn short_name(&self) -> &'static str {
    match self {
      Level::Trace => "T",
      Level::Debug => "D",
      Level::Info => "I",
      Level::Warning => "W",
      Level::Error => "E",
      Level::Fatal => "F",
    }
  }

  /// Full name, used in destination file suffixes and `Display`.
  pub fn long_name(&self) -> &'static str {
    match self {
      Level::Trace => "TRACE",
      Level::Debug => "DEBUG",
      Level::Info => "INFO",
      Level::Warning => "WARNING",
      Level::Error => "ERROR",
      Level::Fatal => "FATAL",
    }
  }

  pub(crate) fn index(&self) -> usize {
    *self as usize
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.long_name())
  }
}

impl FromStr for Level {
  type Err = Error;

  /// Case-insensitive parse. Unknown names are an error, never a default.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "TRACE" => Ok(Level::Trace),
      "DEBUG" => Ok(Level::Debug),
      "INFO" => Ok(Level::Info),
      "WARNING" => Ok(Level::Warning),
      "ERROR" => Ok(Level::Error),
      "FATAL" => Ok(Level::Fatal),
      _ => Err(Error::InvalidLevel(s.to_string())),
    }
  }
}
