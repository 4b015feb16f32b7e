//! Record acceptance policy.
//!
//! Built once from the resolved [`Config`] and queried before a record is
//! buffered, queued, or rendered, so rejected records cost nothing past
//! this check. The emit path later re-derives the per-destination terms
//! (console vs. file minimum) from the same immutable config, so the two
//! evaluations cannot disagree.

use crate::config::Config;
use crate::level::Level;

#[derive(Debug, Clone, Copy)]
pub(crate) struct AcceptancePolicy {
  console_min: Option<Level>,
  file_min: Option<Level>,
  verbosity_ceiling: u32,
}

impl AcceptancePolicy {
  pub(crate) fn from_config(config: &Config) -> Self {
    Self {
      console_min: config.log_to_console.then_some(config.min_level_console),
      file_min: config.log_to_file.then_some(config.min_level_file),
      verbosity_ceiling: config.verbosity_ceiling,
    }
  }

  /// A record is accepted when its verbosity fits the ceiling and at least
  /// one enabled destination wants its level.
  pub(crate) fn accepts(&self, level: Level, verbosity: u32) -> bool {
    if verbosity > self.verbosity_ceiling {
      return false;
    }
    let console_wants = self.console_min.is_some_and(|min| level >= min);
    let file_wants = self.file_min.is_some_and(|min| level >= min);
    console_wants || file_wants
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn policy(config: Config) -> AcceptancePolicy {
    AcceptancePolicy::from_config(&config)
  }

  #[test]
  fn test_accepts_when_either_destination_wants_the_level() {
    let policy = policy(Config {
      log_to_console: true,
      log_to_file: true,
      min_level_console: Level::Error,
      min_level_file: Level::Debug,
      ..Config::default()
    });
    // Below the console minimum but at the file minimum.
    assert!(policy.accepts(Level::Debug, 0));
    assert!(policy.accepts(Level::Error, 0));
    assert!(!policy.accepts(Level::Trace, 0));
  }

  #[test]
  fn test_rejects_everything_when_both_destinations_disabled() {
    let policy = policy(Config {
      log_to_console: false,
      log_to_file: false,
      ..Config::default()
    });
    assert!(!policy.accepts(Level::Fatal, 0));
  }

  #[test]
  fn test_verbosity_ceiling_applies_regardless_of_level() {
    let policy = policy(Config {
      log_to_console: true,
      min_level_console: Level::Trace,
      verbosity_ceiling: 2,
      ..Config::default()
    });
    assert!(policy.accepts(Level::Fatal, 2));
    assert!(!policy.accepts(Level::Fatal, 3));
    assert!(policy.accepts(Level::Trace, 0));
  }
}
