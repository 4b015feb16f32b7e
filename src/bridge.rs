//! Bridge from the `log` facade.
//!
//! Third-party crates that log through `log` can be routed into the
//! pipeline with [`install_log_bridge`]. The adapter formats the record's
//! body eagerly and forwards it through the normal emit path, so bridged
//! records get the same filtering, buffering, and delivery as native ones.

use crate::error::{Error, Result};
use crate::level::Level;
use crate::pipeline;

struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

fn map_level(level: log::Level) -> Level {
  match level {
    log::Level::Error => Level::Error,
    log::Level::Warn => Level::Warning,
    log::Level::Info => Level::Info,
    log::Level::Debug => Level::Debug,
    log::Level::Trace => Level::Trace,
  }
}

impl log::Log for LogBridge {
  fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &log::Record<'_>) {
    if !self.enabled(record.metadata()) {
      return;
    }
    pipeline::emit_formatted(
      map_level(record.level()),
      record.file().unwrap_or(record.target()),
      record.line().unwrap_or(0),
      *record.args(),
    );
  }

  fn flush(&self) {
    crate::flush();
  }
}

/// Registers the pipeline as the `log` crate's global logger.
///
/// `max_level` is `log`'s own coarse gate; records passing it still go
/// through the pipeline's level/verbosity filter. Fails if another logger
/// is already installed.
pub fn install_log_bridge(max_level: log::LevelFilter) -> Result<()> {
  log::set_logger(&BRIDGE).map_err(|e| Error::BridgeInstall(e.to_string()))?;
  log::set_max_level(max_level);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_level_mapping_preserves_severity_order() {
    assert_eq!(map_level(log::Level::Trace), Level::Trace);
    assert_eq!(map_level(log::Level::Debug), Level::Debug);
    assert_eq!(map_level(log::Level::Info), Level::Info);
    assert_eq!(map_level(log::Level::Warn), Level::Warning);
    assert_eq!(map_level(log::Level::Error), Level::Error);
  }
}
