//! Internal error reporting.
//!
//! I/O failures inside the emit path (sink open, write, rotation) cannot be
//! returned to the caller that triggered them. They are surfaced as
//! [`ErrorReport`] values on a bounded channel when the configuration asks
//! for it, with an `eprintln!` fallback otherwise, so a broken destination
//! is disabled quietly instead of crashing the pipeline.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

const REPORT_CHANNEL_CAPACITY: usize = 256;

/// Where inside the pipeline an internal error originated.
#[derive(Debug)]
pub enum ErrorSource {
  SinkOpen { path: PathBuf },
  SinkWrite { path: PathBuf },
  SinkRotate { path: PathBuf },
}

impl fmt::Display for ErrorSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorSource::SinkOpen { path } => write!(f, "opening {:?}", path),
      ErrorSource::SinkWrite { path } => write!(f, "writing {:?}", path),
      ErrorSource::SinkRotate { path } => write!(f, "rotating {:?}", path),
    }
  }
}

/// One internal failure, delivered on [`crate::LoggerHandle::error_reports`]
/// when reporting is enabled.
#[derive(Debug)]
pub struct ErrorReport {
  pub source: ErrorSource,
  pub message: String,
  pub timestamp: DateTime<Local>,
}

impl ErrorReport {
  fn new(source: ErrorSource, error: &dyn std::error::Error) -> Self {
    Self {
      source,
      message: error.to_string(),
      timestamp: Local::now(),
    }
  }
}

/// Sending half of the report channel, owned by the emitter.
#[derive(Debug, Clone)]
pub(crate) struct Reporter {
  tx: Option<Sender<ErrorReport>>,
}

impl Reporter {
  /// A reporter plus the receiver the embedding application reads, or
  /// `None` when reporting is disabled and stderr is the only outlet.
  pub(crate) fn new(enabled: bool) -> (Self, Option<Receiver<ErrorReport>>) {
    if enabled {
      let (tx, rx) = bounded(REPORT_CHANNEL_CAPACITY);
      (Self { tx: Some(tx) }, Some(rx))
    } else {
      (Self { tx: None }, None)
    }
  }

  pub(crate) fn disabled() -> Self {
    Self { tx: None }
  }

  /// Never blocks: a full channel drops the report onto stderr instead.
  pub(crate) fn report(&self, source: ErrorSource, error: &dyn std::error::Error) {
    match &self.tx {
      Some(tx) => {
        if let Err(TrySendError::Full(report)) = tx.try_send(ErrorReport::new(source, error)) {
          eprintln!(
            "[logpipe:WARN] internal error channel full, dropping report: {}: {}",
            report.source, report.message
          );
        }
      }
      None => eprintln!("[logpipe:WARN] {}: {}", source, error),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io;

  #[test]
  fn test_enabled_reporter_delivers_reports() {
    let (reporter, rx) = Reporter::new(true);
    let rx = rx.unwrap();
    let error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    reporter.report(
      ErrorSource::SinkOpen {
        path: PathBuf::from("/var/log/app.ERROR"),
      },
      &error,
    );
    let report = rx.try_recv().unwrap();
    assert!(matches!(report.source, ErrorSource::SinkOpen { .. }));
    assert_eq!(report.message, "denied");
  }

  #[test]
  fn test_disabled_reporter_has_no_receiver() {
    let (reporter, rx) = Reporter::new(false);
    assert!(rx.is_none());
    // Falls back to stderr without panicking.
    let error = io::Error::new(io::ErrorKind::Other, "boom");
    reporter.report(
      ErrorSource::SinkWrite {
        path: PathBuf::from("x"),
      },
      &error,
    );
  }
}
