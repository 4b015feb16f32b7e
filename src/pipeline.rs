//! The pipeline facade: the global entry point every record goes through.
//!
//! One pipeline exists per process, installed by [`init`] and torn down by
//! [`finish`] (or by dropping the [`LoggerHandle`]). Records emitted before
//! `init` land in the pre-init buffer and replay, once, when the pipeline
//! comes up; records emitted after `finish` are discarded. Delivery is
//! either inline under the emission lock (sync mode) or through the bounded
//! queue and worker thread (async mode), fixed for the pipeline's lifetime.

use crate::config::Config;
use crate::diagnostics::{ErrorReport, Reporter};
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::filter::AcceptancePolicy;
use crate::level::Level;
use crate::record::LogRecord;
use crate::template;
use crate::worker::{self, QueueItem};

use std::process;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

/// The installed pipeline. Readers clone the `Arc` and release the lock
/// before doing any real work, so `finish` (the only writer) never waits on
/// a slow emission.
static PIPELINE: Lazy<RwLock<Option<Arc<Pipeline>>>> = Lazy::new(|| RwLock::new(None));

/// Records captured before `init`. `Some` exactly until the first flush;
/// `None` forever after, making the replay a one-shot transition.
static PRE_INIT: Lazy<Mutex<Option<Vec<LogRecord>>>> =
  Lazy::new(|| Mutex::new(Some(Vec::new())));

enum DeliveryMode {
  /// The caller's thread renders and writes, serialized by this lock.
  Sync { emitter: Mutex<Emitter> },
  /// The caller's thread enqueues; the worker renders and writes. The
  /// sender lives behind an `Option` so `finish` can drop it (signalling
  /// the worker to drain and exit) while emitters still hold the `Arc`.
  Async {
    sender: Mutex<Option<Sender<QueueItem>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
  },
}

pub(crate) struct Pipeline {
  config: Arc<Config>,
  policy: AcceptancePolicy,
  capture_thread: bool,
  mode: DeliveryMode,
}

impl Pipeline {
  fn build(config: Arc<Config>, reporter: Reporter) -> Result<Self> {
    let policy = AcceptancePolicy::from_config(&config);
    let capture_thread = template::has_tag(&config.line_format, "thread");
    let emitter = Emitter::new(Arc::clone(&config), reporter);
    let mode = if config.async_logging {
      let (sender, receiver) = bounded(config.queue_capacity);
      let handle = worker::spawn(receiver, emitter)?;
      DeliveryMode::Async {
        sender: Mutex::new(Some(sender)),
        worker: Mutex::new(Some(handle)),
      }
    } else {
      DeliveryMode::Sync {
        emitter: Mutex::new(emitter),
      }
    };
    Ok(Self {
      config,
      policy,
      capture_thread,
      mode,
    })
  }

  fn accept(
    &self,
    level: Level,
    verbosity: u32,
    file: &str,
    line: u32,
    message_template: &str,
    message_args: Vec<String>,
  ) {
    if !self.policy.accepts(level, verbosity) {
      if level == Level::Fatal {
        // Nothing to deliver, but FATAL still terminates.
        process::exit(1);
      }
      return;
    }
    let record = LogRecord::capture(
      level,
      verbosity,
      file,
      line,
      message_template,
      message_args,
      self.capture_thread,
    );
    self.deliver(record);
    if level == Level::Fatal {
      // The drain barrier (async) or the flush itself (sync) orders the
      // write before termination.
      self.flush();
      process::exit(1);
    }
  }

  fn replay(&self, record: LogRecord) {
    if self.policy.accepts(record.level, record.verbosity) {
      self.deliver(record);
    }
  }

  fn deliver(&self, record: LogRecord) {
    match &self.mode {
      DeliveryMode::Sync { emitter } => emitter.lock().emit(&record),
      DeliveryMode::Async { sender, .. } => {
        let sender = sender.lock().clone();
        if let Some(sender) = sender {
          // Blocking send: backpressure, never a silent drop.
          let _ = sender.send(QueueItem::Record(record));
        }
      }
    }
  }

  fn flush(&self) {
    match &self.mode {
      DeliveryMode::Sync { emitter } => emitter.lock().flush(),
      DeliveryMode::Async { sender, .. } => {
        let sender = sender.lock().clone();
        if let Some(sender) = sender {
          let (ack_tx, ack_rx) = bounded(1);
          if sender.send(QueueItem::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
          }
        }
      }
    }
  }

  fn shut_down(&self) {
    match &self.mode {
      DeliveryMode::Sync { emitter } => emitter.lock().flush(),
      DeliveryMode::Async { sender, worker } => {
        // Dropping the sender disconnects the channel; the worker drains
        // what is queued, flushes, and exits.
        drop(sender.lock().take());
        if let Some(handle) = worker.lock().take() {
          let _ = handle.join();
        }
      }
    }
  }

  fn pending(&self) -> usize {
    match &self.mode {
      DeliveryMode::Sync { .. } => 0,
      DeliveryMode::Async { sender, .. } => {
        sender.lock().as_ref().map_or(0, Sender::len)
      }
    }
  }
}

/// Owner of the running pipeline's lifetime.
///
/// Dropping the handle runs [`finish`]: the queue is drained, the worker
/// joined, and every destination flushed and closed. Keep it alive for as
/// long as logging should work.
#[must_use = "dropping the LoggerHandle shuts the pipeline down"]
pub struct LoggerHandle {
  reports: Option<Receiver<ErrorReport>>,
}

impl LoggerHandle {
  /// Takes the internal-error report receiver. `None` unless the
  /// configuration set `report_internal_errors`, or after the first call.
  pub fn error_reports(&mut self) -> Option<Receiver<ErrorReport>> {
    self.reports.take()
  }
}

impl Drop for LoggerHandle {
  fn drop(&mut self) {
    finish();
  }
}

/// Validates and resolves `config`, starts the pipeline, and replays the
/// pre-init buffer through it.
///
/// Fails with [`Error::AlreadyInitialized`] while another pipeline is
/// installed; after [`finish`] a fresh `init` is allowed (the pre-init
/// replay still happens only once per process).
pub fn init(config: Config) -> Result<LoggerHandle> {
  let mut slot = PIPELINE.write();
  if slot.is_some() {
    return Err(Error::AlreadyInitialized);
  }
  config.validate()?;
  let config = config.resolve();
  if config.log_to_file {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| Error::DirectoryCreate {
      path: config.output_dir.clone(),
      source,
    })?;
  }

  let (reporter, reports) = Reporter::new(config.report_internal_errors);
  let config = Arc::new(config);
  let pipeline = Arc::new(Pipeline::build(config, reporter)?);

  // One-shot replay, performed while the write lock is still held so no
  // thread can observe the installed pipeline ahead of its buffered
  // predecessors.
  let buffered = PRE_INIT.lock().take();
  if let Some(buffered) = buffered {
    if !buffered.is_empty() {
      pipeline.accept(
        Level::Info,
        0,
        file!(),
        line!(),
        "logging pipeline initialized, replaying {} buffered record(s)",
        vec![buffered.len().to_string()],
      );
      for record in buffered {
        pipeline.replay(record);
      }
    }
  }

  *slot = Some(pipeline);
  Ok(LoggerHandle { reports })
}

/// Stops accepting records, drains the queue, joins the worker, and closes
/// every destination. Idempotent; also run by [`LoggerHandle`]'s drop.
pub fn finish() {
  let pipeline = PIPELINE.write().take();
  if let Some(pipeline) = pipeline {
    pipeline.shut_down();
  }
}

/// Emits one record through the pipeline.
///
/// `file` may be a full path (the crate's macros pass `file!()`); only its
/// basename is kept. Before `init` the record is buffered; after `finish`
/// it is discarded. A FATAL record terminates the process with status 1
/// once it has been written.
pub fn emit(
  level: Level,
  verbosity: u32,
  file: &str,
  line: u32,
  message_template: &str,
  message_args: Vec<String>,
) {
  let pipeline = PIPELINE.read().clone();
  match pipeline {
    Some(pipeline) => pipeline.accept(level, verbosity, file, line, message_template, message_args),
    None => pre_init_emit(level, verbosity, file, line, message_template, message_args),
  }
}

/// Convenience wrapper over [`emit`] for an already-formatted body.
pub fn emit_formatted(level: Level, file: &str, line: u32, args: std::fmt::Arguments<'_>) {
  emit(level, 0, file, line, &args.to_string(), Vec::new());
}

fn pre_init_emit(
  level: Level,
  verbosity: u32,
  file: &str,
  line: u32,
  message_template: &str,
  message_args: Vec<String>,
) {
  // No config exists yet, so no filtering either; the replay filters.
  let record = LogRecord::capture(level, verbosity, file, line, message_template, message_args, true);
  if level == Level::Fatal {
    // Straight to stderr in the default format, uncolored, then exit.
    let config = Arc::new(Config {
      log_to_console: true,
      log_to_file: false,
      colorize: false,
      ..Config::default()
    });
    let mut emitter = Emitter::new(config, Reporter::disabled());
    emitter.emit(&record);
    emitter.flush();
    process::exit(1);
  }
  {
    let mut buffer = PRE_INIT.lock();
    if let Some(buffer) = buffer.as_mut() {
      buffer.push(record);
      return;
    }
  }
  // The buffer is already retired: an `init` overtook this producer between
  // its slot read and now. Deliver through the pipeline that init
  // installed; only when that is gone too (post-finish) is the record
  // discarded.
  let pipeline = PIPELINE.read().clone();
  if let Some(pipeline) = pipeline {
    pipeline.replay(record);
  }
}

/// Blocks until every record accepted so far has been written.
pub fn flush() {
  let pipeline = PIPELINE.read().clone();
  if let Some(pipeline) = pipeline {
    pipeline.flush();
  }
}

/// Current delivery-queue depth (async mode), the pre-init buffer depth
/// before `init`, and 0 otherwise. Diagnostic; racy by nature.
pub fn messages_pending() -> usize {
  if let Some(pipeline) = PIPELINE.read().as_ref() {
    return pipeline.pending();
  }
  PRE_INIT.lock().as_ref().map_or(0, Vec::len)
}

/// Whether a scope entered at `level` should emit markers and indent.
pub(crate) fn scope_enabled(level: Level) -> bool {
  match PIPELINE.read().as_ref() {
    Some(pipeline) => pipeline.config.scoped_logging && pipeline.policy.accepts(level, 0),
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  // A producer can read the pipeline slot as empty, get preempted, and
  // resume after `init` has retired the pre-init buffer. Its record must
  // still reach the installed pipeline rather than vanish.
  #[test]
  fn test_record_arriving_after_buffer_retirement_is_delivered() {
    let dir = tempdir().unwrap();
    let config = Config {
      log_to_file: true,
      log_to_console: false,
      output_dir: dir.path().to_path_buf(),
      base_name: "late".to_string(),
      min_level_file: Level::Info,
      line_format: "{message}".to_string(),
      scoped_logging: false,
      ..Config::default()
    };
    let handle = init(config).unwrap();

    // The buffer is gone by now; this is the overtaken producer's path.
    pre_init_emit(Level::Info, 0, "pipeline.rs", 1, "late arrival", Vec::new());
    drop(handle);

    let written = std::fs::read_to_string(dir.path().join("late.INFO")).unwrap();
    assert_eq!(written, "late arrival\n");
  }
}
