//! The async delivery worker.
//!
//! One consumer thread drains the bounded queue in FIFO order and owns the
//! [`Emitter`] outright, so rendering and file I/O never run under a lock
//! producers can see. Producers block in `send` when the queue is full;
//! crossbeam parks them until the worker frees a slot. Dropping the last
//! sender disconnects the channel, which the worker treats as the shutdown
//! signal: it finishes draining whatever is already queued, flushes, and
//! exits.

use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::record::LogRecord;

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

pub(crate) const WORKER_THREAD_NAME: &str = "logpipe-worker";

/// One delivery queue entry.
pub(crate) enum QueueItem {
  Record(LogRecord),
  /// Drain barrier: the worker acks after flushing everything queued ahead
  /// of it. Used by `flush`, and by FATAL delivery to order the write
  /// before process exit.
  Flush(Sender<()>),
}

pub(crate) fn spawn(receiver: Receiver<QueueItem>, mut emitter: Emitter) -> Result<JoinHandle<()>> {
  thread::Builder::new()
    .name(WORKER_THREAD_NAME.to_string())
    .spawn(move || {
      for item in receiver {
        match item {
          QueueItem::Record(record) => emitter.emit(&record),
          QueueItem::Flush(ack) => {
            emitter.flush();
            // The requester may have given up waiting; that is fine.
            let _ = ack.send(());
          }
        }
      }
      // Channel disconnected: every queued record has been delivered.
      emitter.flush();
    })
    .map_err(|source| Error::WorkerSpawn { source })
}
