//! `logpipe` - An embeddable, multi-threaded logging pipeline.
//!
//! Callers emit leveled, templated messages from any thread; the pipeline
//! filters them, renders them through a tag-based line format, and delivers
//! them to the console and/or per-severity rotating files. Delivery is
//! either synchronous (inline, under a single emission lock) or
//! asynchronous (a bounded FIFO queue drained by one worker thread, with
//! blocking backpressure when the queue is full).
//!
//! Records emitted before [`init`] are buffered and replayed, in order,
//! once the pipeline comes up. [`finish`] - or dropping the
//! [`LoggerHandle`] - drains the queue, joins the worker, and flushes every
//! destination before returning.
//!
//! ```no_run
//! let handle = logpipe::init(logpipe::Config::default())?;
//!
//! logpipe::log_info!("listening on port {}", 8080);
//! {
//!   let _scope = logpipe::log_scope!(logpipe::Level::Debug, "startup");
//!   logpipe::log_debug!("loading state");
//! }
//!
//! drop(handle); // drain, flush, close
//! # Ok::<(), logpipe::Error>(())
//! ```

pub mod colors;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod level;
pub mod template;

mod bridge;
mod emitter;
mod filter;
mod macros;
mod pipeline;
mod record;
mod scope;
mod sink;
mod worker;

pub use bridge::install_log_bridge;
pub use config::{Config, DatetimePrecision};
pub use diagnostics::{ErrorReport, ErrorSource};
pub use error::{Error, Result};
pub use level::Level;
pub use pipeline::{emit, emit_formatted, finish, flush, init, messages_pending, LoggerHandle};
pub use scope::ScopeGuard;

#[doc(hidden)]
pub use macros::__support;
