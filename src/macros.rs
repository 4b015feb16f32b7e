//! Call-site macros.
//!
//! All of them capture `file!()`/`line!()` at the call site, stringify the
//! positional arguments, and go through [`crate::emit`]. `{}` slots in the
//! body are filled left to right; the line format's own tags are resolved
//! later, at render time.

/// Base emission macro the level wrappers expand to.
#[macro_export]
macro_rules! log_emit {
  ($level:expr, $verbosity:expr, $template:expr $(, $arg:expr)* $(,)?) => {
    $crate::emit(
      $level,
      $verbosity,
      file!(),
      line!(),
      $template,
      vec![$(($arg).to_string()),*],
    )
  };
}

#[macro_export]
macro_rules! log_trace {
  ($($rest:tt)*) => { $crate::log_emit!($crate::Level::Trace, 0, $($rest)*) };
}

#[macro_export]
macro_rules! log_debug {
  ($($rest:tt)*) => { $crate::log_emit!($crate::Level::Debug, 0, $($rest)*) };
}

#[macro_export]
macro_rules! log_info {
  ($($rest:tt)*) => { $crate::log_emit!($crate::Level::Info, 0, $($rest)*) };
}

#[macro_export]
macro_rules! log_warning {
  ($($rest:tt)*) => { $crate::log_emit!($crate::Level::Warning, 0, $($rest)*) };
}

#[macro_export]
macro_rules! log_error {
  ($($rest:tt)*) => { $crate::log_emit!($crate::Level::Error, 0, $($rest)*) };
}

/// Terminates the process with status 1 after the record is written.
#[macro_export]
macro_rules! log_fatal {
  ($($rest:tt)*) => { $crate::log_emit!($crate::Level::Fatal, 0, $($rest)*) };
}

/// Verbosity-gated emission: dropped whenever `verbosity` exceeds the
/// configured ceiling, regardless of level.
#[macro_export]
macro_rules! vlog {
  ($verbosity:expr, $level:expr, $($rest:tt)*) => {
    $crate::log_emit!($level, $verbosity, $($rest)*)
  };
}

/// Per-call-site rate limit: at most one emission per `period`
/// (a `std::time::Duration`). The first caller in each window wins.
#[macro_export]
macro_rules! log_every {
  ($period:expr, $level:expr, $($rest:tt)*) => {{
    static LAST_EMIT_MS: ::std::sync::atomic::AtomicU64 =
      ::std::sync::atomic::AtomicU64::new(0);
    let now = $crate::__support::now_millis();
    let period_ms = ::std::time::Duration::from($period).as_millis() as u64;
    let last = LAST_EMIT_MS.load(::std::sync::atomic::Ordering::Relaxed);
    let due = last == 0 || now.saturating_sub(last) >= period_ms;
    if due
      && LAST_EMIT_MS
        .compare_exchange(
          last,
          now,
          ::std::sync::atomic::Ordering::Relaxed,
          ::std::sync::atomic::Ordering::Relaxed,
        )
        .is_ok()
    {
      $crate::log_emit!($level, 0, $($rest)*);
    }
  }};
}

/// Per-call-site cap: only the first `n` invocations emit.
#[macro_export]
macro_rules! log_first {
  ($n:expr, $level:expr, $($rest:tt)*) => {{
    static EMITTED: ::std::sync::atomic::AtomicU64 =
      ::std::sync::atomic::AtomicU64::new(0);
    if EMITTED.fetch_add(1, ::std::sync::atomic::Ordering::Relaxed) < ($n as u64) {
      $crate::log_emit!($level, 0, $($rest)*);
    }
  }};
}

/// Opens a logging scope; the returned [`crate::ScopeGuard`] closes it.
#[macro_export]
macro_rules! log_scope {
  ($level:expr, $name:expr) => {
    $crate::ScopeGuard::enter($level, $name, file!(), line!())
  };
}

/// Runtime support for the macros above. Not part of the public API.
#[doc(hidden)]
pub mod __support {
  use once_cell::sync::Lazy;
  use std::time::Instant;

  static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

  /// Milliseconds since first use, offset by 1 so 0 stays "never".
  pub fn now_millis() -> u64 {
    EPOCH.elapsed().as_millis() as u64 + 1
  }
}
