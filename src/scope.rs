//! Scoped logging: entry/exit markers with nesting indentation.
//!
//! The depth counter is thread-local, so concurrent scopes on different
//! threads never see each other's indentation. Each record snapshots the
//! depth at capture time ([`crate::record`]), which makes async delivery
//! reproduce the producer's nesting exactly.

use crate::level::Level;
use crate::pipeline;

use std::cell::Cell;

thread_local! {
  static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Current thread's scope nesting depth.
pub(crate) fn current_depth() -> usize {
  DEPTH.with(Cell::get)
}

/// RAII guard for one logging scope.
///
/// [`ScopeGuard::enter`] emits a `+ name` marker and bumps the thread's
/// depth; dropping the guard undoes the bump and emits `- name`. A guard
/// whose entry marker was filtered out (or taken before the pipeline was
/// ready, or with scoped logging disabled) is inert: it neither emits nor
/// touches the counter, so markers always pair and the depth can never go
/// negative.
#[must_use = "dropping the guard immediately closes the scope"]
pub struct ScopeGuard {
  name: Option<String>,
  level: Level,
  file: String,
  line: u32,
}

impl ScopeGuard {
  pub fn enter(level: Level, name: &str, file: &str, line: u32) -> Self {
    if !pipeline::scope_enabled(level) {
      return Self {
        name: None,
        level,
        file: String::new(),
        line,
      };
    }
    pipeline::emit(level, 0, file, line, &format!("+ {}", name), Vec::new());
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    Self {
      name: Some(name.to_string()),
      level,
      file: file.to_string(),
      line,
    }
  }
}

impl Drop for ScopeGuard {
  fn drop(&mut self) {
    if let Some(name) = self.name.take() {
      DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
      pipeline::emit(
        self.level,
        0,
        &self.file,
        self.line,
        &format!("- {}", name),
        Vec::new(),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_depth_starts_at_zero() {
    assert_eq!(current_depth(), 0);
  }

  #[test]
  fn test_inert_guard_leaves_depth_untouched() {
    // No pipeline is installed in unit tests, so every guard is inert.
    let before = current_depth();
    {
      let _guard = ScopeGuard::enter(Level::Info, "noop", file!(), line!());
      assert_eq!(current_depth(), before);
    }
    assert_eq!(current_depth(), before);
  }
}
