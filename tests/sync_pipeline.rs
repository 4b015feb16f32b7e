mod common;

use common::{file_config, level_file, pipeline_lock, read_lines};
use logpipe::{Config, Level};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn test_single_thread_output_order_equals_call_order() {
  let _guard = pipeline_lock();
  let dir = tempdir().unwrap();
  let handle = logpipe::init(file_config(dir.path())).unwrap();

  for i in 0..100 {
    logpipe::log_info!("record {}", i);
  }
  drop(handle);

  let lines = read_lines(&level_file(dir.path(), Level::Info));
  let expected: Vec<String> = (0..100).map(|i| format!("record {}", i)).collect();
  assert_eq!(lines, expected);
}

#[test]
fn test_records_cascade_to_every_file_at_or_below_their_level() {
  let _guard = pipeline_lock();
  let dir = tempdir().unwrap();
  let handle = logpipe::init(file_config(dir.path())).unwrap();

  logpipe::log_error!("bad");
  logpipe::log_info!("fine");
  drop(handle);

  // ERROR lands everywhere from TRACE up to ERROR; INFO stops at INFO.
  for level in [Level::Trace, Level::Debug, Level::Info] {
    assert_eq!(read_lines(&level_file(dir.path(), level)), ["bad", "fine"]);
  }
  assert_eq!(read_lines(&level_file(dir.path(), Level::Warning)), ["bad"]);
  assert_eq!(read_lines(&level_file(dir.path(), Level::Error)), ["bad"]);
  assert!(!level_file(dir.path(), Level::Fatal).exists());
}

#[test]
fn test_filtered_levels_produce_no_output() {
  let _guard = pipeline_lock();
  let dir = tempdir().unwrap();
  let config = Config {
    min_level_file: Level::Warning,
    ..file_config(dir.path())
  };
  let handle = logpipe::init(config).unwrap();

  logpipe::log_trace!("invisible");
  logpipe::log_debug!("invisible");
  logpipe::log_info!("invisible");
  logpipe::log_warning!("visible");
  drop(handle);

  assert!(!level_file(dir.path(), Level::Trace).exists());
  assert!(!level_file(dir.path(), Level::Info).exists());
  assert_eq!(read_lines(&level_file(dir.path(), Level::Warning)), ["visible"]);
}

#[test]
fn test_verbosity_above_ceiling_is_rejected() {
  let _guard = pipeline_lock();
  let dir = tempdir().unwrap();
  let config = Config {
    verbosity_ceiling: 1,
    ..file_config(dir.path())
  };
  let handle = logpipe::init(config).unwrap();

  logpipe::vlog!(0, Level::Info, "base detail");
  logpipe::vlog!(1, Level::Info, "fine detail");
  logpipe::vlog!(2, Level::Info, "too chatty");
  // Verbosity gates independently of level.
  logpipe::vlog!(2, Level::Error, "too chatty, still");
  drop(handle);

  let lines = read_lines(&level_file(dir.path(), Level::Info));
  assert_eq!(lines, ["base detail", "fine detail"]);
  assert!(!level_file(dir.path(), Level::Error).exists());
}

#[test]
fn test_call_site_limit_macros() {
  let _guard = pipeline_lock();
  let dir = tempdir().unwrap();
  let handle = logpipe::init(file_config(dir.path())).unwrap();

  for i in 0..10 {
    logpipe::log_first!(3, Level::Info, "first {}", i);
  }
  for _ in 0..10 {
    logpipe::log_every!(std::time::Duration::from_secs(3600), Level::Info, "rare");
  }
  drop(handle);

  let lines = read_lines(&level_file(dir.path(), Level::Info));
  assert_eq!(lines, ["first 0", "first 1", "first 2", "rare"]);
}

#[test]
fn test_sync_mode_reports_nothing_pending_and_reinit_is_rejected_while_live() {
  let _guard = pipeline_lock();
  let dir = tempdir().unwrap();
  let handle = logpipe::init(file_config(dir.path())).unwrap();

  logpipe::log_info!("one");
  assert_eq!(logpipe::messages_pending(), 0);

  let second = logpipe::init(file_config(dir.path()));
  assert!(matches!(second, Err(logpipe::Error::AlreadyInitialized)));
  drop(handle);
}
