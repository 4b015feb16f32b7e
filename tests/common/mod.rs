#![allow(dead_code)]

//! Shared fixtures for the behavioral suites.
//!
//! The pipeline is a process-wide singleton, so tests inside one binary
//! serialize on [`pipeline_lock`]; separate test binaries are separate
//! processes and need no coordination.

use logpipe::{Config, Level};

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};

static PIPELINE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn pipeline_lock() -> MutexGuard<'static, ()> {
  PIPELINE_LOCK.lock()
}

/// File-only configuration with a format that keeps assertions literal:
/// each line is just the (indented) message body.
pub fn file_config(dir: &Path) -> Config {
  Config {
    log_to_file: true,
    log_to_console: false,
    output_dir: dir.to_path_buf(),
    base_name: "suite".to_string(),
    min_level_file: Level::Trace,
    line_format: "{indent}{message}".to_string(),
    colorize: false,
    ..Config::default()
  }
}

pub fn level_file(dir: &Path, level: Level) -> PathBuf {
  dir.join(format!("suite.{}", level.long_name()))
}

pub fn read_lines(path: &Path) -> Vec<String> {
  fs::read_to_string(path)
    .unwrap_or_default()
    .lines()
    .map(str::to_string)
    .collect()
}
