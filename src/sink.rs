//! Per-severity file destinations with size-based rotation.
//!
//! Each level maps to `{output_dir}/{base_name}.{LEVEL}`. Writes cascade: a
//! record lands in every file between the configured file minimum and its
//! own level, so the lowest file carries the full stream and the higher
//! ones only the severe tail. Files open lazily in append mode with the
//! size counter seeded from what is already on disk, rotate into `.old`
//! generations once they exceed the size threshold, and are disabled for
//! the rest of the process on I/O failure.
//!
//! All writes to a given destination happen on one side at a time (the
//! emission lock in sync mode, the single worker in async mode), which is
//! what makes close-rename-reopen rotation atomic here.

use crate::config::Config;
use crate::diagnostics::{ErrorSource, Reporter};
use crate::level::Level;

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct Destination {
  path: PathBuf,
  writer: Option<BufWriter<File>>,
  size: u64,
  disabled: bool,
}

impl Destination {
  fn new(path: PathBuf) -> Self {
    Self {
      path,
      writer: None,
      size: 0,
      disabled: false,
    }
  }

  /// Opens the destination file in append mode, seeding the size counter
  /// from the existing file length so rotation carries across restarts.
  fn open_file(path: &Path) -> std::io::Result<(BufWriter<File>, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((BufWriter::new(file), size))
  }

  fn generation_path(&self, generation: u32) -> PathBuf {
    if generation == 1 {
      PathBuf::from(format!("{}.old", self.path.display()))
    } else {
      PathBuf::from(format!("{}.old.{}", self.path.display(), generation))
    }
  }

  fn write_line(&mut self, line: &str, max_size: u64, retained: u32, reporter: &Reporter) {
    if self.disabled {
      return;
    }
    if self.writer.is_none() {
      match Self::open_file(&self.path) {
        Ok((writer, size)) => {
          self.writer = Some(writer);
          self.size = size;
        }
        Err(error) => {
          self.disabled = true;
          reporter.report(
            ErrorSource::SinkOpen {
              path: self.path.clone(),
            },
            &error,
          );
          return;
        }
      }
    }
    if let Err(error) = self.append(line) {
      self.disabled = true;
      self.writer = None;
      reporter.report(
        ErrorSource::SinkWrite {
          path: self.path.clone(),
        },
        &error,
      );
      return;
    }
    if self.size > max_size {
      if let Err(error) = self.rotate(retained) {
        self.disabled = true;
        self.writer = None;
        reporter.report(
          ErrorSource::SinkRotate {
            path: self.path.clone(),
          },
          &error,
        );
      }
    }
  }

  fn append(&mut self, line: &str) -> std::io::Result<()> {
    if let Some(writer) = self.writer.as_mut() {
      writer.write_all(line.as_bytes())?;
      writer.write_all(b"\n")?;
      self.size += line.len() as u64 + 1;
    }
    Ok(())
  }

  /// Close, shift retained generations, rename, reopen fresh.
  fn rotate(&mut self, retained: u32) -> std::io::Result<()> {
    if let Some(mut writer) = self.writer.take() {
      writer.flush()?;
    }
    // Oldest first: `.old.{n-1}` -> `.old.{n}`, overwriting the last one.
    for generation in (1..retained).rev() {
      let from = self.generation_path(generation);
      if from.exists() {
        let to = self.generation_path(generation + 1);
        let _ = fs::remove_file(&to);
        fs::rename(&from, &to)?;
      }
    }
    // The previous generation 1 may still exist (always, when only one is
    // retained); renaming over it is not portable, so clear it first.
    let oldest = self.generation_path(1);
    let _ = fs::remove_file(&oldest);
    fs::rename(&self.path, &oldest)?;
    let (writer, size) = Self::open_file(&self.path)?;
    self.writer = Some(writer);
    self.size = size;
    Ok(())
  }

  fn flush(&mut self, reporter: &Reporter) {
    if let Some(writer) = self.writer.as_mut() {
      if let Err(error) = writer.flush() {
        self.disabled = true;
        self.writer = None;
        reporter.report(
          ErrorSource::SinkWrite {
            path: self.path.clone(),
          },
          &error,
        );
      }
    }
  }
}

/// The full per-level destination set for one pipeline.
pub(crate) struct SinkSet {
  destinations: Vec<Destination>,
  min_level: Level,
  max_size: u64,
  retained: u32,
}

impl SinkSet {
  pub(crate) fn new(config: &Config) -> Self {
    let destinations = Level::ALL
      .iter()
      .map(|level| {
        Destination::new(
          config
            .output_dir
            .join(format!("{}.{}", config.base_name, level.long_name())),
        )
      })
      .collect();
    Self {
      destinations,
      min_level: config.min_level_file,
      max_size: config.max_file_size_bytes,
      retained: config.retained_file_count,
    }
  }

  /// Cascading write: every destination from the file minimum up to the
  /// record's own level receives the line.
  pub(crate) fn write(&mut self, level: Level, line: &str, reporter: &Reporter) {
    if level < self.min_level {
      return;
    }
    for destination in &mut self.destinations[self.min_level.index()..=level.index()] {
      destination.write_line(line, self.max_size, self.retained, reporter);
    }
  }

  pub(crate) fn flush(&mut self, reporter: &Reporter) {
    for destination in &mut self.destinations {
      destination.flush(reporter);
    }
  }
}
