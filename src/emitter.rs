//! Rendering records into lines and routing them to destinations.
//!
//! Exactly one `Emitter` exists per pipeline. In sync mode it sits behind
//! the emission lock; in async mode it is owned by the worker thread. Both
//! arrangements guarantee single-writer access, so nothing here needs its
//! own locking.

use crate::colors;
use crate::config::Config;
use crate::diagnostics::Reporter;
use crate::record::LogRecord;
use crate::sink::SinkSet;
use crate::template;

use std::io::{self, Write};
use std::sync::Arc;

/// Which tags the active line format actually uses. Computed once so the
/// per-record cost of an unused tag (datetime formatting, file padding) is
/// a boolean test.
struct FormatGates {
  datetime: bool,
  file: bool,
  line: bool,
  indent: bool,
  thread: bool,
}

impl FormatGates {
  fn from_format(format: &str) -> Self {
    Self {
      datetime: template::has_tag(format, "datetime"),
      file: template::has_tag(format, "file"),
      line: template::has_tag(format, "line"),
      indent: template::has_tag(format, "indent"),
      thread: template::has_tag(format, "thread"),
    }
  }
}

pub(crate) struct Emitter {
  config: Arc<Config>,
  gates: FormatGates,
  sinks: Option<SinkSet>,
  reporter: Reporter,
}

impl Emitter {
  pub(crate) fn new(config: Arc<Config>, reporter: Reporter) -> Self {
    let gates = FormatGates::from_format(&config.line_format);
    let sinks = config.log_to_file.then(|| SinkSet::new(&config));
    Self {
      config,
      gates,
      sinks,
      reporter,
    }
  }

  /// Renders `record` through the line format and writes it to every
  /// destination that wants its level. Assembly order: message body first,
  /// then the derived tags, then (console only) colors; unresolved tags are
  /// erased last.
  pub(crate) fn emit(&mut self, record: &LogRecord) {
    let message = template::render_positional(&record.message_template, &record.message_args);

    let datetime = self.gates.datetime.then(|| {
      record.format_timestamp(&self.config.datetime_format, self.config.datetime_precision)
    });
    let file = self
      .gates
      .file
      .then(|| record.file_display(
        self.config.max_filename_display_len,
        self.config.max_line_number_display_len,
      ));
    let line_number = self.gates.line.then(|| record.line.to_string());
    let indent = self
      .gates
      .indent
      .then(|| " ".repeat(record.indent_depth * self.config.scoped_indent_width));

    let mut bindings: Vec<(&str, &str)> = vec![
      ("message", message.as_str()),
      ("level", record.level.short_name()),
    ];
    if let Some(value) = datetime.as_deref() {
      bindings.push(("datetime", value));
    }
    if let Some(value) = file.as_deref() {
      bindings.push(("file", value));
    }
    if let Some(value) = line_number.as_deref() {
      bindings.push(("line", value));
    }
    if let Some(value) = indent.as_deref() {
      bindings.push(("indent", value));
    }
    if self.gates.thread {
      bindings.push(("thread", record.thread.as_deref().unwrap_or("")));
    }

    let rendered = template::render(&self.config.line_format, bindings);

    if self.config.log_to_console && record.level >= self.config.min_level_console {
      let console_line = if self.config.colorize {
        template::erase_tags(&template::render(
          &rendered,
          colors::color_bindings(record.level),
        ))
      } else {
        template::erase_tags(&rendered)
      };
      // A dead console is not worth disabling the pipeline over.
      let mut stderr = io::stderr().lock();
      let _ = writeln!(stderr, "{}", console_line);
    }

    if let Some(sinks) = self.sinks.as_mut() {
      if record.level >= self.config.min_level_file {
        let plain_line = template::erase_tags(&rendered);
        sinks.write(record.level, &plain_line, &self.reporter);
      }
    }
  }

  pub(crate) fn flush(&mut self) {
    if let Some(sinks) = self.sinks.as_mut() {
      sinks.flush(&self.reporter);
    }
  }
}
