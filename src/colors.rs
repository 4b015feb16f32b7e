//! ANSI color and style sequences for console output.

use crate::level::Level;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const ITALIC: &str = "\x1b[3m";

pub const BLACK: &str = "\x1b[30m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

/// Bold black reads as gray on most terminals.
pub const GRAY: &str = "\x1b[30m\x1b[1m";

const RED_BOLD: &str = "\x1b[31m\x1b[1m";
const YELLOW_BOLD: &str = "\x1b[33m\x1b[1m";
#[cfg(not(windows))]
const INFO_COLOR: &str = "\x1b[34m\x1b[1m";
// Legacy Windows consoles render bold blue nearly black; cyan stays legible.
#[cfg(windows)]
const INFO_COLOR: &str = "\x1b[36m\x1b[1m";

/// The `{lc}` (level color) sequence for a severity.
pub fn level_color(level: Level) -> &'static str {
  match level {
    Level::Trace | Level::Debug => GRAY,
    Level::Info => INFO_COLOR,
    Level::Warning => YELLOW_BOLD,
    Level::Error | Level::Fatal => RED_BOLD,
  }
}

/// Tag bindings for one colorized console line.
pub fn color_bindings(level: Level) -> [(&'static str, &'static str); 13] {
  [
    ("lc", level_color(level)),
    ("nc", RESET),
    ("bold", BOLD),
    ("italic", ITALIC),
    ("black", BLACK),
    ("red", RED),
    ("green", GREEN),
    ("yellow", YELLOW),
    ("blue", BLUE),
    ("magenta", MAGENTA),
    ("cyan", CYAN),
    ("white", WHITE),
    ("gray", GRAY),
  ]
}
