use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the `logpipe` library.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid log level '{0}': expected TRACE, DEBUG, INFO, WARNING, ERROR or FATAL")]
  InvalidLevel(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },

  #[error("Failed to create log directory {path:?}: {source}")]
  DirectoryCreate {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("Logging pipeline is already initialized")]
  AlreadyInitialized,

  #[error("Failed to start the delivery worker thread: {source}")]
  WorkerSpawn { source: std::io::Error },

  #[error("Failed to install log facade bridge: {0}")]
  BridgeInstall(String),
}

/// A specialized `Result` type for `logpipe` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
