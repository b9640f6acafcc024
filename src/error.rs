//! Error taxonomy for the simulation core.
//!
//! Only construction-time problems are represented here. Degenerate spawn
//! attempts, duplicate ids and stale generator references are recovered
//! where they happen (logged and skipped) and never reach the caller, so
//! nothing inside a tick can halt the clock.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building simulation parts or loading configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Invalid construction parameters (negative duration, empty grid, zero cadence).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The INI configuration file could not be read or written.
    #[error("config file {path:?}: {reason}")]
    ConfigFile {
        /// File that failed.
        path: PathBuf,
        /// Reason reported by the parser or the filesystem.
        reason: String,
    },
    /// A recorded frame could not be serialized or written out.
    #[error("frame dump {path:?}: {reason}")]
    FrameDump {
        /// Destination of the dump.
        path: PathBuf,
        /// Serializer or filesystem error.
        reason: String,
    },
}

impl SimError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        SimError::Configuration(message.into())
    }
}
