//! Error types for the panel core.

use std::io;

/// Errors that can occur in the panel core.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Reading or writing persisted UI state failed.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// The settings file could not be parsed.
    #[error("config error: {0}")]
    ConfigError(String),

    /// A shortcut handler was requested by a name no action answers to.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A theme colour is not a `#rrggbb` hex string.
    #[error("invalid colour: {0}")]
    InvalidColor(String),

    /// An I/O error occurred.
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for panel results.
pub type PanelResult<T> = Result<T, PanelError>;
