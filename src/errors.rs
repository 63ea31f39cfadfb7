//! Error types for settings loading and the run routine

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving [`Settings`](crate::config::Settings).
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Invalid { message: String },
}

/// Errors a [`Runner`](crate::runner::Runner) can report instead of a plain
/// success/failure flag.
#[derive(Error, Debug)]
pub enum RunError {
    /// The user pressed Ctrl-C while the run routine was active.
    #[error("command cancelled")]
    Interrupted,

    /// The options are inconsistent; reported like a parser error.
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Interrupted => crate::exitcode::OK,
            RunError::Usage(_) => crate::exitcode::USAGE,
            RunError::Settings(_) | RunError::Io { .. } => crate::exitcode::FAILURE,
        }
    }
}

/// Result type for run routines.
pub type RunResult<T> = Result<T, RunError>;
