//! Error types for the help DSL, the command registry, and dispatch.

use optscan_core::SpecError;
use thiserror::Error;

/// Errors raised while reading help text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelpError {
    /// `@include` names a group that was never defined with `@group`.
    #[error("line {line}: unknown option group '{group}'")]
    UnknownGroup { group: String, line: usize },

    /// Two headers resolve to the same command path.
    #[error("duplicate help section: '{0}'")]
    DuplicateSection(String),

    /// A section's options do not form a valid option table.
    #[error("invalid options in section '{path}': {source}")]
    InvalidSection {
        path: String,
        #[source]
        source: SpecError,
    },

    /// No section exists for the requested command path.
    #[error("no help section for '{0}'")]
    UnknownSection(String),
}

/// Errors raised while building a [`CommandRegistry`](crate::CommandRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command already registered: '{0}'")]
    DuplicateCommand(String),
}

/// Failure reported by a command handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while dispatching a command line.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The command path names no section or has no registered handler.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error(transparent)]
    Help(#[from] HelpError),

    #[error("command '{path}' failed: {source}")]
    Handler {
        path: String,
        #[source]
        source: HandlerError,
    },
}

/// Convenience alias for results with [`HelpError`].
pub type Result<T> = std::result::Result<T, HelpError>;
