//! Error types for option table construction.
//!
//! Only configuration mistakes are errors. Problems found while scanning
//! command-line tokens are reported as data through
//! [`IllegalUsage`](crate::IllegalUsage).

use thiserror::Error;

/// Option table validation errors.
///
/// Raised when an [`OptionTable`](crate::OptionTable) is built from specs that
/// cannot be resolved unambiguously. These are programmer errors in the
/// option catalogue, not user errors on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// An option has neither a short nor a long form.
    #[error("option must define a short or long form")]
    MissingOptionName,
    /// The short form is a character that cannot be scanned as an option.
    #[error("invalid short option character: {0:?}")]
    InvalidShortOption(char),
    /// The long form is empty, starts with a dash, or contains `=` or whitespace.
    #[error("invalid long option name: {0:?}")]
    InvalidLongOption(String),
    /// `max_occurs` is zero.
    #[error("option {name} must allow at least one occurrence")]
    InvalidMaxOccurs { name: String },
    /// Two options share a short character or a long name.
    #[error("duplicate option definition: {0}")]
    DuplicateOptionDefinition(String),
}

/// Convenience alias for results with [`SpecError`].
pub type Result<T> = std::result::Result<T, SpecError>;
