//! Explicit command registration.
//!
//! Commands are registered at startup by path. Each entry is a factory so
//! handlers can be stateful per invocation without the registry caring.

use std::collections::BTreeMap;
use std::fmt;

use optscan_core::ParseResult;

use crate::document::normalize_path;
use crate::error::{HandlerError, RegistryError};

/// What a handler sees when it runs.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Normalised command path (`""` for the root command).
    pub path: &'a str,
    /// Arguments following the command path.
    pub args: &'a [String],
    /// Options parsed from the full argument list.
    pub result: &'a ParseResult,
}

/// A command implementation.
pub trait CommandHandler: Send + Sync {
    /// Runs the command and returns its exit code.
    fn execute(&self, invocation: &Invocation<'_>) -> Result<i32, HandlerError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&Invocation<'_>) -> Result<i32, HandlerError> + Send + Sync,
{
    fn execute(&self, invocation: &Invocation<'_>) -> Result<i32, HandlerError> {
        self(invocation)
    }
}

type HandlerFactory = Box<dyn Fn() -> Box<dyn CommandHandler> + Send + Sync>;

/// Table of command paths to handler factories.
///
/// Paths are matched case-insensitively with whitespace collapsed.
///
/// # Examples
///
/// ```
/// use optscan_help::{CommandHandler, CommandRegistry, HandlerError, Invocation};
///
/// struct Status;
///
/// impl CommandHandler for Status {
///     fn execute(&self, _invocation: &Invocation<'_>) -> Result<i32, HandlerError> {
///         Ok(0)
///     }
/// }
///
/// let mut registry = CommandRegistry::new();
/// registry.register("remote  status", || Box::new(Status)).unwrap();
///
/// assert!(registry.contains("Remote Status"));
/// assert!(registry.resolve("remote status").is_some());
/// assert!(registry.register("remote status", || Box::new(Status)).is_err());
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    factories: BTreeMap<String, HandlerFactory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler factory for a command path.
    pub fn register<F>(&mut self, path: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn CommandHandler> + Send + Sync + 'static,
    {
        let key = registry_key(path);
        if self.factories.contains_key(&key) {
            return Err(RegistryError::DuplicateCommand(key));
        }
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Builder-style [`register`](CommandRegistry::register).
    pub fn with_command<F>(mut self, path: &str, factory: F) -> Result<Self, RegistryError>
    where
        F: Fn() -> Box<dyn CommandHandler> + Send + Sync + 'static,
    {
        self.register(path, factory)?;
        Ok(self)
    }

    /// Creates a handler for a command path.
    pub fn resolve(&self, path: &str) -> Option<Box<dyn CommandHandler>> {
        self.factories.get(&registry_key(path)).map(|factory| factory())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.factories.contains_key(&registry_key(path))
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("paths", &self.paths())
            .finish()
    }
}

fn registry_key(path: &str) -> String {
    normalize_path(path).to_lowercase()
}
