//! Command dispatch.
//!
//! Resolves the command path at the front of an argument list against a
//! [`HelpDocument`], parses the remaining tokens against that command's
//! options, and hands the result to the registered handler.

use optscan_core::{IllegalUsage, ParseContext};
use tracing::{debug, info};

use crate::document::{HelpDocument, normalize_path};
use crate::error::DispatchError;
use crate::registry::{CommandRegistry, Invocation};
use crate::render::render_section;

/// Result of a dispatch that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Help was requested; `text` is the rendered page.
    Help { path: String, text: String },
    /// The command line has illegal option usages; the handler was not run.
    InvalidUsage {
        path: String,
        illegal: Vec<IllegalUsage>,
    },
    /// The handler ran.
    Completed { path: String, exit_code: i32 },
}

/// Routes argument lists to registered command handlers.
#[derive(Debug)]
pub struct Dispatcher {
    document: HelpDocument,
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new(document: HelpDocument, registry: CommandRegistry) -> Self {
        Self { document, registry }
    }

    pub fn document(&self) -> &HelpDocument {
        &self.document
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatches an argument list (without the program name).
    ///
    /// - No arguments, `help ...` or `--help ...` renders help for the command
    ///   path that follows (the root page when there is none).
    /// - Otherwise the longest run of leading non-option words naming a
    ///   section is the command path; the rest are parsed against that
    ///   section's options, with the section path as the only allowed group.
    pub fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> Result<DispatchOutcome, DispatchError> {
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();

        let wants_help = args
            .first()
            .is_none_or(|first| first == "help" || first == "--help");
        if wants_help {
            let words = leading_words(args.get(1..).unwrap_or(&[]));
            let path = normalize_path(&words.join(" "));
            debug!(path = %path, "rendering help");
            let text = render_section(&self.document, &path)
                .ok_or_else(|| DispatchError::UnknownCommand(path.clone()))?;
            return Ok(DispatchOutcome::Help { path, text });
        }

        let words = leading_words(&args);
        let (depth, path) = (0..=words.len())
            .rev()
            .map(|depth| (depth, normalize_path(&words[..depth].join(" "))))
            .find(|(_, path)| self.document.section(path).is_some())
            .ok_or_else(|| DispatchError::UnknownCommand(normalize_path(&words.join(" "))))?;

        let Some(handler) = self.registry.resolve(&path) else {
            return Err(DispatchError::UnknownCommand(path));
        };

        let table = self.document.option_table(&path)?;
        let context = ParseContext::default()
            .with_offset(depth)
            .allow_group(section_group(&self.document, &path));
        let result = table.parse(&args, &context);

        if !result.is_valid() {
            debug!(path = %path, illegal = result.illegal.len(), "rejected command line");
            return Ok(DispatchOutcome::InvalidUsage {
                path,
                illegal: result.illegal,
            });
        }

        info!(path = %path, "dispatching command");
        let invocation = Invocation {
            path: &path,
            args: &args[depth..],
            result: &result,
        };
        let exit_code = handler
            .execute(&invocation)
            .map_err(|source| DispatchError::Handler {
                path: path.clone(),
                source,
            })?;
        Ok(DispatchOutcome::Completed { path, exit_code })
    }
}

/// The group tag options of `path` were given (the section's own spelling).
fn section_group<'d>(document: &'d HelpDocument, path: &'d str) -> &'d str {
    document
        .section(path)
        .map_or(path, |section| section.command_path.as_str())
}

fn leading_words(args: &[String]) -> Vec<&str> {
    args.iter()
        .map(String::as_str)
        .take_while(|arg| !arg.starts_with('-'))
        .collect()
}
