//! Parsed help documents.

use optscan_core::{OptionSpec, OptionTable};
use serde::{Deserialize, Serialize};

use crate::error::{HelpError, Result};

/// Help for one command path.
///
/// The root section of a tool has the empty path `""`; nested commands use
/// space-separated paths such as `"remote add"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpSection {
    /// Space-separated command path (`""` for the tool itself).
    pub command_path: String,
    /// One-line summary from the `name - summary` header form.
    #[serde(default)]
    pub summary: String,
    /// Free-form help text, markup preserved.
    #[serde(default)]
    pub help_text: String,
    /// Options of this command, each tagged with the command path as its group.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl HelpSection {
    pub fn new(command_path: &str, summary: &str) -> Self {
        Self {
            command_path: command_path.to_string(),
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    /// Number of words in the command path (`0` for the root section).
    pub fn depth(&self) -> usize {
        self.command_path.split_whitespace().count()
    }

    /// The last word of the command path.
    pub fn name(&self) -> &str {
        self.command_path
            .rsplit(' ')
            .next()
            .unwrap_or(self.command_path.as_str())
    }

    /// Builds the option table for this section.
    pub fn option_table(&self) -> Result<OptionTable> {
        OptionTable::new(self.options.clone()).map_err(|source| HelpError::InvalidSection {
            path: self.command_path.clone(),
            source,
        })
    }
}

/// All help sections of one tool, in document order.
///
/// # Examples
///
/// ```
/// use optscan_help::parse_help_text;
///
/// let doc = parse_help_text(
///     "= tool\nA tool.\n\n== build - compile things\nOptions:\n  -r, --release  optimise\n",
///     "tool",
/// )
/// .unwrap();
///
/// assert_eq!(doc.command_paths(), vec!["", "build"]);
/// assert_eq!(doc.section("BUILD").unwrap().summary, "compile things");
/// assert!(doc.option_table("build").unwrap().resolve_short('r').is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpDocument {
    /// Tool name the document was parsed for.
    pub tool: String,
    pub sections: Vec<HelpSection>,
}

impl HelpDocument {
    /// Finds a section by command path, ignoring case and extra whitespace.
    pub fn section(&self, path: &str) -> Option<&HelpSection> {
        let wanted = normalize_path(path);
        self.sections
            .iter()
            .find(|section| section.command_path.eq_ignore_ascii_case(&wanted))
    }

    /// Options declared for a command path (empty when the path is unknown).
    pub fn options(&self, path: &str) -> &[OptionSpec] {
        self.section(path)
            .map(|section| section.options.as_slice())
            .unwrap_or(&[])
    }

    /// Option table for a command path.
    pub fn option_table(&self, path: &str) -> Result<OptionTable> {
        self.section(path)
            .ok_or_else(|| HelpError::UnknownSection(normalize_path(path)))?
            .option_table()
    }

    /// First-level commands, in document order.
    pub fn root_commands(&self) -> impl Iterator<Item = &HelpSection> {
        self.sections.iter().filter(|section| section.depth() == 1)
    }

    /// Every command path, in document order.
    pub fn command_paths(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.command_path.as_str())
            .collect()
    }
}

/// Collapses whitespace in a command path.
pub fn normalize_path(path: &str) -> String {
    path.split_whitespace().collect::<Vec<_>>().join(" ")
}
