//! Help-text DSL parser.
//!
//! The DSL is plain text with a few structural markers:
//!
//! ```text
//! @group common
//!     -v, --verbose           print more
//!
//! = tool - what the tool does
//! Free text for the root help page.
//! $(subcommands)
//!
//! == remote - manage remotes
//! === add - add a remote
//! Options:
//!     -f, --fetch             fetch after adding
//!     -t, --track <branch>    track only <branch>
//!     @include common
//! ```
//!
//! - Lines before the first header may define reusable option groups with
//!   `@group NAME`; option lines that follow belong to that group.
//! - `=` headers open sections. Level 1 must name the tool and opens the root
//!   section; deeper levels nest (`remote add`).
//! - `Options:` switches to option lines until the next header. `@include NAME`
//!   copies a group's options into the section.
//! - Outside option blocks, `#` lines are comments and `\#` escapes a literal `#`.
//!
//! Every option is tagged with its section's command path as its group.

use std::collections::HashMap;
use std::sync::LazyLock;

use optscan_core::{OptionSpec, ParamSpec};
use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::document::{HelpDocument, HelpSection};
use crate::error::{HelpError, Result};

static PATTERNS: LazyLock<DslPatterns> = LazyLock::new(DslPatterns::new);

struct DslPatterns {
    header: Regex,
    option_line: Regex,
    param: Regex,
}

impl DslPatterns {
    fn new() -> Self {
        // Fixed patterns; a panic here means a typo in one of them.
        Self {
            header: Regex::new(r"^(=+)\s*(.+)$").expect("static regex must compile"),
            option_line: Regex::new(
                r"(?x)
                ^\s*
                (?:-(\w),?)?                       # short form: -f or -f,
                (?:\s*--([\w][\w-]*))?             # long form: --file
                (?:\s+(<[^>]+>|\[[^\]]+\]))?       # parameter 1
                (?:\s+(<[^>]+>|\[[^\]]+\]))?       # parameter 2
                (?:\s+(<[^>]+>|\[[^\]]+\]))?       # parameter 3
                (.*)$                              # description
                ",
            )
            .expect("static regex must compile"),
            param: Regex::new(r"^[<\[]([^:>\]]+)(?::([^>\]]+))?[>\]]$")
                .expect("static regex must compile"),
        }
    }
}

/// Parses help text written in the DSL into a [`HelpDocument`].
///
/// `tool_name` selects which level-1 header opens the document; it is compared
/// case-insensitively. Every section's options are checked to form a valid
/// option table.
pub fn parse_help_text(raw: &str, tool_name: &str) -> Result<HelpDocument> {
    let mut parser = DslParser::new(tool_name);
    let normalized = raw.replace('\r', "");
    for (number, line) in normalized.lines().enumerate() {
        parser.line(number + 1, line)?;
    }
    parser.finish()
}

/// Parses a single option line (`-f, --file <path:file>  description`).
///
/// Returns `None` when the line names neither a short nor a long option.
///
/// # Examples
///
/// ```
/// use optscan_help::parse_option_line;
///
/// let spec = parse_option_line("  -o, --output <file:path>  - write to <file>").unwrap();
/// assert_eq!(spec.short, Some('o'));
/// assert_eq!(spec.long.as_deref(), Some("output"));
/// assert_eq!(spec.params[0].value_type.as_deref(), Some("path"));
/// assert_eq!(spec.description.as_deref(), Some("write to <file>"));
///
/// assert!(parse_option_line("    continued description").is_none());
/// ```
pub fn parse_option_line(line: &str) -> Option<OptionSpec> {
    let caps = PATTERNS.option_line.captures(line)?;
    let short = caps.get(1).and_then(|m| m.as_str().chars().next());
    let long = caps.get(2).map(|m| m.as_str());
    if short.is_none() && long.is_none() {
        return None;
    }

    let mut spec = OptionSpec::new(short, long);
    spec.params = (3..=5)
        .filter_map(|group| caps.get(group))
        .map(|m| parse_param(m.as_str()))
        .collect();

    let description = description_of(&caps);
    if !description.is_empty() {
        spec.description = Some(description);
    }
    Some(spec)
}

fn parse_param(raw: &str) -> ParamSpec {
    match PATTERNS.param.captures(raw) {
        Some(caps) => {
            let name = caps.get(1).map_or(raw, |m| m.as_str()).trim();
            match caps.get(2) {
                Some(ty) => ParamSpec::typed(name, ty.as_str().trim()),
                None => ParamSpec::new(name),
            }
        }
        None => ParamSpec::new(raw),
    }
}

fn description_of(caps: &Captures<'_>) -> String {
    let rest = caps.get(6).map_or("", |m| m.as_str()).trim();
    rest.strip_prefix("- ")
        .or_else(|| rest.strip_prefix('-').filter(|r| r.is_empty()))
        .unwrap_or(rest)
        .trim()
        .to_string()
}

/// Line-by-line state of the DSL parser.
struct DslParser {
    tool: String,
    seen_header: bool,
    groups: HashMap<String, Vec<OptionSpec>>,
    current_group: Option<String>,
    sections: Vec<HelpSection>,
    /// `(level, name)` of the headers enclosing the current section.
    headers: Vec<(usize, String)>,
    capturing: bool,
    in_options: bool,
}

impl DslParser {
    fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            seen_header: false,
            groups: HashMap::new(),
            current_group: None,
            sections: Vec::new(),
            headers: Vec::new(),
            capturing: false,
            in_options: false,
        }
    }

    fn line(&mut self, number: usize, raw: &str) -> Result<()> {
        let line = raw.trim_end();

        if let Some(caps) = PATTERNS.header.captures(line) {
            self.seen_header = true;
            let level = caps.get(1).map_or(1, |m| m.as_str().len());
            let content = caps.get(2).map_or("", |m| m.as_str()).trim();
            return self.header(level, content);
        }

        if !self.seen_header {
            self.preamble(line);
            return Ok(());
        }

        if !self.capturing {
            return Ok(());
        }
        let in_options = self.in_options;
        let Some(section) = self.sections.last_mut() else {
            return Ok(());
        };

        if line.trim().eq_ignore_ascii_case("Options:") {
            self.in_options = true;
            return Ok(());
        }

        if in_options {
            if line.trim().is_empty() {
                return Ok(());
            }
            if let Some(name) = line.trim().strip_prefix("@include ") {
                let name = name.trim();
                let options = self.groups.get(name).ok_or_else(|| HelpError::UnknownGroup {
                    group: name.to_string(),
                    line: number,
                })?;
                for option in options {
                    let mut copied = option.clone();
                    copied.group = Some(section.command_path.clone());
                    section.options.push(copied);
                }
                trace!(group = name, path = %section.command_path, "included option group");
                return Ok(());
            }
            if let Some(mut spec) = parse_option_line(line) {
                spec.group = Some(section.command_path.clone());
                section.options.push(spec);
            } else if line.starts_with(char::is_whitespace) {
                if let Some(last) = section.options.last_mut() {
                    append_description(last, line.trim());
                }
            }
            return Ok(());
        }

        if line.trim_start().starts_with('#') {
            return Ok(());
        }
        let text = line.strip_prefix('\\').filter(|rest| rest.starts_with('#')).unwrap_or(line);
        section.help_text.push_str(text);
        section.help_text.push('\n');
        Ok(())
    }

    fn preamble(&mut self, line: &str) {
        if let Some(name) = line.strip_prefix("@group ") {
            let name = name.trim().to_string();
            debug!(group = %name, "defining option group");
            self.groups.insert(name.clone(), Vec::new());
            self.current_group = Some(name);
            return;
        }
        let Some(group) = self.current_group.as_ref() else {
            return;
        };
        let Some(options) = self.groups.get_mut(group) else {
            return;
        };
        if let Some(spec) = parse_option_line(line) {
            options.push(spec);
        } else if line.starts_with(char::is_whitespace) && !line.trim().is_empty() {
            if let Some(last) = options.last_mut() {
                append_description(last, line.trim());
            }
        }
    }

    fn header(&mut self, level: usize, content: &str) -> Result<()> {
        let (name, summary) = match content.split_once(" - ") {
            Some((name, summary)) => (name.trim(), summary.trim()),
            None => (content, ""),
        };
        self.in_options = false;

        if level == 1 {
            self.headers.clear();
            self.capturing = name.eq_ignore_ascii_case(&self.tool);
            if self.capturing {
                self.push_section(HelpSection::new("", summary))?;
            }
            return Ok(());
        }

        if !self.capturing {
            return Ok(());
        }

        while self
            .headers
            .last()
            .is_some_and(|(parent_level, _)| *parent_level >= level)
        {
            self.headers.pop();
        }
        self.headers.push((level, name.to_string()));

        let path = self
            .headers
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.push_section(HelpSection::new(&path, summary))
    }

    fn push_section(&mut self, section: HelpSection) -> Result<()> {
        let duplicate = self
            .sections
            .iter()
            .any(|existing| existing.command_path.eq_ignore_ascii_case(&section.command_path));
        if duplicate {
            return Err(HelpError::DuplicateSection(section.command_path));
        }
        debug!(path = %section.command_path, "help section");
        self.sections.push(section);
        Ok(())
    }

    fn finish(self) -> Result<HelpDocument> {
        for section in &self.sections {
            section.option_table()?;
        }
        debug!(
            tool = %self.tool,
            sections = self.sections.len(),
            groups = self.groups.len(),
            "parsed help text"
        );
        Ok(HelpDocument {
            tool: self.tool,
            sections: self.sections,
        })
    }
}

fn append_description(spec: &mut OptionSpec, text: &str) {
    match spec.description.as_mut() {
        Some(desc) => {
            desc.push('\n');
            desc.push_str(text);
        }
        None => spec.description = Some(text.to_string()),
    }
}
