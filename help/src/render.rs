//! Plain-text help rendering.
//!
//! Lightweight markup in help text (`**bold**`, `*italic*`, `_underline_`,
//! `[color]#text#`) is stripped; terminal styling is left to the caller.

use std::sync::LazyLock;

use optscan_core::OptionSpec;
use regex::Regex;

use crate::document::{HelpDocument, HelpSection};

/// Placeholder in root help text replaced by the list of first-level commands.
pub const SUBCOMMANDS_PLACEHOLDER: &str = "$(subcommands)";

const NAME_COLUMN: usize = 20;
const COMMAND_COLUMN: usize = 12;

static MARKUP: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    // Order matters: bold must be stripped before italic.
    [
        (
            Regex::new(r"\[(\w+)\]#(.*?)#").expect("static regex must compile"),
            "$2",
        ),
        (
            Regex::new(r"\*\*(.+?)\*\*").expect("static regex must compile"),
            "$1",
        ),
        (
            Regex::new(r"\b_([^_]+)_\b").expect("static regex must compile"),
            "$1",
        ),
        (
            Regex::new(r"\*(.+?)\*").expect("static regex must compile"),
            "$1",
        ),
    ]
});

/// Removes inline markup from help text.
///
/// # Examples
///
/// ```
/// use optscan_help::strip_markup;
///
/// assert_eq!(
///     strip_markup("**Run** it on *amazon* if [green]#you# want, my_var_name"),
///     "Run it on amazon if you want, my_var_name"
/// );
/// ```
pub fn strip_markup(input: &str) -> String {
    MARKUP
        .iter()
        .fold(input.to_string(), |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        })
}

/// Renders the help page for a command path, or `None` if the path is unknown.
pub fn render_section(doc: &HelpDocument, path: &str) -> Option<String> {
    let section = doc.section(path)?;
    let mut out = String::new();

    let mut text = section.help_text.clone();
    if section.depth() == 0 && text.contains(SUBCOMMANDS_PLACEHOLDER) {
        text = text.replace(SUBCOMMANDS_PLACEHOLDER, &command_list(doc));
    }
    out.push_str(strip_markup(text.trim()).as_str());

    if !section.options.is_empty() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str("Options:\n");
        out.push_str(&options_block(&section.options));
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}

/// Renders every section, each headed by `== path` and followed by a rule.
pub fn render_all(doc: &HelpDocument) -> String {
    doc.sections
        .iter()
        .map(|section| render_dump_entry(doc, section))
        .collect()
}

fn render_dump_entry(doc: &HelpDocument, section: &HelpSection) -> String {
    let title = if section.command_path.is_empty() {
        doc.tool.as_str()
    } else {
        section.command_path.as_str()
    };
    let body = render_section(doc, &section.command_path).unwrap_or_default();
    format!("== {title}\n{body}{}\n", "-".repeat(40))
}

fn command_list(doc: &HelpDocument) -> String {
    doc.root_commands()
        .map(|section| {
            format!("  {:<width$} {}", section.name(), section.summary, width = COMMAND_COLUMN)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn options_block(options: &[OptionSpec]) -> String {
    let mut out = String::new();
    for option in options {
        let names = option_names(option);
        let description = option
            .description
            .as_deref()
            .map(strip_markup)
            .unwrap_or_default();
        let mut lines = description.lines();
        let first = format!(
            "  {:<width$} {}",
            names,
            lines.next().unwrap_or(""),
            width = NAME_COLUMN
        );
        out.push_str(first.trim_end());
        out.push('\n');
        for line in lines {
            out.push_str(&" ".repeat(NAME_COLUMN + 3));
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Formats an option's names and parameters: `-f, --file <path:file>`.
pub fn option_names(option: &OptionSpec) -> String {
    let mut names = match (option.short, option.long.as_deref()) {
        (Some(c), Some(long)) => format!("-{c}, --{long}"),
        (Some(c), None) => format!("-{c}"),
        (None, Some(long)) => format!("--{long}"),
        (None, None) => String::new(),
    };
    for param in &option.params {
        names.push(' ');
        names.push_str(&param.to_string());
    }
    names
}
