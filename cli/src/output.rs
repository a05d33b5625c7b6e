//! Output formatting for parse reports.

use optscan_core::{IllegalUsage, ParseResult, PositionalArgument};
use serde::{Deserialize, Serialize};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// A [`ParseResult`] with option ids replaced by option names.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    /// Command path whose options were scanned (`""` for the root command).
    pub command: String,
    pub valid: bool,
    pub halted: bool,
    pub options: Vec<OptionReport>,
    pub illegal: Vec<IllegalUsage>,
    pub positionals: Vec<PositionalArgument>,
    pub unscanned: Vec<String>,
}

/// Every occurrence of one option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionReport {
    /// `--long` when the option has a long name, otherwise `-c`.
    pub name: String,
    pub occurrences: Vec<OccurrenceReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceReport {
    pub index: usize,
    pub adjoining: bool,
    pub params: Vec<String>,
}

impl ParseReport {
    pub fn new(command: &str, result: &ParseResult) -> Self {
        let table = result.table();
        let options = result
            .occurrences
            .iter()
            .map(|(id, occurrences)| OptionReport {
                name: table
                    .spec(*id)
                    .map_or_else(|| id.to_string(), |spec| spec.display_name()),
                occurrences: occurrences
                    .iter()
                    .map(|occurrence| OccurrenceReport {
                        index: occurrence.index,
                        adjoining: occurrence.adjoining,
                        params: occurrence.params.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            command: command.to_string(),
            valid: result.is_valid(),
            halted: result.halted,
            options,
            illegal: result.illegal.clone(),
            positionals: result.positionals.clone(),
            unscanned: result
                .unscanned
                .iter()
                .map(|token| token.text.clone())
                .collect(),
        }
    }
}

/// Formats a parse report in the requested output format.
pub fn format_report(report: &ParseReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn report_to_table(report: &ParseReport) -> String {
    let mut out = String::new();

    let command = if report.command.is_empty() {
        "(root)"
    } else {
        report.command.as_str()
    };
    let status = match (report.valid, report.halted) {
        (true, _) => "valid",
        (false, true) => "invalid, halted",
        (false, false) => "invalid",
    };
    out.push_str(&format!("Command: {command} ({status})\n"));

    if !report.options.is_empty() {
        out.push_str("\nOPTION               ARG  PARAMS\n");
        for option in &report.options {
            for occurrence in &option.occurrences {
                out.push_str(
                    format!(
                        "{:<20} {:<4} {}",
                        option.name,
                        occurrence.index,
                        occurrence.params.join(" ")
                    )
                    .trim_end(),
                );
                out.push('\n');
            }
        }
    }

    if !report.positionals.is_empty() {
        out.push_str("\nPOSITIONAL\n");
        for positional in &report.positionals {
            out.push_str(&format!("{:<4} {}\n", positional.index, positional.text));
        }
    }

    if !report.illegal.is_empty() {
        out.push_str("\nILLEGAL\n");
        for usage in &report.illegal {
            out.push_str(&format!("{usage}\n"));
        }
    }

    if !report.unscanned.is_empty() {
        out.push_str(&format!("\nUnscanned: {}\n", report.unscanned.join(" ")));
    }

    out
}
