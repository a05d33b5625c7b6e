//! Parse result model.
//!
//! A [`ParseResult`] is produced by exactly one parse and is read-only
//! afterwards. It records every recognised option occurrence, every illegal
//! usage, and every positional argument, each tagged with the index of the
//! argument it came from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OptionId, OptionTable, Token};

/// One occurrence of a recognised option on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOccurrence {
    /// Index of the argument the option was found in.
    pub index: usize,
    /// Found inside a short-option cluster before the cluster's last character,
    /// either as a flag (`-ab`) or with an adjoining parameter (`-ofile`).
    pub adjoining: bool,
    /// The resolved option.
    pub option: OptionId,
    /// Captured parameters, in order.
    pub params: Vec<String>,
}

/// Classification of an illegal option usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageErrorKind {
    /// Unknown option, or an option whose group is not allowed here.
    OptionNotRecognized,
    /// `--=value`: the equals sign leaves no option name.
    EqualFirstChar,
    /// `--name=value` used with an option that does not take exactly one parameter.
    EqualFormRequiresSingleParam,
    /// `--name=` with nothing after the equals sign. The occurrence is still recorded.
    EqualFormEmptyValue,
    /// Fewer arguments remain than the option needs.
    OptionNotEnoughParams,
    /// A multi-parameter short option was used before the end of a cluster.
    AdjoiningOptionNotSingleParam,
}

impl UsageErrorKind {
    /// Whether the usage is reported without discarding the occurrence.
    pub fn is_recoverable(self) -> bool {
        matches!(self, UsageErrorKind::EqualFormEmptyValue)
    }
}

impl fmt::Display for UsageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            UsageErrorKind::OptionNotRecognized => "unrecognized option",
            UsageErrorKind::EqualFirstChar => "missing option name before '='",
            UsageErrorKind::EqualFormRequiresSingleParam => {
                "'=' form requires an option with exactly one parameter"
            }
            UsageErrorKind::EqualFormEmptyValue => "empty value after '='",
            UsageErrorKind::OptionNotEnoughParams => "not enough parameters for option",
            UsageErrorKind::AdjoiningOptionNotSingleParam => {
                "option with several parameters cannot be clustered"
            }
        };
        f.write_str(message)
    }
}

/// An illegal option usage, recorded instead of aborting the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {text} (argument {index})")]
pub struct IllegalUsage {
    /// Offending text: `--name`, `-c`, or the whole token for `--=value`.
    pub text: String,
    /// Index of the argument it was found in.
    pub index: usize,
    pub kind: UsageErrorKind,
}

/// A token that was neither an option nor an option parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalArgument {
    pub text: String,
    pub index: usize,
}

/// Outcome of a single parse.
///
/// Query it through the accessor methods (`is_present`, `first_param`, ...),
/// which accept either a short character or a long name.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Occurrences per option, in command-line order.
    pub occurrences: BTreeMap<OptionId, Vec<ParsedOccurrence>>,
    /// Illegal usages, in detection order.
    pub illegal: Vec<IllegalUsage>,
    /// Positional arguments, in appearance order.
    pub positionals: Vec<PositionalArgument>,
    /// Tokens left unexamined because scanning halted.
    pub unscanned: Vec<Token>,
    /// Whether scanning stopped early on [`UsageErrorKind::OptionNotEnoughParams`].
    pub halted: bool,
    #[serde(skip)]
    pub(crate) table: Arc<OptionTable>,
}

impl ParseResult {
    pub(crate) fn new(table: Arc<OptionTable>) -> Self {
        Self {
            occurrences: BTreeMap::new(),
            illegal: Vec::new(),
            positionals: Vec::new(),
            unscanned: Vec::new(),
            halted: false,
            table,
        }
    }

    pub(crate) fn record(&mut self, occurrence: ParsedOccurrence) {
        self.occurrences
            .entry(occurrence.option)
            .or_default()
            .push(occurrence);
    }

    pub(crate) fn reject(&mut self, text: impl Into<String>, index: usize, kind: UsageErrorKind) {
        self.illegal.push(IllegalUsage {
            text: text.into(),
            index,
            kind,
        });
    }

    pub(crate) fn positional(&mut self, token: Token) {
        self.positionals.push(PositionalArgument {
            text: token.text,
            index: token.index,
        });
    }

    /// The table this result was parsed against.
    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    /// Valid when no illegal usage was recorded.
    pub fn is_valid(&self) -> bool {
        self.illegal.is_empty()
    }

    /// Total number of recorded occurrences across all options.
    pub fn total_occurrences(&self) -> usize {
        self.occurrences.values().map(Vec::len).sum()
    }

    /// Options that occurred more often than their advisory `max_occurs`.
    ///
    /// Returns `(id, count)` pairs in table order. The parser never enforces the
    /// limit; callers that care can check it here.
    pub fn max_occurs_exceeded(&self) -> Vec<(OptionId, usize)> {
        self.occurrences
            .iter()
            .filter_map(|(id, list)| {
                let spec = self.table.spec(*id)?;
                (list.len() > spec.max_occurs).then_some((*id, list.len()))
            })
            .collect()
    }
}
