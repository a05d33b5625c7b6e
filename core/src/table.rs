//! Validated option catalogue and identity resolution.
//!
//! [`OptionTable`] owns the specs of one program or command context and the
//! precomputed short/long lookup maps. It is immutable once built, so a single
//! table can serve any number of parses.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::{OptionId, OptionSpec, OptionsParser, ParseContext, ParseResult, validate_options};

/// Key used to look an option up by either of its identities.
///
/// Converts from `char` (short form) and `&str` (long form) so lookups read
/// naturally at call sites:
///
/// ```
/// use optscan_core::OptionKey;
///
/// assert_eq!(OptionKey::from('v'), OptionKey::Short('v'));
/// assert_eq!(OptionKey::from("verbose"), OptionKey::Long("verbose"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey<'a> {
    /// Short form character, without the dash.
    Short(char),
    /// Long form name. A leading `--` is tolerated.
    Long(&'a str),
}

impl From<char> for OptionKey<'_> {
    fn from(c: char) -> Self {
        OptionKey::Short(c)
    }
}

impl<'a> From<&'a str> for OptionKey<'a> {
    fn from(name: &'a str) -> Self {
        OptionKey::Long(name)
    }
}

impl<'a> From<&'a String> for OptionKey<'a> {
    fn from(name: &'a String) -> Self {
        OptionKey::Long(name.as_str())
    }
}

/// Immutable, validated option catalogue with short/long resolution.
///
/// # Examples
///
/// ```
/// use optscan_core::*;
///
/// let table = OptionTable::new(vec![
///     OptionSpec::short('v').with_long("verbose"),
///     OptionSpec::long("file").with_param("path"),
/// ])
/// .unwrap();
///
/// assert_eq!(table.resolve_short('v'), Some(OptionId(0)));
/// assert_eq!(table.resolve_long("file"), Some(OptionId(1)));
/// assert_eq!(table.resolve("--verbose".into()), Some(OptionId(0)));
/// assert!(table.resolve_short('x').is_none());
///
/// // Duplicate identities fail construction.
/// let err = OptionTable::new(vec![OptionSpec::short('v'), OptionSpec::short('v')]);
/// assert!(matches!(err, Err(SpecError::DuplicateOptionDefinition(_))));
/// ```
#[derive(Debug, Clone)]
pub struct OptionTable {
    specs: Vec<OptionSpec>,
    by_short: HashMap<char, OptionId>,
    by_long: HashMap<String, OptionId>,
}

impl OptionTable {
    /// Validates the specs and builds the lookup maps.
    pub fn new(specs: Vec<OptionSpec>) -> Result<Self> {
        if let Some(err) = validate_options(&specs).into_iter().next() {
            debug!(error = %err, "rejected option table");
            return Err(err);
        }

        let mut by_short = HashMap::new();
        let mut by_long = HashMap::new();
        for (index, spec) in specs.iter().enumerate() {
            let id = OptionId(index);
            if let Some(c) = spec.short {
                by_short.insert(c, id);
            }
            if let Some(long) = &spec.long {
                by_long.insert(long.clone(), id);
            }
        }

        debug!(
            options = specs.len(),
            short = by_short.len(),
            long = by_long.len(),
            "built option table"
        );

        Ok(Self {
            specs,
            by_short,
            by_long,
        })
    }

    /// Resolves a short option character.
    pub fn resolve_short(&self, c: char) -> Option<OptionId> {
        self.by_short.get(&c).copied()
    }

    /// Resolves a long option name, given without the leading `--`.
    pub fn resolve_long(&self, name: &str) -> Option<OptionId> {
        self.by_long.get(name).copied()
    }

    /// Resolves either identity form. Long keys may carry a leading `--`.
    pub fn resolve(&self, key: OptionKey<'_>) -> Option<OptionId> {
        match key {
            OptionKey::Short(c) => self.resolve_short(c),
            OptionKey::Long(name) => self.resolve_long(name.strip_prefix("--").unwrap_or(name)),
        }
    }

    /// Returns the spec for an id produced by this table.
    pub fn spec(&self, id: OptionId) -> Option<&OptionSpec> {
        self.specs.get(id.0)
    }

    /// All specs, in table order.
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Iterates over `(id, spec)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionId, &OptionSpec)> {
        self.specs
            .iter()
            .enumerate()
            .map(|(index, spec)| (OptionId(index), spec))
    }

    /// Number of specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table has no specs.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Scans `args` against this table.
    ///
    /// Shorthand for wrapping the table in an [`Arc`] and running an
    /// [`OptionsParser`]; prefer the parser directly when parsing repeatedly.
    pub fn parse<S: AsRef<str>>(&self, args: &[S], context: &ParseContext) -> ParseResult {
        OptionsParser::new(Arc::new(self.clone())).parse(args, context)
    }
}
