//! Option specification types.
//!
//! An [`OptionSpec`] describes one option a program accepts: its short and/or
//! long identity, the named parameters it consumes, an advisory occurrence
//! limit, an optional permission group, and a description. Specs are plain
//! data; they are validated when collected into an
//! [`OptionTable`](crate::OptionTable).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an option inside its [`OptionTable`](crate::OptionTable).
///
/// This is the position of the spec in the table, so it is only meaningful
/// together with the table that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub usize);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named parameter slot of an option (e.g. `<file:path>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, used only for help output.
    pub name: String,
    /// Optional free-form type annotation. Never interpreted by the parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl ParamSpec {
    /// Creates an untyped parameter slot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
        }
    }

    /// Creates a parameter slot carrying a type annotation.
    pub fn typed(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: Some(value_type.into()),
        }
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value_type {
            Some(ty) => write!(f, "<{}:{}>", self.name, ty),
            None => write!(f, "<{}>", self.name),
        }
    }
}

/// Specification of a single command-line option.
///
/// At least one of [`short`](OptionSpec::short) and [`long`](OptionSpec::long)
/// must be set. Long names are stored without the leading `--`.
///
/// # Examples
///
/// ```
/// use optscan_core::OptionSpec;
///
/// let verbose = OptionSpec::short('v').with_long("verbose");
/// assert_eq!(verbose.arity(), 0);
/// assert_eq!(verbose.display_name(), "--verbose");
///
/// let output = OptionSpec::new(Some('o'), Some("output"))
///     .with_param("file")
///     .with_description("Write output to <file>");
/// assert_eq!(output.arity(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Short form character (e.g. `'v'` for `-v`).
    pub short: Option<char>,
    /// Long form name without dashes (e.g. `"verbose"` for `--verbose`).
    pub long: Option<String>,
    /// Parameter slots; their count is the option's arity.
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    /// Advisory maximum number of occurrences. Not enforced by the parser.
    #[serde(default = "default_max_occurs")]
    pub max_occurs: usize,
    /// Permission group. Grouped options are only legal when the group is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Description from help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_max_occurs() -> usize {
    1
}

impl OptionSpec {
    /// Creates a zero-arity spec from optional short and long names.
    pub fn new(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short,
            long: long.map(String::from),
            params: Vec::new(),
            max_occurs: default_max_occurs(),
            group: None,
            description: None,
        }
    }

    /// Creates a spec with only a short form.
    pub fn short(c: char) -> Self {
        Self::new(Some(c), None)
    }

    /// Creates a spec with only a long form.
    pub fn long(name: &str) -> Self {
        Self::new(None, Some(name))
    }

    /// Sets the short form.
    pub fn with_short(mut self, c: char) -> Self {
        self.short = Some(c);
        self
    }

    /// Sets the long form.
    pub fn with_long(mut self, name: &str) -> Self {
        self.long = Some(name.to_string());
        self
    }

    /// Appends an untyped parameter slot.
    pub fn with_param(mut self, name: &str) -> Self {
        self.params.push(ParamSpec::new(name));
        self
    }

    /// Appends a parameter slot with a type annotation.
    pub fn with_typed_param(mut self, name: &str, value_type: &str) -> Self {
        self.params.push(ParamSpec::typed(name, value_type));
        self
    }

    /// Sets the advisory occurrence limit.
    pub fn with_max_occurs(mut self, max: usize) -> Self {
        self.max_occurs = max;
        self
    }

    /// Tags the option with a permission group.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Number of parameters the option consumes.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns the name used in diagnostics (long form preferred).
    ///
    /// # Examples
    ///
    /// ```
    /// use optscan_core::OptionSpec;
    ///
    /// assert_eq!(OptionSpec::short('x').display_name(), "-x");
    /// assert_eq!(OptionSpec::short('x').with_long("extract").display_name(), "--extract");
    /// ```
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(c)) => format!("-{c}"),
            (None, None) => "<unnamed>".to_string(),
        }
    }

    /// Whether the option is legal under the given set of allowed groups.
    ///
    /// Ungrouped options are always legal.
    pub fn is_allowed<'g, I>(&self, mut allowed: I) -> bool
    where
        I: Iterator<Item = &'g str>,
    {
        match self.group.as_deref() {
            None => true,
            Some(group) => allowed.any(|g| g == group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_identity_and_params() {
        let spec = OptionSpec::short('f')
            .with_long("file")
            .with_typed_param("path", "file")
            .with_max_occurs(3)
            .with_group("build");

        assert_eq!(spec.short, Some('f'));
        assert_eq!(spec.long.as_deref(), Some("file"));
        assert_eq!(spec.arity(), 1);
        assert_eq!(spec.max_occurs, 3);
        assert_eq!(spec.params[0].to_string(), "<path:file>");
    }

    #[test]
    fn test_group_permission() {
        let open = OptionSpec::short('a');
        let gated = OptionSpec::short('b').with_group("admin");

        assert!(open.is_allowed(std::iter::empty()));
        assert!(!gated.is_allowed(std::iter::empty()));
        assert!(gated.is_allowed(["user", "admin"].into_iter()));
    }

    #[test]
    fn test_deserialize_defaults_max_occurs() {
        let spec: OptionSpec = serde_json::from_str(r#"{"short":"q","long":null}"#).unwrap();
        assert_eq!(spec.max_occurs, 1);
        assert!(spec.params.is_empty());
    }
}
