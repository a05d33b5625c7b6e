//! The option scanner.
//!
//! Tokens are classified strictly left to right:
//!
//! - `--` ends option scanning; everything after it is positional.
//! - `--name`, `--name=value` are long options.
//! - `-` alone is positional (the conventional stdin marker).
//! - `-abc` is a cluster of short options, scanned character by character.
//! - anything else is positional.
//!
//! Problems are collected as [`IllegalUsage`](crate::IllegalUsage) entries so a
//! single pass reports everything it can. The one exception is an option that
//! needs more parameters than there are tokens left: from that point on the
//! token boundaries can no longer be trusted, so scanning halts and the rest of
//! the tokens are reported as [`unscanned`](crate::ParseResult::unscanned).

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    OptionId, OptionSpec, OptionTable, ParseResult, ParsedOccurrence, Token, TokenQueue,
    UsageErrorKind,
};

/// Per-invocation parse settings.
///
/// # Examples
///
/// ```
/// use optscan_core::ParseContext;
///
/// // Skip the program name and allow options tagged "remote add".
/// let context = ParseContext::default().with_offset(1).allow_group("remote add");
/// assert_eq!(context.offset, 1);
/// assert!(context.is_group_allowed("remote add"));
/// assert!(!context.is_group_allowed("remote rm"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Number of leading arguments to skip.
    pub offset: usize,
    /// Group tags permitted in this invocation. `None` permits no grouped option.
    pub allowed_groups: Option<BTreeSet<String>>,
}

impl ParseContext {
    /// Sets the start offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Adds a permitted group tag.
    pub fn allow_group(mut self, group: &str) -> Self {
        self.allowed_groups
            .get_or_insert_with(BTreeSet::new)
            .insert(group.to_string());
        self
    }

    /// Replaces the permitted group tags.
    pub fn with_allowed_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Whether options tagged with `group` are legal.
    pub fn is_group_allowed(&self, group: &str) -> bool {
        self.allowed_groups
            .as_ref()
            .is_some_and(|groups| groups.contains(group))
    }

    fn permits(&self, spec: &OptionSpec) -> bool {
        spec.is_allowed(
            self.allowed_groups
                .iter()
                .flat_map(|groups| groups.iter().map(String::as_str)),
        )
    }
}

/// Scans command-line tokens against an [`OptionTable`].
///
/// The parser holds a shared handle to the table; every [`ParseResult`] it
/// produces keeps that handle for name-based queries.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use optscan_core::*;
///
/// let table = OptionTable::new(vec![
///     OptionSpec::short('a'),
///     OptionSpec::short('b'),
///     OptionSpec::short('x').with_param("value"),
///     OptionSpec::long("file").with_param("path"),
/// ])
/// .unwrap();
/// let parser = OptionsParser::new(Arc::new(table));
///
/// let result = parser.parse(&["-abxval", "--file=a.txt", "input"], &ParseContext::default());
/// assert!(result.is_valid());
/// assert!(result.is_present('a'));
/// assert_eq!(result.first_param('x'), Some("val"));
/// assert_eq!(result.first_param("file"), Some("a.txt"));
/// assert_eq!(result.positional_texts(), vec!["input"]);
/// ```
#[derive(Debug, Clone)]
pub struct OptionsParser {
    table: Arc<OptionTable>,
}

/// What the scanner should do after handling one option.
enum Flow {
    Continue,
    Halt,
}

impl OptionsParser {
    pub fn new(table: Arc<OptionTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    /// Parses `args`, starting at `context.offset`.
    pub fn parse<S: AsRef<str>>(&self, args: &[S], context: &ParseContext) -> ParseResult {
        let mut queue = TokenQueue::new(args, context.offset);
        let mut result = ParseResult::new(Arc::clone(&self.table));

        while let Some(token) = queue.pop_front() {
            let text = token.text.as_str();

            if text == "--" {
                trace!(index = token.index, "end of options");
                for rest in queue.drain() {
                    result.positional(rest);
                }
                break;
            }

            let flow = if let Some(body) = text.strip_prefix("--") {
                self.scan_long(body, &token, &mut queue, context, &mut result)
            } else if text == "-" {
                result.positional(token);
                Flow::Continue
            } else if let Some(cluster) = text.strip_prefix('-') {
                self.scan_cluster(cluster, &token, &mut queue, context, &mut result)
            } else {
                result.positional(token);
                Flow::Continue
            };

            if let Flow::Halt = flow {
                result.halted = true;
                result.unscanned = queue.drain();
                debug!(unscanned = result.unscanned.len(), "option scanning halted");
                break;
            }
        }

        debug!(
            occurrences = result.total_occurrences(),
            illegal = result.illegal.len(),
            positionals = result.positionals.len(),
            "parsed arguments"
        );
        result
    }

    fn lookup(
        &self,
        id: Option<OptionId>,
        context: &ParseContext,
    ) -> Option<(OptionId, &OptionSpec)> {
        let id = id?;
        let spec = self.table.spec(id)?;
        context.permits(spec).then_some((id, spec))
    }

    /// Handles `--name`, `--name=value` and `--=value`; `body` excludes the dashes.
    fn scan_long(
        &self,
        body: &str,
        token: &Token,
        queue: &mut TokenQueue,
        context: &ParseContext,
        result: &mut ParseResult,
    ) -> Flow {
        match body.find('=') {
            Some(0) => {
                result.reject(token.text.as_str(), token.index, UsageErrorKind::EqualFirstChar);
            }
            Some(eq) => {
                let (name, value) = (&body[..eq], &body[eq + 1..]);
                let label = format!("--{name}");
                let Some((id, spec)) = self.lookup(self.table.resolve_long(name), context) else {
                    result.reject(label, token.index, UsageErrorKind::OptionNotRecognized);
                    return Flow::Continue;
                };
                if spec.arity() != 1 {
                    result.reject(
                        label,
                        token.index,
                        UsageErrorKind::EqualFormRequiresSingleParam,
                    );
                    return Flow::Continue;
                }
                if value.is_empty() {
                    result.reject(label, token.index, UsageErrorKind::EqualFormEmptyValue);
                }
                result.record(ParsedOccurrence {
                    index: token.index,
                    adjoining: false,
                    option: id,
                    params: vec![value.to_string()],
                });
            }
            None => {
                let Some((id, spec)) = self.lookup(self.table.resolve_long(body), context) else {
                    result.reject(
                        token.text.as_str(),
                        token.index,
                        UsageErrorKind::OptionNotRecognized,
                    );
                    return Flow::Continue;
                };
                return self.take_params(id, spec, token, &token.text, queue, result);
            }
        }
        Flow::Continue
    }

    /// Handles a short-option cluster; `cluster` excludes the leading dash.
    fn scan_cluster(
        &self,
        cluster: &str,
        token: &Token,
        queue: &mut TokenQueue,
        context: &ParseContext,
        result: &mut ParseResult,
    ) -> Flow {
        let mut chars = cluster.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            let label = format!("-{c}");
            let Some((id, spec)) = self.lookup(self.table.resolve_short(c), context) else {
                result.reject(label, token.index, UsageErrorKind::OptionNotRecognized);
                continue;
            };

            if chars.peek().is_none() {
                return self.take_params(id, spec, token, &label, queue, result);
            }

            match spec.arity() {
                0 => result.record(ParsedOccurrence {
                    index: token.index,
                    adjoining: true,
                    option: id,
                    params: Vec::new(),
                }),
                1 => {
                    let value = &cluster[pos + c.len_utf8()..];
                    result.record(ParsedOccurrence {
                        index: token.index,
                        adjoining: true,
                        option: id,
                        params: vec![value.to_string()],
                    });
                    break;
                }
                _ => result.reject(
                    label,
                    token.index,
                    UsageErrorKind::AdjoiningOptionNotSingleParam,
                ),
            }
        }
        Flow::Continue
    }

    /// Consumes the option's parameters from the following tokens.
    fn take_params(
        &self,
        id: OptionId,
        spec: &OptionSpec,
        token: &Token,
        label: &str,
        queue: &mut TokenQueue,
        result: &mut ParseResult,
    ) -> Flow {
        let Some(params) = queue.pop_n(spec.arity()) else {
            debug!(
                option = label,
                needed = spec.arity(),
                remaining = queue.remaining(),
                "not enough parameters"
            );
            result.reject(label, token.index, UsageErrorKind::OptionNotEnoughParams);
            return Flow::Halt;
        };
        result.record(ParsedOccurrence {
            index: token.index,
            adjoining: false,
            option: id,
            params: params.into_iter().map(|param| param.text).collect(),
        });
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> OptionsParser {
        let table = OptionTable::new(vec![
            OptionSpec::short('a').with_long("all"),
            OptionSpec::short('b'),
            OptionSpec::short('x').with_param("value"),
            OptionSpec::short('f').with_long("file").with_param("path"),
            OptionSpec::short('p').with_long("pair").with_param("k").with_param("v"),
            OptionSpec::long("admin").with_group("admin"),
        ])
        .unwrap();
        OptionsParser::new(Arc::new(table))
    }

    fn parse(args: &[&str]) -> ParseResult {
        parser().parse(args, &ParseContext::default())
    }

    fn kinds(result: &ParseResult) -> Vec<UsageErrorKind> {
        result.illegal.iter().map(|usage| usage.kind).collect()
    }

    #[test]
    fn test_long_equals_form_single_param() {
        let result = parse(&["--file=a.txt"]);
        assert!(result.is_valid());
        let occurrences = result.occurrences_of("file");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].params, vec!["a.txt"]);
        assert!(!occurrences[0].adjoining);
    }

    #[test]
    fn test_long_equals_form_keeps_later_equals_in_value() {
        let result = parse(&["--file=k=v"]);
        assert_eq!(result.first_param("file"), Some("k=v"));
    }

    #[test]
    fn test_long_equals_empty_value_still_recorded() {
        let result = parse(&["--file="]);
        assert_eq!(kinds(&result), vec![UsageErrorKind::EqualFormEmptyValue]);
        assert_eq!(result.illegal[0].text, "--file");
        assert_eq!(result.first_param("file"), Some(""));
    }

    #[test]
    fn test_long_equals_form_wrong_arity() {
        let result = parse(&["--all=yes", "--pair=a"]);
        assert_eq!(
            kinds(&result),
            vec![
                UsageErrorKind::EqualFormRequiresSingleParam,
                UsageErrorKind::EqualFormRequiresSingleParam
            ]
        );
        assert!(!result.is_present("all"));
        assert!(!result.is_present("pair"));
    }

    #[test]
    fn test_equals_first_char() {
        let result = parse(&["--=value", "rest"]);
        assert_eq!(kinds(&result), vec![UsageErrorKind::EqualFirstChar]);
        assert_eq!(result.illegal[0].text, "--=value");
        assert_eq!(result.positional_texts(), vec!["rest"]);
    }

    #[test]
    fn test_unknown_long_continues() {
        let result = parse(&["--bogus", "-a", "--nope=1"]);
        assert_eq!(
            kinds(&result),
            vec![
                UsageErrorKind::OptionNotRecognized,
                UsageErrorKind::OptionNotRecognized
            ]
        );
        assert_eq!(result.illegal[0].text, "--bogus");
        assert_eq!(result.illegal[1].text, "--nope");
        assert!(result.is_present('a'));
    }

    #[test]
    fn test_long_consumes_separate_params() {
        let result = parse(&["--pair", "k", "v", "tail"]);
        assert!(result.is_valid());
        assert_eq!(result.params_of("pair", 0), ["k", "v"]);
        assert_eq!(result.positional_texts(), vec!["tail"]);
    }

    #[test]
    fn test_long_not_enough_params_halts() {
        let result = parse(&["-a", "--pair", "only"]);
        assert_eq!(kinds(&result), vec![UsageErrorKind::OptionNotEnoughParams]);
        assert!(result.halted);
        assert!(!result.is_present("pair"));
        assert!(result.positionals.is_empty());
        assert_eq!(result.unscanned.len(), 1);
        assert_eq!(result.unscanned[0].text, "only");
        assert_eq!(result.unscanned[0].index, 2);
    }

    #[test]
    fn test_cluster_flags_then_adjoining_param() {
        let result = parse(&["-abxval"]);
        assert!(result.is_valid());
        assert_eq!(result.total_occurrences(), 3);
        for key in ['a', 'b', 'x'] {
            assert!(result.occurrences_of(key)[0].adjoining, "{key} should be adjoining");
        }
        assert_eq!(result.first_param('x'), Some("val"));
    }

    #[test]
    fn test_adjoining_param_takes_rest_including_option_chars() {
        let result = parse(&["-xab"]);
        assert_eq!(result.first_param('x'), Some("ab"));
        assert!(!result.is_present('a'));
    }

    #[test]
    fn test_last_char_takes_separate_param() {
        let result = parse(&["-af", "out.txt", "in.txt"]);
        assert!(result.is_valid());
        let file = &result.occurrences_of('f')[0];
        assert!(!file.adjoining);
        assert_eq!(file.params, vec!["out.txt"]);
        assert_eq!(result.positional_texts(), vec!["in.txt"]);
    }

    #[test]
    fn test_single_short_flag_is_not_adjoining() {
        let result = parse(&["-a"]);
        assert!(!result.occurrences_of('a')[0].adjoining);
    }

    #[test]
    fn test_short_not_enough_params() {
        let result = parse(&["-f"]);
        assert_eq!(kinds(&result), vec![UsageErrorKind::OptionNotEnoughParams]);
        assert_eq!(result.occurrence_count('f'), 0);
        assert!(result.halted);
    }

    #[test]
    fn test_unknown_char_in_cluster_skips_only_that_char() {
        let result = parse(&["-azb"]);
        assert_eq!(kinds(&result), vec![UsageErrorKind::OptionNotRecognized]);
        assert_eq!(result.illegal[0].text, "-z");
        assert!(result.is_present('a'));
        assert!(result.is_present('b'));
    }

    #[test]
    fn test_multi_param_short_inside_cluster() {
        let result = parse(&["-pab"]);
        assert_eq!(
            kinds(&result),
            vec![UsageErrorKind::AdjoiningOptionNotSingleParam]
        );
        assert!(!result.is_present('p'));
        assert!(result.is_present('a'));
        assert!(result.is_present('b'));
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let result = parse(&["-", "-a"]);
        assert_eq!(result.positional_texts(), vec!["-"]);
        assert!(result.is_present('a'));
    }

    #[test]
    fn test_double_dash_ends_options() {
        let result = parse(&["-a", "--", "-b", "--file", "x"]);
        assert!(result.is_valid());
        assert!(result.is_present('a'));
        assert!(!result.is_present('b'));
        assert_eq!(result.positional_texts(), vec!["-b", "--file", "x"]);
        assert_eq!(result.positionals[0].index, 2);
    }

    #[test]
    fn test_parameter_tokens_are_never_options() {
        let result = parse(&["-f", "-a", "--file", "--all"]);
        assert!(result.is_valid());
        assert_eq!(result.all_params('f'), vec!["-a", "--all"]);
        assert!(!result.is_present('a'));
    }

    #[test]
    fn test_grouped_option_requires_permission() {
        let parser = parser();
        let denied = parser.parse(&["--admin"], &ParseContext::default());
        assert_eq!(kinds(&denied), vec![UsageErrorKind::OptionNotRecognized]);

        let other = parser.parse(&["--admin"], &ParseContext::default().allow_group("user"));
        assert!(!other.is_valid());

        let allowed = parser.parse(&["--admin"], &ParseContext::default().allow_group("admin"));
        assert!(allowed.is_valid());
        assert!(allowed.is_present("admin"));
    }

    #[test]
    fn test_offset_skips_leading_tokens() {
        let result = parser().parse(
            &["prog", "sub", "-a", "file"],
            &ParseContext::default().with_offset(2),
        );
        assert_eq!(result.occurrences_of('a')[0].index, 2);
        assert_eq!(result.positionals[0].index, 3);
    }

    #[test]
    fn test_extra_dashes_are_not_stripped() {
        let result = parse(&["----file", "x"]);
        assert_eq!(kinds(&result), vec![UsageErrorKind::OptionNotRecognized]);
        assert_eq!(result.positional_texts(), vec!["x"]);
    }

    #[test]
    fn test_non_ascii_cluster_param() {
        let result = parse(&["-xé☃"]);
        assert_eq!(result.first_param('x'), Some("é☃"));
    }
}
