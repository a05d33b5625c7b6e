//! Read-only queries over a finished [`ParseResult`].
//!
//! Every query takes anything convertible into an [`OptionKey`], so callers
//! can ask by short character or long name interchangeably. Unknown options
//! simply report absence.

use crate::{OptionKey, ParseResult, ParsedOccurrence};

impl ParseResult {
    fn occurrences_for(&self, key: OptionKey<'_>) -> &[ParsedOccurrence] {
        self.table
            .resolve(key)
            .and_then(|id| self.occurrences.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the option occurred at least once.
    pub fn is_present<'k>(&self, key: impl Into<OptionKey<'k>>) -> bool {
        !self.occurrences_for(key.into()).is_empty()
    }

    /// Number of times the option occurred.
    pub fn occurrence_count<'k>(&self, key: impl Into<OptionKey<'k>>) -> usize {
        self.occurrences_for(key.into()).len()
    }

    /// All occurrences of the option, in command-line order.
    pub fn occurrences_of<'k>(&self, key: impl Into<OptionKey<'k>>) -> &[ParsedOccurrence] {
        self.occurrences_for(key.into())
    }

    /// First parameter of the first occurrence.
    pub fn first_param<'k>(&self, key: impl Into<OptionKey<'k>>) -> Option<&str> {
        self.first_param_at(key, 0)
    }

    /// First parameter of the occurrence at `offset`.
    ///
    /// `None` when the option did not occur that often or the occurrence has no
    /// parameters.
    pub fn first_param_at<'k>(&self, key: impl Into<OptionKey<'k>>, offset: usize) -> Option<&str> {
        self.occurrences_for(key.into())
            .get(offset)?
            .params
            .first()
            .map(String::as_str)
    }

    /// Every parameter of the occurrence at `offset`.
    pub fn params_of<'k>(&self, key: impl Into<OptionKey<'k>>, offset: usize) -> &[String] {
        self.occurrences_for(key.into())
            .get(offset)
            .map(|occurrence| occurrence.params.as_slice())
            .unwrap_or(&[])
    }

    /// Parameters of every occurrence, flattened in occurrence then parameter order.
    pub fn all_params<'k>(&self, key: impl Into<OptionKey<'k>>) -> Vec<&str> {
        self.occurrences_for(key.into())
            .iter()
            .flat_map(|occurrence| occurrence.params.iter().map(String::as_str))
            .collect()
    }

    /// Texts of the positional arguments, in order.
    pub fn positional_texts(&self) -> Vec<&str> {
        self.positionals.iter().map(|arg| arg.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn result() -> ParseResult {
        let table = OptionTable::new(vec![
            OptionSpec::short('I').with_long("include").with_param("dir"),
            OptionSpec::short('D').with_param("name").with_param("value"),
            OptionSpec::short('v').with_long("verbose"),
        ])
        .unwrap();
        table.parse(
            &["-I", "a", "--include", "b", "-D", "k1", "v1", "-Ic", "-vv"],
            &ParseContext::default(),
        )
    }

    #[test]
    fn test_presence_and_counts() {
        let result = result();
        assert!(result.is_present('I'));
        assert!(result.is_present("include"));
        assert_eq!(result.occurrence_count("--include"), 3);
        assert_eq!(result.occurrence_count('v'), 2);
    }

    #[test]
    fn test_param_retrieval() {
        let result = result();
        assert_eq!(result.first_param('I'), Some("a"));
        assert_eq!(result.first_param_at("include", 2), Some("c"));
        assert_eq!(result.first_param_at("include", 3), None);
        assert_eq!(result.params_of('D', 0), ["k1", "v1"]);
        assert_eq!(result.all_params('I'), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flag_has_no_first_param() {
        let result = result();
        assert_eq!(result.first_param('v'), None);
        assert!(result.params_of('v', 0).is_empty());
    }

    #[test]
    fn test_unknown_keys_report_absence() {
        let result = result();
        assert!(!result.is_present('z'));
        assert!(!result.is_present("missing"));
        assert_eq!(result.occurrence_count("missing"), 0);
        assert_eq!(result.first_param('z'), None);
        assert!(result.all_params("missing").is_empty());
        assert!(result.params_of('z', 0).is_empty());
    }

    #[test]
    fn test_queries_are_idempotent() {
        let result = result();
        let before = result.occurrences.clone();
        for _ in 0..3 {
            assert_eq!(result.all_params("include"), vec!["a", "b", "c"]);
            assert_eq!(result.occurrence_count('D'), 1);
        }
        assert_eq!(result.occurrences, before);
    }
}
