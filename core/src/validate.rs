//! Option table validation.
//!
//! Checks the structural invariants of an option catalogue before it is used
//! for resolution: every option is nameable, names are scannable, occurrence
//! limits are sane, and no two options claim the same short character or long
//! name.
//!
//! # Examples
//!
//! ```
//! use optscan_core::*;
//!
//! let specs = vec![OptionSpec::short('v').with_long("verbose")];
//! assert!(validate_options(&specs).is_empty());
//!
//! let clash = vec![OptionSpec::short('v'), OptionSpec::short('v').with_long("version")];
//! assert_eq!(
//!     validate_options(&clash),
//!     vec![SpecError::DuplicateOptionDefinition("-v".to_string())]
//! );
//! ```

use std::collections::HashSet;

use crate::{OptionSpec, SpecError};

/// Validates a list of option specs.
///
/// Stops at the first problem and returns it; an empty vector means the specs
/// can be turned into an [`OptionTable`](crate::OptionTable).
pub fn validate_options(specs: &[OptionSpec]) -> Vec<SpecError> {
    let mut errors = Vec::new();
    let mut seen_short: HashSet<char> = HashSet::new();
    let mut seen_long: HashSet<&str> = HashSet::new();

    for spec in specs {
        if spec.short.is_none() && spec.long.is_none() {
            errors.push(SpecError::MissingOptionName);
            return errors;
        }

        if spec.max_occurs == 0 {
            errors.push(SpecError::InvalidMaxOccurs {
                name: spec.display_name(),
            });
            return errors;
        }

        if let Some(c) = spec.short {
            if !is_valid_short(c) {
                errors.push(SpecError::InvalidShortOption(c));
                return errors;
            }
            if !seen_short.insert(c) {
                errors.push(SpecError::DuplicateOptionDefinition(format!("-{c}")));
                return errors;
            }
        }

        if let Some(long) = spec.long.as_deref() {
            if !is_valid_long(long) {
                errors.push(SpecError::InvalidLongOption(long.to_string()));
                return errors;
            }
            if !seen_long.insert(long) {
                errors.push(SpecError::DuplicateOptionDefinition(format!("--{long}")));
                return errors;
            }
        }
    }

    errors
}

fn is_valid_short(c: char) -> bool {
    c != '-' && c != '=' && !c.is_whitespace() && !c.is_control()
}

fn is_valid_long(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.chars().any(|c| c == '=' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_unique_identities() {
        let specs = vec![
            OptionSpec::short('a'),
            OptionSpec::long("all"),
            OptionSpec::new(Some('b'), Some("brief")).with_param("mode"),
        ];
        assert!(validate_options(&specs).is_empty());
    }

    #[test]
    fn test_rejects_duplicate_long() {
        let specs = vec![
            OptionSpec::short('f').with_long("file"),
            OptionSpec::short('F').with_long("file"),
        ];
        assert_eq!(
            validate_options(&specs),
            vec![SpecError::DuplicateOptionDefinition("--file".to_string())]
        );
    }

    #[test]
    fn test_short_and_long_namespaces_are_separate() {
        // `-f` and `--f` do not collide.
        let specs = vec![OptionSpec::short('f'), OptionSpec::long("f")];
        assert!(validate_options(&specs).is_empty());
    }

    #[test]
    fn test_rejects_unnamed_option() {
        let specs = vec![OptionSpec::new(None, None)];
        assert_eq!(validate_options(&specs), vec![SpecError::MissingOptionName]);
    }

    #[test]
    fn test_rejects_bad_names() {
        assert_eq!(
            validate_options(&[OptionSpec::short('-')]),
            vec![SpecError::InvalidShortOption('-')]
        );
        assert_eq!(
            validate_options(&[OptionSpec::long("--file")]),
            vec![SpecError::InvalidLongOption("--file".to_string())]
        );
        assert_eq!(
            validate_options(&[OptionSpec::long("a=b")]),
            vec![SpecError::InvalidLongOption("a=b".to_string())]
        );
    }

    #[test]
    fn test_rejects_zero_max_occurs() {
        let specs = vec![OptionSpec::long("once").with_max_occurs(0)];
        assert_eq!(
            validate_options(&specs),
            vec![SpecError::InvalidMaxOccurs {
                name: "--once".to_string()
            }]
        );
    }
}
