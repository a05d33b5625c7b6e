//! POSIX-flavored command-line option scanning.
//!
//! This crate turns a program's argument tokens into structured option
//! occurrences and positional arguments:
//!
//! - [`OptionSpec`]: one allowed option with its names, parameter slots and
//!   permission group.
//! - [`OptionTable`]: an immutable, validated catalogue of specs that
//!   resolves short characters and long names to an [`OptionId`].
//! - [`TokenQueue`]: a cursor over the tokens that keeps original indices.
//! - [`OptionsParser`]: the scanner, handling short clusters with adjoining
//!   parameters, `--long` and `--long=value`, multi-parameter options, `--`,
//!   and group-gated options.
//! - [`ParseResult`]: occurrences, [`IllegalUsage`] records, and positionals,
//!   with name-based queries.
//!
//! Table construction is the only fallible step ([`SpecError`]). Usage
//! problems on the command line are returned as data so one pass reports all
//! of them.
//!
//! # Example
//!
//! ```
//! use optscan_core::*;
//!
//! let table = OptionTable::new(vec![
//!     OptionSpec::short('v').with_long("verbose").with_max_occurs(3),
//!     OptionSpec::short('o').with_long("output").with_param("file"),
//!     OptionSpec::long("force").with_group("admin"),
//! ])
//! .unwrap();
//!
//! let args = ["tool", "-vvo", "out.txt", "--force", "input", "--", "-literal"];
//! let result = table.parse(&args, &ParseContext::default().with_offset(1));
//!
//! assert_eq!(result.occurrence_count('v'), 2);
//! assert_eq!(result.first_param("output"), Some("out.txt"));
//! assert_eq!(result.positional_texts(), vec!["input", "-literal"]);
//!
//! // `--force` needs the "admin" group.
//! assert!(!result.is_valid());
//! assert_eq!(result.illegal[0].kind, UsageErrorKind::OptionNotRecognized);
//! ```

mod error;
mod parser;
mod query;
mod queue;
mod result;
mod spec;
mod table;
mod validate;

pub use error::{Result, SpecError};
pub use parser::{OptionsParser, ParseContext};
pub use queue::{Token, TokenQueue};
pub use result::{IllegalUsage, ParseResult, ParsedOccurrence, PositionalArgument, UsageErrorKind};
pub use spec::{OptionId, OptionSpec, ParamSpec};
pub use table::{OptionKey, OptionTable};
pub use validate::validate_options;
