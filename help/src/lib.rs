//! Help-text DSL, help rendering, and command dispatch for optscan.
//!
//! This crate sits around [`optscan_core`]:
//!
//! - [`parse_help_text`] reads a documentation-like DSL (headers, `Options:`
//!   blocks, `@group`/`@include`) into a [`HelpDocument`] whose sections carry
//!   ready-to-use [`OptionSpec`](optscan_core::OptionSpec) lists.
//! - [`render_section`] and [`render_all`] print help pages as plain text.
//! - [`CommandRegistry`] maps command paths to handler factories, registered
//!   explicitly at startup.
//! - [`Dispatcher`] resolves the command path of an argument list, parses the
//!   command's options, and runs its handler.
//!
//! # Example
//!
//! ```
//! use optscan_help::{
//!     CommandRegistry, DispatchOutcome, Dispatcher, HandlerError, Invocation, parse_help_text,
//! };
//!
//! let help = "\
//! = shop
//! == buy - buy goods
//! Options:
//!     -t, --thing <thing> - what to buy
//! ";
//! let document = parse_help_text(help, "shop").unwrap();
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register("buy", || {
//!         Box::new(|inv: &Invocation<'_>| -> Result<i32, HandlerError> {
//!             Ok(inv.result.occurrence_count("thing") as i32)
//!         })
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(document, registry);
//! let outcome = dispatcher.dispatch(&["buy", "-t", "milk", "--thing", "eggs"]).unwrap();
//! assert_eq!(
//!     outcome,
//!     DispatchOutcome::Completed { path: "buy".to_string(), exit_code: 2 }
//! );
//! ```

mod dispatch;
mod document;
mod error;
mod parser;
mod registry;
mod render;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use document::{HelpDocument, HelpSection, normalize_path};
pub use error::{DispatchError, HandlerError, HelpError, RegistryError, Result};
pub use parser::{parse_help_text, parse_option_line};
pub use registry::{CommandHandler, CommandRegistry, Invocation};
pub use render::{SUBCOMMANDS_PLACEHOLDER, option_names, render_all, render_section, strip_markup};
