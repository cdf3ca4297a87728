//! Command-line dispatch with overload resolution.
//!
//! `switchyard` turns a raw argument vector into a call to one of the
//! host's registered actions:
//!
//! ```text
//! plugin-tool Plugin Add -name:"my plugin" -v:2
//!             ^^^^^^ ^^^ ^^^^^^^^^^^^^^^^^^^^^^^
//!             group  action   named arguments
//! ```
//!
//! The host describes command groups, their actions and typed parameters
//! with builders. The framework supplies the tokenizer, group routing,
//! overload resolution with strict type conversion, default-action
//! fallback and three-level help.
//!
//! # Features
//!
//! - **Forgiving tokenizer**: `/name:value`, `--name=value`, `-name value`,
//!   quoted values and bare switches; it never fails
//! - **Overloads**: actions sharing a name are tried from the most
//!   parameters down; a value that fails to convert stops the search
//! - **Lenient lookups**: [`ArgumentStore::get`] falls back to a default
//!   instead of failing
//! - **Help**: `-?` lists groups, actions or parameters depending on what
//!   else was typed
//! - **Verbosity**: `-v:<0..3>` gates [`Display`] output
//!
//! # Quick Start
//!
//! ```rust
//! use switchyard::{
//!     Action, BoundArguments, BufferDisplay, CommandGroup, Context, Outcome, Parameter,
//!     Processor, ValueKind, Verbosity,
//! };
//!
//! let plugin = CommandGroup::builder("Plugin")
//!     .description("Manage plugins")
//!     .default_action(|args: &[String], ctx: &mut Context| {
//!         ctx.write_line(Verbosity::Normal, &format!("unhandled: {}", args.join(" ")));
//!     })
//!     .action(
//!         Action::builder("Remove")
//!             .param(Parameter::required("name", ValueKind::Text).with_alias("p"))
//!             .handler(|args: &BoundArguments, _ctx: &mut Context| {
//!                 args.get::<String>("name").map(|name| if name == "core" { 1 } else { 0 })
//!             }),
//!     )
//!     .build()?;
//!
//! let mut processor = Processor::builder().name("plugin-tool").group(plugin).build()?;
//! let mut display = BufferDisplay::new(Verbosity::Quiet);
//!
//! let result = processor.run_with(["Plugin", "Remove", "-p", "core"], &mut display)?;
//! assert_eq!(result.outcome, Outcome::CandidateFound(1));
//!
//! let result = processor.run_with(["Plugin", "Zap", "-x:1"], &mut display)?;
//! assert_eq!(result.outcome, Outcome::DefaultActionUsed(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! tokens ─► tokenize ─► ArgumentStore ─► Dispatcher ─┬─► help::render
//!                                           │        └─► Action / default action
//!                                        Registry
//! ```
//!
//! Dispatch is synchronous and single-threaded. A [`Registry`] is borrowed
//! mutably for the duration of one dispatch; hosts that dispatch
//! concurrently build one registry per invocation.

mod args;
mod dispatch;
mod display;
mod error;
mod handler;
pub mod help;
mod options;
mod processor;
mod registry;
mod value;
mod verbosity;

pub use args::{tokenize, ArgumentStore, ParsedArguments};
pub use dispatch::{
    dispatch, exit_code, BoundArguments, Dispatched, Dispatcher, Outcome, HELP_SWITCH,
};
pub use display::{expand_escapes, BufferDisplay, ConsoleDisplay, Display, Line, LineKind};
pub use error::{ArgumentError, CoercionError, DispatchError, RegistryError};
pub use handler::{
    ActionHandler, ActionResult, Context, DefaultHandler, FnAction, FnDefaultAction,
    IntoActionResult, IntoExitCode,
};
pub use options::{CaseMode, Options, RowLayout};
pub use processor::{Processor, ProcessorBuilder};
pub use registry::{Action, ActionBuilder, CommandGroup, GroupBuilder, Parameter, Registry};
pub use value::{coerce, EnumType, FromValue, Value, ValueKind};
pub use verbosity::{Verbosity, VERBOSITY_SWITCH};
