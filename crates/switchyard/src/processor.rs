//! The top-level entry point tying tokenizing, dispatch and output together.
//!
//! ```rust
//! use switchyard::{
//!     Action, BoundArguments, BufferDisplay, CommandGroup, Context, Outcome, Parameter,
//!     Processor, ValueKind, Verbosity,
//! };
//!
//! let plugin = CommandGroup::builder("Plugin")
//!     .default_action(|_args: &[String], _ctx: &mut Context| {})
//!     .action(
//!         Action::builder("Add")
//!             .param(Parameter::required("name", ValueKind::Text))
//!             .handler(|args: &BoundArguments, ctx: &mut Context| -> anyhow::Result<()> {
//!                 let name: String = args.get("name")?;
//!                 ctx.write_line(Verbosity::Normal, &format!("added {}", name));
//!                 Ok(())
//!             }),
//!     )
//!     .build()?;
//!
//! let mut processor = Processor::builder().name("plugin-tool").group(plugin).build()?;
//!
//! let mut display = BufferDisplay::new(Verbosity::Normal);
//! let result = processor.run_with(["Plugin", "Add", "-name:sample"], &mut display)?;
//!
//! assert_eq!(result.outcome, Outcome::CandidateFound(0));
//! assert_eq!(display.text(), vec!["plugin-tool", "added sample"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use tracing::debug;

use crate::args::ArgumentStore;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::display::{ConsoleDisplay, Display};
use crate::error::{DispatchError, RegistryError};
use crate::options::Options;
use crate::registry::{CommandGroup, Registry};
use crate::verbosity::Verbosity;

/// A named program with its command groups and configuration.
pub struct Processor {
    name: String,
    registry: Registry,
    options: Options,
    display: Option<Box<dyn Display>>,
}

impl Processor {
    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one invocation.
    ///
    /// Output goes to the display given to the builder, or to a
    /// [`ConsoleDisplay`] whose verbosity is read from the arguments.
    pub fn run<I, S>(&mut self, tokens: I) -> Result<Dispatched, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = ArgumentStore::from_args(tokens, &self.options);
        match self.display.take() {
            Some(mut display) => {
                let result = self.run_store(&store, display.as_mut());
                self.display = Some(display);
                result
            }
            None => {
                let mut display = ConsoleDisplay::from_store(&store);
                self.run_store(&store, &mut display)
            }
        }
    }

    /// Runs one invocation against the process arguments.
    pub fn run_env(&mut self) -> Result<Dispatched, DispatchError> {
        self.run(std::env::args().skip(1))
    }

    /// Runs one invocation writing to `display`.
    pub fn run_with<I, S>(
        &mut self,
        tokens: I,
        display: &mut dyn Display,
    ) -> Result<Dispatched, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = ArgumentStore::from_args(tokens, &self.options);
        self.run_store(&store, display)
    }

    /// Runs one invocation over an existing store.
    ///
    /// Failures are rendered to `display` before being returned.
    pub fn run_store(
        &mut self,
        store: &ArgumentStore,
        display: &mut dyn Display,
    ) -> Result<Dispatched, DispatchError> {
        let verbosity = display.verbosity();
        display.write_line(Verbosity::Quiet, &self.name);
        display.write_line(Verbosity::Diagnostic, &format!("Verbosity: {}", verbosity));
        self.announce_groups(store, display);

        let result = Dispatcher::new(&self.options).dispatch(&mut self.registry, store, display);
        match &result {
            Ok(dispatched) => debug!(
                outcome = ?dispatched.outcome,
                exit_code = dispatched.exit_code,
                "dispatch finished"
            ),
            Err(err) => display.write_error(err),
        }
        result
    }

    fn announce_groups(&self, store: &ArgumentStore, display: &mut dyn Display) {
        let show_all = store.contains(crate::dispatch::HELP_SWITCH).unwrap_or(false);
        display.write_line(Verbosity::Full, "Finding command groups");
        for group in self.registry.groups() {
            display.write_line(
                Verbosity::Diagnostic,
                &format!("Command group found: {}", group.name()),
            );
            let state = if show_all || group.is_enabled() {
                "valid"
            } else {
                "disabled"
            };
            display.write_line(
                Verbosity::Full,
                &format!("Command group {}: {}", state, group.name()),
            );
        }
    }
}

/// Builder for a [`Processor`].
#[derive(Default)]
pub struct ProcessorBuilder {
    name: Option<String>,
    groups: Vec<CommandGroup>,
    options: Options,
    display: Option<Box<dyn Display>>,
}

impl ProcessorBuilder {
    /// Sets the process name, printed at the start of every run.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn group(mut self, group: CommandGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn groups(mut self, groups: impl IntoIterator<Item = CommandGroup>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Uses `display` for every run instead of a fresh console display.
    pub fn display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Checks the process name, the group list and the registry.
    pub fn build(self) -> Result<Processor, RegistryError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(RegistryError::EmptyProcessName)?;
        if self.groups.is_empty() {
            return Err(RegistryError::NoGroups);
        }

        let registry = Registry::new(self.groups);
        registry.validate(&self.options)?;

        Ok(Processor {
            name,
            registry,
            options: self.options,
            display: self.display,
        })
    }
}
