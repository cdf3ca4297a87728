//! Group selection, overload resolution and invocation.
//!
//! # Pipeline
//!
//! ```text
//! ArgumentStore ─┬─ "?" present ──► help renderer ──► HelpDisplayed
//!                │
//!                └─ group match ──► 0: NotEnoughGroupCandidates
//!                                   2+: TooManyGroupCandidates
//!                                   1: overloads by sub option, most parameters first
//!                                        ├─ bound ──────────► CandidateFound(code)
//!                                        ├─ value error ────► InvalidParameters
//!                                        └─ shape mismatch ─► next smaller overload
//!                                   none left: default action ► DefaultActionUsed(code)
//! ```
//!
//! A conversion error on a larger overload is final: the dispatcher never
//! falls back to a smaller overload after a value failed to convert.

mod bind;
mod outcome;

pub use bind::BoundArguments;
pub use outcome::{exit_code, Dispatched, Outcome};

use tracing::{debug, trace};

use crate::args::ArgumentStore;
use crate::display::Display;
use crate::error::DispatchError;
use crate::handler::Context;
use crate::help;
use crate::options::Options;
use crate::registry::{CommandGroup, Registry};
use bind::{bind, Binding};

/// Canonical key of the help switch (`-?`).
pub const HELP_SWITCH: &str = "?";

/// Routes one invocation's arguments to a registered action.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    options: &'a Options,
}

impl<'a> Dispatcher<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Dispatches `store` against `registry`.
    ///
    /// Routing problems and conversion failures are reported through the
    /// returned [`Outcome`]. Errors are reserved for an invalid registry and
    /// for actions that fail.
    pub fn dispatch(
        &self,
        registry: &mut Registry,
        store: &ArgumentStore,
        display: &mut dyn Display,
    ) -> Result<Dispatched, DispatchError> {
        registry.validate(self.options)?;

        let show_help = store.contains(HELP_SWITCH).unwrap_or(false);
        let candidates = candidate_groups(registry, show_help);

        if show_help {
            let groups: Vec<&CommandGroup> =
                candidates.iter().map(|&i| &registry.groups()[i]).collect();
            let code = help::render(&groups, store, self.options, display);
            return Ok(Dispatched::new(Outcome::HelpDisplayed, code));
        }

        let group_case = self.options.group_case();
        let matches: Vec<usize> = candidates
            .into_iter()
            .filter(|&i| group_case.matches(registry.groups()[i].name(), store.primary_option()))
            .collect();

        let index = match matches.as_slice() {
            [index] => *index,
            [] => {
                debug!(primary = store.primary_option(), "no command group matched");
                return Ok(Dispatched::reserved(Outcome::NotEnoughGroupCandidates));
            }
            _ => {
                debug!(
                    primary = store.primary_option(),
                    count = matches.len(),
                    "several command groups matched"
                );
                return Ok(Dispatched::reserved(Outcome::TooManyGroupCandidates));
            }
        };

        match registry.group_mut(index) {
            Some(group) => self.run_group(group, store, display),
            None => Ok(Dispatched::reserved(Outcome::NotEnoughGroupCandidates)),
        }
    }

    fn run_group(
        &self,
        group: &mut CommandGroup,
        store: &ArgumentStore,
        display: &mut dyn Display,
    ) -> Result<Dispatched, DispatchError> {
        let group_name = group.name().to_string();
        let overloads = group.overloads(store.sub_option(), self.options.action_case());
        debug!(
            group = group_name.as_str(),
            sub = store.sub_option(),
            overloads = overloads.len(),
            "resolving action"
        );

        for &index in overloads.iter().rev() {
            let Some(action) = group.action_mut(index) else {
                continue;
            };

            match bind(action, store) {
                Binding::Bound(args) => {
                    let command = format!("{} {}", group_name, action.name());
                    debug!(
                        command = command.as_str(),
                        parameters = action.parameter_count(),
                        "invoking action"
                    );
                    let path = vec![group_name.clone(), action.name().to_string()];
                    let mut ctx = Context::new(path, store, display);
                    let code = action
                        .invoke(&args, &mut ctx)
                        .map_err(|e| DispatchError::action(command, e))?;
                    return Ok(Dispatched::new(Outcome::CandidateFound(code), code));
                }
                Binding::Invalid(errors) => {
                    debug!(errors = errors.len(), "argument conversion failed");
                    for error in &errors {
                        display.write_message(error);
                    }
                    return Ok(Dispatched::reserved(Outcome::InvalidParameters));
                }
                Binding::Missing => {
                    trace!(
                        parameters = action.parameter_count(),
                        "overload shape does not match"
                    );
                }
            }
        }

        // Both "no overload of that name" and "every overload lacked a
        // required parameter" end here.
        let arguments = store.all_arguments();
        debug!(group = group_name.as_str(), "using default action");
        let mut ctx = Context::new(vec![group_name.clone()], store, display);
        let code = group
            .default_action_mut()
            .call(&arguments, &mut ctx)
            .map_err(|e| DispatchError::action(group_name, e))?;
        Ok(Dispatched::new(Outcome::DefaultActionUsed(code), code))
    }
}

/// Indices of the groups eligible for routing, ordered by sort order.
///
/// Disabled groups take part only when help was requested.
fn candidate_groups(registry: &Registry, show_help: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = registry
        .groups()
        .iter()
        .enumerate()
        .filter(|(_, g)| show_help || g.is_enabled())
        .map(|(i, _)| i)
        .collect();
    indices.sort_by_key(|&i| registry.groups()[i].sort_order());
    indices
}

/// Dispatches with a one-off [`Dispatcher`].
pub fn dispatch(
    registry: &mut Registry,
    store: &ArgumentStore,
    display: &mut dyn Display,
    options: &Options,
) -> Result<Dispatched, DispatchError> {
    Dispatcher::new(options).dispatch(registry, store, display)
}
