use std::fmt;

use crate::error::RegistryError;
use crate::handler::{Context, DefaultHandler, FnDefaultAction, IntoActionResult};
use crate::options::CaseMode;
use crate::registry::action::{Action, ActionBuilder};
use crate::registry::is_routable;

/// A named, enablable collection of actions.
///
/// The group name is the primary option users type to select it. When no
/// action matches, the group's default action runs instead.
pub struct CommandGroup {
    name: String,
    description: Option<String>,
    sort_order: i32,
    enabled: bool,
    default_action: Box<dyn DefaultHandler>,
    actions: Vec<Action>,
}

impl CommandGroup {
    /// Starts building a command group.
    ///
    /// The name is typed as the primary option; [`GroupBuilder::build`]
    /// rejects names containing whitespace, `-`, `/` or `"`.
    ///
    /// ```
    /// use switchyard::{Action, CommandGroup, Parameter, ValueKind};
    ///
    /// let group = CommandGroup::builder("Plugin")
    ///     .description("Manage plugins")
    ///     .default_action(|args: &[String], _ctx: &mut switchyard::Context| args.len() as i32)
    ///     .action(
    ///         Action::builder("Add")
    ///             .param(Parameter::required("name", ValueKind::Text))
    ///             .handler(|_args: &switchyard::BoundArguments, _ctx: &mut switchyard::Context| {}),
    ///     )
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(group.name(), "Plugin");
    /// assert_eq!(group.actions().len(), 1);
    /// ```
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Every action overload in declaration order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub(crate) fn action_mut(&mut self, index: usize) -> Option<&mut Action> {
        self.actions.get_mut(index)
    }

    pub(crate) fn default_action_mut(&mut self) -> &mut dyn DefaultHandler {
        self.default_action.as_mut()
    }

    /// Indices of the overloads named `name`, fewest parameters first.
    ///
    /// Overloads with the same parameter count keep declaration order.
    pub fn overloads(&self, name: &str, case: CaseMode) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .actions
            .iter()
            .enumerate()
            .filter(|(_, a)| case.matches(a.name(), name))
            .map(|(i, _)| i)
            .collect();
        indices.sort_by_key(|&i| self.actions[i].parameter_count());
        indices
    }
}

impl fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandGroup")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("sort_order", &self.sort_order)
            .field("enabled", &self.enabled)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`CommandGroup`].
pub struct GroupBuilder {
    name: String,
    description: Option<String>,
    sort_order: i32,
    enabled: bool,
    default_action: Option<Box<dyn DefaultHandler>>,
    actions: Vec<ActionBuilder>,
}

impl GroupBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sort_order: 0,
            enabled: true,
            default_action: None,
            actions: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Position among groups; lower values are considered first.
    pub fn sort_order(mut self, order: i32) -> Self {
        self.sort_order = order;
        self
    }

    /// Disabled groups are skipped by dispatch but still listed in help.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the fallback invoked when no action overload matches.
    pub fn default_action<F, R>(self, f: F) -> Self
    where
        F: FnMut(&[String], &mut Context<'_>) -> R + 'static,
        R: IntoActionResult + 'static,
    {
        self.with_default_handler(FnDefaultAction::new(f))
    }

    /// Sets a custom [`DefaultHandler`].
    pub fn with_default_handler<H: DefaultHandler + 'static>(mut self, handler: H) -> Self {
        self.default_action = Some(Box::new(handler));
        self
    }

    /// Adds an action overload.
    pub fn action(mut self, action: ActionBuilder) -> Self {
        self.actions.push(action);
        self
    }

    /// Finishes the group, checking the integrity of every action.
    pub fn build(self) -> Result<CommandGroup, RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::EmptyGroupName);
        }
        if !is_routable(&self.name) {
            return Err(RegistryError::UnroutableName(self.name));
        }
        let default_action = self
            .default_action
            .ok_or_else(|| RegistryError::MissingDefaultAction(self.name.clone()))?;

        let actions = self
            .actions
            .into_iter()
            .map(|a| a.build(&self.name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CommandGroup {
            name: self.name,
            description: self.description,
            sort_order: self.sort_order,
            enabled: self.enabled,
            default_action,
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::BoundArguments;
    use crate::registry::parameter::Parameter;
    use crate::value::ValueKind;

    fn action(name: &str, params: &[&str]) -> ActionBuilder {
        params.iter().fold(
            Action::builder(name).handler(|_a: &BoundArguments, _c: &mut Context<'_>| {}),
            |b, p| b.param(Parameter::required(*p, ValueKind::Text)),
        )
    }

    fn group() -> GroupBuilder {
        CommandGroup::builder("Option").default_action(|_a: &[String], _c: &mut Context<'_>| -10)
    }

    #[test]
    fn test_defaults() {
        let group = group().build().unwrap();
        assert_eq!(group.sort_order(), 0);
        assert!(group.is_enabled());
        assert_eq!(group.description(), None);
    }

    #[test]
    fn test_missing_default_action() {
        let err = CommandGroup::builder("Plugin").build().unwrap_err();
        assert_eq!(err, RegistryError::MissingDefaultAction("Plugin".into()));
    }

    #[test]
    fn test_empty_group_name() {
        let err = CommandGroup::builder("")
            .default_action(|_a: &[String], _c: &mut Context<'_>| {})
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyGroupName);
    }

    #[test]
    fn test_unroutable_names_rejected() {
        for name in ["set-path", "Plugin Manager", "a/b"] {
            let err = CommandGroup::builder(name)
                .default_action(|_a: &[String], _c: &mut Context<'_>| {})
                .build()
                .unwrap_err();
            assert_eq!(err, RegistryError::UnroutableName(name.into()));
        }

        let err = group().action(action("set-path", &[])).build().unwrap_err();
        assert_eq!(err, RegistryError::UnroutableName("set-path".into()));
    }

    #[test]
    fn test_action_errors_propagate() {
        let err = group().action(Action::builder("Test")).build().unwrap_err();
        assert_eq!(err, RegistryError::MissingHandler("Option Test".into()));
    }

    #[test]
    fn test_overloads_sorted_by_parameter_count() {
        let group = group()
            .action(action("Test", &["a", "b", "c"]))
            .action(action("Other", &[]))
            .action(action("test", &["a"]))
            .action(action("Test", &["x", "y"]))
            .build()
            .unwrap();

        assert_eq!(group.overloads("TEST", CaseMode::Insensitive), vec![2, 3, 0]);
        assert_eq!(group.overloads("Test", CaseMode::Sensitive), vec![3, 0]);
        assert!(group.overloads("Missing", CaseMode::Insensitive).is_empty());
    }
}
