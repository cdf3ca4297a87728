//! Command groups, their actions and parameter definitions.
//!
//! Everything is described explicitly through builders:
//!
//! ```text
//! Registry
//! └── CommandGroup "Plugin"      (sort order, enabled, default action)
//!     ├── Action "Add"           (name: string)
//!     ├── Action "Remove"        (name: string)
//!     └── Action "Enable"        (name: string, alias -p)
//! ```
//!
//! Per-action checks (names, handlers, default kinds) run when a group is
//! built. Checks that depend on case configuration run in
//! [`Registry::validate`].

mod action;
mod group;
mod parameter;

pub use action::{Action, ActionBuilder};
pub use group::{CommandGroup, GroupBuilder};
pub use parameter::Parameter;

use std::collections::HashSet;

use crate::error::RegistryError;
use crate::options::Options;

/// Returns true if `name` survives tokenizing as a primary or sub option.
///
/// Whitespace ends a position, `-` and `/` open a named argument and quotes
/// are dropped.
pub(crate) fn is_routable(name: &str) -> bool {
    !name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '-' | '/' | '"'))
}

/// The host's ordered list of command groups.
#[derive(Debug, Default)]
pub struct Registry {
    groups: Vec<CommandGroup>,
}

impl Registry {
    pub fn new(groups: Vec<CommandGroup>) -> Self {
        Self { groups }
    }

    pub fn push(&mut self, group: CommandGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    pub(crate) fn group_mut(&mut self, index: usize) -> Option<&mut CommandGroup> {
        self.groups.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Checks the parts of the group contract that depend on `options`.
    ///
    /// Within one action overload, parameter names and aliases must be
    /// distinct under the parameter case mode. Overloads sharing a name
    /// (under the action case mode) must not accept the same set of
    /// parameter names.
    pub fn validate(&self, options: &Options) -> Result<(), RegistryError> {
        let param_case = options.parameter_case();
        let action_case = options.action_case();

        for group in &self.groups {
            let mut shapes: HashSet<(String, Vec<String>)> = HashSet::new();

            for action in group.actions() {
                let mut keys = HashSet::new();
                for parameter in action.parameters() {
                    for key in std::iter::once(parameter.name()).chain(parameter.alias()) {
                        if !keys.insert(param_case.fold(key)) {
                            return Err(RegistryError::DuplicateParameter {
                                group: group.name().to_string(),
                                action: action.name().to_string(),
                                key: key.to_string(),
                            });
                        }
                    }
                }

                let mut shape: Vec<String> = action
                    .parameters()
                    .iter()
                    .map(|p| param_case.fold(p.name()))
                    .collect();
                shape.sort();
                if !shapes.insert((action_case.fold(action.name()), shape)) {
                    return Err(RegistryError::DuplicateOverload {
                        group: group.name().to_string(),
                        action: action.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<CommandGroup>> for Registry {
    fn from(groups: Vec<CommandGroup>) -> Self {
        Self::new(groups)
    }
}

impl FromIterator<CommandGroup> for Registry {
    fn from_iter<T: IntoIterator<Item = CommandGroup>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::BoundArguments;
    use crate::handler::Context;
    use crate::value::ValueKind;

    fn group_with(actions: Vec<ActionBuilder>) -> CommandGroup {
        actions
            .into_iter()
            .fold(
                CommandGroup::builder("Option")
                    .default_action(|_a: &[String], _c: &mut Context<'_>| {}),
                GroupBuilder::action,
            )
            .build()
            .unwrap()
    }

    fn action(name: &str, params: Vec<Parameter>) -> ActionBuilder {
        params.into_iter().fold(
            Action::builder(name).handler(|_a: &BoundArguments, _c: &mut Context<'_>| {}),
            ActionBuilder::param,
        )
    }

    #[test]
    fn test_valid_overloads() {
        let registry = Registry::new(vec![group_with(vec![
            action("Test", vec![Parameter::required("a", ValueKind::Text)]),
            action(
                "Test",
                vec![
                    Parameter::required("a", ValueKind::Text),
                    Parameter::required("b", ValueKind::DateTime),
                ],
            ),
        ])]);
        assert_eq!(registry.validate(&Options::default()), Ok(()));
    }

    #[test]
    fn test_duplicate_parameter_names_fold_case() {
        let registry = Registry::new(vec![group_with(vec![action(
            "Test",
            vec![
                Parameter::required("Name", ValueKind::Text),
                Parameter::required("name", ValueKind::Text),
            ],
        )])]);
        assert!(matches!(
            registry.validate(&Options::default()),
            Err(RegistryError::DuplicateParameter { .. })
        ));

        let sensitive = Options::default().case_sensitive_parameters(true);
        assert_eq!(registry.validate(&sensitive), Ok(()));
    }

    #[test]
    fn test_alias_colliding_with_name() {
        let registry = Registry::new(vec![group_with(vec![action(
            "Test",
            vec![
                Parameter::required("a", ValueKind::Text),
                Parameter::required("b", ValueKind::Text).with_alias("A"),
            ],
        )])]);
        assert_eq!(
            registry.validate(&Options::default()),
            Err(RegistryError::DuplicateParameter {
                group: "Option".into(),
                action: "Test".into(),
                key: "A".into(),
            })
        );
    }

    #[test]
    fn test_duplicate_overload_shape() {
        let registry = Registry::new(vec![group_with(vec![
            action(
                "Test",
                vec![
                    Parameter::required("a", ValueKind::Text),
                    Parameter::required("b", ValueKind::Text),
                ],
            ),
            action(
                "test",
                vec![
                    Parameter::required("b", ValueKind::U32),
                    Parameter::required("a", ValueKind::Guid),
                ],
            ),
        ])]);
        assert_eq!(
            registry.validate(&Options::default()),
            Err(RegistryError::DuplicateOverload {
                group: "Option".into(),
                action: "test".into(),
            })
        );
    }

    #[test]
    fn test_registry_from_iter() {
        let registry: Registry = vec![group_with(vec![]), group_with(vec![])]
            .into_iter()
            .collect();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
