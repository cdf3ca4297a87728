use std::fmt;

use crate::dispatch::BoundArguments;
use crate::error::RegistryError;
use crate::handler::{ActionHandler, ActionResult, Context, FnAction, IntoActionResult};
use crate::registry::is_routable;
use crate::registry::parameter::Parameter;

/// One overload of a named action.
///
/// Several actions in a group may share a name; the dispatcher picks between
/// them by which parameters the user supplied.
pub struct Action {
    name: String,
    description: Option<String>,
    hidden: bool,
    parameters: Vec<Parameter>,
    handler: Box<dyn ActionHandler>,
}

impl Action {
    /// Starts building an action overload.
    ///
    /// The name is typed as the sub option, so names containing whitespace,
    /// `-`, `/` or `"` are rejected when the group is built.
    pub fn builder(name: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Hidden actions are callable but left out of help.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub(crate) fn invoke(&mut self, args: &BoundArguments, ctx: &mut Context<'_>) -> ActionResult {
        self.handler.call(args, ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Builder for an [`Action`] overload.
///
/// Finished by the owning group builder, which knows the group name for
/// error reporting.
pub struct ActionBuilder {
    name: String,
    description: Option<String>,
    hidden: bool,
    parameters: Vec<Parameter>,
    handler: Option<Box<dyn ActionHandler>>,
}

impl ActionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            hidden: false,
            parameters: Vec::new(),
            handler: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Appends a parameter. Declaration order is kept.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the closure invoked when this overload is selected.
    pub fn handler<F, R>(self, f: F) -> Self
    where
        F: FnMut(&BoundArguments, &mut Context<'_>) -> R + 'static,
        R: IntoActionResult + 'static,
    {
        self.with_handler(FnAction::new(f))
    }

    /// Sets a custom [`ActionHandler`].
    pub fn with_handler<H: ActionHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub(crate) fn build(self, group: &str) -> Result<Action, RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::EmptyActionName(group.to_string()));
        }
        if !is_routable(&self.name) {
            return Err(RegistryError::UnroutableName(self.name));
        }

        let command = format!("{} {}", group, self.name);
        for parameter in &self.parameters {
            if parameter.name().trim().is_empty() {
                return Err(RegistryError::EmptyParameterName(command));
            }
            if let Some(default) = parameter.default_value() {
                if !default.fits(parameter.kind()) {
                    return Err(RegistryError::DefaultKindMismatch {
                        action: command,
                        parameter: parameter.name().to_string(),
                        expected: parameter.kind().to_string(),
                    });
                }
            }
        }

        let handler = self
            .handler
            .ok_or_else(|| RegistryError::MissingHandler(command.clone()))?;

        Ok(Action {
            name: self.name,
            description: self.description,
            hidden: self.hidden,
            parameters: self.parameters,
            handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn noop() -> ActionBuilder {
        Action::builder("Add").handler(|_a: &BoundArguments, _c: &mut Context<'_>| {})
    }

    #[test]
    fn test_build_action() {
        let action = noop()
            .description("Adds a plugin")
            .param(Parameter::required("name", ValueKind::Text))
            .build("Plugin")
            .unwrap();
        assert_eq!(action.name(), "Add");
        assert_eq!(action.description(), Some("Adds a plugin"));
        assert_eq!(action.parameter_count(), 1);
        assert!(!action.is_hidden());
    }

    #[test]
    fn test_missing_handler() {
        let err = Action::builder("Add").build("Plugin").unwrap_err();
        assert_eq!(err, RegistryError::MissingHandler("Plugin Add".into()));
    }

    #[test]
    fn test_empty_names() {
        let err = Action::builder("")
            .handler(|_a: &BoundArguments, _c: &mut Context<'_>| {})
            .build("Plugin")
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyActionName("Plugin".into()));

        let err = noop()
            .param(Parameter::required(" ", ValueKind::Text))
            .build("Plugin")
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyParameterName("Plugin Add".into()));
    }

    #[test]
    fn test_hyphenated_name_rejected() {
        let err = Action::builder("set-path")
            .handler(|_a: &BoundArguments, _c: &mut Context<'_>| {})
            .build("Plugin")
            .unwrap_err();
        assert_eq!(err, RegistryError::UnroutableName("set-path".into()));

        let err = Action::builder("\"quoted\"")
            .handler(|_a: &BoundArguments, _c: &mut Context<'_>| {})
            .build("Plugin")
            .unwrap_err();
        assert_eq!(err, RegistryError::UnroutableName("\"quoted\"".into()));
    }

    #[test]
    fn test_default_kind_mismatch() {
        let err = noop()
            .param(Parameter::optional("e", ValueKind::U8).with_default(300u16))
            .build("Option")
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DefaultKindMismatch { ref parameter, ref expected, .. }
                if parameter == "e" && expected == "u8"
        ));

        assert!(noop()
            .param(Parameter::optional("e", ValueKind::U8).with_default(123u8))
            .build("Option")
            .is_ok());
    }
}
