//! Error types for argument lookup, value coercion, registry integrity and dispatch.

use thiserror::Error;

/// Errors raised by argument store lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A lookup was attempted with an empty name.
    #[error("argument name must not be empty")]
    EmptyName,
}

/// Failure to convert raw argument text into a declared type.
///
/// The three variants mirror the classes of conversion failure the binder
/// reports: malformed text, a well-formed number outside the target range,
/// and a value the target type cannot represent at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The text is not in a format the target type accepts.
    #[error("{0}")]
    Format(String),

    /// The text is a valid number but outside the target type's range.
    #[error("value was either too large or too small for {0}")]
    Overflow(String),

    /// The text names nothing the target type can hold.
    #[error("{0}")]
    InvalidCast(String),
}

impl CoercionError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub(crate) fn invalid_cast(message: impl Into<String>) -> Self {
        Self::InvalidCast(message.into())
    }
}

/// The registry does not satisfy the command-group contract.
///
/// These are host programming errors and are reported before any dispatch
/// behavior is visible to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The processor was given an empty process name.
    #[error("process name must not be empty")]
    EmptyProcessName,

    /// The processor was given no command groups.
    #[error("at least one command group must be registered")]
    NoGroups,

    /// A command group was registered without a name.
    #[error("command group name must not be empty")]
    EmptyGroupName,

    /// A group or action name contains a character the tokenizer treats as
    /// a separator, so no command line could ever select it.
    #[error("command name '{0}' contains whitespace or one of - / \" and cannot be typed")]
    UnroutableName(String),

    /// A command group has no default action.
    #[error("command group '{0}' has no default action")]
    MissingDefaultAction(String),

    /// An action was registered without a name.
    #[error("command group '{0}' has an action without a name")]
    EmptyActionName(String),

    /// An action was registered without a handler.
    #[error("action '{0}' has no handler")]
    MissingHandler(String),

    /// A parameter was registered without a name.
    #[error("action '{0}' has a parameter without a name")]
    EmptyParameterName(String),

    /// A parameter's default value does not fit its declared type.
    #[error("default value of parameter '{parameter}' in action '{action}' is not a valid {expected}")]
    DefaultKindMismatch {
        action: String,
        parameter: String,
        expected: String,
    },

    /// Two parameters (or a parameter and an alias) of one action share a key.
    #[error("action '{group} {action}' declares parameter key '{key}' more than once")]
    DuplicateParameter {
        group: String,
        action: String,
        key: String,
    },

    /// Two overloads of one action accept exactly the same parameter names.
    #[error("action '{group} {action}' has two overloads with the same parameters")]
    DuplicateOverload { group: String, action: String },
}

/// Errors that abort a dispatch.
///
/// Routing and shape problems are not errors; they are reported through
/// [`Outcome`](crate::Outcome). Only host programming errors and failing
/// actions end up here.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The registry failed its integrity check.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The invoked action returned an error.
    #[error("action '{command}' failed: {source}")]
    Action {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl DispatchError {
    pub(crate) fn action(command: impl Into<String>, error: anyhow::Error) -> Self {
        Self::Action {
            command: command.into(),
            source: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_error_display() {
        let err = CoercionError::Overflow("u8".into());
        assert_eq!(err.to_string(), "value was either too large or too small for u8");

        let err = CoercionError::format("bad text");
        assert_eq!(err.to_string(), "bad text");
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::MissingDefaultAction("Plugin".into());
        assert_eq!(err.to_string(), "command group 'Plugin' has no default action");
    }

    #[test]
    fn test_dispatch_error_wraps_action_failure() {
        let err = DispatchError::action("Plugin Add", anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "action 'Plugin Add' failed: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
