use crate::value::{Value, ValueKind};

/// A typed parameter of an action overload.
///
/// ```
/// use switchyard::{Parameter, ValueKind};
///
/// let name = Parameter::required("name", ValueKind::Text)
///     .with_alias("p")
///     .with_description("Name of the plugin");
/// let retries = Parameter::optional("retries", ValueKind::U8).with_default(3u8);
///
/// assert!(!name.is_optional());
/// assert_eq!(name.alias(), Some("p"));
/// assert!(retries.is_optional());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ValueKind,
    optional: bool,
    default: Option<Value>,
    alias: Option<String>,
    description: Option<String>,
}

impl Parameter {
    /// A parameter that must be supplied for its overload to match.
    pub fn required(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
            alias: None,
            description: None,
        }
    }

    /// A parameter that may be omitted.
    ///
    /// Without a default an omitted optional parameter is simply not bound.
    pub fn optional(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            optional: true,
            ..Self::required(name, kind)
        }
    }

    /// Sets the value bound when the parameter is omitted. Implies optional.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.optional = true;
        self
    }

    /// Sets an alternate lookup key, used when the name itself is absent.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
