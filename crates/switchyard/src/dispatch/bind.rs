//! Strict parameter binding for one action overload.

use anyhow::anyhow;
use tracing::trace;

use crate::args::ArgumentStore;
use crate::registry::{Action, Parameter};
use crate::value::{coerce, FromValue, Value};

/// Converted parameter values handed to an action.
///
/// Values are keyed by the parameter's declared name, whichever key (name
/// or alias) the user supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: Vec<(String, Value)>,
}

impl BoundArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.values.push((name.to_string(), value));
    }

    /// The bound value of a parameter, if any.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Typed access to a bound parameter.
    ///
    /// # Errors
    ///
    /// Fails if the parameter is not bound (an optional parameter without a
    /// default that was omitted) or was declared with an incompatible type.
    pub fn get<T: FromValue>(&self, name: &str) -> anyhow::Result<T> {
        let value = self
            .value(name)
            .ok_or_else(|| anyhow!("parameter '{}' is not bound", name))?;
        T::from_value(value.clone())
            .ok_or_else(|| anyhow!("parameter '{}' cannot be read as {}", name, T::kind()))
    }

    /// Typed access returning `None` for unbound or incompatible parameters.
    pub fn get_opt<T: FromValue>(&self, name: &str) -> Option<T> {
        self.value(name).cloned().and_then(T::from_value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Result of binding the store against one overload.
#[derive(Debug)]
pub(crate) enum Binding {
    /// Every required parameter is present and every value converted.
    Bound(BoundArguments),
    /// A required parameter is absent and no value failed to convert.
    Missing,
    /// At least one supplied value failed to convert.
    Invalid(Vec<String>),
}

/// The store key a parameter is read from.
///
/// The alias is consulted only when the declared name is absent.
fn lookup_key<'p>(parameter: &'p Parameter, store: &ArgumentStore) -> &'p str {
    match parameter.alias() {
        Some(alias) if store.get_str(parameter.name()).is_none() => alias,
        _ => parameter.name(),
    }
}

/// Binds every parameter of `action`, collecting all conversion errors.
///
/// Error lines name the key the user typed, which is the alias when the
/// value was supplied through it.
pub(crate) fn bind(action: &Action, store: &ArgumentStore) -> Binding {
    let mut bound = BoundArguments::new();
    let mut errors = Vec::new();
    let mut missing = false;

    for parameter in action.parameters() {
        let key = lookup_key(parameter, store);
        match store.get_str(key) {
            Some(raw) => match coerce(raw, parameter.kind()) {
                Ok(value) => bound.insert(parameter.name(), value),
                Err(err) => errors.push(format!(
                    "Could not convert argument {} ({}) to {} - {}",
                    key,
                    raw,
                    parameter.kind(),
                    err
                )),
            },
            None if parameter.is_optional() => {
                if let Some(default) = parameter.default_value() {
                    bound.insert(parameter.name(), default.clone());
                }
            }
            None => {
                trace!(parameter = parameter.name(), "required parameter absent");
                missing = true;
            }
        }
    }

    if !errors.is_empty() {
        Binding::Invalid(errors)
    } else if missing {
        Binding::Missing
    } else {
        Binding::Bound(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Context;
    use crate::registry::ActionBuilder;
    use crate::value::ValueKind;
    use crate::Options;

    fn action(params: Vec<Parameter>) -> Action {
        params
            .into_iter()
            .fold(
                Action::builder("Test").handler(|_a: &BoundArguments, _c: &mut Context<'_>| {}),
                ActionBuilder::param,
            )
            .build("Option")
            .unwrap()
    }

    fn store(tokens: &[&str]) -> ArgumentStore {
        ArgumentStore::from_args(tokens, &Options::default())
    }

    #[test]
    fn test_bind_all_present() {
        let action = action(vec![
            Parameter::required("name", ValueKind::Text),
            Parameter::required("count", ValueKind::U32),
        ]);
        let Binding::Bound(args) = bind(&action, &store(&["-name:x", "-count:3"])) else {
            panic!("expected bound");
        };
        assert_eq!(args.get::<String>("name").unwrap(), "x");
        assert_eq!(args.get::<u32>("count").unwrap(), 3);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_missing_required_has_no_errors() {
        let action = action(vec![
            Parameter::required("name", ValueKind::Text),
            Parameter::required("count", ValueKind::U32),
        ]);
        assert!(matches!(
            bind(&action, &store(&["-name:x"])),
            Binding::Missing
        ));
    }

    #[test]
    fn test_conversion_errors_collected() {
        let action = action(vec![
            Parameter::required("a", ValueKind::Guid),
            Parameter::required("b", ValueKind::U8),
            Parameter::required("c", ValueKind::Text),
        ]);
        let Binding::Invalid(errors) = bind(&action, &store(&["-a:nope", "-b:999"])) else {
            panic!("expected invalid");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Could not convert argument a (nope) to guid - "));
        assert_eq!(
            errors[1],
            "Could not convert argument b (999) to u8 - value was either too large or too small for u8"
        );
    }

    #[test]
    fn test_defaults_and_unbound_optionals() {
        let action = action(vec![
            Parameter::required("a", ValueKind::Text),
            Parameter::optional("d", ValueKind::Bool).with_default(true),
            Parameter::optional("e", ValueKind::U8).with_default(123u8),
            Parameter::optional("f", ValueKind::Text),
        ]);
        let Binding::Bound(args) = bind(&action, &store(&["-a:x", "-e:7"])) else {
            panic!("expected bound");
        };
        assert!(args.get::<bool>("d").unwrap());
        assert_eq!(args.get::<u8>("e").unwrap(), 7);
        assert!(!args.contains("f"));
        assert_eq!(args.get_opt::<String>("f"), None);
        assert!(args.get::<String>("f").is_err());
    }

    #[test]
    fn test_alias_used_only_when_name_absent() {
        let action = action(vec![Parameter::required("name", ValueKind::Text).with_alias("p")]);

        let Binding::Bound(args) = bind(&action, &store(&["-p:short"])) else {
            panic!("expected bound");
        };
        assert_eq!(args.get::<String>("name").unwrap(), "short");

        let Binding::Bound(args) = bind(&action, &store(&["-p:short", "-name:long"])) else {
            panic!("expected bound");
        };
        assert_eq!(args.get::<String>("name").unwrap(), "long");
    }

    #[test]
    fn test_get_wrong_type_is_error() {
        let mut args = BoundArguments::new();
        args.insert("a", Value::Text("x".into()));
        let err = args.get::<u32>("a").unwrap_err();
        assert_eq!(err.to_string(), "parameter 'a' cannot be read as u32");
        assert_eq!(args.iter().count(), 1);
    }
}
