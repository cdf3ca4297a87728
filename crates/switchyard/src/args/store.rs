use tracing::trace;

use crate::args::tokenizer::{tokenize, ParsedArguments};
use crate::error::ArgumentError;
use crate::options::{CaseMode, Options};
use crate::value::{coerce, FromValue};

/// Read-only view over one invocation's parsed arguments.
///
/// Lookups fold names with the same case mode the tokenizer used for keys.
/// [`get`](Self::get) is lenient: a missing value or one that does not
/// convert yields the caller's default and never an error.
///
/// ```
/// use switchyard::{ArgumentStore, Options};
///
/// let store = ArgumentStore::from_args(["Plugin", "Add", "-Count:3", "-debug"], &Options::default());
///
/// assert_eq!(store.primary_option(), "Plugin");
/// assert_eq!(store.get::<u32>("count", 1), 3);
/// assert_eq!(store.get::<u32>("missing", 1), 1);
/// assert!(store.get::<bool>("debug", false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgumentStore {
    parsed: ParsedArguments,
    case: CaseMode,
}

impl ArgumentStore {
    /// Wraps already tokenized arguments.
    pub fn new(parsed: ParsedArguments, case: CaseMode) -> Self {
        Self { parsed, case }
    }

    /// Tokenizes `tokens` with the configured parameter case sensitivity.
    pub fn from_args<I, S>(tokens: I, options: &Options) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let case = options.parameter_case();
        Self::new(tokenize(tokens, case), case)
    }

    /// Tokenizes the current process arguments, skipping the program name.
    pub fn from_env(options: &Options) -> Self {
        Self::from_args(std::env::args().skip(1), options)
    }

    pub fn primary_option(&self) -> &str {
        self.parsed.primary_option()
    }

    pub fn sub_option(&self) -> &str {
        self.parsed.sub_option()
    }

    /// Case mode used to fold argument names.
    pub fn case(&self) -> CaseMode {
        self.case
    }

    /// Number of distinct named arguments.
    pub fn len(&self) -> usize {
        self.parsed.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.values().is_empty()
    }

    /// Returns true if a named argument was supplied, even without a value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::EmptyName`] if `name` is empty.
    pub fn contains(&self, name: &str) -> Result<bool, ArgumentError> {
        if name.is_empty() {
            return Err(ArgumentError::EmptyName);
        }
        Ok(self.parsed.values().contains_key(&self.case.fold(name)))
    }

    /// Raw text of a named argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        if name.is_empty() {
            return None;
        }
        self.parsed
            .values()
            .get(&self.case.fold(name))
            .map(String::as_str)
    }

    /// Typed lookup falling back to `default` when absent or unconvertible.
    pub fn get<T: FromValue>(&self, name: &str, default: T) -> T {
        let Some(raw) = self.get_str(name) else {
            return default;
        };
        match coerce(raw, &T::kind()) {
            Ok(value) => T::from_value(value).unwrap_or(default),
            Err(err) => {
                trace!(name, raw, error = %err, "lenient lookup fell back to default");
                default
            }
        }
    }

    /// Typed lookup falling back to `T::default()`.
    pub fn get_or_default<T: FromValue + Default>(&self, name: &str) -> T {
        self.get(name, T::default())
    }

    /// Every named argument rendered as `key=value`, ordered by key.
    pub fn all_arguments(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }

    /// Iterates named arguments ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parsed
            .values()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parsed(&self) -> &ParsedArguments {
        &self.parsed
    }
}
