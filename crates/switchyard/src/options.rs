//! Configuration consumed by tokenizing, dispatch and help rendering.
//!
//! [`Options`] is plain data: case sensitivity for each kind of name, which
//! global switches are listed in help, and the column layout of the three
//! help row tiers. It derives serde so hosts can load it from whatever
//! format they already use for their own settings.
//!
//! ```rust
//! use switchyard::Options;
//!
//! let options = Options::new()
//!     .case_sensitive_groups(false)
//!     .show_verbosity_switch(false);
//!
//! assert!(!options.case_sensitive_groups);
//! assert!(options.show_help_switch);
//! ```

use serde::{Deserialize, Serialize};

/// How two names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Names must match exactly.
    Sensitive,
    /// Names match ignoring case.
    #[default]
    Insensitive,
}

impl CaseMode {
    /// Picks the mode for a "case sensitive" configuration flag.
    pub fn from_sensitive(sensitive: bool) -> Self {
        if sensitive {
            CaseMode::Sensitive
        } else {
            CaseMode::Insensitive
        }
    }

    /// Compares two names under this mode.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            CaseMode::Sensitive => a == b,
            CaseMode::Insensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }

    /// Folds a name into the form used as a lookup key.
    pub fn fold(self, name: &str) -> String {
        match self {
            CaseMode::Sensitive => name.to_string(),
            CaseMode::Insensitive => name.to_lowercase(),
        }
    }
}

/// Layout of one tier of help rows.
///
/// A row is rendered as `prefix`, the name padded to `min_width`, `suffix`,
/// then the description. A name that fills the column is still followed by
/// one space when the suffix is empty. Trailing whitespace is dropped so rows
/// without a description don't end in padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    /// Text written before the name.
    pub prefix: String,
    /// Minimum width of the name column.
    pub min_width: usize,
    /// Text written between the padded name and the description.
    pub suffix: String,
}

impl RowLayout {
    /// Creates a row layout.
    pub fn new(prefix: impl Into<String>, min_width: usize, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            min_width,
            suffix: suffix.into(),
        }
    }

    /// Formats one help row.
    pub fn format(&self, name: &str, description: &str) -> String {
        let mut pad = self.min_width.saturating_sub(name.chars().count());
        if pad == 0 && self.suffix.is_empty() {
            pad = 1;
        }
        let line = format!(
            "{}{}{}{}{}",
            self.prefix,
            name,
            " ".repeat(pad),
            self.suffix,
            description
        );
        line.trim_end().to_string()
    }
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::new("", 20, "")
    }
}

/// Dispatch and help configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// List the `?` switch at the top of generated help.
    pub show_help_switch: bool,
    /// List the `v` switch at the top of generated help.
    pub show_verbosity_switch: bool,
    /// Group names (the primary option) must match exactly.
    pub case_sensitive_groups: bool,
    /// Action names (the sub option) must match exactly.
    pub case_sensitive_actions: bool,
    /// Parameter names and aliases must match exactly.
    pub case_sensitive_parameters: bool,
    /// Rows for global switches and the group listing.
    pub switch_rows: RowLayout,
    /// Rows for the actions of a group.
    pub action_rows: RowLayout,
    /// Rows for the parameters of an action.
    pub parameter_rows: RowLayout,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_help_switch: true,
            show_verbosity_switch: true,
            case_sensitive_groups: true,
            case_sensitive_actions: false,
            case_sensitive_parameters: false,
            switch_rows: RowLayout::new("", 22, ""),
            action_rows: RowLayout::new("  ", 20, "  "),
            parameter_rows: RowLayout::new("   ", 18, "  "),
        }
    }
}

impl Options {
    /// Creates options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the help switch is listed in help output.
    pub fn show_help_switch(mut self, show: bool) -> Self {
        self.show_help_switch = show;
        self
    }

    /// Sets whether the verbosity switch is listed in help output.
    pub fn show_verbosity_switch(mut self, show: bool) -> Self {
        self.show_verbosity_switch = show;
        self
    }

    /// Sets case sensitivity for group names.
    pub fn case_sensitive_groups(mut self, sensitive: bool) -> Self {
        self.case_sensitive_groups = sensitive;
        self
    }

    /// Sets case sensitivity for action names.
    pub fn case_sensitive_actions(mut self, sensitive: bool) -> Self {
        self.case_sensitive_actions = sensitive;
        self
    }

    /// Sets case sensitivity for parameter names and aliases.
    pub fn case_sensitive_parameters(mut self, sensitive: bool) -> Self {
        self.case_sensitive_parameters = sensitive;
        self
    }

    /// Sets the layout of switch and group rows.
    pub fn switch_rows(mut self, layout: RowLayout) -> Self {
        self.switch_rows = layout;
        self
    }

    /// Sets the layout of action rows.
    pub fn action_rows(mut self, layout: RowLayout) -> Self {
        self.action_rows = layout;
        self
    }

    /// Sets the layout of parameter rows.
    pub fn parameter_rows(mut self, layout: RowLayout) -> Self {
        self.parameter_rows = layout;
        self
    }

    pub fn group_case(&self) -> CaseMode {
        CaseMode::from_sensitive(self.case_sensitive_groups)
    }

    pub fn action_case(&self) -> CaseMode {
        CaseMode::from_sensitive(self.case_sensitive_actions)
    }

    pub fn parameter_case(&self) -> CaseMode {
        CaseMode::from_sensitive(self.case_sensitive_parameters)
    }
}
