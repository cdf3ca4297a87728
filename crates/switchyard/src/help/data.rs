//! Introspection of the registry into help rows.

use serde::Serialize;

use crate::args::ArgumentStore;
use crate::dispatch::HELP_SWITCH;
use crate::options::{CaseMode, Options};
use crate::registry::{Action, CommandGroup};
use crate::verbosity::VERBOSITY_SWITCH;

/// What the user asked help for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpTopic {
    /// Every candidate group.
    Groups,
    /// The actions of one group.
    Actions { group: String },
    /// The parameters of one action.
    Parameters { group: String, action: String },
}

impl HelpTopic {
    pub fn from_store(store: &ArgumentStore) -> Self {
        match (store.primary_option(), store.sub_option()) {
            ("", _) => HelpTopic::Groups,
            (group, "") => HelpTopic::Actions {
                group: group.to_string(),
            },
            (group, action) => HelpTopic::Parameters {
                group: group.to_string(),
                action: action.to_string(),
            },
        }
    }
}

/// A name and its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpRow {
    pub name: String,
    pub description: String,
}

impl HelpRow {
    fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Which row layout a section uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Switch,
    Action,
    Parameter,
}

/// A block of rows sharing one layout, optionally under a heading row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpSection {
    pub heading: Option<HelpRow>,
    pub tier: Tier,
    pub rows: Vec<HelpRow>,
}

/// Everything a help screen shows, before layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpPage {
    pub topic: HelpTopic,
    /// Global switches enabled for display.
    pub switches: Vec<HelpRow>,
    pub sections: Vec<HelpSection>,
    /// Set when the requested group or action does not exist.
    pub not_found: Option<String>,
}

/// Collects the help page for the topic in `store`.
///
/// `groups` are the candidate groups in sort order.
pub fn collect(groups: &[&CommandGroup], store: &ArgumentStore, options: &Options) -> HelpPage {
    let topic = HelpTopic::from_store(store);
    let mut page = HelpPage {
        topic: topic.clone(),
        switches: switch_rows(options),
        sections: Vec::new(),
        not_found: None,
    };

    match &topic {
        HelpTopic::Groups => {
            page.sections.push(HelpSection {
                heading: None,
                tier: Tier::Switch,
                rows: groups
                    .iter()
                    .map(|g| HelpRow::new(g.name(), g.description().unwrap_or_default()))
                    .collect(),
            });
        }
        HelpTopic::Actions { group } => match find_group(groups, group, options.group_case()) {
            Some(group) => page.sections.push(action_section(group, options.action_case())),
            None => page.not_found = Some(format!("Command group '{}' was not found", group)),
        },
        HelpTopic::Parameters { group, action } => {
            match find_group(groups, group, options.group_case()) {
                Some(found) => match widest_overload(found, action, options.action_case()) {
                    Some(overload) => page.sections.push(parameter_section(found, overload)),
                    None => {
                        page.not_found = Some(format!(
                            "Action '{}' was not found in '{}'",
                            action,
                            found.name()
                        ));
                        page.sections.push(action_section(found, options.action_case()));
                    }
                },
                None => page.not_found = Some(format!("Command group '{}' was not found", group)),
            }
        }
    }

    page
}

fn switch_rows(options: &Options) -> Vec<HelpRow> {
    let mut rows = Vec::new();
    if options.show_help_switch {
        rows.push(HelpRow::new(format!("-{}", HELP_SWITCH), "Display help"));
    }
    if options.show_verbosity_switch {
        rows.push(HelpRow::new(
            format!("-{}:<level>", VERBOSITY_SWITCH),
            "Verbosity: 0 Quiet, 1 Normal, 2 Diagnostic, 3 Full",
        ));
    }
    rows
}

fn find_group<'g>(
    groups: &[&'g CommandGroup],
    name: &str,
    case: CaseMode,
) -> Option<&'g CommandGroup> {
    groups.iter().copied().find(|g| case.matches(g.name(), name))
}

fn action_section(group: &CommandGroup, case: CaseMode) -> HelpSection {
    let mut seen: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for action in group.actions().iter().filter(|a| !a.is_hidden()) {
        let key = case.fold(action.name());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        rows.push(HelpRow::new(
            action.name(),
            action.description().unwrap_or_default(),
        ));
    }
    HelpSection {
        heading: Some(HelpRow::new(
            group.name(),
            group.description().unwrap_or_default(),
        )),
        tier: Tier::Action,
        rows,
    }
}

/// The overload named `name` with the most parameters; the first declared wins ties.
fn widest_overload<'g>(group: &'g CommandGroup, name: &str, case: CaseMode) -> Option<&'g Action> {
    group
        .actions()
        .iter()
        .filter(|a| case.matches(a.name(), name))
        .fold(None, |best: Option<&Action>, a| match best {
            Some(b) if b.parameter_count() >= a.parameter_count() => Some(b),
            _ => Some(a),
        })
}

fn parameter_section(group: &CommandGroup, action: &Action) -> HelpSection {
    let rows = action
        .parameters()
        .iter()
        .map(|p| {
            let description = p.description().unwrap_or_default();
            let description = match p.alias() {
                Some(alias) => format!("(abbr. -{}) {}", alias, description),
                None => description.to_string(),
            };
            HelpRow::new(format!("-{}", p.name()), description)
        })
        .collect();
    HelpSection {
        heading: Some(HelpRow::new(
            format!("{} {}", group.name(), action.name()),
            action.description().unwrap_or_default(),
        )),
        tier: Tier::Parameter,
        rows,
    }
}
