//! Layout of help pages into display lines.

use crate::args::ArgumentStore;
use crate::dispatch::exit_code;
use crate::display::Display;
use crate::help::data::{collect, HelpPage, Tier};
use crate::options::{Options, RowLayout};
use crate::registry::CommandGroup;
use crate::verbosity::Verbosity;

fn layout(options: &Options, tier: Tier) -> &RowLayout {
    match tier {
        Tier::Switch => &options.switch_rows,
        Tier::Action => &options.action_rows,
        Tier::Parameter => &options.parameter_rows,
    }
}

/// Lays a help page out as lines.
///
/// Switch rows come first, followed by a blank line when any are shown.
/// Section headings use the switch layout; their rows use the section's
/// tier.
pub fn render_lines(page: &HelpPage, options: &Options) -> Vec<String> {
    let mut lines: Vec<String> = page
        .switches
        .iter()
        .map(|row| options.switch_rows.format(&row.name, &row.description))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }

    if let Some(message) = &page.not_found {
        lines.push(message.clone());
    }

    for section in &page.sections {
        if let Some(heading) = &section.heading {
            lines.push(options.switch_rows.format(&heading.name, &heading.description));
        }
        let rows = layout(options, section.tier);
        lines.extend(
            section
                .rows
                .iter()
                .map(|row| rows.format(&row.name, &row.description)),
        );
    }

    lines
}

/// Renders help for the topic in `store` to `display`.
///
/// Every line is written at [`Verbosity::Quiet`] so help shows at any
/// verbosity. Returns [`exit_code::HELP_GROUP_NOT_FOUND`] when the requested
/// group does not exist.
pub fn render(
    groups: &[&CommandGroup],
    store: &ArgumentStore,
    options: &Options,
    display: &mut dyn Display,
) -> i32 {
    let page = collect(groups, store, options);
    for line in render_lines(&page, options) {
        display.write_line(Verbosity::Quiet, &line);
    }

    let group_missing = page.not_found.is_some() && page.sections.is_empty();
    if group_missing {
        exit_code::HELP_GROUP_NOT_FOUND
    } else {
        exit_code::SUCCESS
    }
}
