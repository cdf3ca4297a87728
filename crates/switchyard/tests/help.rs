//! Help output with the default row layouts.

use insta::assert_snapshot;
use switchyard::help::{collect, render_lines};
use switchyard::{
    exit_code, Action, ArgumentStore, BoundArguments, BufferDisplay, CommandGroup, Context,
    Options, Outcome, Parameter, Processor, Registry, ValueKind, Verbosity,
};

// ============================================================================
// Test registry
// ============================================================================

fn noop(name: &str) -> switchyard::ActionBuilder {
    Action::builder(name).handler(|_args: &BoundArguments, _ctx: &mut Context| {})
}

fn groups() -> Vec<CommandGroup> {
    let plugin = CommandGroup::builder("Plugin")
        .description("Manage plugins")
        .sort_order(1)
        .default_action(|_args: &[String], _ctx: &mut Context| {})
        .action(
            noop("Add")
                .description("Add a plugin")
                .param(
                    Parameter::required("name", ValueKind::Text)
                        .with_alias("p")
                        .with_description("Name of plugin"),
                )
                .param(Parameter::optional("force", ValueKind::Bool)),
        )
        .action(
            noop("Remove")
                .description("Remove a plugin")
                .param(Parameter::required("name", ValueKind::Text).with_alias("p")),
        )
        .action(noop("Reindex").hidden(true))
        .build()
        .unwrap();

    let sync = CommandGroup::builder("Sync")
        .description("Synchronize data")
        .sort_order(0)
        .default_action(|_args: &[String], _ctx: &mut Context| {})
        .build()
        .unwrap();

    let legacy = CommandGroup::builder("Legacy")
        .description("Old commands")
        .sort_order(2)
        .enabled(false)
        .default_action(|_args: &[String], _ctx: &mut Context| {})
        .build()
        .unwrap();

    vec![plugin, sync, legacy]
}

fn help(tokens: &[&str]) -> String {
    let mut processor = Processor::builder()
        .name("plugin-tool")
        .groups(groups())
        .build()
        .unwrap();
    let mut display = BufferDisplay::new(Verbosity::Quiet);
    let result = processor.run_with(tokens, &mut display).unwrap();
    assert_eq!(result.outcome, Outcome::HelpDisplayed);
    display.output()
}

// ============================================================================
// Levels
// ============================================================================

#[test]
fn test_group_listing() {
    assert_snapshot!(help(&["-?"]), @r"
    plugin-tool
    -?                    Display help
    -v:<level>            Verbosity: 0 Quiet, 1 Normal, 2 Diagnostic, 3 Full

    Sync                  Synchronize data
    Plugin                Manage plugins
    Legacy                Old commands
    ");
}

#[test]
fn test_action_listing() {
    assert_snapshot!(help(&["Plugin", "-?"]), @r"
    plugin-tool
    -?                    Display help
    -v:<level>            Verbosity: 0 Quiet, 1 Normal, 2 Diagnostic, 3 Full

    Plugin                Manage plugins
      Add                   Add a plugin
      Remove                Remove a plugin
    ");
}

#[test]
fn test_parameter_listing() {
    assert_snapshot!(help(&["Plugin", "Add", "-?"]), @r"
    plugin-tool
    -?                    Display help
    -v:<level>            Verbosity: 0 Quiet, 1 Normal, 2 Diagnostic, 3 Full

    Plugin Add            Add a plugin
       -name               (abbr. -p) Name of plugin
       -force
    ");
}

#[test]
fn test_unknown_group_exit_code() {
    let mut processor = Processor::builder()
        .name("plugin-tool")
        .groups(groups())
        .build()
        .unwrap();
    let mut display = BufferDisplay::new(Verbosity::Quiet);

    let result = processor.run_with(["Nope", "-?"], &mut display).unwrap();

    assert_eq!(result.outcome, Outcome::HelpDisplayed);
    assert_eq!(result.exit_code, exit_code::HELP_GROUP_NOT_FOUND);
    assert_eq!(
        display.text().last(),
        Some(&"Command group 'Nope' was not found")
    );
}

#[test]
fn test_disabled_group_is_not_routed() {
    let mut processor = Processor::builder()
        .name("plugin-tool")
        .groups(groups())
        .build()
        .unwrap();
    let mut display = BufferDisplay::new(Verbosity::Quiet);

    let result = processor.run_with(["Legacy"], &mut display).unwrap();
    assert_eq!(result.outcome, Outcome::NotEnoughGroupCandidates);

    let result = processor.run_with(["Legacy", "-?"], &mut display).unwrap();
    assert_eq!(result.exit_code, exit_code::SUCCESS);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_rendering_is_idempotent() {
    let registry = Registry::new(groups());
    let options = Options::default();
    let groups: Vec<&CommandGroup> = registry.groups().iter().collect();

    for tokens in [
        vec!["-?"],
        vec!["Plugin", "-?"],
        vec!["Plugin", "Add", "-?"],
        vec!["Plugin", "Zap", "-?"],
    ] {
        let store = ArgumentStore::from_args(&tokens, &options);
        let first = render_lines(&collect(&groups, &store, &options), &options);
        let second = render_lines(&collect(&groups, &store, &options), &options);
        assert_eq!(first, second);
    }
}

#[test]
fn test_help_ignores_verbosity() {
    let mut processor = Processor::builder()
        .name("plugin-tool")
        .groups(groups())
        .options(Options::default().show_verbosity_switch(false))
        .build()
        .unwrap();
    let mut quiet = BufferDisplay::new(Verbosity::Quiet);
    let mut full = BufferDisplay::new(Verbosity::Full);

    processor.run_with(["Sync", "-?"], &mut quiet).unwrap();
    processor.run_with(["Sync", "-?"], &mut full).unwrap();

    let help_lines = |display: &BufferDisplay| -> Vec<String> {
        display
            .lines()
            .iter()
            .filter(|l| l.kind == switchyard::LineKind::Leveled(Verbosity::Quiet))
            .map(|l| l.text.clone())
            .collect()
    };
    assert_eq!(help_lines(&quiet), help_lines(&full));
    assert_eq!(
        help_lines(&quiet),
        vec![
            "plugin-tool",
            "-?                    Display help",
            "",
            "Sync                  Synchronize data",
        ]
    );
}
