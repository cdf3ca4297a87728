//! plugin-tool: a small plugin manager driven by switchyard.
//!
//! ```text
//! plugin-tool Plugin Add -name:spellcheck
//! plugin-tool Plugin Add -p:lint '-path:"./plugins/lint"'
//! plugin-tool Plugin Disable -p:lint -v:2
//! plugin-tool Plugin -?
//! ```
//!
//! An unquoted `/` inside a value starts a new argument, so paths are
//! passed quoted. The outer single quotes keep the shell from stripping the
//! double quotes the tokenizer needs.
//!
//! Set `RUST_LOG=switchyard=debug` to trace routing decisions.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use switchyard::{
    Action, ActionBuilder, BoundArguments, CommandGroup, Context, Parameter, Processor,
    RegistryError, ValueKind, Verbosity,
};
use tracing::debug;

/// Known plugins and whether each is enabled.
type Plugins = Rc<RefCell<BTreeMap<String, bool>>>;

fn name_param() -> Parameter {
    Parameter::required("name", ValueKind::Text)
        .with_alias("p")
        .with_description("Name of the plugin")
}

fn set_enabled(plugins: &Plugins, enabled: bool) -> ActionBuilder {
    let plugins = Rc::clone(plugins);
    let (verb, description) = if enabled {
        ("Enable", "Enable an installed plugin")
    } else {
        ("Disable", "Disable an installed plugin")
    };
    Action::builder(verb)
        .description(description)
        .param(name_param())
        .handler(move |args: &BoundArguments, ctx: &mut Context| -> anyhow::Result<i32> {
            let name: String = args.get("name")?;
            match plugins.borrow_mut().get_mut(&name) {
                Some(state) => {
                    *state = enabled;
                    ctx.write_line(Verbosity::Normal, &format!("{}d {}", verb, name));
                    Ok(0)
                }
                None => {
                    let message = format!("Plugin '{}' is not installed", name);
                    ctx.write_line(Verbosity::Quiet, &message);
                    Ok(1)
                }
            }
        })
}

fn plugin_group(plugins: &Plugins) -> Result<CommandGroup, RegistryError> {
    let add = Rc::clone(plugins);
    let add_from = Rc::clone(plugins);
    let remove = Rc::clone(plugins);
    let list = Rc::clone(plugins);

    CommandGroup::builder("Plugin")
        .description("Manage plugins")
        .default_action(|args: &[String], ctx: &mut Context| {
            ctx.write_line(Verbosity::Quiet, "Unrecognized plugin command. Try 'Plugin -?'.");
            for arg in args {
                ctx.write_line(Verbosity::Normal, &format!("[tab]{}", arg));
            }
            2
        })
        .action(
            Action::builder("Add")
                .description("Install a plugin from the registry")
                .param(name_param())
                .handler(move |args: &BoundArguments, ctx: &mut Context| -> anyhow::Result<()> {
                    let name: String = args.get("name")?;
                    add.borrow_mut().insert(name.clone(), true);
                    ctx.write_line(Verbosity::Normal, &format!("Added {}", name));
                    Ok(())
                }),
        )
        .action(
            Action::builder("Add")
                .description("Install a plugin from a local path")
                .param(name_param())
                .param(
                    Parameter::required("path", ValueKind::Text)
                        .with_description("Directory holding the plugin"),
                )
                .handler(move |args: &BoundArguments, ctx: &mut Context| -> anyhow::Result<()> {
                    let name: String = args.get("name")?;
                    let path: String = args.get("path")?;
                    if path.trim().is_empty() {
                        anyhow::bail!("path for plugin '{}' is empty", name);
                    }
                    add_from.borrow_mut().insert(name.clone(), true);
                    ctx.write_line(Verbosity::Normal, &format!("Added {} from {}", name, path));
                    Ok(())
                }),
        )
        .action(
            Action::builder("Remove")
                .description("Uninstall a plugin")
                .param(name_param())
                .handler(move |args: &BoundArguments, ctx: &mut Context| -> anyhow::Result<i32> {
                    let name: String = args.get("name")?;
                    let code = if remove.borrow_mut().remove(&name).is_some() {
                        ctx.write_line(Verbosity::Normal, &format!("Removed {}", name));
                        0
                    } else {
                        ctx.write_line(Verbosity::Quiet, &format!("Plugin '{}' is not installed", name));
                        1
                    };
                    Ok(code)
                }),
        )
        .action(set_enabled(plugins, true))
        .action(set_enabled(plugins, false))
        .action(
            Action::builder("List")
                .description("List installed plugins")
                .handler(move |_args: &BoundArguments, ctx: &mut Context| {
                    for (name, enabled) in list.borrow().iter() {
                        let state = if *enabled { "enabled" } else { "disabled" };
                        ctx.write_line(Verbosity::Quiet, &format!("{}[tab]{}", name, state));
                    }
                }),
        )
        .build()
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let plugins: Plugins = Rc::new(RefCell::new(BTreeMap::from([
        ("core".to_string(), true),
        ("spellcheck".to_string(), false),
    ])));

    let processor = plugin_group(&plugins).and_then(|group| {
        Processor::builder()
            .name("plugin-tool")
            .group(group)
            .build()
    });
    let mut processor = match processor {
        Ok(processor) => processor,
        Err(err) => {
            eprintln!("plugin-tool: {}", err);
            std::process::exit(1);
        }
    };

    let code = match processor.run_env() {
        Ok(dispatched) => {
            debug!(outcome = ?dispatched.outcome, "finished");
            dispatched.exit_code
        }
        Err(_) => 1,
    };
    std::process::exit(code);
}
