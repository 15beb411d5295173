use smart_budget_config::ConfigKey;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::Command;
use crate::cli::shell_context::CliMode;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "config",
        summary: "View and change preferences",
        usage: "config [show|set <key> <value>]",
        run: cmd_config,
    },
];

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <key> <value>".into(),
                ));
            }
            let key: ConfigKey = args[1].parse()?;
            let value = args[2..].join(" ");
            set_config_value(context, key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        cli_io::print_info(format!("  {:<27}{}", key, value));
    }
    cli_io::print_info(format!(
        "  {:<27}{}",
        "data directory",
        context.config.resolve_data_root(&context.home).display()
    ));
    cli_io::print_info(format!(
        "  {:<27}{}",
        "config file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: ConfigKey, value: &str) -> CommandResult {
    context
        .config_manager
        .update(&mut context.config, key, value)?;
    tracing::info!(%key, "configuration updated");

    match key {
        ConfigKey::UiColorEnabled => output::set_preferences(OutputPreferences {
            color_enabled: context.config.ui_color_enabled && context.mode == CliMode::Interactive,
        }),
        ConfigKey::UndoWindowSecs | ConfigKey::WarningThresholdPercent | ConfigKey::DataRoot => {
            cli_io::print_hint("This setting takes effect the next time the shell starts.");
        }
        ConfigKey::Locale | ConfigKey::Currency => {}
    }
    cli_io::print_success("Configuration updated.");
    Ok(())
}
