use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io as cli_io;
use crate::cli::registry::Command;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "version",
        summary: "Show the application version",
        usage: "version",
        run: cmd_version,
    },
    Command {
        name: "help",
        summary: "Show available commands",
        usage: "help [command]",
        run: cmd_help,
    },
    Command {
        name: "exit",
        summary: "Exit the shell",
        usage: "exit",
        run: cmd_exit,
    },
];

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    cli_io::print_info(format!("Smart Budget {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(entry) = context.commands.find(&command) {
            help::print_command(entry);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.commands);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
