use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::{Command, CommandTable};

pub fn print_overview(table: &CommandTable) {
    let width = table.names().map(str::len).max().unwrap_or(0);
    for group in table.groups() {
        output::section(group.title);
        for command in group.commands {
            cli_io::print_info(format!("  {:<width$}  {}", command.name, command.summary));
        }
    }
    cli_io::print_hint(
        "Use `help <command>` for details. Items are referenced by list number, name or id prefix.",
    );
}

pub fn print_command(command: &Command) {
    output::section(format!("Help: {}", command.name));
    cli_io::print_info(format!("  {}", command.summary));
    cli_io::print_info(format!("  usage: {}", command.usage));
}
