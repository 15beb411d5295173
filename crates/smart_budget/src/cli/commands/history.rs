use smart_budget_core::UndoOutcome;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::Command;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "undo",
        summary: "Revert the last change while its undo window is open",
        usage: "undo",
        run: cmd_undo,
    },
    Command {
        name: "dismiss",
        summary: "Drop the pending undo without reverting",
        usage: "dismiss",
        run: cmd_dismiss,
    },
];

fn cmd_undo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.block_on(context.list.undo())? {
        UndoOutcome::Reverted(kind) => {
            cli_io::print_success(format!("Undid last {kind}."));
        }
        UndoOutcome::NothingPending => {
            cli_io::print_info("Nothing to undo.");
        }
    }
    Ok(())
}

fn cmd_dismiss(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.block_on(context.list.dismiss_undo()) {
        cli_io::print_info("Undo dismissed.");
    } else {
        cli_io::print_info("Nothing to dismiss.");
    }
    Ok(())
}
