//! Static command tables, grouped under the headings `help` prints.

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub run: CommandHandler,
}

pub struct CommandGroup {
    pub title: &'static str,
    pub commands: &'static [Command],
}

/// Every command the shell understands, in help order.
#[derive(Clone, Copy)]
pub struct CommandTable {
    groups: &'static [CommandGroup],
}

impl CommandTable {
    pub const fn new(groups: &'static [CommandGroup]) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &'static [CommandGroup] {
        self.groups
    }

    pub fn commands(&self) -> impl Iterator<Item = &'static Command> {
        self.groups.iter().flat_map(|group| group.commands.iter())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.commands().map(|command| command.name)
    }

    /// Looks up a command by its lowercase name.
    pub fn find(&self, name: &str) -> Option<&'static Command> {
        self.commands().find(|command| command.name == name)
    }
}
