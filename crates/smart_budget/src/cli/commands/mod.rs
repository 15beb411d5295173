pub mod config;
pub mod history;
pub mod items;
pub mod list;
pub mod system;

use crate::cli::registry::{CommandGroup, CommandTable};

const GROUPS: &[CommandGroup] = &[
    CommandGroup {
        title: "Items",
        commands: items::COMMANDS,
    },
    CommandGroup {
        title: "Budget",
        commands: list::COMMANDS,
    },
    CommandGroup {
        title: "Undo",
        commands: history::COMMANDS,
    },
    CommandGroup {
        title: "Settings",
        commands: config::COMMANDS,
    },
    CommandGroup {
        title: "Shell",
        commands: system::COMMANDS,
    },
];

pub(crate) fn table() -> CommandTable {
    CommandTable::new(GROUPS)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    #[test]
    fn table_exposes_every_command_once() {
        let table = super::table();
        let names: Vec<&str> = table.names().collect();
        for expected in [
            "add", "edit", "buy", "unbuy", "delete", "move", "clear", "list", "budget",
            "summary", "undo", "dismiss", "config", "help", "exit",
        ] {
            assert!(names.contains(&expected), "missing `{expected}`");
        }
        let unique: BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(
            table.find("move").map(|command| command.usage),
            Some("move <item> <target-item>")
        );
    }
}
