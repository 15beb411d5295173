//! Dispatch, error reporting and shared helpers for shell commands.

use std::io;

use smart_budget_config::ConfigError;
use smart_budget_core::CoreError;
use smart_budget_domain::ShoppingItem;
use strsim::levenshtein;

use crate::errors::AppError;

use super::io as cli_io;
use super::render;
use super::selectors::{self, SelectorError};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<SelectorError> for CommandError {
    fn from(err: SelectorError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        AppError::Command(err.to_string())
    }
}

impl ShellContext {
    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.commands.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        "shopping> ".into()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.commands.find(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let result = match (entry.run)(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        };
        if self.take_updates() {
            self.after_update()?;
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .commands
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Re-renders the budget header after a `budgetUpdate` and advertises the undo slot.
    fn after_update(&self) -> CommandResult {
        let view = self.block_on(self.list.snapshot())?;
        render::print_budget_header(&view.summary, &self.config);
        if let Some(pending) = self.block_on(self.list.pending_undo()) {
            cli_io::print_hint(format!(
                "{} (type `undo` within {}s)",
                pending.description,
                pending.expires_in.as_secs_f64().ceil() as u64
            ));
        }
        Ok(())
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, AppError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(AppError::from)
    }

    /// Asks before destructive commands. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), AppError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::Validation(message)) => {
                self.print_error(&format!("Invalid input: {message}"));
                Ok(())
            }
            CommandError::Core(CoreError::NotFound(_)) => {
                self.print_error("That item no longer exists.");
                self.print_hint("Run `list` to refresh item numbers.");
                Ok(())
            }
            CommandError::Core(CoreError::UndoConflict(message)) => {
                self.print_warning(&format!("Undo could not be applied: {message}"));
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    pub(crate) fn items(&self) -> Result<Vec<ShoppingItem>, CommandError> {
        Ok(self.block_on(self.list.store().list())?)
    }

    /// Resolves a list number, name or id prefix to the current item.
    pub(crate) fn resolve_item_detail(&self, reference: &str) -> Result<ShoppingItem, CommandError> {
        let items = self.items()?;
        let id = selectors::resolve(reference, &self.last_listing, &items)?;
        items
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(CommandError::Core(CoreError::NotFound(id)))
    }
}

pub(crate) fn parse_amount(input: &str, label: &str) -> Result<f64, CommandError> {
    let cleaned = input.trim().trim_start_matches('$');
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid {label} `{input}`")))
}

#[cfg(test)]
pub(crate) fn process_script(
    home: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, AppError> {
    let mut app = ShellContext::with_home(CliMode::Script, home.to_path_buf())?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}
