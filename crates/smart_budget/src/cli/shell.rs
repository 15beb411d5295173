//! Line input for the shopping-list shell: a rustyline prompt when attached to a
//! terminal user, plain stdin lines in script mode.

use std::io::{self, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::errors::AppError;

/// Presence of this variable switches the shell to line-by-line stdin processing.
pub const SCRIPT_ENV_VAR: &str = "SMART_BUDGET_CLI_SCRIPT";

pub fn run_cli() -> Result<(), AppError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut input = LineInput::open(&context)?;

    if mode == CliMode::Interactive {
        cli_io::print_info("Smart Budget shopping list. Type `help` for commands.");
        if let Err(err) = run_line(&mut context, "list") {
            context.report_error(err)?;
        }
    }

    while context.running {
        let Some(line) = input.next_line(&context)? else {
            break;
        };
        match run_line(&mut context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

enum LineInput {
    Prompt(Box<Editor<CommandCompleter, DefaultHistory>>),
    Script(Lines<StdinLock<'static>>),
}

impl LineInput {
    fn open(context: &ShellContext) -> Result<Self, AppError> {
        match context.mode {
            CliMode::Script => Ok(Self::Script(io::stdin().lines())),
            CliMode::Interactive => {
                let mut editor: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
                editor.set_helper(Some(CommandCompleter::new(context.command_names())));
                Ok(Self::Prompt(Box::new(editor)))
            }
        }
    }

    /// Next non-empty line, or `None` once the user or stdin is done.
    fn next_line(&mut self, context: &ShellContext) -> Result<Option<String>, AppError> {
        match self {
            Self::Script(lines) => Ok(lines.next().transpose()?),
            Self::Prompt(editor) => loop {
                match editor.readline(&context.prompt()) {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        editor.add_history_entry(line).ok();
                        return Ok(Some(line.to_string()));
                    }
                    Err(ReadlineError::Interrupted) => {
                        if context.confirm_exit()? {
                            return Ok(None);
                        }
                    }
                    Err(ReadlineError::Eof) => {
                        cli_io::print_info("Exiting shell.");
                        return Ok(None);
                    }
                    Err(err) => return Err(err.into()),
                }
            },
        }
    }
}

/// Splits and dispatches one line. Blank lines and `#` comments are skipped.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.to_string());
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    tracing::debug!(%command, "dispatching command");

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// Tab completion for the command word; arguments are left alone.
struct CommandCompleter {
    names: Vec<&'static str>,
}

impl CommandCompleter {
    fn new(mut names: Vec<&'static str>) -> Self {
        names.sort_unstable();
        Self { names }
    }

    fn candidates(&self, prefix: &str) -> Vec<Pair> {
        let needle = prefix.to_ascii_lowercase();
        self.names
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        let start = typed.len() - typed.trim_start().len();
        let word = &typed[start..];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.candidates(word)))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}
