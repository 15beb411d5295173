use smart_budget_config::ConfigError;
use smart_budget_core::CoreError;
use thiserror::Error;

/// Unified error for everything the shell can hit outside a single command.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<rustyline::error::ReadlineError> for AppError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        AppError::Readline(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
