use smart_budget_domain::{UnknownTier, ValidationError};
use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(Uuid),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Undo could not be applied: {0}")]
    UndoConflict(String),
}

impl CoreError {
    /// Returns `true` for failures of the durable layer.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            CoreError::Storage(_) | CoreError::Serde(_) | CoreError::Io(_)
        )
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<UnknownTier> for CoreError {
    fn from(err: UnknownTier) -> Self {
        CoreError::Validation(err.to_string())
    }
}
