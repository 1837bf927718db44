use std::path::PathBuf;

use shared::ParseOperatorError;

/// Every failure the desk's core operations can report.
///
/// Each variant maps to one user-visible error category; callers log and
/// display them, nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// Operator outside `+ - * /`
    #[error("Invalid operation: '{0}'")]
    InvalidOperation(String),

    /// Mathematically undefined operation
    #[error("{0}")]
    Domain(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Export to {} failed: {message}", path.display())]
    Export { path: PathBuf, message: String },

    /// Weather, email or SMS provider failure, not decomposed further
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DeskError {
    pub fn division_by_zero() -> Self {
        DeskError::Domain("Cannot divide by zero".to_string())
    }

    pub fn export(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DeskError::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn external(message: impl ToString) -> Self {
        DeskError::ExternalService(message.to_string())
    }

    /// True for errors caused by the user's input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(self, DeskError::InvalidOperation(_) | DeskError::Domain(_))
    }
}

impl From<ParseOperatorError> for DeskError {
    fn from(err: ParseOperatorError) -> Self {
        DeskError::InvalidOperation(err.0)
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        DeskError::ExternalService(err.to_string())
    }
}

pub type DeskResult<T> = std::result::Result<T, DeskError>;
