// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid flow run state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid deployment: {0}")]
    InvalidDeployment(String),
}

/// Filename verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The directory to verify is missing or unreadable
    #[error("Cannot list directory '{path}': {reason}")]
    DirectoryUnavailable { path: String, reason: String },

    /// One or more names do not match the naming convention
    #[error("Some filenames do not match the required pattern. Invalid filenames: {invalid:?}")]
    ValidationFailure { invalid: Vec<String> },
}

pub type Result<T> = std::result::Result<T, DomainError>;
