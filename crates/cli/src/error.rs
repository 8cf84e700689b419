//! Error types for myohapticctl

use myohaptic_errors::{ErrorCategory, HapticError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid mode switch '{0}': expected MODE@SECONDS, e.g. 2@5.0")]
    InvalidSwitch(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error(transparent)]
    Haptic(#[from] HapticError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidSwitch(_) | CliError::InvalidDuration(_) => 2,
            CliError::Haptic(e) => match e.category() {
                ErrorCategory::Validation | ErrorCategory::Config => 3,
                ErrorCategory::IO => 4,
                ErrorCategory::Tick => 1,
            },
            CliError::IoError(_) => 4,
            CliError::JsonError(_) => 3,
        }
    }
}
