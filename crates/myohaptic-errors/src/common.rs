//! Top-level error type, categories and severities.

use core::fmt;

use crate::{TickFault, ValidationError};

/// Top-level error type wrapping every myohaptic sub-error.
#[derive(Debug, thiserror::Error)]
pub enum HapticError {
    /// Control loop fault surfaced outside the tick
    #[error("Tick fault: {0}")]
    Tick(#[from] TickFault),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration errors (parse failures, unreadable documents)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HapticError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            HapticError::Tick(_) => ErrorCategory::Tick,
            HapticError::Validation(_) => ErrorCategory::Validation,
            HapticError::Io(_) => ErrorCategory::IO,
            HapticError::Config(_) => ErrorCategory::Config,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HapticError::Tick(fault) => fault.severity(),
            HapticError::Validation(e) => e.severity(),
            HapticError::Io(_) | HapticError::Config(_) => ErrorSeverity::Error,
        }
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        HapticError::Config(msg.into())
    }
}

impl From<std::io::Error> for HapticError {
    fn from(e: std::io::Error) -> Self {
        HapticError::Io(e)
    }
}

/// Which part of the system an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Raised by the control loop tick
    Tick = 0,
    /// Configuration document could not be used
    Config = 1,
    /// Filesystem or stream access
    IO = 2,
    /// A value was rejected by a range or access check
    Validation = 3,
}

impl ErrorCategory {
    /// Name used in log fields and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Tick => "Tick",
            ErrorCategory::Config => "Config",
            ErrorCategory::IO => "IO",
            ErrorCategory::Validation => "Validation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious an error or fault is. Ordered, so faults can be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Expected condition, e.g. start-up calibration
    Info = 0,
    /// Degraded tick, the loop keeps running
    Warning = 1,
    /// Rejected operation or unusable control output
    Error = 2,
    /// Reserved for conditions that should stop the motor for good
    Critical = 3,
}

impl ErrorSeverity {
    /// Short upper-case label.
    pub fn label(self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARN",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Tick.to_string(), "Tick");
        assert_eq!(ErrorCategory::Validation.to_string(), "Validation");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Error > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }

    #[test]
    fn test_haptic_error_category() {
        let err: HapticError = TickFault::InvalidTiming.into();
        assert_eq!(err.category(), ErrorCategory::Tick);

        let err = HapticError::config("bad document");
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_haptic_error_severity_follows_source() {
        let err: HapticError = TickFault::NonFiniteTorque.into();
        assert_eq!(err.severity(), TickFault::NonFiniteTorque.severity());

        let err: HapticError = ValidationError::required("period_us").into();
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HapticError = io.into();
        assert_eq!(err.category(), ErrorCategory::IO);
        assert!(err.to_string().contains("missing"));
    }
}
