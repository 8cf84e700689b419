//! Validation errors for configuration documents and telemetry writes.

use core::fmt;

use crate::common::ErrorSeverity;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value out of range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Minimum allowed value
        min: String,
        /// Maximum allowed value
        max: String,
    },

    /// Value is NaN or infinite
    #[error("{field} must be finite, got {value}")]
    NotFinite {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
    },

    /// Value is required but missing
    #[error("Required field '{0}' is missing")]
    Required(String),

    /// Integer-valued signal written with a fractional or out-of-range value
    #[error("{field} expects a non-negative integer, got {value}")]
    NotAnInteger {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
    },

    /// Write to a read-only telemetry signal
    #[error("Signal '{0}' is read-only")]
    ReadOnly(String),

    /// Unknown telemetry signal name
    #[error("Unknown signal '{0}'")]
    UnknownSignal(String),

    /// Constraint violation between fields
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Create an out of range error for a numeric value.
    pub fn out_of_range<T: fmt::Debug>(field: impl Into<String>, value: T, min: T, max: T) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: format!("{value:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        }
    }

    /// Create a non-finite value error.
    pub fn not_finite(field: impl Into<String>, value: f32) -> Self {
        ValidationError::NotFinite {
            field: field.into(),
            value: format!("{value:?}"),
        }
    }

    /// Create a required field error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required(field.into())
    }

    /// Create a not-an-integer error.
    pub fn not_an_integer(field: impl Into<String>, value: f32) -> Self {
        ValidationError::NotAnInteger {
            field: field.into(),
            value: format!("{value:?}"),
        }
    }

    /// Create a read-only signal error.
    pub fn read_only(signal: impl Into<String>) -> Self {
        ValidationError::ReadOnly(signal.into())
    }

    /// Create an unknown signal error.
    pub fn unknown_signal(signal: impl Into<String>) -> Self {
        ValidationError::UnknownSignal(signal.into())
    }

    /// Create a constraint violation error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        ValidationError::ConstraintViolation(msg.into())
    }

    /// Reject NaN and infinities for `field`.
    ///
    /// ```
    /// use myohaptic_errors::ValidationError;
    ///
    /// assert!(ValidationError::ensure_finite("kp", 0.0002).is_ok());
    /// assert!(ValidationError::ensure_finite("kp", f32::NAN).is_err());
    /// ```
    pub fn ensure_finite(field: &str, value: f32) -> Result<f32, ValidationError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::not_finite(field, value))
        }
    }

    /// Require a finite, strictly positive value for `field`.
    pub fn ensure_positive(field: &str, value: f32) -> Result<f32, ValidationError> {
        let value = Self::ensure_finite(field, value)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(ValidationError::out_of_range(field, value, f32::MIN_POSITIVE, f32::MAX))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_out_of_range() {
        let err = ValidationError::out_of_range("low_pass_cutoff_hz", -4.0_f32, 0.0_f32, 1.0e6_f32);
        let msg = err.to_string();
        assert!(msg.contains("low_pass_cutoff_hz"));
        assert!(msg.contains("-4.0"));
    }

    #[test]
    fn test_validation_error_required() {
        let err = ValidationError::required("period_us");
        assert_eq!(err.to_string(), "Required field 'period_us' is missing");
    }

    #[test]
    fn test_ensure_positive_rejects_zero_and_nan() {
        assert!(ValidationError::ensure_positive("window", 0.0).is_err());
        assert!(ValidationError::ensure_positive("window", -1.0).is_err());
        assert!(ValidationError::ensure_positive("window", f32::NAN).is_err());
        assert_eq!(ValidationError::ensure_positive("window", 2.5), Ok(2.5));
    }

    #[test]
    fn test_validation_error_severity() {
        assert_eq!(
            ValidationError::read_only("Envelope").severity(),
            ErrorSeverity::Error
        );
    }

    #[test]
    fn test_validation_error_equality() {
        let err1 = ValidationError::unknown_signal("torque");
        let err2 = ValidationError::unknown_signal("torque");
        assert_eq!(err1, err2);
    }
}
