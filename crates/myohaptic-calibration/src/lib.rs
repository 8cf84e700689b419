//! Envelope calibration
//!
//! Tracks the largest and smallest EMG envelope seen once a start-up grace
//! period has elapsed, and maps new envelope values onto an activation ratio
//! in `[0, 1]` relative to those bounds.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod envelope;
pub mod types;

pub use envelope::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    #[error("Activation ratio not calibrated")]
    NotCalibrated,

    #[error("Invalid sentinels: initial max {initial_max} must be below initial min {initial_min}")]
    InvalidSentinels { initial_max: f32, initial_min: f32 },
}

pub type CalibrationResult<T> = Result<T, CalibrationError>;
