//! Controller configuration
//!
//! A single JSON document covers every tunable of the loop. Missing fields
//! take their defaults, so `{}` is a valid configuration.

use std::path::Path;

use myohaptic_atomic::DEFAULT_PERIOD_US;
use myohaptic_calibration::{CalibrationConfig, EnvelopeCalibration};
use myohaptic_errors::{HapticError, Result, ValidationError};
use myohaptic_filters::ConditioningConfig;
use serde::{Deserialize, Serialize};

use crate::modes::{ControlMode, PidGains};

/// Longest accepted tick period: 10 Hz.
pub const MAX_PERIOD_US: u32 = 100_000;

/// Parameters of [`ControlMode::DirectTorque`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectTorqueConfig {
    /// Activation ratio below which no torque is produced.
    pub threshold: f32,
    /// Torque at full activation [N.m].
    pub torque_max_nm: f32,
}

impl Default for DirectTorqueConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            torque_max_nm: 0.006,
        }
    }
}

/// Parameters of [`ControlMode::PidPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Full objective range [deg], centred on zero.
    pub objective_span_deg: f32,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            objective_span_deg: 60.0,
        }
    }
}

/// Parameters of [`ControlMode::AdaptivePosition`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Ratio below which the objective moves down.
    pub lower: f32,
    /// Ratio above which the objective moves up.
    pub upper: f32,
    /// Objective change per tick [deg].
    pub step_deg: f32,
    /// Objective is clamped to `[-limit_deg, limit_deg]`.
    pub limit_deg: f32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            lower: 0.3,
            upper: 0.7,
            step_deg: 0.005,
            limit_deg: 30.0,
        }
    }
}

/// Complete controller configuration.
///
/// ```
/// use myohaptic_controller::ControllerConfig;
///
/// let config = ControllerConfig::from_json_str(r#"{ "period_us": 500, "pid": { "kd": 0.0000003 } }"#)?;
/// assert_eq!(config.period_us, 500);
/// assert!((config.pid.kp - 0.0002).abs() < 1e-9);
/// # Ok::<(), myohaptic_errors::HapticError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Tick period [us].
    pub period_us: u32,
    /// Mode selector value at start-up.
    pub initial_mode: u32,
    /// EMG filter cutoffs and envelope window.
    pub conditioning: ConditioningConfig,
    /// Calibration grace period and seeds.
    pub calibration: CalibrationConfig,
    /// Direct torque law.
    pub direct_torque: DirectTorqueConfig,
    /// PID gains for both position laws.
    pub pid: PidGains,
    /// Absolute position law.
    pub position: PositionConfig,
    /// Adaptive position law.
    pub adaptive: AdaptiveConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            period_us: DEFAULT_PERIOD_US,
            initial_mode: ControlMode::Inactive.selector(),
            conditioning: ConditioningConfig::default(),
            calibration: CalibrationConfig::default(),
            direct_torque: DirectTorqueConfig::default(),
            pid: PidGains::default(),
            position: PositionConfig::default(),
            adaptive: AdaptiveConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// [`HapticError::Config`] for malformed JSON, [`HapticError::Validation`]
    /// for a well-formed document with unusable values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| HapticError::config(format!("invalid controller config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// [`HapticError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`HapticError::Config`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HapticError::config(format!("cannot serialize controller config: {e}")))
    }

    /// Tick period in seconds.
    pub fn dt_seconds(&self) -> f32 {
        #[allow(clippy::cast_precision_loss, reason = "periods are bounded by MAX_PERIOD_US")]
        let period = self.period_us as f32;
        period / 1_000_000.0
    }

    /// Check every field, returning the first problem found.
    ///
    /// # Errors
    ///
    /// The [`ValidationError`] describing the offending field.
    pub fn validate(&self) -> core::result::Result<(), ValidationError> {
        if !(1..=MAX_PERIOD_US).contains(&self.period_us) {
            return Err(ValidationError::out_of_range(
                "period_us",
                self.period_us,
                1,
                MAX_PERIOD_US,
            ));
        }
        if ControlMode::from_selector(self.initial_mode).is_none() {
            return Err(ValidationError::out_of_range(
                "initial_mode",
                self.initial_mode,
                ControlMode::Inactive.selector(),
                ControlMode::AdaptivePosition.selector(),
            ));
        }

        self.validate_conditioning()?;

        EnvelopeCalibration::from_config(self.calibration)
            .map_err(|e| ValidationError::constraint(e.to_string()))?;

        let direct = &self.direct_torque;
        let threshold = ValidationError::ensure_finite("direct_torque.threshold", direct.threshold)?;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ValidationError::out_of_range(
                "direct_torque.threshold",
                threshold,
                0.0,
                1.0,
            ));
        }
        ValidationError::ensure_finite("direct_torque.torque_max_nm", direct.torque_max_nm)?;

        ValidationError::ensure_finite("pid.kp", self.pid.kp)?;
        ValidationError::ensure_finite("pid.ki", self.pid.ki)?;
        ValidationError::ensure_finite("pid.kd", self.pid.kd)?;
        if let Some(limit) = self.pid.integral_limit {
            ValidationError::ensure_positive("pid.integral_limit", limit)?;
        }

        ValidationError::ensure_positive(
            "position.objective_span_deg",
            self.position.objective_span_deg,
        )?;

        self.validate_adaptive()
    }

    fn validate_conditioning(&self) -> core::result::Result<(), ValidationError> {
        let conditioning = &self.conditioning;
        let high = ValidationError::ensure_positive(
            "conditioning.high_pass_cutoff_hz",
            conditioning.high_pass_cutoff_hz,
        )?;
        let low = ValidationError::ensure_positive(
            "conditioning.low_pass_cutoff_hz",
            conditioning.low_pass_cutoff_hz,
        )?;
        if low <= high {
            return Err(ValidationError::constraint(format!(
                "low-pass cutoff {low} Hz must be above high-pass cutoff {high} Hz"
            )));
        }
        if conditioning.envelope_window == 0 {
            return Err(ValidationError::out_of_range(
                "conditioning.envelope_window",
                0,
                1,
                u32::MAX,
            ));
        }
        Ok(())
    }

    fn validate_adaptive(&self) -> core::result::Result<(), ValidationError> {
        let adaptive = &self.adaptive;
        let lower = ValidationError::ensure_finite("adaptive.lower", adaptive.lower)?;
        let upper = ValidationError::ensure_finite("adaptive.upper", adaptive.upper)?;
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower > upper {
            return Err(ValidationError::constraint(format!(
                "adaptive dead-zone [{lower}, {upper}] must be an ordered range within [0, 1]"
            )));
        }
        ValidationError::ensure_positive("adaptive.step_deg", adaptive.step_deg)?;
        ValidationError::ensure_positive("adaptive.limit_deg", adaptive.limit_deg)?;
        Ok(())
    }
}
