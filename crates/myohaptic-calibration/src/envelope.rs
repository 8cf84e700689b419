//! Running min/max tracker for the EMG envelope

use serde::{Deserialize, Serialize};

use crate::{
    CalibrationConfig, CalibrationError, CalibrationPhase, CalibrationResult, CalibrationUpdate,
};

/// Running envelope bounds.
///
/// Before the grace period ends the bounds stay at their seeds (`max < min`),
/// so no ratio can be computed. Afterwards each update can raise the maximum
/// or, failing that, lower the minimum; the bounds only ever widen.
///
/// # Examples
///
/// ```
/// use myohaptic_calibration::{CalibrationConfig, EnvelopeCalibration};
///
/// let mut calib = EnvelopeCalibration::new(CalibrationConfig::default());
/// calib.update(0.8, 6_000_000);
/// calib.update(0.2, 6_001_000);
///
/// let ratio = calib.activation_ratio(0.5)?;
/// assert!((ratio - 0.5).abs() < 1e-6);
/// # Ok::<(), myohaptic_calibration::CalibrationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeCalibration {
    /// Largest envelope seen after the grace period.
    pub max_seen: f32,
    /// Smallest envelope seen after the grace period.
    pub min_seen: f32,
    /// Grace period length in microseconds.
    pub grace_period_us: u64,
    grace_elapsed: bool,
}

impl Default for EnvelopeCalibration {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

impl EnvelopeCalibration {
    /// Create a tracker seeded from `config` without checking the seeds.
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            max_seen: config.initial_max,
            min_seen: config.initial_min,
            grace_period_us: config.grace_period_us,
            grace_elapsed: false,
        }
    }

    /// Create a tracker, rejecting seeds that would already look calibrated.
    pub fn from_config(config: CalibrationConfig) -> CalibrationResult<Self> {
        let ordered = config.initial_max.is_finite()
            && config.initial_min.is_finite()
            && config.initial_max < config.initial_min;
        if !ordered {
            return Err(CalibrationError::InvalidSentinels {
                initial_max: config.initial_max,
                initial_min: config.initial_min,
            });
        }
        Ok(Self::new(config))
    }

    /// Feed one envelope value observed `elapsed_us` after start-up.
    ///
    /// At most one bound moves per call: a new maximum takes precedence over
    /// a new minimum.
    pub fn update(&mut self, envelope: f32, elapsed_us: u64) -> CalibrationUpdate {
        if elapsed_us < self.grace_period_us {
            return CalibrationUpdate::Grace;
        }
        self.grace_elapsed = true;

        if !envelope.is_finite() {
            CalibrationUpdate::Unchanged
        } else if envelope > self.max_seen {
            self.max_seen = envelope;
            CalibrationUpdate::RaisedMax
        } else if envelope < self.min_seen {
            self.min_seen = envelope;
            CalibrationUpdate::LoweredMin
        } else {
            CalibrationUpdate::Unchanged
        }
    }

    /// `max - min` when it is a usable, strictly positive span.
    pub fn span(&self) -> Option<f32> {
        let span = self.max_seen - self.min_seen;
        (span.is_finite() && span > 0.0).then_some(span)
    }

    /// Whether [`activation_ratio`](Self::activation_ratio) can succeed.
    pub fn is_calibrated(&self) -> bool {
        self.span().is_some()
    }

    /// Map `envelope` onto `[0, 1]` relative to the observed bounds.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::NotCalibrated`] while `max <= min`.
    pub fn activation_ratio(&self, envelope: f32) -> CalibrationResult<f32> {
        let span = self.span().ok_or(CalibrationError::NotCalibrated)?;
        Ok((envelope - self.min_seen) / span)
    }

    /// Current warm-up phase.
    pub fn phase(&self) -> CalibrationPhase {
        if !self.grace_elapsed {
            CalibrationPhase::Grace
        } else if self.is_calibrated() {
            CalibrationPhase::Calibrated
        } else {
            CalibrationPhase::Priming
        }
    }

    /// Return to the seeds, keeping the grace period length.
    pub fn reset(&mut self, config: CalibrationConfig) {
        *self = Self {
            grace_period_us: self.grace_period_us,
            ..Self::new(config)
        };
    }
}
