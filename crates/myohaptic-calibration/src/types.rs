//! Calibration type definitions

use serde::{Deserialize, Serialize};

/// Default grace period before bounds start tracking: 5 s.
pub const DEFAULT_GRACE_PERIOD_US: u64 = 5_000_000;

/// Seed for the running maximum; any real envelope raises it.
pub const DEFAULT_INITIAL_MAX: f32 = -1000.0;

/// Seed for the running minimum; any real envelope lowers it.
pub const DEFAULT_INITIAL_MIN: f32 = 1000.0;

/// Calibration parameters.
///
/// # Examples
///
/// ```
/// use myohaptic_calibration::CalibrationConfig;
///
/// let config: CalibrationConfig = serde_json::from_str(r#"{"grace_period_us": 0}"#)?;
/// assert_eq!(config.grace_period_us, 0);
/// assert!((config.initial_min - 1000.0).abs() < f32::EPSILON);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Time since start-up during which bounds are not updated.
    pub grace_period_us: u64,
    /// Initial value of the running maximum.
    pub initial_max: f32,
    /// Initial value of the running minimum.
    pub initial_min: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            grace_period_us: DEFAULT_GRACE_PERIOD_US,
            initial_max: DEFAULT_INITIAL_MAX,
            initial_min: DEFAULT_INITIAL_MIN,
        }
    }
}

/// Warm-up phase of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationPhase {
    /// Grace period still running; bounds are frozen at their seeds.
    Grace,
    /// Tracking, but the bounds do not yet span a usable range.
    Priming,
    /// `max > min`: activation ratios are available.
    Calibrated,
}

impl CalibrationPhase {
    /// Short lowercase name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            CalibrationPhase::Grace => "grace",
            CalibrationPhase::Priming => "priming",
            CalibrationPhase::Calibrated => "calibrated",
        }
    }
}

/// What a single [`update`](crate::EnvelopeCalibration::update) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationUpdate {
    /// Inside the grace period, nothing changed.
    Grace,
    /// The running maximum was raised.
    RaisedMax,
    /// The running minimum was lowered.
    LoweredMin,
    /// The envelope was inside the current bounds (or not finite).
    Unchanged,
}
