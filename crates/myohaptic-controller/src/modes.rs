//! Control modes and control laws
//!
//! The mode selector is read once per tick and dispatched to exactly one law.
//! The two position modes each own their PID accumulators; switching away
//! from a mode and back resumes it where it left off.

use core::fmt;

use myohaptic_errors::{TickFault, TickResult};
use serde::{Deserialize, Serialize};

use crate::config::{AdaptiveConfig, ControllerConfig, DirectTorqueConfig, PositionConfig};

/// Control law selected by the mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum ControlMode {
    /// Zero torque.
    #[default]
    Inactive = 0,
    /// Torque proportional to the activation ratio above a threshold.
    DirectTorque = 1,
    /// PID on the paddle position, objective set directly by the ratio.
    PidPosition = 2,
    /// PID on the paddle position, objective nudged by a ratio dead-zone.
    AdaptivePosition = 3,
}

impl ControlMode {
    /// Every mode, in selector order.
    pub const ALL: [ControlMode; 4] = [
        ControlMode::Inactive,
        ControlMode::DirectTorque,
        ControlMode::PidPosition,
        ControlMode::AdaptivePosition,
    ];

    /// Map a selector value to a mode, `None` for unknown values.
    ///
    /// ```
    /// use myohaptic_controller::ControlMode;
    ///
    /// assert_eq!(ControlMode::from_selector(2), Some(ControlMode::PidPosition));
    /// assert_eq!(ControlMode::from_selector(7), None);
    /// ```
    pub fn from_selector(selector: u32) -> Option<Self> {
        match selector {
            0 => Some(ControlMode::Inactive),
            1 => Some(ControlMode::DirectTorque),
            2 => Some(ControlMode::PidPosition),
            3 => Some(ControlMode::AdaptivePosition),
            _ => None,
        }
    }

    /// Selector value of this mode.
    pub fn selector(self) -> u32 {
        self as u32
    }

    /// Whether the law needs a calibrated activation ratio.
    pub fn uses_activation(self) -> bool {
        !matches!(self, ControlMode::Inactive)
    }

    /// Whether the law tracks a position objective.
    pub fn is_position(self) -> bool {
        matches!(
            self,
            ControlMode::PidPosition | ControlMode::AdaptivePosition
        )
    }

    /// Short name used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Inactive => "inactive",
            ControlMode::DirectTorque => "direct-torque",
            ControlMode::PidPosition => "pid-position",
            ControlMode::AdaptivePosition => "adaptive-position",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PID gains shared by both position modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    /// Proportional gain [N.m/deg].
    pub kp: f32,
    /// Integral gain [N.m/(deg.tick)], applied to the raw error sum.
    pub ki: f32,
    /// Derivative gain [N.m.s/deg].
    pub kd: f32,
    /// Symmetric clamp on the error sum. `None` leaves it unbounded.
    pub integral_limit: Option<f32>,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 0.0002,
            ki: 0.000_001,
            kd: 0.0,
            integral_limit: None,
        }
    }
}

/// Persistent state of one position law.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Target paddle angle [deg].
    pub objective: f32,
    /// Sum of every error since start-up (no `dt` weighting).
    pub integral_error: f32,
    /// Error of the previous step.
    pub prev_error: f32,
}

impl PidState {
    /// Run one PID step towards `self.objective` from `mean_position`.
    ///
    /// The derivative term is zero when `dt <= 0`.
    ///
    /// ```
    /// use myohaptic_controller::{PidGains, PidState};
    ///
    /// let mut state = PidState { objective: 10.0, ..PidState::default() };
    /// let torque = state.step(&PidGains::default(), 0.0, 0.001);
    /// assert!((torque - (0.0002 * 10.0 + 0.000_001 * 10.0)).abs() < 1e-9);
    /// assert_eq!(state.prev_error, 10.0);
    /// ```
    pub fn step(&mut self, gains: &PidGains, mean_position: f32, dt: f32) -> f32 {
        let error = self.objective - mean_position;

        self.integral_error += error;
        if let Some(limit) = gains.integral_limit {
            self.integral_error = self.integral_error.clamp(-limit, limit);
        }

        let derivative = if dt > 0.0 {
            (error - self.prev_error) / dt
        } else {
            0.0
        };
        self.prev_error = error;

        gains.kp * error + gains.ki * self.integral_error + gains.kd * (0.0 - derivative)
    }

    /// Zero the objective and both accumulators.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `max((ratio - threshold) / (1 - threshold), 0) * torque_max_nm`.
///
/// ```
/// use myohaptic_controller::{DirectTorqueConfig, modes::direct_torque};
///
/// let config = DirectTorqueConfig::default();
/// assert!((direct_torque(1.0, &config) - 0.006).abs() < 1e-9);
/// assert_eq!(direct_torque(0.2, &config), 0.0);
/// assert_eq!(direct_torque(0.1, &config), 0.0);
/// ```
#[inline]
pub fn direct_torque(ratio: f32, config: &DirectTorqueConfig) -> f32 {
    let above = ((ratio - config.threshold) / (1.0 - config.threshold)).max(0.0);
    above * config.torque_max_nm
}

/// Objective angle for [`ControlMode::PidPosition`]: the ratio spread over
/// a span centred on zero.
#[inline]
pub fn position_objective(ratio: f32, config: &PositionConfig) -> f32 {
    ratio * config.objective_span_deg - config.objective_span_deg / 2.0
}

/// Nudge `objective` down below the dead-zone, up above it, and clamp.
#[inline]
pub fn adapt_objective(objective: f32, ratio: f32, config: &AdaptiveConfig) -> f32 {
    let nudged = if ratio < config.lower {
        objective - config.step_deg
    } else if ratio > config.upper {
        objective + config.step_deg
    } else {
        objective
    };
    nudged.clamp(-config.limit_deg, config.limit_deg)
}

/// All control laws and their persistent state.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeController {
    direct: DirectTorqueConfig,
    gains: PidGains,
    position: PositionConfig,
    adaptive: AdaptiveConfig,
    pid_position: PidState,
    adaptive_position: PidState,
}

impl ModeController {
    /// Create the laws with zeroed state.
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            direct: config.direct_torque,
            gains: config.pid,
            position: config.position,
            adaptive: config.adaptive,
            pid_position: PidState::default(),
            adaptive_position: PidState::default(),
        }
    }

    /// Torque for `mode` this tick.
    ///
    /// `ratio` is `None` while calibration has not produced a usable span:
    /// every mode except [`ControlMode::Inactive`] then reports
    /// [`TickFault::Uncalibrated`] and leaves its state untouched.
    ///
    /// # Errors
    ///
    /// [`TickFault::Uncalibrated`] as described above.
    pub fn compute(
        &mut self,
        mode: ControlMode,
        ratio: Option<f32>,
        mean_position: f32,
        dt: f32,
    ) -> TickResult<f32> {
        if mode == ControlMode::Inactive {
            return Ok(0.0);
        }
        let ratio = ratio.ok_or(TickFault::Uncalibrated)?;

        let torque = match mode {
            ControlMode::Inactive => 0.0,
            ControlMode::DirectTorque => direct_torque(ratio, &self.direct),
            ControlMode::PidPosition => {
                let state = &mut self.pid_position;
                state.objective = position_objective(ratio, &self.position);
                state.step(&self.gains, mean_position, dt)
            }
            ControlMode::AdaptivePosition => {
                let state = &mut self.adaptive_position;
                state.objective = adapt_objective(state.objective, ratio, &self.adaptive);
                state.step(&self.gains, mean_position, dt)
            }
        };
        Ok(torque)
    }

    /// Persistent state of a position mode, `None` for the others.
    pub fn state(&self, mode: ControlMode) -> Option<&PidState> {
        match mode {
            ControlMode::PidPosition => Some(&self.pid_position),
            ControlMode::AdaptivePosition => Some(&self.adaptive_position),
            ControlMode::Inactive | ControlMode::DirectTorque => None,
        }
    }

    /// Current objective of a position mode.
    pub fn objective(&self, mode: ControlMode) -> Option<f32> {
        self.state(mode).map(|state| state.objective)
    }

    /// Clear both position states.
    pub fn reset(&mut self) {
        self.pid_position.reset();
        self.adaptive_position.reset();
    }
}
