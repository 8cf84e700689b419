//! Common imports for wiring up a control loop.

pub use crate::config::{AdaptiveConfig, ControllerConfig, DirectTorqueConfig, PositionConfig};
pub use crate::driver::{ControlLoop, TickReport};
pub use crate::modes::{ControlMode, PidGains, PidState};
pub use crate::ports::{ActuatorSink, SensorSource, TickTimer};
pub use crate::telemetry::{Access, Signal, TelemetryBoard};
pub use myohaptic_atomic::{ControlInputs, CounterSnapshot};
pub use myohaptic_calibration::CalibrationPhase;
pub use myohaptic_errors::{FaultSet, HapticError, TickFault};
