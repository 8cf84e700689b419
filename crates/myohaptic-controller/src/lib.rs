//! EMG-driven haptic paddle controller
//!
//! Each timer tick reads the EMG electrode voltage and the paddle angle,
//! conditions the EMG into an envelope, normalizes it against the running
//! calibration bounds and turns the resulting activation ratio into a motor
//! torque with one of three control laws.
//!
//! # Architecture
//!
//! - [`ports`]: sensor, timer and actuator traits the loop is wired to
//! - [`config`]: serde configuration document with validation
//! - [`modes`]: control mode selector and the per-mode control laws
//! - [`context`]: every piece of per-tick state, owned in one place
//! - [`telemetry`]: named signals shared with a monitoring host
//! - [`driver`]: the tick itself
//!
//! # Example
//!
//! ```
//! use myohaptic_controller::prelude::*;
//!
//! struct Constant;
//!
//! impl SensorSource for Constant {
//!     fn read_voltage(&mut self) -> f32 { 1.65 }
//!     fn read_angle(&mut self) -> f32 { 0.0 }
//! }
//!
//! let mut torques = Vec::new();
//! let mut control = ControlLoop::new(&ControllerConfig::default(), Constant, |t: f32| torques.push(t))?;
//! control.inputs().set_mode(1);
//!
//! let report = control.tick();
//! assert_eq!(report.mode, ControlMode::DirectTorque);
//! assert_eq!(report.fault(), Some(TickFault::Uncalibrated));
//! assert_eq!(report.torque_nm, 0.0);
//! # drop(control);
//! # assert_eq!(torques, vec![0.0]);
//! # Ok::<(), myohaptic_errors::HapticError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod driver;
pub mod modes;
pub mod ports;
pub mod prelude;
pub mod telemetry;

pub use config::{AdaptiveConfig, ControllerConfig, DirectTorqueConfig, PositionConfig};
pub use context::ControllerContext;
pub use driver::{ControlLoop, TickReport};
pub use modes::{ControlMode, ModeController, PidGains, PidState};
pub use ports::{ActuatorSink, SensorSource, TickTimer};
pub use telemetry::{Access, Signal, TelemetryBoard};
