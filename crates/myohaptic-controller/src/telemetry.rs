//! Telemetry board
//!
//! Named scalar signals shared with a monitoring host. The tick publishes into
//! lock-free cells; the host reads them (and writes the two read-write
//! signals) from any thread.
//!
//! Writes to `Activate` and `timestep [us]` land in [`ControlInputs`] and are
//! picked up at the start of the next tick.

use std::sync::Arc;

use myohaptic_atomic::{AtomicF32, ControlInputs};
use myohaptic_errors::ValidationError;

use crate::config::MAX_PERIOD_US;

/// Whether the host may write a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Published by the tick only.
    ReadOnly,
    /// Host writes are accepted.
    ReadWrite,
}

/// Signals on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Paddle angle [deg].
    PaddlePosition,
    /// Hall sensor voltage [V].
    HallVoltage,
    /// Raw EMG voltage [V].
    EmgVoltage,
    /// EMG envelope.
    Envelope,
    /// Calibration maximum.
    CalibrationMax,
    /// Calibration minimum.
    CalibrationMin,
    /// Mode selector.
    Activate,
    /// Objective of the active position mode [deg].
    ObjectivePosition,
    /// Commanded motor torque [N.m].
    MotorTorque,
    /// Tick period [us].
    Timestep,
}

impl Signal {
    /// Every signal, in display order.
    pub const ALL: [Signal; 10] = [
        Signal::PaddlePosition,
        Signal::HallVoltage,
        Signal::EmgVoltage,
        Signal::Envelope,
        Signal::CalibrationMax,
        Signal::CalibrationMin,
        Signal::Activate,
        Signal::ObjectivePosition,
        Signal::MotorTorque,
        Signal::Timestep,
    ];

    /// Name shown to the host.
    pub fn name(self) -> &'static str {
        match self {
            Signal::PaddlePosition => "encoder_paddle_pos [deg]",
            Signal::HallVoltage => "hall_voltage [V]",
            Signal::EmgVoltage => "EMG voltage",
            Signal::Envelope => "Envelope",
            Signal::CalibrationMax => "max",
            Signal::CalibrationMin => "min",
            Signal::Activate => "Activate",
            Signal::ObjectivePosition => "objective Position",
            Signal::MotorTorque => "motor_torque [N.m]",
            Signal::Timestep => "timestep [us]",
        }
    }

    /// Look a signal up by its host name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|signal| signal.name() == name)
    }

    /// Host access rights.
    pub fn access(self) -> Access {
        match self {
            Signal::Activate | Signal::Timestep => Access::ReadWrite,
            _ => Access::ReadOnly,
        }
    }
}

/// Values published by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetryFrame {
    /// Paddle angle [deg]
    pub paddle_position_deg: f32,
    /// Hall sensor voltage [V]
    pub hall_voltage: f32,
    /// EMG voltage [V]
    pub emg_voltage: f32,
    /// EMG envelope
    pub envelope: f32,
    /// Calibration maximum
    pub calibration_max: f32,
    /// Calibration minimum
    pub calibration_min: f32,
    /// Objective of the active position mode, `None` keeps the last value
    pub objective_deg: Option<f32>,
    /// Commanded torque [N.m]
    pub torque_nm: f32,
}

/// Shared signal board.
///
/// ```
/// use std::sync::Arc;
/// use myohaptic_atomic::ControlInputs;
/// use myohaptic_controller::TelemetryBoard;
///
/// let inputs = Arc::new(ControlInputs::default());
/// let board = TelemetryBoard::new(Arc::clone(&inputs));
///
/// board.write_by_name("Activate", 2.0)?;
/// assert_eq!(inputs.mode(), 2);
/// assert!(board.write_by_name("Envelope", 1.0).is_err());
/// # Ok::<(), myohaptic_errors::ValidationError>(())
/// ```
#[derive(Debug)]
pub struct TelemetryBoard {
    inputs: Arc<ControlInputs>,
    paddle_position: AtomicF32,
    hall_voltage: AtomicF32,
    emg_voltage: AtomicF32,
    envelope: AtomicF32,
    calibration_max: AtomicF32,
    calibration_min: AtomicF32,
    objective_position: AtomicF32,
    motor_torque: AtomicF32,
}

impl TelemetryBoard {
    /// Board whose read-write signals forward to `inputs`.
    pub fn new(inputs: Arc<ControlInputs>) -> Self {
        Self {
            inputs,
            paddle_position: AtomicF32::default(),
            hall_voltage: AtomicF32::default(),
            emg_voltage: AtomicF32::default(),
            envelope: AtomicF32::default(),
            calibration_max: AtomicF32::default(),
            calibration_min: AtomicF32::default(),
            objective_position: AtomicF32::default(),
            motor_torque: AtomicF32::default(),
        }
    }

    /// Publish one tick's values.
    pub fn publish(&self, frame: &TelemetryFrame) {
        self.paddle_position.store(frame.paddle_position_deg);
        self.hall_voltage.store(frame.hall_voltage);
        self.emg_voltage.store(frame.emg_voltage);
        self.envelope.store(frame.envelope);
        self.calibration_max.store(frame.calibration_max);
        self.calibration_min.store(frame.calibration_min);
        if let Some(objective) = frame.objective_deg {
            self.objective_position.store(objective);
        }
        self.motor_torque.store(frame.torque_nm);
    }

    /// Current value of `signal`.
    #[allow(clippy::cast_precision_loss, reason = "selector and period are small integers")]
    pub fn read(&self, signal: Signal) -> f32 {
        match signal {
            Signal::PaddlePosition => self.paddle_position.load(),
            Signal::HallVoltage => self.hall_voltage.load(),
            Signal::EmgVoltage => self.emg_voltage.load(),
            Signal::Envelope => self.envelope.load(),
            Signal::CalibrationMax => self.calibration_max.load(),
            Signal::CalibrationMin => self.calibration_min.load(),
            Signal::Activate => self.inputs.mode() as f32,
            Signal::ObjectivePosition => self.objective_position.load(),
            Signal::MotorTorque => self.motor_torque.load(),
            Signal::Timestep => self.inputs.period_us() as f32,
        }
    }

    /// Host write to `signal`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ReadOnly`] for read-only signals
    /// - [`ValidationError::NotAnInteger`] unless `value` is a non-negative
    ///   whole number
    /// - [`ValidationError::OutOfRange`] for a period outside
    ///   `[1, MAX_PERIOD_US]`
    pub fn write(&self, signal: Signal, value: f32) -> Result<(), ValidationError> {
        match signal {
            Signal::Activate => {
                let mode = whole_number(signal, value)?;
                self.inputs.set_mode(mode);
                Ok(())
            }
            Signal::Timestep => {
                let period_us = whole_number(signal, value)?;
                if !(1..=MAX_PERIOD_US).contains(&period_us) {
                    return Err(ValidationError::out_of_range(
                        signal.name(),
                        period_us,
                        1,
                        MAX_PERIOD_US,
                    ));
                }
                self.inputs.set_period_us(period_us);
                Ok(())
            }
            _ => Err(ValidationError::read_only(signal.name())),
        }
    }

    /// [`read`](Self::read) by host name.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownSignal`] if no signal has that name.
    pub fn read_by_name(&self, name: &str) -> Result<f32, ValidationError> {
        let signal = Signal::from_name(name).ok_or_else(|| ValidationError::unknown_signal(name))?;
        Ok(self.read(signal))
    }

    /// [`write`](Self::write) by host name.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownSignal`] if no signal has that name, otherwise
    /// as [`write`](Self::write).
    pub fn write_by_name(&self, name: &str, value: f32) -> Result<(), ValidationError> {
        let signal = Signal::from_name(name).ok_or_else(|| ValidationError::unknown_signal(name))?;
        self.write(signal, value)
    }

    /// Every signal with its current value, in display order.
    pub fn snapshot(&self) -> Vec<(&'static str, f32)> {
        Signal::ALL
            .into_iter()
            .map(|signal| (signal.name(), self.read(signal)))
            .collect()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range and fractional part are checked first"
)]
fn whole_number(signal: Signal, value: f32) -> Result<u32, ValidationError> {
    #[allow(clippy::cast_precision_loss, reason = "upper bound only")]
    let in_range = value.is_finite() && value >= 0.0 && value <= u32::MAX as f32;
    if !in_range || value.fract() != 0.0 {
        return Err(ValidationError::not_an_integer(signal.name(), value));
    }
    Ok(value as u32)
}
