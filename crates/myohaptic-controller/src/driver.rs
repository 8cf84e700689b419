//! Control loop driver
//!
//! [`ControlLoop::tick`] is the whole per-period job. It is called from the
//! timer context once per period and runs the stages in a fixed order:
//!
//! 1. snapshot mode selector and period
//! 2. advance the time base
//! 3. read the sensors
//! 4. condition the EMG
//! 5. update calibration
//! 6. smooth the paddle angle
//! 7. run the selected control law
//! 8. command the actuator
//! 9. publish telemetry and count faults
//!
//! A tick never fails. Faults are attached to the [`TickReport`] and, for
//! most of them, force the torque of that tick to zero.

use std::sync::Arc;

use myohaptic_atomic::{ControlInputs, TickCounters};
use myohaptic_calibration::{CalibrationPhase, CalibrationUpdate};
use myohaptic_errors::{ErrorSeverity, FaultSet, HapticError, TickFault};
use myohaptic_filters::ConditionedSample;
use tracing::{info, trace, warn};

use crate::config::ControllerConfig;
use crate::context::ControllerContext;
use crate::modes::ControlMode;
use crate::ports::{ActuatorSink, SensorSource};
use crate::telemetry::{TelemetryBoard, TelemetryFrame};

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Time base after this tick [us].
    pub timestamp_us: u64,
    /// Period used for this tick [s].
    pub dt: f32,
    /// Raw selector value read at tick start.
    pub selector: u32,
    /// Mode that actually ran (`Inactive` for unknown selectors).
    pub mode: ControlMode,
    /// Torque sent to the actuator [N.m].
    pub torque_nm: f32,
    /// Every fault raised during the tick.
    pub faults: FaultSet,
    /// Conditioning stage outputs.
    pub sample: ConditionedSample,
    /// Paddle angle fed to the smoother [deg].
    pub angle_deg: f32,
    /// Smoothed paddle angle [deg].
    pub mean_position_deg: f32,
    /// Calibrated activation ratio, `None` before calibration.
    pub activation_ratio: Option<f32>,
    /// What the calibration tracker did with this envelope.
    pub calibration: CalibrationUpdate,
    /// Calibration phase after this tick.
    pub phase: CalibrationPhase,
}

impl TickReport {
    /// Most severe fault of the tick.
    pub fn fault(&self) -> Option<TickFault> {
        self.faults.worst()
    }
}

/// The control loop: owned state plus its ports.
#[derive(Debug)]
pub struct ControlLoop<S, A> {
    config: ControllerConfig,
    context: ControllerContext,
    sensor: S,
    actuator: A,
    inputs: Arc<ControlInputs>,
    telemetry: Arc<TelemetryBoard>,
    counters: Arc<TickCounters>,
    last_selector: u32,
    last_faults: FaultSet,
    last_phase: CalibrationPhase,
}

impl<S: SensorSource, A: ActuatorSink> ControlLoop<S, A> {
    /// Build a loop with fresh shared inputs seeded from `config`.
    ///
    /// # Errors
    ///
    /// [`HapticError::Validation`] if `config` does not validate.
    pub fn new(config: &ControllerConfig, sensor: S, actuator: A) -> Result<Self, HapticError> {
        let inputs = Arc::new(ControlInputs::new(config.period_us, config.initial_mode));
        Self::with_inputs(config, inputs, sensor, actuator)
    }

    /// Build a loop around existing shared inputs. Their current values win
    /// over `config.period_us` and `config.initial_mode`.
    ///
    /// # Errors
    ///
    /// [`HapticError::Validation`] if `config` does not validate.
    pub fn with_inputs(
        config: &ControllerConfig,
        inputs: Arc<ControlInputs>,
        sensor: S,
        actuator: A,
    ) -> Result<Self, HapticError> {
        config.validate()?;

        let start = inputs.snapshot();
        info!(
            period_us = start.period_us,
            selector = start.mode,
            grace_period_us = config.calibration.grace_period_us,
            "Control loop created"
        );

        let context = ControllerContext::new(config);
        let last_phase = context.calibration.phase();
        Ok(Self {
            config: *config,
            context,
            sensor,
            actuator,
            telemetry: Arc::new(TelemetryBoard::new(Arc::clone(&inputs))),
            inputs,
            counters: Arc::new(TickCounters::new()),
            last_selector: start.mode,
            last_faults: FaultSet::empty(),
            last_phase,
        })
    }

    /// Run one period.
    ///
    /// # RT Safety
    ///
    /// - No heap allocations
    /// - No locks; shared inputs are read with a single atomic load
    /// - Logs only on fault, mode and phase transitions
    pub fn tick(&mut self) -> TickReport {
        let inputs = self.inputs.snapshot();
        let dt = inputs.dt_seconds();
        let mut faults = FaultSet::empty();

        let timestamp_us = self.context.advance(inputs.period_us);

        let voltage = hold_finite(
            self.sensor.read_voltage(),
            &mut self.context.last_voltage,
            &mut faults,
        );
        let angle_deg = hold_finite(
            self.sensor.read_angle(),
            &mut self.context.last_angle,
            &mut faults,
        );
        let hall_voltage = self.sensor.read_hall_voltage();

        let sample = self.context.conditioner.process(dt, voltage);
        if !sample.timing_valid {
            faults.insert(TickFault::InvalidTiming);
        }

        let calibration = self.context.calibration.update(sample.envelope, timestamp_us);

        let mean_position_deg = self.context.smoother.push_and_average(angle_deg);

        let mode = match ControlMode::from_selector(inputs.mode) {
            Some(mode) => mode,
            None => {
                faults.insert(TickFault::UnknownMode);
                ControlMode::Inactive
            }
        };
        let activation_ratio = self
            .context
            .calibration
            .activation_ratio(sample.envelope)
            .ok();
        let mut torque_nm = match self
            .context
            .modes
            .compute(mode, activation_ratio, mean_position_deg, dt)
        {
            Ok(torque) => torque,
            Err(fault) => {
                faults.insert(fault);
                0.0
            }
        };
        if !torque_nm.is_finite() {
            faults.insert(TickFault::NonFiniteTorque);
        }
        if faults.iter().any(TickFault::forces_zero_torque) || !torque_nm.is_finite() {
            torque_nm = 0.0;
        }

        self.actuator.set_torque(torque_nm);

        let calib = &self.context.calibration;
        self.telemetry.publish(&TelemetryFrame {
            paddle_position_deg: angle_deg,
            hall_voltage,
            emg_voltage: voltage,
            envelope: sample.envelope,
            calibration_max: calib.max_seen,
            calibration_min: calib.min_seen,
            objective_deg: self.context.modes.objective(mode),
            torque_nm,
        });

        let phase = calib.phase();
        self.record(timestamp_us, inputs.mode, mode, faults, phase);
        trace!(timestamp_us, envelope = sample.envelope, torque_nm, "tick");

        TickReport {
            timestamp_us,
            dt,
            selector: inputs.mode,
            mode,
            torque_nm,
            faults,
            sample,
            angle_deg,
            mean_position_deg,
            activation_ratio,
            calibration,
            phase,
        }
    }

    /// Run `ticks` periods back to back, returning the last report.
    pub fn run_for(&mut self, ticks: u64) -> Option<TickReport> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.tick());
        }
        last
    }

    fn record(
        &mut self,
        timestamp_us: u64,
        selector: u32,
        mode: ControlMode,
        faults: FaultSet,
        phase: CalibrationPhase,
    ) {
        self.counters.inc_tick();
        for fault in faults.iter() {
            match fault {
                TickFault::Uncalibrated => self.counters.inc_uncalibrated(),
                TickFault::InvalidTiming => self.counters.inc_invalid_timing(),
                TickFault::UnknownMode => self.counters.inc_unknown_mode(),
                TickFault::NonFiniteTorque => self.counters.inc_non_finite_torque(),
                TickFault::NonFiniteSample => self.counters.inc_non_finite_sample(),
            }
        }

        if selector != self.last_selector {
            self.counters.inc_mode_switch();
            info!(
                from = self.last_selector,
                to = selector,
                %mode,
                timestamp_us,
                "Mode selector changed"
            );
            self.last_selector = selector;
        }

        if faults != self.last_faults {
            for fault in faults.iter().filter(|f| !self.last_faults.contains(*f)) {
                if fault.severity() >= ErrorSeverity::Warning {
                    warn!(code = fault.code(), timestamp_us, "Fault raised: {}", fault);
                } else {
                    info!(code = fault.code(), timestamp_us, "Fault raised: {}", fault);
                }
            }
            for fault in self.last_faults.iter().filter(|f| !faults.contains(*f)) {
                info!(code = fault.code(), timestamp_us, "Fault cleared: {}", fault);
            }
            self.last_faults = faults;
        }

        if phase != self.last_phase {
            let calib = &self.context.calibration;
            info!(
                from = self.last_phase.as_str(),
                to = phase.as_str(),
                max = calib.max_seen,
                min = calib.min_seen,
                timestamp_us,
                "Calibration phase changed"
            );
            self.last_phase = phase;
        }
    }

    /// Return every stage to its start-up state. Shared inputs and counters
    /// are left alone.
    pub fn reset(&mut self) {
        info!(timestamp_us = self.context.timestamp_us, "Control loop reset");
        self.context.reset(&self.config);
        self.last_faults = FaultSet::empty();
        self.last_phase = self.context.calibration.phase();
    }

    /// Configuration the loop was built with.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Owned per-tick state.
    pub fn context(&self) -> &ControllerContext {
        &self.context
    }

    /// Shared mode selector and period.
    pub fn inputs(&self) -> &Arc<ControlInputs> {
        &self.inputs
    }

    /// Shared telemetry board.
    pub fn telemetry(&self) -> &Arc<TelemetryBoard> {
        &self.telemetry
    }

    /// Shared tick and fault counters.
    pub fn counters(&self) -> &Arc<TickCounters> {
        &self.counters
    }

    /// The sensor port.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// The sensor port, mutably.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// The actuator port.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Tear the loop down, returning its ports.
    pub fn into_parts(self) -> (S, A) {
        (self.sensor, self.actuator)
    }
}

/// Pass `value` through if finite, otherwise substitute the last finite
/// reading and flag the tick.
#[inline]
fn hold_finite(value: f32, last: &mut f32, faults: &mut FaultSet) -> f32 {
    if value.is_finite() {
        *last = value;
        value
    } else {
        faults.insert(TickFault::NonFiniteSample);
        *last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[derive(Debug, Default)]
    struct Scripted {
        voltage: f32,
        angle: f32,
    }

    impl SensorSource for Scripted {
        fn read_voltage(&mut self) -> f32 {
            self.voltage
        }

        fn read_angle(&mut self) -> f32 {
            self.angle
        }
    }

    #[derive(Debug, Default)]
    struct LastTorque(Option<f32>);

    impl ActuatorSink for LastTorque {
        fn set_torque(&mut self, torque_nm: f32) {
            self.0 = Some(torque_nm);
        }
    }

    fn control(config: ControllerConfig) -> Result<ControlLoop<Scripted, LastTorque>, HapticError> {
        ControlLoop::new(&config, Scripted::default(), LastTorque::default())
    }

    #[test]
    fn test_timestamp_advances_by_period() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        assert_eq!(control.tick().timestamp_us, 1_000);
        control.inputs().set_period_us(250);
        let report = control.tick();
        assert_eq!(report.timestamp_us, 1_250);
        assert!((report.dt - 0.000_25).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_actuator_receives_reported_torque() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        let report = control.tick();
        assert_eq!(control.actuator().0, Some(report.torque_nm));
        Ok(())
    }

    #[test]
    fn test_non_finite_sample_is_held_and_zeroes_torque() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        control.sensor_mut().voltage = 1.2;
        control.tick();

        control.sensor_mut().voltage = f32::NAN;
        let report = control.tick();
        assert!(report.faults.contains(TickFault::NonFiniteSample));
        assert_eq!(report.sample.voltage, 1.2);
        assert!(report.sample.envelope.is_finite());
        assert_eq!(report.torque_nm, 0.0);
        Ok(())
    }

    #[test]
    fn test_zero_period_rejects_filter_update() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        control.sensor_mut().voltage = 2.0;
        let first = control.tick();

        control.inputs().set_period_us(0);
        let report = control.tick();
        assert!(report.faults.contains(TickFault::InvalidTiming));
        assert_eq!(report.sample.bandpassed, first.sample.bandpassed);
        assert_eq!(report.timestamp_us, first.timestamp_us);
        Ok(())
    }

    #[test]
    fn test_counters_track_faults() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        control.inputs().set_mode(1);
        control.run_for(10);
        control.inputs().set_mode(9);
        control.run_for(5);

        let counters = control.counters().snapshot();
        assert_eq!(counters.total_ticks, 15);
        assert_eq!(counters.uncalibrated_ticks, 10);
        assert_eq!(counters.unknown_mode_ticks, 5);
        assert_eq!(counters.mode_switches, 2);
        Ok(())
    }

    #[test]
    fn test_reset_restarts_grace_period() -> Result<(), HapticError> {
        let mut config = ControllerConfig::default();
        config.calibration.grace_period_us = 2_000;
        let mut control = control(config)?;
        control.run_for(5);
        assert_ne!(control.context().calibration.phase(), CalibrationPhase::Grace);

        control.reset();
        assert_eq!(control.context(), &ControllerContext::new(&config));
        assert_eq!(control.tick().phase, CalibrationPhase::Grace);
        Ok(())
    }

    #[test]
    #[traced_test]
    fn test_mode_change_is_logged_once() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        control.inputs().set_mode(2);
        control.run_for(3);
        assert!(logs_contain("Mode selector changed"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("Mode selector changed")).count() {
                1 => Ok(()),
                n => Err(format!("expected one mode change log, got {n}")),
            }
        });
        Ok(())
    }

    #[test]
    #[traced_test]
    fn test_fault_transitions_are_logged() -> Result<(), HapticError> {
        let mut control = control(ControllerConfig::default())?;
        control.inputs().set_mode(7);
        control.run_for(2);
        control.inputs().set_mode(0);
        control.tick();
        assert!(logs_contain("Fault raised: Unknown mode selector value"));
        assert!(logs_contain("Fault cleared: Unknown mode selector value"));
        Ok(())
    }

    #[test]
    #[traced_test]
    fn test_calibration_phase_change_is_logged() -> Result<(), HapticError> {
        let mut config = ControllerConfig::default();
        config.calibration.grace_period_us = 1_000;
        let mut control = control(config)?;
        control.sensor_mut().voltage = 1.0;
        control.tick();
        assert!(logs_contain("Calibration phase changed"));
        Ok(())
    }
}
