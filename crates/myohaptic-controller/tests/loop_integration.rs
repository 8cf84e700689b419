//! End-to-end ticks through `ControlLoop` with scripted sensors.

use std::sync::Arc;
use std::thread;

use approx::assert_abs_diff_eq;
use myohaptic_controller::prelude::*;

/// DC-offset electrode with a 120 Hz burst whose amplitude follows `effort`.
#[derive(Debug)]
struct Electrode {
    tick: u32,
    effort: f32,
    angle: f32,
}

impl Electrode {
    fn new() -> Self {
        Self {
            tick: 0,
            effort: 0.0,
            angle: 0.0,
        }
    }
}

impl SensorSource for Electrode {
    fn read_voltage(&mut self) -> f32 {
        self.tick = self.tick.wrapping_add(1);
        let phase = self.tick as f32 * 2.0 * std::f32::consts::PI * 0.12;
        1.65 + self.effort * phase.sin()
    }

    fn read_angle(&mut self) -> f32 {
        self.angle
    }

    fn read_hall_voltage(&mut self) -> f32 {
        2.5
    }
}

#[derive(Debug, Default)]
struct Recorder {
    torques: Vec<f32>,
}

impl ActuatorSink for Recorder {
    fn set_torque(&mut self, torque_nm: f32) {
        self.torques.push(torque_nm);
    }
}

type TestLoop = ControlLoop<Electrode, Recorder>;

fn new_loop(grace_period_us: u64) -> Result<TestLoop, HapticError> {
    let mut config = ControllerConfig::default();
    config.calibration.grace_period_us = grace_period_us;
    ControlLoop::new(&config, Electrode::new(), Recorder::default())
}

/// Loop with calibration bounds spanning a quiet and a strong contraction.
fn calibrated_loop() -> Result<TestLoop, HapticError> {
    let mut control = new_loop(0)?;
    control.sensor_mut().effort = 0.0;
    control.run_for(3_000);
    control.sensor_mut().effort = 0.8;
    control.run_for(3_000);
    control.sensor_mut().effort = 0.3;
    control.run_for(3_000);
    Ok(control)
}

#[test]
fn every_active_mode_is_silent_during_grace() -> Result<(), HapticError> {
    let mut control = new_loop(5_000_000)?;
    control.sensor_mut().effort = 0.5;
    for selector in [1, 2, 3] {
        control.inputs().set_mode(selector);
        for _ in 0..1_000 {
            let report = control.tick();
            assert_eq!(report.torque_nm, 0.0);
            assert_eq!(report.fault(), Some(TickFault::Uncalibrated));
            assert_eq!(report.phase, CalibrationPhase::Grace);
        }
    }
    let (_, recorder) = control.into_parts();
    assert_eq!(recorder.torques.len(), 3_000);
    assert!(recorder.torques.iter().all(|torque| *torque == 0.0));
    Ok(())
}

#[test]
fn grace_period_ends_after_five_seconds_of_ticks() -> Result<(), HapticError> {
    let mut control = new_loop(5_000_000)?;
    let report = control.run_for(4_999);
    assert_eq!(report.map(|r| r.phase), Some(CalibrationPhase::Grace));

    let report = control.tick();
    assert_eq!(report.timestamp_us, 5_000_000);
    assert_ne!(report.phase, CalibrationPhase::Grace);
    Ok(())
}

#[test]
fn calibrated_direct_torque_follows_effort() -> Result<(), HapticError> {
    let mut control = calibrated_loop()?;
    control.inputs().set_mode(1);

    control.sensor_mut().effort = 0.8;
    let strong = control.run_for(3_000);
    control.sensor_mut().effort = 0.0;
    let quiet = control.run_for(5_000);

    let strong = strong.map(|r| r.torque_nm).unwrap_or_default();
    let quiet = quiet.map(|r| r.torque_nm).unwrap_or(f32::NAN);
    assert!(strong > 0.003, "strong contraction gave {strong} N.m");
    assert_abs_diff_eq!(quiet, 0.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn calibrated_ratio_stays_in_unit_interval() -> Result<(), HapticError> {
    let mut control = calibrated_loop()?;
    control.inputs().set_mode(1);
    for _ in 0..2_000 {
        let report = control.tick();
        let ratio = report.activation_ratio.unwrap_or(f32::NAN);
        assert!((0.0..=1.0).contains(&ratio), "ratio {ratio}");
        assert!(report.faults.is_empty());
    }
    Ok(())
}

#[test]
fn pid_state_survives_a_direct_torque_detour() -> Result<(), HapticError> {
    let mut control = calibrated_loop()?;
    control.sensor_mut().angle = 4.0;
    control.inputs().set_mode(2);
    control.run_for(200);
    let saved = control
        .context()
        .modes
        .state(ControlMode::PidPosition)
        .copied()
        .unwrap_or_default();

    control.inputs().set_mode(1);
    control.run_for(500);
    let during = control
        .context()
        .modes
        .state(ControlMode::PidPosition)
        .copied()
        .unwrap_or_default();
    assert_eq!(during, saved);

    control.inputs().set_mode(2);
    let report = control.tick();
    let resumed = control
        .context()
        .modes
        .state(ControlMode::PidPosition)
        .copied()
        .unwrap_or_default();
    let error = resumed.objective - report.mean_position_deg;
    assert_abs_diff_eq!(resumed.prev_error, error, epsilon = 1e-5);
    assert_abs_diff_eq!(
        resumed.integral_error,
        saved.integral_error + error,
        epsilon = 1e-2
    );
    Ok(())
}

#[test]
fn smoother_runs_in_every_mode() -> Result<(), HapticError> {
    let mut control = new_loop(5_000_000)?;
    control.sensor_mut().angle = 10.0;
    let means: Vec<f32> = (0..5).map(|_| control.tick().mean_position_deg).collect();
    let expected = [2.0, 4.0, 6.0, 8.0, 10.0];
    for (mean, want) in means.iter().zip(expected) {
        assert_abs_diff_eq!(*mean, want, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn telemetry_reflects_last_tick() -> Result<(), HapticError> {
    let mut control = new_loop(5_000_000)?;
    control.sensor_mut().angle = -7.5;
    let report = control.tick();

    let board = control.telemetry();
    assert_eq!(board.read(Signal::PaddlePosition), -7.5);
    assert_eq!(board.read(Signal::HallVoltage), 2.5);
    assert_eq!(board.read(Signal::Envelope), report.sample.envelope);
    assert_eq!(board.read(Signal::CalibrationMax), -1000.0);
    assert_eq!(board.read(Signal::CalibrationMin), 1000.0);
    assert_eq!(board.read(Signal::MotorTorque), 0.0);
    assert_eq!(board.read(Signal::Timestep), 1_000.0);
    Ok(())
}

#[test]
fn host_writes_take_effect_on_next_tick() -> Result<(), Box<dyn std::error::Error>> {
    let mut control = new_loop(5_000_000)?;
    control.tick();

    let board = Arc::clone(control.telemetry());
    let writer = thread::spawn(move || {
        board
            .write_by_name("Activate", 3.0)
            .and_then(|()| board.write_by_name("timestep [us]", 2_000.0))
    });
    writer
        .join()
        .map_err(|panic| format!("writer thread panicked: {panic:?}"))??;

    let report = control.tick();
    assert_eq!(report.selector, 3);
    assert_eq!(report.mode, ControlMode::AdaptivePosition);
    assert_eq!(report.timestamp_us, 3_000);
    assert_abs_diff_eq!(report.dt, 0.002);
    Ok(())
}

#[test]
fn unknown_selector_runs_inactive() -> Result<(), HapticError> {
    let mut control = calibrated_loop()?;
    control.sensor_mut().effort = 0.8;
    control.telemetry().write(Signal::Activate, 4.0)?;
    let report = control.tick();
    assert_eq!(report.mode, ControlMode::Inactive);
    assert_eq!(report.selector, 4);
    assert_eq!(report.fault(), Some(TickFault::UnknownMode));
    assert_eq!(report.torque_nm, 0.0);
    Ok(())
}

#[test]
fn shared_inputs_seed_the_loop() -> Result<(), HapticError> {
    let inputs = Arc::new(ControlInputs::new(500, 2));
    let control = ControlLoop::with_inputs(
        &ControllerConfig::default(),
        Arc::clone(&inputs),
        Electrode::new(),
        Recorder::default(),
    )?;
    assert_eq!(control.telemetry().read(Signal::Activate), 2.0);
    assert!(Arc::ptr_eq(control.inputs(), &inputs));
    Ok(())
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = ControllerConfig::default();
    config.adaptive.step_deg = -1.0;
    let result = ControlLoop::new(&config, Electrode::new(), Recorder::default());
    assert!(matches!(result, Err(HapticError::Validation(_))));
}
