//! Per-tick controller state
//!
//! Everything the tick mutates lives in [`ControllerContext`], built once from
//! a [`ControllerConfig`]. Nothing is allocated after construction.

use myohaptic_calibration::EnvelopeCalibration;
use myohaptic_filters::{EmgConditioner, FilterState, PositionSmoother};

use crate::config::ControllerConfig;
use crate::modes::ModeController;

/// Owned state of one control loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerContext {
    /// High-pass, low-pass and envelope stages.
    pub conditioner: EmgConditioner,
    /// Running envelope bounds.
    pub calibration: EnvelopeCalibration,
    /// Moving average of the paddle angle.
    pub smoother: PositionSmoother,
    /// Control laws and their accumulators.
    pub modes: ModeController,
    /// Microseconds since start-up, advanced by one period per tick.
    pub timestamp_us: u64,
    /// Last finite EMG voltage, held when the sensor returns garbage.
    pub last_voltage: f32,
    /// Last finite paddle angle.
    pub last_angle: f32,
}

impl ControllerContext {
    /// Fresh state for `config`. The config is assumed to be validated.
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            conditioner: EmgConditioner::new(config.conditioning),
            calibration: EnvelopeCalibration::new(config.calibration),
            smoother: PositionSmoother::new(),
            modes: ModeController::new(config),
            timestamp_us: 0,
            last_voltage: 0.0,
            last_angle: 0.0,
        }
    }

    /// Advance the time base by one period and return the new timestamp.
    #[inline]
    pub fn advance(&mut self, period_us: u32) -> u64 {
        self.timestamp_us = self.timestamp_us.saturating_add(u64::from(period_us));
        self.timestamp_us
    }

    /// Return to the start-up state, keeping the configuration.
    pub fn reset(&mut self, config: &ControllerConfig) {
        self.conditioner.reset();
        self.calibration.reset(config.calibration);
        self.smoother.reset();
        self.modes.reset();
        self.timestamp_us = 0;
        self.last_voltage = 0.0;
        self.last_angle = 0.0;
    }
}
