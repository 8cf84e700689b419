//! Port traits for the hardware boundary
//!
//! The control loop never talks to peripherals directly. Sensors, the tick
//! timer and the motor driver are reached through these traits so the same
//! loop runs against firmware drivers, a simulator or test doubles.

use myohaptic_atomic::ControlInputs;

/// Per-tick sensor readings.
///
/// Called exactly once per tick for each channel, from the tick context.
/// Implementations must not block.
pub trait SensorSource {
    /// EMG electrode voltage [V].
    fn read_voltage(&mut self) -> f32;

    /// Paddle angle [deg], already divided by the gearbox reduction ratio.
    fn read_angle(&mut self) -> f32;

    /// Hall sensor voltage [V]. Published for monitoring only.
    fn read_hall_voltage(&mut self) -> f32 {
        0.0
    }
}

/// Source of the tick period.
pub trait TickTimer {
    /// Current tick period in microseconds.
    fn period_us(&self) -> u32;
}

impl TickTimer for ControlInputs {
    fn period_us(&self) -> u32 {
        ControlInputs::period_us(self)
    }
}

/// Motor torque output.
///
/// Fire-and-forget: the loop does not observe whether the command was
/// applied.
pub trait ActuatorSink {
    /// Command `torque_nm` [N.m] for the coming period.
    fn set_torque(&mut self, torque_nm: f32);
}

impl<F> ActuatorSink for F
where
    F: FnMut(f32),
{
    fn set_torque(&mut self, torque_nm: f32) {
        self(torque_nm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_inputs_is_a_timer() {
        let inputs = ControlInputs::new(250, 0);
        let timer: &dyn TickTimer = &inputs;
        assert_eq!(timer.period_us(), 250);
    }

    #[test]
    fn test_closure_actuator() {
        let mut last = f32::NAN;
        {
            let mut sink = |torque: f32| last = torque;
            sink.set_torque(0.004);
        }
        assert!((last - 0.004).abs() < f32::EPSILON);
    }
}
