//! Simulated rig: a synthetic EMG electrode and a spring-damper paddle.
//!
//! The control loop only sees the [`SensorSource`] side. The command loop
//! feeds the torque of each tick back with [`SimulatedRig::step`].

use core::f64::consts::TAU;

use myohaptic_controller::{ActuatorSink, SensorSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Electrode DC offset [V].
pub const EMG_BASELINE_V: f32 = 1.65;
/// Hall sensor output at the neutral paddle position [V].
pub const HALL_NEUTRAL_V: f32 = 2.5;
const HALL_V_PER_DEG: f32 = 0.01;

const PADDLE_INERTIA: f64 = 2.0e-5;
const PADDLE_DAMPING: f64 = 5.0e-4;
const PADDLE_STIFFNESS: f64 = 2.0e-2;
const PADDLE_LIMIT_RAD: f64 = core::f64::consts::FRAC_PI_2;

/// Muscle effort over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffortProfile {
    /// Peak effort in `[0, 1]`.
    pub peak: f32,
    /// Length of one contract/relax cycle [s].
    pub cycle_s: f64,
}

impl EffortProfile {
    /// Raised-cosine effort at `t` seconds: 0 at the start of each cycle,
    /// `peak` half way through.
    pub fn effort_at(&self, t: f64) -> f32 {
        if self.cycle_s <= 0.0 {
            return self.peak;
        }
        let phase = (TAU * t / self.cycle_s).cos();
        #[allow(clippy::cast_possible_truncation, reason = "phase is in [-1, 1]")]
        let shape = (0.5 * (1.0 - phase)) as f32;
        self.peak * shape
    }
}

/// Synthetic surface EMG: DC offset plus broadband noise whose amplitude
/// grows with effort.
#[derive(Debug)]
pub struct SyntheticEmg {
    rng: StdRng,
    profile: EffortProfile,
    noise_floor_v: f32,
    burst_gain_v: f32,
}

impl SyntheticEmg {
    pub fn new(seed: u64, profile: EffortProfile) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            profile,
            noise_floor_v: 0.01,
            burst_gain_v: 0.5,
        }
    }

    /// Electrode voltage at `t` seconds.
    pub fn sample(&mut self, t: f64) -> f32 {
        let effort = self.profile.effort_at(t);
        let floor: f32 = self.rng.random_range(-1.0..=1.0);
        let burst: f32 = self.rng.random_range(-1.0..=1.0);
        EMG_BASELINE_V + self.noise_floor_v * floor + effort * self.burst_gain_v * burst
    }

    pub fn profile(&self) -> EffortProfile {
        self.profile
    }
}

/// Second-order paddle: inertia, viscous damping and a centering spring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaddlePlant {
    angle_rad: f64,
    velocity_rad_s: f64,
}

impl PaddlePlant {
    /// Integrate one step with semi-implicit Euler.
    pub fn step(&mut self, torque_nm: f32, dt: f64) {
        if dt <= 0.0 || !torque_nm.is_finite() {
            return;
        }
        let spring = PADDLE_STIFFNESS * self.angle_rad;
        let damper = PADDLE_DAMPING * self.velocity_rad_s;
        let accel = (f64::from(torque_nm) - spring - damper) / PADDLE_INERTIA;
        self.velocity_rad_s += accel * dt;
        self.angle_rad += self.velocity_rad_s * dt;

        if self.angle_rad.abs() > PADDLE_LIMIT_RAD {
            self.angle_rad = self.angle_rad.clamp(-PADDLE_LIMIT_RAD, PADDLE_LIMIT_RAD);
            self.velocity_rad_s = 0.0;
        }
    }

    pub fn angle_deg(&self) -> f32 {
        #[allow(clippy::cast_possible_truncation, reason = "angle is clamped to +/-90 deg")]
        let deg = self.angle_rad.to_degrees() as f32;
        deg
    }
}

/// Electrode and paddle sharing one simulated clock.
#[derive(Debug)]
pub struct SimulatedRig {
    emg: SyntheticEmg,
    paddle: PaddlePlant,
    time_s: f64,
}

impl SimulatedRig {
    pub fn new(seed: u64, profile: EffortProfile) -> Self {
        Self {
            emg: SyntheticEmg::new(seed, profile),
            paddle: PaddlePlant::default(),
            time_s: 0.0,
        }
    }

    /// Apply the torque the controller just commanded and advance the clock.
    pub fn step(&mut self, torque_nm: f32, dt: f32) {
        let dt = f64::from(dt);
        self.paddle.step(torque_nm, dt);
        if dt > 0.0 {
            self.time_s += dt;
        }
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn effort(&self) -> f32 {
        self.emg.profile().effort_at(self.time_s)
    }

    pub fn paddle(&self) -> &PaddlePlant {
        &self.paddle
    }
}

impl SensorSource for SimulatedRig {
    fn read_voltage(&mut self) -> f32 {
        self.emg.sample(self.time_s)
    }

    fn read_angle(&mut self) -> f32 {
        self.paddle.angle_deg()
    }

    fn read_hall_voltage(&mut self) -> f32 {
        HALL_NEUTRAL_V + HALL_V_PER_DEG * self.paddle.angle_deg()
    }
}

/// Torque statistics gathered at the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TorqueLog {
    pub last_nm: f32,
    pub peak_abs_nm: f32,
    abs_sum: f64,
    count: u64,
}

impl TorqueLog {
    pub fn mean_abs_nm(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            reason = "statistics only"
        )]
        let mean = (self.abs_sum / self.count as f64) as f32;
        mean
    }
}

impl ActuatorSink for TorqueLog {
    fn set_torque(&mut self, torque_nm: f32) {
        self.last_nm = torque_nm;
        self.peak_abs_nm = self.peak_abs_nm.max(torque_nm.abs());
        self.abs_sum += f64::from(torque_nm.abs());
        self.count = self.count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effort_profile_is_raised_cosine() {
        let profile = EffortProfile { peak: 0.8, cycle_s: 4.0 };
        assert!(profile.effort_at(0.0).abs() < 1e-6);
        assert!((profile.effort_at(2.0) - 0.8).abs() < 1e-6);
        assert!(profile.effort_at(4.0).abs() < 1e-6);
    }

    #[test]
    fn zero_cycle_means_constant_effort() {
        let profile = EffortProfile { peak: 0.4, cycle_s: 0.0 };
        assert!((profile.effort_at(12.3) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn emg_stays_around_baseline_at_rest() {
        let mut emg = SyntheticEmg::new(7, EffortProfile { peak: 0.0, cycle_s: 1.0 });
        for i in 0..1000 {
            let v = emg.sample(f64::from(i) * 1e-3);
            assert!((v - EMG_BASELINE_V).abs() <= 0.0101);
        }
    }

    #[test]
    fn same_seed_same_signal() {
        let profile = EffortProfile { peak: 0.5, cycle_s: 2.0 };
        let mut a = SyntheticEmg::new(42, profile);
        let mut b = SyntheticEmg::new(42, profile);
        for i in 0..100 {
            let t = f64::from(i) * 1e-3;
            assert!((a.sample(t) - b.sample(t)).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn paddle_settles_at_spring_equilibrium() {
        let mut paddle = PaddlePlant::default();
        for _ in 0..20_000 {
            paddle.step(0.006, 1e-3);
        }
        let expected = (0.006 / PADDLE_STIFFNESS).to_degrees();
        assert!((f64::from(paddle.angle_deg()) - expected).abs() < 0.1);
    }

    #[test]
    fn paddle_ignores_bad_steps() {
        let mut paddle = PaddlePlant::default();
        paddle.step(f32::NAN, 1e-3);
        paddle.step(0.01, 0.0);
        assert_eq!(paddle, PaddlePlant::default());
    }

    #[test]
    fn torque_log_tracks_peak_and_mean() {
        let mut log = TorqueLog::default();
        log.set_torque(0.002);
        log.set_torque(-0.004);
        assert!((log.peak_abs_nm - 0.004).abs() < 1e-9);
        assert!((log.mean_abs_nm() - 0.003).abs() < 1e-6);
        assert!((log.last_nm + 0.004).abs() < 1e-9);
    }

    #[test]
    fn rig_clock_advances_with_steps() {
        let mut rig = SimulatedRig::new(1, EffortProfile { peak: 0.5, cycle_s: 1.0 });
        for _ in 0..500 {
            rig.step(0.0, 1e-3);
        }
        assert!((rig.time_s() - 0.5).abs() < 1e-6);
        assert!((rig.effort() - 0.5).abs() < 1e-3);
        assert!((rig.read_hall_voltage() - HALL_NEUTRAL_V).abs() < 1e-6);
    }
}
