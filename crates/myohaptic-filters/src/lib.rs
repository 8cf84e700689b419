//! RT-Safe EMG Conditioning Filters
//!
//! Signal conditioning for the myohaptic control loop. Every function here runs
//! once per tick at the control rate (1 kHz by default).
//!
//! # Overview
//!
//! - **High-pass**: single-pole IIR removing electrode drift (20 Hz by default)
//! - **Low-pass**: single-pole IIR removing high-frequency noise (400 Hz by default)
//! - **Envelope**: leaky-integrator rectifier turning the band-passed signal into
//!   a slowly varying magnitude estimate
//! - **Conditioning**: the three stages above chained in series
//! - **Moving average**: fixed-window mean used to smooth the paddle angle
//!
//! # RT Safety Guarantees
//!
//! - No heap allocations in filter hot paths
//! - O(1) time complexity (O(N) over a const-sized window for the moving average)
//! - No syscalls or I/O in filter functions
//! - Invalid timing (`dt <= 0`, non-finite values) never produces NaN: the
//!   update is rejected and the filter keeps its previous output
//!
//! # Example
//!
//! ```
//! use myohaptic_filters::prelude::*;
//!
//! // Create filter state at initialization time
//! let mut conditioner = EmgConditioner::new(ConditioningConfig::default());
//! let mut smoother = PositionSmoother::new();
//!
//! // In the control loop (1kHz):
//! let sample = conditioner.process(0.001, 1.65);
//! let mean_angle = smoother.push_and_average(12.0);
//!
//! assert!(sample.envelope.is_finite());
//! assert!((mean_angle - 2.4).abs() < 1e-6);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod conditioning;
pub mod envelope;
pub mod high_pass;
pub mod low_pass;
pub mod moving_average;
pub mod prelude;
pub mod state;

pub use conditioning::{ConditionedSample, ConditioningConfig, EmgConditioner};
pub use envelope::{DEFAULT_ENVELOPE_WINDOW, EnvelopeState, envelope_filter, update_envelope};
pub use high_pass::{HighPassState, high_pass, high_pass_alpha, high_pass_filter};
pub use low_pass::{LowPassState, low_pass, low_pass_alpha, low_pass_filter};
pub use moving_average::{MovingAverage, POSITION_WINDOW, PositionSmoother};
pub use state::*;

/// Time constant `RC = 1 / (2*pi*fc)` of a single-pole filter.
///
/// Returns `None` unless `cutoff_hz` is finite and strictly positive.
///
/// ```
/// use myohaptic_filters::time_constant;
///
/// let rc = time_constant(20.0).unwrap_or_default();
/// assert!((rc - 0.007_957_747).abs() < 1e-6);
/// assert_eq!(time_constant(0.0), None);
/// ```
#[inline]
pub fn time_constant(cutoff_hz: f32) -> Option<f32> {
    if cutoff_hz.is_finite() && cutoff_hz > 0.0 {
        Some(1.0 / (2.0 * core::f32::consts::PI * cutoff_hz))
    } else {
        None
    }
}

/// Whether `dt` is usable as a filter time step.
#[inline]
pub fn valid_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}
