//! Single-Pole High-Pass Filter
//!
//! Complement of the low-pass stage: `y = alpha * (y_prev + x - x_prev)` with
//! `alpha = RC / (RC + dt)`. Removes the DC offset and slow drift of the
//! electrode voltage.

use crate::{time_constant, valid_dt};

/// Default high-pass cutoff for the EMG chain in Hz.
pub const DEFAULT_HIGH_PASS_CUTOFF_HZ: f32 = 20.0;

/// State for the single-pole high-pass filter.
///
/// # RT Safety
///
/// - `#[repr(C)]` for stable ABI
/// - No heap allocations
/// - O(1) time complexity
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HighPassState {
    /// Cutoff frequency in Hz
    pub cutoff_hz: f32,
    /// Previous input sample
    pub prev_input: f32,
    /// Previous output sample
    pub prev_output: f32,
}

impl HighPassState {
    /// Create a high-pass filter state with zeroed history.
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }
}

impl Default for HighPassState {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_PASS_CUTOFF_HZ)
    }
}

/// Coefficient `RC / (RC + dt)`, in `(0, 1)` for valid inputs.
#[inline]
pub fn high_pass_alpha(dt: f32, cutoff_hz: f32) -> Option<f32> {
    if !valid_dt(dt) {
        return None;
    }
    let rc = time_constant(cutoff_hz)?;
    Some(rc / (rc + dt))
}

/// Pure high-pass step. The caller owns the history.
///
/// ```
/// use myohaptic_filters::high_pass;
///
/// // A step from 0 to 1 passes through almost entirely on the first sample.
/// let out = high_pass(0.0, 0.0, 0.001, 1.0, 20.0).unwrap_or_default();
/// assert!(out > 0.8 && out < 1.0);
/// ```
#[inline]
pub fn high_pass(
    prev_output: f32,
    prev_input: f32,
    dt: f32,
    input: f32,
    cutoff_hz: f32,
) -> Option<f32> {
    let alpha = high_pass_alpha(dt, cutoff_hz)?;
    Some(alpha * (prev_output + input - prev_input))
}

/// High-pass filter step that updates `state` in place.
///
/// Returns `None` and leaves `state` untouched when the timing or cutoff is
/// invalid.
#[inline]
pub fn high_pass_filter(state: &mut HighPassState, dt: f32, input: f32) -> Option<f32> {
    let output = high_pass(
        state.prev_output,
        state.prev_input,
        dt,
        input,
        state.cutoff_hz,
    )?;
    state.prev_input = input;
    state.prev_output = output;
    Some(output)
}
