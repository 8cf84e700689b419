//! Single-Pole Low-Pass Filter
//!
//! First-order IIR smoothing stage: `y = y_prev + alpha * (x - y_prev)` with
//! `alpha = dt / (RC + dt)`.

use crate::{time_constant, valid_dt};

/// Default low-pass cutoff for the EMG chain in Hz.
pub const DEFAULT_LOW_PASS_CUTOFF_HZ: f32 = 400.0;

/// State for the single-pole low-pass filter.
///
/// # RT Safety
///
/// - `#[repr(C)]` for stable ABI
/// - No heap allocations
/// - O(1) time complexity
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LowPassState {
    /// Cutoff frequency in Hz
    pub cutoff_hz: f32,
    /// Previous input sample
    pub prev_input: f32,
    /// Previous output sample
    pub prev_output: f32,
}

impl LowPassState {
    /// Create a low-pass filter state with zeroed history.
    ///
    /// ```
    /// use myohaptic_filters::LowPassState;
    ///
    /// let state = LowPassState::new(400.0);
    /// assert_eq!(state.cutoff_hz, 400.0);
    /// assert_eq!(state.prev_output, 0.0);
    /// ```
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }
}

impl Default for LowPassState {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_PASS_CUTOFF_HZ)
    }
}

/// Smoothing coefficient `dt / (RC + dt)`, in `(0, 1)` for valid inputs.
///
/// Returns `None` if `dt` or `cutoff_hz` is non-positive or non-finite.
#[inline]
pub fn low_pass_alpha(dt: f32, cutoff_hz: f32) -> Option<f32> {
    if !valid_dt(dt) {
        return None;
    }
    let rc = time_constant(cutoff_hz)?;
    Some(dt / (rc + dt))
}

/// Pure low-pass step. The caller owns the history.
///
/// ```
/// use myohaptic_filters::low_pass;
///
/// let out = low_pass(0.0, 0.001, 1.0, 400.0).unwrap_or_default();
/// assert!(out > 0.0 && out < 1.0);
/// assert_eq!(low_pass(0.0, 0.0, 1.0, 400.0), None);
/// ```
#[inline]
pub fn low_pass(prev_output: f32, dt: f32, input: f32, cutoff_hz: f32) -> Option<f32> {
    let alpha = low_pass_alpha(dt, cutoff_hz)?;
    Some(prev_output + alpha * (input - prev_output))
}

/// Low-pass filter step that updates `state` in place.
///
/// Returns `None` and leaves `state` untouched when the timing or cutoff is
/// invalid; callers reuse `state.prev_output` for that tick.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) time complexity
/// - No syscalls or I/O
#[inline]
pub fn low_pass_filter(state: &mut LowPassState, dt: f32, input: f32) -> Option<f32> {
    let output = low_pass(state.prev_output, dt, input, state.cutoff_hz)?;
    state.prev_input = input;
    state.prev_output = output;
    Some(output)
}
