//! Envelope Follower
//!
//! Leaky-integrator rectifier. Each tick the envelope keeps `(w - 1) / w` of
//! its previous value and adds `|x| / w` of the band-passed sample, where `w`
//! is the window size. With the default window of 500 at 1 kHz the effective
//! time constant is about half a second.
//!
//! The update is written as a sign branch rather than `abs()`:
//! negative samples use `((w - 1) * prev - x) / w`, others
//! `((w - 1) * prev + x) / w`. The envelope is stored signed, so a negative
//! seed decays towards the rectified mean instead of being clamped.

/// Default envelope window (samples).
pub const DEFAULT_ENVELOPE_WINDOW: u32 = 500;

/// State for the envelope follower.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EnvelopeState {
    /// Smoothing window in samples, at least 1
    pub window: u32,
    /// Current envelope value
    pub envelope: f32,
}

impl EnvelopeState {
    /// Create an envelope follower starting at zero.
    ///
    /// A window of 0 is treated as 1 (no smoothing).
    ///
    /// ```
    /// use myohaptic_filters::EnvelopeState;
    ///
    /// let state = EnvelopeState::new(0);
    /// assert_eq!(state.window, 1);
    /// ```
    pub fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
            envelope: 0.0,
        }
    }
}

impl Default for EnvelopeState {
    fn default() -> Self {
        Self::new(DEFAULT_ENVELOPE_WINDOW)
    }
}

/// One envelope update from the previous value and the band-passed sample.
///
/// ```
/// use myohaptic_filters::update_envelope;
///
/// assert!((update_envelope(0.0, 0.5, 500) - 0.001).abs() < 1e-7);
/// assert!((update_envelope(0.0, -0.5, 500) - 0.001).abs() < 1e-7);
/// ```
#[inline]
pub fn update_envelope(prev_envelope: f32, bandpassed: f32, window: u32) -> f32 {
    #[allow(clippy::cast_precision_loss, reason = "window sizes are small integers")]
    let window = window.max(1) as f32;
    let retained = (window - 1.0) * prev_envelope;
    if bandpassed < 0.0 {
        (retained - bandpassed) / window
    } else {
        (retained + bandpassed) / window
    }
}

/// Envelope update that stores the result in `state`.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) time complexity
#[inline]
pub fn envelope_filter(state: &mut EnvelopeState, bandpassed: f32) -> f32 {
    state.envelope = update_envelope(state.envelope, bandpassed, state.window);
    state.envelope
}
