//! EMG Conditioning Chain
//!
//! Raw electrode voltage -> high-pass -> low-pass -> envelope, in series, once
//! per tick.

use crate::envelope::{DEFAULT_ENVELOPE_WINDOW, EnvelopeState, envelope_filter};
use crate::high_pass::{DEFAULT_HIGH_PASS_CUTOFF_HZ, HighPassState, high_pass_filter};
use crate::low_pass::{DEFAULT_LOW_PASS_CUTOFF_HZ, LowPassState, low_pass_filter};
use crate::state::FilterState;

/// Parameters of the conditioning chain.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConditioningConfig {
    /// High-pass cutoff in Hz
    pub high_pass_cutoff_hz: f32,
    /// Low-pass cutoff in Hz
    pub low_pass_cutoff_hz: f32,
    /// Envelope window in samples
    pub envelope_window: u32,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            high_pass_cutoff_hz: DEFAULT_HIGH_PASS_CUTOFF_HZ,
            low_pass_cutoff_hz: DEFAULT_LOW_PASS_CUTOFF_HZ,
            envelope_window: DEFAULT_ENVELOPE_WINDOW,
        }
    }
}

/// Every intermediate signal of one conditioning step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ConditionedSample {
    /// Raw input voltage
    pub voltage: f32,
    /// High-pass output
    pub highpassed: f32,
    /// Band-passed (high-pass then low-pass) output
    pub bandpassed: f32,
    /// Envelope after this sample
    pub envelope: f32,
    /// `false` when the filter updates were rejected for invalid timing
    pub timing_valid: bool,
}

/// High-pass, low-pass and envelope stages chained in series.
///
/// ```
/// use myohaptic_filters::{ConditioningConfig, EmgConditioner};
///
/// let mut conditioner = EmgConditioner::new(ConditioningConfig::default());
/// let ok = conditioner.process(0.001, 0.4);
/// assert!(ok.timing_valid);
///
/// let rejected = conditioner.process(0.0, 5.0);
/// assert!(!rejected.timing_valid);
/// assert_eq!(rejected.bandpassed, ok.bandpassed);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EmgConditioner {
    high_pass: HighPassState,
    low_pass: LowPassState,
    envelope: EnvelopeState,
}

impl EmgConditioner {
    /// Create the chain with zeroed history.
    pub fn new(config: ConditioningConfig) -> Self {
        Self {
            high_pass: HighPassState::new(config.high_pass_cutoff_hz),
            low_pass: LowPassState::new(config.low_pass_cutoff_hz),
            envelope: EnvelopeState::new(config.envelope_window),
        }
    }

    /// Run one sample through all three stages.
    ///
    /// A stage that rejects its update (invalid `dt`) contributes its previous
    /// output to the next stage, so the envelope still advances every tick.
    ///
    /// # RT Safety
    ///
    /// - No heap allocations
    /// - O(1) time complexity
    pub fn process(&mut self, dt: f32, voltage: f32) -> ConditionedSample {
        let hp = high_pass_filter(&mut self.high_pass, dt, voltage);
        let highpassed = hp.unwrap_or(self.high_pass.prev_output);

        let lp = low_pass_filter(&mut self.low_pass, dt, highpassed);
        let bandpassed = lp.unwrap_or(self.low_pass.prev_output);

        let envelope = envelope_filter(&mut self.envelope, bandpassed);

        ConditionedSample {
            voltage,
            highpassed,
            bandpassed,
            envelope,
            timing_valid: hp.is_some() && lp.is_some(),
        }
    }

    /// Current envelope value.
    pub fn envelope(&self) -> f32 {
        self.envelope.envelope
    }

    /// High-pass stage state.
    pub fn high_pass(&self) -> &HighPassState {
        &self.high_pass
    }

    /// Low-pass stage state.
    pub fn low_pass(&self) -> &LowPassState {
        &self.low_pass
    }

    /// Envelope stage state.
    pub fn envelope_state(&self) -> &EnvelopeState {
        &self.envelope
    }

    /// Clear all history, keeping the configuration.
    pub fn reset(&mut self) {
        self.high_pass.reset();
        self.low_pass.reset();
        self.envelope.reset();
    }
}

impl Default for EmgConditioner {
    fn default() -> Self {
        Self::new(ConditioningConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_offset_produces_small_envelope() {
        let mut conditioner = EmgConditioner::default();
        for _ in 0..5_000 {
            conditioner.process(0.001, 1.65);
        }
        // The high-pass kills the offset; only the start-up transient leaked in
        assert!(conditioner.envelope() < 0.05);
    }

    #[test]
    fn test_burst_raises_envelope() {
        let mut quiet = EmgConditioner::default();
        let mut active = EmgConditioner::default();
        for i in 0..2_000 {
            let t = i as f32 * 0.001;
            quiet.process(0.001, 1.65);
            active.process(0.001, 1.65 + 0.5 * (2.0 * core::f32::consts::PI * 120.0 * t).sin());
        }
        assert!(active.envelope() > quiet.envelope() + 0.1);
    }

    #[test]
    fn test_rejected_tick_reuses_outputs() {
        let mut conditioner = EmgConditioner::default();
        let first = conditioner.process(0.001, 0.5);
        let second = conditioner.process(-1.0, 2.0);

        assert!(!second.timing_valid);
        assert_eq!(second.highpassed, first.highpassed);
        assert_eq!(second.bandpassed, first.bandpassed);
        assert_eq!(conditioner.high_pass().prev_input, 0.5);
        assert!(second.envelope.is_finite());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut conditioner = EmgConditioner::default();
        conditioner.process(0.001, 0.5);
        conditioner.reset();
        assert_eq!(conditioner, EmgConditioner::default());
    }
}
