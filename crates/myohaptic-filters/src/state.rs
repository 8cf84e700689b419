//! Filter State Types
//!
//! Aggregates every filter state type and the common reset contract.

pub use crate::envelope::EnvelopeState;
pub use crate::high_pass::HighPassState;
pub use crate::low_pass::LowPassState;
pub use crate::moving_average::MovingAverage;

/// Filter trait for common filter operations.
pub trait FilterState: Clone + std::fmt::Debug {
    /// Reset the dynamic state, keeping the configuration.
    fn reset(&mut self);
}

impl FilterState for HighPassState {
    fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

impl FilterState for LowPassState {
    fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

impl FilterState for EnvelopeState {
    fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

impl<const N: usize> FilterState for MovingAverage<N> {
    fn reset(&mut self) {
        *self = Self::new();
    }
}
