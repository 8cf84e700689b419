//! Prelude for the filters crate.
//!
//! ```
//! use myohaptic_filters::prelude::*;
//!
//! let mut state = LowPassState::new(400.0);
//! let out = low_pass_filter(&mut state, 0.001, 1.0);
//! assert!(out.is_some());
//! ```

pub use crate::conditioning::{ConditionedSample, ConditioningConfig, EmgConditioner};
pub use crate::envelope::{EnvelopeState, envelope_filter, update_envelope};
pub use crate::high_pass::{HighPassState, high_pass, high_pass_alpha, high_pass_filter};
pub use crate::low_pass::{LowPassState, low_pass, low_pass_alpha, low_pass_filter};
pub use crate::moving_average::{MovingAverage, PositionSmoother};
pub use crate::state::FilterState;
pub use crate::{time_constant, valid_dt};
