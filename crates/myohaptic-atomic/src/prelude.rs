//! Prelude for myohaptic-atomic.

pub use crate::cell::AtomicF32;
pub use crate::counters::{CounterSnapshot, TickCounters};
pub use crate::inputs::{ControlInputs, DEFAULT_PERIOD_US, InputSnapshot};
