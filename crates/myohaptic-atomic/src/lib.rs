//! # myohaptic-atomic
//!
//! Lock-free primitives shared between the control loop and the contexts that
//! observe or tune it.
//!
//! - [`inputs`] - externally writable mode selector and tick period, read as one
//!   consistent snapshot at the start of every tick
//! - [`counters`] - tick and fault counters
//! - [`cell`] - `f32` cells backed by `AtomicU32` for published signals
//!
//! Everything here is allocation-free and uses single atomic instructions, so
//! it can be touched from the tick.
//!
//! ```rust
//! use myohaptic_atomic::{ControlInputs, TickCounters};
//!
//! let inputs = ControlInputs::new(1_000, 0);
//! inputs.set_mode(2);
//!
//! let snapshot = inputs.snapshot();
//! assert_eq!(snapshot.mode, 2);
//! assert_eq!(snapshot.period_us, 1_000);
//!
//! let counters = TickCounters::new();
//! counters.inc_tick();
//! assert_eq!(counters.snapshot().total_ticks, 1);
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cell;
pub mod counters;
pub mod inputs;
pub mod prelude;

pub use cell::AtomicF32;
pub use counters::{CounterSnapshot, TickCounters};
pub use inputs::{ControlInputs, DEFAULT_PERIOD_US, InputSnapshot};
