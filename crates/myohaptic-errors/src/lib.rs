//! Centralized error types for myohaptic
//!
//! The control loop itself never fails: every problem detected during a tick is
//! reported as a [`TickFault`] and resolved by forcing the torque to zero.
//! Everything outside the tick (configuration loading, telemetry writes) returns
//! a [`HapticError`].
//!
//! # Architecture
//!
//! - [`common`]: top-level error, categories and severities
//! - [`tick`]: `Copy` fault codes reported by the control loop
//! - [`validation`]: configuration and telemetry write validation errors
//!
//! # Example
//!
//! ```
//! use myohaptic_errors::prelude::*;
//!
//! fn check_period(period_us: u32) -> Result<u32> {
//!     if period_us == 0 {
//!         return Err(ValidationError::out_of_range("period_us", period_us, 1, u32::MAX).into());
//!     }
//!     Ok(period_us)
//! }
//!
//! assert!(check_period(0).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod prelude;
pub mod tick;
pub mod validation;

pub use common::{ErrorCategory, ErrorSeverity, HapticError};
pub use tick::{FaultSet, TickFault};
pub use validation::ValidationError;

/// A specialized `Result` type for myohaptic operations.
pub type Result<T> = std::result::Result<T, HapticError>;

/// A specialized `Result` type for the tick path.
pub type TickResult<T = ()> = std::result::Result<T, TickFault>;
