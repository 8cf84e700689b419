//! Prelude module for convenient error handling imports.
//!
//! ```
//! use myohaptic_errors::prelude::*;
//!
//! let fault = TickFault::Uncalibrated;
//! assert_eq!(fault.severity(), ErrorSeverity::Info);
//! ```

pub use crate::{
    Result, TickResult,
    common::{ErrorCategory, ErrorSeverity, HapticError},
    tick::{FaultSet, TickFault},
    validation::ValidationError,
};
