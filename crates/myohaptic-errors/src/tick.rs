//! Fault codes reported by the control loop.
//!
//! A tick never aborts. When one of these faults is detected the commanded
//! torque is forced to zero (or the offending stage reuses its previous output)
//! and the fault is attached to the tick report.

use core::fmt;

use crate::common::ErrorSeverity;

/// Tick fault codes.
///
/// `Copy` and `#[repr(u8)]` so they can be stored in atomics and reported from
/// the tick without allocation.
///
/// # Examples
///
/// ```
/// use myohaptic_errors::{ErrorSeverity, TickFault};
///
/// let fault = TickFault::InvalidTiming;
/// assert_eq!(fault.code(), 2);
/// assert_eq!(fault.severity(), ErrorSeverity::Warning);
/// assert!(!fault.forces_zero_torque());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TickFault {
    /// Calibration span is empty or inverted, activation ratio undefined
    Uncalibrated = 1,
    /// Non-positive or non-finite tick period
    InvalidTiming = 2,
    /// Mode selector outside the known range
    UnknownMode = 3,
    /// Control law produced NaN or infinity
    NonFiniteTorque = 4,
    /// Sensor returned NaN or infinity; the last finite reading was held
    NonFiniteSample = 5,
}

impl TickFault {
    /// Get the numeric fault code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Create a fault from a code, `None` if the code is unknown.
    ///
    /// ```
    /// use myohaptic_errors::TickFault;
    ///
    /// assert_eq!(TickFault::from_code(1), Some(TickFault::Uncalibrated));
    /// assert_eq!(TickFault::from_code(0), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TickFault::Uncalibrated),
            2 => Some(TickFault::InvalidTiming),
            3 => Some(TickFault::UnknownMode),
            4 => Some(TickFault::NonFiniteTorque),
            5 => Some(TickFault::NonFiniteSample),
            _ => None,
        }
    }

    /// Get the fault severity.
    ///
    /// Being uncalibrated is the normal state during start-up.
    pub fn severity(self) -> ErrorSeverity {
        match self {
            TickFault::Uncalibrated => ErrorSeverity::Info,
            TickFault::InvalidTiming => ErrorSeverity::Warning,
            TickFault::UnknownMode => ErrorSeverity::Warning,
            TickFault::NonFiniteTorque => ErrorSeverity::Error,
            TickFault::NonFiniteSample => ErrorSeverity::Warning,
        }
    }

    /// Whether the fault zeroes the torque command of the tick it occurs in.
    ///
    /// Invalid timing only rejects the filter update; the control law still
    /// runs on the previous filter outputs.
    pub fn forces_zero_torque(self) -> bool {
        matches!(
            self,
            TickFault::Uncalibrated
                | TickFault::UnknownMode
                | TickFault::NonFiniteTorque
                | TickFault::NonFiniteSample
        )
    }

    fn bit(self) -> u8 {
        1 << (self.code() - 1)
    }
}

impl fmt::Display for TickFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickFault::Uncalibrated => write!(f, "Activation ratio not calibrated"),
            TickFault::InvalidTiming => write!(f, "Invalid tick period"),
            TickFault::UnknownMode => write!(f, "Unknown mode selector value"),
            TickFault::NonFiniteTorque => write!(f, "Non-finite torque command"),
            TickFault::NonFiniteSample => write!(f, "Non-finite sensor sample"),
        }
    }
}

impl std::error::Error for TickFault {}

/// Set of faults raised during one tick.
///
/// # Examples
///
/// ```
/// use myohaptic_errors::tick::{FaultSet, TickFault};
///
/// let mut faults = FaultSet::empty();
/// faults.insert(TickFault::InvalidTiming);
/// faults.insert(TickFault::Uncalibrated);
/// assert!(faults.contains(TickFault::Uncalibrated));
/// assert_eq!(faults.iter().count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FaultSet(u8);

impl FaultSet {
    const ALL: [TickFault; 5] = [
        TickFault::Uncalibrated,
        TickFault::InvalidTiming,
        TickFault::UnknownMode,
        TickFault::NonFiniteTorque,
        TickFault::NonFiniteSample,
    ];

    /// An empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a fault to the set.
    pub fn insert(&mut self, fault: TickFault) {
        self.0 |= fault.bit();
    }

    /// Whether the set holds `fault`.
    pub fn contains(self, fault: TickFault) -> bool {
        self.0 & fault.bit() != 0
    }

    /// Whether no fault was raised.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit representation, one bit per fault code.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Most severe fault in the set.
    pub fn worst(self) -> Option<TickFault> {
        self.iter().max_by_key(|fault| fault.severity())
    }

    /// Iterate the faults in code order.
    pub fn iter(self) -> impl Iterator<Item = TickFault> {
        Self::ALL.into_iter().filter(move |fault| self.contains(*fault))
    }
}

impl From<TickFault> for FaultSet {
    fn from(fault: TickFault) -> Self {
        let mut set = Self::empty();
        set.insert(fault);
        set
    }
}
