//! Externally writable control inputs.
//!
//! The mode selector and the tick period may be changed from a monitoring or
//! configuration context while the loop is running. Both live in a single
//! `AtomicU64` so the tick reads them as one consistent pair: a write that lands
//! mid-tick is only seen by the next tick.

use core::sync::atomic::{AtomicU64, Ordering};

/// Default control loop period in microseconds (1 kHz).
pub const DEFAULT_PERIOD_US: u32 = 1_000;

const PERIOD_MASK: u64 = 0xFFFF_FFFF;

/// Values read once at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Raw mode selector value
    pub mode: u32,
    /// Tick period in microseconds
    pub period_us: u32,
}

impl InputSnapshot {
    /// Tick period in seconds.
    #[must_use]
    #[inline]
    pub fn dt_seconds(self) -> f32 {
        #[allow(clippy::cast_precision_loss, reason = "periods are far below 2^24 us")]
        let period = self.period_us as f32;
        period / 1_000_000.0
    }
}

/// Mode selector and period shared between the tick and external writers.
///
/// ```rust
/// use myohaptic_atomic::ControlInputs;
///
/// let inputs = ControlInputs::default();
/// inputs.set_period_us(500);
/// inputs.set_mode(3);
///
/// let snapshot = inputs.snapshot();
/// assert_eq!((snapshot.mode, snapshot.period_us), (3, 500));
/// assert!((snapshot.dt_seconds() - 0.0005).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct ControlInputs {
    packed: AtomicU64,
}

impl ControlInputs {
    /// Create inputs with the given period and mode selector.
    #[must_use]
    pub const fn new(period_us: u32, mode: u32) -> Self {
        Self {
            packed: AtomicU64::new(pack(mode, period_us)),
        }
    }

    /// Read mode and period as one consistent pair.
    #[inline]
    pub fn snapshot(&self) -> InputSnapshot {
        unpack(self.packed.load(Ordering::Acquire))
    }

    /// Current mode selector value.
    #[inline]
    pub fn mode(&self) -> u32 {
        self.snapshot().mode
    }

    /// Current tick period in microseconds.
    #[inline]
    pub fn period_us(&self) -> u32 {
        self.snapshot().period_us
    }

    /// Write the mode selector. Returns the previous value.
    pub fn set_mode(&self, mode: u32) -> u32 {
        let previous = self.update(|snapshot| InputSnapshot { mode, ..snapshot });
        previous.mode
    }

    /// Write the tick period. Returns the previous value.
    pub fn set_period_us(&self, period_us: u32) -> u32 {
        let previous = self.update(|snapshot| InputSnapshot {
            period_us,
            ..snapshot
        });
        previous.period_us
    }

    fn update(&self, f: impl Fn(InputSnapshot) -> InputSnapshot) -> InputSnapshot {
        let mut current = self.packed.load(Ordering::Acquire);
        loop {
            let next = f(unpack(current));
            match self.packed.compare_exchange_weak(
                current,
                pack(next.mode, next.period_us),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(previous) => return unpack(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_US, 0)
    }
}

const fn pack(mode: u32, period_us: u32) -> u64 {
    ((mode as u64) << 32) | period_us as u64
}

#[allow(clippy::cast_possible_truncation, reason = "both halves are masked to 32 bits")]
const fn unpack(packed: u64) -> InputSnapshot {
    InputSnapshot {
        mode: (packed >> 32) as u32,
        period_us: (packed & PERIOD_MASK) as u32,
    }
}
