//! Tick and fault counters.
//!
//! Incremented from the tick with `Relaxed` fetch-adds; read from any other
//! context through [`TickCounters::snapshot`].

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`TickCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Total number of ticks processed
    pub total_ticks: u64,
    /// Ticks whose active mode needed the activation ratio before calibration
    pub uncalibrated_ticks: u64,
    /// Ticks with a rejected filter update (non-positive period)
    pub invalid_timing_ticks: u64,
    /// Ticks with an unknown mode selector value
    pub unknown_mode_ticks: u64,
    /// Ticks whose control law produced a non-finite torque
    pub non_finite_torque_ticks: u64,
    /// Ticks with a non-finite sensor reading
    pub non_finite_sample_ticks: u64,
    /// Number of mode selector changes observed by the tick
    pub mode_switches: u64,
}

impl CounterSnapshot {
    /// Total number of faulted ticks, counting a tick once per fault kind.
    #[must_use]
    pub fn total_faults(&self) -> u64 {
        self.uncalibrated_ticks
            .saturating_add(self.invalid_timing_ticks)
            .saturating_add(self.unknown_mode_ticks)
            .saturating_add(self.non_finite_torque_ticks)
            .saturating_add(self.non_finite_sample_ticks)
    }
}

/// Atomic counters for the control loop.
///
/// ```rust
/// use myohaptic_atomic::TickCounters;
///
/// let counters = TickCounters::new();
/// counters.inc_tick();
/// counters.inc_uncalibrated();
///
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.total_ticks, 1);
/// assert_eq!(snapshot.total_faults(), 1);
/// ```
#[derive(Debug)]
pub struct TickCounters {
    total_ticks: AtomicU64,
    uncalibrated_ticks: AtomicU64,
    invalid_timing_ticks: AtomicU64,
    unknown_mode_ticks: AtomicU64,
    non_finite_torque_ticks: AtomicU64,
    non_finite_sample_ticks: AtomicU64,
    mode_switches: AtomicU64,
}

impl Default for TickCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounters {
    /// Create counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_ticks: AtomicU64::new(0),
            uncalibrated_ticks: AtomicU64::new(0),
            invalid_timing_ticks: AtomicU64::new(0),
            unknown_mode_ticks: AtomicU64::new(0),
            non_finite_torque_ticks: AtomicU64::new(0),
            non_finite_sample_ticks: AtomicU64::new(0),
            mode_switches: AtomicU64::new(0),
        }
    }

    /// Increment the tick counter.
    #[inline]
    pub fn inc_tick(&self) {
        self.total_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the uncalibrated counter.
    #[inline]
    pub fn inc_uncalibrated(&self) {
        self.uncalibrated_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the invalid timing counter.
    #[inline]
    pub fn inc_invalid_timing(&self) {
        self.invalid_timing_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the unknown mode counter.
    #[inline]
    pub fn inc_unknown_mode(&self) {
        self.unknown_mode_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the non-finite torque counter.
    #[inline]
    pub fn inc_non_finite_torque(&self) {
        self.non_finite_torque_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the non-finite sample counter.
    #[inline]
    pub fn inc_non_finite_sample(&self) {
        self.non_finite_sample_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the mode switch counter.
    #[inline]
    pub fn inc_mode_switch(&self) {
        self.mode_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Total ticks processed so far.
    #[inline]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counter values.
    ///
    /// Each counter is read individually, there is no atomic snapshot across
    /// all of them.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_ticks: self.total_ticks.load(Ordering::Relaxed),
            uncalibrated_ticks: self.uncalibrated_ticks.load(Ordering::Relaxed),
            invalid_timing_ticks: self.invalid_timing_ticks.load(Ordering::Relaxed),
            unknown_mode_ticks: self.unknown_mode_ticks.load(Ordering::Relaxed),
            non_finite_torque_ticks: self.non_finite_torque_ticks.load(Ordering::Relaxed),
            non_finite_sample_ticks: self.non_finite_sample_ticks.load(Ordering::Relaxed),
            mode_switches: self.mode_switches.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.total_ticks.store(0, Ordering::Relaxed);
        self.uncalibrated_ticks.store(0, Ordering::Relaxed);
        self.invalid_timing_ticks.store(0, Ordering::Relaxed);
        self.unknown_mode_ticks.store(0, Ordering::Relaxed);
        self.non_finite_torque_ticks.store(0, Ordering::Relaxed);
        self.non_finite_sample_ticks.store(0, Ordering::Relaxed);
        self.mode_switches.store(0, Ordering::Relaxed);
    }
}
