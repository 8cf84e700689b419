//! Atomic `f32` cell.

use core::sync::atomic::{AtomicU32, Ordering};

/// An `f32` stored as its bit pattern in an `AtomicU32`.
///
/// Loads and stores are `Relaxed`: published signals are independent samples
/// and nothing synchronizes through them.
///
/// ```rust
/// use myohaptic_atomic::AtomicF32;
///
/// let cell = AtomicF32::new(0.5);
/// cell.store(-1.25);
/// assert!((cell.load() + 1.25).abs() < f32::EPSILON);
/// ```
#[derive(Debug)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// Create a cell holding `value`.
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Read the current value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Replace the current value.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        assert_eq!(AtomicF32::default().load().to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_preserves_special_values() {
        let cell = AtomicF32::new(0.0);

        cell.store(f32::NEG_INFINITY);
        assert!(cell.load().is_infinite());

        cell.store(f32::NAN);
        assert!(cell.load().is_nan());

        cell.store(-0.0);
        assert!(cell.load().is_sign_negative());
    }
}
