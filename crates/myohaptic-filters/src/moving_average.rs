//! Moving Average
//!
//! Fixed-window arithmetic mean over the last `N` samples, used to smooth the
//! paddle angle before it reaches the position controllers.
//!
//! The window starts zero-filled: until `N` samples have been pushed the mean
//! is biased towards zero. [`MovingAverage::is_primed`] reports when that
//! warm-up is over.

/// Window length of the paddle position smoother.
pub const POSITION_WINDOW: usize = 5;

/// Moving average smoother for the paddle angle.
pub type PositionSmoother = MovingAverage<POSITION_WINDOW>;

/// Ring buffer of the `N` most recent samples.
///
/// # RT Safety
///
/// - Fixed-size inline storage, no heap allocations
/// - O(N) over a compile-time window
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovingAverage<const N: usize> {
    samples: [f32; N],
    /// Slot that receives the next sample (the oldest one)
    next: usize,
    pushed: usize,
}

impl<const N: usize> MovingAverage<N> {
    /// Create a zero-filled window.
    pub fn new() -> Self {
        Self {
            samples: [0.0; N],
            next: 0,
            pushed: 0,
        }
    }

    /// Evict the oldest sample, insert `sample`, and return the mean of the
    /// whole window including the new sample.
    ///
    /// ```
    /// use myohaptic_filters::PositionSmoother;
    ///
    /// let mut smoother = PositionSmoother::new();
    /// for angle in [1.0, 2.0, 3.0, 4.0] {
    ///     smoother.push_and_average(angle);
    /// }
    /// assert!((smoother.mean() - 2.0).abs() < 1e-6);
    /// assert!((smoother.push_and_average(5.0) - 3.0).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn push_and_average(&mut self, sample: f32) -> f32 {
        if let Some(slot) = self.samples.get_mut(self.next) {
            *slot = sample;
        }
        self.next = (self.next + 1) % N.max(1);
        self.pushed = self.pushed.saturating_add(1);
        self.mean()
    }

    /// Mean of the current window.
    #[inline]
    pub fn mean(&self) -> f32 {
        if N == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss, reason = "window is a small constant")]
        let len = N as f32;
        self.samples.iter().sum::<f32>() / len
    }

    /// Whether `N` samples have been pushed since creation.
    #[inline]
    pub fn is_primed(&self) -> bool {
        self.pushed >= N
    }

    /// Most recent sample, `None` before the first push.
    pub fn latest(&self) -> Option<f32> {
        if self.pushed == 0 || N == 0 {
            return None;
        }
        let index = self.next.checked_sub(1).unwrap_or(N - 1);
        self.samples.get(index).copied()
    }

    /// Samples ordered oldest first.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.samples.split_at(self.next.min(N));
        older.iter().chain(newer.iter()).copied()
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}
