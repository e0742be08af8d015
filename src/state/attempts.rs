/// Consecutive misses against the current target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptTracker {
    attempts: u32,
}

impl AttemptTracker {
    /// Fresh tracker with no misses recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Misses recorded since the target last changed.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Forget every miss; called whenever the target changes.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Count one more miss and return the value held before the increment.
    pub fn record_miss(&mut self) -> u32 {
        let previous = self.attempts;
        self.attempts = self.attempts.saturating_add(1);
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_miss_returns_previous_count() {
        let mut tracker = AttemptTracker::new();
        assert_eq!(tracker.record_miss(), 0);
        assert_eq!(tracker.record_miss(), 1);
        assert_eq!(tracker.attempts(), 2);
    }

    #[test]
    fn reset_clears_misses() {
        let mut tracker = AttemptTracker::new();
        tracker.record_miss();
        tracker.record_miss();
        tracker.reset();
        assert_eq!(tracker.attempts(), 0);
    }
}
