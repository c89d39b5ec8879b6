//! Per-frame elapsed time sampling.

use std::time::Instant;

/// Monotonic source of per-frame delta time.
///
/// The first [`sample`](FrameClock::sample) measures from construction;
/// each subsequent call measures from the previous sample. There is no
/// upper clamp: a stalled or backgrounded session yields one large delta
/// and the animation driver simply advances proportionally.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Elapsed seconds since the previous sample. Never negative.
    pub fn sample(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_non_negative() {
        let mut clock = FrameClock::new();
        for _ in 0..100 {
            assert!(clock.sample() >= 0.0);
        }
    }

    #[test]
    fn sample_resets_the_epoch() {
        let mut clock = FrameClock::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let first = clock.sample();
        let second = clock.sample();
        // The second sample measures from the first, not from construction.
        assert!(second < first);
    }
}
