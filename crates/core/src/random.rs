//! Seeded random number generator for pick-recolor sampling.
//!
//! Uses the xorshift32 algorithm: tiny, fast, and reproducible, which
//! keeps the click-recolor tests deterministic.

/// Seeded RNG using xorshift32.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Creates a new RNG with the given seed.
    /// Seed of 0 is treated as 1 to avoid the degenerate sequence.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Returns a random float in [0, 1).
    pub fn next(&mut self) -> f32 {
        // Top 24 bits only: they fit the f32 mantissa exactly, so the
        // result can never round up to 1.0.
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Returns the raw u32 value from the RNG.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns three channel samples in [0, 1), in r/g/b order.
    pub fn next_rgb(&mut self) -> [f32; 3] {
        [self.next(), self.next(), self.next()]
    }

    /// Current internal state, for debugging.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_sequence() {
        let mut rng1 = SeededRandom::new(12345);
        let mut rng2 = SeededRandom::new(12345);
        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn next_is_half_open_unit_range() {
        let mut rng = SeededRandom::new(42);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn rgb_consumes_three_samples() {
        let mut rng = SeededRandom::new(7);
        let mut reference = SeededRandom::new(7);
        let rgb = rng.next_rgb();
        assert_eq!(rgb[0], reference.next());
        assert_eq!(rgb[1], reference.next());
        assert_eq!(rgb[2], reference.next());
    }

    #[test]
    fn max_raw_output_stays_below_one() {
        // This seed's next raw output is u32::MAX, the worst case for
        // the float conversion.
        let mut rng = SeededRandom::new(1_584_200_935);
        assert_eq!(rng.clone().next_u32(), u32::MAX);
        let v = rng.next();
        assert!(v < 1.0, "next() produced {v}");
    }

    #[test]
    fn zero_seed_handled() {
        let rng = SeededRandom::new(0);
        assert_eq!(rng.state(), 1);
    }
}
