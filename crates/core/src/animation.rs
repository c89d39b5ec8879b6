//! Animation clip bindings for the loaded model.
//!
//! All clips on the model share one play/stop state, driven by the
//! button-animation toggle. Disabling is a stop, not a pause: every
//! binding resets to time 0, so re-enabling restarts from clip start.

/// Association between one animation clip and its play state.
#[derive(Debug, Clone)]
pub struct ClipBinding {
    pub name: String,
    /// Clip length in seconds. Playback wraps (loops) at this point.
    pub duration: f32,
    time: f32,
    playing: bool,
}

impl ClipBinding {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            time: 0.0,
            playing: false,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Advances the loaded model's clips by elapsed delta time.
///
/// Only exists once the model load has resolved; before that the
/// button-animation toggle has no effect (the stage simply has no driver
/// to sync).
#[derive(Debug, Default)]
pub struct AnimationDriver {
    bindings: Vec<ClipBinding>,
    enabled: bool,
}

impl AnimationDriver {
    /// Build a driver from (clip name, duration) pairs.
    pub fn new(clips: impl IntoIterator<Item = (String, f32)>) -> Self {
        Self {
            bindings: clips
                .into_iter()
                .map(|(name, duration)| ClipBinding::new(name, duration))
                .collect(),
            enabled: false,
        }
    }

    /// Sync the shared play state from the toggle. Enabling plays every
    /// clip from its start; disabling stops (not pauses) every clip.
    /// Idempotent: repeated calls with the same value change nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        for binding in &mut self.bindings {
            binding.playing = enabled;
            binding.time = 0.0;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance playing clips by `dt` seconds, wrapping at each clip's
    /// duration. Tolerates arbitrarily large deltas (a backgrounded
    /// session skips ahead). `dt == 0` is the identity.
    pub fn advance(&mut self, dt: f32) {
        if !self.enabled || dt <= 0.0 {
            return;
        }
        for binding in &mut self.bindings {
            if binding.playing && binding.duration > 0.0 {
                binding.time = (binding.time + dt) % binding.duration;
            }
        }
    }

    pub fn bindings(&self) -> &[ClipBinding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> AnimationDriver {
        AnimationDriver::new(vec![
            ("press".to_string(), 2.0),
            ("hover".to_string(), 0.5),
        ])
    }

    #[test]
    fn clips_start_stopped() {
        let driver = driver();
        assert!(driver.bindings().iter().all(|b| !b.is_playing()));
        assert!(driver.bindings().iter().all(|b| b.time() == 0.0));
    }

    #[test]
    fn advance_is_gated_by_enable() {
        let mut driver = driver();
        driver.advance(1.0);
        assert!(driver.bindings().iter().all(|b| b.time() == 0.0));

        driver.set_enabled(true);
        driver.advance(0.25);
        assert!((driver.bindings()[0].time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn disable_stops_every_clip_idempotently() {
        let mut driver = driver();
        driver.set_enabled(true);
        driver.advance(0.3);

        driver.set_enabled(false);
        assert!(driver.bindings().iter().all(|b| !b.is_playing()));
        assert!(driver.bindings().iter().all(|b| b.time() == 0.0));

        // Disabling again changes nothing.
        driver.set_enabled(false);
        assert!(driver.bindings().iter().all(|b| !b.is_playing()));
    }

    #[test]
    fn reenable_restarts_from_clip_start() {
        let mut driver = driver();
        driver.set_enabled(true);
        driver.advance(1.5);
        driver.set_enabled(false);
        driver.set_enabled(true);
        assert!(driver.bindings().iter().all(|b| b.time() == 0.0));
    }

    #[test]
    fn zero_delta_is_identity() {
        let mut driver = driver();
        driver.set_enabled(true);
        driver.advance(0.7);
        let before: Vec<f32> = driver.bindings().iter().map(|b| b.time()).collect();
        driver.advance(0.0);
        let after: Vec<f32> = driver.bindings().iter().map(|b| b.time()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn playback_wraps_at_duration() {
        let mut driver = driver();
        driver.set_enabled(true);
        driver.advance(2.3);
        // 2.3 % 2.0 and 2.3 % 0.5
        assert!((driver.bindings()[0].time() - 0.3).abs() < 1e-5);
        assert!((driver.bindings()[1].time() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn large_delta_is_tolerated() {
        let mut driver = driver();
        driver.set_enabled(true);
        driver.advance(1.0e6);
        for binding in driver.bindings() {
            assert!(binding.time() >= 0.0 && binding.time() < binding.duration);
        }
    }
}
