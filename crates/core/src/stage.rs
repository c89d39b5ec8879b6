//! The stage: toggle registry, scene, animation driver, and pointer
//! state, advanced once per display refresh.
//!
//! The client owns the real loop (winit redraw requests) and calls
//! [`Stage::tick`] each frame with the sampled delta. Everything here is
//! deliberately free of windowing and GPU types so the whole state
//! machine is unit-testable.

use glam::Vec2;

use crate::animation::AnimationDriver;
use crate::picking::{resolve_click, Ray};
use crate::random::SeededRandom;
use crate::scene::{ObjectId, SceneGraph};
use crate::toggles::{self, ToggleChange, ToggleError, ToggleRegistry};

/// How the fixed self-rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// A constant increment per tick, regardless of frame duration. This
    /// is the observed behavior: perceived speed varies with frame rate.
    FixedPerFrame,
    /// Opt-in variant scaled by delta time for frame-rate independence.
    DeltaScaled,
}

/// Tunable constants for the stage. Defaults mirror the demo's values.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Radians added to model yaw per tick in `FixedPerFrame` mode.
    pub spin_increment: f32,
    /// Radians per second in `DeltaScaled` mode.
    pub spin_rate: f32,
    /// Radians of model rotation per pixel of pointer movement.
    pub mouse_rotate_speed: f32,
    pub rotation_mode: RotationMode,
    pub rng_seed: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            spin_increment: 0.01,
            spin_rate: 0.6,
            mouse_rotate_speed: 0.005,
            rotation_mode: RotationMode::FixedPerFrame,
            rng_seed: 0x5EED_1E55,
        }
    }
}

/// Frame loop lifecycle. There is no externally visible pause: per-frame
/// behaviors are gated by toggles, not by stopping the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Stopped,
}

#[derive(Debug, Default)]
struct PointerState {
    /// Raw pointer movement accumulated since the last tick. Consumed
    /// (applied or discarded) exactly once per tick.
    pending_delta: Vec2,
}

/// The interaction/animation core, advanced once per tick.
pub struct Stage {
    pub config: StageConfig,
    pub toggles: ToggleRegistry,
    pub scene: SceneGraph,
    driver: Option<AnimationDriver>,
    pointer: PointerState,
    rng: SeededRandom,
    state: LoopState,
}

impl Stage {
    pub fn new(config: StageConfig) -> Self {
        let rng = SeededRandom::new(config.rng_seed);
        Self {
            config,
            toggles: ToggleRegistry::with_defaults(),
            scene: SceneGraph::new(),
            driver: None,
            pointer: PointerState::default(),
            rng,
            state: LoopState::Uninitialized,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Transition to `Running` once scene setup is done.
    pub fn start(&mut self) {
        if self.state == LoopState::Uninitialized {
            self.state = LoopState::Running;
            tracing::info!("stage running");
        }
    }

    /// Clean shutdown: ticks and clicks become no-ops.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
            tracing::info!("stage stopped");
        }
    }

    /// Attach the loaded model's animation clips once the asset load
    /// resolves. Toggle flips that happened before this are honored
    /// retroactively: the registry is read on the next tick, not
    /// replayed.
    pub fn attach_model(&mut self, clips: Vec<(String, f32)>) {
        tracing::info!(clips = clips.len(), "model attached");
        self.driver = Some(AnimationDriver::new(clips));
    }

    pub fn driver(&self) -> Option<&AnimationDriver> {
        self.driver.as_ref()
    }

    /// Record raw pointer movement. Side-effect free beyond the pending
    /// delta; whether it rotates anything is decided at tick time.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        self.pointer.pending_delta += Vec2::new(dx, dy);
    }

    /// Resolve a click ray against the scene. No-op unless running.
    pub fn click(&mut self, ray: &Ray) -> Option<ObjectId> {
        if self.state != LoopState::Running {
            return None;
        }
        resolve_click(&mut self.scene, ray, &mut self.rng)
    }

    /// Flip a toggle by name, logging the change.
    pub fn flip(&mut self, name: &str) -> Result<ToggleChange, ToggleError> {
        let change = self.toggles.flip(name)?;
        tracing::debug!(name = %change.name, enabled = change.enabled, "toggle flipped");
        Ok(change)
    }

    /// Advance one frame: apply toggle-gated rotations, consume the
    /// pointer delta, and advance the animation driver.
    pub fn tick(&mut self, dt: f32) {
        if self.state != LoopState::Running {
            return;
        }

        if let Some(root) = self.scene.model_root() {
            let spin = self.toggles.is_enabled(toggles::ROTATION);
            let mouse = self.toggles.is_enabled(toggles::MOUSE_ROTATION);
            let config = &self.config;
            // Root always exists once model_root() is Some.
            if let Some(object) = self.scene.get_mut(root) {
                if spin {
                    let increment = match config.rotation_mode {
                        RotationMode::FixedPerFrame => config.spin_increment,
                        RotationMode::DeltaScaled => config.spin_rate * dt,
                    };
                    object.transform.rotation.y += increment;
                }
                if mouse {
                    let delta = self.pointer.pending_delta;
                    object.transform.rotation.y += delta.x * config.mouse_rotate_speed;
                    object.transform.rotation.x += delta.y * config.mouse_rotate_speed;
                }
            }
        }
        // Consumed once per tick whether or not it was applied.
        self.pointer.pending_delta = Vec2::ZERO;

        if let Some(driver) = &mut self.driver {
            driver.set_enabled(self.toggles.is_enabled(toggles::BUTTON_ANIMATION));
            driver.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, Transform};
    use glam::Vec3;

    fn running_stage_with_model() -> Stage {
        let mut stage = Stage::new(StageConfig::default());
        stage.scene.insert_model_root(
            Transform::at(Vec3::new(-5.0, 0.0, 0.0)),
            Material::colored(Vec3::ONE),
            2.0,
        );
        stage.attach_model(vec![("press".to_string(), 2.0)]);
        stage.start();
        stage
    }

    fn model_rotation(stage: &Stage) -> Vec3 {
        let root = stage.scene.model_root().unwrap();
        stage.scene.get(root).unwrap().transform.rotation
    }

    #[test]
    fn tick_before_start_is_a_no_op() {
        let mut stage = Stage::new(StageConfig::default());
        stage.scene.insert_model_root(
            Transform::default(),
            Material::colored(Vec3::ONE),
            2.0,
        );
        stage.flip(toggles::ROTATION).unwrap();
        stage.tick(0.016);
        assert_eq!(model_rotation(&stage).y, 0.0);
    }

    #[test]
    fn stop_halts_further_ticks() {
        let mut stage = running_stage_with_model();
        stage.flip(toggles::ROTATION).unwrap();
        stage.tick(0.016);
        stage.stop();
        stage.tick(0.016);
        assert!((model_rotation(&stage).y - 0.01).abs() < 1e-6);
        assert_eq!(stage.state(), LoopState::Stopped);
    }

    #[test]
    fn delta_scaled_mode_is_opt_in() {
        let mut stage = running_stage_with_model();
        stage.config.rotation_mode = RotationMode::DeltaScaled;
        stage.flip(toggles::ROTATION).unwrap();
        stage.tick(0.5);
        assert!((model_rotation(&stage).y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn animation_follows_the_toggle_retroactively() {
        let mut stage = Stage::new(StageConfig::default());
        stage.start();
        // Flip before the model resolves: honored once it does.
        stage.flip(toggles::BUTTON_ANIMATION).unwrap();
        stage.tick(0.1);
        assert!(stage.driver().is_none());

        stage.scene.insert_model_root(
            Transform::default(),
            Material::colored(Vec3::ONE),
            2.0,
        );
        stage.attach_model(vec![("press".to_string(), 2.0)]);
        stage.tick(0.1);
        let binding = &stage.driver().unwrap().bindings()[0];
        assert!(binding.is_playing());
        assert!((binding.time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn disabling_animation_mid_flight_stops_clips() {
        let mut stage = running_stage_with_model();
        stage.flip(toggles::BUTTON_ANIMATION).unwrap();
        stage.tick(0.5);
        stage.flip(toggles::BUTTON_ANIMATION).unwrap();
        stage.tick(0.5);
        let binding = &stage.driver().unwrap().bindings()[0];
        assert!(!binding.is_playing());
        assert_eq!(binding.time(), 0.0);
    }

    #[test]
    fn click_before_running_is_a_no_op() {
        let mut stage = Stage::new(StageConfig::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(stage.click(&ray), None);
    }
}
