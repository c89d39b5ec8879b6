//! Vitrine Core - scene state and the frame/interaction state machine.
//!
//! This crate holds everything about the demo that can be reasoned about
//! without a GPU: the per-frame clock, the named toggle registry, the
//! scene graph, the animation clip driver, ray picking, and the `Stage`
//! that ties them together once per tick.
//!
//! The companion `vitrine-client` crate owns the window, the wgpu
//! renderer, and the debug panel; it drives [`Stage::tick`] from the
//! display-refresh loop and forwards pointer/click/resize events here.
//!
//! Everything in this crate is single-threaded by design: events and
//! ticks are delivered serialized on one thread, so there are no locks
//! and no interior mutability.

pub mod animation;
pub mod clock;
pub mod picking;
pub mod random;
pub mod scene;
pub mod stage;
pub mod toggles;

pub use animation::{AnimationDriver, ClipBinding};
pub use clock::FrameClock;
pub use picking::{ndc_from_client, pick_nearest, Hit, Ray};
pub use random::SeededRandom;
pub use scene::{
    ClipPlane, GeometryKind, Material, ObjectId, PrimitiveShape, SceneGraph, SceneObject,
    Transform,
};
pub use stage::{LoopState, RotationMode, Stage, StageConfig};
pub use toggles::{CoupledEffect, ToggleChange, ToggleError, ToggleRegistry};
