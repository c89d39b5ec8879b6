//! Named boolean toggles with an explicit coupled-side-effect table.
//!
//! Five toggles gate per-frame behavior. Each is registered exactly once
//! at startup and flipped only by an explicit external command (panel
//! button or keybinding). Two toggles carry a *coupled* side effect on
//! another subsystem; rather than scattering ad-hoc conditionals, the
//! coupling lives in one table ([`coupled_effect`]) and the flip result
//! tells the caller what to apply.

use thiserror::Error;

/// Fixed rotation increment applied to the model root each tick.
pub const ROTATION: &str = "rotation";
/// Pointer movement deltas rotate the model root directly.
pub const MOUSE_ROTATION: &str = "mouse-rotation";
/// The loaded model's animation clips play (enabled) or are stopped.
pub const BUTTON_ANIMATION: &str = "button-animation";
/// The shared clip plane is installed on the renderer's global list.
pub const CUT_PLANE: &str = "cut-plane";
/// The damped orbit camera controls update each tick.
pub const ORBIT_CONTROLS: &str = "orbit-controls";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToggleError {
    #[error("unknown toggle name: {0}")]
    UnknownToggle(String),
}

/// Side effect coupled to a toggle flip, applied by the client.
///
/// Mouse rotation disables orbit pan/zoom while active; the cut toggle
/// switches renderer-global clipping on and off. Whether the cut was
/// *meant* to be global rather than per-object in the original design is
/// an open question; the global scope is preserved here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoupledEffect {
    /// Enable or disable pan and zoom on the orbit controls.
    PanZoom(bool),
    /// Enable or disable the renderer's global clipping plane.
    GlobalClipping(bool),
}

/// Result of a successful flip: the new state plus any coupled effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleChange {
    pub name: String,
    pub enabled: bool,
    pub effect: Option<CoupledEffect>,
}

/// The coupled-side-effect table, keyed by toggle name.
pub fn coupled_effect(name: &str, enabled: bool) -> Option<CoupledEffect> {
    match name {
        MOUSE_ROTATION => Some(CoupledEffect::PanZoom(!enabled)),
        CUT_PLANE => Some(CoupledEffect::GlobalClipping(enabled)),
        _ => None,
    }
}

#[derive(Debug)]
struct Toggle {
    name: String,
    enabled: bool,
}

/// Registry of named toggles.
///
/// Stored as a `Vec` so iteration follows registration order, which is
/// also the order the debug panel lists its buttons in.
#[derive(Debug, Default)]
pub struct ToggleRegistry {
    toggles: Vec<Toggle>,
}

impl ToggleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the demo's five toggles. All start disabled except
    /// orbit controls.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ROTATION, false);
        registry.register(MOUSE_ROTATION, false);
        registry.register(BUTTON_ANIMATION, false);
        registry.register(CUT_PLANE, false);
        registry.register(ORBIT_CONTROLS, true);
        registry
    }

    /// Register a toggle. Re-registering an existing name resets its
    /// state; the demo never does this after startup.
    pub fn register(&mut self, name: &str, enabled: bool) {
        if let Some(toggle) = self.toggles.iter_mut().find(|t| t.name == name) {
            toggle.enabled = enabled;
        } else {
            self.toggles.push(Toggle {
                name: name.to_string(),
                enabled,
            });
        }
    }

    /// Flip a toggle, returning its new state and any coupled effect.
    pub fn flip(&mut self, name: &str) -> Result<ToggleChange, ToggleError> {
        let toggle = self
            .toggles
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| ToggleError::UnknownToggle(name.to_string()))?;
        toggle.enabled = !toggle.enabled;
        Ok(ToggleChange {
            name: toggle.name.clone(),
            enabled: toggle.enabled,
            effect: coupled_effect(name, toggle.enabled),
        })
    }

    /// Current state of a toggle; unknown names read as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.toggles
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.enabled)
            .unwrap_or(false)
    }

    /// Toggle names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.toggles.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.toggles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toggles.is_empty()
    }
}
