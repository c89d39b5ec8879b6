//! Damped orbit controls around a target point.
//!
//! Drag rotates, wheel zooms, middle-drag pans. Pan and zoom can be
//! disabled independently (they are, while mouse-rotation of the model
//! is active). The whole controller is gated by the orbit-controls
//! toggle: the app only calls [`OrbitControls::update`] while it is on.

use glam::Vec3;

use crate::config::OrbitSettings;

use super::camera::Camera;

pub struct OrbitControls {
    settings: OrbitSettings,
    pub enable_pan: bool,
    pub enable_zoom: bool,

    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,

    yaw_velocity: f32,
    pitch_velocity: f32,
    pan_velocity: Vec3,
    zoom_velocity: f32,
}

impl OrbitControls {
    /// Controller matching an initial camera pose.
    pub fn new(settings: OrbitSettings, camera: &Camera) -> Self {
        let offset = camera.position() - camera.target();
        let distance = offset.length().max(settings.min_distance);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self {
            settings,
            enable_pan: true,
            enable_zoom: true,
            yaw,
            pitch,
            distance,
            target: camera.target(),
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            pan_velocity: Vec3::ZERO,
            zoom_velocity: 0.0,
        }
    }

    /// Feed a drag delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * self.settings.rotate_speed * 0.01;
        self.pitch_velocity += dy * self.settings.rotate_speed * 0.01;
    }

    /// Feed a pan delta in pixels. Ignored while pan is disabled.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &Camera) {
        if !self.enable_pan {
            return;
        }
        let forward = (camera.target() - camera.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.settings.pan_speed * self.distance;
        self.pan_velocity += (-right * dx + up * dy) * scale;
    }

    /// Feed a scroll step. Ignored while zoom is disabled.
    pub fn zoom(&mut self, steps: f32) {
        if !self.enable_zoom {
            return;
        }
        self.zoom_velocity -= steps * self.settings.zoom_speed * self.distance;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Integrate damped velocities and write the resulting pose to the
    /// camera. Called once per tick while the orbit toggle is enabled.
    pub fn update(&mut self, dt: f32, camera: &mut Camera) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
        self.target += self.pan_velocity;
        self.distance = (self.distance + self.zoom_velocity)
            .clamp(self.settings.min_distance, self.settings.max_distance);

        // Exponential damping, normalized to a 60 Hz frame.
        let retain = self.settings.damping.powf(dt * 60.0);
        self.yaw_velocity *= retain;
        self.pitch_velocity *= retain;
        self.pan_velocity *= retain;
        self.zoom_velocity *= retain;

        let offset = Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        camera.set_pose(self.target + offset, self.target);
    }
}
