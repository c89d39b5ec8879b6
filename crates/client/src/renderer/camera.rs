//! Perspective camera with NDC ray unprojection for picking.

use glam::{Mat4, Vec3};
use vitrine_core::Ray;

/// Perspective camera. The orbit controls move `position` around
/// `target`; resize events update `aspect`.
pub struct Camera {
    position: Vec3,
    target: Vec3,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,

    // Cached matrices
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Camera at the demo's startup pose: z = 5, looking at the origin.
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov: 75.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_pose(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.update_matrices();
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_matrices();
    }

    fn update_matrices(&mut self) {
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        self.projection_matrix =
            Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    /// World-space pick ray through an NDC point.
    pub fn pick_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        Ray::from_ndc(self.view_projection_matrix().inverse(), ndc_x, ndc_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_pose_matches_the_demo() {
        let camera = Camera::new(16.0 / 9.0);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target(), Vec3::ZERO);
    }

    #[test]
    fn center_pick_ray_points_at_the_target() {
        let camera = Camera::new(16.0 / 9.0);
        let ray = camera.pick_ray(0.0, 0.0).unwrap();
        assert!(ray.dir.z < -0.99);
        assert!(ray.dir.x.abs() < 1e-4);
        assert!(ray.dir.y.abs() < 1e-4);
    }

    #[test]
    fn off_center_rays_diverge_with_aspect() {
        let camera = Camera::new(2.0);
        let right = camera.pick_ray(1.0, 0.0).unwrap();
        let left = camera.pick_ray(-1.0, 0.0).unwrap();
        assert!(right.dir.x > 0.0);
        assert!(left.dir.x < 0.0);
    }

    #[test]
    fn resize_updates_the_projection() {
        let mut camera = Camera::new(1.0);
        let before = camera.projection_matrix();
        camera.set_aspect(2.0);
        assert_ne!(before, camera.projection_matrix());
    }

    #[test]
    fn pick_ray_originates_near_the_camera() {
        let camera = Camera::new(16.0 / 9.0);
        let ray = camera.pick_ray(0.3, -0.2).unwrap();
        assert!((ray.origin - camera.position()).length() < 0.5);
    }
}
