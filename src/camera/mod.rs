//! Orthographic cameras for directional renders.
//!
//! View space is left-handed and Y-up: the camera looks down +Z and +X is
//! screen right, matching the authoring convention the billboard UV layout
//! is designed for.

pub mod frustum;

pub use frustum::{fit_camera, fit_direction, FAR_CLIP_FACTOR, NEAR_CLIP};

use glam::{Mat4, Vec3};

/// A fully specified orthographic camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    /// World-space eye position.
    pub position: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    /// World up used to orient the view.
    pub up: Vec3,
    /// Half of the visible height in world units.
    pub ortho_size: f32,
    /// Width / height of the target.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoCamera {
    /// Half of the visible width in world units.
    pub fn half_width(&self) -> f32 {
        self.ortho_size * self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.position, self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let hw = self.half_width();
        let hh = self.ortho_size;
        Mat4::orthographic_lh(-hw, hw, -hh, hh, self.near, self.far)
    }

    /// Transform a world-space point into camera space (x right, y up, z depth).
    pub fn world_to_camera(&self, point: Vec3) -> Vec3 {
        self.view_matrix().transform_point3(point)
    }

    /// Whether `point` lies inside the view volume.
    pub fn contains(&self, point: Vec3) -> bool {
        let local = self.world_to_camera(point);
        let eps = 1e-4 * (1.0 + self.ortho_size.max(self.half_width()));
        local.x.abs() <= self.half_width() + eps
            && local.y.abs() <= self.ortho_size + eps
            && local.z >= self.near - eps
            && local.z <= self.far + eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrthoCamera {
        OrthoCamera {
            position: Vec3::new(0.0, 0.0, -5.0),
            forward: Vec3::Z,
            up: Vec3::Y,
            ortho_size: 2.0,
            aspect: 0.5,
            near: 0.01,
            far: 20.0,
        }
    }

    #[test]
    fn test_camera_space_is_left_handed() {
        let cam = camera();
        let local = cam.world_to_camera(Vec3::new(1.0, 2.0, 0.0));
        assert!((local.x - 1.0).abs() < 1e-5);
        assert!((local.y - 2.0).abs() < 1e-5);
        assert!((local.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_contains() {
        let cam = camera();
        assert_eq!(cam.half_width(), 1.0);
        assert!(cam.contains(Vec3::new(1.0, -2.0, 0.0)));
        assert!(!cam.contains(Vec3::new(1.1, 0.0, 0.0)));
        assert!(!cam.contains(Vec3::new(0.0, 0.0, -6.0)));
    }

    #[test]
    fn test_projection_maps_edges_to_ndc() {
        let cam = camera();
        let clip = cam.projection_matrix() * cam.view_matrix();
        let p = clip.project_point3(Vec3::new(1.0, 2.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }
}
