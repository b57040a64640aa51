//! Fits an orthographic camera tightly around a bounding box.

use super::OrthoCamera;
use crate::error::{BakerError, Result};
use crate::types::{Bounds, Direction};
use glam::{Mat4, Vec3};

/// Near clip distance of every fitted camera.
pub const NEAR_CLIP: f32 = 0.01;

/// Far clip as a multiple of the camera distance.
pub const FAR_CLIP_FACTOR: f32 = 4.0;

/// Fit a camera looking at `bounds` from one of the four bake directions.
pub fn fit_direction(bounds: &Bounds, direction: Direction, aspect: f32) -> Result<OrthoCamera> {
    fit_camera(bounds, direction.view_vector(), aspect)
}

/// Fit a camera looking along `direction` so the whole box is visible and fills
/// the frame as tightly as `aspect` allows.
///
/// The camera sits `|extents| + 1` behind the box center. All eight corners are
/// projected into camera space and the half-height is chosen so the projected
/// rectangle fits both vertically and, scaled by `aspect`, horizontally.
pub fn fit_camera(bounds: &Bounds, direction: Vec3, aspect: f32) -> Result<OrthoCamera> {
    if !(aspect.is_finite() && aspect > 0.0) {
        return Err(BakerError::InvalidView(format!("aspect ratio {} is not positive", aspect)));
    }
    let forward = direction.try_normalize().ok_or_else(|| {
        BakerError::InvalidView(format!("view direction {:?} has no length", direction))
    })?;
    let up = Vec3::Y;
    if forward.dot(up).abs() > 1.0 - 1e-4 {
        return Err(BakerError::InvalidView(format!(
            "view direction {:?} is parallel to the up axis",
            direction
        )));
    }

    // Translation along the view axis doesn't move x/y, so project from the center.
    let view = Mat4::look_to_lh(bounds.center, forward, up);
    let mut min = glam::Vec2::splat(f32::INFINITY);
    let mut max = glam::Vec2::splat(f32::NEG_INFINITY);
    for corner in bounds.corners() {
        let local = view.transform_point3(corner).truncate();
        min = min.min(local);
        max = max.max(local);
    }

    let width = max.x - min.x;
    let height = max.y - min.y;
    let ortho_size = height.max(width / aspect) * 0.5;

    let distance = bounds.extents.length() + 1.0;

    Ok(OrthoCamera {
        position: bounds.center - forward * distance,
        forward,
        up,
        ortho_size,
        aspect,
        near: NEAR_CLIP,
        far: distance * FAR_CLIP_FACTOR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bounds() -> Vec<Bounds> {
        vec![
            Bounds::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 0.5)),
            Bounds::new(Vec3::new(3.0, -1.0, 7.0), Vec3::new(0.1, 5.0, 2.0)),
            Bounds::new(Vec3::ZERO, Vec3::new(4.0, 0.5, 4.0)),
            Bounds::new(Vec3::new(-2.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 0.0)),
        ]
    }

    #[test]
    fn test_all_corners_visible_for_cardinal_directions() {
        for bounds in sample_bounds() {
            for dir in Direction::ALL {
                for aspect in [0.25, 0.5, 1.0, 2.0, 3.7] {
                    let cam = fit_direction(&bounds, dir, aspect).unwrap();
                    for corner in bounds.corners() {
                        assert!(
                            cam.contains(corner),
                            "corner {:?} clipped for {:?} {} aspect {}",
                            corner,
                            bounds,
                            dir,
                            aspect
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_all_corners_visible_for_oblique_directions() {
        let directions = [
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-0.3, 0.2, 0.9),
            Vec3::new(0.5, -0.7, -0.2),
        ];
        for bounds in sample_bounds() {
            for dir in directions {
                let cam = fit_camera(&bounds, dir, 0.75).unwrap();
                for corner in bounds.corners() {
                    assert!(cam.contains(corner));
                }
            }
        }
    }

    #[test]
    fn test_fit_is_tight() {
        // 2 wide, 4 tall, 1 deep.
        let bounds = Bounds::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 0.5));

        let front = fit_direction(&bounds, Direction::Forward, 0.5).unwrap();
        assert!((front.ortho_size - 2.0).abs() < 1e-5);
        assert!((front.half_width() - 1.0).abs() < 1e-5);

        // A wider target than the object leaves the height as the limit.
        let wide = fit_direction(&bounds, Direction::Forward, 1.0).unwrap();
        assert!((wide.ortho_size - 2.0).abs() < 1e-5);

        // A narrower target makes the width the limit.
        let narrow = fit_direction(&bounds, Direction::Forward, 0.25).unwrap();
        assert!((narrow.ortho_size - 4.0).abs() < 1e-5);

        let side = fit_direction(&bounds, Direction::Right, 0.25).unwrap();
        assert!((side.ortho_size - 2.0).abs() < 1e-5);
        assert!((side.half_width() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_placement_and_clip_planes() {
        let bounds = Bounds::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 1.0, 2.0));
        let distance = bounds.extents.length() + 1.0;

        let cam = fit_direction(&bounds, Direction::Left, 1.0).unwrap();
        assert!((cam.position - (bounds.center - Vec3::X * distance)).length() < 1e-5);
        assert_eq!(cam.forward, Vec3::X);
        assert_eq!(cam.up, Vec3::Y);
        assert_eq!(cam.near, NEAR_CLIP);
        assert!((cam.far - distance * FAR_CLIP_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn test_deterministic() {
        let bounds = sample_bounds()[1];
        let a = fit_direction(&bounds, Direction::Back, 0.6).unwrap();
        let b = fit_direction(&bounds, Direction::Back, 0.6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_views() {
        let bounds = sample_bounds()[0];
        assert!(fit_camera(&bounds, Vec3::ZERO, 1.0).is_err());
        assert!(fit_camera(&bounds, Vec3::Y, 1.0).is_err());
        assert!(fit_camera(&bounds, Vec3::Z, 0.0).is_err());
        assert!(fit_camera(&bounds, Vec3::Z, f32::NAN).is_err());
    }
}
