//! Renders an object from the four bake directions.

use super::{RenderBackend, RenderRequest, RenderScope, RenderSettings};
use crate::atlas::{AtlasLayout, DirectionalViews, PixelBuffer};
use crate::camera::fit_direction;
use crate::error::Result;
use crate::material::Material;
use crate::source::SourceMesh;
use crate::types::{Bounds, Direction};

/// Draws one mesh/material pair from each [`Direction`] at the sizes an
/// [`AtlasLayout`] gives.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalRenderer<'a> {
    mesh: &'a SourceMesh,
    material: &'a Material,
    bounds: Bounds,
    layout: AtlasLayout,
    settings: RenderSettings,
}

impl<'a> DirectionalRenderer<'a> {
    /// `material` must already carry the pass's shader and overrides.
    pub fn new(mesh: &'a SourceMesh, material: &'a Material, bounds: Bounds, layout: AtlasLayout) -> Self {
        Self {
            mesh,
            material,
            bounds,
            layout,
            settings: RenderSettings::BAKE,
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Render the view for `direction`, restoring the backend state afterwards.
    pub fn render_view<B: RenderBackend>(&self, backend: &mut B, direction: Direction) -> Result<PixelBuffer> {
        let (width, height) = self.layout.view_size(direction);
        let camera = fit_direction(&self.bounds, direction, width as f32 / height as f32)?;
        log::debug!(
            "Rendering {} view of '{}' at {}x{} (ortho size {:.3})",
            direction,
            self.mesh.name,
            width,
            height,
            camera.ortho_size
        );

        let request = RenderRequest {
            mesh: self.mesh,
            material: self.material,
            camera,
            width,
            height,
            settings: self.settings,
        };
        RenderScope::acquire(backend).render(&request)
    }

    /// Render all four views in [`Direction::ALL`] order.
    pub fn render_all<B: RenderBackend>(&self, backend: &mut B) -> Result<DirectionalViews> {
        let [forward, right, back, left] = Direction::ALL;
        Ok(DirectionalViews::new(
            self.render_view(backend, forward)?,
            self.render_view(backend, right)?,
            self.render_view(backend, back)?,
            self.render_view(backend, left)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShaderRef;
    use crate::render::testing::StubBackend;
    use crate::render::SoftwareRasterizer;
    use glam::Vec3;

    fn scenario() -> (SourceMesh, Material, Bounds) {
        let mesh = SourceMesh::cuboid("tree", [-1.0, 0.0, -0.5], [1.0, 4.0, 0.5]);
        let bounds = mesh.bounds().unwrap();
        (mesh, Material::new("bark", ShaderRef::new("unlit")), bounds)
    }

    #[test]
    fn test_views_match_layout() {
        let (mesh, material, bounds) = scenario();
        let layout = AtlasLayout::for_bounds(&bounds, 32).unwrap();
        let renderer = DirectionalRenderer::new(&mesh, &material, bounds, layout);

        let mut backend = StubBackend::default();
        let views = renderer.render_all(&mut backend).unwrap();
        assert_eq!(backend.calls, 4);
        for (direction, view) in views.iter() {
            assert_eq!(view.dimensions(), layout.view_size(direction));
        }
        assert_eq!(views.get(Direction::Forward).dimensions(), (16, 32));
        assert_eq!(views.get(Direction::Left).dimensions(), (8, 32));
    }

    #[test]
    fn test_failure_stops_and_restores_state() {
        let (mesh, material, bounds) = scenario();
        let layout = AtlasLayout::for_bounds(&bounds, 32).unwrap();
        let renderer = DirectionalRenderer::new(&mesh, &material, bounds, layout);

        let mut backend = StubBackend {
            active: 42,
            fail_on: Some(2),
            ..Default::default()
        };
        assert!(renderer.render_all(&mut backend).is_err());
        assert_eq!(backend.calls, 3);
        assert_eq!(backend.active, 42);
    }

    #[test]
    fn test_fitted_views_are_fully_covered() {
        // The fitted camera frames a box exactly, so every pixel is drawn.
        let (mesh, material, bounds) = scenario();
        let layout = AtlasLayout::for_bounds(&bounds, 16).unwrap();
        let renderer = DirectionalRenderer::new(&mesh, &material, bounds, layout);

        let views = renderer.render_all(&mut SoftwareRasterizer::new()).unwrap();
        for (_, view) in views.iter() {
            assert!(!view.has_transparency());
        }
        assert_eq!(bounds.center, Vec3::new(0.0, 2.0, 0.0));
    }
}
