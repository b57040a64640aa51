//! Rendering through an injected backend.
//!
//! The bake never talks to a renderer directly. It builds a [`RenderRequest`]
//! and hands it to a [`RenderBackend`] inside a [`RenderScope`], which puts the
//! backend's active state back the way it found it when the scope ends.

pub mod directional;
pub mod software;

pub use directional::DirectionalRenderer;
pub use software::{LightingConfig, RasterState, ShadingModel, SoftwareRasterizer};

use crate::atlas::PixelBuffer;
use crate::camera::OrthoCamera;
use crate::error::{BakerError, Result};
use crate::material::Material;
use crate::source::SourceMesh;

/// Fixed render configuration for a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// RGBA clear color, 0-1.
    pub clear_color: [f32; 4],
    /// Samples per pixel. 1 disables antialiasing.
    pub msaa_samples: u32,
    pub shadows: bool,
    pub post_processing: bool,
}

impl RenderSettings {
    /// Transparent clear, one sample, no shadows, no post-processing.
    pub const BAKE: RenderSettings = RenderSettings {
        clear_color: [0.0, 0.0, 0.0, 0.0],
        msaa_samples: 1,
        shadows: false,
        post_processing: false,
    };
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::BAKE
    }
}

/// Everything a backend needs to draw one view.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub mesh: &'a SourceMesh,
    pub material: &'a Material,
    pub camera: OrthoCamera,
    pub width: u32,
    pub height: u32,
    pub settings: RenderSettings,
}

/// A renderer that can draw a mesh into an offscreen RGBA8 buffer.
///
/// Backends usually carry some global state (the active target, the active
/// camera) that a render call changes. `save_state` and `restore_state` let a
/// [`RenderScope`] undo those changes.
pub trait RenderBackend {
    type State;

    fn save_state(&self) -> Self::State;

    fn restore_state(&mut self, state: Self::State);

    /// Render `request` into a new `width` x `height` buffer, bottom row first.
    fn render(&mut self, request: &RenderRequest<'_>) -> Result<PixelBuffer>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    type State = B::State;

    fn save_state(&self) -> Self::State {
        (**self).save_state()
    }

    fn restore_state(&mut self, state: Self::State) {
        (**self).restore_state(state)
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<PixelBuffer> {
        (**self).render(request)
    }
}

/// Saves backend state on creation and restores it on drop.
pub struct RenderScope<'a, B: RenderBackend> {
    backend: &'a mut B,
    saved: Option<B::State>,
}

impl<'a, B: RenderBackend> RenderScope<'a, B> {
    pub fn acquire(backend: &'a mut B) -> Self {
        let saved = Some(backend.save_state());
        Self { backend, saved }
    }

    /// Render through the scoped backend and check the returned size.
    pub fn render(&mut self, request: &RenderRequest<'_>) -> Result<PixelBuffer> {
        let buffer = self.backend.render(request)?;
        if buffer.dimensions() != (request.width, request.height) {
            return Err(BakerError::Render(format!(
                "backend returned a {}x{} buffer for a {}x{} request",
                buffer.width, buffer.height, request.width, request.height
            )));
        }
        let expected_len = request.width as usize * request.height as usize * 4;
        if buffer.pixels.len() != expected_len {
            return Err(BakerError::Render(format!(
                "backend returned {} bytes, expected {}",
                buffer.pixels.len(),
                expected_len
            )));
        }
        Ok(buffer)
    }
}

impl<B: RenderBackend> Drop for RenderScope<'_, B> {
    fn drop(&mut self) {
        if let Some(state) = self.saved.take() {
            self.backend.restore_state(state);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backends for exercising the bake without rasterizing.

    use super::*;

    /// Fills each view with a color derived from the request, and tracks its
    /// "active" state the way a real backend would.
    #[derive(Debug, Default)]
    pub struct StubBackend {
        pub active: u32,
        pub calls: usize,
        /// Fail the n-th render call (0-based).
        pub fail_on: Option<usize>,
        /// Return a buffer one pixel too wide.
        pub wrong_size: bool,
        /// Settings of the most recent request.
        pub last_settings: Option<RenderSettings>,
    }

    impl RenderBackend for StubBackend {
        type State = u32;

        fn save_state(&self) -> u32 {
            self.active
        }

        fn restore_state(&mut self, state: u32) {
            self.active = state;
        }

        fn render(&mut self, request: &RenderRequest<'_>) -> Result<PixelBuffer> {
            let call = self.calls;
            self.calls += 1;
            self.active = 1000 + call as u32;
            self.last_settings = Some(request.settings);
            if self.fail_on == Some(call) {
                return Err(BakerError::Render(format!("scripted failure on call {}", call)));
            }
            let shade = request
                .material
                .float("_Shade")
                .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .unwrap_or(200);
            let width = request.width + u32::from(self.wrong_size);
            Ok(PixelBuffer::filled(
                width,
                request.height,
                [shade, shade / 2, shade / 4, 255],
            ))
        }
    }
}
