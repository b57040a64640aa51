//! A deterministic CPU rasterizer.
//!
//! Good enough to bake flat-shaded or unlit billboards without a GPU, and
//! fully reproducible, which the tests rely on. Triangles are drawn
//! double-sided with a depth buffer. There is no antialiasing, shadowing or
//! post-processing, and requests asking for them fail instead of rendering
//! something else.

use super::{RenderBackend, RenderRequest};
use crate::atlas::PixelBuffer;
use crate::camera::OrthoCamera;
use crate::error::{BakerError, Result};
use crate::material::{Material, ShaderRef, COLOR_PROPERTY, CUTOFF_PROPERTY};
use glam::{Vec2, Vec3};

/// Lighting for the standard shading model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    /// World-space direction the light travels in.
    pub light_direction: Vec3,
    /// Ambient light floor (0.0 = black where unlit).
    pub ambient_light: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            light_direction: Vec3::new(0.3, -1.0, 0.4).normalize(),
            ambient_light: 0.35,
        }
    }
}

/// How a material's shader is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    /// `_Color` modulated by Lambert lighting.
    Standard,
    /// `_Color` as is.
    Unlit,
    /// World-space normals packed into RGB.
    Normals,
}

impl ShadingModel {
    pub fn for_shader(shader: &ShaderRef) -> Self {
        let name = shader.name().to_ascii_lowercase();
        if name.contains("normal") {
            ShadingModel::Normals
        } else if name.contains("unlit") {
            ShadingModel::Unlit
        } else {
            ShadingModel::Standard
        }
    }
}

/// The rasterizer's active state, saved and restored around each render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RasterState {
    /// Size of the active target.
    pub target: Option<(u32, u32)>,
    pub camera: Option<OrthoCamera>,
}

#[derive(Debug, Clone, Default)]
pub struct SoftwareRasterizer {
    state: RasterState,
    lighting: LightingConfig,
}

impl SoftwareRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn state(&self) -> &RasterState {
        &self.state
    }
}

impl RenderBackend for SoftwareRasterizer {
    type State = RasterState;

    fn save_state(&self) -> RasterState {
        self.state
    }

    fn restore_state(&mut self, state: RasterState) {
        self.state = state;
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<PixelBuffer> {
        if request.width == 0 || request.height == 0 {
            return Err(BakerError::Render(format!(
                "cannot render into a {}x{} target",
                request.width, request.height
            )));
        }
        let settings = &request.settings;
        if settings.msaa_samples != 1 || settings.shadows || settings.post_processing {
            return Err(BakerError::Render(format!(
                "unsupported render settings (msaa {}, shadows {}, post-processing {})",
                settings.msaa_samples, settings.shadows, settings.post_processing
            )));
        }
        self.state = RasterState {
            target: Some((request.width, request.height)),
            camera: Some(request.camera),
        };

        let clear = to_rgba8(request.settings.clear_color);
        let mut target = Target {
            color: PixelBuffer::filled(request.width, request.height, clear),
            depth: vec![f32::INFINITY; request.width as usize * request.height as usize],
        };

        let shader = Shader::new(request.material, &request.camera, &self.lighting);
        let mesh = request.mesh;
        let projected = project(&request.camera, &mesh.positions, request.width, request.height);

        for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a.max(b).max(c) >= mesh.positions.len() {
                return Err(BakerError::Render(format!(
                    "triangle {} of mesh '{}' indexes past {} vertices",
                    t,
                    mesh.name,
                    mesh.positions.len()
                )));
            }

            let normals = if mesh.has_normals() {
                [a, b, c].map(|i| Vec3::from(mesh.normals[i]))
            } else {
                let [pa, pb, pc] = [a, b, c].map(|i| Vec3::from(mesh.positions[i]));
                [(pb - pa).cross(pc - pa).normalize_or_zero(); 3]
            };

            target.draw_triangle([projected[a], projected[b], projected[c]], normals, &request.camera, &shader);
        }

        Ok(target.color)
    }
}

/// Screen-space vertex: pixel x, pixel y (bottom-up), camera depth.
fn project(camera: &OrthoCamera, positions: &[[f32; 3]], width: u32, height: u32) -> Vec<Vec3> {
    let view = camera.view_matrix();
    let (hw, hh) = (camera.half_width(), camera.ortho_size);
    positions
        .iter()
        .map(|&p| {
            let local = view.transform_point3(Vec3::from(p));
            Vec3::new(
                (local.x / hw * 0.5 + 0.5) * width as f32,
                (local.y / hh * 0.5 + 0.5) * height as f32,
                local.z,
            )
        })
        .collect()
}

struct Target {
    color: PixelBuffer,
    depth: Vec<f32>,
}

impl Target {
    fn draw_triangle(&mut self, v: [Vec3; 3], n: [Vec3; 3], camera: &OrthoCamera, shader: &Shader) {
        let (p0, p1, p2) = (v[0].truncate(), v[1].truncate(), v[2].truncate());
        let area = edge(p0, p1, p2);
        if area.abs() < 1e-12 {
            return;
        }

        let (w, h) = self.color.dimensions();
        let min = p0.min(p1).min(p2);
        let max = p0.max(p1).max(p2);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(w);
        let y1 = (max.y.ceil().max(0.0) as u32).min(h);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let b0 = edge(p1, p2, p) / area;
                let b1 = edge(p2, p0, p) / area;
                let b2 = edge(p0, p1, p) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let z = b0 * v[0].z + b1 * v[1].z + b2 * v[2].z;
                if z < camera.near || z > camera.far {
                    continue;
                }
                let idx = y as usize * w as usize + x as usize;
                if z >= self.depth[idx] {
                    continue;
                }

                let normal = (n[0] * b0 + n[1] * b1 + n[2] * b2).normalize_or_zero();
                if let Some(rgba) = shader.shade(normal) {
                    self.depth[idx] = z;
                    self.color.set_pixel(x, y, to_rgba8(rgba));
                }
            }
        }
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

struct Shader {
    model: ShadingModel,
    base_color: [f32; 4],
    cutoff: Option<f32>,
    view_forward: Vec3,
    lighting: LightingConfig,
}

impl Shader {
    fn new(material: &Material, camera: &OrthoCamera, lighting: &LightingConfig) -> Self {
        Self {
            model: ShadingModel::for_shader(&material.shader),
            base_color: material.color(COLOR_PROPERTY).unwrap_or([1.0; 4]),
            cutoff: material.float(CUTOFF_PROPERTY),
            view_forward: camera.forward,
            lighting: *lighting,
        }
    }

    /// Color of a fragment, or `None` when alpha testing discards it.
    fn shade(&self, normal: Vec3) -> Option<[f32; 4]> {
        let [r, g, b, a] = self.base_color;
        if self.cutoff.is_some_and(|cutoff| a < cutoff) {
            return None;
        }

        let rgba = match self.model {
            ShadingModel::Unlit => self.base_color,
            ShadingModel::Normals => {
                let packed = normal * 0.5 + Vec3::splat(0.5);
                [packed.x, packed.y, packed.z, 1.0]
            }
            ShadingModel::Standard => {
                // Light whichever side faces the camera.
                let facing = if normal.dot(self.view_forward) > 0.0 { -normal } else { normal };
                let lambert = facing.dot(-self.lighting.light_direction).max(0.0);
                let ambient = self.lighting.ambient_light;
                let intensity = ambient + (1.0 - ambient) * lambert;
                [r * intensity, g * intensity, b * intensity, a]
            }
        };
        Some(rgba)
    }
}

fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
