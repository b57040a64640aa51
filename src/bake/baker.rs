//! The bake: source object in, atlases plus billboard mesh and material out.

use super::asset::{BillboardAsset, BillboardOutput, GeneratedMaterial, GeneratedMesh, GeneratedTexture};
use super::settings::{TextureImportSettings, TextureSlot};
use crate::atlas::{stitch_views, AtlasLayout, ChannelMask, ChannelMerger, TextureAtlas};
use crate::error::{BakerError, Result};
use crate::material::{Material, TextureRef, CUTOFF_PROPERTY};
use crate::mesher::{build_billboard_into, Mesh};
use crate::render::{DirectionalRenderer, RenderBackend, RenderSettings};
use crate::source::{select_geometry, SelectedGeometry};
use crate::types::{AssetId, Bounds};
use serde::Serialize;

pub const GENERATED_MESH_NAME: &str = "Generated Mesh";
pub const GENERATED_MATERIAL_NAME: &str = "Generated Material";

/// Name given to the atlas baked for `texture_id`.
pub fn generated_texture_name(texture_id: &str) -> String {
    format!("Generated Texture - {}", texture_id)
}

/// A configuration problem that did not stop the bake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BakeWarning {
    /// More than one pass of the slot writes these channels. The last pass wins.
    ChannelCollision { slot: String, channels: ChannelMask },
    /// The slot's format stores these channels but no pass writes them. They stay zero.
    UnclaimedChannels { slot: String, channels: ChannelMask },
}

impl std::fmt::Display for BakeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BakeWarning::ChannelCollision { slot, channels } => write!(
                f,
                "multiple bake passes of '{}' write channel(s) {}; the last pass wins",
                slot, channels
            ),
            BakeWarning::UnclaimedChannels { slot, channels } => write!(
                f,
                "no bake pass of '{}' writes channel(s) {}; they stay empty",
                slot, channels
            ),
        }
    }
}

/// Summary of a successful bake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BakeReport {
    pub layout: AtlasLayout,
    pub atlas_size: (u32, u32),
    pub slots: usize,
    pub passes_rendered: usize,
    pub warnings: Vec<BakeWarning>,
}

impl BakeReport {
    pub fn collisions(&self) -> impl Iterator<Item = &BakeWarning> {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BakeWarning::ChannelCollision { .. }))
    }
}

/// Everything a bake produced, held back until every step has succeeded.
struct PendingBake {
    bounds: Bounds,
    textures: Vec<PendingTexture>,
    material: Material,
    report: BakeReport,
}

struct PendingTexture {
    texture_id: String,
    atlas: TextureAtlas,
    import: TextureImportSettings,
}

/// Bakes billboard assets through a render backend.
///
/// The baker owns (or mutably borrows, via `&mut B`) its backend for as long as
/// it lives, so only one bake can use the backend at a time.
pub struct Baker<B: RenderBackend> {
    backend: B,
    render_settings: RenderSettings,
}

impl<B: RenderBackend> Baker<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            render_settings: RenderSettings::BAKE,
        }
    }

    pub fn with_render_settings(mut self, settings: RenderSettings) -> Self {
        self.render_settings = settings;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Bake `asset` and store the result in `asset.output`.
    ///
    /// Running it again with the same inputs produces the same atlases and
    /// updates the existing mesh and material in place. On error nothing is
    /// written and the previous output stays as it was.
    pub fn generate(&mut self, asset: &mut BillboardAsset) -> Result<BakeReport> {
        log::info!(
            "Baking billboard '{}' ({} texture slot(s), texture size {})",
            asset.source.name,
            asset.settings.textures.len(),
            asset.texture_size
        );

        let pending = self.prepare(asset)?;
        let report = pending.report.clone();
        commit(pending, &mut asset.output);

        log::info!(
            "Baked billboard '{}': {}x{} atlas, {} pass(es), {} warning(s)",
            asset.source.name,
            report.atlas_size.0,
            report.atlas_size.1,
            report.passes_rendered,
            report.warnings.len()
        );
        Ok(report)
    }

    fn prepare(&mut self, asset: &BillboardAsset) -> Result<PendingBake> {
        asset.settings.validate()?;
        let selected = select_geometry(&asset.source, asset.lod_selection())?;
        let layout = AtlasLayout::for_bounds(&selected.bounds, asset.view_height())?;
        log::debug!(
            "Bounds center {:?} size {:?}; views {}x{} (front) and {}x{} (side)",
            selected.bounds.center,
            selected.bounds.size(),
            layout.front_width,
            layout.view_height,
            layout.side_width,
            layout.view_height
        );

        let mut warnings = Vec::new();
        let mut passes_rendered = 0;
        let mut textures = Vec::with_capacity(asset.settings.textures.len());

        for (completed, slot) in asset.settings.textures.iter().enumerate() {
            let atlas = self
                .bake_slot(slot, &selected, &layout, &mut warnings, &mut passes_rendered)
                .map_err(|source| {
                    log::error!(
                        "Baking texture slot '{}' failed after {} completed slot(s): {}",
                        slot.texture_id,
                        completed,
                        source
                    );
                    BakerError::SlotBake {
                        slot: slot.texture_id.clone(),
                        completed,
                        source: Box::new(source),
                    }
                })?;
            textures.push(PendingTexture {
                texture_id: slot.texture_id.clone(),
                atlas,
                import: slot.import_settings(),
            });
        }

        let material = assemble_material(asset, selected.material, &textures);

        Ok(PendingBake {
            bounds: selected.bounds,
            textures,
            material,
            report: BakeReport {
                layout,
                atlas_size: layout.atlas_size(),
                slots: asset.settings.textures.len(),
                passes_rendered,
                warnings,
            },
        })
    }

    fn bake_slot(
        &mut self,
        slot: &TextureSlot,
        selected: &SelectedGeometry<'_>,
        layout: &AtlasLayout,
        warnings: &mut Vec<BakeWarning>,
        passes_rendered: &mut usize,
    ) -> Result<TextureAtlas> {
        let claims = slot.claims();
        let format = claims.format();

        let collisions = claims.collisions();
        if !collisions.is_empty() {
            let warning = BakeWarning::ChannelCollision {
                slot: slot.texture_id.clone(),
                channels: collisions,
            };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
        let unclaimed = format.channels().difference(claims.claimed());
        if !unclaimed.is_empty() {
            let warning = BakeWarning::UnclaimedChannels {
                slot: slot.texture_id.clone(),
                channels: unclaimed,
            };
            log::debug!("{}", warning);
            warnings.push(warning);
        }

        log::info!(
            "Baking '{}' as {} from {} pass(es)",
            slot.texture_id,
            format,
            slot.passes.len()
        );

        let (width, height) = layout.atlas_size();
        let mut merger = ChannelMerger::new(width, height);
        for (index, pass) in slot.passes.iter().enumerate() {
            log::debug!(
                "Pass {} of '{}': shader {}, channels {}",
                index,
                slot.texture_id,
                pass.shader.as_ref().map_or(selected.material.shader.name(), |s| s.name()),
                pass.channels
            );
            let material = pass.material_for(selected.material);
            let views = DirectionalRenderer::new(selected.mesh, &material, selected.bounds, *layout)
                .with_settings(self.render_settings)
                .render_all(&mut self.backend)?;
            let stitched = stitch_views(layout, &views)?;
            merger.add_pass(pass.channels, &stitched)?;
            *passes_rendered += 1;
        }

        Ok(TextureAtlas {
            pixels: merger.finish().buffer,
            format,
            layout: *layout,
        })
    }
}

/// The billboard material: the billboard shader with the source material's
/// properties, the cutoff, and every slot atlas bound by texture id.
fn assemble_material(asset: &BillboardAsset, source: &Material, textures: &[PendingTexture]) -> Material {
    let mut material = Material::with_shader_from(asset.settings.billboard_shader.clone(), source);
    material.name = GENERATED_MATERIAL_NAME.to_string();
    material.set_float(CUTOFF_PROPERTY, asset.cutoff);
    for texture in textures {
        material.set_texture(
            texture.texture_id.clone(),
            TextureRef::new(generated_texture_name(&texture.texture_id)),
        );
    }
    material
}

fn commit(pending: PendingBake, output: &mut BillboardOutput) {
    output.textures = pending
        .textures
        .into_iter()
        .map(|t| GeneratedTexture {
            id: AssetId::next(),
            name: generated_texture_name(&t.texture_id),
            texture_id: t.texture_id,
            atlas: t.atlas,
            import: t.import,
        })
        .collect();

    let material_id = output.material.as_ref().map_or_else(AssetId::next, |m| m.id);
    output.material = Some(GeneratedMaterial {
        id: material_id,
        material: pending.material,
    });

    // Rebuild into the existing mesh so its identity and buffers survive.
    let mut mesh = output.mesh.take().unwrap_or_else(|| GeneratedMesh {
        id: AssetId::next(),
        name: String::new(),
        mesh: Mesh::new(),
    });
    build_billboard_into(&mut mesh.mesh, &pending.bounds);
    mesh.name = GENERATED_MESH_NAME.to_string();
    output.mesh = Some(mesh);
}
