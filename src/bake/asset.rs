//! The billboard asset record and its generated output.

use super::settings::{BillboardRenderSettings, TextureImportSettings};
use crate::atlas::TextureAtlas;
use crate::error::Result;
use crate::material::Material;
use crate::mesher::Mesh;
use crate::source::{LodSelection, SourceObject};
use crate::types::AssetId;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_texture_size() -> u32 {
    512
}

fn default_cutoff() -> f32 {
    0.15
}

fn default_pick_last_lod() -> bool {
    true
}

/// Everything needed to bake one billboard, plus what the last bake produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillboardAsset {
    /// The object to bake.
    pub source: SourceObject,
    #[serde(default)]
    pub settings: BillboardRenderSettings,
    /// Atlas height in pixels. Each view is half of this.
    #[serde(default = "default_texture_size")]
    pub texture_size: u32,
    /// Alpha cutoff written to the generated material.
    #[serde(default = "default_cutoff")]
    pub cutoff: f32,
    /// Count LOD levels from the least detailed end.
    #[serde(default = "default_pick_last_lod")]
    pub pick_last_lod: bool,
    #[serde(default)]
    pub lod_index: usize,
    #[serde(skip)]
    pub output: BillboardOutput,
}

impl BillboardAsset {
    pub fn new(source: SourceObject, settings: BillboardRenderSettings) -> Self {
        Self {
            source,
            settings,
            texture_size: default_texture_size(),
            cutoff: default_cutoff(),
            pick_last_lod: default_pick_last_lod(),
            lod_index: 0,
            output: BillboardOutput::default(),
        }
    }

    /// Load an asset description from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn lod_selection(&self) -> LodSelection {
        LodSelection {
            pick_from_end: self.pick_last_lod,
            level_index: self.lod_index,
        }
    }

    /// Height of each directional view: half the texture size, rounded down.
    pub fn view_height(&self) -> u32 {
        self.texture_size / 2
    }
}

/// A baked atlas for one texture slot.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTexture {
    pub id: AssetId,
    pub name: String,
    /// Material property the atlas is bound to.
    pub texture_id: String,
    pub atlas: TextureAtlas,
    pub import: TextureImportSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMesh {
    pub id: AssetId,
    pub name: String,
    pub mesh: Mesh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMaterial {
    pub id: AssetId,
    pub material: Material,
}

/// Artifacts of the last successful bake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillboardOutput {
    /// One atlas per texture slot, in slot order.
    pub textures: Vec<GeneratedTexture>,
    pub mesh: Option<GeneratedMesh>,
    pub material: Option<GeneratedMaterial>,
}

impl BillboardOutput {
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.mesh.is_none() && self.material.is_none()
    }

    pub fn texture(&self, texture_id: &str) -> Option<&GeneratedTexture> {
        self.textures.iter().find(|t| t.texture_id == texture_id)
    }

    /// Drop every generated artifact.
    pub fn clear(&mut self) {
        self.textures.clear();
        self.mesh = None;
        self.material = None;
    }
}
