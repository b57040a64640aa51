//! JSON descriptor of the generated material and the files it binds.
//!
//! Engines that cannot read the crate's types rebuild the billboard material
//! from this: the shader, every property, and per-slot atlas files with their
//! import settings.

use super::texture_file_name;
use crate::atlas::{AtlasLayout, TextureFormat};
use crate::bake::{BillboardOutput, TextureImportSettings};
use crate::error::{BakerError, Result};
use crate::material::{PropertyMap, ShaderRef};
use crate::types::AssetId;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TextureDescriptor {
    pub id: AssetId,
    pub name: String,
    /// Material property the atlas is bound to.
    pub texture_id: String,
    pub file: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub import: TextureImportSettings,
    pub layout: AtlasLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeshDescriptor {
    pub id: AssetId,
    pub name: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialDescriptor {
    pub id: AssetId,
    pub name: String,
    pub shader: ShaderRef,
    pub properties: PropertyMap,
    pub textures: Vec<TextureDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDescriptor>,
}

impl MaterialDescriptor {
    /// Describe `output`, naming atlas files after `name`.
    pub fn from_output(output: &BillboardOutput, name: &str) -> Result<Self> {
        let generated = output
            .material
            .as_ref()
            .ok_or_else(|| BakerError::Export("No generated material to describe".to_string()))?;

        let textures = output
            .textures
            .iter()
            .map(|t| TextureDescriptor {
                id: t.id,
                name: t.name.clone(),
                texture_id: t.texture_id.clone(),
                file: texture_file_name(name, &t.texture_id),
                width: t.atlas.width(),
                height: t.atlas.height(),
                format: t.atlas.format,
                import: t.import,
                layout: t.atlas.layout,
            })
            .collect();

        let mesh = output.mesh.as_ref().map(|m| {
            let (min, max) = m
                .mesh
                .bounds
                .map(|b| (b.min().to_array(), b.max().to_array()))
                .unwrap_or_default();
            MeshDescriptor {
                id: m.id,
                name: m.name.clone(),
                vertex_count: m.mesh.vertex_count(),
                triangle_count: m.mesh.triangle_count(),
                min,
                max,
            }
        });

        Ok(Self {
            id: generated.id,
            name: generated.material.name.clone(),
            shader: generated.material.shader.clone(),
            properties: generated.material.properties.clone(),
            textures,
            mesh,
        })
    }
}

/// Pretty-printed JSON descriptor of the generated material.
pub fn export_material_descriptor(output: &BillboardOutput, name: &str) -> Result<String> {
    let descriptor = MaterialDescriptor::from_output(output, name)?;
    Ok(serde_json::to_string_pretty(&descriptor)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::{GENERATED_MATERIAL_NAME, GENERATED_MESH_NAME};
    use crate::export::testing::baked_output;

    #[test]
    fn test_descriptor_json() {
        let output = baked_output();
        let json = export_material_descriptor(&output, "tree").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], GENERATED_MATERIAL_NAME);
        assert_eq!(value["shader"], "billboard");
        assert_eq!(value["properties"]["_Cutoff"]["type"], "float");
        assert_eq!(
            value["properties"]["_MainTex"]["value"],
            "Generated Texture - _MainTex"
        );

        let textures = value["textures"].as_array().unwrap();
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[0]["file"], "tree_MainTex.png");
        assert_eq!(textures[0]["format"], "RGBA32");
        assert_eq!(textures[1]["format"], "RGB24");
        assert_eq!(textures[0]["import"]["npot_scale"], "to_nearest");
        assert_eq!(textures[0]["height"], 32);

        assert_eq!(value["mesh"]["name"], GENERATED_MESH_NAME);
        assert_eq!(value["mesh"]["vertex_count"], 16);
        assert_eq!(value["mesh"]["triangle_count"], 8);
    }

    #[test]
    fn test_descriptor_ids_match_output() {
        let output = baked_output();
        let descriptor = MaterialDescriptor::from_output(&output, "tree").unwrap();
        assert_eq!(descriptor.id, output.material.as_ref().unwrap().id);
        assert_eq!(descriptor.textures[1].id, output.textures[1].id);
        assert_eq!(descriptor.mesh.unwrap().max, [1.0, 4.0, 0.5]);
    }

    #[test]
    fn test_descriptor_requires_material() {
        assert!(export_material_descriptor(&BillboardOutput::default(), "tree").is_err());
    }
}
