//! Export formats for baked billboards.
//!
//! This module provides exporters for the generated mesh (GLB, OBJ), the
//! generated material (JSON descriptor) and the atlases (PNG).

pub mod gltf;
pub mod material;
pub mod obj;

pub use gltf::export_glb;
pub use material::{export_material_descriptor, MaterialDescriptor, MeshDescriptor, TextureDescriptor};
pub use obj::{export_obj, ObjExport, ObjTexture};

use crate::bake::BillboardOutput;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Mesh container written by [`write_bundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// Binary glTF with the first atlas embedded.
    Glb,
    /// Wavefront OBJ plus MTL.
    Obj,
}

/// File name of the PNG holding the atlas bound to `texture_id`.
///
/// `("tree", "_MainTex")` gives `tree_MainTex.png`.
pub fn texture_file_name(name: &str, texture_id: &str) -> String {
    let id: String = texture_id
        .trim_start_matches('_')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() {
        format!("{}_texture.png", name)
    } else {
        format!("{}_{}.png", name, id)
    }
}

/// Write every artifact of a bake into `dir`: one PNG per atlas, the mesh in
/// `format`, and `<name>.material.json`. Returns the written paths.
pub fn write_bundle(output: &BillboardOutput, dir: &Path, name: &str, format: MeshFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    match format {
        MeshFormat::Glb => {
            let path = dir.join(format!("{}.glb", name));
            fs::write(&path, export_glb(output)?)?;
            written.push(path);
        }
        MeshFormat::Obj => {
            let export = ObjExport::from_output(output, name)?;
            let obj_path = dir.join(format!("{}.obj", name));
            let mtl_path = dir.join(format!("{}.mtl", name));
            fs::write(&obj_path, &export.obj)?;
            fs::write(&mtl_path, &export.mtl)?;
            written.push(obj_path);
            written.push(mtl_path);
        }
    }

    // GLB embeds the first atlas too, but the descriptor refers to every file.
    for texture in &output.textures {
        let path = dir.join(texture_file_name(name, &texture.texture_id));
        fs::write(&path, texture.atlas.to_png()?)?;
        written.push(path);
    }

    let descriptor_path = dir.join(format!("{}.material.json", name));
    fs::write(&descriptor_path, export_material_descriptor(output, name)?)?;
    written.push(descriptor_path);

    log::info!("Wrote {} file(s) for '{}' to {:?}", written.len(), name, dir);
    Ok(written)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::atlas::{Channel, ChannelMask};
    use crate::bake::{BakePass, Baker, BillboardAsset, BillboardOutput, BillboardRenderSettings, TextureSlot};
    use crate::material::{Material, ShaderRef};
    use crate::render::SoftwareRasterizer;
    use crate::source::{Component, MeshRenderer, SceneNode, SourceMesh};

    /// A 2 x 4 x 1 box baked at 32 px with an RGBA `_MainTex` and an RGB `_NormalMap`.
    pub fn baked_output() -> BillboardOutput {
        let source = SceneNode::new("tree").with_component(Component::Renderer(MeshRenderer::new(
            "trunk",
            SourceMesh::cuboid("trunk", [-1.0, 0.0, -0.5], [1.0, 4.0, 0.5]),
            Material::new("bark", ShaderRef::new("unlit")),
        )));
        let settings = BillboardRenderSettings::new(ShaderRef::new("billboard"))
            .with_texture(TextureSlot::new("_MainTex").with_pass(BakePass::new(ChannelMask::ALL)))
            .with_texture(
                TextureSlot::new("_NormalMap").with_pass(
                    BakePass::new(ChannelMask::ALL.with(Channel::A, false))
                        .with_shader(ShaderRef::new("bake/normals")),
                ),
            );
        let mut asset = BillboardAsset::new(source, settings);
        asset.texture_size = 32;
        Baker::new(SoftwareRasterizer::new()).generate(&mut asset).unwrap();
        asset.output
    }
}
