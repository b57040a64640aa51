//! Bake a blocky two-level tree into a billboard.
//!
//!   cargo run --example bake_tree
//!
//! Exports GLB, atlases and a material descriptor to artifacts/tree/, plus the
//! asset description as artifacts/tree.json for use with the CLI.

use billboard_baker::{
    write_bundle, BakePass, Baker, BillboardAsset, BillboardRenderSettings, ChannelMask, Component,
    LodGroup, LodLevel, Material, MeshFormat, MeshRenderer, PropertyValue, SceneNode, ShaderRef,
    SoftwareRasterizer, SourceMesh, TextureSlot,
};
use std::fs;
use std::path::Path;

/// Append `other` to `mesh`, offsetting its indices.
fn merge(mut mesh: SourceMesh, other: SourceMesh) -> SourceMesh {
    let base = mesh.positions.len() as u32;
    mesh.positions.extend(other.positions);
    mesh.normals.extend(other.normals);
    mesh.indices.extend(other.indices.into_iter().map(|i| i + base));
    mesh
}

fn tree_level(name: &str, canopy_layers: u32) -> LodLevel {
    let mut mesh = SourceMesh::cuboid(name, [-0.2, 0.0, -0.2], [0.2, 2.0, 0.2]);
    for layer in 0..canopy_layers {
        let half = 1.2 - layer as f32 * 0.35;
        let y = 1.5 + layer as f32 * 0.8;
        mesh = merge(
            mesh,
            SourceMesh::cuboid("canopy", [-half, y, -half * 0.8], [half, y + 0.9, half * 0.8]),
        );
    }

    let material = Material::new("tree", ShaderRef::new("standard"))
        .with_property("_Color", PropertyValue::Color([0.25, 0.55, 0.2, 1.0]));
    LodLevel {
        renderers: vec![MeshRenderer::new(name, mesh, material)],
    }
}

fn build_asset() -> BillboardAsset {
    let source = SceneNode::new("tree").with_component(Component::LodGroup(LodGroup {
        levels: vec![tree_level("tree_lod0", 3), tree_level("tree_lod1", 2)],
    }));

    let settings = BillboardRenderSettings::new(ShaderRef::new("billboard/standard"))
        .with_texture(TextureSlot::new("_MainTex").with_pass(BakePass::new(ChannelMask::ALL)))
        .with_texture(
            TextureSlot::new("_BumpMap")
                .with_pass(BakePass::new(ChannelMask::RGB).with_shader(ShaderRef::new("bake/normals"))),
        );

    let mut asset = BillboardAsset::new(source, settings);
    asset.texture_size = 256;
    // Bake the most detailed level rather than the last one.
    asset.pick_last_lod = false;
    asset
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut asset = build_asset();
    let out = Path::new("artifacts");
    fs::create_dir_all(out)?;
    fs::write(out.join("tree.json"), asset.to_json()?)?;

    let mut baker = Baker::new(SoftwareRasterizer::new());
    let report = baker.generate(&mut asset)?;
    println!(
        "Baked {}x{} atlas from {} pass(es)",
        report.atlas_size.0, report.atlas_size.1, report.passes_rendered
    );

    // A second bake keeps the mesh and material identities.
    let mesh_id = asset.output.mesh.as_ref().map(|m| m.id);
    baker.generate(&mut asset)?;
    assert_eq!(mesh_id, asset.output.mesh.as_ref().map(|m| m.id));

    let written = write_bundle(&asset.output, &out.join("tree"), "tree", MeshFormat::Glb)?;
    for path in written {
        println!("  {:?}", path);
    }
    Ok(())
}
