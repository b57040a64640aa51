//! Billboard assets and the bake that fills them.

pub mod asset;
pub mod baker;
pub mod settings;

pub use asset::{BillboardAsset, BillboardOutput, GeneratedMaterial, GeneratedMesh, GeneratedTexture};
pub use baker::{
    generated_texture_name, BakeReport, BakeWarning, Baker, GENERATED_MATERIAL_NAME, GENERATED_MESH_NAME,
};
pub use settings::{
    AlphaSource, BakePass, BillboardRenderSettings, NpotScale, TextureImportSettings, TextureSlot,
};
