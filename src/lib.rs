//! # Billboard Baker
//!
//! A Rust library for baking 3D objects into lightweight billboard impostors.
//!
//! ## Overview
//!
//! The baker picks one mesh and material out of a source object (honouring its
//! LOD group), renders it orthographically from four horizontal directions, and
//! packs the views into one atlas per texture slot. It then builds a crossed-quad
//! mesh whose UVs address those atlases and a material that binds them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use billboard_baker::{export_glb, Baker, BillboardAsset, SoftwareRasterizer};
//!
//! // Load an asset description
//! let mut asset = BillboardAsset::from_json_file("tree.json")?;
//!
//! // Bake with the built-in software rasterizer
//! let report = Baker::new(SoftwareRasterizer::new()).generate(&mut asset)?;
//! println!("atlas {:?}", report.atlas_size);
//!
//! // Export to GLB
//! let glb_bytes = export_glb(&asset.output)?;
//! ```
//!
//! ## Custom Renderers
//!
//! Implement [`RenderBackend`] to bake through an engine's own renderer. The
//! baker saves the backend's state before every view and restores it afterwards,
//! even when the render fails.

pub mod error;
pub mod types;
pub mod material;
pub mod source;
pub mod camera;
pub mod render;
pub mod atlas;
pub mod mesher;
pub mod bake;
pub mod export;

// Re-export main types for convenience
pub use error::{BakerError, MissingGeometry, Result};
pub use types::{AssetId, Axis, Bounds, Direction};
pub use material::{Material, MaterialOverrides, PropertyValue, ShaderRef, TextureRef};
pub use source::{select_geometry, Component, LodGroup, LodLevel, LodSelection, MeshRenderer, SceneNode, SourceMesh, SourceObject};
pub use camera::OrthoCamera;
pub use render::{RenderBackend, RenderRequest, RenderSettings, SoftwareRasterizer};
pub use atlas::{AtlasLayout, ChannelMask, PixelBuffer, TextureAtlas, TextureFormat};
pub use mesher::{build_billboard_mesh, Mesh, Vertex};
pub use bake::{BakePass, BakeReport, BakeWarning, Baker, BillboardAsset, BillboardOutput, BillboardRenderSettings, TextureSlot};
pub use export::{export_glb, export_material_descriptor, export_obj, write_bundle, MeshFormat, ObjExport};
