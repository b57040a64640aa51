//! glTF/GLB export.
//!
//! glTF is right-handed with the texture origin at the top left, so positions
//! and normals have Z negated, triangles are rewound, and V is flipped.

use crate::bake::BillboardOutput;
use crate::error::{BakerError, Result};
use crate::material::CUTOFF_PROPERTY;
use crate::mesher::Mesh;
use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;

/// Export a baked billboard to GLB format (binary glTF).
///
/// The first texture slot's atlas is embedded and used as the base color of an
/// alpha-masked, double-sided material whose cutoff is the material's `_Cutoff`.
pub fn export_glb(output: &BillboardOutput) -> Result<Vec<u8>> {
    let mesh = match &output.mesh {
        Some(generated) if !generated.mesh.is_empty() => &generated.mesh,
        _ => return Err(BakerError::Export("Cannot export empty mesh".to_string())),
    };
    let cutoff = output
        .material
        .as_ref()
        .and_then(|m| m.material.float(CUTOFF_PROPERTY));
    let texture_png = output
        .textures
        .first()
        .map(|t| t.atlas.to_png())
        .transpose()?;

    let data = GltfMeshData::from_mesh(mesh);

    // Build the binary buffer
    let mut buffer_data: Vec<u8> = Vec::new();
    let pos_offset = buffer_data.len();
    buffer_data.extend(f32_bytes(&data.positions));
    let norm_offset = buffer_data.len();
    buffer_data.extend(f32_bytes(&data.normals));
    let uv_offset = buffer_data.len();
    buffer_data.extend(f32_bytes(&data.uvs));
    let idx_offset = buffer_data.len();
    buffer_data.extend(data.indices.iter().flat_map(|i| i.to_le_bytes()));
    let idx_end = buffer_data.len();

    let mut buffer_views = vec![
        create_buffer_view(pos_offset, norm_offset - pos_offset, Some(json::buffer::Target::ArrayBuffer)),
        create_buffer_view(norm_offset, uv_offset - norm_offset, Some(json::buffer::Target::ArrayBuffer)),
        create_buffer_view(uv_offset, idx_offset - uv_offset, Some(json::buffer::Target::ArrayBuffer)),
        create_buffer_view(idx_offset, idx_end - idx_offset, Some(json::buffer::Target::ElementArrayBuffer)),
    ];

    let vertex_count = mesh.vertex_count();
    let accessors = vec![
        create_accessor(0, vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, Some(data.min), Some(data.max)),
        create_accessor(1, vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, None, None),
        create_accessor(2, vertex_count, json::accessor::Type::Vec2, json::accessor::ComponentType::F32, None, None),
        create_accessor(3, data.indices.len(), json::accessor::Type::Scalar, json::accessor::ComponentType::U32, None, None),
    ];

    // Atlas texture image (aligned to 4 bytes)
    let mut images = Vec::new();
    let mut textures = Vec::new();
    let mut samplers = Vec::new();
    if let Some(png) = &texture_png {
        let padding = (4 - (buffer_data.len() % 4)) % 4;
        buffer_data.extend(std::iter::repeat(0u8).take(padding));
        let image_offset = buffer_data.len();
        buffer_data.extend_from_slice(png);

        buffer_views.push(create_buffer_view(image_offset, png.len(), None));
        images.push(json::Image {
            buffer_view: Some(json::Index::new(buffer_views.len() as u32 - 1)),
            mime_type: Some(json::image::MimeType("image/png".to_string())),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        });
        samplers.push(json::texture::Sampler {
            mag_filter: Some(Valid(json::texture::MagFilter::Linear)),
            min_filter: Some(Valid(json::texture::MinFilter::LinearMipmapLinear)),
            wrap_s: Valid(json::texture::WrappingMode::ClampToEdge),
            wrap_t: Valid(json::texture::WrappingMode::ClampToEdge),
            extensions: Default::default(),
            extras: Default::default(),
        });
        textures.push(json::Texture {
            sampler: Some(json::Index::new(0)),
            source: json::Index::new(0),
            extensions: Default::default(),
            extras: Default::default(),
        });
    }

    let root = json::Root {
        accessors,
        buffers: vec![json::Buffer {
            byte_length: USize64(buffer_data.len() as u64),
            extensions: Default::default(),
            extras: Default::default(),
            uri: None,
        }],
        buffer_views,
        images,
        samplers,
        textures,
        materials: vec![create_material(texture_png.is_some(), cutoff)],
        meshes: vec![json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            primitives: vec![create_primitive()],
            weights: None,
        }],
        nodes: vec![json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(json::Index::new(0)),
            rotation: None,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        }],
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            nodes: vec![json::Index::new(0)],
        }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    // Serialize JSON
    let json_string = json::serialize::to_string(&root)
        .map_err(|e| BakerError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;

    Ok(write_glb(json_string.as_bytes(), &buffer_data))
}

/// Vertex data converted to glTF conventions.
struct GltfMeshData {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    min: [f32; 3],
    max: [f32; 3],
}

impl GltfMeshData {
    fn from_mesh(mesh: &Mesh) -> Self {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        let mut positions = Vec::with_capacity(mesh.vertex_count() * 3);
        let mut normals = Vec::with_capacity(mesh.vertex_count() * 3);
        let mut uvs = Vec::with_capacity(mesh.vertex_count() * 2);

        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            let p = [x, y, -z];
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            positions.extend_from_slice(&p);

            let [nx, ny, nz] = vertex.normal;
            normals.extend_from_slice(&[nx, ny, -nz]);

            let [u, v] = vertex.uv;
            uvs.extend_from_slice(&[u, 1.0 - v]);
        }

        // Mirroring Z flips handedness; swap two corners to keep each face's side.
        let indices = mesh
            .indices
            .chunks_exact(3)
            .flat_map(|tri| [tri[0], tri[2], tri[1]])
            .collect();

        Self {
            positions,
            normals,
            uvs,
            indices,
            min,
            max,
        }
    }
}

/// Assemble the GLB container from a JSON chunk and a BIN chunk.
fn write_glb(json_bytes: &[u8], buffer_data: &[u8]) -> Vec<u8> {
    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    // Pad buffer to 4-byte alignment
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    let total_size = 12 + // GLB header
        8 + padded_json_len + // JSON chunk
        8 + padded_buffer_len; // BIN chunk

    let mut glb = Vec::with_capacity(total_size);

    // GLB Header
    glb.extend_from_slice(b"glTF"); // magic
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&(total_size as u32).to_le_bytes()); // length

    // JSON Chunk
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // chunk type: JSON
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat(0x20u8).take(json_padding)); // padding (spaces)

    // BIN Chunk
    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // chunk type: BIN
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat(0u8).take(buffer_padding));

    glb
}

fn f32_bytes(values: &[f32]) -> impl Iterator<Item = u8> + '_ {
    values.iter().flat_map(|v| v.to_le_bytes())
}

/// Create a buffer view.
fn create_buffer_view(
    offset: usize,
    size: usize,
    target: Option<json::buffer::Target>,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(size as u64),
        byte_offset: Some(USize64(offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        target: target.map(Valid),
    }
}

/// Create an accessor.
fn create_accessor(
    buffer_view: u32,
    count: usize,
    type_: json::accessor::Type,
    component_type: json::accessor::ComponentType,
    min: Option<[f32; 3]>,
    max: Option<[f32; 3]>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(buffer_view)),
        byte_offset: Some(USize64(0)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: min.map(|m| json::Value::from(m.to_vec())),
        max: max.map(|m| json::Value::from(m.to_vec())),
        normalized: false,
        sparse: None,
    }
}

/// The single billboard primitive: accessors 0-2 are attributes, 3 is indices.
fn create_primitive() -> json::mesh::Primitive {
    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(Valid(json::mesh::Semantic::Positions), json::Index::new(0));
    attributes.insert(Valid(json::mesh::Semantic::Normals), json::Index::new(1));
    attributes.insert(Valid(json::mesh::Semantic::TexCoords(0)), json::Index::new(2));

    json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(json::Index::new(3)),
        material: Some(json::Index::new(0)),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    }
}

/// Alpha-masked, double-sided material, textured with texture 0 when present.
fn create_material(textured: bool, cutoff: Option<f32>) -> json::Material {
    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: textured.then(|| json::texture::Info {
                index: json::Index::new(0),
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            base_color_factor: json::material::PbrBaseColorFactor([1.0, 1.0, 1.0, 1.0]),
            metallic_factor: json::material::StrengthFactor(0.0),
            roughness_factor: json::material::StrengthFactor(1.0),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(json::material::AlphaMode::Mask),
        alpha_cutoff: cutoff.map(json::material::AlphaCutoff),
        double_sided: true,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    }
}
