//! Wavefront OBJ export.
//!
//! OBJ is a simple, widely-supported text-based 3D format. Texture V already
//! runs bottom-up, so UVs are written as generated.

use super::texture_file_name;
use crate::bake::BillboardOutput;
use crate::error::{BakerError, Result};
use crate::material::CUTOFF_PROPERTY;
use crate::mesher::Mesh;
use std::fmt::Write;

/// Export a baked billboard to OBJ format.
/// Returns (obj_content, mtl_content) as strings.
/// The MTL references the atlases by the names [`texture_file_name`] gives them.
pub fn export_obj(output: &BillboardOutput, name: &str) -> Result<(String, String)> {
    let mesh = match &output.mesh {
        Some(generated) if !generated.mesh.is_empty() => &generated.mesh,
        _ => return Err(BakerError::Export("Cannot export empty mesh".to_string())),
    };

    // ~60 bytes per vertex line (v/vt/vn) x 3 + ~40 per face
    let mut obj = String::with_capacity(256 + mesh.vertex_count() * 180 + mesh.triangle_count() * 40);
    let mut mtl = String::with_capacity(512);

    write_obj(&mut obj, mesh, name).map_err(fmt_error)?;
    write_mtl(&mut mtl, output, name).map_err(fmt_error)?;

    Ok((obj, mtl))
}

fn fmt_error(e: std::fmt::Error) -> BakerError {
    BakerError::Export(format!("Failed to format OBJ: {}", e))
}

fn write_obj(obj: &mut String, mesh: &Mesh, name: &str) -> std::fmt::Result {
    writeln!(obj, "# Billboard Baker OBJ Export")?;
    writeln!(obj, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(obj, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(obj)?;

    writeln!(obj, "mtllib {}.mtl", name)?;
    writeln!(obj, "o {}", name)?;
    writeln!(obj)?;

    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.position;
        writeln!(obj, "v {} {} {}", x, y, z)?;
    }
    writeln!(obj)?;

    for vertex in &mesh.vertices {
        writeln!(obj, "vt {} {}", vertex.uv[0], vertex.uv[1])?;
    }
    writeln!(obj)?;

    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.normal;
        writeln!(obj, "vn {} {} {}", x, y, z)?;
    }
    writeln!(obj)?;

    // One-based, and position/uv/normal share an index.
    writeln!(obj, "usemtl {}_material", name)?;
    for tri in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(obj, "f {0}/{0}/{0} {1}/{1}/{1} {2}/{2}/{2}", i0, i1, i2)?;
    }

    Ok(())
}

fn write_mtl(mtl: &mut String, output: &BillboardOutput, name: &str) -> std::fmt::Result {
    writeln!(mtl, "# Billboard Baker Material")?;
    writeln!(mtl)?;

    writeln!(mtl, "newmtl {}_material", name)?;
    writeln!(mtl, "Ka 1.0 1.0 1.0")?;
    writeln!(mtl, "Kd 1.0 1.0 1.0")?;
    writeln!(mtl, "Ks 0.0 0.0 0.0")?;
    writeln!(mtl, "Ns 10.0")?;
    writeln!(mtl, "d 1.0")?;
    writeln!(mtl, "illum 1")?;

    if let Some(cutoff) = output
        .material
        .as_ref()
        .and_then(|m| m.material.float(CUTOFF_PROPERTY))
    {
        writeln!(mtl, "# alpha cutoff {}", cutoff)?;
    }

    let mut textures = output.textures.iter();
    if let Some(main) = textures.next() {
        let file = texture_file_name(name, &main.texture_id);
        writeln!(mtl, "map_Kd {}", file)?;
        if main.atlas.format.has_alpha() {
            writeln!(mtl, "map_d {}", file)?;
        }
    }
    // OBJ has no generic texture slots; the rest are listed for reference.
    for texture in textures {
        writeln!(
            mtl,
            "# {} {}",
            texture.texture_id,
            texture_file_name(name, &texture.texture_id)
        )?;
    }

    Ok(())
}

/// A named texture file for OBJ export.
pub struct ObjTexture {
    /// Filename for this texture (e.g., "tree_MainTex.png").
    pub filename: String,
    /// PNG-encoded texture data.
    pub png_data: Vec<u8>,
}

/// OBJ, MTL and atlas bytes for writing to files.
pub struct ObjExport {
    pub obj: String,
    pub mtl: String,
    /// One PNG per texture slot, in slot order.
    pub textures: Vec<ObjTexture>,
}

impl ObjExport {
    pub fn from_output(output: &BillboardOutput, name: &str) -> Result<Self> {
        let (obj, mtl) = export_obj(output, name)?;
        let textures = output
            .textures
            .iter()
            .map(|t| -> Result<ObjTexture> {
                Ok(ObjTexture {
                    filename: texture_file_name(name, &t.texture_id),
                    png_data: t.atlas.to_png()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { obj, mtl, textures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::GeneratedMesh;
    use crate::export::testing::baked_output;
    use crate::mesher::Vertex;
    use crate::types::AssetId;

    #[test]
    fn test_export_simple_obj() {
        let mut mesh = Mesh::new();

        // Create a simple triangle
        let v0 = mesh.add_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0]));
        mesh.add_triangle(v0, v1, v2);

        let output = BillboardOutput {
            mesh: Some(GeneratedMesh {
                id: AssetId::next(),
                name: "test".to_string(),
                mesh,
            }),
            ..Default::default()
        };

        let (obj, mtl) = export_obj(&output, "test").unwrap();

        assert!(obj.contains("v 0 0 0"));
        assert!(obj.contains("vt 0 0"));
        assert!(obj.contains("vn 0 1 0"));
        assert!(obj.contains("f 1/1/1 2/2/2 3/3/3"));
        assert!(mtl.contains("newmtl test_material"));
        assert!(!mtl.contains("map_Kd"));
    }

    #[test]
    fn test_export_baked_billboard() {
        let output = baked_output();
        let (obj, mtl) = export_obj(&output, "tree").unwrap();

        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 16);
        assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 8);
        assert!(obj.contains("mtllib tree.mtl"));

        assert!(mtl.contains("map_Kd tree_MainTex.png"));
        assert!(mtl.contains("map_d tree_MainTex.png"));
        assert!(mtl.contains("# _NormalMap tree_NormalMap.png"));
        assert!(mtl.contains("# alpha cutoff 0.15"));
    }

    #[test]
    fn test_obj_export_textures() {
        let export = ObjExport::from_output(&baked_output(), "tree").unwrap();
        let names: Vec<&str> = export.textures.iter().map(|t| t.filename.as_str()).collect();
        assert_eq!(names, ["tree_MainTex.png", "tree_NormalMap.png"]);
        assert!(export.textures.iter().all(|t| t.png_data.starts_with(b"\x89PNG")));
    }

    #[test]
    fn test_export_empty_output_fails() {
        assert!(export_obj(&BillboardOutput::default(), "tree").is_err());
    }
}
