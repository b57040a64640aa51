//! Source objects to bake from.
//!
//! An object is a tree of [`SceneNode`]s. Nodes carry components: mesh
//! renderers, and optionally an LOD group listing alternative renderers per
//! level of detail. The selector walks this tree to find what to bake.

pub mod selector;

pub use selector::{select_geometry, LodSelection, SelectedGeometry};

use crate::material::Material;
use crate::types::Bounds;
use serde::{Deserialize, Serialize};

/// Triangle mesh geometry of a source object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMesh {
    #[serde(default)]
    pub name: String,
    /// Vertex positions in object space.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals. May be empty, in which case face normals are used.
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (three per triangle).
    #[serde(default)]
    pub indices: Vec<u32>,
}

impl SourceMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Bounds of all vertex positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions.iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.positions.len()
    }

    /// An axis-aligned box with per-face normals (24 vertices, 12 triangles).
    pub fn cuboid(name: impl Into<String>, min: [f32; 3], max: [f32; 3]) -> Self {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;

        // Each face: normal, then corners wound clockwise when seen from outside.
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, -1.0], [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
            ([0.0, 0.0, 1.0], [[x1, y0, z1], [x1, y1, z1], [x0, y1, z1], [x0, y0, z1]]),
            ([-1.0, 0.0, 0.0], [[x0, y0, z1], [x0, y1, z1], [x0, y1, z0], [x0, y0, z0]]),
            ([1.0, 0.0, 0.0], [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
            ([0.0, 1.0, 0.0], [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
            ([0.0, -1.0, 0.0], [[x0, y0, z1], [x0, y0, z0], [x1, y0, z0], [x1, y0, z1]]),
        ];

        let mut mesh = Self::new(name);
        for (normal, corners) in faces {
            let base = mesh.positions.len() as u32;
            mesh.positions.extend_from_slice(&corners);
            mesh.normals.extend_from_slice(&[normal; 4]);
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }
}

/// A renderer pairing a mesh with a material. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshRenderer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mesh: Option<SourceMesh>,
    #[serde(default)]
    pub material: Option<Material>,
}

impl MeshRenderer {
    pub fn new(name: impl Into<String>, mesh: SourceMesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            material: Some(material),
        }
    }
}

/// One level of detail: the renderers shown at that level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LodLevel {
    #[serde(default)]
    pub renderers: Vec<MeshRenderer>,
}

/// Ordered levels of detail, most detailed first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LodGroup {
    #[serde(default)]
    pub levels: Vec<LodLevel>,
}

/// A capability attached to a scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Renderer(MeshRenderer),
    LodGroup(LodGroup),
}

/// A node in a source object's hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

/// The root of an object to bake.
pub type SourceObject = SceneNode;

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search (this node first, then children in order) for the
    /// first component `pick` accepts.
    pub fn find_first<'a, T, F>(&'a self, pick: &F) -> Option<&'a T>
    where
        F: Fn(&'a Component) -> Option<&'a T>,
    {
        self.components
            .iter()
            .find_map(pick)
            .or_else(|| self.children.iter().find_map(|child| child.find_first(pick)))
    }

    /// First LOD group in this subtree.
    pub fn find_lod_group(&self) -> Option<&LodGroup> {
        self.find_first(&|c| match c {
            Component::LodGroup(group) => Some(group),
            _ => None,
        })
    }

    /// First mesh renderer in this subtree.
    pub fn find_renderer(&self) -> Option<&MeshRenderer> {
        self.find_first(&|c| match c {
            Component::Renderer(renderer) => Some(renderer),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShaderRef;

    fn renderer(name: &str) -> MeshRenderer {
        MeshRenderer::new(
            name,
            SourceMesh::cuboid(name, [0.0; 3], [1.0; 3]),
            Material::new(name, ShaderRef::default()),
        )
    }

    #[test]
    fn test_cuboid() {
        let mesh = SourceMesh::cuboid("box", [-1.0, 0.0, -0.5], [1.0, 4.0, 0.5]);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.has_normals());

        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.size().to_array(), [2.0, 4.0, 1.0]);
    }

    #[test]
    fn test_find_first_prefers_self_then_children_in_order() {
        let tree = SceneNode::new("root")
            .with_child(
                SceneNode::new("a")
                    .with_child(SceneNode::new("a1").with_component(Component::Renderer(renderer("deep")))),
            )
            .with_child(SceneNode::new("b").with_component(Component::Renderer(renderer("shallow"))));

        assert_eq!(tree.find_renderer().unwrap().name, "deep");

        let tree = tree.with_component(Component::Renderer(renderer("root")));
        assert_eq!(tree.find_renderer().unwrap().name, "root");
    }

    #[test]
    fn test_find_lod_group_missing() {
        let tree = SceneNode::new("root").with_component(Component::Renderer(renderer("r")));
        assert!(tree.find_lod_group().is_none());
    }

    #[test]
    fn test_deserialize_tree() {
        let json = r#"{
            "name": "tree",
            "components": [
                {"type": "lod_group", "levels": [{"renderers": [{"name": "lod0"}]}]}
            ],
            "children": [
                {"name": "trunk", "components": [{"type": "renderer", "name": "trunk"}]}
            ]
        }"#;
        let node: SceneNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.find_lod_group().unwrap().levels.len(), 1);
        assert_eq!(node.find_renderer().unwrap().name, "trunk");
    }
}
