//! Picks the single mesh and material a billboard is baked from.

use super::{MeshRenderer, SourceMesh, SourceObject};
use crate::error::{BakerError, MissingGeometry, Result};
use crate::material::Material;
use crate::types::Bounds;
use serde::{Deserialize, Serialize};

/// Which LOD level to bake from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LodSelection {
    /// Count levels from the least detailed end.
    pub pick_from_end: bool,
    /// Offset from the chosen end.
    pub level_index: usize,
}

impl Default for LodSelection {
    fn default() -> Self {
        Self {
            pick_from_end: true,
            level_index: 0,
        }
    }
}

impl LodSelection {
    /// Resolve the level index for a group of `levels` levels.
    fn resolve(&self, levels: usize) -> std::result::Result<usize, MissingGeometry> {
        let index = if self.pick_from_end {
            levels as i64 - 1 - self.level_index as i64
        } else {
            self.level_index as i64
        };

        if index < 0 || index >= levels as i64 {
            return Err(MissingGeometry::LodLevelOutOfRange { index, levels });
        }
        Ok(index as usize)
    }
}

/// The geometry chosen for a bake.
#[derive(Debug, Clone, Copy)]
pub struct SelectedGeometry<'a> {
    pub renderer: &'a str,
    pub mesh: &'a SourceMesh,
    pub material: &'a Material,
    /// Bounds of `mesh` in object space.
    pub bounds: Bounds,
}

/// Resolve `source` to one mesh, one material, and the mesh bounds.
///
/// With an LOD group the renderer comes from the selected level; without one,
/// the first renderer in the hierarchy is used.
pub fn select_geometry(source: &SourceObject, selection: LodSelection) -> Result<SelectedGeometry<'_>> {
    let renderer = find_renderer(source, selection).map_err(report)?;

    let mesh = renderer.mesh.as_ref().ok_or_else(|| {
        report(MissingGeometry::NoMesh {
            renderer: renderer.name.clone(),
        })
    })?;
    let material = renderer.material.as_ref().ok_or_else(|| {
        report(MissingGeometry::NoMaterial {
            renderer: renderer.name.clone(),
        })
    })?;
    let bounds = mesh.bounds().ok_or_else(|| {
        report(MissingGeometry::EmptyMesh {
            mesh: mesh.name.clone(),
        })
    })?;

    log::debug!(
        "Selected renderer '{}' (mesh '{}', {} vertices, material '{}')",
        renderer.name,
        mesh.name,
        mesh.vertex_count(),
        material.name
    );

    Ok(SelectedGeometry {
        renderer: &renderer.name,
        mesh,
        material,
        bounds,
    })
}

fn find_renderer(
    source: &SourceObject,
    selection: LodSelection,
) -> std::result::Result<&MeshRenderer, MissingGeometry> {
    // Only the first renderer of a level is baked.
    if let Some(group) = source.find_lod_group() {
        if group.levels.is_empty() {
            return Err(MissingGeometry::NoLodLevels);
        }
        let level = selection.resolve(group.levels.len())?;
        return group.levels[level]
            .renderers
            .first()
            .ok_or(MissingGeometry::NoLodRenderer { level });
    }

    source.find_renderer().ok_or(MissingGeometry::NoRenderer)
}

fn report(missing: MissingGeometry) -> BakerError {
    log::error!("Cannot bake billboard: {}", missing);
    BakerError::MissingGeometry(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShaderRef;
    use crate::source::{Component, LodGroup, LodLevel, SceneNode};

    fn renderer(name: &str, height: f32) -> MeshRenderer {
        MeshRenderer::new(
            name,
            SourceMesh::cuboid(name, [0.0; 3], [1.0, height, 1.0]),
            Material::new(name, ShaderRef::default()),
        )
    }

    fn lod_tree() -> SceneNode {
        let levels = (0..3)
            .map(|i| LodLevel {
                renderers: vec![renderer(&format!("lod{}", i), (i + 1) as f32)],
            })
            .collect();
        SceneNode::new("tree")
            .with_component(Component::LodGroup(LodGroup { levels }))
            .with_child(SceneNode::new("plain").with_component(Component::Renderer(renderer("plain", 9.0))))
    }

    fn missing(err: BakerError) -> MissingGeometry {
        match err {
            BakerError::MissingGeometry(m) => m,
            other => panic!("expected MissingGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_pick_last_lod() {
        let tree = lod_tree();
        let selected = select_geometry(&tree, LodSelection::default()).unwrap();
        assert_eq!(selected.renderer, "lod2");
        assert_eq!(selected.bounds.size().y, 3.0);
    }

    #[test]
    fn test_pick_from_end_with_offset() {
        let tree = lod_tree();
        let selection = LodSelection {
            pick_from_end: true,
            level_index: 1,
        };
        assert_eq!(select_geometry(&tree, selection).unwrap().renderer, "lod1");
    }

    #[test]
    fn test_pick_from_start() {
        let tree = lod_tree();
        let selection = LodSelection {
            pick_from_end: false,
            level_index: 0,
        };
        assert_eq!(select_geometry(&tree, selection).unwrap().renderer, "lod0");
    }

    #[test]
    fn test_out_of_range_level() {
        let tree = lod_tree();
        let selection = LodSelection {
            pick_from_end: true,
            level_index: 3,
        };
        let err = select_geometry(&tree, selection).unwrap_err();
        assert_eq!(
            missing(err),
            MissingGeometry::LodLevelOutOfRange { index: -1, levels: 3 }
        );
    }

    #[test]
    fn test_fallback_without_lod_group() {
        let tree = SceneNode::new("bush")
            .with_child(SceneNode::new("mesh").with_component(Component::Renderer(renderer("bush", 2.0))));
        let selected = select_geometry(&tree, LodSelection::default()).unwrap();
        assert_eq!(selected.renderer, "bush");
        assert_eq!(selected.mesh.name, "bush");
    }

    #[test]
    fn test_distinct_failures() {
        let empty = SceneNode::new("empty");
        assert_eq!(
            missing(select_geometry(&empty, LodSelection::default()).unwrap_err()),
            MissingGeometry::NoRenderer
        );

        let no_levels = SceneNode::new("lod").with_component(Component::LodGroup(LodGroup::default()));
        assert_eq!(
            missing(select_geometry(&no_levels, LodSelection::default()).unwrap_err()),
            MissingGeometry::NoLodLevels
        );

        let empty_level = SceneNode::new("lod").with_component(Component::LodGroup(LodGroup {
            levels: vec![LodLevel::default()],
        }));
        assert_eq!(
            missing(select_geometry(&empty_level, LodSelection::default()).unwrap_err()),
            MissingGeometry::NoLodRenderer { level: 0 }
        );

        let mut no_mesh = renderer("r", 1.0);
        no_mesh.mesh = None;
        let tree = SceneNode::new("n").with_component(Component::Renderer(no_mesh));
        assert_eq!(
            missing(select_geometry(&tree, LodSelection::default()).unwrap_err()),
            MissingGeometry::NoMesh { renderer: "r".into() }
        );

        let mut no_material = renderer("r", 1.0);
        no_material.material = None;
        let tree = SceneNode::new("n").with_component(Component::Renderer(no_material));
        assert_eq!(
            missing(select_geometry(&tree, LodSelection::default()).unwrap_err()),
            MissingGeometry::NoMaterial { renderer: "r".into() }
        );

        let mut empty_mesh = renderer("r", 1.0);
        empty_mesh.mesh = Some(SourceMesh::new("void"));
        let tree = SceneNode::new("n").with_component(Component::Renderer(empty_mesh));
        assert_eq!(
            missing(select_geometry(&tree, LodSelection::default()).unwrap_err()),
            MissingGeometry::EmptyMesh { mesh: "void".into() }
        );
    }
}
