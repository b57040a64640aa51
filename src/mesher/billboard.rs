//! The crossed-quad billboard mesh.
//!
//! Two planes through the object's bounds: one spanning X/Y at z = 0 and one
//! spanning Z/Y at x = 0. Each plane is drawn as two single-sided quads facing
//! opposite ways, so every viewing angle sees two of the four atlas views.

use super::geometry::{Mesh, Vertex};
use crate::types::Bounds;

/// Number of vertices in a billboard mesh.
pub const BILLBOARD_VERTEX_COUNT: usize = 16;

/// Triangle list of the four quads. The last two quads are wound the other way
/// so they face the opposite side of their plane.
pub const BILLBOARD_INDICES: [u32; 24] = [
    0, 1, 2, 0, 2, 3, //
    4, 5, 6, 4, 6, 7, //
    11, 10, 8, 10, 9, 8, //
    15, 14, 12, 14, 13, 12,
];

/// Build a new billboard mesh for `bounds`.
pub fn build_billboard_mesh(bounds: &Bounds) -> Mesh {
    let mut mesh = Mesh::new();
    build_billboard_into(&mut mesh, bounds);
    mesh
}

/// Overwrite `mesh` with the billboard for `bounds`, reusing its buffers.
pub fn build_billboard_into(mesh: &mut Mesh, bounds: &Bounds) {
    mesh.clear();

    let c = bounds.center;
    let e = bounds.extents;
    let wc = bounds.width_comparison();

    let xy_plane = [
        [c.x - e.x, c.y - e.y, 0.0],
        [c.x + e.x, c.y - e.y, 0.0],
        [c.x + e.x, c.y + e.y, 0.0],
        [c.x - e.x, c.y + e.y, 0.0],
    ];
    let zy_plane = [
        [0.0, c.y - e.y, c.z - e.z],
        [0.0, c.y - e.y, c.z + e.z],
        [0.0, c.y + e.y, c.z + e.z],
        [0.0, c.y + e.y, c.z - e.z],
    ];

    // (corners, uvs) per quad: Back, Right, Forward, Left.
    let quads: [([[f32; 3]; 4], [[f32; 2]; 4]); 4] = [
        (xy_plane, [[0.0, 0.0], [wc, 0.0], [wc, 0.5], [0.0, 0.5]]),
        (zy_plane, [[wc, 0.0], [1.0, 0.0], [1.0, 0.5], [wc, 0.5]]),
        (xy_plane, [[wc, 0.5], [0.0, 0.5], [0.0, 1.0], [wc, 1.0]]),
        (zy_plane, [[1.0, 0.5], [wc, 0.5], [wc, 1.0], [1.0, 1.0]]),
    ];

    for (corners, uvs) in quads {
        for (position, uv) in corners.into_iter().zip(uvs) {
            mesh.add_vertex(Vertex::new(position, [0.0; 3], uv));
        }
    }
    mesh.indices.extend_from_slice(&BILLBOARD_INDICES);

    mesh.recalculate_bounds();
    mesh.recalculate_normals();
}
