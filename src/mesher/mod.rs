//! Billboard mesh generation.

pub mod billboard;
pub mod geometry;

pub use billboard::{build_billboard_into, build_billboard_mesh, BILLBOARD_INDICES, BILLBOARD_VERTEX_COUNT};
pub use geometry::{Mesh, Vertex};
