//! Error types for the billboard baker.

use thiserror::Error;

/// Result type alias using BakerError.
pub type Result<T> = std::result::Result<T, BakerError>;

/// Main error type for billboard baking operations.
#[derive(Error, Debug)]
pub enum BakerError {
    /// The source object could not be resolved to a single mesh and material.
    #[error("Missing geometry: {0}")]
    MissingGeometry(#[from] MissingGeometry),

    /// Source bounds cannot be mapped to a billboard (zero height or zero footprint).
    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    /// A camera could not be fitted for the requested view.
    #[error("Invalid view: {0}")]
    InvalidView(String),

    /// The bake settings contradict each other.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The render backend failed or returned an unexpected buffer.
    #[error("Render error: {0}")]
    Render(String),

    /// Failed to stitch or merge an atlas.
    #[error("Atlas building error: {0}")]
    AtlasBuild(String),

    /// A texture slot failed partway through a bake.
    #[error("Baking texture slot '{slot}' failed after {completed} completed slot(s): {source}")]
    SlotBake {
        slot: String,
        completed: usize,
        #[source]
        source: Box<BakerError>,
    },

    /// Failed to export a generated artifact.
    #[error("Export error: {0}")]
    Export(String),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The ways a source object can fail to yield a mesh and a material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissingGeometry {
    /// The object tree contains no mesh renderer at all.
    #[error("could not find a mesh renderer")]
    NoRenderer,

    /// The LOD group has no levels.
    #[error("LOD group has no levels")]
    NoLodLevels,

    /// The computed LOD level does not exist.
    #[error("LOD level {index} is out of range ({levels} level(s))")]
    LodLevelOutOfRange { index: i64, levels: usize },

    /// The picked LOD level holds no renderer.
    #[error("could not find a renderer on LOD level {level}")]
    NoLodRenderer { level: usize },

    /// The resolved renderer has no mesh.
    #[error("renderer '{renderer}' has no mesh")]
    NoMesh { renderer: String },

    /// The resolved renderer has no material.
    #[error("renderer '{renderer}' has no material")]
    NoMaterial { renderer: String },

    /// The resolved mesh has no vertices to take bounds from.
    #[error("mesh '{mesh}' has no vertices")]
    EmptyMesh { mesh: String },
}
