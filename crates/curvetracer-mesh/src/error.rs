//! Error types for surface meshes.

use thiserror::Error;

/// Errors that can occur while building a surface mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Vertex or index arrays are malformed.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, mesh has {vertices}")]
    IndexOutOfRange {
        /// Triangle index.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices.
        vertices: usize,
    },
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
