//! Error types for the curvetracer routines.

use curvetracer_mesh::MeshError;
use curvetracer_volume::VolumeError;
use thiserror::Error;

/// Errors reported by the sampling and entry angle routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveTracerError {
    /// Required input is missing or unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The first intersected triangle has zero area, so it has no normal.
    #[error("triangle {triangle} is degenerate (zero area)")]
    DegenerateGeometry {
        /// Index of the triangle in its mesh.
        triangle: usize,
    },

    /// Volume construction or sampling failed.
    #[error(transparent)]
    Volume(#[from] VolumeError),

    /// Mesh construction failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A per-structure computation failed.
    #[error("structure '{name}': {source}")]
    Structure {
        /// Structure name.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<CurveTracerError>,
    },
}

impl CurveTracerError {
    /// Wrap this error with the name of the structure being processed.
    pub fn in_structure(self, name: impl Into<String>) -> Self {
        CurveTracerError::Structure {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

/// Result type for curvetracer operations.
pub type Result<T> = std::result::Result<T, CurveTracerError>;
