//! Trace error types.

use tetwalk_math::Point3;
use tetwalk_mesh::{FaceId, TetId};
use thiserror::Error;

/// Precondition violations detected before or during a walk.
///
/// Degenerate geometry and an exhausted step budget are not errors; they
/// come back as [`crate::Terminal`] values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    /// The start tetrahedron handle is not part of the mesh.
    #[error("unknown tetrahedron {0}")]
    UnknownTetrahedron(TetId),

    /// A tetrahedron refers to a face the mesh does not hold.
    #[error("unknown face {0}")]
    UnknownFace(FaceId),

    /// The ray origin does not lie inside the start tetrahedron.
    #[error("origin {origin} is not inside start tetrahedron {tet}")]
    OriginOutsideStart {
        /// Requested start tetrahedron.
        tet: TetId,
        /// Ray origin.
        origin: Point3,
    },

    /// The target of a point-seeking walk lies outside the mesh bounds.
    #[error("target {0} lies outside the mesh")]
    TargetOutsideMesh(Point3),
}

/// Result type for trace operations.
pub type Result<T> = std::result::Result<T, TraceError>;
