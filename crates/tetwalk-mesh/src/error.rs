//! Error types for mesh construction and queries.

use tetwalk_math::Point3;
use thiserror::Error;

use crate::{FaceId, NodeId, TetId};

/// Errors that can occur while building or querying a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A setter or record referenced a slot beyond the declared count.
    #[error("{kind} index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Record kind ("node", "face", ...).
        kind: &'static str,
        /// Offending index.
        index: usize,
        /// Declared count for that kind.
        count: usize,
    },

    /// A declared record was never filled in.
    #[error("{kind} {index} was never set")]
    Unset {
        /// Record kind.
        kind: &'static str,
        /// Missing index.
        index: usize,
    },

    /// Declared count does not fit a 32-bit handle.
    #[error("{kind} count {count} exceeds the handle range")]
    CountTooLarge {
        /// Record kind.
        kind: &'static str,
        /// Requested count.
        count: usize,
    },

    /// A tetrahedron lists the same node twice.
    #[error("tetrahedron {tet} repeats node {node}")]
    DuplicateNode {
        /// Offending tetrahedron.
        tet: TetId,
        /// Repeated node.
        node: NodeId,
    },

    /// Neighbor relation is one-sided.
    #[error("tetrahedron {tet} lists {neighbor} in slot {slot}, but {neighbor} does not list {tet}")]
    AsymmetricAdjacency {
        /// Tetrahedron holding the reference.
        tet: TetId,
        /// Local slot of the reference.
        slot: usize,
        /// Referenced neighbor.
        neighbor: TetId,
    },

    /// Neighbor relation is mutual but the two sides disagree on the face.
    #[error("tetrahedron {tet} lists {neighbor} in slot {slot}, but they do not share that face")]
    NeighborMismatch {
        /// Tetrahedron holding the reference.
        tet: TetId,
        /// Local slot of the reference.
        slot: usize,
        /// Referenced neighbor.
        neighbor: TetId,
    },

    /// A face is shared by more than two tetrahedra.
    #[error("face {face} is used by {count} tetrahedra")]
    FaceOverused {
        /// Offending face.
        face: FaceId,
        /// Number of referencing tetrahedra.
        count: usize,
    },

    /// More than two tetrahedra share one triangle of nodes.
    #[error("triangle {nodes:?} is shared by {count} tetrahedra")]
    OverusedTriangle {
        /// Sorted node set of the triangle.
        nodes: [NodeId; 3],
        /// Number of tetrahedra sharing it.
        count: usize,
    },

    /// No face record matches the nodes of a tetrahedron slot.
    #[error("tetrahedron {tet} slot {slot}: no face record spans the opposite nodes")]
    UnknownFace {
        /// Tetrahedron being resolved.
        tet: TetId,
        /// Local slot.
        slot: usize,
    },

    /// A face assigned to a slot does not span the nodes opposite that slot.
    #[error("tetrahedron {tet} slot {slot}: face {face} is not opposite local node {slot}")]
    FaceMismatch {
        /// Tetrahedron being checked.
        tet: TetId,
        /// Local slot.
        slot: usize,
        /// Face stored in that slot.
        face: FaceId,
    },

    /// Point lies in no tetrahedron.
    #[error("no tetrahedron contains point {0}")]
    NotFound(Point3),

    /// Snapshot could not be (de)serialized.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl MeshError {
    pub(crate) fn out_of_range(kind: &'static str, index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { kind, index, count }
    }
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
