//! Mesh records.

use serde::{Deserialize, Serialize};
use tetwalk_math::Point3;

use crate::{EdgeId, FaceId, NodeId, TetId};

/// A mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Handle of this node.
    pub id: NodeId,
    /// Position in space.
    pub position: Point3,
}

/// A triangular face shared by at most two tetrahedra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Handle of this face.
    pub id: FaceId,
    /// Corner nodes.
    pub nodes: [NodeId; 3],
    /// Internal partition (e.g. material interface) where walks stop.
    pub is_constrained: bool,
    /// Outer boundary of the domain.
    pub is_wall: bool,
}

impl Face {
    /// Node set in ascending order, independent of winding.
    pub fn sorted_nodes(&self) -> [NodeId; 3] {
        sorted3(self.nodes)
    }
}

/// A tetrahedron with its faces and neighbors.
///
/// Local slot `i` of `faces` and `neighbors` is the face opposite
/// `nodes[i]` and the tetrahedron across it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tetrahedron {
    /// Handle of this tetrahedron.
    pub id: TetId,
    /// Corner nodes, in the orientation given by the mesh generator.
    pub nodes: [NodeId; 4],
    /// Face opposite each corner.
    pub faces: [FaceId; 4],
    /// Tetrahedron across each face; `None` on the mesh boundary.
    pub neighbors: [Option<TetId>; 4],
}

impl Tetrahedron {
    /// Sorted node set of the face opposite local node `slot`.
    pub fn opposite_nodes(&self, slot: usize) -> [NodeId; 3] {
        opposite_nodes(&self.nodes, slot)
    }

    /// Local slot whose neighbor is `other`.
    pub fn slot_of_neighbor(&self, other: TetId) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == Some(other))
    }
}

/// An edge between two nodes. Stored for completeness; walks ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Handle of this edge.
    pub id: EdgeId,
    /// End nodes.
    pub nodes: [NodeId; 2],
}

/// Sorted node set of the triangle opposite local node `slot`.
pub(crate) fn opposite_nodes(nodes: &[NodeId; 4], slot: usize) -> [NodeId; 3] {
    let mut out = [nodes[0]; 3];
    let mut k = 0;
    for (i, &n) in nodes.iter().enumerate() {
        if i != slot {
            out[k] = n;
            k += 1;
        }
    }
    sorted3(out)
}

pub(crate) fn sorted3(mut nodes: [NodeId; 3]) -> [NodeId; 3] {
    nodes.sort_unstable();
    nodes
}
