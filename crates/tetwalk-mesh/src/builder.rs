//! Incremental mesh construction and validation.
//!
//! Loaders declare counts, fill records by index, then call
//! [`MeshBuilder::build`], which checks every cross-reference once and
//! freezes the result into an immutable [`Mesh`].

use std::collections::HashMap;

use tetwalk_math::Point3;
use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::types::{opposite_nodes, sorted3, Edge, Face, Node, Tetrahedron};
use crate::{EdgeId, FaceId, Mesh, NodeId, TetId};

#[derive(Debug, Clone, Copy)]
struct FaceRecord {
    nodes: [NodeId; 3],
    is_constrained: bool,
    is_wall: bool,
}

/// Staging area for a [`Mesh`].
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    nodes: Vec<Option<Point3>>,
    faces: Vec<Option<FaceRecord>>,
    tet_nodes: Vec<Option<[NodeId; 4]>>,
    tet_faces: Vec<Option<[FaceId; 4]>>,
    tet_neighbors: Vec<Option<[Option<TetId>; 4]>>,
    edges: Vec<Option<[NodeId; 2]>>,
}

fn check_count(kind: &'static str, count: usize) -> Result<()> {
    if u32::try_from(count).is_err() {
        return Err(MeshError::CountTooLarge { kind, count });
    }
    Ok(())
}

fn slot_mut<'a, T>(
    kind: &'static str,
    slots: &'a mut [Option<T>],
    index: usize,
) -> Result<&'a mut Option<T>> {
    let count = slots.len();
    slots
        .get_mut(index)
        .ok_or_else(|| MeshError::out_of_range(kind, index, count))
}

fn check_ref(kind: &'static str, index: usize, count: usize) -> Result<()> {
    if index < count {
        Ok(())
    } else {
        Err(MeshError::out_of_range(kind, index, count))
    }
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the number of tetrahedra, discarding previous tetrahedron data.
    pub fn set_tetrahedron_count(&mut self, count: usize) -> Result<()> {
        check_count("tetrahedron", count)?;
        self.tet_nodes = vec![None; count];
        self.tet_faces = vec![None; count];
        self.tet_neighbors = vec![None; count];
        Ok(())
    }

    /// Set the corner nodes of tetrahedron `index`.
    pub fn set_tetrahedron(&mut self, index: usize, nodes: [NodeId; 4]) -> Result<()> {
        *slot_mut("tetrahedron", &mut self.tet_nodes, index)? = Some(nodes);
        Ok(())
    }

    /// Set the neighbors of tetrahedron `index`, slot `i` opposite node `i`.
    pub fn set_adjacency(&mut self, index: usize, neighbors: [Option<TetId>; 4]) -> Result<()> {
        *slot_mut("tetrahedron", &mut self.tet_neighbors, index)? = Some(neighbors);
        Ok(())
    }

    /// Set the faces of tetrahedron `index`, slot `i` opposite node `i`.
    pub fn set_face_topology(&mut self, index: usize, faces: [FaceId; 4]) -> Result<()> {
        *slot_mut("tetrahedron", &mut self.tet_faces, index)? = Some(faces);
        Ok(())
    }

    /// Declare the number of nodes.
    pub fn set_node_count(&mut self, count: usize) -> Result<()> {
        check_count("node", count)?;
        self.nodes = vec![None; count];
        Ok(())
    }

    /// Set the position of node `index`.
    pub fn set_node(&mut self, index: usize, position: Point3) -> Result<()> {
        *slot_mut("node", &mut self.nodes, index)? = Some(position);
        Ok(())
    }

    /// Declare the number of faces.
    pub fn set_face_count(&mut self, count: usize) -> Result<()> {
        check_count("face", count)?;
        self.faces = vec![None; count];
        Ok(())
    }

    /// Set the nodes and boundary flags of face `index`.
    pub fn set_face(
        &mut self,
        index: usize,
        nodes: [NodeId; 3],
        is_constrained: bool,
        is_wall: bool,
    ) -> Result<()> {
        *slot_mut("face", &mut self.faces, index)? = Some(FaceRecord {
            nodes,
            is_constrained,
            is_wall,
        });
        Ok(())
    }

    /// Declare the number of edges.
    pub fn set_edge_count(&mut self, count: usize) -> Result<()> {
        check_count("edge", count)?;
        self.edges = vec![None; count];
        Ok(())
    }

    /// Set the end nodes of edge `index`.
    pub fn set_edge(&mut self, index: usize, nodes: [NodeId; 2]) -> Result<()> {
        *slot_mut("edge", &mut self.edges, index)? = Some(nodes);
        Ok(())
    }

    /// Number of declared tetrahedra.
    pub fn tetrahedron_count(&self) -> usize {
        self.tet_nodes.len()
    }

    /// Fill every tetrahedron's face slots by matching node sets against
    /// the face records.
    ///
    /// Used when the generator did not emit a tetrahedron-to-face table.
    pub fn derive_face_topology(&mut self) -> Result<()> {
        let mut by_nodes: HashMap<[NodeId; 3], FaceId> = HashMap::with_capacity(self.faces.len());
        for (i, face) in self.faces.iter().enumerate() {
            let face = face.ok_or(MeshError::Unset { kind: "face", index: i })?;
            by_nodes.insert(sorted3(face.nodes), FaceId(i as u32));
        }

        for (i, nodes) in self.tet_nodes.iter().enumerate() {
            let nodes = nodes.ok_or(MeshError::Unset {
                kind: "tetrahedron",
                index: i,
            })?;
            let tet = TetId(i as u32);
            let mut faces = [FaceId(0); 4];
            for (slot, face) in faces.iter_mut().enumerate() {
                let key = opposite_nodes(&nodes, slot);
                *face = *by_nodes
                    .get(&key)
                    .ok_or(MeshError::UnknownFace { tet, slot })?;
            }
            self.tet_faces[i] = Some(faces);
        }

        debug!(tetrahedra = self.tet_nodes.len(), "derived face topology");
        Ok(())
    }

    /// Fill every tetrahedron's neighbor slots by pairing tetrahedra that
    /// share a triangle of nodes.
    pub fn derive_adjacency(&mut self) -> Result<()> {
        let mut by_nodes: HashMap<[NodeId; 3], Vec<(usize, usize)>> = HashMap::new();
        for (i, nodes) in self.tet_nodes.iter().enumerate() {
            let nodes = nodes.ok_or(MeshError::Unset {
                kind: "tetrahedron",
                index: i,
            })?;
            for slot in 0..4 {
                by_nodes.entry(opposite_nodes(&nodes, slot)).or_default().push((i, slot));
            }
        }

        let mut neighbors = vec![[None; 4]; self.tet_nodes.len()];
        for (nodes, users) in by_nodes {
            match users.as_slice() {
                [_] => {}
                [(a, sa), (b, sb)] => {
                    neighbors[*a][*sa] = Some(TetId(*b as u32));
                    neighbors[*b][*sb] = Some(TetId(*a as u32));
                }
                _ => {
                    return Err(MeshError::OverusedTriangle {
                        nodes,
                        count: users.len(),
                    })
                }
            }
        }

        for (slot, adj) in self.tet_neighbors.iter_mut().zip(neighbors) {
            *slot = Some(adj);
        }
        debug!(tetrahedra = self.tet_nodes.len(), "derived adjacency");
        Ok(())
    }

    /// Validate every reference and freeze the mesh.
    pub fn build(self) -> Result<Mesh> {
        let node_count = self.nodes.len();
        let face_count = self.faces.len();
        let tet_count = self.tet_nodes.len();

        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| {
                p.map(|position| Node {
                    id: NodeId(i as u32),
                    position,
                })
                .ok_or(MeshError::Unset { kind: "node", index: i })
            })
            .collect::<Result<Vec<_>>>()?;

        let faces = self
            .faces
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let f = f.ok_or(MeshError::Unset { kind: "face", index: i })?;
                for n in f.nodes {
                    check_ref("node", n.index(), node_count)?;
                }
                Ok(Face {
                    id: FaceId(i as u32),
                    nodes: f.nodes,
                    is_constrained: f.is_constrained,
                    is_wall: f.is_wall,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tetrahedra = Vec::with_capacity(tet_count);
        for i in 0..tet_count {
            let id = TetId(i as u32);
            let unset = MeshError::Unset {
                kind: "tetrahedron",
                index: i,
            };
            let tet_nodes = self.tet_nodes[i].ok_or(unset)?;
            let tet_faces = self.tet_faces[i].ok_or(MeshError::Unset {
                kind: "tetrahedron faces",
                index: i,
            })?;
            let tet_neighbors = self.tet_neighbors[i].ok_or(MeshError::Unset {
                kind: "tetrahedron adjacency",
                index: i,
            })?;

            for (k, n) in tet_nodes.iter().enumerate() {
                check_ref("node", n.index(), node_count)?;
                if tet_nodes[..k].contains(n) {
                    return Err(MeshError::DuplicateNode { tet: id, node: *n });
                }
            }
            for f in tet_faces {
                check_ref("face", f.index(), face_count)?;
            }
            for t in tet_neighbors.iter().flatten() {
                check_ref("tetrahedron", t.index(), tet_count)?;
            }

            tetrahedra.push(Tetrahedron {
                id,
                nodes: tet_nodes,
                faces: tet_faces,
                neighbors: tet_neighbors,
            });
        }

        let mut face_use = vec![0usize; face_count];
        for tet in &tetrahedra {
            for (slot, &face) in tet.faces.iter().enumerate() {
                if faces[face.index()].sorted_nodes() != tet.opposite_nodes(slot) {
                    return Err(MeshError::FaceMismatch {
                        tet: tet.id,
                        slot,
                        face,
                    });
                }
                face_use[face.index()] += 1;
            }
            for (slot, neighbor) in tet.neighbors.iter().enumerate() {
                if let Some(neighbor) = *neighbor {
                    let other = &tetrahedra[neighbor.index()];
                    match other.slot_of_neighbor(tet.id) {
                        None => {
                            return Err(MeshError::AsymmetricAdjacency {
                                tet: tet.id,
                                slot,
                                neighbor,
                            })
                        }
                        Some(back) if other.faces[back] != tet.faces[slot] => {
                            return Err(MeshError::NeighborMismatch {
                                tet: tet.id,
                                slot,
                                neighbor,
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        if let Some((i, &count)) = face_use.iter().enumerate().find(|(_, c)| **c > 2) {
            return Err(MeshError::FaceOverused {
                face: FaceId(i as u32),
                count,
            });
        }

        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let e = e.ok_or(MeshError::Unset { kind: "edge", index: i })?;
                for n in e {
                    check_ref("node", n.index(), node_count)?;
                }
                Ok(Edge {
                    id: EdgeId(i as u32),
                    nodes: e,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mesh = Mesh::from_parts(nodes, faces, tetrahedra, edges);
        info!(
            nodes = mesh.node_count(),
            faces = mesh.face_count(),
            tetrahedra = mesh.tetrahedron_count(),
            edges = mesh.edge_count(),
            "mesh built"
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u32) -> NodeId {
        NodeId(i)
    }

    /// Two tetrahedra glued on triangle 1-2-3, faces listed in file order.
    fn two_tet_builder() -> MeshBuilder {
        let mut b = MeshBuilder::new();
        b.set_node_count(5).unwrap();
        b.set_node(0, Point3::new(0.0, 0.0, -1.0)).unwrap();
        b.set_node(1, Point3::new(1.0, 0.0, 0.0)).unwrap();
        b.set_node(2, Point3::new(0.0, 1.0, 0.0)).unwrap();
        b.set_node(3, Point3::new(-1.0, -1.0, 0.0)).unwrap();
        b.set_node(4, Point3::new(0.0, 0.0, 1.0)).unwrap();

        b.set_face_count(7).unwrap();
        b.set_face(0, [n(1), n(2), n(3)], false, false).unwrap();
        b.set_face(1, [n(0), n(1), n(2)], false, true).unwrap();
        b.set_face(2, [n(0), n(2), n(3)], false, true).unwrap();
        b.set_face(3, [n(0), n(1), n(3)], false, true).unwrap();
        b.set_face(4, [n(4), n(1), n(2)], false, true).unwrap();
        b.set_face(5, [n(4), n(2), n(3)], false, true).unwrap();
        b.set_face(6, [n(4), n(1), n(3)], false, true).unwrap();

        b.set_tetrahedron_count(2).unwrap();
        b.set_tetrahedron(0, [n(0), n(1), n(2), n(3)]).unwrap();
        b.set_tetrahedron(1, [n(4), n(1), n(3), n(2)]).unwrap();
        b
    }

    #[test]
    fn test_derive_and_build() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        b.derive_adjacency().unwrap();
        let mesh = b.build().unwrap();

        let t0 = mesh.tetrahedron(TetId(0)).unwrap();
        assert_eq!(t0.faces, [FaceId(0), FaceId(2), FaceId(3), FaceId(1)]);
        assert_eq!(t0.neighbors, [Some(TetId(1)), None, None, None]);

        let t1 = mesh.tetrahedron(TetId(1)).unwrap();
        assert_eq!(t1.faces, [FaceId(0), FaceId(5), FaceId(4), FaceId(6)]);
        assert_eq!(t1.neighbors, [Some(TetId(0)), None, None, None]);
    }

    #[test]
    fn test_setter_out_of_range() {
        let mut b = MeshBuilder::new();
        b.set_node_count(2).unwrap();
        let err = b.set_node(2, Point3::origin()).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                kind: "node",
                index: 2,
                count: 2
            }
        ));
    }

    #[test]
    fn test_unset_node() {
        let mut b = MeshBuilder::new();
        b.set_node_count(1).unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::Unset { kind: "node", index: 0 })
        ));
    }

    #[test]
    fn test_missing_adjacency_is_unset() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::Unset {
                kind: "tetrahedron adjacency",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_node() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        b.derive_adjacency().unwrap();
        b.set_tetrahedron(1, [n(4), n(1), n(1), n(2)]).unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::DuplicateNode { node: NodeId(1), .. })
        ));
    }

    #[test]
    fn test_node_reference_out_of_range() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        b.derive_adjacency().unwrap();
        b.set_tetrahedron(1, [n(4), n(1), n(3), n(9)]).unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::IndexOutOfRange { kind: "node", index: 9, .. })
        ));
    }

    #[test]
    fn test_asymmetric_adjacency() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        b.derive_adjacency().unwrap();
        b.set_adjacency(1, [None; 4]).unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::AsymmetricAdjacency {
                tet: TetId(0),
                slot: 0,
                neighbor: TetId(1)
            })
        ));
    }

    #[test]
    fn test_neighbor_in_wrong_slot() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        b.derive_adjacency().unwrap();
        // Both sides still list each other, but tet 0 points across the
        // wrong face.
        b.set_adjacency(0, [None, Some(TetId(1)), None, None]).unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::NeighborMismatch {
                tet: TetId(0),
                slot: 1,
                neighbor: TetId(1)
            })
        ));
    }

    #[test]
    fn test_face_mismatch() {
        let mut b = two_tet_builder();
        b.derive_adjacency().unwrap();
        b.set_face_topology(0, [FaceId(1), FaceId(2), FaceId(3), FaceId(0)]).unwrap();
        b.set_face_topology(1, [FaceId(0), FaceId(5), FaceId(4), FaceId(6)]).unwrap();
        assert!(matches!(
            b.build(),
            Err(MeshError::FaceMismatch {
                tet: TetId(0),
                slot: 0,
                face: FaceId(1)
            })
        ));
    }

    #[test]
    fn test_unknown_face() {
        let mut b = two_tet_builder();
        b.set_face(0, [n(0), n(1), n(4)], false, false).unwrap();
        assert!(matches!(
            b.derive_face_topology(),
            Err(MeshError::UnknownFace { tet: TetId(0), slot: 0 })
        ));
    }

    #[test]
    fn test_overused_triangle() {
        let mut b = two_tet_builder();
        b.set_tetrahedron_count(3).unwrap();
        b.set_tetrahedron(0, [n(0), n(1), n(2), n(3)]).unwrap();
        b.set_tetrahedron(1, [n(4), n(1), n(3), n(2)]).unwrap();
        b.set_tetrahedron(2, [n(1), n(2), n(3), n(4)]).unwrap();
        assert!(matches!(
            b.derive_adjacency(),
            Err(MeshError::OverusedTriangle { count: 3, .. })
        ));
    }

    #[test]
    fn test_edges_are_kept() {
        let mut b = two_tet_builder();
        b.derive_face_topology().unwrap();
        b.derive_adjacency().unwrap();
        b.set_edge_count(1).unwrap();
        b.set_edge(0, [n(1), n(2)]).unwrap();
        let mesh = b.build().unwrap();
        assert_eq!(mesh.edge_count(), 1);
        assert_eq!(mesh.edges().next().unwrap().nodes, [n(1), n(2)]);
    }
}
