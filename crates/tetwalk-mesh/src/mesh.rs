//! The immutable mesh aggregate and point location.

use serde::{Deserialize, Serialize};
use tetwalk_math::{centroid4, point_in_tetrahedron, Aabb3, Point3};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::types::{Edge, Face, Node, Tetrahedron};
use crate::{EdgeId, FaceId, MeshBuilder, NodeId, TetId};

/// A validated tetrahedral mesh.
///
/// Records live in dense arenas indexed by their handles. A `Mesh` is only
/// produced by [`MeshBuilder::build`] (or [`Mesh::from_json`], which goes
/// through the builder), so every handle stored inside it is in range and
/// adjacency is symmetric. It is never mutated afterwards and can be
/// shared across threads by reference.
#[derive(Debug, Clone, Serialize)]
pub struct Mesh {
    nodes: Vec<Node>,
    faces: Vec<Face>,
    tetrahedra: Vec<Tetrahedron>,
    edges: Vec<Edge>,
    #[serde(skip)]
    bounds: Aabb3,
}

#[derive(Deserialize)]
struct Snapshot {
    nodes: Vec<Node>,
    faces: Vec<Face>,
    tetrahedra: Vec<Tetrahedron>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl Mesh {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        faces: Vec<Face>,
        tetrahedra: Vec<Tetrahedron>,
        edges: Vec<Edge>,
    ) -> Self {
        let bounds = Aabb3::from_points(nodes.iter().map(|n| &n.position));
        Self {
            nodes,
            faces,
            tetrahedra,
            edges,
            bounds,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of tetrahedra.
    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a face.
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index())
    }

    /// Look up a tetrahedron.
    pub fn tetrahedron(&self, id: TetId) -> Option<&Tetrahedron> {
        self.tetrahedra.get(id.index())
    }

    /// Look up an edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// All nodes in handle order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All faces in handle order.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter()
    }

    /// All tetrahedra in handle order.
    pub fn tetrahedra(&self) -> impl Iterator<Item = &Tetrahedron> {
        self.tetrahedra.iter()
    }

    /// All edges in handle order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Bounding box of all node positions.
    pub fn bounds(&self) -> &Aabb3 {
        &self.bounds
    }

    /// Corner positions of a tetrahedron, in its node order.
    pub fn corners(&self, tet: &Tetrahedron) -> [Point3; 4] {
        tet.nodes.map(|n| self.nodes[n.index()].position)
    }

    /// Centroid of a tetrahedron.
    pub fn centroid(&self, tet: &Tetrahedron) -> Point3 {
        let [a, b, c, d] = self.corners(tet);
        centroid4(&a, &b, &c, &d)
    }

    /// True if `p` lies inside tetrahedron `id`. Unknown ids contain nothing.
    pub fn contains(&self, id: TetId, p: &Point3) -> bool {
        self.tetrahedron(id).is_some_and(|tet| {
            let [a, b, c, d] = self.corners(tet);
            point_in_tetrahedron(&a, &b, &c, &d, p)
        })
    }

    /// Find the first tetrahedron containing `p` by scanning all of them.
    ///
    /// Linear in the tetrahedron count; meant for seeding a walk, not for
    /// use inside one.
    pub fn locate(&self, p: &Point3) -> Result<TetId> {
        if !self.bounds.contains_point(p) {
            return Err(MeshError::NotFound(*p));
        }
        let found = self
            .tetrahedra
            .iter()
            .find(|tet| {
                let [a, b, c, d] = self.corners(tet);
                point_in_tetrahedron(&a, &b, &c, &d, p)
            })
            .map(|tet| tet.id);
        debug!(point = %p, tet = ?found, "locate");
        found.ok_or(MeshError::NotFound(*p))
    }

    /// Serialize the mesh records to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a mesh from [`Mesh::to_json`] output, re-running validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut builder = MeshBuilder::new();

        builder.set_node_count(snapshot.nodes.len())?;
        for node in &snapshot.nodes {
            builder.set_node(node.id.index(), node.position)?;
        }
        builder.set_face_count(snapshot.faces.len())?;
        for face in &snapshot.faces {
            builder.set_face(face.id.index(), face.nodes, face.is_constrained, face.is_wall)?;
        }
        builder.set_tetrahedron_count(snapshot.tetrahedra.len())?;
        for tet in &snapshot.tetrahedra {
            builder.set_tetrahedron(tet.id.index(), tet.nodes)?;
            builder.set_face_topology(tet.id.index(), tet.faces)?;
            builder.set_adjacency(tet.id.index(), tet.neighbors)?;
        }
        builder.set_edge_count(snapshot.edges.len())?;
        for edge in &snapshot.edges {
            builder.set_edge(edge.id.index(), edge.nodes)?;
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Mesh>();
    }

    #[test]
    fn test_bounds_use_conventional_min_max() {
        let mesh = fixtures::cube();
        assert_relative_eq!(mesh.bounds().min, Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(mesh.bounds().max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_locate_every_centroid() {
        for mesh in [fixtures::single_tet(), fixtures::two_tets(), fixtures::cube()] {
            for tet in mesh.tetrahedra() {
                let c = mesh.centroid(tet);
                assert_eq!(mesh.locate(&c).unwrap(), tet.id);
            }
        }
    }

    #[test]
    fn test_locate_outside_hull() {
        let mesh = fixtures::cube();
        for p in [
            Point3::new(2.0, 0.5, 0.5),
            Point3::new(-0.01, 0.5, 0.5),
            Point3::new(0.5, 0.5, 1.5),
        ] {
            assert!(matches!(mesh.locate(&p), Err(MeshError::NotFound(_))));
        }

        // Inside the bounding box but outside the single tetrahedron.
        let tet = fixtures::single_tet();
        assert!(matches!(
            tet.locate(&Point3::new(0.9, 0.9, 0.9)),
            Err(MeshError::NotFound(_))
        ));
    }

    #[test]
    fn test_point_on_shared_face_belongs_to_neither() {
        let mesh = fixtures::two_tets();
        assert!(matches!(
            mesh.locate(&Point3::new(0.1, 0.1, 0.0)),
            Err(MeshError::NotFound(_))
        ));
        assert_eq!(mesh.locate(&Point3::new(0.1, 0.1, 1e-9)).unwrap(), TetId(1));
        assert_eq!(mesh.locate(&Point3::new(0.1, 0.1, -1e-9)).unwrap(), TetId(0));
    }

    #[test]
    fn test_contains_unknown_tet() {
        let mesh = fixtures::single_tet();
        assert!(!mesh.contains(TetId(5), &Point3::new(0.1, 0.1, 0.1)));
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let mesh = fixtures::cube();
        for tet in mesh.tetrahedra() {
            for neighbor in tet.neighbors.iter().flatten() {
                let other = mesh.tetrahedron(*neighbor).unwrap();
                assert!(other.neighbors.contains(&Some(tet.id)));
            }
        }
    }

    #[test]
    fn test_json_round_trip_revalidates() {
        let mesh = fixtures::cube();
        let json = mesh.to_json().unwrap();
        let restored = Mesh::from_json(&json).unwrap();
        assert_eq!(restored.tetrahedron_count(), mesh.tetrahedron_count());
        assert_eq!(restored.faces().collect::<Vec<_>>(), mesh.faces().collect::<Vec<_>>());
        assert_eq!(restored.bounds(), mesh.bounds());

        let broken = json.replacen("\"neighbors\":[", "\"neighbors\":[7,", 1);
        assert!(Mesh::from_json(&broken).is_err());
    }
}
