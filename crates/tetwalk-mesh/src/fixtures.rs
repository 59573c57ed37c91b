//! Small hand-built meshes shared by the workspace's tests.
//!
//! Builders here panic on bad input; they only ever see constant data.

use std::collections::HashMap;

use tetwalk_math::{is_positively_oriented, Point3};

use crate::{Mesh, MeshBuilder, NodeId};

/// Build a mesh from raw corners and tetrahedra.
///
/// Tetrahedra are reoriented to positive volume. Faces are generated from
/// the tetrahedra: triangles used once become walls, triangles listed in
/// `constrained` are flagged constrained, the rest are plain interior faces.
pub fn build(points: &[[f64; 3]], tets: &[[u32; 4]], constrained: &[[u32; 3]]) -> Mesh {
    let mut builder = MeshBuilder::new();
    builder.set_node_count(points.len()).unwrap();
    for (i, p) in points.iter().enumerate() {
        builder.set_node(i, Point3::new(p[0], p[1], p[2])).unwrap();
    }

    builder.set_tetrahedron_count(tets.len()).unwrap();
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    let mut uses: HashMap<[u32; 3], usize> = HashMap::new();
    for (i, t) in tets.iter().enumerate() {
        let mut t = *t;
        let [a, b, c, d] = t.map(|n| {
            let p = points[n as usize];
            Point3::new(p[0], p[1], p[2])
        });
        if !is_positively_oriented(&a, &b, &c, &d) {
            t.swap(1, 2);
        }
        builder.set_tetrahedron(i, t.map(NodeId)).unwrap();
        for skip in 0..4 {
            let mut tri: Vec<u32> = (0..4).filter(|&k| k != skip).map(|k| t[k]).collect();
            tri.sort_unstable();
            let tri = [tri[0], tri[1], tri[2]];
            let count = uses.entry(tri).or_insert(0);
            if *count == 0 {
                triangles.push(tri);
            }
            *count += 1;
        }
    }

    builder.set_face_count(triangles.len()).unwrap();
    for (i, tri) in triangles.iter().enumerate() {
        let mut key = *tri;
        key.sort_unstable();
        let is_constrained = constrained.iter().any(|c| {
            let mut c = *c;
            c.sort_unstable();
            c == key
        });
        let is_wall = uses[&key] == 1;
        builder.set_face(i, tri.map(NodeId), is_constrained, is_wall).unwrap();
    }

    builder.derive_face_topology().unwrap();
    builder.derive_adjacency().unwrap();
    builder.build().unwrap()
}

/// The unit corner tetrahedron; every face is a wall.
pub fn single_tet() -> Mesh {
    build(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        &[[0, 1, 2, 3]],
        &[],
    )
}

/// Two tetrahedra glued on the triangle 1-2-3 in the `z = 0` plane.
///
/// Tetrahedron 0 lies below (apex node 0), tetrahedron 1 above (apex node 4).
pub fn two_tets() -> Mesh {
    build(&TWO_TET_POINTS, &TWO_TETS, &[])
}

/// Same as [`two_tets`] with the shared triangle flagged constrained.
pub fn two_tets_constrained() -> Mesh {
    build(&TWO_TET_POINTS, &TWO_TETS, &[[1, 2, 3]])
}

const TWO_TET_POINTS: [[f64; 3]; 5] = [
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
];

const TWO_TETS: [[u32; 4]; 2] = [[0, 1, 2, 3], [4, 1, 3, 2]];

/// Unit cube corners, node `i` at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
pub const CUBE_POINTS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Five-tetrahedron split of the unit cube: four corner tetrahedra around
/// the central one (tetrahedron 4, nodes 1-2-4-7).
pub const CUBE_TETS: [[u32; 4]; 5] = [
    [0, 1, 2, 4],
    [3, 1, 2, 7],
    [5, 1, 4, 7],
    [6, 2, 4, 7],
    [1, 2, 4, 7],
];

/// The unit cube as five tetrahedra with its six sides as walls.
pub fn cube() -> Mesh {
    build(&CUBE_POINTS, &CUBE_TETS, &[])
}

/// The unit cube with some interior triangles flagged constrained.
pub fn cube_with_constrained(constrained: &[[u32; 3]]) -> Mesh {
    build(&CUBE_POINTS, &CUBE_TETS, constrained)
}
