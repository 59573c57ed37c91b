//! Assemble a [`Mesh`] from a set of TetGen files.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tetwalk_mesh::{FaceId, Mesh, MeshBuilder, NodeId, TetId};
use tracing::debug;

use crate::error::{Result, TetgenError};
use crate::readers::{
    read_edges_from_str, read_elements_from_str, read_faces_from_str, read_neighbors_from_str,
    read_nodes_from_str, read_t2f_from_str,
};

/// Contents of the files making up one TetGen mesh.
///
/// `.node`, `.ele` and `.face` are required. Without `.t2f` the face of
/// each tetrahedron slot is found by node set; without `.neigh` adjacency
/// is derived from shared triangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct TetgenSources<'a> {
    /// `.node` contents.
    pub node: &'a str,
    /// `.ele` contents.
    pub ele: &'a str,
    /// `.face` contents.
    pub face: &'a str,
    /// `.neigh` contents, if present.
    pub neigh: Option<&'a str>,
    /// `.edge` contents, if present.
    pub edge: Option<&'a str>,
    /// `.t2f` contents, if present.
    pub t2f: Option<&'a str>,
}

/// Load a TetGen mesh from `<prefix>.node`, `<prefix>.ele`, `<prefix>.face`
/// and, when they exist, `<prefix>.neigh`, `<prefix>.edge` and
/// `<prefix>.t2f`.
///
/// # Example
///
/// ```no_run
/// let mesh = tetwalk_tetgen::load_mesh("meshes/room.1").unwrap();
/// println!("{} tetrahedra", mesh.tetrahedron_count());
/// ```
#[tracing::instrument(skip_all, fields(prefix = %prefix.as_ref().display()))]
pub fn load_mesh(prefix: impl AsRef<Path>) -> Result<Mesh> {
    let prefix = prefix.as_ref();
    let node = read_required(&file_path(prefix, ".node"))?;
    let ele = read_required(&file_path(prefix, ".ele"))?;
    let face = read_required(&file_path(prefix, ".face"))?;
    let neigh = read_optional(&file_path(prefix, ".neigh"))?;
    let edge = read_optional(&file_path(prefix, ".edge"))?;
    let t2f = read_optional(&file_path(prefix, ".t2f"))?;
    debug!(
        neigh = neigh.is_some(),
        edge = edge.is_some(),
        t2f = t2f.is_some(),
        "read mesh files"
    );

    let sources = TetgenSources {
        node: &node,
        ele: &ele,
        face: &face,
        neigh: neigh.as_deref(),
        edge: edge.as_deref(),
        t2f: t2f.as_deref(),
    };
    build_mesh(&sources).map_err(|e| e.with_prefix(&prefix.display().to_string()))
}

/// Build a mesh from in-memory file contents.
///
/// The index base (0 or 1) is taken from the first `.node` record and used
/// for every file.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_mesh(sources: &TetgenSources<'_>) -> Result<Mesh> {
    let nodes = read_nodes_from_str(sources.node)?;
    let base = nodes.base;
    let tets = read_elements_from_str(sources.ele, base)?;
    let faces = read_faces_from_str(sources.face, base)?;

    let mut builder = MeshBuilder::new();
    builder.set_node_count(nodes.positions.len())?;
    for (i, position) in nodes.positions.iter().enumerate() {
        builder.set_node(i, *position)?;
    }
    builder.set_face_count(faces.len())?;
    for (i, face) in faces.iter().enumerate() {
        builder.set_face(i, face.nodes.map(NodeId), face.is_constrained, face.is_wall)?;
    }
    builder.set_tetrahedron_count(tets.len())?;
    for (i, tet) in tets.iter().enumerate() {
        builder.set_tetrahedron(i, tet.map(NodeId))?;
    }

    match sources.t2f {
        Some(text) => {
            for (i, row) in read_t2f_from_str(text, base, tets.len())?.iter().enumerate() {
                builder.set_face_topology(i, row.map(FaceId))?;
            }
        }
        None => builder.derive_face_topology()?,
    }

    match sources.neigh {
        Some(text) => {
            for (i, row) in read_neighbors_from_str(text, base)?.iter().enumerate() {
                builder.set_adjacency(i, row.map(|n| n.map(TetId)))?;
            }
        }
        None => builder.derive_adjacency()?,
    }

    if let Some(text) = sources.edge {
        let edges = read_edges_from_str(text, base)?;
        builder.set_edge_count(edges.len())?;
        for (i, edge) in edges.iter().enumerate() {
            builder.set_edge(i, edge.map(NodeId))?;
        }
    }

    Ok(builder.build()?)
}

fn file_path(prefix: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(extension);
    PathBuf::from(path)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_required(path: &Path) -> Result<String> {
    read_optional(path)?.ok_or_else(|| TetgenError::Missing(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetwalk_math::Point3;
    use tetwalk_mesh::MeshError;

    const NODE: &str = "\
5  3  0  0
1   0.0  0.0 -1.0
2   1.0  0.0  0.0
3   0.0  1.0  0.0
4  -1.0 -1.0  0.0
5   0.0  0.0  1.0
# Generated by tetgen
";

    const ELE: &str = "\
2  4  0
1   1 2 3 4
2   5 2 4 3
";

    /// `index a b c marker adj1 adj2`; face 1 is the shared one.
    fn face_file(shared_marker: i32) -> String {
        format!(
            "7 1
1  2 3 4  {shared_marker}  1  2
2  1 3 4  1  1 -1
3  1 2 4  1  1 -1
4  1 2 3  1  1 -1
5  5 4 3  1  2 -1
6  5 2 3  1  2 -1
7  5 2 4  1  2 -1
"
        )
    }

    const NEIGH: &str = "2 4\n1 2 -1 -1 -1\n2 1 -1 -1 -1\n";
    const T2F: &str = "1 1 2 3 4\n2 1 5 6 7\n";
    const EDGE: &str = "3 0\n1 1 2\n2 2 3\n3 3 1\n";

    #[test]
    fn test_build_full_mesh() {
        let face = face_file(0);
        let mesh = build_mesh(&TetgenSources {
            node: NODE,
            ele: ELE,
            face: &face,
            neigh: Some(NEIGH),
            edge: Some(EDGE),
            t2f: Some(T2F),
        })
        .unwrap();

        assert_eq!(mesh.node_count(), 5);
        assert_eq!(mesh.face_count(), 7);
        assert_eq!(mesh.tetrahedron_count(), 2);
        assert_eq!(mesh.edge_count(), 3);

        let t0 = mesh.tetrahedron(TetId(0)).unwrap();
        assert_eq!(t0.nodes, [NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(t0.faces, [FaceId(0), FaceId(1), FaceId(2), FaceId(3)]);
        assert_eq!(t0.neighbors, [Some(TetId(1)), None, None, None]);

        assert_eq!(mesh.faces().filter(|f| f.is_wall).count(), 6);
        assert!(!mesh.face(FaceId(0)).unwrap().is_wall);
        assert_eq!(mesh.locate(&Point3::new(0.1, 0.1, 0.5)).unwrap(), TetId(1));
    }

    #[test]
    fn test_derived_topology_matches_explicit() {
        let face = face_file(-1);
        let explicit = build_mesh(&TetgenSources {
            node: NODE,
            ele: ELE,
            face: &face,
            neigh: Some(NEIGH),
            edge: None,
            t2f: Some(T2F),
        })
        .unwrap();
        let derived = build_mesh(&TetgenSources {
            node: NODE,
            ele: ELE,
            face: &face,
            ..TetgenSources::default()
        })
        .unwrap();

        assert_eq!(
            explicit.tetrahedra().collect::<Vec<_>>(),
            derived.tetrahedra().collect::<Vec<_>>()
        );
        assert!(derived.face(FaceId(0)).unwrap().is_constrained);
        assert_eq!(derived.edge_count(), 0);
    }

    #[test]
    fn test_zero_based_set_with_one_based_t2f_tetrahedra() {
        let node = "5 3 0 0\n0 0 0 -1\n1 1 0 0\n2 0 1 0\n3 -1 -1 0\n4 0 0 1\n";
        let ele = "2 4 0\n0 0 1 2 3\n1 4 1 3 2\n";
        let face = "\
7 1
0  1 2 3  0  0  1
1  0 2 3  1  0 -1
2  0 1 3  1  0 -1
3  0 1 2  1  0 -1
4  4 3 2  1  1 -1
5  4 1 2  1  1 -1
6  4 1 3  1  1 -1
";
        let mesh = build_mesh(&TetgenSources {
            node,
            ele,
            face,
            t2f: Some("1 0 1 2 3\n2 0 4 5 6\n"),
            ..TetgenSources::default()
        })
        .unwrap();

        let t1 = mesh.tetrahedron(TetId(1)).unwrap();
        assert_eq!(t1.faces, [FaceId(0), FaceId(4), FaceId(5), FaceId(6)]);
        assert_eq!(t1.neighbors, [Some(TetId(0)), None, None, None]);
    }

    #[test]
    fn test_inconsistent_t2f_is_a_mesh_error() {
        let face = face_file(0);
        let err = build_mesh(&TetgenSources {
            node: NODE,
            ele: ELE,
            face: &face,
            t2f: Some("1 2 1 3 4\n2 1 5 6 7\n"),
            ..TetgenSources::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TetgenError::Mesh(MeshError::FaceMismatch { .. })
        ));
    }

    #[test]
    fn test_element_referencing_unknown_node() {
        let face = face_file(0);
        let err = build_mesh(&TetgenSources {
            node: NODE,
            ele: "2 4 0\n1 1 2 3 4\n2 9 2 4 3\n",
            face: &face,
            ..TetgenSources::default()
        })
        .unwrap_err();
        assert!(matches!(err, TetgenError::Mesh(_)), "{err}");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("tetwalk-tetgen-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let prefix = dir.join("two");
        std::fs::write(file_path(&prefix, ".node"), NODE).unwrap();
        std::fs::write(file_path(&prefix, ".ele"), ELE).unwrap();
        std::fs::write(file_path(&prefix, ".face"), face_file(0)).unwrap();
        std::fs::write(file_path(&prefix, ".neigh"), NEIGH).unwrap();

        let mesh = load_mesh(&prefix).unwrap();
        assert_eq!(mesh.tetrahedron_count(), 2);

        std::fs::write(file_path(&prefix, ".ele"), "2 4 0\n1 1 2 3 4\n2 5 2 x 3\n").unwrap();
        match load_mesh(&prefix).unwrap_err() {
            TetgenError::Malformed { file, line, .. } => {
                assert!(file.ends_with("two.ele"), "{file}");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let missing = load_mesh(dir.join("nothing-here")).unwrap_err();
        assert!(matches!(missing, TetgenError::Missing(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
