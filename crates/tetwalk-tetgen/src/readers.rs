//! Readers for the individual TetGen output files.
//!
//! Each reader parses an in-memory buffer and returns zero-based records in
//! index order. Cross-file references (node ids in elements, face ids in
//! `.t2f`) are checked later by the mesh builder.

use tetwalk_math::Point3;
use tracing::debug;

use crate::error::{Result, TetgenError};
use crate::table::{read_indexed, records, Record};

/// Nodes from a `.node` file.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTable {
    /// Index base detected from the first record, applied to every other
    /// file of the same mesh.
    pub base: u32,
    /// Positions in index order.
    pub positions: Vec<Point3>,
}

/// A row of a `.face` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRecord {
    /// Zero-based corner nodes.
    pub nodes: [u32; 3],
    /// Internal face carrying the `-1` constraint marker.
    pub is_constrained: bool,
    /// Face with a missing adjacent tetrahedron.
    pub is_wall: bool,
}

/// Optional integer header field, defaulting when the header is short.
fn header_field(header: &Record<'_>, col: usize, what: &str, default: usize) -> Result<usize> {
    if header.tokens.len() > col {
        header.parse(col, what)
    } else {
        Ok(default)
    }
}

/// Parse a `.node` file: `index x y z [attributes] [marker]`.
pub fn read_nodes_from_str(text: &str) -> Result<NodeTable> {
    let header = records(".node", text).next();
    let row_len = match &header {
        Some(h) if h.tokens.len() >= 4 => {
            let dim = header_field(h, 1, "dimension", 3)?;
            if dim != 3 {
                return Err(h.error(format!("dimension {dim} is not 3")));
            }
            let attrs = header_field(h, 2, "attribute count", 0)?;
            let markers = header_field(h, 3, "marker flag", 0)?;
            Some(4 + attrs + markers.min(1))
        }
        _ => None,
    };

    let table = read_indexed(".node", text, None, |record, _| {
        match row_len {
            Some(n) => record.expect_len(n, n)?,
            None => record.expect_len(4, usize::MAX)?,
        }
        let x: f64 = record.parse(1, "x coordinate")?;
        let y: f64 = record.parse(2, "y coordinate")?;
        let z: f64 = record.parse(3, "z coordinate")?;
        let position = Point3::new(x, y, z);
        if !position.iter().all(|c| c.is_finite()) {
            return Err(record.error("non-finite coordinate"));
        }
        Ok(position)
    })?;

    debug!(nodes = table.rows.len(), base = table.base, "read .node");
    Ok(NodeTable {
        base: table.base,
        positions: table.rows,
    })
}

/// Parse a `.ele` file: `index n0 n1 n2 n3 [attributes]`.
///
/// Second-order meshes (ten nodes per element) keep their four corners.
pub fn read_elements_from_str(text: &str, base: u32) -> Result<Vec<[u32; 4]>> {
    let table = read_indexed(".ele", text, Some(base), |record, base| {
        record.expect_len(5, usize::MAX)?;
        let mut nodes = [0; 4];
        for (k, node) in nodes.iter_mut().enumerate() {
            *node = record.index(k + 1, base, "node index")?;
        }
        Ok(nodes)
    })?;

    let per_tet = header_field(&table.header, 1, "nodes per tetrahedron", 4)?;
    if per_tet != 4 && per_tet != 10 {
        return Err(table
            .header
            .error(format!("{per_tet} nodes per tetrahedron, expected 4 or 10")));
    }
    debug!(tetrahedra = table.rows.len(), "read .ele");
    Ok(table.rows)
}

/// Parse a `.neigh` file: `index t0 t1 t2 t3`, `-1` for no neighbor.
pub fn read_neighbors_from_str(text: &str, base: u32) -> Result<Vec<[Option<u32>; 4]>> {
    let table = read_indexed(".neigh", text, Some(base), |record, base| {
        record.expect_len(5, 5)?;
        let mut neighbors = [None; 4];
        for (k, neighbor) in neighbors.iter_mut().enumerate() {
            *neighbor = record.optional_index(k + 1, base, "neighbor index")?;
        }
        Ok(neighbors)
    })?;
    debug!(tetrahedra = table.rows.len(), "read .neigh");
    Ok(table.rows)
}

/// Parse a `.face` file: `index a b c [marker] [adj1 adj2]`.
///
/// A face is a wall when either adjacent tetrahedron is `-1`. Otherwise
/// it is constrained when its marker is `-1`. Without adjacency columns
/// no face is a wall.
pub fn read_faces_from_str(text: &str, base: u32) -> Result<Vec<FaceRecord>> {
    let has_marker = match records(".face", text).next() {
        Some(h) => header_field(&h, 1, "marker flag", 0)? != 0,
        None => false,
    };
    let plain = 4 + usize::from(has_marker);

    let table = read_indexed(".face", text, Some(base), |record, base| {
        record.expect_len(plain, plain + 2)?;
        if record.tokens.len() == plain + 1 {
            return Err(record.error("adjacency needs two columns"));
        }
        let mut nodes = [0; 3];
        for (k, node) in nodes.iter_mut().enumerate() {
            *node = record.index(k + 1, base, "node index")?;
        }
        let marker: Option<i64> = if has_marker {
            Some(record.parse(4, "boundary marker")?)
        } else {
            None
        };
        let is_wall = if record.tokens.len() == plain + 2 {
            let a = record.optional_index(plain, base, "adjacent tetrahedron")?;
            let b = record.optional_index(plain + 1, base, "adjacent tetrahedron")?;
            a.is_none() || b.is_none()
        } else {
            false
        };
        Ok(FaceRecord {
            nodes,
            is_constrained: !is_wall && marker == Some(-1),
            is_wall,
        })
    })?;

    debug!(
        faces = table.rows.len(),
        walls = table.rows.iter().filter(|f| f.is_wall).count(),
        constrained = table.rows.iter().filter(|f| f.is_constrained).count(),
        "read .face"
    );
    Ok(table.rows)
}

/// Parse a `.edge` file: `index a b [marker] [tetrahedron]`.
pub fn read_edges_from_str(text: &str, base: u32) -> Result<Vec<[u32; 2]>> {
    let has_marker = match records(".edge", text).next() {
        Some(h) => header_field(&h, 1, "marker flag", 0)? != 0,
        None => false,
    };
    let plain = 3 + usize::from(has_marker);

    let table = read_indexed(".edge", text, Some(base), |record, base| {
        record.expect_len(plain, plain + 1)?;
        Ok([
            record.index(1, base, "node index")?,
            record.index(2, base, "node index")?,
        ])
    })?;
    debug!(edges = table.rows.len(), "read .edge");
    Ok(table.rows)
}

/// Parse a `.t2f` file: headerless `tetrahedron f0 f1 f2 f3` rows, one per
/// tetrahedron.
///
/// Face columns use the mesh `base`. The tetrahedron column carries its own
/// base, taken from its smallest index (0 or 1), since some writers number
/// it from 1 even in 0-based output.
pub fn read_t2f_from_str(text: &str, base: u32, tet_count: usize) -> Result<Vec<[u32; 4]>> {
    let lines: Vec<Record<'_>> = records(".t2f", text).collect();
    let mut lowest: Option<(i64, usize)> = None;
    for record in &lines {
        record.expect_len(5, 5)?;
        let raw: i64 = record.parse(0, "tetrahedron index")?;
        if lowest.map_or(true, |(low, _)| raw < low) {
            lowest = Some((raw, record.line));
        }
    }
    let tet_base = match lowest {
        None | Some((0, _)) => 0,
        Some((1, _)) => 1,
        Some((raw, line)) => {
            return Err(TetgenError::malformed(
                ".t2f",
                line,
                format!("lowest tetrahedron index {raw} is neither 0 nor 1"),
            ))
        }
    };

    let mut rows: Vec<Option<[u32; 4]>> = vec![None; tet_count];
    let mut last_line = 1;
    for record in &lines {
        last_line = record.line;
        let tet = record.index(0, tet_base, "tetrahedron index")? as usize;
        let row = rows
            .get_mut(tet)
            .ok_or_else(|| record.error(format!("tetrahedron index out of range (count {tet_count})")))?;
        if row.is_some() {
            return Err(record.error("duplicate tetrahedron"));
        }
        let mut faces = [0; 4];
        for (k, face) in faces.iter_mut().enumerate() {
            *face = record.index(k + 1, base, "face index")?;
        }
        *row = Some(faces);
    }

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.ok_or_else(|| {
                TetgenError::malformed(".t2f", last_line, format!("no row for tetrahedron {i}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(tetrahedra = rows.len(), "read .t2f");
    Ok(rows)
}
