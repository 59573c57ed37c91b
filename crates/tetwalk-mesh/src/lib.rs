#![warn(missing_docs)]

//! Indexed tetrahedral mesh with explicit adjacency.
//!
//! # Architecture
//!
//! - [`MeshBuilder`] - index-addressed setters used by loaders, plus
//!   derivation of face topology and adjacency when a generator omits them
//! - [`Mesh`] - validated, immutable arenas of [`Node`], [`Face`],
//!   [`Tetrahedron`] and [`Edge`] records addressed by dense handles
//! - [`Mesh::locate`] - brute-force point location for seeding walks
//!
//! # Example
//!
//! ```
//! use tetwalk_math::Point3;
//! use tetwalk_mesh::{MeshBuilder, NodeId};
//!
//! let mut b = MeshBuilder::new();
//! b.set_node_count(4).unwrap();
//! b.set_node(0, Point3::new(0.0, 0.0, 0.0)).unwrap();
//! b.set_node(1, Point3::new(1.0, 0.0, 0.0)).unwrap();
//! b.set_node(2, Point3::new(0.0, 1.0, 0.0)).unwrap();
//! b.set_node(3, Point3::new(0.0, 0.0, 1.0)).unwrap();
//! b.set_face_count(4).unwrap();
//! b.set_face(0, [NodeId(1), NodeId(2), NodeId(3)], false, true).unwrap();
//! b.set_face(1, [NodeId(0), NodeId(2), NodeId(3)], false, true).unwrap();
//! b.set_face(2, [NodeId(0), NodeId(1), NodeId(3)], false, true).unwrap();
//! b.set_face(3, [NodeId(0), NodeId(1), NodeId(2)], false, true).unwrap();
//! b.set_tetrahedron_count(1).unwrap();
//! b.set_tetrahedron(0, [NodeId(0), NodeId(1), NodeId(2), NodeId(3)]).unwrap();
//! b.derive_face_topology().unwrap();
//! b.derive_adjacency().unwrap();
//!
//! let mesh = b.build().unwrap();
//! assert!(mesh.locate(&Point3::new(0.1, 0.1, 0.1)).is_ok());
//! ```

mod builder;
mod error;
mod ids;
mod mesh;
mod types;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use builder::MeshBuilder;
pub use error::{MeshError, Result};
pub use ids::{EdgeId, FaceId, NodeId, TetId};
pub use mesh::Mesh;
pub use types::{Edge, Face, Node, Tetrahedron};
