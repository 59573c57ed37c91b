#![warn(missing_docs)]

//! TetGen file import for tetwalk.
//!
//! Reads the `.node`, `.ele`, `.face`, `.neigh`, `.edge` and `.t2f` files
//! TetGen writes and feeds them through [`tetwalk_mesh::MeshBuilder`].
//!
//! # Architecture
//!
//! - `table` - header/record scanning with comments, blank lines and
//!   index-base detection
//! - [`readers`] - one parser per file kind, working on in-memory text
//! - [`load_mesh`] / [`build_mesh`] - assemble and validate a mesh

mod error;
mod loader;
pub mod readers;
mod table;

pub use error::{Result, TetgenError};
pub use loader::{build_mesh, load_mesh, TetgenSources};
pub use readers::{FaceRecord, NodeTable};
