#![warn(missing_docs)]

//! Ray walking through tetrahedral meshes.
//!
//! A ray starts inside a known tetrahedron and moves from cell to cell
//! across shared faces until it reaches a face flagged as a wall or
//! constraint, leaves the mesh, or runs out of steps.
//!
//! # Architecture
//!
//! - [`exit`] - per-tetrahedron exit face from the signs of six edge products
//! - [`Tracer`] - the bounded walk, configured by [`TraceOptions`]
//! - [`traverse`] / [`traverse_to_point`] - one-shot walks with defaults
//!
//! # Example
//!
//! ```
//! use tetwalk_math::{Point3, Vec3};
//! use tetwalk_mesh::fixtures;
//! use tetwalk_trace::{traverse, Terminal};
//!
//! let mesh = fixtures::cube();
//! let origin = Point3::new(0.5, 0.5, 0.5);
//! let start = mesh.locate(&origin).unwrap();
//! let hit = traverse(&mesh, origin, Vec3::new(0.1, 0.2, -1.0), start).unwrap();
//! assert_eq!(hit.terminal, Terminal::Wall);
//! assert!(hit.position.z.abs() < 1e-9);
//! ```

mod error;
pub mod exit;
mod ray;
mod traverse;

#[cfg(test)]
mod test_util;

pub use error::{Result, TraceError};
pub use exit::ExitFace;
pub use ray::{Ray, RayHit, Terminal};
pub use traverse::{traverse, traverse_to_point, TraceOptions, Tracer, MAX_DEPTH};
