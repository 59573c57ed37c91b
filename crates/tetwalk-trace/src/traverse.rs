//! Bounded walk of a ray through adjacent tetrahedra.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tetwalk_math::{point_in_tetrahedron, Point3, Vec3};
use tetwalk_mesh::{FaceId, Mesh, TetId};
use tracing::{debug, warn};

use crate::error::{Result, TraceError};
use crate::exit::{exit_point, resolve_exit, ExitFace};
use crate::{Ray, RayHit, Terminal};

/// Default cap on tetrahedra resolved per walk, so depths run `0..80`.
pub const MAX_DEPTH: usize = 80;

/// Walk configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Maximum number of tetrahedra resolved before the walk ends
    /// [`Terminal::Dark`]. The deepest reachable depth is `max_depth - 1`;
    /// zero behaves like one.
    pub max_depth: usize,
    /// Wall-clock budget per walk in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Verify that the start tetrahedron contains the ray origin.
    pub check_origin: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            timeout_ms: None,
            check_origin: true,
        }
    }
}

/// One step of the walk: either still traveling or finished.
enum Step {
    Traveling {
        next: TetId,
        face: FaceId,
        exit: Point3,
    },
    Stopped(RayHit),
}

/// Walks rays through a borrowed mesh.
///
/// Holds no per-walk state, so one tracer can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'m> {
    mesh: &'m Mesh,
    options: TraceOptions,
}

impl<'m> Tracer<'m> {
    /// Tracer with default options.
    pub fn new(mesh: &'m Mesh) -> Self {
        Self {
            mesh,
            options: TraceOptions::default(),
        }
    }

    /// Replace the walk options.
    pub fn with_options(mut self, options: TraceOptions) -> Self {
        if options.max_depth > MAX_DEPTH && options.timeout_ms.is_none() {
            warn!(
                max_depth = options.max_depth,
                "step cap raised above default without a timeout"
            );
        }
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    /// Walk `ray` from `start` until it hits a wall or constraint, leaves
    /// the mesh, degenerates or runs out of budget.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn trace(&self, ray: &Ray, start: TetId) -> Result<RayHit> {
        self.walk(ray, start, None)
    }

    /// Like [`Tracer::trace`], but stop with [`Terminal::Found`] as soon as
    /// the current tetrahedron contains `target`.
    ///
    /// The target must lie inside some tetrahedron; it is located once up
    /// front with a linear scan.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn trace_to_point(&self, ray: &Ray, start: TetId, target: &Point3) -> Result<RayHit> {
        if self.mesh.locate(target).is_err() {
            return Err(TraceError::TargetOutsideMesh(*target));
        }
        self.walk(ray, start, Some(target))
    }

    fn walk(&self, ray: &Ray, start: TetId, target: Option<&Point3>) -> Result<RayHit> {
        if self.mesh.tetrahedron(start).is_none() {
            return Err(TraceError::UnknownTetrahedron(start));
        }
        if self.options.check_origin && !self.mesh.contains(start, &ray.origin) {
            return Err(TraceError::OriginOutsideStart {
                tet: start,
                origin: ray.origin,
            });
        }

        let deadline = self
            .options
            .timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        let mut tet = start;
        let mut entry = ray.origin;
        let mut depth = 0;
        let hit = loop {
            let (next, face, exit) = match self.step(ray, tet, entry, depth, target)? {
                Step::Stopped(hit) => break hit,
                Step::Traveling { next, face, exit } => (next, face, exit),
            };

            let timed_out = deadline.is_some_and(|d| Instant::now() >= d);
            if depth + 1 >= self.options.max_depth || timed_out {
                if timed_out {
                    warn!(tet = %tet, depth, "walk timed out");
                } else {
                    warn!(tet = %tet, depth, "step budget exhausted");
                }
                break RayHit {
                    position: exit,
                    tet,
                    face: Some(face),
                    depth,
                    terminal: Terminal::Dark,
                };
            }

            tet = next;
            entry = exit;
            depth += 1;
        };

        debug!(terminal = ?hit.terminal, tet = %hit.tet, depth = hit.depth, "walk finished");
        Ok(hit)
    }

    fn step(
        &self,
        ray: &Ray,
        tet: TetId,
        entry: Point3,
        depth: usize,
        target: Option<&Point3>,
    ) -> Result<Step> {
        let record = self
            .mesh
            .tetrahedron(tet)
            .ok_or(TraceError::UnknownTetrahedron(tet))?;
        let corners = self.mesh.corners(record);
        let exit = resolve_exit(ray, &corners, &record.faces, &record.neighbors);

        let stop = |position: Point3, face: Option<FaceId>, terminal: Terminal| {
            Step::Stopped(RayHit {
                position,
                tet,
                face,
                depth,
                terminal,
            })
        };

        if let Some(target) = target {
            let [a, b, c, d] = &corners;
            if point_in_tetrahedron(a, b, c, d, target) {
                let face = match exit {
                    ExitFace::Through { face, .. } => Some(face),
                    ExitFace::Degenerate => None,
                };
                return Ok(stop(*target, face, Terminal::Found));
            }
        }

        let (slot, face_id, neighbor) = match exit {
            ExitFace::Through {
                slot,
                face,
                neighbor,
            } => (slot, face, neighbor),
            ExitFace::Degenerate => {
                warn!(tet = %tet, depth, "no exit face resolved");
                return Ok(stop(entry, None, Terminal::Degenerate));
            }
        };

        let face = self
            .mesh
            .face(face_id)
            .ok_or(TraceError::UnknownFace(face_id))?;
        let position = exit_point(ray, &corners, slot);

        if face.is_constrained {
            return Ok(stop(position, Some(face_id), Terminal::Constrained));
        }
        if face.is_wall {
            return Ok(stop(position, Some(face_id), Terminal::Wall));
        }
        Ok(match neighbor {
            Some(next) => Step::Traveling {
                next,
                face: face_id,
                exit: position,
            },
            None => stop(position, Some(face_id), Terminal::ExitedDomain),
        })
    }
}

/// Walk a ray from `start` with default options.
pub fn traverse(mesh: &Mesh, origin: Point3, direction: Vec3, start: TetId) -> Result<RayHit> {
    Tracer::new(mesh).trace(&Ray::new(origin, direction), start)
}

/// Walk a ray from `start` towards `target` with default options, stopping
/// with [`Terminal::Found`] in the tetrahedron that contains it.
pub fn traverse_to_point(
    mesh: &Mesh,
    origin: Point3,
    direction: Vec3,
    start: TetId,
    target: Point3,
) -> Result<RayHit> {
    Tracer::new(mesh).trace_to_point(&Ray::new(origin, direction), start, &target)
}
