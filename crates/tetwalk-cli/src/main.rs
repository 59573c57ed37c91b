//! tetwalk CLI - point location and ray walking on TetGen meshes
//!
//! Loads a mesh from a TetGen file prefix and prints results as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tetwalk_math::{Point3, Vec3};
use tetwalk_mesh::{Mesh, MeshError, TetId};
use tetwalk_trace::{Ray, Tracer};
use tracing::info;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "tetwalk")]
#[command(about = "Locate points and walk rays through tetrahedral meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print mesh counts and bounds
    Info {
        /// TetGen file prefix (e.g. `room.1` for `room.1.node`, ...)
        mesh: PathBuf,
    },
    /// Find the tetrahedron containing a point
    Locate {
        /// TetGen file prefix
        mesh: PathBuf,
        /// Point as `x,y,z`
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        point: [f64; 3],
    },
    /// Walk a ray through the mesh
    Trace {
        /// TetGen file prefix
        mesh: PathBuf,
        /// Ray origin as `x,y,z`
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        origin: [f64; 3],
        /// Ray direction as `x,y,z` (default: towards `--target`)
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        direction: Option<[f64; 3]>,
        /// Stop when reaching the tetrahedron containing this point
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        target: Option<[f64; 3]>,
        /// Start tetrahedron (default: located from the origin)
        #[arg(long)]
        start: Option<u32>,
        /// TOML file with a `[trace]` section
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the step cap
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { mesh } => {
            show_info(&mesh)?;
        }
        Commands::Locate { mesh, point } => {
            locate_point(&mesh, point)?;
        }
        Commands::Trace {
            mesh,
            origin,
            direction,
            target,
            start,
            config,
            max_depth,
        } => {
            let mut config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            };
            if let Some(max_depth) = max_depth {
                config.trace.max_depth = max_depth;
            }
            trace_ray(&mesh, origin, direction, target, start, &config)?;
        }
    }

    Ok(())
}

/// Parse `x,y,z` into three floats.
fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let parse = |v: &str| {
        v.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| format!("invalid coordinate '{v}'"))
    };
    Ok([parse(*x)?, parse(*y)?, parse(*z)?])
}

fn load(prefix: &Path) -> Result<Mesh> {
    let mesh = tetwalk_tetgen::load_mesh(prefix)
        .with_context(|| format!("loading mesh {}", prefix.display()))?;
    info!(
        nodes = mesh.node_count(),
        tetrahedra = mesh.tetrahedron_count(),
        "loaded {}",
        prefix.display()
    );
    Ok(mesh)
}

fn show_info(prefix: &Path) -> Result<()> {
    let mesh = load(prefix)?;
    let bounds = mesh.bounds();
    let report = json!({
        "nodes": mesh.node_count(),
        "faces": mesh.face_count(),
        "tetrahedra": mesh.tetrahedron_count(),
        "edges": mesh.edge_count(),
        "walls": mesh.faces().filter(|f| f.is_wall).count(),
        "constrained": mesh.faces().filter(|f| f.is_constrained).count(),
        "bounds": {
            "min": bounds.min,
            "max": bounds.max,
            "center": bounds.center(),
            "diagonal": bounds.diagonal(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn locate_point(prefix: &Path, point: [f64; 3]) -> Result<()> {
    let mesh = load(prefix)?;
    let p = Point3::from(point);
    let tet = match mesh.locate(&p) {
        Ok(tet) => Some(tet),
        Err(MeshError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "point": p, "tet": tet }))?
    );
    Ok(())
}

fn trace_ray(
    prefix: &Path,
    origin: [f64; 3],
    direction: Option<[f64; 3]>,
    target: Option<[f64; 3]>,
    start: Option<u32>,
    config: &Config,
) -> Result<()> {
    let mesh = load(prefix)?;
    let origin = Point3::from(origin);
    let start = match start {
        Some(id) => TetId(id),
        None => mesh
            .locate(&origin)
            .with_context(|| format!("origin {origin} is not inside the mesh"))?,
    };

    let target = target.map(Point3::from);
    let ray = match (direction, &target) {
        (Some(direction), _) => Ray::new(origin, Vec3::from(direction)),
        (None, Some(target)) => Ray::towards(origin, target),
        (None, None) => anyhow::bail!("--direction is required without --target"),
    };

    let tracer = Tracer::new(&mesh).with_options(config.trace);
    let hit = match &target {
        Some(target) => tracer.trace_to_point(&ray, start, target)?,
        None => tracer.trace(&ray, start)?,
    };
    println!("{}", serde_json::to_string_pretty(&hit)?);
    Ok(())
}
