mod config;
mod scatter;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geomrep_common::NodeId;
use geomrep_mesh::primitives;
use geomrep_render::{DebugTextRenderer, RenderView, Renderer, StatsRenderer};
use geomrep_replicator::GeomReplicator;
use geomrep_scene::{Scene, StaticModel};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;

#[derive(Parser)]
#[command(name = "geomrep-cli", about = "Replicate a vegetation brush over a field and sway it")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with demo settings; flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Build the demo field and report what a renderer would draw
    Replicate {
        /// Number of copies
        #[arg(short, long)]
        replicas: Option<usize>,
        /// RNG seed for the scatter layout
        #[arg(short, long)]
        seed: Option<u64>,
        /// Also print the per-node debug listing
        #[arg(long)]
        list: bool,
    },
    /// Build the demo field, run wind for a while, and report displacement
    Wind {
        /// Number of copies
        #[arg(short, long)]
        replicas: Option<usize>,
        /// Simulated seconds
        #[arg(long, default_value = "2.0")]
        seconds: f32,
        /// Host frame rate driving the scene
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Freeze the wind halfway through
        #[arg(long)]
        pause_halfway: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut demo = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DemoConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("geomrep-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("replicator: {}", geomrep_replicator::crate_info());
            println!("render: {}", geomrep_render::crate_info());
            println!(
                "index width: 16-bit up to {} indices",
                geomrep_replicator::LARGE_INDEX_THRESHOLD
            );
        }
        Commands::Replicate {
            replicas,
            seed,
            list,
        } => {
            if let Some(replicas) = replicas {
                demo.replicas = replicas;
            }
            if let Some(seed) = seed {
                demo.seed = seed;
            }
            let (scene, _) = build_scene(&demo);

            let view = RenderView::default();
            let stats = StatsRenderer::new().render(&scene, &view);
            println!(
                "Batches: {}, triangles: {}, vertices: {}",
                stats.batches, stats.primitives, stats.vertices
            );
            if !stats.bounds.is_empty() {
                let (min, max) = (stats.bounds.min, stats.bounds.max);
                println!(
                    "Bounds: ({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
                    min.x, min.y, min.z, max.x, max.y, max.z
                );
            }
            if list {
                print!("{}", DebugTextRenderer::new().render(&scene, &view));
            }
        }
        Commands::Wind {
            replicas,
            seconds,
            fps,
            pause_halfway,
        } => {
            if let Some(replicas) = replicas {
                demo.replicas = replicas;
            }
            anyhow::ensure!(fps > 0, "fps must be positive");
            let (mut scene, id) = build_scene(&demo);

            let replicator = scene
                .component_mut::<GeomReplicator>(id)
                .context("replicator missing from scene")?;
            let applied = replicator.apply_wind_velocity(
                &primitives::CROSSED_QUADS_TIP_SLOTS,
                demo.wind_batch,
                demo.wind_velocity,
                demo.wind_cycle,
            );
            if !applied {
                println!("Nothing to animate");
                return Ok(());
            }

            let dt = 1.0 / fps as f32;
            let frames = (seconds * fps as f32).round() as u64;
            let started = Instant::now();
            for frame in 0..frames {
                if pause_halfway && frame == frames / 2 {
                    if let Some(r) = scene.component_mut::<GeomReplicator>(id) {
                        r.stop_wind_velocity(true);
                    }
                }
                scene.update(dt);
            }
            let elapsed = started.elapsed();

            let replicator = scene
                .component::<GeomReplicator>(id)
                .context("replicator missing from scene")?;
            let (mut moved, mut reversing, mut peak) = (0usize, 0usize, 0.0f32);
            for state in replicator.motion_states() {
                let d = state.displacement.length();
                if d > 0.0 {
                    moved += 1;
                }
                if state.reversing {
                    reversing += 1;
                }
                peak = peak.max(d);
            }
            println!(
                "Frames: {frames} in {elapsed:?} ({:?}/frame)",
                elapsed / frames.max(1) as u32
            );
            println!(
                "Swaying vertices: {moved} ({reversing} easing back), peak displacement {peak:.3}"
            );
            println!("Wind active: {}", replicator.is_wind_active());
        }
    }

    Ok(())
}

/// Ground plane plus one replicated vegetation field, like the sample scene.
fn build_scene(demo: &DemoConfig) -> (Scene, NodeId) {
    let mut scene = Scene::new();

    let plane = scene.create_child("Plane", Vec3::ZERO);
    scene.attach(plane, Box::new(StaticModel::new(primitives::plane(demo.area + 10.0))));

    let placements = scatter::scatter(
        demo.replicas,
        demo.seed,
        demo.area,
        demo.min_scale,
        demo.scale_range,
    );

    let started = Instant::now();
    let mut replicator = GeomReplicator::with_config(primitives::crossed_quads(), demo.replicator);
    let normal = demo.normals_up.then_some(Vec3::Y);
    replicator.replicate(&placements, normal);
    println!(
        "Load time: {:?}, replicas: {}, triangles: {}",
        started.elapsed(),
        replicator.replica_count(),
        replicator.geometry().primitive_count()
    );

    let field = scene.create_child("Vegrep", Vec3::ZERO);
    scene.attach(field, Box::new(replicator));
    (scene, field)
}
