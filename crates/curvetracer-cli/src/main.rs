//! curvetracer CLI - trajectory reports over scene snapshots
//!
//! Reads a JSON scene (label map, trajectory, models) and prints the voxel
//! values along the trajectory or the entry angle into each model.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use curvetracer::{
    angle_table, sample_trajectory, validate_inputs, BvhCache, NoIntersectionPolicy, Scene,
    SceneInputs, Settings,
};
use env_logger::Env;
use log::{debug, info};
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "curvetracer")]
#[command(about = "Voxel sampling and entry angles along a trajectory", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the label map value under every trajectory point
    Sample {
        /// Scene snapshot (.json)
        scene: PathBuf,
    },
    /// Print the trajectory's entry angle into every model
    Angles {
        /// Scene snapshot (.json)
        scene: PathBuf,
        /// Intersection tolerance in world units
        #[arg(short, long)]
        tolerance: Option<f64>,
        /// How to report a trajectory that misses a model
        #[arg(long, value_enum)]
        no_intersection: Option<NoIntersectionArg>,
    },
    /// Display information about a scene snapshot
    Info {
        /// Scene snapshot (.json)
        scene: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum NoIntersectionArg {
    /// Leave the angle blank
    Empty,
    /// Report 0 degrees
    Zero,
}

impl From<NoIntersectionArg> for NoIntersectionPolicy {
    fn from(arg: NoIntersectionArg) -> Self {
        match arg {
            NoIntersectionArg::Empty => NoIntersectionPolicy::Empty,
            NoIntersectionArg::Zero => NoIntersectionPolicy::Zero,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let mut settings = match &cli.config {
        Some(path) => ConfigFile::load(path)?.entry_angle,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Sample { scene } => {
            run_sample(&scene)?;
        }
        Commands::Angles {
            scene,
            tolerance,
            no_intersection,
        } => {
            if let Some(tolerance) = tolerance {
                settings.tolerance = tolerance;
            }
            if let Some(policy) = no_intersection {
                settings.no_intersection = policy.into();
            }
            settings.validate()?;
            run_angles(&scene, &settings)?;
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
    }

    Ok(())
}

fn load_scene(path: &Path) -> Result<Scene> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let scene = Scene::from_json(&json)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    debug!("loaded scene version {} from {}", scene.version, path.display());
    Ok(scene)
}

fn load_inputs(path: &Path) -> Result<SceneInputs> {
    let scene = load_scene(path)?;
    SceneInputs::from_scene(&scene).with_context(|| format!("invalid scene {}", path.display()))
}

fn run_sample(path: &Path) -> Result<()> {
    let inputs = load_inputs(path)?;
    validate_inputs(inputs.volume.as_ref(), inputs.trajectory.as_ref())?;
    let (Some(volume), Some(trajectory)) = (&inputs.volume, &inputs.trajectory) else {
        anyhow::bail!("scene needs a label map and a trajectory");
    };

    info!("Processing started");
    let samples = sample_trajectory(volume, trajectory)?;
    print!("{}", report::sample_table(&samples));
    info!("Processing completed");
    Ok(())
}

fn run_angles(path: &Path, settings: &Settings) -> Result<()> {
    let inputs = load_inputs(path)?;
    let structures = inputs
        .structures
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("scene has no models"))?;

    info!("Processing started");
    let mut cache = BvhCache::new();
    let rows = angle_table(structures, inputs.trajectory.as_ref(), settings, &mut cache)?;
    print!("{}", report::angle_table(&rows, settings.no_intersection));
    info!("Processing completed");
    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let scene = load_scene(path)?;
    let inputs = SceneInputs::from_scene(&scene)
        .with_context(|| format!("invalid scene {}", path.display()))?;

    println!("Scene: {}", path.display());
    println!("Version: {}", scene.version);

    match &inputs.volume {
        Some(volume) => {
            let grid = volume.grid();
            println!(
                "Label map: {} ({} x {} x {}, {} component(s))",
                volume.name,
                grid.dims()[0],
                grid.dims()[1],
                grid.dims()[2],
                grid.components()
            );
        }
        None => println!("Label map: none"),
    }

    match &inputs.trajectory {
        Some(trajectory) => {
            println!("Trajectory: {} ({} points)", trajectory.name, trajectory.len());
        }
        None => println!("Trajectory: none"),
    }

    match &inputs.structures {
        Some(structures) => {
            println!("Models: {}", structures.name);
            for child in &structures.children {
                match &child.mesh {
                    Some(mesh) => println!(
                        "  {} ({} vertices, {} triangles)",
                        child.name,
                        mesh.vertices().len(),
                        mesh.num_triangles()
                    ),
                    None => println!("  {} (no mesh)", child.name),
                }
            }
        }
        None => println!("Models: none"),
    }

    Ok(())
}
