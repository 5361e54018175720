//! mesh2pov command-line front end.
//!
//! Thin shim over `mesh2pov-core`: argument parsing, file I/O, and progress
//! display. The scene is assembled fully in memory and written in one step,
//! so a failed conversion never leaves a truncated output file behind.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use mesh2pov_core::{
    convert, parse_obj, parse_stl, CameraConfig, Config, LightingConfig, LightingPreset, Material,
    Mesh, Progress,
};

/// Convert OBJ and STL meshes to POV-Ray scene descriptions.
#[derive(Debug, Parser)]
#[command(name = "mesh2pov", version, about)]
struct Args {
    /// Input OBJ or STL file.
    input: PathBuf,

    /// Output POV file (default: input file with a .pov extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Image width embedded in the render-command comment.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: u32,

    /// Image height embedded in the render-command comment.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: u32,

    /// Flip X coordinates of vertices and normals.
    #[arg(long)]
    flip_x: bool,

    /// Skip material definitions.
    #[arg(long)]
    no_materials: bool,

    /// Rotate camera around the look-at point, in degrees (legacy).
    #[arg(long, default_value_t = 0.0)]
    rotate_camera: f64,

    /// Camera pitch (up/down), in degrees.
    #[arg(long, default_value_t = 0.0)]
    camera_pitch: f64,

    /// Camera yaw (left/right), in degrees.
    #[arg(long, default_value_t = 0.0)]
    camera_yaw: f64,

    /// Camera roll (tilt), in degrees.
    #[arg(long, default_value_t = 0.0)]
    camera_roll: f64,

    /// Camera distance multiplier; must be positive.
    #[arg(long, default_value_t = 1.0)]
    camera_distance: f64,

    /// Lighting preset: studio, outdoor, dramatic, soft, architectural.
    #[arg(long)]
    lighting_preset: Option<LightingPreset>,

    /// Ambient light intensity.
    #[arg(long, default_value_t = 0.1)]
    ambient_light: f64,

    /// Light intensity multiplier.
    #[arg(long, default_value_t = 1.0)]
    light_intensity: f64,

    /// Shadow softness for area lights.
    #[arg(long, default_value_t = 0.5)]
    shadow_softness: f64,

    /// Enable radiosity (global illumination).
    #[arg(long)]
    radiosity: bool,

    /// Use area lights instead of point lights for soft shadows.
    #[arg(long)]
    area_lights: bool,

    /// Enable photon mapping.
    #[arg(long)]
    photon_mapping: bool,

    /// Verbose output with a settings summary and progress display.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            width: self.width,
            height: self.height,
            flip_x: self.flip_x,
            skip_materials: self.no_materials,
            camera: CameraConfig {
                pitch: self.camera_pitch,
                yaw: self.camera_yaw,
                roll: self.camera_roll,
                distance: self.camera_distance,
                rotation: self.rotate_camera,
            },
            lighting: LightingConfig {
                preset: self.lighting_preset,
                ambient: self.ambient_light,
                intensity: self.light_intensity,
                softness: self.shadow_softness,
                area_lights: self.area_lights,
                radiosity: self.radiosity,
                photon_mapping: self.photon_mapping,
            },
            material: Material::bronze(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.config();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("pov"));

    if args.verbose {
        print_settings(&args);
    }

    let progress = Arc::new(Progress::new());
    let reporter = args.verbose.then(|| spawn_reporter(Arc::clone(&progress)));

    let result = run(&args, &config, progress.as_ref(), &output);

    if let Some((stop, handle)) = reporter {
        stop.store(true, Ordering::Relaxed);
        let _ = handle.join();
    }

    let mesh = result?;
    println!(
        "Wrote {} ({} vertices, {} triangles)",
        output.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}

/// Parse, convert, and write the output file. Returns the final mesh for
/// the summary line.
fn run(
    args: &Args,
    config: &Config,
    progress: &Progress,
    output: &Path,
) -> anyhow::Result<Mesh> {
    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let mut mesh = match extension.as_deref() {
        Some("obj") => {
            let file = fs::File::open(&args.input)
                .with_context(|| format!("failed to open {}", args.input.display()))?;
            parse_obj(BufReader::new(file), progress)
                .with_context(|| format!("failed to parse {}", args.input.display()))?
        }
        Some("stl") => {
            let data = fs::read(&args.input)
                .with_context(|| format!("failed to read {}", args.input.display()))?;
            parse_stl(&data, progress)
                .with_context(|| format!("failed to parse {}", args.input.display()))?
        }
        _ => bail!(
            "unsupported input format for {}; expected .obj or .stl",
            args.input.display()
        ),
    };

    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "parsed input geometry"
    );

    // Assemble the whole scene in memory, then write it in one step.
    let mut scene = Vec::new();
    convert(&mut mesh, config, progress, &mut scene)?;
    fs::write(output, &scene).with_context(|| format!("failed to write {}", output.display()))?;

    Ok(mesh)
}

/// Background thread that mirrors the core's progress counters into an
/// indicatif spinner.
fn spawn_reporter(progress: Arc<Progress>) -> (Arc<AtomicBool>, thread::JoinHandle<()>) {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let handle = thread::spawn(move || {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        while !stop_flag.load(Ordering::Relaxed) {
            bar.set_message(format!(
                "{} lines, {} triangles, {} elements emitted",
                progress.lines_parsed(),
                progress.triangles_parsed(),
                progress.elements_emitted()
            ));
            bar.tick();
            thread::sleep(Duration::from_millis(100));
        }
        bar.finish_and_clear();
    });

    (stop, handle)
}

fn print_settings(args: &Args) {
    let preset = args
        .lighting_preset
        .map_or("basic", LightingPreset::as_str);
    println!("{}", "=".repeat(60));
    println!("mesh2pov Settings Summary");
    println!("{}", "=".repeat(60));
    println!("Image Size: {}x{}", args.width, args.height);
    println!("Flip X-axis: {}", args.flip_x);
    println!("Camera Rotation: {:.1} deg", args.rotate_camera);
    println!("Camera Pitch: {:.1} deg", args.camera_pitch);
    println!("Camera Yaw: {:.1} deg", args.camera_yaw);
    println!("Camera Roll: {:.1} deg", args.camera_roll);
    println!("Camera Distance: {:.1}x", args.camera_distance);
    println!("Lighting Preset: {preset}");
    println!("Radiosity: {}", args.radiosity);
    println!("Area Lights: {}", args.area_lights);
    println!("Photon Mapping: {}", args.photon_mapping);
    println!("Ambient Light: {:.2}", args.ambient_light);
    println!("Light Intensity: {:.2}", args.light_intensity);
    println!("Shadow Softness: {:.2}", args.shadow_softness);
    println!("{}", "=".repeat(60));
}
