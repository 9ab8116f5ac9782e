//! Face Try-On - Command line entry point
//!
//! Renders a single frame: loads a source image, a landmark detection and
//! the accessory catalog, composites the chosen accessory and writes the
//! result as a PNG snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use face_tryon::render::SNAPSHOT_FILE_NAME;
use face_tryon::{AccessoryCatalog, Detection, FilterMode, RenderContext, TryOnConfig};

#[derive(Parser)]
#[command(name = "face-tryon")]
#[command(about = "Overlay accessories on a face using detected landmarks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one frame with an accessory and filter.
    Render(RenderArgs),

    /// List the accessories in a manifest.
    List {
        /// Accessory manifest (JSON).
        #[arg(long)]
        manifest: PathBuf,
    },

    /// List the available filters.
    Filters,
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    /// Source frame image.
    #[arg(long)]
    input: PathBuf,

    /// Landmark detection for the frame (JSON).
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Accessory manifest (JSON).
    #[arg(long)]
    manifest: PathBuf,

    /// Accessory id; defaults to the first manifest entry.
    #[arg(long)]
    accessory: Option<String>,

    /// Filter: none, grayscale, sepia, invert or edge.
    #[arg(long, default_value = "none")]
    filter: String,

    /// Fit and filter configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long, default_value = SNAPSHOT_FILE_NAME)]
    output: PathBuf,
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TryOnConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TryOnConfig::default(),
    };

    let catalog = AccessoryCatalog::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;

    let source = image::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?
        .to_rgba8();
    log::info!(
        "Source frame: {}x{}",
        source.width(),
        source.height()
    );

    let detection = match &args.landmarks {
        Some(path) => Detection::load(path)
            .with_context(|| format!("Failed to read landmarks {}", path.display()))?,
        None => Detection::none(),
    };
    if detection.faces.is_empty() {
        log::info!("No face in detection, rendering passthrough");
    } else if detection.faces.len() > 1 {
        log::info!("{} faces detected, using the first", detection.faces.len());
    }

    let mut ctx = RenderContext::new(catalog, config);
    if let Some(id) = &args.accessory {
        ctx.select_accessory(id);
    }
    ctx.set_filter_by_name(&args.filter);

    ctx.render_frame(&source, &detection);
    ctx.save_snapshot(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} (accessory: {}, filter: {})",
        args.output.display(),
        ctx.accessory().map(|a| a.id.as_str()).unwrap_or("none"),
        ctx.filter()
    );
    Ok(())
}

fn run_list(manifest: PathBuf) -> Result<()> {
    let catalog = AccessoryCatalog::load(&manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
    for accessory in catalog.iter() {
        let (w, h) = accessory.image.dimensions();
        println!(
            "{:<16} {:<8} {:<24} {}x{}",
            accessory.id, accessory.kind, accessory.label, w, h
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::List { manifest } => run_list(manifest),
        Commands::Filters => {
            for mode in FilterMode::all() {
                println!("{:<10} {}", mode.name(), mode.display_name());
            }
            Ok(())
        }
    }
}
