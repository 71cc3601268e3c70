//! Sightline CLI
//!
//! Run the grid calculator and the overlay stacking pass without a UI.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sightline_core::{FitMode, SightlineConfig};
use sightline_grid::{compute_grid, GridMetrics};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene;

/// Configuration file picked up from the working directory
const DEFAULT_CONFIG_FILE: &str = "sightline.toml";

#[derive(Parser)]
#[command(name = "sightline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sightline UI debugging toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./sightline.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the alignment grid for a container
    Grid {
        /// Container width
        #[arg(long)]
        width: f32,

        /// Container height
        #[arg(long)]
        height: f32,

        /// Requested square size (defaults to the configured size)
        #[arg(short, long)]
        square: Option<f32>,

        /// Fit policy: exact or preferred (defaults to the configured policy)
        #[arg(short, long)]
        fit: Option<FitMode>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Stack the overlays described in a JSON scene file
    Stack {
        /// Scene file
        scene: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Grid {
            width,
            height,
            square,
            fit,
            json,
        } => cmd_grid(&config, width, height, square, fit, json),

        Commands::Stack { scene, json } => cmd_stack(&config, &scene, json),

        Commands::Config => cmd_config(&config),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<SightlineConfig> {
    if let Some(path) = explicit {
        return SightlineConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        debug!("Using {}", DEFAULT_CONFIG_FILE);
        return SightlineConfig::load(fallback)
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE));
    }

    Ok(SightlineConfig::default())
}

fn cmd_grid(
    config: &SightlineConfig,
    width: f32,
    height: f32,
    square: Option<f32>,
    fit: Option<FitMode>,
    json: bool,
) -> Result<()> {
    let square = square.or(config.grid.square_size);
    let fit = fit.unwrap_or(config.grid.fit);

    let Some(metrics) = compute_grid(width, height, square, fit) else {
        warn!("Nothing to draw for a {}x{} container", width, height);
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print_grid(&metrics);
    }

    Ok(())
}

fn print_grid(metrics: &GridMetrics) {
    let remainder = metrics.remainder();

    println!("Grid ({})", metrics.fit_mode);
    println!("==========");
    println!(
        "Container: {} x {}",
        metrics.container_size.width, metrics.container_size.height
    );
    println!("Square:    {}", metrics.square_size);
    println!("Cells:     {} columns x {} rows", metrics.columns, metrics.rows);
    println!(
        "Origin:    ({}, {})",
        metrics.origin_offset.x, metrics.origin_offset.y
    );
    println!(
        "Content:   {} x {}",
        metrics.content_size.width, metrics.content_size.height
    );
    println!("Remainder: {} x {}", remainder.width, remainder.height);
}

fn cmd_stack(config: &SightlineConfig, path: &Path, json: bool) -> Result<()> {
    let overlays = scene::load_scene(path)?;
    info!("Stacking {} overlays from {}", overlays.len(), path.display());

    let stacked = scene::stack(&overlays, &config.overlay);

    if json {
        println!("{}", serde_json::to_string_pretty(&stacked)?);
        return Ok(());
    }

    for overlay in &stacked {
        let frame = overlay.resolved_frame;
        println!(
            "{:<24} offset {:>8.2}  frame ({}, {}, {}, {}){}",
            overlay.id,
            overlay.offset,
            frame.x(),
            frame.y(),
            frame.width(),
            frame.height(),
            if overlay.exempt { "  [exempt]" } else { "" }
        );
    }

    Ok(())
}

fn cmd_config(config: &SightlineConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
