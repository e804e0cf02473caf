//! Particle system command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

use slick_particle_io::{
    EmitterDocument, Severity, SystemDocument, read_system_document, validate_system,
    write_system_document,
};
use slick_particles::{ConfigurableEmitter, DEFAULT_MAX_PARTICLES, Range, SystemConfig};

use crate::utils::{
    CountingSink, DirectoryImageLoader, DrawStats, add_table_row, completion_mode,
    create_progress_bar, create_table, format_bytes, format_range,
};

#[derive(Subcommand)]
pub enum SystemCommands {
    /// Display information about a particle system file
    Info {
        /// Path to the system file (.json, .yaml, .yml)
        file: PathBuf,

        /// Show every parameter of every emitter
        #[arg(short, long)]
        detailed: bool,
    },

    /// Check a particle system file for likely mistakes
    Validate {
        /// Path to the system file
        file: PathBuf,

        /// Show warnings as well as errors
        #[arg(short, long)]
        warnings: bool,
    },

    /// Convert a particle system file between JSON and YAML
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file; the format follows its extension
        output: PathBuf,
    },

    /// Write a new system with a single default emitter
    New {
        /// Output file; the format follows its extension
        output: PathBuf,

        /// Emitter name
        #[arg(short, long, default_value = "emitter")]
        name: String,

        /// Sprite image name
        #[arg(short, long)]
        image: Option<String>,

        /// Stop after emitting this many particles
        #[arg(long, conflicts_with = "duration")]
        count: Option<u32>,

        /// Stop emitting after this many milliseconds
        #[arg(long)]
        duration: Option<f32>,

        /// Render with additive blending
        #[arg(long)]
        additive: bool,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a particle system headlessly and report what it would draw
    Simulate {
        /// Path to the system file
        file: PathBuf,

        /// Number of frames to simulate
        #[arg(long, default_value = "600")]
        frames: u32,

        /// Milliseconds per frame
        #[arg(long, default_value = "16")]
        delta: f32,

        /// Pool capacity per emitter
        #[arg(long, default_value_t = DEFAULT_MAX_PARTICLES)]
        max_particles: usize,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to resolve sprite images from
        #[arg(long)]
        images: Option<PathBuf>,

        /// Keep emitters in the system after they complete
        #[arg(long)]
        keep_completed: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(cmd: SystemCommands, quiet: bool) -> Result<()> {
    match cmd {
        SystemCommands::Info { file, detailed } => handle_info(&file, detailed),
        SystemCommands::Validate { file, warnings } => handle_validate(&file, warnings),
        SystemCommands::Convert { input, output } => handle_convert(&input, &output),
        SystemCommands::New {
            output,
            name,
            image,
            count,
            duration,
            additive,
            force,
        } => handle_new(NewArgs {
            output,
            name,
            image,
            count,
            duration,
            additive,
            force,
        }),
        SystemCommands::Simulate {
            file,
            frames,
            delta,
            max_particles,
            seed,
            images,
            keep_completed,
            json,
        } => handle_simulate(SimulateArgs {
            file,
            frames,
            delta,
            max_particles,
            seed,
            images,
            keep_completed,
            json,
            quiet,
        }),
    }
}

fn load(file: &Path) -> Result<SystemDocument> {
    read_system_document(file)
        .with_context(|| format!("Failed to read particle system: {}", file.display()))
}

fn handle_info(file: &Path, detailed: bool) -> Result<()> {
    let doc = load(file)?;
    let size = std::fs::metadata(file)
        .with_context(|| format!("Failed to stat {}", file.display()))?
        .len();

    println!("Particle System: {}", file.display());
    println!("=====================================");
    println!("File Size: {}", format_bytes(size));
    println!("Blending: {}", if doc.additive { "additive" } else { "combine" });
    println!("Points: {}", doc.points);
    if let Some(image) = &doc.default_image {
        println!("Default Image: {image}");
    }
    println!("Emitters: {}", doc.emitters.len());

    if doc.emitters.is_empty() {
        return Ok(());
    }

    println!();
    let mut table = create_table(&[
        "Name", "Image", "Mode", "Spawn", "Every", "Life", "Speed", "Blend",
    ]);
    for emitter in &doc.emitters {
        add_table_row(
            &mut table,
            vec![
                emitter.name.clone(),
                emitter.image_name.clone().unwrap_or_else(|| "-".to_string()),
                completion_mode(emitter),
                format_range(&emitter.spawn_count),
                format!("{}ms", format_range(&emitter.spawn_interval)),
                format!("{}ms", format_range(&emitter.initial_life)),
                format_range(&emitter.speed),
                if emitter.use_additive {
                    "additive".to_string()
                } else {
                    "system".to_string()
                },
            ],
        );
    }
    table.printstd();

    if detailed {
        for emitter in &doc.emitters {
            println!("\nEmitter '{}':", emitter.name);
            crate::commands::emitter::parameter_table(emitter).printstd();
        }
    }

    Ok(())
}

fn handle_validate(file: &Path, show_warnings: bool) -> Result<()> {
    println!("Validating particle system: {}", file.display());

    let doc = load(file)?;
    let issues = validate_system(&doc);
    let (errors, warnings): (Vec<_>, Vec<_>) = issues
        .iter()
        .partition(|issue| issue.severity == Severity::Error);

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  ✗ {}.{}: {}", error.emitter, error.field, error.message);
        }
    }

    if show_warnings && !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!(
                "  ⚠ {}.{}: {}",
                warning.emitter, warning.field, warning.message
            );
        }
    }

    if !errors.is_empty() {
        anyhow::bail!(
            "Particle system validation failed with {} error(s)",
            errors.len()
        );
    }

    if warnings.is_empty() {
        println!("✓ Particle system is valid");
    } else {
        println!(
            "\n✓ Particle system is valid with {} warning(s)",
            warnings.len()
        );
    }
    Ok(())
}

fn handle_convert(input: &Path, output: &Path) -> Result<()> {
    let doc = load(input)?;
    write_system_document(&doc, output)
        .with_context(|| format!("Failed to write particle system: {}", output.display()))?;

    println!(
        "Converted {} -> {} ({} emitters)",
        input.display(),
        output.display(),
        doc.emitters.len()
    );
    Ok(())
}

struct NewArgs {
    output: PathBuf,
    name: String,
    image: Option<String>,
    count: Option<u32>,
    duration: Option<f32>,
    additive: bool,
    force: bool,
}

fn handle_new(args: NewArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists, use --force to overwrite",
            args.output.display()
        );
    }

    let mut emitter = ConfigurableEmitter::new(args.name);
    emitter.set_image_name(args.image);
    if let Some(count) = args.count {
        emitter.emit_count = Range::fixed(count as f32);
    }
    if let Some(duration) = args.duration {
        emitter.length = Range::fixed(duration);
    }

    let doc = SystemDocument {
        additive: args.additive,
        emitters: vec![EmitterDocument::from_emitter(&emitter)],
        ..SystemDocument::default()
    };
    write_system_document(&doc, &args.output)
        .with_context(|| format!("Failed to write particle system: {}", args.output.display()))?;

    println!("Created {}", args.output.display());
    Ok(())
}

struct SimulateArgs {
    file: PathBuf,
    frames: u32,
    delta: f32,
    max_particles: usize,
    seed: Option<u64>,
    images: Option<PathBuf>,
    keep_completed: bool,
    json: bool,
    quiet: bool,
}

/// Outcome of a headless run
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub frames: u32,
    pub simulated_ms: f32,
    pub emitters: usize,
    pub completed_emitters: usize,
    pub peak_particles: usize,
    pub final_particles: usize,
    pub draws: DrawStats,
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    if args.max_particles == 0 {
        anyhow::bail!("--max-particles must be at least 1");
    }

    let doc = load(&args.file)?;
    let config = SystemConfig {
        max_particles_per_emitter: args.max_particles,
        remove_completed_emitters: !args.keep_completed,
        ..SystemConfig::default()
    };
    let mut system = match args.seed {
        Some(seed) => doc.to_system_seeded(config, seed),
        None => doc.to_system(config),
    };
    if let Some(dir) = &args.images {
        system.set_image_loader(Box::new(DirectoryImageLoader::new(dir)));
    }

    let emitters = system.emitter_count();
    let mut sink = CountingSink::default();
    let mut peak = 0;

    let pb = create_progress_bar(
        u64::from(args.frames),
        "Simulating",
        args.quiet || args.json,
    );
    for _ in 0..args.frames {
        system.update(args.delta);
        system.render(&mut sink);
        peak = peak.max(system.particle_count());
        pb.inc(1);
    }
    pb.finish_and_clear();

    let removed = emitters - system.emitter_count();
    let still_completed = system
        .emitter_ids()
        .into_iter()
        .filter(|&id| system.emitter(id).is_some_and(|e| e.completed()))
        .count();

    let report = SimulationReport {
        frames: args.frames,
        simulated_ms: args.frames as f32 * args.delta,
        emitters,
        completed_emitters: removed + still_completed,
        peak_particles: peak,
        final_particles: system.particle_count(),
        draws: sink.stats(),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else {
        print_report(&args.file, &report);
    }
    Ok(())
}

fn print_report(file: &Path, report: &SimulationReport) {
    println!("Simulation: {}", file.display());
    println!("=====================================");
    println!(
        "Frames: {} ({}ms simulated)",
        report.frames, report.simulated_ms
    );
    println!(
        "Emitters: {} ({} completed)",
        report.emitters, report.completed_emitters
    );
    println!("Peak Live Particles: {}", report.peak_particles);
    println!("Final Live Particles: {}", report.final_particles);

    println!("\nDraw Calls:");
    println!("-----------");
    println!("  Sprites: {}", report.draws.sprites);
    println!("  Untextured Quads: {}", report.draws.untextured_quads);
    println!("  Points: {}", report.draws.points);
    println!("  Additive Draws: {}", report.draws.additive_draws);
    println!("  Blend Switches: {}", report.draws.blend_switches);
}

