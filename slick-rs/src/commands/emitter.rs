//! Single emitter command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use prettytable::Table;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use slick_particle_io::{EmitterDocument, Format, read_system_document, validate_emitter};

use crate::utils::{
    completion_mode, create_field_table, format_curve, format_range, format_value,
};

#[derive(Subcommand)]
pub enum EmitterCommands {
    /// Display every parameter of an emitter file
    Info {
        /// Path to the emitter file (.json, .yaml, .yml)
        file: PathBuf,
    },

    /// Copy one emitter out of a particle system file
    Extract {
        /// Path to the system file
        system: PathBuf,

        /// Name of the emitter to extract
        name: String,

        /// Output file; the format follows its extension
        output: PathBuf,
    },
}

pub fn execute(cmd: EmitterCommands) -> Result<()> {
    match cmd {
        EmitterCommands::Info { file } => handle_info(&file),
        EmitterCommands::Extract {
            system,
            name,
            output,
        } => handle_extract(&system, &name, &output),
    }
}

fn handle_info(file: &Path) -> Result<()> {
    let format = Format::from_path(file)?;
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    let doc = EmitterDocument::read(reader, format)
        .with_context(|| format!("Failed to read emitter: {}", file.display()))?;

    println!("Emitter: {}", doc.name);
    println!("=====================================");
    parameter_table(&doc).printstd();

    let issues = validate_emitter(&doc);
    if !issues.is_empty() {
        println!("\nIssues:");
        for issue in &issues {
            println!("  {issue}");
        }
    }
    Ok(())
}

fn handle_extract(system: &Path, name: &str, output: &Path) -> Result<()> {
    let doc = read_system_document(system)
        .with_context(|| format!("Failed to read particle system: {}", system.display()))?;

    let Some(emitter) = doc.emitters.iter().find(|e| e.name == name) else {
        let known: Vec<_> = doc.emitters.iter().map(|e| e.name.as_str()).collect();
        anyhow::bail!(
            "No emitter named '{}' in {} (found: {})",
            name,
            system.display(),
            known.join(", ")
        );
    };

    let format = Format::from_path(output)?;
    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    emitter.write(&mut writer, format)?;
    writer.flush()?;

    println!("Extracted '{}' to {}", name, output.display());
    Ok(())
}

/// Field/value table covering every parameter of `doc`
pub fn parameter_table(doc: &EmitterDocument) -> Table {
    let colors = doc
        .color
        .iter()
        .map(|s| format!("{}:({}, {}, {})", s.offset, s.r, s.g, s.b))
        .collect::<Vec<_>>()
        .join(" ");

    create_field_table(&[
        ("image", doc.image_name.clone().unwrap_or_else(|| "-".to_string())),
        ("renderType", doc.render_type.as_str().to_string()),
        ("useAdditive", doc.use_additive.to_string()),
        ("useOriented", doc.use_oriented.to_string()),
        ("completion", completion_mode(doc)),
        ("spawnInterval", format_range(&doc.spawn_interval)),
        ("spawnCount", format_range(&doc.spawn_count)),
        ("initialLife", format_range(&doc.initial_life)),
        ("initialSize", format_range(&doc.initial_size)),
        ("xOffset", format_range(&doc.x_offset)),
        ("yOffset", format_range(&doc.y_offset)),
        ("initialDistance", format_range(&doc.initial_distance)),
        ("speed", format_range(&doc.speed)),
        ("spread", format_value(&doc.spread)),
        ("angularOffset", format_value(&doc.angular_offset)),
        ("growthFactor", format_value(&doc.growth_factor)),
        ("gravityFactor", format_value(&doc.gravity_factor)),
        ("windFactor", format_value(&doc.wind_factor)),
        ("startAlpha", format_value(&doc.start_alpha)),
        ("endAlpha", format_value(&doc.end_alpha)),
        ("alpha", format_curve(&doc.alpha)),
        ("size", format_curve(&doc.size)),
        ("velocity", format_curve(&doc.velocity)),
        ("scaleY", format_curve(&doc.scale_y)),
        ("color", colors),
    ])
}
