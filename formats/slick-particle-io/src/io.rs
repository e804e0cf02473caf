//! Loading and saving systems and emitters

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use slick_particles::{ConfigurableEmitter, ParticleSystem, SystemConfig};

use crate::document::{EmitterDocument, SystemDocument};
use crate::error::Result;
use crate::format::Format;

/// Read a system document and build the system it describes
pub fn load_system<R: Read>(
    reader: R,
    format: Format,
    config: SystemConfig,
) -> Result<ParticleSystem> {
    let doc = SystemDocument::read(reader, format)?;
    log::debug!("Loaded system document with {} emitters", doc.emitters.len());
    Ok(doc.to_system(config))
}

/// Read a system document from a file, picking the format by extension
pub fn load_system_from_path(
    path: impl AsRef<Path>,
    config: SystemConfig,
) -> Result<ParticleSystem> {
    let doc = read_system_document(path)?;
    Ok(doc.to_system(config))
}

/// Write every configurable emitter of `system`
pub fn save_system<W: Write>(system: &ParticleSystem, writer: W, format: Format) -> Result<()> {
    let doc = SystemDocument::from_system(system);
    log::debug!("Saving system with {} emitters as {}", doc.emitters.len(), format);
    doc.write(writer, format)
}

pub fn save_system_to_path(system: &ParticleSystem, path: impl AsRef<Path>) -> Result<()> {
    write_system_document(&SystemDocument::from_system(system), path)
}

/// Read a single emitter document
pub fn load_emitter<R: Read>(reader: R, format: Format) -> Result<ConfigurableEmitter> {
    let doc = EmitterDocument::read(reader, format)?;
    log::debug!("Loaded emitter '{}'", doc.name);
    Ok(doc.to_emitter())
}

pub fn save_emitter<W: Write>(
    emitter: &ConfigurableEmitter,
    writer: W,
    format: Format,
) -> Result<()> {
    EmitterDocument::from_emitter(emitter).write(writer, format)
}

/// Read a system document without building the system
pub fn read_system_document(path: impl AsRef<Path>) -> Result<SystemDocument> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    log::debug!("Reading {} as {}", path.display(), format);
    SystemDocument::read(BufReader::new(File::open(path)?), format)
}

pub fn write_system_document(doc: &SystemDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    log::debug!("Writing {} as {}", path.display(), format);

    let mut writer = BufWriter::new(File::create(path)?);
    doc.write(&mut writer, format)?;
    writer.flush()?;
    Ok(())
}
