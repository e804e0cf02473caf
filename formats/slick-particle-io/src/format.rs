//! Supported document encodings

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ParticleIoError, Result};

/// Encoding of a particle document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
}

impl Format {
    /// Pick the format from a file extension (`json`, `yaml`, `yml`)
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(ParticleIoError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Pick the format from a path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParticleIoError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            #[cfg(feature = "yaml")]
            Format::Yaml => "yaml",
        }
    }

    pub(crate) fn read<T: DeserializeOwned, R: Read>(self, reader: R) -> Result<T> {
        match self {
            Format::Json => Ok(serde_json::from_reader(reader)?),
            #[cfg(feature = "yaml")]
            Format::Yaml => Ok(serde_yaml_ng::from_reader(reader)?),
        }
    }

    pub(crate) fn write<T: Serialize, W: Write>(self, value: &T, mut writer: W) -> Result<()> {
        match self {
            Format::Json => {
                serde_json::to_writer_pretty(&mut writer, value)?;
                writeln!(writer)?;
            }
            #[cfg(feature = "yaml")]
            Format::Yaml => serde_yaml_ng::to_writer(&mut writer, value)?,
        }
        Ok(())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
