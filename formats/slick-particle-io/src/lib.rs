//! Declarative persistence for `slick-particles`.
//!
//! Particle systems and single emitters are stored as documents mirroring
//! the classic particle editor layout: a system carries its `additive` and
//! `points` flags and a list of emitters, each emitter carries every range,
//! value and curve parameter plus its colour steps.
//!
//! ```
//! use slick_particle_io::{Format, load_system, save_system};
//! use slick_particles::{ConfigurableEmitter, ParticleSystem, SystemConfig};
//!
//! let mut system = ParticleSystem::default();
//! system.add_emitter(Box::new(ConfigurableEmitter::new("sparks")));
//!
//! let mut buffer = Vec::new();
//! save_system(&system, &mut buffer, Format::Json).unwrap();
//!
//! let loaded = load_system(buffer.as_slice(), Format::Json, SystemConfig::default()).unwrap();
//! assert_eq!(loaded.emitter_count(), 1);
//! ```

pub mod document;
pub mod error;
pub mod format;
pub mod io;
pub mod validation;

pub use document::{ColorStep, EmitterDocument, SystemDocument};
pub use error::{ParticleIoError, Result};
pub use format::Format;
pub use io::{
    load_emitter, load_system, load_system_from_path, read_system_document, save_emitter,
    save_system, save_system_to_path, write_system_document,
};
pub use validation::{Severity, ValidationIssue, check_system, validate_emitter, validate_system};
