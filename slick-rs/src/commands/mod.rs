//! Command implementations

pub mod emitter;
pub mod system;
