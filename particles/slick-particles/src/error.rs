use thiserror::Error;

use crate::emitter::EmitterId;

/// Error types for particle system operations
///
/// None of these are raised from `ParticleSystem::update` or `render`; the
/// simulation degrades instead of failing.
#[derive(Error, Debug)]
pub enum ParticleError {
    /// An image could not be resolved by the image loader
    #[error("Failed to load image '{name}': {reason}")]
    ImageLoad { name: String, reason: String },

    /// No image loader is installed on the system
    #[error("No image loader available to resolve '{0}'")]
    NoImageLoader(String),

    /// The emitter id does not belong to this system
    #[error("Unknown emitter: {0}")]
    UnknownEmitter(EmitterId),

    /// A configuration value is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type using ParticleError
pub type Result<T> = std::result::Result<T, ParticleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParticleError::ImageLoad {
            name: "fire.png".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(
            format!("{error}"),
            "Failed to load image 'fire.png': not found"
        );

        let error = ParticleError::InvalidConfig("capacity is zero".to_string());
        assert_eq!(format!("{error}"), "Invalid configuration: capacity is zero");
    }
}
