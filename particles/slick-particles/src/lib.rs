//! Pooled 2D particle system.
//!
//! A [`ParticleSystem`] owns a list of emitters and one fixed-capacity
//! [`ParticlePool`] per emitter. Every frame the embedding loop calls
//! [`ParticleSystem::update`], which lets each enabled emitter spawn through an
//! [`EmitterContext`] and then ages every live particle, followed by
//! [`ParticleSystem::render`] which issues draw calls on a [`RenderSink`].
//!
//! [`ConfigurableEmitter`] is the stock, data-driven emitter. Custom emitters
//! implement [`ParticleEmitter`].
//!
//! ```
//! use slick_particles::{ConfigurableEmitter, ParticleEmitter, ParticleSystem, Range};
//!
//! let mut fountain = ConfigurableEmitter::with_seed("fountain", 42);
//! fountain.spread.set(30.0);
//! fountain.gravity_factor.set(2.0);
//! fountain.emit_count = Range::fixed(20.0);
//! fountain.replay();
//!
//! let mut system = ParticleSystem::default();
//! let id = system.add_emitter(Box::new(fountain));
//! for _ in 0..10 {
//!     system.update(16.0);
//! }
//! assert!(system.live_particles(id).is_some_and(|live| live <= 20));
//! ```
//!
//! The core never fails during simulation: an exhausted pool hands out a
//! throwaway sentinel particle, a missing image leaves particles spriteless
//! and a malformed colour ramp skips the colour update.

pub mod color;
pub mod configurable;
pub mod emitter;
pub mod error;
pub mod params;
pub mod particle;
pub mod pool;
pub mod render;
pub mod system;

pub use color::{Color, ColorRamp, ColorStop};
pub use configurable::ConfigurableEmitter;
pub use emitter::{EmitterContext, EmitterId, ParticleEmitter};
pub use error::{ParticleError, Result};
pub use params::{Curve, Range, Value};
pub use particle::{Particle, ParticleKey};
pub use pool::{ParticlePool, PoolStats};
pub use render::{BlendMode, ImageLoader, RenderMode, RenderSink, Sprite, SpriteRef};
pub use system::{DEFAULT_MAX_PARTICLES, ParticleSystem, SystemConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
