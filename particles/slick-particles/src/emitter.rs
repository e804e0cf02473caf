//! The emitter contract and the view an emitter gets of its system

use std::any::Any;
use std::fmt;

use crate::error::{ParticleError, Result};
use crate::particle::Particle;
use crate::pool::ParticlePool;
use crate::render::{ImageLoader, SpriteRef};

/// Handle of an emitter registered with a [`ParticleSystem`](crate::ParticleSystem)
///
/// Ids are never reused within one system, so a stale id simply stops
/// resolving once its emitter is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(u32);

impl EmitterId {
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A recipe that spawns particles and evolves them every tick
///
/// [`ConfigurableEmitter`](crate::ConfigurableEmitter) is the data-driven
/// implementation; custom emitters only need the five required operations
/// plus the `Any` accessors.
pub trait ParticleEmitter: Any {
    /// Called once per system tick while enabled; spawn through `ctx`
    fn update(&mut self, ctx: &mut EmitterContext<'_>, delta: f32);

    /// Apply per-tick physics and colour to one of this emitter's particles
    fn update_particle(&mut self, particle: &mut Particle, delta: f32);

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Whether the emitter has finished and all its particles are gone
    fn completed(&self) -> bool;

    /// Told how many of this emitter's particles are alive after every
    /// particle pass and forced release
    fn track_live_particles(&mut self, _live: usize) {}

    /// Display name
    fn name(&self) -> &str {
        "emitter"
    }

    /// Render this emitter's particles with additive blending
    fn use_additive(&self) -> bool {
        false
    }

    /// Stop spawning and complete once the live particles have drained
    fn wrap_up(&mut self) {}

    /// Clear completion state; called after the system released the
    /// emitter's particles
    fn reset(&mut self) {}

    /// Restart the emission schedule
    fn replay(&mut self) {}

    /// Undo [`wrap_up`](Self::wrap_up) and replay
    fn reset_state(&mut self) {
        self.replay();
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// An emitter's view of its owning system during
/// [`ParticleEmitter::update`]
pub struct EmitterContext<'a> {
    id: EmitterId,
    pool: &'a mut ParticlePool,
    dummy: &'a mut Particle,
    default_sprite: Option<&'a SpriteRef>,
    images: Option<&'a mut dyn ImageLoader>,
}

impl<'a> EmitterContext<'a> {
    pub(crate) fn new(
        pool: &'a mut ParticlePool,
        dummy: &'a mut Particle,
        default_sprite: Option<&'a SpriteRef>,
        images: Option<&'a mut dyn ImageLoader>,
    ) -> Self {
        Self {
            id: pool.emitter(),
            pool,
            dummy,
            default_sprite,
            images,
        }
    }

    pub fn emitter_id(&self) -> EmitterId {
        self.id
    }

    /// Hand out a pooled particle initialised with `life`
    ///
    /// When the pool is exhausted a warning is logged and the shared
    /// sentinel is returned instead. The sentinel is never updated, rendered
    /// or released, so whatever the caller writes to it is discarded.
    pub fn new_particle(&mut self, life: f32) -> &mut Particle {
        let id = self.id;
        if self.pool.available() == 0 {
            log::warn!(
                "Particle pool for emitter {} exhausted ({} particles in use)",
                id,
                self.pool.capacity()
            );
        }

        let sprite = self.default_sprite.cloned();
        match self.pool.acquire(life) {
            Some(particle) => {
                particle.set_sprite(sprite);
                particle
            }
            None => {
                self.dummy.init(id, life);
                &mut *self.dummy
            }
        }
    }

    /// Particles of this emitter currently alive
    pub fn live_particles(&self) -> usize {
        self.pool.in_use()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Force-expire every live particle of this emitter
    pub fn release_all(&mut self) {
        self.pool.release_all();
    }

    /// Resolve an image through the system's loader
    pub fn load_image(&mut self, name: &str) -> Result<SpriteRef> {
        match self.images.as_deref_mut() {
            Some(loader) => loader.load(name),
            None => Err(ParticleError::NoImageLoader(name.to_string())),
        }
    }
}
