//! The particle system: emitters, their pools, update and render

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::configurable::ConfigurableEmitter;
use crate::emitter::{EmitterContext, EmitterId, ParticleEmitter};
use crate::error::{ParticleError, Result};
use crate::particle::{Particle, ParticleKey};
use crate::pool::{ParticlePool, PoolStats};
use crate::render::{BlendMode, ImageLoader, RenderSink, SpriteRef};

/// Default pool capacity per emitter
pub const DEFAULT_MAX_PARTICLES: usize = 100;

/// Settings of a [`ParticleSystem`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SystemConfig {
    /// Capacity of the pool created for each emitter
    pub max_particles_per_emitter: usize,
    /// Blend mode set before rendering
    pub blending: BlendMode,
    /// Draw particles as points unless their emitter says otherwise
    pub use_points: bool,
    /// Drop enabled emitters as soon as they report completion
    pub remove_completed_emitters: bool,
    /// Image applied to every new particle, resolved on the first update
    pub default_image_name: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_particles_per_emitter: DEFAULT_MAX_PARTICLES,
            blending: BlendMode::Combine,
            use_points: false,
            remove_completed_emitters: true,
            default_image_name: None,
        }
    }
}

struct EmitterSlot {
    id: EmitterId,
    emitter: Box<dyn ParticleEmitter>,
    pool: ParticlePool,
}

/// Owns a set of emitters and one fixed-capacity particle pool per emitter
///
/// The embedding loop calls [`update`](Self::update) then
/// [`render`](Self::render) once per frame.
///
/// # Examples
///
/// ```
/// use slick_particles::{ConfigurableEmitter, ParticleSystem, SystemConfig};
///
/// let mut system = ParticleSystem::new(SystemConfig::default());
/// let id = system.add_emitter(Box::new(ConfigurableEmitter::with_seed("sparks", 7)));
///
/// system.update(100.0);
/// assert_eq!(system.live_particles(id), Some(5));
/// ```
pub struct ParticleSystem {
    config: SystemConfig,
    slots: Vec<EmitterSlot>,
    next_id: u32,
    /// Handed out when a pool is exhausted; never pooled, updated or drawn
    dummy: Particle,
    default_sprite: Option<SpriteRef>,
    /// Image name the default sprite was resolved (or attempted) from
    default_sprite_source: Option<String>,
    images: Option<Box<dyn ImageLoader>>,
    x: f32,
    y: f32,
    visible: bool,
    particle_count: usize,
}

impl ParticleSystem {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            next_id: 0,
            dummy: Particle::dummy(),
            default_sprite: None,
            default_sprite_source: None,
            images: None,
            x: 0.0,
            y: 0.0,
            visible: true,
            particle_count: 0,
        }
    }

    /// Use an already-loaded default sprite instead of resolving one by name
    pub fn with_default_sprite(mut self, sprite: SpriteRef) -> Self {
        self.default_sprite = Some(sprite);
        self.default_sprite_source = self.config.default_image_name.clone();
        self
    }

    /// Install the loader used to resolve emitter and default image names
    pub fn set_image_loader(&mut self, loader: Box<dyn ImageLoader>) {
        self.images = Some(loader);
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Register an emitter and allocate its pool
    pub fn add_emitter(&mut self, emitter: Box<dyn ParticleEmitter>) -> EmitterId {
        let id = EmitterId::from_raw(self.next_id);
        self.next_id += 1;

        log::debug!(
            "Adding emitter {} '{}' with {} particles",
            id,
            emitter.name(),
            self.config.max_particles_per_emitter
        );
        self.slots.push(EmitterSlot {
            id,
            emitter,
            pool: ParticlePool::new(id, self.config.max_particles_per_emitter),
        });
        id
    }

    /// Unregister an emitter, discarding its pool and live particles
    pub fn remove_emitter(&mut self, id: EmitterId) -> Option<Box<dyn ParticleEmitter>> {
        let index = self.slots.iter().position(|slot| slot.id == id)?;
        let slot = self.slots.remove(index);
        self.particle_count = self.particle_count.saturating_sub(slot.pool.in_use());

        log::debug!("Removed emitter {} '{}'", id, slot.emitter.name());
        Some(slot.emitter)
    }

    pub fn remove_all_emitters(&mut self) {
        log::debug!("Removing all {} emitters", self.slots.len());
        self.slots.clear();
        self.particle_count = 0;
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&dyn ParticleEmitter> {
        self.slot(id).map(|slot| slot.emitter.as_ref())
    }

    pub fn emitter_mut(&mut self, id: EmitterId) -> Option<&mut dyn ParticleEmitter> {
        let slot = self.slot_mut(id)?;
        Some(slot.emitter.as_mut())
    }

    /// Borrow an emitter as its concrete type
    pub fn emitter_as<T: ParticleEmitter>(&self, id: EmitterId) -> Option<&T> {
        self.emitter(id)?.as_any().downcast_ref::<T>()
    }

    pub fn emitter_as_mut<T: ParticleEmitter>(&mut self, id: EmitterId) -> Option<&mut T> {
        self.emitter_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Registered emitters in update order
    pub fn emitter_ids(&self) -> Vec<EmitterId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn emitter_count(&self) -> usize {
        self.slots.len()
    }

    /// Return a particle to its pool
    ///
    /// The sentinel, stale keys and already-released slots are ignored.
    pub fn release(&mut self, key: ParticleKey) -> bool {
        let (Some(id), Some(index)) = (key.emitter, key.slot) else {
            return false;
        };
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };

        let released = slot.pool.expire(index);
        if released {
            slot.emitter.track_live_particles(slot.pool.in_use());
            self.particle_count = self.particle_count.saturating_sub(1);
        }
        released
    }

    /// Force-expire every live particle of one emitter
    pub fn release_all(&mut self, id: EmitterId) -> Result<usize> {
        let slot = self
            .slot_mut(id)
            .ok_or(ParticleError::UnknownEmitter(id))?;
        let released = slot.pool.release_all();
        slot.emitter.track_live_particles(0);
        self.particle_count = self.particle_count.saturating_sub(released);
        Ok(released)
    }

    /// Release the emitter's particles and clear its completion state
    pub fn reset_emitter(&mut self, id: EmitterId) -> Result<()> {
        self.release_all(id)?;
        if let Some(emitter) = self.emitter_mut(id) {
            emitter.reset();
        }
        Ok(())
    }

    /// Release the emitter's particles and restart its emission schedule
    pub fn replay_emitter(&mut self, id: EmitterId) -> Result<()> {
        self.reset_emitter(id)?;
        if let Some(emitter) = self.emitter_mut(id) {
            emitter.replay();
        }
        Ok(())
    }

    /// Shift every live particle of one emitter
    pub fn move_all(&mut self, id: EmitterId, dx: f32, dy: f32) -> Result<()> {
        let slot = self
            .slot_mut(id)
            .ok_or(ParticleError::UnknownEmitter(id))?;
        for particle in slot.pool.iter_mut() {
            particle.adjust_position(dx, dy);
        }
        Ok(())
    }

    /// Release every particle and reset every emitter
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.pool.release_all();
            slot.emitter.track_live_particles(0);
            slot.emitter.reset();
        }
        self.particle_count = 0;
    }

    /// Advance the simulation by `delta` milliseconds
    pub fn update(&mut self, delta: f32) {
        self.resolve_default_sprite();

        for slot in &mut self.slots {
            if !slot.emitter.is_enabled() {
                continue;
            }
            let images = self
                .images
                .as_mut()
                .map(|loader| &mut **loader as &mut dyn ImageLoader);
            let mut ctx = EmitterContext::new(
                &mut slot.pool,
                &mut self.dummy,
                self.default_sprite.as_ref(),
                images,
            );
            slot.emitter.update(&mut ctx, delta);
        }

        if self.config.remove_completed_emitters {
            self.slots.retain(|slot| {
                let done = slot.emitter.is_enabled() && slot.emitter.completed();
                if done {
                    log::debug!(
                        "Emitter {} '{}' completed, removing",
                        slot.id,
                        slot.emitter.name()
                    );
                }
                !done
            });
        }

        let mut count = 0;
        for slot in &mut self.slots {
            let live = slot.pool.update(slot.emitter.as_mut(), delta);
            slot.emitter.track_live_particles(live);
            count += live;
        }
        self.particle_count = count;
    }

    /// Draw every live particle
    pub fn render(&self, sink: &mut dyn RenderSink) {
        if !self.visible {
            return;
        }

        let offset = (self.x, self.y);
        sink.set_blend_mode(self.config.blending);
        for slot in &self.slots {
            let additive = slot.emitter.use_additive();
            if additive {
                sink.set_blend_mode(BlendMode::Additive);
            }
            for particle in slot.pool.iter() {
                particle.render(sink, offset, self.config.use_points);
            }
            if additive {
                sink.set_blend_mode(self.config.blending);
            }
        }
        sink.set_blend_mode(BlendMode::Combine);
    }

    /// Live particles across every emitter after the last update
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn live_particles(&self, id: EmitterId) -> Option<usize> {
        self.slot(id).map(|slot| slot.pool.in_use())
    }

    pub fn pool_stats(&self, id: EmitterId) -> Option<PoolStats> {
        self.slot(id).map(|slot| slot.pool.stats())
    }

    pub fn pool(&self, id: EmitterId) -> Option<&ParticlePool> {
        self.slot(id).map(|slot| &slot.pool)
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Offset applied to every particle when rendering
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn blending(&self) -> BlendMode {
        self.config.blending
    }

    pub fn set_blending(&mut self, blending: BlendMode) {
        self.config.blending = blending;
    }

    pub fn uses_points(&self) -> bool {
        self.config.use_points
    }

    pub fn set_use_points(&mut self, use_points: bool) {
        self.config.use_points = use_points;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn removes_completed_emitters(&self) -> bool {
        self.config.remove_completed_emitters
    }

    pub fn set_remove_completed_emitters(&mut self, remove: bool) {
        self.config.remove_completed_emitters = remove;
    }

    pub fn default_sprite(&self) -> Option<&SpriteRef> {
        self.default_sprite.as_ref()
    }

    /// Change the default image; it is resolved on the next update
    pub fn set_default_image_name(&mut self, name: Option<String>) {
        self.config.default_image_name = name;
    }

    /// Copy of this system with duplicated emitters and empty pools
    ///
    /// Only [`ConfigurableEmitter`]s can be duplicated. The image loader is
    /// not carried over; the default sprite is.
    pub fn duplicate(&self) -> Result<Self> {
        let mut copy = Self::new(self.config.clone());
        copy.default_sprite = self.default_sprite.clone();
        copy.default_sprite_source = self.default_sprite_source.clone();
        copy.x = self.x;
        copy.y = self.y;
        copy.visible = self.visible;

        for slot in &self.slots {
            let emitter = slot
                .emitter
                .as_any()
                .downcast_ref::<ConfigurableEmitter>()
                .ok_or_else(|| {
                    ParticleError::InvalidConfig(format!(
                        "emitter {} '{}' is not configurable and cannot be duplicated",
                        slot.id,
                        slot.emitter.name()
                    ))
                })?;
            copy.add_emitter(Box::new(emitter.duplicate()));
        }
        Ok(copy)
    }

    fn slot(&self, id: EmitterId) -> Option<&EmitterSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    fn slot_mut(&mut self, id: EmitterId) -> Option<&mut EmitterSlot> {
        self.slots.iter_mut().find(|slot| slot.id == id)
    }

    fn resolve_default_sprite(&mut self) {
        if self.config.default_image_name == self.default_sprite_source {
            return;
        }
        self.default_sprite_source = self.config.default_image_name.clone();

        let Some(name) = self.config.default_image_name.as_deref() else {
            self.default_sprite = None;
            return;
        };
        let loaded = match self.images.as_mut() {
            Some(loader) => loader.load(name),
            None => Err(ParticleError::NoImageLoader(name.to_string())),
        };
        self.default_sprite = match loaded {
            Ok(sprite) => Some(sprite),
            Err(e) => {
                log::warn!("Particles continue without a default sprite: {}", e);
                None
            }
        };
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(SystemConfig::default())
    }
}

impl fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("config", &self.config)
            .field("emitters", &self.emitter_ids())
            .field("particle_count", &self.particle_count)
            .field("position", &(self.x, self.y))
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}
