//! Data-driven particle emitter
//!
//! A [`ConfigurableEmitter`] is a bag of [`Range`], [`Value`] and [`Curve`]
//! parameters plus a colour ramp. It decides when and how many particles to
//! spawn, gives each one its initial kinematics, and evolves size, velocity
//! and colour over the particle's life.
//!
//! # Completion
//!
//! At most one completion policy is expected to be enabled:
//! - duration mode (`length` enabled): spawning stops once the sampled
//!   length has elapsed
//! - count mode (`emit_count` enabled): spawning stops after the sampled
//!   number of particles
//!
//! Either way the emitter only reports [`completed`](ParticleEmitter::completed)
//! once its last particle has expired. With neither enabled it never
//! completes unless [`wrap_up`](ParticleEmitter::wrap_up) is called.

use std::any::Any;
use std::mem;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::color::{Color, ColorRamp};
use crate::emitter::{EmitterContext, ParticleEmitter};
use crate::params::{Curve, Range, Value};
use crate::particle::Particle;
use crate::render::{RenderMode, SpriteRef};

/// Converts a speed in units per second into units per millisecond
const SPEED_SCALE: f32 = 0.001;
/// Per-millisecond growth scale
const GROWTH_SCALE: f32 = 0.001;
/// Per-tick wind and gravity scale
const FORCE_SCALE: f32 = 0.0001;

/// The stock emitter: every aspect of spawning and evolution is a parameter
#[derive(Debug, Clone)]
pub struct ConfigurableEmitter {
    name: String,
    image_name: Option<String>,
    sprite: Option<SpriteRef>,
    /// Image name the current sprite was resolved (or attempted) from
    sprite_source: Option<String>,
    x: f32,
    y: f32,

    /// Milliseconds between spawn batches
    pub spawn_interval: Range,
    /// Particles per batch
    pub spawn_count: Range,
    /// Particle life in milliseconds
    pub initial_life: Range,
    pub initial_size: Range,
    pub x_offset: Range,
    pub y_offset: Range,
    /// Distance from the emitter along the spawn angle
    pub initial_distance: Range,
    /// Initial speed in units per second
    pub speed: Range,
    /// Emission duration; enables duration mode
    pub length: Range,
    /// Total particles to emit; enables count mode
    pub emit_count: Range,
    /// Angular spread in degrees
    pub spread: Value,
    /// Direction of the spread in degrees, 0 pointing up
    pub angular_offset: Value,
    pub growth_factor: Value,
    pub gravity_factor: Value,
    pub wind_factor: Value,
    /// Alpha at spawn, 0..=255
    pub start_alpha: Value,
    /// Alpha at death, 0..=255
    pub end_alpha: Value,
    /// Overrides the start/end alpha fade when active
    pub alpha: Curve,
    /// Overrides growth when active
    pub size: Curve,
    /// Rescales particle speed when active
    pub velocity: Curve,
    /// Vertical stretch when active
    pub scale_y: Curve,
    pub colors: ColorRamp,
    pub render_mode: RenderMode,
    pub use_additive: bool,
    pub use_oriented: bool,

    rng: StdRng,
    next_spawn: f32,
    timeout: f32,
    left_to_emit: i32,
    enabled: bool,
    wrap_up: bool,
    /// Set once a system has called `update`
    attached: bool,
    live_particles: usize,
    /// Move requested through `set_position`, applied on the next tick
    pending_move: (f32, f32),
    /// Move applied to every particle during the current tick
    active_move: (f32, f32),
}

impl ConfigurableEmitter {
    /// Create an emitter with the stock parameters, seeded from the OS
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rng(name, StdRng::from_os_rng())
    }

    /// Create an emitter with a deterministic random sequence
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(name, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, rng: StdRng) -> Self {
        let mut colors = ColorRamp::new();
        colors.add_point(0.0, Color::WHITE);
        colors.add_point(1.0, Color::RED);

        let mut emitter = Self {
            name: name.into(),
            image_name: None,
            sprite: None,
            sprite_source: None,
            x: 0.0,
            y: 0.0,
            spawn_interval: Range::new(100.0, 100.0),
            spawn_count: Range::new(5.0, 5.0),
            initial_life: Range::new(1000.0, 1000.0),
            initial_size: Range::new(10.0, 10.0),
            x_offset: Range::new(0.0, 0.0),
            y_offset: Range::new(0.0, 0.0),
            initial_distance: Range::new(0.0, 0.0),
            speed: Range::new(50.0, 50.0),
            length: Range::disabled(1000.0, 1000.0),
            emit_count: Range::disabled(1000.0, 1000.0),
            spread: Value::new(360.0),
            angular_offset: Value::new(0.0),
            growth_factor: Value::new(0.0),
            gravity_factor: Value::new(0.0),
            wind_factor: Value::new(0.0),
            start_alpha: Value::new(255.0),
            end_alpha: Value::new(0.0),
            alpha: Curve::line(255.0, 0.0, 0.0, 255.0),
            size: Curve::line(10.0, 10.0, 0.0, 100.0),
            velocity: Curve::line(1.0, 1.0, 0.0, 1.0),
            scale_y: Curve::line(1.0, 1.0, 0.0, 1.0),
            colors,
            render_mode: RenderMode::Inherit,
            use_additive: false,
            use_oriented: false,
            rng,
            next_spawn: 0.0,
            timeout: 0.0,
            left_to_emit: 0,
            enabled: true,
            wrap_up: false,
            attached: false,
            live_particles: 0,
            pending_move: (0.0, 0.0),
            active_move: (0.0, 0.0),
        };
        emitter.replay();
        emitter
    }

    /// Reseed the random sequence
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Move the emitter; with `move_particles` its live particles follow on
    /// the next tick
    pub fn set_position(&mut self, x: f32, y: f32, move_particles: bool) {
        if move_particles {
            self.pending_move.0 += x - self.x;
            self.pending_move.1 += y - self.y;
        }
        self.x = x;
        self.y = y;
    }

    pub fn image_name(&self) -> Option<&str> {
        self.image_name.as_deref()
    }

    /// Change the sprite image; it is resolved on the next update
    pub fn set_image_name(&mut self, name: Option<String>) {
        self.image_name = name.filter(|n| !n.is_empty());
    }

    pub fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    /// Install an already-loaded sprite for the current image name
    pub fn set_sprite(&mut self, sprite: Option<SpriteRef>) {
        self.sprite = sprite;
        self.sprite_source = self.image_name.clone();
    }

    pub fn add_color_point(&mut self, position: f32, color: Color) {
        self.colors.add_point(position, color);
    }

    pub fn color_ramp(&self) -> &ColorRamp {
        &self.colors
    }

    pub fn color_ramp_mut(&mut self) -> &mut ColorRamp {
        &mut self.colors
    }

    /// Remaining emission time in duration mode
    pub fn timeout(&self) -> f32 {
        self.timeout
    }

    /// Particles still to emit in count mode
    pub fn left_to_emit(&self) -> i32 {
        self.left_to_emit
    }

    /// Countdown to the next spawn batch
    pub fn next_spawn(&self) -> f32 {
        self.next_spawn
    }

    /// Live particles as last reported by the owning system
    pub fn live_particles(&self) -> usize {
        self.live_particles
    }

    /// Whether spawning has stopped for good (until a replay)
    pub fn is_spent(&self) -> bool {
        self.wrap_up
            || (self.length.enabled && self.timeout <= 0.0)
            || (self.emit_count.enabled && self.left_to_emit <= 0)
    }

    /// Copy of the configuration with fresh runtime state
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.rng = StdRng::from_os_rng();
        copy.enabled = true;
        copy.wrap_up = false;
        copy.attached = false;
        copy.live_particles = 0;
        copy.pending_move = (0.0, 0.0);
        copy.active_move = (0.0, 0.0);
        copy.angular_offset.reset();
        copy.spread.reset();
        copy.replay();
        copy
    }

    fn resolve_sprite(&mut self, ctx: &mut EmitterContext<'_>) {
        if self.image_name == self.sprite_source {
            return;
        }
        self.sprite_source = self.image_name.clone();

        self.sprite = match self.image_name.as_deref() {
            None => None,
            Some(name) => match ctx.load_image(name) {
                Ok(sprite) => Some(sprite),
                Err(e) => {
                    log::warn!("Emitter '{}' continues without a sprite: {}", self.name, e);
                    None
                }
            },
        };
    }

    fn spawn_batch(&mut self, ctx: &mut EmitterContext<'_>) {
        let count = self.spawn_count.random(&mut self.rng).round().max(0.0) as u32;

        for _ in 0..count {
            self.spawn_particle(ctx);

            if self.emit_count.enabled {
                self.left_to_emit -= 1;
                if self.left_to_emit <= 0 {
                    break;
                }
            }
        }
    }

    fn spawn_particle(&mut self, ctx: &mut EmitterContext<'_>) {
        let life = self.initial_life.random(&mut self.rng);
        let size = self.initial_size.random(&mut self.rng);
        let x = self.x + self.x_offset.random(&mut self.rng);
        let y = self.y + self.y_offset.random(&mut self.rng);

        let spread = self.spread.random(&mut self.rng);
        let angle = spread + self.angular_offset.next() - self.spread.get() / 2.0 - 90.0;
        let (sin, cos) = angle.to_radians().sin_cos();
        let distance = self.initial_distance.random(&mut self.rng);
        let power = self.speed.random(&mut self.rng);

        let start = self.colors.first().unwrap_or(Color::WHITE);
        let alpha = self.start_alpha.get() / 255.0;

        let particle = ctx.new_particle(life);
        particle.set_size(size);
        particle.set_position(x, y);
        particle.adjust_position(cos * distance, sin * distance);
        particle.set_velocity(cos, sin, power * SPEED_SCALE);
        if let Some(sprite) = &self.sprite {
            particle.set_sprite(Some(SpriteRef::clone(sprite)));
        }
        particle.set_color(start.r, start.g, start.b, alpha);
        particle.set_render_mode(self.render_mode);
        particle.set_oriented(self.use_oriented);
    }
}

impl Default for ConfigurableEmitter {
    fn default() -> Self {
        Self::new("emitter")
    }
}

impl ParticleEmitter for ConfigurableEmitter {
    fn update(&mut self, ctx: &mut EmitterContext<'_>, delta: f32) {
        self.attached = true;
        self.active_move = mem::take(&mut self.pending_move);
        self.resolve_sprite(ctx);

        let spawning = !self.wrap_up
            && !(self.length.enabled && self.timeout < 0.0)
            && !(self.emit_count.enabled && self.left_to_emit <= 0);

        if spawning {
            if self.length.enabled {
                self.timeout -= delta;
            }

            self.next_spawn -= delta;
            if self.next_spawn <= 0.0 {
                self.next_spawn = self.spawn_interval.random(&mut self.rng);
                self.spawn_batch(ctx);
            }
        }

        self.live_particles = ctx.live_particles();
    }

    fn update_particle(&mut self, particle: &mut Particle, delta: f32) {
        if self.active_move != (0.0, 0.0) {
            particle.adjust_position(self.active_move.0, self.active_move.1);
        }

        // Forces accumulate per tick, independent of delta.
        particle.adjust_velocity(
            self.wind_factor.get() * FORCE_SCALE,
            self.gravity_factor.get() * FORCE_SCALE,
        );

        let offset = if particle.original_life() > 0.0 {
            particle.life() / particle.original_life()
        } else {
            0.0
        };
        let inv = 1.0 - offset;

        if self.size.is_active() {
            particle.set_size(self.size.value(inv));
        } else {
            particle.adjust_size(delta * self.growth_factor.get() * GROWTH_SCALE);
        }

        if let Some(color) = self.colors.sample(inv) {
            let alpha = if self.alpha.is_active() {
                self.alpha.value(inv) / 255.0
            } else {
                (self.start_alpha.get() / 255.0) * offset + (self.end_alpha.get() / 255.0) * inv
            };
            particle.set_color(color.r, color.g, color.b, alpha);
        }

        if self.velocity.is_active() {
            particle.set_speed(self.velocity.value(inv));
        }
        if self.scale_y.is_active() {
            particle.set_scale_y(self.scale_y.value(inv));
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.active_move = (0.0, 0.0);
        }
    }

    fn completed(&self) -> bool {
        self.attached && self.is_spent() && self.live_particles == 0
    }

    fn track_live_particles(&mut self, live: usize) {
        self.live_particles = live;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn use_additive(&self) -> bool {
        self.use_additive
    }

    fn wrap_up(&mut self) {
        self.wrap_up = true;
    }

    fn reset(&mut self) {
        self.live_particles = 0;
        self.pending_move = (0.0, 0.0);
        self.active_move = (0.0, 0.0);
    }

    fn replay(&mut self) {
        self.next_spawn = 0.0;
        self.left_to_emit = self.emit_count.random(&mut self.rng).round() as i32;
        self.timeout = self.length.random(&mut self.rng);
    }

    fn reset_state(&mut self) {
        self.wrap_up = false;
        self.angular_offset.reset();
        self.spread.reset();
        self.replay();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
