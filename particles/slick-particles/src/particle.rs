//! Individual particle representation

use crate::color::Color;
use crate::emitter::{EmitterId, ParticleEmitter};
use crate::render::{RenderMode, RenderSink, SpriteRef};

/// Identifies a pooled particle: the emitter owning the pool and the slot
/// index inside it
///
/// The sentinel particle handed out on pool exhaustion has no slot, so
/// releasing its key is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleKey {
    pub emitter: Option<EmitterId>,
    pub slot: Option<u32>,
}

/// A single particle in a pool
///
/// A particle holds no behaviour beyond linear motion and its life
/// countdown; everything else is applied by the owning emitter through the
/// mutators.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position of the particle centre
    x: f32,
    y: f32,
    /// Velocity in units per millisecond
    velx: f32,
    vely: f32,
    /// Side length of the quad, or point size
    size: f32,
    color: Color,
    /// Remaining life in milliseconds
    life: f32,
    /// Life at spawn time
    original_life: f32,
    scale_y: f32,
    oriented: bool,
    render_mode: RenderMode,
    sprite: Option<SpriteRef>,
    emitter: Option<EmitterId>,
    slot: Option<u32>,
}

impl Particle {
    /// A pool slot owned by `emitter`; starts out available
    pub(crate) fn pooled(emitter: EmitterId, slot: u32) -> Self {
        Self {
            emitter: Some(emitter),
            slot: Some(slot),
            ..Self::detached()
        }
    }

    /// The sentinel returned when a pool is exhausted
    pub(crate) fn dummy() -> Self {
        Self::detached()
    }

    fn detached() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            velx: 0.0,
            vely: 0.0,
            size: 10.0,
            color: Color::WHITE,
            life: -1.0,
            original_life: 0.0,
            scale_y: 1.0,
            oriented: false,
            render_mode: RenderMode::Inherit,
            sprite: None,
            emitter: None,
            slot: None,
        }
    }

    /// Re-initialise for a new life handed to `emitter`
    pub fn init(&mut self, emitter: EmitterId, life: f32) {
        self.x = 0.0;
        self.y = 0.0;
        self.velx = 0.0;
        self.vely = 0.0;
        self.size = 10.0;
        self.color = Color::WHITE;
        self.life = life;
        self.original_life = life;
        self.scale_y = 1.0;
        self.oriented = false;
        self.render_mode = RenderMode::Inherit;
        self.sprite = None;
        self.emitter = Some(emitter);
    }

    /// Advance by `delta` milliseconds
    ///
    /// Returns `false` once the life has dropped below zero; the owning pool
    /// then releases the slot. A particle at exactly zero life is still alive.
    pub fn update(&mut self, emitter: &mut dyn ParticleEmitter, delta: f32) -> bool {
        self.life -= delta;
        if self.life >= 0.0 {
            self.x += delta * self.velx;
            self.y += delta * self.vely;
            emitter.update_particle(self, delta);
            true
        } else {
            false
        }
    }

    /// Issue this particle's draw call, offset by the system position
    pub fn render(&self, sink: &mut dyn RenderSink, offset: (f32, f32), system_points: bool) {
        let x = self.x + offset.0;
        let y = self.y + offset.1;

        if self.render_mode.uses_points(system_points) {
            sink.draw_point(x, y, self.size, self.color);
            return;
        }

        let rotation = if self.oriented {
            self.vely.atan2(self.velx).to_degrees() + 90.0
        } else {
            0.0
        };
        sink.draw_sprite(
            self.sprite.as_deref(),
            x,
            y,
            self.size,
            self.size * self.scale_y,
            self.color,
            rotation,
        );
    }

    /// Whether the particle is alive
    #[inline]
    pub fn is_in_use(&self) -> bool {
        self.life >= 0.0
    }

    /// Expire on the next update with a positive delta
    pub fn kill(&mut self) {
        self.life = 0.0;
    }

    pub fn key(&self) -> ParticleKey {
        ParticleKey {
            emitter: self.emitter,
            slot: self.slot,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.slot.is_none()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.velx, self.vely)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn original_life(&self) -> f32 {
        self.original_life
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    pub fn is_oriented(&self) -> bool {
        self.oriented
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    pub fn emitter(&self) -> Option<EmitterId> {
        self.emitter
    }

    pub fn slot(&self) -> Option<u32> {
        self.slot
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn adjust_position(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Set the velocity from a direction and a speed
    pub fn set_velocity(&mut self, dir_x: f32, dir_y: f32, speed: f32) {
        self.velx = dir_x * speed;
        self.vely = dir_y * speed;
    }

    pub fn adjust_velocity(&mut self, dx: f32, dy: f32) {
        self.velx += dx;
        self.vely += dy;
    }

    /// Rescale the velocity to `speed`, keeping its direction
    pub fn set_speed(&mut self, speed: f32) {
        let current = self.velx.hypot(self.vely);
        if current > 0.0 {
            self.velx = self.velx / current * speed;
            self.vely = self.vely / current * speed;
        }
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    /// Grow (or shrink) the size, never below zero
    pub fn adjust_size(&mut self, delta: f32) {
        self.size = (self.size + delta).max(0.0);
    }

    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = Color::rgba(r, g, b, a);
    }

    pub fn adjust_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color.r += r;
        self.color.g += g;
        self.color.b += b;
        self.color.a += a;
    }

    pub fn set_life(&mut self, life: f32) {
        self.life = life;
    }

    pub fn set_scale_y(&mut self, scale_y: f32) {
        self.scale_y = scale_y;
    }

    pub fn set_oriented(&mut self, oriented: bool) {
        self.oriented = oriented;
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn set_sprite(&mut self, sprite: Option<SpriteRef>) {
        self.sprite = sprite;
    }
}
