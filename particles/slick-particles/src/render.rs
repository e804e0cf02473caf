//! Boundary towards the renderer and the image loader
//!
//! The particle core never talks to a graphics API. It issues draw calls on a
//! [`RenderSink`] and resolves image names through an [`ImageLoader`], both of
//! which are supplied by the embedding application.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;

/// Blending mode applied around a batch of particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlendMode {
    /// Standard alpha blending (src * alpha + dst * (1-alpha))
    #[default]
    Combine,
    /// Additive blending (src * alpha + dst)
    Additive,
}

/// How a particle is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RenderMode {
    /// Use whatever the owning system is configured for
    #[default]
    Inherit,
    /// Always draw a single coloured point
    Points,
    /// Always draw a textured quad
    Quads,
}

impl RenderMode {
    /// Resolve against the system-wide points flag
    pub fn uses_points(self, system_points: bool) -> bool {
        match self {
            RenderMode::Inherit => system_points,
            RenderMode::Points => true,
            RenderMode::Quads => false,
        }
    }

    /// Name used by the declarative format
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Inherit => "inherit",
            RenderMode::Points => "points",
            RenderMode::Quads => "quads",
        }
    }
}

/// A drawable image resolved by an [`ImageLoader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// Name the sprite was resolved from
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Sprite {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Shared, non-owning handle to a sprite
///
/// Cloning only bumps a reference count, so handing a sprite to a particle on
/// spawn never allocates.
pub type SpriteRef = Arc<Sprite>;

/// Resolves image names into sprites
pub trait ImageLoader {
    /// Load the named image
    fn load(&mut self, name: &str) -> Result<SpriteRef>;
}

/// Receives draw calls from [`ParticleSystem::render`](crate::ParticleSystem::render)
///
/// The blend mode is global, order-sensitive state on the renderer: the
/// system switches it around batches and restores [`BlendMode::Combine`]
/// when it is done.
pub trait RenderSink {
    /// Switch the blending mode for subsequent draw calls
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Draw a sprite (or an untextured quad when `sprite` is `None`) centred
    /// on `(x, y)`, rotated by `rotation` degrees
    #[allow(clippy::too_many_arguments)]
    fn draw_sprite(
        &mut self,
        sprite: Option<&Sprite>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        rotation: f32,
    );

    /// Draw a single point of the given size
    fn draw_point(&mut self, x: f32, y: f32, size: f32, color: Color);
}
