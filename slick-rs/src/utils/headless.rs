//! Rendering and image loading without a window

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use slick_particles::{
    BlendMode, Color, ImageLoader, ParticleError, RenderSink, Sprite, SpriteRef,
};

/// Draw-call counters collected by [`CountingSink`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawStats {
    pub sprites: u64,
    pub untextured_quads: u64,
    pub points: u64,
    pub additive_draws: u64,
    pub blend_switches: u64,
}

/// A render sink that only counts what it is asked to draw
#[derive(Debug, Default)]
pub struct CountingSink {
    stats: DrawStats,
    blend: Option<BlendMode>,
}

impl CountingSink {
    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    fn count_draw(&mut self) {
        if self.blend == Some(BlendMode::Additive) {
            self.stats.additive_draws += 1;
        }
    }
}

impl RenderSink for CountingSink {
    fn set_blend_mode(&mut self, mode: BlendMode) {
        if self.blend != Some(mode) {
            self.stats.blend_switches += 1;
            self.blend = Some(mode);
        }
    }

    fn draw_sprite(
        &mut self,
        sprite: Option<&Sprite>,
        _x: f32,
        _y: f32,
        _width: f32,
        _height: f32,
        _color: Color,
        _rotation: f32,
    ) {
        if sprite.is_some() {
            self.stats.sprites += 1;
        } else {
            self.stats.untextured_quads += 1;
        }
        self.count_draw();
    }

    fn draw_point(&mut self, _x: f32, _y: f32, _size: f32, _color: Color) {
        self.stats.points += 1;
        self.count_draw();
    }
}

/// Resolves image names relative to a directory, reading only the image
/// dimensions
#[derive(Debug)]
pub struct DirectoryImageLoader {
    root: PathBuf,
    cache: HashMap<String, SpriteRef>,
}

impl DirectoryImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }
}

impl ImageLoader for DirectoryImageLoader {
    fn load(&mut self, name: &str) -> slick_particles::Result<SpriteRef> {
        if let Some(sprite) = self.cache.get(name) {
            return Ok(Arc::clone(sprite));
        }

        let path = self.root.join(name);
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| ParticleError::ImageLoad {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        log::info!("Loaded sprite {} ({}x{})", path.display(), width, height);

        let sprite = Arc::new(Sprite::new(name, width, height));
        self.cache.insert(name.to_string(), Arc::clone(&sprite));
        Ok(sprite)
    }
}
