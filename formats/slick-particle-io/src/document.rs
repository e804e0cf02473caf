//! Serialisable mirror of particle systems and emitters
//!
//! A [`SystemDocument`] holds the system-wide flags and one
//! [`EmitterDocument`] per [`ConfigurableEmitter`]. Field names follow the
//! camelCase element names of the classic particle editor format, so
//! existing effect descriptions translate one to one.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use slick_particles::{
    BlendMode, Color, ColorStop, ConfigurableEmitter, Curve, ParticleSystem, Range, RenderMode,
    SystemConfig, Value,
};

use crate::error::Result;
use crate::format::Format;

/// One step of an emitter's colour ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStep {
    pub offset: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl From<&ColorStop> for ColorStep {
    fn from(stop: &ColorStop) -> Self {
        Self {
            offset: stop.position,
            r: stop.color.r,
            g: stop.color.g,
            b: stop.color.b,
        }
    }
}

impl ColorStep {
    pub fn color(&self) -> Color {
        Color::rgb(self.r, self.g, self.b)
    }
}

/// Every configurable parameter of one emitter
///
/// Missing fields take the stock emitter defaults when deserialising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmitterDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    pub render_type: RenderMode,
    pub use_oriented: bool,
    pub use_additive: bool,

    pub spawn_interval: Range,
    pub spawn_count: Range,
    pub initial_life: Range,
    pub initial_size: Range,
    pub x_offset: Range,
    pub y_offset: Range,
    pub initial_distance: Range,
    pub speed: Range,
    pub length: Range,
    pub emit_count: Range,

    pub spread: Value,
    pub angular_offset: Value,
    pub growth_factor: Value,
    pub gravity_factor: Value,
    pub wind_factor: Value,
    pub start_alpha: Value,
    pub end_alpha: Value,

    pub alpha: Curve,
    pub size: Curve,
    pub velocity: Curve,
    pub scale_y: Curve,

    pub color: Vec<ColorStep>,
}

impl Default for EmitterDocument {
    fn default() -> Self {
        Self::from_emitter(&ConfigurableEmitter::with_seed("emitter", 0))
    }
}

impl EmitterDocument {
    /// Capture an emitter's configuration
    pub fn from_emitter(emitter: &ConfigurableEmitter) -> Self {
        use slick_particles::ParticleEmitter;

        Self {
            name: emitter.name().to_string(),
            image_name: emitter.image_name().map(str::to_string),
            render_type: emitter.render_mode,
            use_oriented: emitter.use_oriented,
            use_additive: emitter.use_additive,
            spawn_interval: emitter.spawn_interval,
            spawn_count: emitter.spawn_count,
            initial_life: emitter.initial_life,
            initial_size: emitter.initial_size,
            x_offset: emitter.x_offset,
            y_offset: emitter.y_offset,
            initial_distance: emitter.initial_distance,
            speed: emitter.speed,
            length: emitter.length,
            emit_count: emitter.emit_count,
            spread: emitter.spread,
            angular_offset: emitter.angular_offset,
            growth_factor: emitter.growth_factor,
            gravity_factor: emitter.gravity_factor,
            wind_factor: emitter.wind_factor,
            start_alpha: emitter.start_alpha,
            end_alpha: emitter.end_alpha,
            alpha: emitter.alpha.clone(),
            size: emitter.size.clone(),
            velocity: emitter.velocity.clone(),
            scale_y: emitter.scale_y.clone(),
            color: emitter
                .color_ramp()
                .stops()
                .iter()
                .map(ColorStep::from)
                .collect(),
        }
    }

    /// Build a fresh emitter from this configuration
    pub fn to_emitter(&self) -> ConfigurableEmitter {
        let mut emitter = ConfigurableEmitter::new(self.name.clone());
        self.apply(&mut emitter);
        emitter
    }

    /// Build an emitter with a deterministic random sequence
    pub fn to_emitter_seeded(&self, seed: u64) -> ConfigurableEmitter {
        let mut emitter = ConfigurableEmitter::with_seed(self.name.clone(), seed);
        self.apply(&mut emitter);
        emitter
    }

    fn apply(&self, emitter: &mut ConfigurableEmitter) {
        use slick_particles::ParticleEmitter;

        emitter.set_image_name(self.image_name.clone());
        emitter.render_mode = self.render_type;
        emitter.use_oriented = self.use_oriented;
        emitter.use_additive = self.use_additive;
        emitter.spawn_interval = self.spawn_interval;
        emitter.spawn_count = self.spawn_count;
        emitter.initial_life = self.initial_life;
        emitter.initial_size = self.initial_size;
        emitter.x_offset = self.x_offset;
        emitter.y_offset = self.y_offset;
        emitter.initial_distance = self.initial_distance;
        emitter.speed = self.speed;
        emitter.length = self.length;
        emitter.emit_count = self.emit_count;
        emitter.spread = self.spread;
        emitter.angular_offset = self.angular_offset;
        emitter.growth_factor = self.growth_factor;
        emitter.gravity_factor = self.gravity_factor;
        emitter.wind_factor = self.wind_factor;
        emitter.start_alpha = self.start_alpha;
        emitter.end_alpha = self.end_alpha;
        emitter.alpha = self.alpha.clone();
        emitter.size = self.size.clone();
        emitter.velocity = self.velocity.clone();
        emitter.scale_y = self.scale_y.clone();

        let ramp = emitter.color_ramp_mut();
        ramp.clear();
        for step in &self.color {
            ramp.add_point(step.offset, step.color());
        }

        // Countdowns depend on the loaded length and emit count.
        emitter.replay();
    }

    pub fn read<R: Read>(reader: R, format: Format) -> Result<Self> {
        format.read(reader)
    }

    pub fn write<W: Write>(&self, writer: W, format: Format) -> Result<()> {
        format.write(self, writer)
    }
}

/// A whole particle system
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDocument {
    /// Render with additive blending
    #[serde(default)]
    pub additive: bool,
    /// Render particles as points
    #[serde(default)]
    pub points: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
    #[serde(default, rename = "emitter")]
    pub emitters: Vec<EmitterDocument>,
}

impl SystemDocument {
    /// Capture every configurable emitter of `system`
    ///
    /// Emitters of other types have no document form and are skipped.
    pub fn from_system(system: &ParticleSystem) -> Self {
        let mut emitters = Vec::with_capacity(system.emitter_count());
        for id in system.emitter_ids() {
            match system.emitter_as::<ConfigurableEmitter>(id) {
                Some(emitter) => emitters.push(EmitterDocument::from_emitter(emitter)),
                None => {
                    let name = system.emitter(id).map_or("?", |e| e.name());
                    log::warn!("Skipping emitter {} '{}': not configurable", id, name);
                }
            }
        }

        Self {
            additive: system.blending() == BlendMode::Additive,
            points: system.uses_points(),
            default_image: system.config().default_image_name.clone(),
            emitters,
        }
    }

    /// Build a system; the document's flags override `config`
    pub fn to_system(&self, config: SystemConfig) -> ParticleSystem {
        let mut system = ParticleSystem::new(self.system_config(config));
        for emitter in &self.emitters {
            system.add_emitter(Box::new(emitter.to_emitter()));
        }
        system
    }

    /// Build a system whose emitters are seeded from `seed` onwards
    pub fn to_system_seeded(&self, config: SystemConfig, seed: u64) -> ParticleSystem {
        let mut system = ParticleSystem::new(self.system_config(config));
        for (offset, emitter) in (0u64..).zip(&self.emitters) {
            system.add_emitter(Box::new(emitter.to_emitter_seeded(seed.wrapping_add(offset))));
        }
        system
    }

    fn system_config(&self, config: SystemConfig) -> SystemConfig {
        SystemConfig {
            blending: if self.additive {
                BlendMode::Additive
            } else {
                BlendMode::Combine
            },
            use_points: self.points,
            default_image_name: self.default_image.clone().or(config.default_image_name),
            ..config
        }
    }

    pub fn read<R: Read>(reader: R, format: Format) -> Result<Self> {
        format.read(reader)
    }

    pub fn write<W: Write>(&self, writer: W, format: Format) -> Result<()> {
        format.write(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slick_particles::ParticleEmitter;

    #[test]
    fn test_emitter_document_captures_parameters() {
        let mut emitter = ConfigurableEmitter::with_seed("smoke", 1);
        emitter.set_image_name(Some("smoke.png".to_string()));
        emitter.gravity_factor = Value::new(-4.0);
        emitter.emit_count = Range::fixed(30.0);
        emitter.render_mode = RenderMode::Quads;
        emitter.add_color_point(0.5, Color::BLACK);

        let doc = EmitterDocument::from_emitter(&emitter);
        assert_eq!(doc.name, "smoke");
        assert_eq!(doc.image_name.as_deref(), Some("smoke.png"));
        assert_eq!(doc.gravity_factor.get(), -4.0);
        assert!(doc.emit_count.enabled);
        assert_eq!(doc.render_type, RenderMode::Quads);
        assert_eq!(
            doc.color.iter().map(|s| s.offset).collect::<Vec<_>>(),
            vec![0.0, 0.5, 1.0]
        );
    }

    #[test]
    fn test_to_emitter_replays_countdowns() {
        let mut doc = EmitterDocument::default();
        doc.name = "burst".to_string();
        doc.emit_count = Range::fixed(12.0);
        doc.length = Range::disabled(250.0, 250.0);

        let emitter = doc.to_emitter_seeded(3);
        assert_eq!(emitter.name(), "burst");
        assert_eq!(emitter.left_to_emit(), 12);
        assert_eq!(emitter.timeout(), 250.0);
        assert_eq!(EmitterDocument::from_emitter(&emitter), doc);
    }

    #[test]
    fn test_system_flags() {
        let doc = SystemDocument {
            additive: true,
            points: true,
            default_image: Some("particle.png".to_string()),
            emitters: vec![EmitterDocument::default(), EmitterDocument::default()],
        };

        let system = doc.to_system(SystemConfig {
            max_particles_per_emitter: 20,
            ..SystemConfig::default()
        });
        assert_eq!(system.blending(), BlendMode::Additive);
        assert!(system.uses_points());
        assert_eq!(system.emitter_count(), 2);
        assert_eq!(system.config().max_particles_per_emitter, 20);

        assert_eq!(SystemDocument::from_system(&system), doc);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let doc: EmitterDocument =
            serde_json::from_str(r#"{"name": "tiny", "speed": {"min": 1, "max": 2}}"#).unwrap();
        assert_eq!(doc.name, "tiny");
        assert_eq!(doc.speed, Range::new(1.0, 2.0));
        assert_eq!(doc.spawn_count, Range::new(5.0, 5.0));
        assert_eq!(doc.color.len(), 2);
    }
}
