//! Colours and colour ramps

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same colour with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// A control point of a [`ColorRamp`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorStop {
    /// Position along the particle's normalised age (0 = spawn, 1 = death)
    pub position: f32,
    /// Colour at this position (alpha is not used)
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Ordered colour stops defining a piecewise-linear gradient over a
/// particle's life
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// Empty ramp; a particle using it never changes colour
    pub fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Build from stops, keeping them ordered by position
    pub fn from_stops(stops: impl IntoIterator<Item = ColorStop>) -> Self {
        let mut ramp = Self::new();
        for stop in stops {
            ramp.add_point(stop.position, stop.color);
        }
        ramp
    }

    /// Insert a stop after every stop at an equal or lower position
    pub fn add_point(&mut self, position: f32, color: Color) {
        let index = self
            .stops
            .iter()
            .position(|stop| stop.position > position)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, ColorStop::new(position, color));
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// First stop's colour, used as a freshly spawned particle's tint
    pub fn first(&self) -> Option<Color> {
        self.stops.first().map(|stop| stop.color)
    }

    /// Interpolated RGB at `inv` (0 = spawn, 1 = death)
    ///
    /// Returns `None` when fewer than two stops exist or `inv` falls outside
    /// every bracket; the caller then leaves the particle colour untouched.
    pub fn sample(&self, inv: f32) -> Option<Color> {
        self.stops.windows(2).find_map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            if inv < start.position || inv > end.position {
                return None;
            }

            let step = end.position - start.position;
            let t = if step > 0.0 {
                (inv - start.position) / step
            } else {
                1.0
            };
            let keep = 1.0 - t;

            Some(Color::rgb(
                start.color.r * keep + end.color.r * t,
                start.color.g * keep + end.color.g * t,
                start.color.b * keep + end.color.b * t,
            ))
        })
    }
}

impl Default for ColorStop {
    fn default() -> Self {
        Self::new(0.0, Color::WHITE)
    }
}
