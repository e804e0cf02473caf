//! Configurable emitter parameters
//!
//! - [`Range`]: uniform random sample between two bounds
//! - [`Value`]: fixed scalar, or a linear counter wrapping at the scalar
//! - [`Curve`]: optional piecewise-linear override over a particle's life

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `[min, max]` interval sampled uniformly at random
///
/// The `enabled` flag is only meaningful to callers that treat the range as
/// optional (emitter duration and emit count); sampling ignores it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Range {
    pub min: f32,
    pub max: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
fn default_enabled() -> bool {
    true
}

impl Range {
    /// An enabled range
    pub const fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            enabled: true,
        }
    }

    /// A disabled range
    pub const fn disabled(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            enabled: false,
        }
    }

    /// A degenerate, enabled range always producing `value`
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Sample `min + u * (max - min)` with `u` in `[0, 1)`
    ///
    /// `min > max` is not rejected; the sample then lies in `(max, min]`.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min)
    }

    pub fn set(&mut self, min: f32, max: f32) {
        self.min = min;
        self.max = max;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// A configurable scalar
///
/// When `linear` is set, [`Value::next`] yields a counter that increments by
/// one on every call and wraps back to zero at `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Value {
    pub value: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub linear: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    counter: f32,
}

impl Value {
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            linear: false,
            counter: 0.0,
        }
    }

    pub const fn linear(value: f32) -> Self {
        Self {
            value,
            linear: true,
            counter: 0.0,
        }
    }

    /// The configured scalar
    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.counter = 0.0;
    }

    /// The scalar, or the next counter step when linear
    pub fn next(&mut self) -> f32 {
        if !self.linear {
            return self.value;
        }

        let current = self.counter;
        self.counter += 1.0;
        if self.counter >= self.value {
            self.counter = 0.0;
        }
        current
    }

    /// Uniform sample in `[0, value)`; a linear value steps instead
    pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        if self.linear {
            self.next()
        } else {
            rng.random::<f32>() * self.value
        }
    }

    /// Restart the linear counter
    pub fn reset(&mut self) {
        self.counter = 0.0;
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Piecewise-linear curve over a particle's normalised age
///
/// `min`/`max` are the bounds an editor should offer for the y axis; they do
/// not clamp evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Curve {
    pub points: Vec<(f32, f32)>,
    pub min: f32,
    pub max: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub active: bool,
}

impl Curve {
    /// Inactive straight line from `(0, start)` to `(1, end)`
    pub fn line(start: f32, end: f32, min: f32, max: f32) -> Self {
        Self {
            points: vec![(0.0, start), (1.0, end)],
            min,
            max,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Replace the control points, sorting them by x
    pub fn set_points(&mut self, points: Vec<(f32, f32)>) {
        self.points = points;
        self.points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    /// Evaluate at `t`, holding the end values outside the covered span
    pub fn value(&self, t: f32) -> f32 {
        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return 0.0;
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in self.points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            if t >= x0 && t <= x1 {
                let span = x1 - x0;
                if span <= 0.0 {
                    return y1;
                }
                return y0 + (t - x0) / span * (y1 - y0);
            }
        }

        last.1
    }
}
