//! Lints for particle documents
//!
//! The particle core accepts any configuration and lets the sampling
//! formulas decide what happens. These checks flag the configurations that
//! are almost certainly mistakes before they reach a running system.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use slick_particles::Range;

use crate::document::{EmitterDocument, SystemDocument};
use crate::error::{ParticleIoError, Result};

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Works, but probably not as intended
    Warning,
    /// Produces degenerate or undefined emission
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single finding about one emitter field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub emitter: String,
    pub field: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}.{}: {}",
            self.severity, self.emitter, self.field, self.message
        )
    }
}

struct Collector<'a> {
    emitter: &'a str,
    issues: Vec<ValidationIssue>,
}

impl Collector<'_> {
    fn push(&mut self, field: &str, severity: Severity, message: impl Into<String>) {
        let issue = ValidationIssue {
            emitter: self.emitter.to_string(),
            field: field.to_string(),
            severity,
            message: message.into(),
        };
        log::debug!("{}", issue);
        self.issues.push(issue);
    }

    fn ordered(&mut self, field: &str, range: &Range) {
        if range.min > range.max {
            self.push(
                field,
                Severity::Error,
                format!("min {} is greater than max {}", range.min, range.max),
            );
        }
    }

    fn non_negative(&mut self, field: &str, range: &Range) {
        if range.min < 0.0 {
            self.push(
                field,
                Severity::Error,
                format!("min {} is negative", range.min),
            );
        }
    }
}

/// Check one emitter
pub fn validate_emitter(doc: &EmitterDocument) -> Vec<ValidationIssue> {
    let mut c = Collector {
        emitter: &doc.name,
        issues: Vec::new(),
    };

    let ranges = [
        ("spawnInterval", &doc.spawn_interval),
        ("spawnCount", &doc.spawn_count),
        ("initialLife", &doc.initial_life),
        ("initialSize", &doc.initial_size),
        ("xOffset", &doc.x_offset),
        ("yOffset", &doc.y_offset),
        ("initialDistance", &doc.initial_distance),
        ("speed", &doc.speed),
        ("length", &doc.length),
        ("emitCount", &doc.emit_count),
    ];
    for (field, range) in ranges {
        c.ordered(field, range);
    }

    if doc.spawn_interval.min <= 0.0 {
        c.push(
            "spawnInterval",
            Severity::Error,
            "interval must be positive, otherwise a batch spawns every tick",
        );
    }
    c.non_negative("spawnCount", &doc.spawn_count);
    c.non_negative("initialLife", &doc.initial_life);
    c.non_negative("initialSize", &doc.initial_size);

    for (field, value) in [
        ("startAlpha", doc.start_alpha.get()),
        ("endAlpha", doc.end_alpha.get()),
    ] {
        if !(0.0..=255.0).contains(&value) {
            c.push(
                field,
                Severity::Warning,
                format!("alpha {value} is outside 0..=255"),
            );
        }
    }

    if doc.color.len() < 2 {
        c.push(
            "color",
            Severity::Warning,
            "fewer than two steps, particle colour never changes",
        );
    }
    if doc.color.iter().any(|s| !(0.0..=1.0).contains(&s.offset)) {
        c.push("color", Severity::Error, "step offsets must lie in 0..=1");
    }
    if doc.color.windows(2).any(|w| w[0].offset > w[1].offset) {
        c.push(
            "color",
            Severity::Warning,
            "steps are not sorted by offset and will be reordered",
        );
    }

    match (doc.length.enabled, doc.emit_count.enabled) {
        (false, false) => c.push(
            "length",
            Severity::Warning,
            "neither length nor emitCount is enabled, the emitter never completes",
        ),
        (true, true) => c.push(
            "emitCount",
            Severity::Warning,
            "both length and emitCount are enabled, whichever runs out first stops emission",
        ),
        _ => {}
    }

    c.issues
}

/// Check every emitter of a system plus system-wide consistency
pub fn validate_system(doc: &SystemDocument) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if doc.emitters.is_empty() {
        let mut c = Collector {
            emitter: "<system>",
            issues: Vec::new(),
        };
        c.push("emitter", Severity::Warning, "system has no emitters");
        issues.append(&mut c.issues);
    }

    let mut seen = HashSet::new();
    for emitter in &doc.emitters {
        if !seen.insert(emitter.name.as_str()) {
            let mut c = Collector {
                emitter: &emitter.name,
                issues: Vec::new(),
            };
            c.push("name", Severity::Warning, "duplicate emitter name");
            issues.append(&mut c.issues);
        }
        issues.extend(validate_emitter(emitter));
    }

    issues
}

/// Fail on error-level issues, returning the remaining warnings
pub fn check_system(doc: &SystemDocument) -> Result<Vec<ValidationIssue>> {
    let (errors, warnings): (Vec<_>, Vec<_>) = validate_system(doc)
        .into_iter()
        .partition(|issue| issue.severity == Severity::Error);

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ParticleIoError::Validation(errors))
    }
}
