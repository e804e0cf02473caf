//! Formatting utilities

use humansize::{DECIMAL, format_size};
use slick_particle_io::EmitterDocument;
use slick_particles::{Curve, Range, Value};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a range as `min..max`, or a single number when degenerate
pub fn format_range(range: &Range) -> String {
    let text = if range.min == range.max {
        format!("{}", range.min)
    } else {
        format!("{}..{}", range.min, range.max)
    };
    if range.enabled {
        text
    } else {
        format!("{text} (off)")
    }
}

pub fn format_value(value: &Value) -> String {
    if value.linear {
        format!("{} (linear)", value.value)
    } else {
        format!("{}", value.value)
    }
}

pub fn format_curve(curve: &Curve) -> String {
    if !curve.active {
        return "-".to_string();
    }
    curve
        .points
        .iter()
        .map(|(x, y)| format!("{x}:{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which completion policy governs the emitter
pub fn completion_mode(doc: &EmitterDocument) -> String {
    match (doc.length.enabled, doc.emit_count.enabled) {
        (true, false) => format!("duration {}ms", format_range(&doc.length)),
        (false, true) => format!("count {}", format_range(&doc.emit_count)),
        (true, true) => "duration + count".to_string(),
        (false, false) => "endless".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1024), "1.02 kB");
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(&Range::new(100.0, 250.5)), "100..250.5");
        assert_eq!(format_range(&Range::fixed(5.0)), "5");
        assert_eq!(format_range(&Range::disabled(1000.0, 1000.0)), "1000 (off)");
    }

    #[test]
    fn test_format_value_and_curve() {
        assert_eq!(format_value(&Value::new(360.0)), "360");
        assert_eq!(format_value(&Value::linear(12.0)), "12 (linear)");

        let mut curve = Curve::line(255.0, 0.0, 0.0, 255.0);
        assert_eq!(format_curve(&curve), "-");
        curve.set_active(true);
        assert_eq!(format_curve(&curve), "0:255 1:0");
    }

    #[test]
    fn test_completion_mode() {
        let mut doc = EmitterDocument::default();
        assert_eq!(completion_mode(&doc), "endless");
        doc.emit_count = Range::fixed(40.0);
        assert_eq!(completion_mode(&doc), "count 40");
        doc.emit_count.enabled = false;
        doc.length = Range::new(500.0, 800.0);
        assert_eq!(completion_mode(&doc), "duration 500..800ms");
    }
}
