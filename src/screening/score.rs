//! Raw provider scores onto the canonical 0-100 scale.
//!
//! Providers report scores as fractions (`0.95`), percentages (`95`) or
//! per-mille values (`950`). The scale is inferred from the magnitude.
//! Normalization never fails: anything unusable becomes 0.

use serde_json::Value;

/// Normalize a raw JSON score. Numbers and numeric strings are accepted;
/// every other shape yields 0.
pub fn normalize_score(raw: &Value) -> u8 {
    match raw {
        Value::Number(n) => n.as_f64().map(normalize_numeric).unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(normalize_numeric).unwrap_or(0),
        _ => 0,
    }
}

/// Normalize a numeric score.
///
/// Checked in order, first match wins: `0..=1` is a fraction, `> 100` is a
/// 0-1000 scale, anything else is already a percentage. An exact `1` is
/// therefore read as a fraction and maps to 100.
pub fn normalize_numeric(value: f64) -> u8 {
    if !value.is_finite() || value < 0.0 {
        return 0;
    }

    let scaled = if value <= 1.0 {
        value * 100.0
    } else if value > 100.0 {
        value / 10.0
    } else {
        value
    };

    // f64::round is half-away-from-zero
    scaled.round().clamp(0.0, 100.0) as u8
}
