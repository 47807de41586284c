//! Best-effort numeric coercion for free-text tokens.
//!
//! Statistics values coerce int-first, then float; failure surfaces as a
//! null in the output document rather than an error. Series values carry
//! their own conventions (`%`, comma grouping, `ops/s`, unit letters) and a
//! failed coercion drops the point at the call site.

use serde::{Deserialize, Serialize};

/// A coerced numeric value, serialized as a bare JSON number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Coerce a token to a signed integer if it parses cleanly as one, else a
/// float, else `None`
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Some(Number::Int(value));
    }
    text.parse::<f64>().ok().map(Number::Float)
}

/// Coerce a metric series value.
///
/// Handles, in order: a trailing `%` (returns the bare percentage number),
/// comma grouping, a literal `ops/s` suffix, and a trailing `K`/`M`/`G`
/// unit letter scaling by 1e3/1e6/1e9. Any failure yields `None`.
pub fn parse_series_value(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(stripped) = text.strip_suffix('%') {
        return stripped.trim().parse::<f64>().ok();
    }
    let text = text.replace(',', "").replace("ops/s", "");
    let mut text = text.trim();
    let mut multiplier = 1.0;
    if let Some(suffix) = text.chars().last() {
        let scale = match suffix {
            'K' => 1e3,
            'M' => 1e6,
            'G' => 1e9,
            _ => 1.0,
        };
        if scale != 1.0 {
            multiplier = scale;
            text = &text[..text.len() - 1];
        }
    }
    text.trim().parse::<f64>().ok().map(|value| value * multiplier)
}
