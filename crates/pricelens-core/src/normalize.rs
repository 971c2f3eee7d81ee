//! Total field normalizers shared by every adapter.
//!
//! Each helper takes an optional raw JSON field and always produces a value:
//! anything missing, `null`, or unparsable collapses to the documented
//! default (`0`, empty string, or `"Unknown"`).

use serde_json::Value;

/// Parse a price. Textual prices keep only ASCII digits and `.` before
/// parsing, so `"₹1,299.00"` becomes `1299.0`.
pub fn price(raw: Option<&Value>) -> f64 {
    match raw {
        Some(Value::Number(n)) => finite_or_zero(n.as_f64()),
        Some(Value::String(s)) => {
            let kept: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            leading_decimal(&kept)
        }
        _ => 0.0,
    }
}

/// Parse a rating as a decimal in the source's own scale.
pub fn rating(raw: Option<&Value>) -> f64 {
    match raw {
        Some(Value::Number(n)) => finite_or_zero(n.as_f64()),
        Some(Value::String(s)) => leading_decimal(s.trim()),
        _ => 0.0,
    }
}

/// Parse a review count. Textual counts keep only digits, so
/// `"12,408 ratings"` becomes `12408`.
pub fn review_count(raw: Option<&Value>) -> u64 {
    match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Read a text field; empty or missing values fall back to `default`.
pub fn text(raw: Option<&Value>, default: &str) -> String {
    match raw {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Parse the longest `digits[.digits]` prefix of `s`; `0` if there is none.
///
/// `"1.299.00"` yields `1.299`, `"4.5 out of 5"` yields `4.5`.
fn leading_decimal(s: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (idx, c) in s.char_indices() {
        if c.is_ascii_digit() {
            seen_digit = true;
            end = idx + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = idx + 1;
        } else {
            break;
        }
    }
    if !seen_digit {
        return 0.0;
    }
    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .map(|f| if f.is_finite() { f } else { 0.0 })
        .unwrap_or(0.0)
}
