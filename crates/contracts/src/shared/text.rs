//! Helpers for reading loosely typed JSON values as display text.

use serde_json::Value;

/// Returns the first candidate that is non-empty after trimming.
///
/// Every precedence list in the crate (description sources, website sources,
/// location leaves) goes through this one function.
pub fn first_non_empty<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.as_ref().trim().to_string())
        .find(|s| !s.is_empty())
}

/// Does the value carry anything worth showing?
///
/// Strings must be non-empty after trim, arrays non-empty, objects need at
/// least one filled leaf. Numbers count when finite, booleans always count.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) => true,
        Value::Number(n) => n.as_f64().map_or(false, f64::is_finite),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map.values().any(is_filled),
    }
}

/// Converts a value into a single display string.
///
/// Arrays are joined with `", "` (empty items skipped), objects have no
/// textual form. `None` means "nothing to show".
pub fn display_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Object(_) => return None,
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => format_number(n.as_f64()?),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Форматирует число так, как его показывает браузер: `4` вместо `4.0`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Reads a number from a JSON number or a numeric-looking string.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Human label for a raw field name: `fact_ticket_price` -> `Ticket Price`.
pub fn derive_label(key: &str) -> String {
    let base = key.strip_prefix("fact_").unwrap_or(key);
    base.split(|c| c == '_' || c == '-')
        .filter(|part| !part.trim().is_empty())
        .map(|part| capitalize(part.trim()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
