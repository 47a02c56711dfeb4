//! Record Normalizer: raw loosely typed JSON -> canonical [`BusinessRecord`].
//!
//! Never fails. Missing fields get safe empty defaults, numeric-looking fields
//! are coerced to numbers (unparseable ones become `null`), and the legacy
//! shapes of `about` and `hours` are brought to their structured forms.

use serde_json::{Map, Value};

use super::aggregate::BusinessRecord;
use super::hours::WeeklyHours;
use crate::shared::slug::slugify;
use crate::shared::text::{coerce_number, derive_label, display_text};

const TEXT_FIELDS: &[&str] = &[
    "name",
    "slug",
    "tagline",
    "description",
    "about_short",
    "about_long",
    "price_range",
    "url",
    "hours_raw",
];

const LIST_FIELDS: &[&str] = &[
    "categories",
    "tags",
    "amenities",
    "cuisines",
    "meals",
    "schema_keys",
];

const NUMERIC_FIELDS: &[&str] = &["rating_overall", "rating", "lat", "lng"];

const NESTED_NUMERIC_FIELDS: &[(&str, &str)] = &[("location", "lat"), ("location", "lng")];

const SCORE_FIELDS: &[&str] = &["subscores", "scores"];

/// Plain CSV exports carry subscores as flat `sub_<name>` columns
const SUBSCORE_PREFIX: &str = "sub_";

pub fn normalize(raw: &Value) -> BusinessRecord {
    let mut fields = match raw {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for key in TEXT_FIELDS {
        let text = fields.get(*key).and_then(scalar_text).unwrap_or_default();
        fields.insert((*key).to_string(), Value::String(text));
    }

    for key in LIST_FIELDS {
        let items = fields.get(*key).map(string_list).unwrap_or_default();
        fields.insert((*key).to_string(), Value::from(items));
    }

    for key in NUMERIC_FIELDS {
        let number = fields.get(*key).and_then(coerce_number);
        fields.insert((*key).to_string(), number_value(number));
    }

    for key in ["location", "actions"] {
        if !fields.get(key).map_or(false, Value::is_object) {
            fields.insert(key.to_string(), Value::Object(Map::new()));
        }
    }
    for (parent, key) in NESTED_NUMERIC_FIELDS {
        if let Some(Value::Object(nested)) = fields.get_mut(*parent) {
            if let Some(v) = nested.get(*key) {
                let number = coerce_number(v);
                nested.insert((*key).to_string(), number_value(number));
            }
        }
    }

    let about = normalize_about(fields.get("about"));
    fields.insert("about".to_string(), about);

    for key in SCORE_FIELDS {
        if let Some(Value::Object(scores)) = fields.get(*key) {
            let coerced: Map<String, Value> = scores
                .iter()
                .filter_map(|(label, v)| Some((label.clone(), number_value(Some(coerce_number(v)?)))))
                .collect();
            fields.insert((*key).to_string(), Value::Object(coerced));
        }
    }
    if !fields.get("subscores").map_or(false, Value::is_object) {
        fields.insert("subscores".to_string(), Value::Object(flat_subscores(&fields)));
    }

    let hours = fields
        .get("hours")
        .and_then(WeeklyHours::from_value)
        .filter(WeeklyHours::has_intervals)
        .map(|h| h.to_value())
        .unwrap_or(Value::Null);
    fields.insert("hours".to_string(), hours);

    let slug_missing = fields
        .get("slug")
        .and_then(Value::as_str)
        .map_or(true, |s| s.trim().is_empty());
    if slug_missing {
        let name = fields.get("name").and_then(Value::as_str).unwrap_or("");
        let slug = slugify(name);
        fields.insert("slug".to_string(), Value::String(slug));
    }

    BusinessRecord::from_fields(fields)
}

/// Legacy `about`: a plain string is the short text, a two-element array is
/// `[short, long]`; a structured object is kept with blank parts cleared.
pub fn normalize_about(value: Option<&Value>) -> Value {
    let (short, long) = match value {
        Some(Value::String(s)) => (Some(s.as_str()), None),
        Some(Value::Array(items)) => (
            items.first().and_then(Value::as_str),
            items.get(1).and_then(Value::as_str),
        ),
        Some(Value::Object(obj)) => (
            obj.get("short").and_then(Value::as_str),
            obj.get("long").and_then(Value::as_str),
        ),
        _ => (None, None),
    };

    let clean = |s: Option<&str>| match s.map(str::trim) {
        Some(t) if !t.is_empty() => Value::String(t.to_string()),
        _ => Value::Null,
    };

    let mut about = Map::new();
    about.insert("short".to_string(), clean(short));
    about.insert("long".to_string(), clean(long));
    Value::Object(about)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(_) => display_text(value),
        _ => None,
    }
}

/// Массив строк; строка делится по `;` или `,`
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(|c| c == ';' || c == ',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn number_value(number: Option<f64>) -> Value {
    number
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn flat_subscores(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(key, v)| {
            let name = key.strip_prefix(SUBSCORE_PREFIX)?;
            let score = coerce_number(v)?;
            Some((derive_label(name), number_value(Some(score))))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_empty_input() {
        let record = normalize(&json!({}));
        let fields = record.fields();
        assert_eq!(fields["name"], json!(""));
        assert_eq!(fields["categories"], json!([]));
        assert_eq!(fields["amenities"], json!([]));
        assert_eq!(fields["about"], json!({"short": null, "long": null}));
        assert_eq!(fields["rating_overall"], Value::Null);
        assert_eq!(fields["hours"], Value::Null);
        assert_eq!(fields["location"], json!({}));
        assert_eq!(fields["actions"], json!({}));
    }

    #[test]
    fn test_non_object_input() {
        let record = normalize(&json!(["not", "a", "record"]));
        assert_eq!(record.name(), "");
        assert!(record.categories().is_empty());
    }

    #[test]
    fn test_numeric_coercion() {
        let record = normalize(&json!({
            "rating_overall": "4.6",
            "rating": "n/a",
            "location": {"lat": "23.61", "lng": 58.54}
        }));
        assert_eq!(record.fields()["rating_overall"], json!(4.6));
        assert_eq!(record.fields()["rating"], Value::Null);
        assert_eq!(record.fields()["location"]["lat"], json!(23.61));
        assert_eq!(record.coordinates(), Some((23.61, 58.54)));
    }

    #[test]
    fn test_string_lists() {
        let record = normalize(&json!({
            "tags": "family; beach , ,views",
            "amenities": ["Pool", "", 24, null]
        }));
        assert_eq!(record.tags(), vec!["family", "beach", "views"]);
        assert_eq!(record.string_list("amenities"), vec!["Pool", "24"]);
    }

    #[test]
    fn test_about_legacy_shapes() {
        assert_eq!(
            normalize_about(Some(&json!(" Cozy spot "))),
            json!({"short": "Cozy spot", "long": null})
        );
        assert_eq!(
            normalize_about(Some(&json!(["Short", "Long"]))),
            json!({"short": "Short", "long": "Long"})
        );
        assert_eq!(
            normalize_about(Some(&json!({"short": "  ", "long": "Long"}))),
            json!({"short": null, "long": "Long"})
        );
        assert_eq!(normalize_about(Some(&json!(42))), json!({"short": null, "long": null}));
    }

    #[test]
    fn test_hours_normalized() {
        let record = normalize(&json!({"hours": {"Mon": ["09:00", "17:00"]}}));
        assert_eq!(record.fields()["hours"]["weekly"]["mon"][0]["close"], json!("17:00"));

        let unknown = normalize(&json!({"hours": "whenever"}));
        assert_eq!(unknown.fields()["hours"], Value::Null);

        let empty_week = normalize(&json!({"hours": {"tz": "Asia/Muscat", "weekly": {"mon": []}}}));
        assert_eq!(empty_week.fields()["hours"], Value::Null);
    }

    #[test]
    fn test_slug_defaults_to_name() {
        let record = normalize(&json!({"name": "Al Bustan Palace, Muscat"}));
        assert_eq!(record.slug(), "al-bustan-palace-muscat");

        let kept = normalize(&json!({"name": "X", "slug": "custom-slug"}));
        assert_eq!(kept.slug(), "custom-slug");
    }

    #[test]
    fn test_flat_subscores() {
        let record = normalize(&json!({"sub_service": "4.5", "sub_value": "", "sub_ambience": 4}));
        assert_eq!(
            record.subscores(),
            vec![("Service".to_string(), 4.5), ("Ambience".to_string(), 4.0)]
        );
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let record = normalize(&json!({"star_rating": "5", "fact_venue": "Opera House"}));
        assert_eq!(record.text("star_rating").as_deref(), Some("5"));
        assert_eq!(record.text("fact_venue").as_deref(), Some("Opera House"));
    }
}
