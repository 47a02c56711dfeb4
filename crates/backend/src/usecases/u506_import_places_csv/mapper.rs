use std::collections::HashMap;
use std::path::Path;

use contracts::domain::a001_business::hours::DEFAULT_TZ;
use contracts::domain::a001_business::WeeklyHours;
use contracts::shared::slug::slugify;
use serde_json::{json, Map, Value};

/// Поля записи, которые импорт перезаписывает; остальное (about, рейтинги,
/// ручные правки) сохраняется из существующей записи
const IMPORTED_KEYS: &[&str] = &[
    "id",
    "slug",
    "name",
    "tagline",
    "categories",
    "tags",
    "actions",
    "location",
    "hours",
    "images",
    "sources",
    "url",
];

/// Вложенные объекты сливаются по ключам, а не заменяются целиком
const MERGED_OBJECTS: &[&str] = &["actions", "location", "images", "sources"];

/// Строка `places.csv` как `колонка -> значение`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceRow(HashMap<String, String>);

impl PlaceRow {
    /// Значение колонки без пробелов по краям; пустая строка, если колонки нет
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(|v| v.trim()).unwrap_or("")
    }

    /// Slug строки, при пустой колонке производится из имени
    pub fn slug(&self) -> String {
        match self.get("slug") {
            "" => slugify(self.get("name")),
            slug => slug.to_string(),
        }
    }

    fn optional(&self, column: &str) -> Value {
        match self.get(column) {
            "" => Value::Null,
            v => Value::String(v.to_string()),
        }
    }

    fn number(&self, column: &str) -> Value {
        self.get(column)
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl FromIterator<(String, String)> for PlaceRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Строка выгрузки -> запись набора данных.
///
/// `images.logo`/`images.hero` заполняются, только если файлы уже лежат в
/// `assets/images/<slug>/` под корнем сайта.
pub fn map_row(row: &PlaceRow, site_root: &Path) -> Value {
    let slug = row.slug();

    let categories: Vec<&str> = Some(row.get("category")).filter(|c| !c.is_empty()).into_iter().collect();
    let tags: Vec<&str> = row
        .get("tags")
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    json!({
        "id": row.get("id"),
        "slug": slug,
        "name": row.get("name"),
        "tagline": row.get("tagline"),
        "categories": categories,
        "tags": tags,
        "actions": {
            "website": row.optional("website"),
            "phone": row.optional("phone"),
            "maps_url": row.optional("maps_url"),
        },
        "location": {
            "neighborhood": row.optional("neighborhood"),
            "address": row.optional("address"),
            "city": row.optional("city"),
            "country": row.optional("country"),
            "lat": row.number("lat"),
            "lng": row.number("lng"),
        },
        "hours": hours_value(&slug, row.get("hours_raw")),
        "images": {
            "logo": existing_image(site_root, &slug, "logo.webp"),
            "hero": existing_image(site_root, &slug, "hero.webp"),
            "credit": row.optional("image_credit"),
            "source_url": row.optional("image_source_url"),
        },
        "sources": {
            "place_id": row.optional("place_id"),
            "osm": {"type": row.optional("osm_type"), "id": row.optional("osm_id")},
            "wikidata_id": row.optional("wikidata_id"),
        },
        "url": row.optional("url"),
    })
}

fn hours_value(slug: &str, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    match WeeklyHours::parse_compact(raw, DEFAULT_TZ) {
        Ok(hours) if hours.has_intervals() => hours.to_value(),
        Ok(_) => Value::Null,
        Err(e) => {
            tracing::warn!("{}: cannot parse hours_raw '{}': {}", slug, raw, e);
            Value::Null
        }
    }
}

fn existing_image(site_root: &Path, slug: &str, file: &str) -> Value {
    let relative = format!("assets/images/{slug}/{file}");
    if site_root.join(&relative).exists() {
        Value::String(relative)
    } else {
        Value::Null
    }
}

/// Слияние новой записи с существующей: импортируемые поля заменяются,
/// вложенные объекты дополняются ключами новой записи
pub fn merge(existing: &Value, new: &Value) -> Value {
    let mut merged = existing.as_object().cloned().unwrap_or_default();
    let Some(new) = new.as_object() else {
        return Value::Object(merged);
    };

    for key in IMPORTED_KEYS {
        if let Some(value) = new.get(*key) {
            merged.insert((*key).to_string(), value.clone());
        }
    }

    for key in MERGED_OBJECTS {
        let mut object: Map<String, Value> = existing
            .get(*key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        if let Some(Value::Object(incoming)) = new.get(*key) {
            object.extend(incoming.clone());
        }
        merged.insert((*key).to_string(), Value::Object(object));
    }

    Value::Object(merged)
}
