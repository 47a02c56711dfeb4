//! Auto-Extra-Field Discoverer.
//!
//! Поля, объявленные в `schema_keys`, но не показанные ни карточками, ни
//! панелью фактов, добавляются в конец панели с подписью из имени поля.

use std::collections::HashSet;

use super::facts::FactRow;
use crate::domain::a001_business::BusinessRecord;
use crate::shared::text::derive_label;

/// Служебные поля и поля, уже отрисованные отдельными карточками
const EXCLUDED_FIELDS: &[&str] = &[
    // идентификация
    "id",
    "slug",
    "name",
    "categories",
    "category",
    "tags",
    "schema_keys",
    "sponsored",
    "is_sponsored",
    // тексты и карточки
    "tagline",
    "description",
    "about",
    "about_short",
    "about_long",
    "amenities",
    "cuisines",
    "meals",
    "hours",
    "hours_raw",
    // изображения
    "images",
    "logo_url",
    "hero_url",
    // адрес и карта
    "location",
    "address",
    "lat",
    "lng",
    "maps_url",
    "neighborhood",
    "city",
    "country",
    // источники и отзывы
    "sources",
    "place_id",
    "osm_type",
    "osm_id",
    "wikidata_id",
    "public_sentiment",
    "last_updated",
    // цена, рейтинг, контакты
    "price_range",
    "pricing",
    "rating",
    "rating_overall",
    "subscores",
    "scores",
    "actions",
    "website",
    "phone",
    "url",
];

const EXCLUDED_PREFIXES: &[&str] = &[
    "sub_",
    "review_",
    "image_",
    "actions.",
    "location.",
    "images.",
    "sources.",
];

pub fn discover_extra_fields(record: &BusinessRecord, emitted: &[FactRow]) -> Vec<FactRow> {
    let mut seen: HashSet<String> = emitted.iter().map(|row| row.label.to_lowercase()).collect();
    let mut extras = Vec::new();

    for key in record.schema_keys() {
        let key = key.trim();
        if key.is_empty() || is_excluded(key) {
            continue;
        }
        let Some(value) = record.text(key) else {
            continue;
        };
        let label = derive_label(key);
        if label.is_empty() || !seen.insert(label.to_lowercase()) {
            continue;
        }
        extras.push(FactRow::new(label, value));
    }

    extras
}

fn is_excluded(key: &str) -> bool {
    EXCLUDED_FIELDS.contains(&key) || EXCLUDED_PREFIXES.iter().any(|p| key.starts_with(p))
}
