use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::hours::{WeeklyHours, DEFAULT_TZ};
use crate::shared::slug::slugify;
use crate::shared::text::{coerce_number, display_text, first_non_empty, is_filled};

/// Поля, у которых есть вложенная форма (`location.city` для `city`).
/// Структурированная форма приоритетнее плоской legacy-формы; остальные
/// ключи без точки читаются только с верхнего уровня.
const NESTED_LEAVES: &[(&str, &[&str])] = &[
    (
        "location",
        &["neighborhood", "address", "city", "country", "lat", "lng", "maps_url"],
    ),
    ("actions", &["website", "phone", "maps_url"]),
];

// ─── Списки приоритетов ─────────────────────────────────────────────────────

/// Источники текста описания, в порядке приоритета
pub const DESCRIPTION_SOURCES: &[&str] = &[
    "about.short",
    "about.long",
    "about_short",
    "about_long",
    "description",
    "tagline",
];

pub const WEBSITE_SOURCES: &[&str] = &["actions.website", "website", "url"];
pub const PHONE_SOURCES: &[&str] = &["actions.phone", "phone"];
pub const PRICE_SOURCES: &[&str] = &["price_range", "pricing"];
pub const MAPS_URL_SOURCES: &[&str] = &["actions.maps_url", "location.maps_url", "maps_url"];

// ─── Агрегат ────────────────────────────────────────────────────────────────

/// Нормализованная запись бизнеса.
///
/// Хранит канонический JSON-объект (см. [`super::normalizer::normalize`]) и
/// предоставляет типизированные представления поверх него. Запись только
/// читается: ни один потребитель её не изменяет.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessRecord {
    fields: Map<String, Value>,
}

impl BusinessRecord {
    pub(crate) fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Значение поля по ключу.
    ///
    /// Ключ с точкой (`location.city`) читается по пути. Поле из
    /// [`NESTED_LEAVES`] сначала ищется во вложенном объекте, затем на верхнем
    /// уровне; побеждает первое заполненное значение, иначе первое
    /// присутствующее. Прочие ключи читаются только с верхнего уровня.
    pub fn value(&self, key: &str) -> Option<&Value> {
        if key.contains('.') {
            return self.path(key);
        }

        let nested = NESTED_LEAVES
            .iter()
            .filter(|(_, leaves)| leaves.contains(&key))
            .filter_map(|(parent, _)| self.fields.get(*parent)?.as_object()?.get(key));
        let candidates: Vec<&Value> = nested.chain(self.fields.get(key)).collect();

        if let Some(filled) = candidates.iter().copied().find(|v| is_filled(v)) {
            return Some(filled);
        }
        candidates.into_iter().find(|v| !v.is_null())
    }

    fn path(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Текстовое представление поля (массивы через `", "`)
    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key).and_then(display_text)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(coerce_number)
    }

    /// Первое непустое значение из списка приоритетов
    pub fn first_text(&self, sources: &[&str]) -> Option<String> {
        first_non_empty(sources.iter().map(|key| self.text(key)))
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.value(key) {
            Some(Value::Array(items)) => items.iter().filter_map(display_text).collect(),
            Some(other) => display_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    // ─── Идентификация ──────────────────────────────────────────────────────

    pub fn name(&self) -> String {
        self.text("name").unwrap_or_default()
    }

    pub fn slug(&self) -> String {
        self.text("slug").unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<String> {
        self.string_list("categories")
    }

    /// Основная категория: первый элемент `categories`
    pub fn primary_category(&self) -> Option<String> {
        self.categories().into_iter().next()
    }

    pub fn primary_category_slug(&self) -> Option<String> {
        self.primary_category()
            .map(|c| slugify(&c))
            .filter(|s| !s.is_empty())
    }

    pub fn tags(&self) -> Vec<String> {
        self.string_list("tags")
    }

    /// Поля, реально присутствовавшие в строке исходного набора данных
    pub fn schema_keys(&self) -> Vec<String> {
        self.string_list("schema_keys")
    }

    pub fn is_sponsored(&self) -> bool {
        ["sponsored", "is_sponsored"].iter().any(|key| match self.fields.get(*key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
            _ => false,
        })
    }

    // ─── Производные значения ───────────────────────────────────────────────

    pub fn description(&self) -> String {
        self.first_text(DESCRIPTION_SOURCES).unwrap_or_default()
    }

    pub fn website(&self) -> Option<String> {
        self.first_text(WEBSITE_SOURCES)
    }

    pub fn phone(&self) -> Option<String> {
        self.first_text(PHONE_SOURCES)
    }

    pub fn price_range(&self) -> Option<String> {
        self.first_text(PRICE_SOURCES)
    }

    pub fn maps_url(&self) -> Option<String> {
        self.first_text(MAPS_URL_SOURCES)
    }

    /// "City / Country": присутствующие части через `", "`
    pub fn city_country(&self) -> Option<String> {
        let parts: Vec<String> = ["city", "country"]
            .iter()
            .filter_map(|key| self.text(key))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Общий рейтинг: `rating_overall`, затем `rating`
    pub fn rating(&self) -> Option<f64> {
        self.number("rating_overall").or_else(|| self.number("rating"))
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.number("lat")?, self.number("lng")?))
    }

    /// Подоценки из `subscores`, а при их отсутствии из `scores`
    pub fn subscores(&self) -> Vec<(String, f64)> {
        ["subscores", "scores"]
            .iter()
            .filter_map(|key| self.fields.get(*key)?.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(label, v)| Some((label.clone(), coerce_number(v)?)))
                    .collect::<Vec<_>>()
            })
            .find(|scores| !scores.is_empty())
            .unwrap_or_default()
    }

    /// Недельное расписание.
    ///
    /// Структурированное `hours` приоритетнее; иначе разбирается компактный
    /// текст `hours_raw`, и ошибка разбора возвращается вызывающему.
    pub fn weekly_hours(&self) -> anyhow::Result<Option<WeeklyHours>> {
        if let Some(hours) = self.fields.get("hours").and_then(WeeklyHours::from_value) {
            return Ok(Some(hours));
        }
        match self.text("hours_raw") {
            Some(raw) => Ok(Some(WeeklyHours::parse_compact(&raw, DEFAULT_TZ)?)),
            None => Ok(None),
        }
    }
}
