use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Категория подборки
// ============================================================================

/// Допустимые категории. Порядок вариантов совпадает с алфавитным порядком
/// подписей: по нему сортируется выдача.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpotlightCategory {
    #[serde(rename = "Events and Venues")]
    EventsAndVenues,
    #[serde(rename = "Tours & Experiences")]
    ToursAndExperiences,
    #[serde(rename = "Wellness & Aesthetics")]
    WellnessAndAesthetics,
}

/// Опечатки и сокращения, встречающиеся в таблице
const CATEGORY_ALIASES: &[(&str, SpotlightCategory)] = &[
    ("tours and experiences", SpotlightCategory::ToursAndExperiences),
    ("tours & experience", SpotlightCategory::ToursAndExperiences),
    ("events & venues", SpotlightCategory::EventsAndVenues),
    ("events", SpotlightCategory::EventsAndVenues),
    ("venues", SpotlightCategory::EventsAndVenues),
    ("wellness and aesthetics", SpotlightCategory::WellnessAndAesthetics),
    ("wellness", SpotlightCategory::WellnessAndAesthetics),
    ("aesthetics", SpotlightCategory::WellnessAndAesthetics),
];

impl SpotlightCategory {
    pub const ALL: [SpotlightCategory; 3] = [
        SpotlightCategory::EventsAndVenues,
        SpotlightCategory::ToursAndExperiences,
        SpotlightCategory::WellnessAndAesthetics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SpotlightCategory::EventsAndVenues => "Events and Venues",
            SpotlightCategory::ToursAndExperiences => "Tours & Experiences",
            SpotlightCategory::WellnessAndAesthetics => "Wellness & Aesthetics",
        }
    }

    /// Каноническая категория по подписи или алиасу (без учёта регистра)
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == key)
            .or_else(|| {
                CATEGORY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, c)| *c)
            })
    }
}

impl fmt::Display for SpotlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Строка таблицы
// ============================================================================

/// Строка CSV: заголовок колонки -> значение
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotlightRow(pub HashMap<String, String>);

impl SpotlightRow {
    /// Значение колонки без пробелов по краям; отсутствующая колонка пуста
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(|v| v.trim()).unwrap_or("")
    }

    /// Ключ для предупреждений
    pub fn id(&self) -> &str {
        self.get("id")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SpotlightRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// Элемент подборки
// ============================================================================

/// Элемент итогового JSON. Пустые необязательные поля не сериализуются,
/// `subtitle` выводится всегда.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub category: SpotlightCategory,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub url: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub cta_label: String,
    pub priority: i64,
    pub is_sponsored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}
