use serde::{Deserialize, Serialize};

use crate::domain::a001_business::BusinessRecord;

/// Секции карточки бизнеса, видимость которых вычисляется независимо
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    About,
    Amenities,
    Cuisines,
    Meals,
    Rating,
    Hours,
    Map,
    Details,
    HeaderRatingPill,
    EventFacts,
}

impl FeatureKey {
    /// Код секции (совпадает с сериализацией)
    pub fn code(&self) -> &'static str {
        match self {
            FeatureKey::About => "about",
            FeatureKey::Amenities => "amenities",
            FeatureKey::Cuisines => "cuisines",
            FeatureKey::Meals => "meals",
            FeatureKey::Rating => "rating",
            FeatureKey::Hours => "hours",
            FeatureKey::Map => "map",
            FeatureKey::Details => "details",
            FeatureKey::HeaderRatingPill => "headerRatingPill",
            FeatureKey::EventFacts => "eventFacts",
        }
    }

    /// Все секции в порядке отображения
    pub fn all() -> Vec<FeatureKey> {
        vec![
            FeatureKey::About,
            FeatureKey::Amenities,
            FeatureKey::Cuisines,
            FeatureKey::Meals,
            FeatureKey::Rating,
            FeatureKey::Hours,
            FeatureKey::Map,
            FeatureKey::Details,
            FeatureKey::HeaderRatingPill,
            FeatureKey::EventFacts,
        ]
    }

    /// Парсинг из кода
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.code() == code)
    }

    /// Поля источника, наличие которых оправдывает показ секции
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            FeatureKey::About => &["about", "about_short", "about_long", "description", "tagline"],
            FeatureKey::Amenities => &["amenities"],
            FeatureKey::Cuisines => &["cuisines"],
            FeatureKey::Meals => &["meals"],
            FeatureKey::Rating => &["rating_overall", "rating", "subscores", "scores"],
            FeatureKey::Hours => &["hours", "hours_raw"],
            FeatureKey::Map => &["address", "maps_url", "lat", "lng"],
            FeatureKey::Details => &[],
            FeatureKey::HeaderRatingPill => &["rating_overall", "rating"],
            FeatureKey::EventFacts => &["fact_venue", "fact_date", "fact_time", "fact_ticket_price"],
        }
    }

    /// Дополнительная проверка данных поверх проверки по колонкам.
    ///
    /// Ошибка означает "не удалось проверить"; вызывающий код трактует её
    /// как `false`.
    pub fn extra_check(&self, record: &BusinessRecord) -> anyhow::Result<bool> {
        match self {
            FeatureKey::Rating => Ok(has_numeric_rating(record) || has_subscores(record)),
            FeatureKey::HeaderRatingPill => Ok(has_numeric_rating(record)),
            FeatureKey::Hours => has_opening_intervals(record),
            FeatureKey::Map => Ok(record.coordinates().is_some()),
            FeatureKey::About
            | FeatureKey::Amenities
            | FeatureKey::Cuisines
            | FeatureKey::Meals
            | FeatureKey::Details
            | FeatureKey::EventFacts => Ok(false),
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

fn has_numeric_rating(record: &BusinessRecord) -> bool {
    record.number("rating_overall").is_some() || record.number("rating").is_some()
}

fn has_subscores(record: &BusinessRecord) -> bool {
    !record.subscores().is_empty()
}

fn has_opening_intervals(record: &BusinessRecord) -> anyhow::Result<bool> {
    Ok(record
        .weekly_hours()?
        .map_or(false, |hours| hours.has_intervals()))
}
