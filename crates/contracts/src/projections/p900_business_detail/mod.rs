//! Проекция карточки бизнеса: видимость секций и панель "Details".

pub mod extra_fields;
pub mod facts;
pub mod visibility;

use serde::{Deserialize, Serialize};

pub use extra_fields::discover_extra_fields;
pub use facts::{select_facts, FactRow};
pub use visibility::{resolve, FeatureVisibility};

use crate::domain::a001_business::BusinessRecord;
use crate::enums::FeatureKey;
use crate::shared::category_policy::CategoryPolicyTable;

/// Всё, что слой отображения получает для страницы одного бизнеса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetailView {
    pub slug: String,
    pub name: String,
    pub primary_category: Option<String>,
    pub description: String,
    pub sponsored: bool,
    pub visibility: FeatureVisibility,
    pub facts: Vec<FactRow>,
    /// Строки расписания; пусто, если секция скрыта. Расписание, которое не
    /// удалось разобрать, скрывает секцию.
    pub hours: Vec<String>,
}

impl BusinessDetailView {
    /// Normalized record -> resolver -> selector -> discoverer
    pub fn build(record: &BusinessRecord, table: &CategoryPolicyTable) -> Self {
        let category = record.primary_category().unwrap_or_default();

        let mut visibility = resolve(record, &category, table);
        let mut facts = select_facts(record, &category, table);
        let extras = discover_extra_fields(record, &facts);
        facts.extend(extras);

        // "Details" предварительно видима; окончательно решает наличие строк
        let details = visibility.is_visible(FeatureKey::Details) && !facts.is_empty();
        visibility.set(FeatureKey::Details, details);

        let hours = if visibility.is_visible(FeatureKey::Hours) {
            record
                .weekly_hours()
                .ok()
                .flatten()
                .map(|h| h.summary_lines())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        if hours.is_empty() {
            visibility.set(FeatureKey::Hours, false);
        }

        Self {
            slug: record.slug(),
            name: record.name(),
            primary_category: record.primary_category(),
            description: record.description(),
            sponsored: record.is_sponsored(),
            visibility,
            facts,
            hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_business::normalize;
    use serde_json::json;

    #[test]
    fn test_event_view() {
        let record = normalize(&json!({
            "name": "Muscat Jazz Night",
            "categories": ["Events"],
            "fact_venue": "Royal Opera House",
            "fact_date": "2026-11-02",
            "fact_ticket_price": "OMR 15",
            "fact_dress_code": "Smart casual",
            "cuisines": ["Omani"],
            "schema_keys": ["name", "categories", "fact_venue", "fact_date", "fact_ticket_price", "fact_dress_code", "cuisines"]
        }));
        let view = BusinessDetailView::build(&record, CategoryPolicyTable::builtin());

        assert_eq!(view.slug, "muscat-jazz-night");
        assert!(view.visibility.is_visible(FeatureKey::EventFacts));
        assert!(!view.visibility.is_visible(FeatureKey::Cuisines));
        assert!(view.visibility.is_visible(FeatureKey::Details));

        let labels: Vec<&str> = view.facts.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Category", "Venue", "Date", "Ticket Price", "Dress Code"]);
    }

    #[test]
    fn test_details_hidden_without_rows() {
        let record = normalize(&json!({"name": "Bare"}));
        let view = BusinessDetailView::build(&record, CategoryPolicyTable::builtin());
        assert!(view.facts.is_empty());
        assert!(!view.visibility.is_visible(FeatureKey::Details));
    }

    #[test]
    fn test_hours_lines_only_when_visible() {
        let record = normalize(&json!({
            "categories": ["Restaurants"],
            "hours_raw": "Mon-Fri 12:00-23:00"
        }));
        let view = BusinessDetailView::build(&record, CategoryPolicyTable::builtin());
        assert_eq!(view.hours.len(), 7);
        assert_eq!(view.hours[0], "Mon: 12:00–23:00");

        let event = normalize(&json!({"categories": ["Events"], "hours_raw": "Mon 10:00-12:00"}));
        let view = BusinessDetailView::build(&event, CategoryPolicyTable::builtin());
        assert!(view.hours.is_empty());
    }

    #[test]
    fn test_unparseable_hours_hide_section() {
        let record = normalize(&json!({
            "categories": ["Restaurants"],
            "hours_raw": "Mon 25:00-26:00"
        }));
        let view = BusinessDetailView::build(&record, CategoryPolicyTable::builtin());
        assert!(view.hours.is_empty());
        assert!(!view.visibility.is_visible(FeatureKey::Hours));
    }

    #[test]
    fn test_serialized_shape() {
        let record = normalize(&json!({"name": "X", "categories": ["Spas"], "about": "Relax"}));
        let view = BusinessDetailView::build(&record, CategoryPolicyTable::builtin());
        let encoded = serde_json::to_value(&view).unwrap();
        assert_eq!(encoded["primaryCategory"], json!("Spas"));
        assert_eq!(encoded["description"], json!("Relax"));
        assert_eq!(encoded["visibility"]["about"], json!(true));
        assert_eq!(encoded["facts"][0], json!({"label": "Category", "value": "Spas"}));
    }
}
