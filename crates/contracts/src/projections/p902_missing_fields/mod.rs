//! Отчёт о незаполненных обязательных полях по категориям.

use serde::{Deserialize, Serialize};

use crate::domain::a001_business::Dataset;
use crate::shared::category_policy::CategoryPolicyTable;
use crate::shared::routes::record_slug;
use crate::shared::text::is_filled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    pub slug: String,
    pub field: String,
}

/// Для каждой записи: обязательные поля основной категории, которые пусты.
/// Записи без slug и имени попадают в отчёт под пустым slug.
pub fn missing_fields(dataset: &Dataset, table: &CategoryPolicyTable) -> Vec<MissingField> {
    let mut report = Vec::new();
    for record in dataset.iter() {
        let Some(category) = record.primary_category() else {
            continue;
        };
        let slug = record_slug(record).unwrap_or_default();
        for field in table.required_fields(&category) {
            let filled = record.value(field).map_or(false, is_filled);
            if !filled {
                report.push(MissingField {
                    slug: slug.clone(),
                    field: field.clone(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_missing_required_fields() {
        let dataset = Dataset::from_json(
            r#"[
                {"name": "Al Bustan", "categories": ["Hotels"],
                 "actions": {"website": "https://albustan.example", "phone": ""},
                 "images": {"hero": "hero.jpg"},
                 "location": {"address": "Al Bustan St"}},
                {"name": "Kargeen", "categories": ["Restaurants"],
                 "actions": {"phone": "+968 2469 9055"},
                 "hours_raw": "Daily 08:00-23:00"},
                {"name": "Hidden Spa", "categories": ["Spas"]},
                {"name": "No Category"}
            ]"#,
        )
        .unwrap();

        let report = missing_fields(&dataset, CategoryPolicyTable::builtin());
        let pairs: Vec<(&str, &str)> = report
            .iter()
            .map(|m| (m.slug.as_str(), m.field.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("al-bustan", "actions.phone"),
                ("kargeen", "images.hero"),
                ("kargeen", "location.address"),
                ("kargeen", "hours"),
            ]
        );
    }

    #[test]
    fn test_structured_hours_count_as_filled() {
        let dataset = Dataset::from_json(
            r#"[{"name": "Cafe", "categories": ["Restaurants"],
                 "actions": {"phone": "1"}, "images": {"hero": "h.jpg"},
                 "location": {"address": "Qurum"},
                 "hours": {"weekly": {"mon": [{"open": "09:00", "close": "17:00"}]}}}]"#,
        )
        .unwrap();
        assert!(missing_fields(&dataset, CategoryPolicyTable::builtin()).is_empty());
    }
}
