//! Category Fact Selector: ordered (label, value) rows of the "Details" panel.

use serde::{Deserialize, Serialize};

use crate::domain::a001_business::BusinessRecord;
use crate::shared::category_policy::CategoryPolicyTable;
use crate::shared::text::format_number;

pub const CATEGORY_LABEL: &str = "Category";
pub const COORDINATES_LABEL: &str = "Coordinates";

/// Порядок строк для категорий без собственной политики
const FALLBACK_FACTS: &[&str] = &[
    CATEGORY_LABEL,
    "City / Country",
    "Price Range",
    "Tags",
    "Website",
    "Phone",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRow {
    pub label: String,
    pub value: String,
}

impl FactRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub fn select_facts(record: &BusinessRecord, category: &str, table: &CategoryPolicyTable) -> Vec<FactRow> {
    let mut rows = Vec::new();
    let category = category.trim();

    if !category.is_empty() {
        rows.push(FactRow::new(CATEGORY_LABEL, category));
    }

    let configured = table
        .policy(category)
        .map(|p| p.facts.as_slice())
        .filter(|facts| !facts.is_empty());

    match configured {
        Some(fields) => {
            for field in fields {
                if field.label.trim().eq_ignore_ascii_case(CATEGORY_LABEL) {
                    continue;
                }
                let value = match &field.key {
                    Some(key) => record.text(key),
                    None => composite_value(record, &field.label),
                };
                push_row(&mut rows, &field.label, value);
            }
        }
        None => {
            for label in FALLBACK_FACTS.iter().skip(1) {
                push_row(&mut rows, label, composite_value(record, label));
            }
        }
    }

    if let Some((lat, lng)) = record.coordinates() {
        rows.push(FactRow::new(
            COORDINATES_LABEL,
            format!("{}, {}", format_number(lat), format_number(lng)),
        ));
    }

    rows
}

fn push_row(rows: &mut Vec<FactRow>, label: &str, value: Option<String>) {
    if let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        rows.push(FactRow::new(label.trim(), value));
    }
}

/// Значения строк без ключа поля.
///
/// Неизвестная подпись читается как поле с тем же именем в snake_case
/// (`"Star Rating"` -> `star_rating`).
fn composite_value(record: &BusinessRecord, label: &str) -> Option<String> {
    match label.trim().to_lowercase().as_str() {
        "city / country" => record.city_country(),
        "website" => record.website(),
        "phone" => record.phone(),
        "price range" => record.price_range(),
        "tags" => Some(record.tags().join(", ")),
        "category" => record.primary_category(),
        "neighbourhood" | "neighborhood" => record.text("neighborhood"),
        "maps" | "map link" => record.maps_url(),
        "rating" => record.rating().map(format_number),
        other => record.text(&label_to_key(other)),
    }
}

fn label_to_key(label: &str) -> String {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_business::normalize;
    use crate::shared::category_policy::{CategoryPolicy, FactField};
    use serde_json::json;

    fn labels(rows: &[FactRow]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_hotel_rows_in_configured_order() {
        let record = normalize(&json!({
            "categories": ["Hotels"],
            "neighborhood": "Qurum",
            "city": "Muscat",
            "country": "Oman",
            "price_range": "$$"
        }));
        let rows = select_facts(&record, "Hotels", CategoryPolicyTable::builtin());
        assert_eq!(
            rows,
            vec![
                FactRow::new("Category", "Hotels"),
                FactRow::new("Neighbourhood", "Qurum"),
                FactRow::new("City / Country", "Muscat, Oman"),
                FactRow::new("Price Range", "$$"),
            ]
        );
    }

    #[test]
    fn test_fallback_for_unknown_category() {
        let record = normalize(&json!({
            "categories": ["Tea Houses"],
            "location": {"city": "Nizwa"},
            "pricing": "$",
            "tags": ["tea", "local"],
            "actions": {"website": "https://tea.example", "phone": "+968 9"},
            "url": "https://fallback.example"
        }));
        let rows = select_facts(&record, "Tea Houses", CategoryPolicyTable::builtin());
        assert_eq!(
            labels(&rows),
            vec!["Category", "City / Country", "Price Range", "Tags", "Website", "Phone"]
        );
        assert_eq!(rows[3].value, "tea, local");
        assert_eq!(rows[4].value, "https://tea.example");
    }

    #[test]
    fn test_website_falls_back_to_url() {
        let record = normalize(&json!({"categories": ["Spas"], "url": "https://spa.example"}));
        let rows = select_facts(&record, "Spas", CategoryPolicyTable::builtin());
        assert_eq!(rows.last().unwrap(), &FactRow::new("Website", "https://spa.example"));
    }

    #[test]
    fn test_coordinates_last() {
        let record = normalize(&json!({
            "categories": ["Malls"],
            "location": {"lat": 23.5880, "lng": "58.3829", "city": "Muscat"}
        }));
        let rows = select_facts(&record, "Malls", CategoryPolicyTable::builtin());
        assert_eq!(
            rows.last().unwrap(),
            &FactRow::new("Coordinates", "23.588, 58.3829")
        );
    }

    #[test]
    fn test_no_category_uses_fallback_without_category_row() {
        let record = normalize(&json!({"city": "Sur"}));
        let rows = select_facts(&record, "", CategoryPolicyTable::builtin());
        assert_eq!(rows, vec![FactRow::new("City / Country", "Sur")]);
    }

    #[test]
    fn test_keyed_fields_join_arrays_and_skip_empty() {
        let mut table = CategoryPolicyTable::default();
        table.categories.insert(
            "tea-houses".to_string(),
            CategoryPolicy {
                facts: vec![
                    FactField::keyed("Category", "categories"),
                    FactField::keyed("Teas", "teas"),
                    FactField::keyed("Seating", "seating"),
                    FactField::composite("Star Rating"),
                ],
                ..CategoryPolicy::default()
            },
        );
        let record = normalize(&json!({
            "categories": ["Tea Houses"],
            "teas": ["Karak", "Mint"],
            "seating": "   ",
            "star_rating": 4
        }));
        let rows = select_facts(&record, "Tea Houses", &table);
        assert_eq!(
            rows,
            vec![
                FactRow::new("Category", "Tea Houses"),
                FactRow::new("Teas", "Karak, Mint"),
                FactRow::new("Star Rating", "4"),
            ]
        );
    }

    #[test]
    fn test_select_is_idempotent() {
        let record = normalize(&json!({"categories": ["Events"], "fact_venue": "Opera House"}));
        let table = CategoryPolicyTable::builtin();
        assert_eq!(
            select_facts(&record, "Events", table),
            select_facts(&record, "Events", table)
        );
    }
}
