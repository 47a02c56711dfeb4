//! Feature-Visibility Resolver.
//!
//! Секция видима, когда выполнены три условия: колонка объявлена в схеме
//! источника, данные непусты, категория не запрещает секцию. После этого
//! `hide_sections` категории скрывает секции безусловно.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::a001_business::BusinessRecord;
use crate::enums::FeatureKey;
use crate::shared::category_policy::CategoryPolicyTable;
use crate::shared::text::is_filled;

/// Решение "показывать секцию" для каждого [`FeatureKey`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVisibility(BTreeMap<FeatureKey, bool>);

impl FeatureVisibility {
    pub fn is_visible(&self, key: FeatureKey) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: FeatureKey, visible: bool) {
        self.0.insert(key, visible);
    }

    pub fn visible_keys(&self) -> Vec<FeatureKey> {
        self.0.iter().filter(|(_, v)| **v).map(|(k, _)| *k).collect()
    }
}

pub fn resolve(record: &BusinessRecord, category: &str, table: &CategoryPolicyTable) -> FeatureVisibility {
    let schema_keys = record.schema_keys();
    let mut visibility = FeatureVisibility::default();

    for key in FeatureKey::all() {
        let visible = schema_check(key, &schema_keys)
            && data_check(record, key)
            && table.gate(category, key);
        visibility.set(key, visible);
    }

    if let Some(policy) = table.policy(category) {
        for key in &policy.hide_sections {
            visibility.set(*key, false);
        }
    }

    visibility
}

/// Пустой список схемы (или секция без колонок) проверку не блокирует
fn schema_check(key: FeatureKey, schema_keys: &[String]) -> bool {
    let candidates = key.candidates();
    if schema_keys.is_empty() || candidates.is_empty() {
        return true;
    }
    schema_keys
        .iter()
        .any(|declared| candidates.iter().any(|c| schema_key_matches(declared.trim(), c)))
}

/// `about.short` покрывает `about`, `location.address` покрывает `address`
fn schema_key_matches(declared: &str, candidate: &str) -> bool {
    declared == candidate
        || is_dotted_prefix(candidate, declared)
        || is_dotted_prefix(declared, candidate)
        || declared.rsplit('.').next() == Some(candidate)
}

fn is_dotted_prefix(prefix: &str, full: &str) -> bool {
    full.len() > prefix.len() && full.starts_with(prefix) && full[prefix.len()..].starts_with('.')
}

fn data_check(record: &BusinessRecord, key: FeatureKey) -> bool {
    if key == FeatureKey::Details {
        return true;
    }
    let by_columns = key
        .candidates()
        .iter()
        .any(|candidate| record.value(candidate).map_or(false, is_filled));

    // Ошибка дополнительной проверки означает "нет данных"
    by_columns || key.extra_check(record).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_business::normalize;
    use crate::shared::category_policy::CategoryPolicy;
    use serde_json::{json, Value};

    fn resolve_raw(raw: Value) -> FeatureVisibility {
        let record = normalize(&raw);
        let category = record.primary_category().unwrap_or_default();
        resolve(&record, &category, CategoryPolicyTable::builtin())
    }

    #[test]
    fn test_restaurant_with_about_only() {
        let v = resolve_raw(json!({
            "categories": ["Restaurants"],
            "about": {"short": "Cozy spot"}
        }));
        assert!(v.is_visible(FeatureKey::About));
        assert!(!v.is_visible(FeatureKey::Cuisines));
        assert!(!v.is_visible(FeatureKey::Meals));
        assert!(v.is_visible(FeatureKey::Details));
    }

    #[test]
    fn test_events_force_hide_cuisines() {
        let v = resolve_raw(json!({
            "categories": ["Events"],
            "cuisines": ["Omani"],
            "meals": ["Dinner"]
        }));
        assert!(!v.is_visible(FeatureKey::Cuisines));
        assert!(!v.is_visible(FeatureKey::Meals));
    }

    #[test]
    fn test_empty_candidates_never_visible() {
        let v = resolve_raw(json!({
            "categories": ["Unknown Things"],
            "amenities": [],
            "about": {"short": "  "},
            "rating_overall": "not a number",
            "hours_raw": ""
        }));
        for key in FeatureKey::all() {
            if key == FeatureKey::Details {
                continue;
            }
            assert!(!v.is_visible(key), "{key} should be hidden");
        }
    }

    #[test]
    fn test_schema_keys_gate_presence() {
        let with_schema = resolve_raw(json!({
            "amenities": ["Pool"],
            "schema_keys": ["name", "cuisines"]
        }));
        assert!(!with_schema.is_visible(FeatureKey::Amenities));

        let nested_schema = resolve_raw(json!({
            "about": {"short": "Hi"},
            "location": {"address": "Way 123"},
            "schema_keys": ["about.short", "location.address"]
        }));
        assert!(nested_schema.is_visible(FeatureKey::About));
        assert!(nested_schema.is_visible(FeatureKey::Map));

        let no_schema = resolve_raw(json!({"amenities": ["Pool"]}));
        assert!(no_schema.is_visible(FeatureKey::Amenities));
    }

    #[test]
    fn test_rating_via_extra_predicate() {
        let v = resolve_raw(json!({"subscores": {"Service": 4.5}}));
        assert!(v.is_visible(FeatureKey::Rating));
        assert!(!v.is_visible(FeatureKey::HeaderRatingPill));

        let pill = resolve_raw(json!({"rating": "4.1"}));
        assert!(pill.is_visible(FeatureKey::HeaderRatingPill));
    }

    #[test]
    fn test_hours_visibility() {
        let v = resolve_raw(json!({"schema_keys": ["hours"], "hours": {"weekly": {}}}));
        assert!(!v.is_visible(FeatureKey::Hours));

        // Текст есть, поэтому проверка по колонкам проходит несмотря на ошибку разбора
        let raw_text = resolve_raw(json!({"hours_raw": "Mon 99:00-10:00"}));
        assert!(raw_text.is_visible(FeatureKey::Hours));
    }

    #[test]
    fn test_gate_only_restricts() {
        let raw = json!({
            "categories": ["Hotels"],
            "fact_venue": "Ballroom",
            "amenities": []
        });
        let record = normalize(&raw);
        let open = CategoryPolicyTable::default();
        let ungated = resolve(&record, "Hotels", &open);
        let gated = resolve(&record, "Hotels", CategoryPolicyTable::builtin());

        assert!(ungated.is_visible(FeatureKey::EventFacts));
        assert!(!gated.is_visible(FeatureKey::EventFacts));
        for key in FeatureKey::all() {
            if gated.is_visible(key) {
                assert!(ungated.is_visible(key));
            }
        }
    }

    #[test]
    fn test_gate_cannot_add_visibility() {
        let mut table = CategoryPolicyTable::default();
        let mut policy = CategoryPolicy::default();
        policy.sections.insert("amenities".to_string(), true);
        table.categories.insert("spas".to_string(), policy);

        let record = normalize(&json!({"categories": ["Spas"]}));
        assert!(!resolve(&record, "Spas", &table).is_visible(FeatureKey::Amenities));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let record = normalize(&json!({
            "categories": ["Malls"],
            "about_short": "Big mall",
            "hours_raw": "Daily 10:00-22:00",
            "location": {"lat": 23.58, "lng": 58.39}
        }));
        let table = CategoryPolicyTable::builtin();
        let first = resolve(&record, "Malls", table);
        let second = resolve(&record, "Malls", table);
        assert_eq!(first, second);
        assert!(first.is_visible(FeatureKey::Map));
        assert!(first.is_visible(FeatureKey::Hours));
    }

    #[test]
    fn test_serializes_with_codes() {
        let v = resolve_raw(json!({"rating_overall": 4.0}));
        let encoded = serde_json::to_value(&v).unwrap();
        assert_eq!(encoded["headerRatingPill"], json!(true));
        assert_eq!(encoded["eventFacts"], json!(false));
    }
}
