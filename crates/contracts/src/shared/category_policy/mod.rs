//! Политика категорий: какие секции карточки разрешены и какие факты
//! показываются в панели "Details".
//!
//! Таблица политик является обычным значением: её загружают (TOML/JSON) или
//! берут встроенную и явно передают в резолвер и селектор.

mod builtin;

use std::collections::BTreeMap;

use anyhow::bail;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::enums::FeatureKey;
use crate::shared::slug::slugify;

static BUILTIN: Lazy<CategoryPolicyTable> = Lazy::new(builtin::build);

/// Строка панели фактов: подпись и ключ поля.
/// `key = None` означает составное значение, вычисляемое по подписи.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactField {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl FactField {
    pub fn keyed(label: &str, key: &str) -> Self {
        Self {
            label: label.to_string(),
            key: Some(key.to_string()),
        }
    }

    pub fn composite(label: &str) -> Self {
        Self {
            label: label.to_string(),
            key: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPolicy {
    /// Явное разрешение/запрет секции; отсутствующая секция разрешена
    pub sections: BTreeMap<String, bool>,
    /// Секции, скрываемые при любых данных
    pub hide_sections: Vec<FeatureKey>,
    /// Порядок и состав панели "Details"
    pub facts: Vec<FactField>,
    /// Сегмент красивого URL категории (`hotels` -> `places-to-stay`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_alias: Option<String>,
    /// Поля, обязательные для записей категории (отчёт QA)
    pub required_fields: Vec<String>,
}

impl CategoryPolicy {
    pub fn gate(&self, key: FeatureKey) -> bool {
        self.sections.get(key.code()).copied().unwrap_or(true)
    }

    pub fn hides(&self, key: FeatureKey) -> bool {
        self.hide_sections.contains(&key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicyTable {
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryPolicy>,
}

impl CategoryPolicyTable {
    /// Встроенная таблица (строится один раз, только для чтения)
    pub fn builtin() -> &'static CategoryPolicyTable {
        &BUILTIN
    }

    /// Ключи таблицы приводятся к slug-форме: в файле допустимо писать
    /// `"Car Repair & Garages"`.
    pub fn with_slug_keys(self) -> Self {
        Self {
            categories: self
                .categories
                .into_iter()
                .map(|(label, policy)| (slugify(&label), policy))
                .collect(),
        }
    }

    /// Проверка загруженной таблицы: неизвестные секции и пустые подписи
    pub fn validate(&self) -> anyhow::Result<()> {
        for (slug, policy) in &self.categories {
            if slug.is_empty() {
                bail!("category policy with an empty slug");
            }
            for code in policy.sections.keys() {
                if FeatureKey::from_code(code).is_none() {
                    bail!("category '{slug}': unknown section '{code}'");
                }
            }
            if let Some(fact) = policy.facts.iter().find(|f| f.label.trim().is_empty()) {
                bail!("category '{slug}': fact with empty label (key {:?})", fact.key);
            }
        }
        Ok(())
    }

    /// Политика по подписи или slug категории
    pub fn policy(&self, category: &str) -> Option<&CategoryPolicy> {
        let slug = slugify(category);
        if slug.is_empty() {
            return None;
        }
        self.categories.get(&slug)
    }

    /// Разрешена ли секция для категории. Неизвестная категория разрешает всё.
    pub fn gate(&self, category: &str, key: FeatureKey) -> bool {
        self.policy(category).map_or(true, |p| p.gate(key))
    }

    pub fn hides(&self, category: &str, key: FeatureKey) -> bool {
        self.policy(category).map_or(false, |p| p.hides(key))
    }

    pub fn route_alias(&self, category: &str) -> Option<&str> {
        self.policy(category)?.route_alias.as_deref()
    }

    pub fn required_fields(&self, category: &str) -> &[String] {
        self.policy(category)
            .map(|p| p.required_fields.as_slice())
            .unwrap_or(&[])
    }
}
