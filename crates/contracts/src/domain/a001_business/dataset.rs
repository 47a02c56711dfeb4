use std::collections::BTreeSet;

use anyhow::Context;
use serde_json::Value;

use super::aggregate::BusinessRecord;
use super::normalizer::normalize;
use crate::shared::slug::slugify;

/// Категория-заглушка для записей без категорий
pub const FALLBACK_CATEGORY: &str = "places";

/// Весь набор данных каталога, загруженный одним массивом JSON
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<BusinessRecord>,
}

impl Dataset {
    pub fn new(records: Vec<BusinessRecord>) -> Self {
        Self { records }
    }

    /// Разбор JSON-массива; каждая запись проходит нормализацию
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(json).context("dataset is not valid JSON")?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> anyhow::Result<Self> {
        let items = value
            .as_array()
            .context("dataset must be a JSON array of records")?;
        Ok(Self::new(items.iter().map(normalize).collect()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusinessRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    /// Поиск по slug; обе стороны приводятся к slug-форме
    pub fn find_by_slug(&self, slug: &str) -> Option<&BusinessRecord> {
        let wanted = slugify(slug);
        if wanted.is_empty() {
            return None;
        }
        self.records.iter().find(|r| slugify(&r.slug()) == wanted)
    }

    /// Отсортированные уникальные slug основных категорий
    pub fn primary_categories(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| {
                r.primary_category_slug()
                    .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
