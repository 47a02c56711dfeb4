use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use super::csv_reader::read_places;
use super::mapper::{map_row, merge};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Executor для UseCase импорта `places.csv` в файл набора данных.
///
/// Записи сопоставляются по slug: новые добавляются, существующие
/// сливаются с данными выгрузки. Результат сортируется по slug.
pub struct ImportPlacesExecutor {
    source: PathBuf,
    dataset_path: PathBuf,
    site_root: PathBuf,
}

impl ImportPlacesExecutor {
    pub fn new(source: PathBuf, dataset_path: PathBuf, site_root: PathBuf) -> Self {
        Self {
            source,
            dataset_path,
            site_root,
        }
    }

    pub fn run(&self) -> Result<ImportSummary> {
        if !self.source.exists() {
            anyhow::bail!("CSV not found: {}", self.source.display());
        }
        let text = std::fs::read_to_string(&self.source)
            .with_context(|| format!("cannot read {}", self.source.display()))?;
        let rows = read_places(&text)?;

        let (mut by_slug, unkeyed) = self.load_existing()?;
        let mut summary = ImportSummary::default();

        for row in &rows {
            let mapped = map_row(row, &self.site_root);
            let slug = row.slug();
            if slug.is_empty() {
                tracing::warn!("Skipping CSV row without slug or name (id '{}')", row.get("id"));
                summary.skipped += 1;
                continue;
            }
            match by_slug.get_mut(&slug) {
                Some(existing) => {
                    *existing = merge(existing, &mapped);
                    summary.updated += 1;
                }
                None => {
                    by_slug.insert(slug, mapped);
                    summary.created += 1;
                }
            }
        }

        let items: Vec<Value> = by_slug.into_values().chain(unkeyed).collect();
        self.save(&items)?;

        tracing::info!(
            "Imported {} row(s): {} new, {} updated -> {}",
            rows.len(),
            summary.created,
            summary.updated,
            self.dataset_path.display()
        );
        Ok(summary)
    }

    /// Существующие записи по slug; записи без slug сохраняются как есть
    fn load_existing(&self) -> Result<(BTreeMap<String, Value>, Vec<Value>)> {
        let path = &self.dataset_path;
        if !path.exists() {
            return Ok((BTreeMap::new(), Vec::new()));
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let items: Vec<Value> =
            serde_json::from_str(&contents).context("dataset must be a JSON array")?;

        let mut by_slug = BTreeMap::new();
        let mut unkeyed = Vec::new();
        for item in items {
            match item.get("slug").and_then(Value::as_str).map(str::trim) {
                Some(slug) if !slug.is_empty() => {
                    by_slug.insert(slug.to_string(), item);
                }
                _ => {
                    tracing::warn!("Dataset item without slug kept unchanged");
                    unkeyed.push(item);
                }
            }
        }
        Ok((by_slug, unkeyed))
    }

    fn save(&self, items: &[Value]) -> Result<()> {
        let path = &self.dataset_path;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))
    }
}
