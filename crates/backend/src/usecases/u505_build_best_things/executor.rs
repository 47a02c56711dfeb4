use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use contracts::domain::a002_best_thing::build_spotlight;

use super::csv_reader::read_rows;

/// Executor для UseCase сборки best-things.json из таблицы
pub struct BestThingsExecutor {
    source: PathBuf,
    output: PathBuf,
    cap_per_category: usize,
}

impl BestThingsExecutor {
    pub fn new(source: PathBuf, output: PathBuf, cap_per_category: usize) -> Self {
        Self {
            source,
            output,
            cap_per_category,
        }
    }

    /// Записать JSON подборки, вернуть число элементов
    pub fn run(&self, today: NaiveDate) -> Result<usize> {
        if !self.source.exists() {
            anyhow::bail!("CSV not found: {}", self.source.display());
        }
        let text = std::fs::read_to_string(&self.source)
            .with_context(|| format!("cannot read {}", self.source.display()))?;
        let rows = read_rows(&text)?;

        let build = build_spotlight(&rows, today, self.cap_per_category);
        for warning in &build.warnings {
            tracing::warn!("{}", warning);
        }

        if let Some(dir) = self.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&build.items)?;
        std::fs::write(&self.output, json)
            .with_context(|| format!("cannot write {}", self.output.display()))?;

        tracing::info!("Wrote {} items -> {}", build.items.len(), self.output.display());
        Ok(build.items.len())
    }
}
