use std::path::Path;

use anyhow::Context;
use contracts::shared::category_policy::CategoryPolicyTable;
use once_cell::sync::OnceCell;

use crate::shared::config::Config;

static POLICY: OnceCell<CategoryPolicyTable> = OnceCell::new();

/// Таблица политик из файла (`.toml` или `.json`) либо встроенная
pub fn load_policy_table(config: &Config) -> anyhow::Result<CategoryPolicyTable> {
    match config.policy_path() {
        Some(path) => read_policy_table(&path),
        None => {
            tracing::info!("Using built-in category policy table");
            Ok(CategoryPolicyTable::builtin().clone())
        }
    }
}

pub fn read_policy_table(path: &Path) -> anyhow::Result<CategoryPolicyTable> {
    tracing::info!("Loading category policy from {}", path.display());
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read category policy {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"));
    let table: CategoryPolicyTable = if is_json {
        serde_json::from_str(&contents).context("invalid category policy JSON")?
    } else {
        toml::from_str(&contents).context("invalid category policy TOML")?
    };

    let table = table.with_slug_keys();
    table.validate()?;
    tracing::info!("Category policy loaded: {} categories", table.categories.len());
    Ok(table)
}

pub fn initialize_policy(config: &Config) -> anyhow::Result<()> {
    let table = load_policy_table(config)?;
    if POLICY.set(table).is_err() {
        tracing::warn!("Category policy already initialized, keeping the first copy");
    }
    Ok(())
}

/// Загруженная таблица; до инициализации встроенная
pub fn get_policy() -> &'static CategoryPolicyTable {
    POLICY.get().unwrap_or_else(CategoryPolicyTable::builtin)
}
