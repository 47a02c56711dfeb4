use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use contracts::domain::a001_business::Dataset;
use contracts::shared::category_policy::CategoryPolicyTable;
use contracts::shared::routes::{
    canonical_category_path, canonical_item_path, legacy_category_url, legacy_item_url, record_slug,
};

/// Страница-переадресация для красивого URL
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStub {
    /// Канонический путь `/{alias}/` или `/{alias}/{slug}/`
    pub canonical: String,
    /// Старый адрес со строкой запроса, куда уводит страница
    pub redirect: String,
}

impl RouteStub {
    /// Файл `index.html` относительно корня сайта
    pub fn file_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .canonical
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        path.push("index.html");
        path
    }
}

/// Executor для UseCase генерации страниц-переадресаций
pub struct RouteStubExecutor {
    site_root: PathBuf,
}

impl RouteStubExecutor {
    pub fn new(site_root: PathBuf) -> Self {
        Self { site_root }
    }

    /// Записать все страницы, вернуть их количество
    pub fn run(&self, dataset: &Dataset, table: &CategoryPolicyTable) -> Result<usize> {
        let stubs = plan_stubs(dataset, table);
        for stub in &stubs {
            let path = self.site_root.join(stub.file_path());
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("cannot create {}", dir.display()))?;
            }
            std::fs::write(&path, stub_html(&stub.canonical, &stub.redirect))
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::debug!("Stub written: {}", path.display());
        }
        tracing::info!("Route stubs written: {} under {}", stubs.len(), self.site_root.display());
        Ok(stubs.len())
    }
}

/// Категории (только записи с категориями), затем записи в порядке набора
pub fn plan_stubs(dataset: &Dataset, table: &CategoryPolicyTable) -> Vec<RouteStub> {
    let categories: BTreeSet<String> = dataset
        .iter()
        .filter_map(|r| r.primary_category_slug())
        .collect();

    let mut stubs: Vec<RouteStub> = categories
        .iter()
        .map(|category| RouteStub {
            canonical: canonical_category_path(category, table),
            redirect: legacy_category_url(category),
        })
        .collect();

    for record in dataset.iter() {
        let (Some(canonical), Some(slug)) = (canonical_item_path(record, table), record_slug(record)) else {
            continue;
        };
        stubs.push(RouteStub {
            canonical,
            redirect: legacy_item_url(&slug),
        });
    }
    stubs
}

pub fn stub_html(canonical: &str, redirect: &str) -> String {
    format!(
        r#"<!doctype html>
<meta charset="utf-8">
<link rel="canonical" href="{canonical}">
<meta http-equiv="refresh" content="0; url={redirect}">
<script>location.replace('{redirect}');</script>
<p>Redirecting to <a href="{redirect}">{canonical}</a>…</p>
"#
    )
}
