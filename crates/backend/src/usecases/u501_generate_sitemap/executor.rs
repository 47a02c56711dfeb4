use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use contracts::domain::a001_business::Dataset;
use contracts::shared::category_policy::CategoryPolicyTable;
use contracts::shared::routes::{canonical_category_path, canonical_item_path};

const SITEMAP_FILE: &str = "sitemap.xml";

/// Executor для UseCase генерации sitemap.xml
pub struct SitemapExecutor {
    site_root: PathBuf,
    base_url: String,
}

impl SitemapExecutor {
    pub fn new(site_root: PathBuf, base_url: &str) -> Self {
        Self {
            site_root,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Записать sitemap.xml в корень сайта, вернуть путь к файлу
    pub fn run(&self, dataset: &Dataset, table: &CategoryPolicyTable, today: NaiveDate) -> Result<PathBuf> {
        let xml = build_sitemap(dataset, table, &self.base_url, today);
        let path = self.site_root.join(SITEMAP_FILE);
        std::fs::write(&path, xml).with_context(|| format!("cannot write {}", path.display()))?;
        tracing::info!("Sitemap written: {} ({} records)", path.display(), dataset.len());
        Ok(path)
    }
}

/// Главная (1.0), страницы категорий (0.8), страницы записей (0.6, `lastmod`)
pub fn build_sitemap(dataset: &Dataset, table: &CategoryPolicyTable, base_url: &str, today: NaiveDate) -> String {
    let base = escape_xml(base_url.trim_end_matches('/'));
    let mut urls = vec![format!(
        "<url><loc>{base}/</loc><changefreq>daily</changefreq><priority>1.0</priority></url>"
    )];

    for category in dataset.primary_categories() {
        let path = canonical_category_path(&category, table);
        urls.push(format!(
            "<url><loc>{base}{path}</loc><changefreq>daily</changefreq><priority>0.8</priority></url>"
        ));
    }

    let lastmod = today.format("%Y-%m-%d");
    for record in dataset.iter() {
        let Some(path) = canonical_item_path(record, table) else {
            tracing::debug!("Sitemap: skipping record without slug or name");
            continue;
        };
        urls.push(format!(
            "<url><loc>{base}{path}</loc><lastmod>{lastmod}</lastmod><changefreq>weekly</changefreq><priority>0.6</priority></url>"
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>\n",
        urls.join("\n")
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
