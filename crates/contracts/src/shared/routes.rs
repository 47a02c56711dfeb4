//! Красивые URL сайта и их соответствие старым адресам со строкой запроса.

use crate::domain::a001_business::dataset::FALLBACK_CATEGORY;
use crate::domain::a001_business::BusinessRecord;
use crate::shared::category_policy::CategoryPolicyTable;
use crate::shared::slug::slugify;

/// Сегмент URL категории: алиас из политики или сам slug
pub fn category_alias(category: &str, table: &CategoryPolicyTable) -> String {
    let slug = slugify(category);
    table
        .route_alias(&slug)
        .map(str::to_string)
        .unwrap_or(slug)
}

/// Slug основной категории записи (`places`, если категорий нет)
pub fn record_category_slug(record: &BusinessRecord) -> String {
    record
        .primary_category_slug()
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

/// Slug записи для URL: `slug`, иначе имя
pub fn record_slug(record: &BusinessRecord) -> Option<String> {
    let slug = slugify(&record.slug());
    let slug = if slug.is_empty() {
        slugify(&record.name())
    } else {
        slug
    };
    Some(slug).filter(|s| !s.is_empty())
}

pub fn canonical_category_path(category: &str, table: &CategoryPolicyTable) -> String {
    format!("/{}/", category_alias(category, table))
}

/// `/{alias}/{slug}/`; `None` для записей без slug и имени
pub fn canonical_item_path(record: &BusinessRecord, table: &CategoryPolicyTable) -> Option<String> {
    let slug = record_slug(record)?;
    let alias = category_alias(&record_category_slug(record), table);
    Some(format!("/{alias}/{slug}/"))
}

pub fn legacy_category_url(category: &str) -> String {
    format!("/index.html?category={}", slugify(category))
}

pub fn legacy_item_url(slug: &str) -> String {
    format!("/tool.html?slug={}", slugify(slug))
}
