//! Список бизнесов: фильтр по категории, поиск, сортировка, страницы.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::a001_business::{BusinessRecord, Dataset};
use crate::shared::slug::slugify;

pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const MAX_PAGE_SIZE: usize = 100;

/// Поиск короче этого числа символов игнорируется
const MIN_SEARCH_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Name,
    Rating,
    Featured,
}

/// Параметры запроса списка (строка запроса `?category=&q=&sort=&page=`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub sort: SortOrder,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ListQuery {
    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Карточка бизнеса в списке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub slug: String,
    pub name: String,
    pub primary_category: Option<String>,
    pub summary: String,
    pub rating: Option<f64>,
    pub neighborhood: Option<String>,
    pub sponsored: bool,
}

impl ListItem {
    pub fn from_record(record: &BusinessRecord) -> Self {
        let summary = record
            .text("tagline")
            .unwrap_or_else(|| record.description());
        Self {
            slug: record.slug(),
            name: record.name(),
            primary_category: record.primary_category(),
            summary,
            rating: record.rating(),
            neighborhood: record.text("neighborhood"),
            sponsored: record.is_sponsored(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub items: Vec<ListItem>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

pub fn list(dataset: &Dataset, query: &ListQuery) -> ListPage {
    let category = query
        .category
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty());
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| q.chars().count() >= MIN_SEARCH_LEN);

    let mut matched: Vec<&BusinessRecord> = dataset
        .iter()
        .filter(|r| category.as_deref().map_or(true, |c| in_category(r, c)))
        .filter(|r| needle.as_deref().map_or(true, |n| matches_search(r, n)))
        .collect();

    sort_records(&mut matched, query.sort);

    let total = matched.len();
    let page = query.page();
    let page_size = query.page_size();
    let total_pages = total.div_ceil(page_size);

    let items = matched
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(ListItem::from_record)
        .collect();

    ListPage {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

fn in_category(record: &BusinessRecord, category_slug: &str) -> bool {
    record
        .categories()
        .iter()
        .any(|c| slugify(c) == category_slug)
}

fn matches_search(record: &BusinessRecord, needle: &str) -> bool {
    let mut haystack = vec![record.name(), record.description()];
    haystack.extend(record.text("tagline"));
    haystack.extend(record.text("neighborhood"));
    haystack.extend(record.tags());
    haystack.extend(record.categories());

    haystack
        .iter()
        .any(|text| text.to_lowercase().contains(needle))
}

fn sort_records(records: &mut [&BusinessRecord], order: SortOrder) {
    let by_name = |a: &BusinessRecord, b: &BusinessRecord| {
        a.name().to_lowercase().cmp(&b.name().to_lowercase())
    };

    match order {
        SortOrder::Name => records.sort_by(|a, b| by_name(a, b)),
        SortOrder::Rating => records.sort_by(|a, b| match (a.rating(), b.rating()) {
            (Some(x), Some(y)) => y
                .partial_cmp(&x)
                .unwrap_or(Ordering::Equal)
                .then_with(|| by_name(a, b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => by_name(a, b),
        }),
        SortOrder::Featured => records.sort_by(|a, b| {
            b.is_sponsored()
                .cmp(&a.is_sponsored())
                .then_with(|| by_name(a, b))
        }),
    }
}
