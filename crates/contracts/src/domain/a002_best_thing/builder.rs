//! Сборка подборки из строк таблицы.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::aggregate::{SpotlightCategory, SpotlightItem, SpotlightRow};

pub const DEFAULT_CAP_PER_CATEGORY: usize = 12;
const DEFAULT_PRIORITY: i64 = 999;
const DEFAULT_CTA_LABEL: &str = "Learn more";
const UTM_COLUMNS: &[&str] = &["utm_source", "utm_medium", "utm_campaign"];

/// Колонки, без которых таблица не принимается (`rating`, `is_open` необязательны)
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "category",
    "title",
    "subtitle",
    "url",
    "image_url",
    "area",
    "tags",
    "cta_label",
    "priority",
    "status",
    "start_date",
    "end_date",
    "is_sponsored",
    "sponsor_name",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "notes",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotlightBuild {
    pub items: Vec<SpotlightItem>,
    /// Пропущенные строки: неизвестная категория или ссылка не http(s)
    pub warnings: Vec<String>,
}

/// Отбор, сортировка и ограничение подборки.
///
/// Строка попадает в выдачу, если `status == live`, `today` лежит в окне
/// `start_date..=end_date` (пустая граница открыта, неверная дата исключает
/// строку), категория распознана, а `url` и `image_url` ведут на http(s).
/// `cap_per_category == 0` снимает ограничение.
pub fn build_spotlight(rows: &[SpotlightRow], today: NaiveDate, cap_per_category: usize) -> SpotlightBuild {
    let mut warnings = Vec::new();
    let mut live: Vec<(SpotlightCategory, i64, &SpotlightRow)> = Vec::new();

    for row in rows {
        if !row.get("status").eq_ignore_ascii_case("live") {
            continue;
        }
        if !in_date_window(row, today) {
            continue;
        }
        let Some(category) = SpotlightCategory::parse(row.get("category")) else {
            warnings.push(format!(
                "Skipping row with bad category: {:?} (id={})",
                row.get("category"),
                row.id()
            ));
            continue;
        };
        if !is_http(row.get("url")) || !is_http(row.get("image_url")) {
            warnings.push(format!("Skipping row with invalid url/image_url (id={})", row.id()));
            continue;
        }
        live.push((category, parse_priority(row.get("priority")), row));
    }

    live.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then_with(|| a.2.get("title").to_lowercase().cmp(&b.2.get("title").to_lowercase()))
    });

    let mut per_category: HashMap<SpotlightCategory, usize> = HashMap::new();
    let mut items = Vec::new();
    for (category, priority, row) in live {
        let count = per_category.entry(category).or_insert(0);
        if cap_per_category > 0 && *count >= cap_per_category {
            continue;
        }
        *count += 1;
        items.push(build_item(row, category, priority));
    }

    SpotlightBuild { items, warnings }
}

fn build_item(row: &SpotlightRow, category: SpotlightCategory, priority: i64) -> SpotlightItem {
    let optional = |column: &str| Some(row.get(column).to_string()).filter(|v| !v.is_empty());

    SpotlightItem {
        id: row.get("id").to_string(),
        category,
        title: row.get("title").to_string(),
        subtitle: row.get("subtitle").to_string(),
        url: append_utm(row.get("url"), row),
        image_url: row.get("image_url").to_string(),
        area: optional("area"),
        tags: split_tags(row.get("tags")),
        cta_label: optional("cta_label").unwrap_or_else(|| DEFAULT_CTA_LABEL.to_string()),
        priority,
        is_sponsored: parse_flag(row.get("is_sponsored")),
        sponsor_name: optional("sponsor_name"),
        start_date: optional("start_date"),
        end_date: optional("end_date"),
        notes: optional("notes"),
        rating: row.get("rating").parse::<f64>().ok().filter(|r| r.is_finite()),
        is_open: parse_open(row.get("is_open")),
    }
}

fn is_http(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn parse_priority(raw: &str) -> i64 {
    raw.parse().unwrap_or(DEFAULT_PRIORITY)
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "t")
}

fn parse_open(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(|c| c == ';' || c == ',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Пустая граница открыта; дата не в формате `YYYY-MM-DD` исключает строку
fn in_date_window(row: &SpotlightRow, today: NaiveDate) -> bool {
    let (Some(start), Some(end)) = (parse_bound(row.get("start_date")), parse_bound(row.get("end_date"))) else {
        return false;
    };
    start.map_or(true, |d| today >= d) && end.map_or(true, |d| today <= d)
}

/// `Some(None)` для пустой границы, `None` для неверной даты
fn parse_bound(raw: &str) -> Option<Option<NaiveDate>> {
    if raw.is_empty() {
        return Some(None);
    }
    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Some)
}

/// Добавляет непустые `utm_*` из строки к ссылке, заменяя одноимённые
/// параметры. Фрагмент `#...` сохраняется.
fn append_utm(url: &str, row: &SpotlightRow) -> String {
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };
    let (base, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let utms: Vec<(&str, &str)> = UTM_COLUMNS
        .iter()
        .map(|col| (*col, row.get(col)))
        .filter(|(_, v)| !v.is_empty())
        .collect();

    let mut params: Vec<String> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .filter(|p| {
            let key = p.split('=').next().unwrap_or("");
            !utms.iter().any(|(col, _)| *col == key)
        })
        .map(str::to_string)
        .collect();
    params.extend(
        utms.iter()
            .map(|(col, v)| format!("{}={}", col, urlencoding::encode(v))),
    );

    let mut out = base.to_string();
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(frag);
    }
    out
}
