use std::collections::{BTreeSet, HashSet};

use anyhow::Result;

use super::mapper::PlaceRow;

/// Колонки выгрузки мест, без которых импорт не запускается
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "slug",
    "name",
    "category",
    "tagline",
    "tags",
    "neighborhood",
    "address",
    "city",
    "country",
    "lat",
    "lng",
    "website",
    "phone",
    "maps_url",
    "hours_raw",
    "logo_url",
    "hero_url",
    "image_credit",
    "image_source_url",
    "place_id",
    "osm_type",
    "osm_id",
    "wikidata_id",
    "url",
];

/// Разбор `places.csv`: заголовок, строки, уникальность slug
pub fn read_places(csv_text: &str) -> Result<Vec<PlaceRow>> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|c| c.trim().to_string()).collect(),
        Err(e) => anyhow::bail!("Failed to read CSV headers: {}", e),
    };

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("CSV missing columns: {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record: {}", e);
                continue;
            }
        };
        let row: PlaceRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        anyhow::bail!("CSV has no rows");
    }
    ensure_unique_slugs(&rows)?;
    Ok(rows)
}

fn ensure_unique_slugs(rows: &[PlaceRow]) -> Result<()> {
    let mut seen = HashSet::new();
    let duplicates: BTreeSet<String> = rows
        .iter()
        .map(PlaceRow::slug)
        .filter(|slug| !slug.is_empty())
        .filter(|slug| !seen.insert(slug.clone()))
        .collect();

    if !duplicates.is_empty() {
        let list: Vec<String> = duplicates.into_iter().collect();
        anyhow::bail!("Duplicate slugs in CSV: {}", list.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_with(rows: &[&str]) -> String {
        let mut text = REQUIRED_COLUMNS.join(",");
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    /// Строка из 25 колонок: id, slug, name, category, затем пустые поля
    fn row(id: &str, slug: &str, name: &str) -> String {
        format!("{id},{slug},{name},Hotels{}", ",".repeat(REQUIRED_COLUMNS.len() - 4))
    }

    #[test]
    fn test_read_places() {
        let csv = format!("\u{FEFF}{}", csv_with(&[&row("1", "al-bustan", "Al Bustan")]));
        let rows = read_places(&csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), "Al Bustan");
        assert_eq!(rows[0].get("category"), "Hotels");
        assert_eq!(rows[0].slug(), "al-bustan");
    }

    #[test]
    fn test_missing_columns() {
        let err = read_places("id,slug,name\n1,a,A\n").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("CSV missing columns"));
        assert!(message.contains("wikidata_id"));
    }

    #[test]
    fn test_no_rows() {
        let err = read_places(&csv_with(&[])).unwrap_err();
        assert_eq!(err.to_string(), "CSV has no rows");
    }

    #[test]
    fn test_duplicate_slugs_rejected() {
        let csv = csv_with(&[
            &row("1", "chedi", "The Chedi"),
            &row("2", "", "Chedi"),
            &row("3", "shangri-la", "Shangri-La"),
        ]);
        let err = read_places(&csv).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate slugs in CSV: chedi");
    }
}
