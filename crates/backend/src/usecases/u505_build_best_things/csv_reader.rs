use anyhow::Result;
use contracts::domain::a002_best_thing::{SpotlightRow, REQUIRED_COLUMNS};

/// Разбор CSV подборки: проверка заголовка, строки как `колонка -> значение`
pub fn read_rows(csv_text: &str) -> Result<Vec<SpotlightRow>> {
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
        anyhow::bail!("CSV missing required columns: {}", missing.join(", "));
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
        let row: SpotlightRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.trim().to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        REQUIRED_COLUMNS.join(",")
    }

    #[test]
    fn test_read_rows() {
        let csv = format!(
            "\u{FEFF}{},rating\n1,Tours & Experiences,Dhow cruise,Sunset,https://t.example,https://i.example/a.jpg,Mutrah,\"sea, sunset\",Book,1,live,,,no,,,,,,4.5\n",
            header()
        );
        let rows = read_rows(&csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title"), "Dhow cruise");
        assert_eq!(rows[0].get("tags"), "sea, sunset");
        assert_eq!(rows[0].get("rating"), "4.5");
        assert_eq!(rows[0].get("id"), "1");
    }

    #[test]
    fn test_missing_columns() {
        let err = read_rows("id,category,title\n1,Events,Gala\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("CSV missing required columns"));
        assert!(message.contains("subtitle"));
    }
}
