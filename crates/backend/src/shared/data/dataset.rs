use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use contracts::domain::a001_business::Dataset;
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::shared::config::Config;

static DATASET: OnceCell<Dataset> = OnceCell::new();

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Cannot read dataset file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Dataset request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid dataset: {0}")]
    Parse(String),
}

/// Загрузка набора данных по конфигурации: URL, если задан, иначе файл
pub async fn load_dataset(config: &Config) -> Result<Dataset, DatasetError> {
    let dataset = match config.data.dataset_url.as_deref() {
        Some(url) if !url.trim().is_empty() => fetch_dataset(url).await?,
        _ => read_dataset(&config.dataset_path())?,
    };
    tracing::info!("Dataset loaded: {} records", dataset.len());
    Ok(dataset)
}

pub fn read_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    tracing::info!("Reading dataset from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Dataset::from_json(&contents).map_err(|e| DatasetError::Parse(format!("{e:#}")))
}

/// GET с параметром `v=<unix millis>`, чтобы не получить устаревшую копию из кэша
pub async fn fetch_dataset(url: &str) -> Result<Dataset, DatasetError> {
    let request_url = cache_busted_url(url, unix_millis());
    tracing::info!("Fetching dataset from {}", request_url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let response = client
        .get(&request_url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("Dataset request failed: {}", status);
        return Err(DatasetError::Status(status));
    }

    let body = response.text().await?;
    Dataset::from_json(&body).map_err(|e| DatasetError::Parse(format!("{e:#}")))
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn cache_busted_url(url: &str, millis: u128) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}v={millis}")
}

/// Загружает набор данных в глобальное хранилище (один раз за процесс)
pub async fn initialize_dataset(config: &Config) -> anyhow::Result<()> {
    let dataset = load_dataset(config).await?;
    if DATASET.set(dataset).is_err() {
        tracing::warn!("Dataset already initialized, keeping the first copy");
    }
    Ok(())
}

/// `None`, пока [`initialize_dataset`] не выполнен
pub fn get_dataset() -> Option<&'static Dataset> {
    DATASET.get()
}

#[cfg(test)]
pub fn install_for_tests(dataset: Dataset) -> &'static Dataset {
    DATASET.get_or_init(|| dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(
            cache_busted_url("https://cdn.example.com/tools.json", 42),
            "https://cdn.example.com/tools.json?v=42"
        );
        assert_eq!(
            cache_busted_url("https://cdn.example.com/tools.json?lang=en", 42),
            "https://cdn.example.com/tools.json?lang=en&v=42"
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_dataset(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_read_invalid_file() {
        let path = std::env::temp_dir().join(format!("bestmuscat-invalid-dataset-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        let err = read_dataset(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
        let _ = std::fs::remove_file(&path);
    }
}
