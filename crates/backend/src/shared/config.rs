use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub site: SiteConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Абсолютный адрес сайта без завершающего `/`
    pub base_url: String,
    /// Корень статического сайта (stubs, sitemap.xml, раздача файлов)
    pub root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub dataset_path: String,
    /// Если задан, набор данных читается по HTTP вместо файла
    #[serde(default)]
    pub dataset_url: Option<String>,
    /// TOML или JSON с политикой категорий; по умолчанию встроенная таблица
    #[serde(default)]
    pub policy_path: Option<String>,
    /// Выгрузка мест для команды `import`
    #[serde(default = "default_places_csv")]
    pub places_csv: String,
    pub best_things_csv: String,
    pub best_things_out: String,
    #[serde(default = "default_cap_per_category")]
    pub cap_per_category: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

fn default_places_csv() -> String {
    "data/sources/places.csv".to_string()
}

fn default_cap_per_category() -> usize {
    contracts::domain::a002_best_thing::DEFAULT_CAP_PER_CATEGORY
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[site]
base_url = "https://bestmuscat.com"
root = "."

[data]
dataset_path = "data/tools.json"
places_csv = "data/sources/places.csv"
best_things_csv = "data/homepage/best_things.csv"
best_things_out = "assets/best-things.json"
cap_per_category = 12

[server]
host = "0.0.0.0"
port = 3000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Resolves a configured path.
///
/// Absolute paths are used as is. A relative path is taken next to the
/// executable when it exists there, otherwise relative to the current
/// directory.
pub fn resolve_path(path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved = exe_dir.join(candidate);
            if resolved.exists() {
                return resolved;
            }
        }
    }

    PathBuf::from(path)
}

impl Config {
    pub fn dataset_path(&self) -> PathBuf {
        resolve_path(&self.data.dataset_path)
    }

    pub fn site_root(&self) -> PathBuf {
        resolve_path(&self.site.root)
    }

    pub fn policy_path(&self) -> Option<PathBuf> {
        self.data.policy_path.as_deref().map(resolve_path)
    }

    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }
}
