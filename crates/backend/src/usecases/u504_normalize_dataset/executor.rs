use std::path::PathBuf;

use anyhow::{Context, Result};
use contracts::domain::a001_business::normalizer::normalize_about;
use contracts::domain::a001_business::WeeklyHours;
use serde_json::{Map, Value};

/// Executor для UseCase приведения `about` и `hours` к каноническому виду
/// прямо в файле набора данных.
pub struct NormalizeExecutor {
    dataset_path: PathBuf,
}

impl NormalizeExecutor {
    pub fn new(dataset_path: PathBuf) -> Self {
        Self { dataset_path }
    }

    /// Переписывает файл, если что-то изменилось; возвращает число изменённых полей
    pub fn run(&self) -> Result<usize> {
        let path = &self.dataset_path;
        if !path.exists() {
            tracing::warn!("No dataset at {}; nothing to normalize", path.display());
            return Ok(0);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let mut items: Vec<Value> =
            serde_json::from_str(&contents).context("dataset must be a JSON array")?;

        let changed = normalize_items(&mut items);
        if changed > 0 {
            let json = serde_json::to_string_pretty(&items)?;
            std::fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!("Normalized fields on {} item(s)", changed);
        } else {
            tracing::info!("No fields needed normalization");
        }
        Ok(changed)
    }
}

/// Число изменённых полей по всем записям
pub fn normalize_items(items: &mut [Value]) -> usize {
    items
        .iter_mut()
        .filter_map(Value::as_object_mut)
        .map(normalize_item)
        .sum()
}

fn normalize_item(item: &mut Map<String, Value>) -> usize {
    let mut changed = 0;

    match item.get("about") {
        Some(before) => {
            let after = about_field(before);
            if *before != after {
                item.insert("about".to_string(), after);
                changed += 1;
            }
        }
        None => {
            if let Some(about) = synthesized_about(item) {
                item.insert("about".to_string(), about);
                changed += 1;
            }
        }
    }

    if let Some(before) = item.get("hours") {
        let after = hours_field(before);
        if *before != after {
            item.insert("hours".to_string(), after);
            changed += 1;
        }
    }

    changed
}

/// `null` и объект остаются как есть; строка и `[short, long]` переводятся
/// в объект, пустой результат становится `null`
fn about_field(value: &Value) -> Value {
    if value.is_null() || value.is_object() {
        return value.clone();
    }
    let about = normalize_about(Some(value));
    if about["short"].is_null() && about["long"].is_null() {
        Value::Null
    } else {
        about
    }
}

fn synthesized_about(item: &Map<String, Value>) -> Option<Value> {
    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
    };
    let short = text("tagline");
    let long = text("description");
    if short.is_none() && long.is_none() {
        return None;
    }
    let mut about = Map::new();
    about.insert("short".to_string(), short.unwrap_or(Value::Null));
    about.insert("long".to_string(), long.unwrap_or(Value::Null));
    Some(Value::Object(about))
}

fn hours_field(value: &Value) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    WeeklyHours::from_value(value)
        .map(|hours| hours.to_value())
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_about_legacy_forms() {
        let mut items = vec![
            json!({"about": "Sea view rooms"}),
            json!({"about": ["Short", "Long"]}),
            json!({"about": ""}),
            json!({"about": {"short": "ok", "long": null}}),
        ];
        assert_eq!(normalize_items(&mut items), 3);
        assert_eq!(items[0]["about"], json!({"short": "Sea view rooms", "long": null}));
        assert_eq!(items[1]["about"], json!({"short": "Short", "long": "Long"}));
        assert_eq!(items[2]["about"], Value::Null);
        assert_eq!(items[3]["about"], json!({"short": "ok", "long": null}));
    }

    #[test]
    fn test_about_synthesized_from_tagline() {
        let mut items = vec![
            json!({"tagline": "Beachfront resort", "description": ""}),
            json!({"name": "No text"}),
        ];
        assert_eq!(normalize_items(&mut items), 1);
        assert_eq!(items[0]["about"], json!({"short": "Beachfront resort", "long": null}));
        assert!(items[1].get("about").is_none());
    }

    #[test]
    fn test_hours_forms() {
        let mut items = vec![
            json!({"about": null, "hours": {"Mon": ["09:00", "17:00"], "Tue": [["09:00", "12:00"], ["14:00", "18:00"]]}}),
            json!({"about": null, "hours": [{"days": "Fri, Sat", "open": "10:00", "close": "22:00"}]}),
            json!({"about": null, "hours": "9 to 5"}),
            json!({"about": null, "hours": null}),
        ];
        assert_eq!(normalize_items(&mut items), 3);
        assert_eq!(
            items[0]["hours"],
            json!({"tz": "Asia/Muscat", "weekly": {
                "mon": [{"open": "09:00", "close": "17:00"}],
                "tue": [{"open": "09:00", "close": "12:00"}, {"open": "14:00", "close": "18:00"}]
            }})
        );
        assert_eq!(items[1]["hours"]["weekly"]["sat"][0]["close"], json!("22:00"));
        assert_eq!(items[2]["hours"], Value::Null);
        assert_eq!(items[3]["hours"], Value::Null);
    }

    #[test]
    fn test_already_canonical_is_untouched() {
        let mut items = vec![json!({
            "about": {"short": "x", "long": null},
            "hours": {"tz": "Asia/Muscat", "weekly": {"mon": [{"open": "09:00", "close": "17:00"}]}}
        })];
        assert_eq!(normalize_items(&mut items), 0);
    }

    #[test]
    fn test_run_rewrites_file() {
        let path = std::env::temp_dir().join(format!("bestmuscat-normalize-test-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"name": "A", "about": "Legacy"}]"#).unwrap();
        let changed = NormalizeExecutor::new(path.clone()).run().unwrap();
        assert_eq!(changed, 1);
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["about"]["short"], json!("Legacy"));
        assert_eq!(written[0]["name"], json!("A"));
        let _ = std::fs::remove_file(&path);
    }
}
