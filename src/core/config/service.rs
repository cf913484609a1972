use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::defaults::default_config;
use super::paths::AppPaths;
use super::types::AppConfig;
use super::validation::validate_config;
use crate::core::errors::ApiError;

/// Environment variables layered over the YAML file, with the config path they set.
const ENV_OVERRIDES: [(&str, &[&str]); 5] = [
    ("HOST", &["server", "host"]),
    ("PORT", &["server", "port"]),
    ("OLLAMA_HOST", &["ollama", "base_url"]),
    ("RAG_MODEL", &["ollama", "model"]),
    ("RAG_EMBEDDING_MODEL", &["ollama", "embedding_model"]),
];

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("RAG_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let data_config = self.paths.data_dir.join("config.yml");
        if data_config.exists() {
            return data_config;
        }

        self.paths.project_root.join("config.yml")
    }

    /// Defaults, then `config.yml`, then environment overrides, validated.
    pub fn load_config(&self) -> Result<AppConfig, ApiError> {
        let file_config = load_yaml_file(&self.config_path());
        let mut merged = deep_merge(&default_config(), &file_config);
        apply_env_overrides(&mut merged, |key| env::var(key).ok());

        validate_config(&merged)?;
        AppConfig::from_value(merged)
    }
}

fn load_yaml_file(path: &Path) -> Value {
    if !path.exists() {
        return Value::Object(Map::new());
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<Value>(&contents) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::warn!("Ignoring {}: top level is not a mapping", path.display());
                Value::Object(Map::new())
            }
            Err(err) => {
                tracing::warn!("Ignoring {}: {}", path.display(), err);
                Value::Object(Map::new())
            }
        },
        Err(err) => {
            tracing::warn!("Failed to read {}: {}", path.display(), err);
            Value::Object(Map::new())
        }
    }
}

fn apply_env_overrides<F>(config: &mut Value, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (key, path) in ENV_OVERRIDES {
        let Some(raw) = lookup(key) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let value = match (path, raw.parse::<u64>()) {
            (["server", "port"], Ok(port)) => Value::from(port),
            _ => Value::String(raw.to_string()),
        };
        ensure_object_path(config, path, value);
    }
}

fn ensure_object_path(config: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = config;
    for (index, key) in path.iter().enumerate() {
        if index == path.len() - 1 {
            if let Some(map) = current.as_object_mut() {
                map.insert(key.to_string(), value);
            }
            return;
        }

        if !current.get(*key).map(|v| v.is_object()).unwrap_or(false) {
            let Some(map) = current.as_object_mut() else {
                return;
            };
            map.insert((*key).to_string(), Value::Object(Map::new()));
        }

        let Some(next) = current.get_mut(*key) else {
            return;
        };
        current = next;
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::config::types::EmptyContextPolicy;
    use serde_json::json;

    #[test]
    fn deep_merge_merges_objects_and_overrides_scalars() {
        let base = json!({
            "a": 1,
            "b": { "c": 2, "d": 3 },
            "arr": [1, 2]
        });
        let override_value = json!({
            "b": { "c": 99 },
            "arr": [3],
            "e": "x"
        });

        let merged = deep_merge(&base, &override_value);

        assert_eq!(
            merged,
            json!({
                "a": 1,
                "b": { "c": 99, "d": 3 },
                "arr": [3],
                "e": "x"
            })
        );
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = default_config();
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9001"),
            ("OLLAMA_HOST", "http://gpu-box:11434"),
            ("RAG_MODEL", " "),
        ]);

        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config["server"]["port"], json!(9001));
        assert_eq!(config["ollama"]["base_url"], json!("http://gpu-box:11434"));
        assert_eq!(config["ollama"]["model"], json!("tinyllama"));
    }

    #[test]
    fn numeric_env_values_stay_strings_outside_port() {
        let mut config = default_config();
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "8080"),
            ("HOST", "0"),
            ("RAG_MODEL", "7"),
        ]);

        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config["server"]["port"], json!(8080));
        assert_eq!(config["server"]["host"], json!("0"));
        assert_eq!(config["ollama"]["model"], json!("7"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn load_config_reads_yaml_over_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::with_data_dir(tmp.path().to_path_buf(), tmp.path().join("db"));
        fs::write(
            paths.data_dir.join("config.yml"),
            "rag:\n  collection: notes\n  empty_context: no_answer\nollama:\n  model: llama3\n",
        )
        .unwrap();

        let service = ConfigService::new(Arc::new(paths));
        let config = service.load_config().unwrap();

        assert_eq!(config.rag.collection, "notes");
        assert_eq!(config.rag.empty_context, EmptyContextPolicy::NoAnswer);
        assert_eq!(config.rag.top_k, 1);
        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.ollama.embedding_model, "all-minilm");
    }

    #[test]
    fn malformed_yaml_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(&path, "rag: [unclosed").unwrap();

        assert_eq!(load_yaml_file(&path), json!({}));
    }
}
