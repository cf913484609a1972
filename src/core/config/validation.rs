use serde_json::{Map, Value};

use crate::core::errors::ApiError;

pub fn validate_config(config: &Value) -> Result<(), ApiError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 0, 65535)?;
        validate_string_array_field(
            server,
            "server.cors_allowed_origins",
            "cors_allowed_origins",
        )?;
    }

    if let Some(ollama) = expect_optional_object(root, "ollama")? {
        validate_required_string_field(ollama, "ollama.base_url", "base_url")?;
        validate_required_string_field(ollama, "ollama.model", "model")?;
        validate_required_string_field(ollama, "ollama.embedding_model", "embedding_model")?;
        validate_u64_field(
            ollama,
            "ollama.request_timeout_secs",
            "request_timeout_secs",
            1,
            86_400,
        )?;
    }

    if let Some(rag) = expect_optional_object(root, "rag")? {
        validate_required_string_field(rag, "rag.collection", "collection")?;
        validate_u64_field(rag, "rag.top_k", "top_k", 1, 100)?;
        validate_u64_field(
            rag,
            "rag.max_input_length",
            "max_input_length",
            1,
            10_000_000,
        )?;
        validate_enum_field(
            rag,
            "rag.empty_context",
            "empty_context",
            &["generate", "no_answer"],
        )?;
        validate_optional_string_field(rag, "rag.no_context_answer", "no_context_answer")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ApiError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(config_type_error(key, "object")),
        None => Ok(None),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ApiError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() {
        return Ok(());
    }
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}

fn validate_required_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ApiError> {
    let value = section.get(key).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid config at '{}': value is required", path))
    })?;
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': value cannot be empty",
            path
        )));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ApiError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.as_str().is_none() {
        return Err(config_type_error(path, "string"));
    }
    Ok(())
}

fn validate_enum_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    allowed: &[&str],
) -> Result<(), ApiError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if !allowed.contains(&text) {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': expected one of {}",
            path,
            allowed.join(", ")
        )));
    }
    Ok(())
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ApiError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            return Err(config_type_error(&format!("{}[{}]", path, index), "string"));
        };
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Invalid config at '{}[{}]': value cannot be empty",
                path, index
            )));
        }
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> ApiError {
    ApiError::BadRequest(format!(
        "Invalid config at '{}': expected {}",
        path, expected
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::config::defaults::default_config;

    #[test]
    fn defaults_are_valid() {
        validate_config(&default_config()).unwrap();
    }

    #[test]
    fn rejects_out_of_range_top_k() {
        let config = json!({ "rag": { "collection": "docs", "top_k": 0 } });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("rag.top_k"));
    }

    #[test]
    fn rejects_unknown_empty_context_policy() {
        let config = json!({ "rag": { "collection": "docs", "empty_context": "skip" } });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("generate, no_answer"));
    }

    #[test]
    fn rejects_blank_model() {
        let config = json!({
            "ollama": { "base_url": "http://localhost:11434", "model": " ", "embedding_model": "e" }
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("ollama.model"));
    }

    #[test]
    fn rejects_non_object_section() {
        let err = validate_config(&json!({ "server": "localhost" })).unwrap_err();
        assert!(err.to_string().contains("expected object"));
    }
}
