//! Structural validation seam.
//!
//! The catalogue schema proper is maintained elsewhere; the pipeline
//! only depends on this trait so a full JSON-schema validator can be
//! plugged in without touching the checks.

use async_trait::async_trait;
use serde_json::Value;

/// Returns one message per structural problem; empty means the document
/// passes.
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    async fn validate(&self, document: &Value) -> Vec<String>;
}

/// Fallback validator covering the shape the pipeline itself relies on:
/// a Feature with the required string properties and sane zoom types.
#[derive(Debug, Default)]
pub struct BuiltinSchemaValidator;

#[async_trait]
impl SchemaValidator for BuiltinSchemaValidator {
    async fn validate(&self, document: &Value) -> Vec<String> {
        let mut problems = Vec::new();
        let Some(obj) = document.as_object() else {
            return vec!["document is not a JSON object".to_string()];
        };
        if obj.get("type").and_then(Value::as_str) != Some("Feature") {
            problems.push("document is not a GeoJSON Feature".to_string());
        }
        let Some(properties) = obj.get("properties").and_then(Value::as_object) else {
            problems.push("feature has no properties object".to_string());
            return problems;
        };
        for key in ["id", "name", "type", "url"] {
            match properties.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(_) => problems.push(format!("property '{key}' must be a non-empty string")),
                None => problems.push(format!("required property '{key}' is missing")),
            }
        }
        for key in ["min_zoom", "max_zoom"] {
            if let Some(value) = properties.get(key) {
                if !value.is_u64() {
                    problems.push(format!("property '{key}' must be a non-negative integer"));
                }
            }
        }
        if let Some(value) = properties.get("available_projections") {
            if !value.is_array() {
                problems.push("property 'available_projections' must be an array".to_string());
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_valid_feature_passes() {
        let document = json!({
            "type": "Feature",
            "properties": {
                "id": "x", "name": "X", "type": "tms",
                "url": "https://t.example.com/{zoom}/{x}/{y}.png",
                "min_zoom": 3
            },
            "geometry": null
        });
        assert!(BuiltinSchemaValidator.validate(&document).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_mistyped_properties() {
        let document = json!({
            "type": "Feature",
            "properties": { "id": "x", "name": 7, "type": "tms", "min_zoom": -1 }
        });
        let problems = BuiltinSchemaValidator.validate(&document).await;
        assert!(problems.iter().any(|p| p.contains("'url' is missing")));
        assert!(problems.iter().any(|p| p.contains("'name' must be")));
        assert!(problems.iter().any(|p| p.contains("'min_zoom'")));
    }

    #[tokio::test]
    async fn test_non_feature_flagged() {
        let problems = BuiltinSchemaValidator
            .validate(&json!({"type": "FeatureCollection", "properties": {}}))
            .await;
        assert!(problems.iter().any(|p| p.contains("not a GeoJSON Feature")));
    }
}
