// FICHIER : src-db/src/json_db/schema/validator.rs

//! Validation structurelle stricte : tout document non conforme est rejeté
//! à l'écriture, jamais simplement signalé.

use super::registry::SchemaRegistry;
use crate::utils::error::{AppError, Result};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SchemaValidator {
    root_uri: String,
    schema: Value,
}

impl SchemaValidator {
    pub fn compile_with_registry(root_uri: &str, reg: &SchemaRegistry) -> Result<Self> {
        let Some(schema) = reg.get_by_uri(root_uri).cloned() else {
            return Err(AppError::NotFound(format!(
                "Schéma introuvable dans le registre : {}",
                root_uri
            )));
        };

        Ok(Self {
            root_uri: root_uri.to_string(),
            schema,
        })
    }

    pub fn uri(&self) -> &str {
        &self.root_uri
    }

    pub fn validate(&self, instance: &Value) -> Result<()> {
        validate_node(instance, &self.schema, "")
    }
}

fn validate_node(instance: &Value, schema: &Value, path: &str) -> Result<()> {
    if let Some(t) = schema.get("type").and_then(|v| v.as_str()) {
        let conforme = match t {
            "object" => instance.is_object(),
            "string" => instance.is_string(),
            "number" => instance.is_number(),
            "integer" => instance.is_i64() || instance.is_u64(),
            "boolean" => instance.is_boolean(),
            "array" => instance.is_array(),
            "null" => instance.is_null(),
            _ => true,
        };
        if !conforme {
            return Err(type_error(t, instance, path));
        }
    }

    // Valeurs fermées (ex: geolocation.type doit valoir "Point")
    if let Some(allowed) = schema.get("enum").and_then(|v| v.as_array()) {
        if !allowed.contains(instance) {
            return Err(AppError::Validation(format!(
                "Valeur hors énumération à '{}' : {} (attendu parmi {})",
                display_path(path),
                instance,
                Value::Array(allowed.clone())
            )));
        }
    }

    if let Some(arr) = instance.as_array() {
        validate_array(arr, schema, path)?;
    }

    if let Some(obj) = instance.as_object() {
        validate_object(obj, schema, path)?;
    }

    Ok(())
}

fn validate_array(arr: &[Value], schema: &Value, path: &str) -> Result<()> {
    if let Some(min) = schema.get("minItems").and_then(|v| v.as_u64()) {
        if (arr.len() as u64) < min {
            return Err(AppError::Validation(format!(
                "Tableau trop court à '{}' : {} élément(s), minimum {}",
                display_path(path),
                arr.len(),
                min
            )));
        }
    }

    if let Some(max) = schema.get("maxItems").and_then(|v| v.as_u64()) {
        if (arr.len() as u64) > max {
            return Err(AppError::Validation(format!(
                "Tableau trop long à '{}' : {} élément(s), maximum {}",
                display_path(path),
                arr.len(),
                max
            )));
        }
    }

    if let Some(items_schema) = schema.get("items") {
        for (i, item) in arr.iter().enumerate() {
            let item_path = format!("{}/{}", path, i);
            validate_node(item, items_schema, &item_path)?;
        }
    }

    Ok(())
}

fn validate_object(
    obj: &serde_json::Map<String, Value>,
    schema: &Value,
    path: &str,
) -> Result<()> {
    // 1. Required
    if let Some(req) = schema.get("required").and_then(|v| v.as_array()) {
        for r in req {
            if let Some(key) = r.as_str() {
                if !obj.contains_key(key) {
                    return Err(AppError::Validation(format!(
                        "Propriété obligatoire manquante : '{}' (à '{}')",
                        key,
                        display_path(path)
                    )));
                }
            }
        }
    }

    // 2. Properties (récursion)
    if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
        for (key, sub_schema) in props {
            if let Some(val) = obj.get(key) {
                let sub_path = format!("{}/{}", path, key);
                validate_node(val, sub_schema, &sub_path)?;
            }
        }
    }

    // 3. Additional Properties (schéma clos, si demandé)
    if let Some(ap) = schema.get("additionalProperties") {
        if ap.as_bool() == Some(false) {
            let defined: Vec<&String> = schema
                .get("properties")
                .and_then(|v| v.as_object())
                .map(|m| m.keys().collect())
                .unwrap_or_default();

            for k in obj.keys() {
                if !defined.contains(&k) && k != "$schema" {
                    return Err(AppError::Validation(format!(
                        "Propriété non autorisée : '{}' (à '{}')",
                        k,
                        display_path(path)
                    )));
                }
            }
        }
    }

    Ok(())
}

fn type_error(expected: &str, actual: &Value, path: &str) -> AppError {
    let sample = actual.to_string();
    let sample = if sample.len() > 50 { &sample[..50] } else { &sample };
    AppError::Validation(format!(
        "Type '{}' attendu à '{}', reçu : {}",
        expected,
        display_path(path),
        sample
    ))
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

// ============================================================================
// TESTS
// ============================================================================
