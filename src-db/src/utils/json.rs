// FICHIER : src-db/src/utils/json.rs

use crate::utils::error::{anyhow, AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

// --- RE-EXPORTS (Single Source of Truth pour le JSON) ---
pub use serde_json::{json, Map, Value};

/// Parse une chaîne JSON en un type T.
/// Capture un extrait du contenu en cas d'échec pour aider au débogage.
pub fn parse<T: DeserializeOwned>(s: &str) -> Result<T> {
    match serde_json::from_str(s) {
        Ok(val) => Ok(val),
        Err(e) => {
            let snippet: String = s.chars().take(100).collect();
            Err(AppError::System(anyhow!(
                "JSON invalide : {} (extrait : `{}`)",
                e,
                snippet
            )))
        }
    }
}

/// Convertit un type T en chaîne JSON formatée (pretty).
pub fn stringify_pretty<T: Serialize>(v: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(v)?)
}
