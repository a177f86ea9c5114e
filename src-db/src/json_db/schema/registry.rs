// FICHIER : src-db/src/json_db/schema/registry.rs

use crate::json_db::storage::JsonDbConfig;
use crate::utils::error::{AppError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Registre ultra-simple des schémas chargés depuis la DB:
/// - clé: URI logique "db://{db}/schemas/v1/<relpath>.json"
/// - valeur: document JSON du schéma
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    base_prefix: String,
    by_uri: HashMap<String, Value>,
}

impl SchemaRegistry {
    /// Charge tous les fichiers sous `{db}/schemas/v1`
    pub fn from_db(cfg: &JsonDbConfig, db: &str) -> Result<Self> {
        let root = cfg.db_schemas_root(db).join("v1");
        let base_prefix = format!("db://{}/schemas/v1/", db);
        let mut by_uri = HashMap::new();

        if !root.exists() {
            return Err(AppError::NotFound(format!(
                "Racine des schémas introuvable : {}",
                root.display()
            )));
        }

        // parcours récursif
        let mut stack = vec![root.clone()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.is_file() {
                    // on ne charge que .json
                    if path.extension().is_some_and(|e| e == "json") {
                        let rel = pathdiff::diff_paths(&path, &root).unwrap_or_else(|| path.clone());
                        let rel_str = rel.to_string_lossy().replace('\\', "/"); // windows-friendly

                        let uri = format!("{}{}", base_prefix, rel_str);
                        let data = fs::read_to_string(&path)?;
                        let json: Value = serde_json::from_str(&data).map_err(|e| {
                            AppError::Database(format!(
                                "Schéma JSON illisible {} : {}",
                                path.display(),
                                e
                            ))
                        })?;
                        by_uri.insert(uri, json);
                    }
                }
            }
        }

        Ok(Self { base_prefix, by_uri })
    }

    /// Construit une URI logique depuis un chemin relatif (ex: "users.schema.json")
    pub fn uri(&self, rel: &str) -> String {
        normalize_uri(&format!("{}{}", self.base_prefix, rel))
    }

    /// Récupère un document de schéma par URI (fragment éventuel ignoré).
    pub fn get_by_uri(&self, uri: &str) -> Option<&Value> {
        let (p, _frag) = split_fragment(uri);
        self.by_uri.get(&normalize_uri(p))
    }

    pub fn list_uris(&self) -> Vec<String> {
        self.by_uri.keys().cloned().collect()
    }

    /// Préfixe logique "db://{db}/schemas/v1/"
    pub fn base(&self) -> &str {
        &self.base_prefix
    }
}

fn split_fragment(uri: &str) -> (&str, Option<&str>) {
    if let Some(idx) = uri.find('#') {
        (&uri[..idx], Some(&uri[idx..]))
    } else {
        (uri, None)
    }
}

/// Normalise `db://a/b/../c` -> `db://a/c`
fn normalize_uri(u: &str) -> String {
    if let Some(rest) = u.strip_prefix("db://") {
        let mut parts: Vec<&str> = rest.split('/').collect();
        let mut out: Vec<&str> = Vec::with_capacity(parts.len());
        for p in parts.drain(..) {
            match p {
                "" | "." => continue,
                ".." => {
                    out.pop();
                }
                _ => out.push(p),
            }
        }
        format!("db://{}", out.join("/"))
    } else {
        // pas une URI db:// → retourner tel quel
        u.to_string()
    }
}
