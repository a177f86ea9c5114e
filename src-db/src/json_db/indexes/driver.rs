// FICHIER : src-db/src/json_db/indexes/driver.rs

use super::{IndexDefinition, IndexRecord};
use crate::utils::error::{AppError, Result};
use crate::utils::fs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Trait définissant le comportement d'une structure d'index en mémoire
pub trait IndexMap: Default + Serialize + DeserializeOwned {
    fn insert_record(&mut self, key: String, doc_id: String);
    fn remove_record(&mut self, key: &str, doc_id: &str);
    fn get_doc_ids(&self, key: &str) -> Option<&Vec<String>>;
    fn from_records(records: Vec<IndexRecord>) -> Self;
    fn to_records(&self) -> Vec<IndexRecord>;
}

// --- Implémentation pour Hash Index (HashMap) ---
impl IndexMap for HashMap<String, Vec<String>> {
    fn insert_record(&mut self, key: String, doc_id: String) {
        self.entry(key).or_default().push(doc_id);
    }

    fn remove_record(&mut self, key: &str, doc_id: &str) {
        if let Some(ids) = self.get_mut(key) {
            ids.retain(|id| id != doc_id);
            if ids.is_empty() {
                self.remove(key);
            }
        }
    }

    fn get_doc_ids(&self, key: &str) -> Option<&Vec<String>> {
        self.get(key)
    }

    fn from_records(records: Vec<IndexRecord>) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for r in records {
            map.entry(r.key).or_default().push(r.document_id);
        }
        map
    }

    fn to_records(&self) -> Vec<IndexRecord> {
        let mut records = Vec::new();
        for (k, ids) in self {
            for id in ids {
                records.push(IndexRecord {
                    key: k.clone(),
                    document_id: id.clone(),
                });
            }
        }
        records
    }
}

// --- Logique I/O Générique ---

pub fn load<T: IndexMap>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let records: Vec<IndexRecord> = fs::read_json(path).map_err(|e| {
        AppError::Database(format!("Lecture index {} : {}", path.display(), e))
    })?;
    Ok(T::from_records(records))
}

pub fn save<T: IndexMap>(path: &Path, index: &T) -> Result<()> {
    fs::write_json_atomic(path, &index.to_records())
}

pub fn search<T: IndexMap>(path: &Path, key: &str) -> Result<Vec<String>> {
    let index: T = load(path)?;
    Ok(index.get_doc_ids(key).cloned().unwrap_or_default())
}

pub fn update<T: IndexMap>(
    path: &Path,
    def: &IndexDefinition,
    doc_id: &str,
    old_doc: Option<&Value>,
    new_doc: Option<&Value>,
) -> Result<()> {
    let mut index: T = load(path)?;
    let mut changed = false;

    // Suppression
    if let Some(doc) = old_doc {
        if let Some(old_key) = doc.pointer(&def.field_path) {
            index.remove_record(&old_key.to_string(), doc_id);
            changed = true;
        }
    }

    // Ajout
    if let Some(doc) = new_doc {
        if let Some(new_key) = doc.pointer(&def.field_path) {
            let key_str = new_key.to_string();

            // Unicité : la contrainte violée est nommée dans l'erreur
            if def.unique {
                if let Some(ids) = index.get_doc_ids(&key_str) {
                    if !ids.is_empty() && (ids.len() > 1 || ids[0] != doc_id) {
                        return Err(AppError::Database(format!(
                            "Violation de contrainte d'unicité '{}' : {}",
                            def.name, key_str
                        )));
                    }
                }
            }

            index.insert_record(key_str, doc_id.to_string());
            changed = true;
        }
    }

    if changed {
        save(path, &index)?;
    }
    Ok(())
}
