// FICHIER : src-db/src/json_db/collections/collection.rs

//! Primitives collections : gestion des dossiers et fichiers JSON d'une collection.
//! Pas de validation ici — uniquement persistance et I/O.

use crate::json_db::storage::JsonDbConfig;
use crate::utils::error::{AppError, Result};
use crate::utils::fs::{self, PathBuf};
use serde_json::Value;

/// Racine des collections : {db_root}/collections/{collection}
pub fn collection_root(cfg: &JsonDbConfig, db: &str, collection: &str) -> PathBuf {
    cfg.db_collection_path(db, collection)
}

/// Fichier d'un document : {collection_root}/{id}.json
pub fn doc_path(cfg: &JsonDbConfig, db: &str, collection: &str, id: &str) -> PathBuf {
    collection_root(cfg, db, collection).join(format!("{id}.json"))
}

/// Un `_id` devient un nom de fichier : seul un segment simple est
/// admis. Pas de séparateur de chemin, pas de `.`/`..`, et pas de
/// préfixe `_` (réservé aux fichiers internes `_meta`/`_indexes`,
/// invisibles au listage).
pub fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.starts_with('_')
        && !id.contains('/')
        && !id.contains('\\')
        && !id.contains('\0')
}

/// Fichier de métadonnées : {collection_root}/_meta.json
pub fn meta_path(cfg: &JsonDbConfig, db: &str, collection: &str) -> PathBuf {
    collection_root(cfg, db, collection).join("_meta.json")
}

/// S'assure que la collection existe (création récursive).
pub fn create_collection_if_missing(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
) -> Result<()> {
    fs::ensure_dir(collection_root(cfg, db, collection))
}

/// Lit un document par son ID.
pub fn read_document(cfg: &JsonDbConfig, db: &str, collection: &str, id: &str) -> Result<Value> {
    let path = doc_path(cfg, db, collection, id);
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "Document '{}' absent de '{}'",
            id, collection
        )));
    }
    fs::read_json(&path)
}

pub fn document_exists(cfg: &JsonDbConfig, db: &str, collection: &str, id: &str) -> bool {
    doc_path(cfg, db, collection, id).exists()
}

pub fn write_document(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    id: &str,
    document: &Value,
) -> Result<()> {
    create_collection_if_missing(cfg, db, collection)?;
    fs::write_json_atomic(doc_path(cfg, db, collection, id), document)
}

pub fn drop_collection(cfg: &JsonDbConfig, db: &str, collection: &str) -> Result<()> {
    let root = collection_root(cfg, db, collection);
    if root.exists() {
        fs::remove_dir_all(&root)?;
    }
    Ok(())
}

// --- FONCTIONS UTILITAIRES ---

pub fn list_document_ids(cfg: &JsonDbConfig, db: &str, collection: &str) -> Result<Vec<String>> {
    let root = collection_root(cfg, db, collection);
    let mut out = Vec::new();
    if !root.exists() {
        return Ok(out);
    }
    for entry in std::fs::read_dir(&root)? {
        let p = entry?.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = p.file_stem().and_then(|s| s.to_str()) {
                // Les fichiers _meta/_indexes ne sont pas des documents
                if !stem.starts_with('_') {
                    out.push(stem.to_string());
                }
            }
        }
    }
    out.sort();
    Ok(out)
}

pub fn list_documents(cfg: &JsonDbConfig, db: &str, collection: &str) -> Result<Vec<Value>> {
    let ids = list_document_ids(cfg, db, collection)?;
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        docs.push(read_document(cfg, db, collection, &id)?);
    }
    Ok(docs)
}

pub fn count_documents(cfg: &JsonDbConfig, db: &str, collection: &str) -> Result<usize> {
    Ok(list_document_ids(cfg, db, collection)?.len())
}
