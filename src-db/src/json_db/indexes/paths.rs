// FICHIER : src-db/src/json_db/indexes/paths.rs

use crate::json_db::collections::collection::collection_root;
use crate::json_db::indexes::IndexType;
use crate::json_db::storage::JsonDbConfig;
use std::path::PathBuf;

/// Racine des index : {collection_root}/_indexes
pub fn indexes_root(cfg: &JsonDbConfig, db: &str, collection: &str) -> PathBuf {
    collection_root(cfg, db, collection).join("_indexes")
}

/// Chemin complet d'un index donné
pub fn index_path(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    index_name: &str,
    index_type: IndexType,
) -> PathBuf {
    let extension = match index_type {
        IndexType::Hash => "hash.idx",
        IndexType::Geo => "geo.idx",
    };
    indexes_root(cfg, db, collection).join(format!("{index_name}.{extension}"))
}
