// FICHIER : src-db/src/json_db/indexes/hash.rs

use crate::json_db::storage::JsonDbConfig;
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;

use super::{driver, paths, IndexDefinition};

pub fn update_hash_index(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    def: &IndexDefinition,
    doc_id: &str,
    old_doc: Option<&Value>,
    new_doc: Option<&Value>,
) -> Result<()> {
    let path = paths::index_path(cfg, db, collection, &def.name, def.index_type);
    // On spécifie le type concret HashMap pour le driver générique
    driver::update::<HashMap<String, Vec<String>>>(&path, def, doc_id, old_doc, new_doc)
}

/// Recherche des IDs de documents correspondant exactement à une valeur.
pub fn search_hash_index(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    def: &IndexDefinition,
    value: &Value,
) -> Result<Vec<String>> {
    let path = paths::index_path(cfg, db, collection, &def.name, def.index_type);

    // IMPORTANT : La clé stockée dans l'index est la représentation stringifiée du JSON.
    // Ex: si value est la string "admin", key sera "\"admin\"" (avec les guillemets).
    // Cela garantit la cohérence avec update() qui utilise .to_string() sur le Value.
    let key = value.to_string();

    driver::search::<HashMap<String, Vec<String>>>(&path, &key)
}
