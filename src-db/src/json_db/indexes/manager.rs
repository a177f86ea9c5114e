// FICHIER : src-db/src/json_db/indexes/manager.rs

use crate::json_db::collections::collection;
use crate::json_db::storage::JsonDbConfig;
use crate::utils::error::{AppError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{driver, geo, hash, paths, IndexDefinition, IndexType};

/// Métadonnées persistées d'une collection ({collection}/_meta.json) :
/// URI du schéma validateur + définitions d'index secondaires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub schema: String,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

pub fn read_collection_meta(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
) -> Result<Option<CollectionMeta>> {
    let path = collection::meta_path(cfg, db, collection);
    if !path.exists() {
        return Ok(None);
    }
    let meta: CollectionMeta = fs::read_json(&path).map_err(|e| {
        AppError::Database(format!("Métadonnées illisibles {} : {}", path.display(), e))
    })?;
    Ok(Some(meta))
}

pub fn write_collection_meta(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    meta: &CollectionMeta,
) -> Result<()> {
    fs::write_json_atomic(collection::meta_path(cfg, db, collection), meta)
}

#[derive(Debug)]
pub struct IndexManager<'a> {
    pub cfg: &'a JsonDbConfig,
    pub db: String,
}

impl<'a> IndexManager<'a> {
    pub fn new(cfg: &'a JsonDbConfig, db: &str) -> Self {
        Self {
            cfg,
            db: db.to_string(),
        }
    }

    /// Définitions d'index déclarées pour une collection (vide si aucune).
    pub fn definitions(&self, collection: &str) -> Result<Vec<IndexDefinition>> {
        Ok(read_collection_meta(self.cfg, &self.db, collection)?
            .map(|m| m.indexes)
            .unwrap_or_default())
    }

    /// Crée un index secondaire et le remplit avec les documents existants.
    ///
    /// Ré-exécution : une définition identique déjà enregistrée est un no-op ;
    /// une définition différente sous le même nom est une erreur de
    /// configuration. Les doublons pré-existants sur un index unique sont
    /// fatals pour cet index (aucune dé-duplication automatique).
    pub fn create_index(&self, collection: &str, def: IndexDefinition) -> Result<()> {
        let mut meta = read_collection_meta(self.cfg, &self.db, collection)?.ok_or_else(|| {
            AppError::Config(format!(
                "Collection '{}' inconnue : créer la collection avant ses index",
                collection
            ))
        })?;

        if let Some(existing) = meta.indexes.iter().find(|d| d.name == def.name) {
            if *existing == def {
                tracing::debug!("Index '{}.{}' déjà présent, ignoré", collection, def.name);
                return Ok(());
            }
            return Err(AppError::Config(format!(
                "Index '{}' déjà déclaré sur '{}' avec une définition incompatible",
                def.name, collection
            )));
        }

        self.build_index(collection, &def)?;

        meta.indexes.push(def);
        write_collection_meta(self.cfg, &self.db, collection, &meta)
    }

    /// Construction initiale : parcourt les documents déjà présents.
    fn build_index(&self, collection: &str, def: &IndexDefinition) -> Result<()> {
        fs::ensure_dir(paths::indexes_root(self.cfg, &self.db, collection))?;

        let ids = collection::list_document_ids(self.cfg, &self.db, collection)?;
        let path = paths::index_path(self.cfg, &self.db, collection, &def.name, def.index_type);

        match def.index_type {
            IndexType::Hash => {
                let mut map: HashMap<String, Vec<String>> = HashMap::new();
                for id in ids {
                    let doc = collection::read_document(self.cfg, &self.db, collection, &id)?;
                    if let Some(key) = doc.pointer(&def.field_path) {
                        let key_str = key.to_string();
                        if def.unique {
                            if let Some(prev) = map.get(&key_str).and_then(|v| v.first()) {
                                return Err(AppError::Database(format!(
                                    "Violation de contrainte d'unicité '{}' : {} (documents '{}' et '{}')",
                                    def.name, key_str, prev, id
                                )));
                            }
                        }
                        map.entry(key_str).or_default().push(id);
                    }
                }
                driver::save(&path, &map)?;
            }
            IndexType::Geo => {
                let mut records = Vec::with_capacity(ids.len());
                for id in ids {
                    let doc = collection::read_document(self.cfg, &self.db, collection, &id)?;
                    let (lon, lat) = geo::extract_point(&doc, &def.field_path).map_err(|e| {
                        AppError::Database(format!(
                            "Index géo '{}' : document '{}' non conforme : {}",
                            def.name, id, e
                        ))
                    })?;
                    records.push(geo::GeoRecord {
                        document_id: id,
                        lon,
                        lat,
                    });
                }
                fs::write_json_atomic(&path, &records)?;
            }
        }

        Ok(())
    }

    /// Répercute un nouveau document sur tous les index de la collection.
    /// Appelé AVANT l'écriture du document : une violation d'unicité
    /// rejette l'insertion sans laisser de fichier orphelin.
    ///
    /// Si un index tardif rejette le document, les entrées déjà écrites
    /// dans les index précédents sont retirées : un rejet ne doit jamais
    /// laisser d'entrée fantôme qui bloquerait une valeur pourtant libre.
    pub fn index_document(&self, collection: &str, doc_id: &str, doc: &Value) -> Result<()> {
        let defs = self.definitions(collection)?;
        let mut applied: Vec<&IndexDefinition> = Vec::new();

        for def in &defs {
            if let Err(e) = self.apply_one(collection, def, doc_id, None, Some(doc)) {
                for done in applied {
                    if let Err(undo) = self.apply_one(collection, done, doc_id, Some(doc), None) {
                        tracing::error!(
                            "Retrait impossible de '{}' dans l'index '{}.{}' : {}",
                            doc_id, collection, done.name, undo
                        );
                    }
                }
                return Err(e);
            }
            applied.push(def);
        }
        Ok(())
    }

    fn apply_one(
        &self,
        collection: &str,
        def: &IndexDefinition,
        doc_id: &str,
        old_doc: Option<&Value>,
        new_doc: Option<&Value>,
    ) -> Result<()> {
        match def.index_type {
            IndexType::Hash => hash::update_hash_index(
                self.cfg, &self.db, collection, def, doc_id, old_doc, new_doc,
            ),
            IndexType::Geo => geo::update_geo_index(
                self.cfg, &self.db, collection, def, doc_id, old_doc, new_doc,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fs::tempdir;
    use serde_json::json;

    fn setup() -> (tempfile::TempDir, JsonDbConfig) {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().to_path_buf());
        (dir, cfg)
    }

    fn email_def() -> IndexDefinition {
        IndexDefinition {
            name: "email".into(),
            field_path: "/email".into(),
            index_type: IndexType::Hash,
            unique: true,
        }
    }

    fn init_users_meta(cfg: &JsonDbConfig) {
        collection::create_collection_if_missing(cfg, "bibliomap", "users").unwrap();
        write_collection_meta(
            cfg,
            "bibliomap",
            "users",
            &CollectionMeta {
                schema: "db://bibliomap/schemas/v1/users.schema.json".into(),
                indexes: vec![],
            },
        )
        .unwrap();
    }

    #[test]
    fn test_create_index_backfills_existing_documents() {
        let (_dir, cfg) = setup();
        init_users_meta(&cfg);

        let doc = json!({"_id": "u1", "email": "a@x.com", "username": "alice"});
        collection::write_document(&cfg, "bibliomap", "users", "u1", &doc).unwrap();

        let mgr = IndexManager::new(&cfg, "bibliomap");
        mgr.create_index("users", email_def()).unwrap();

        let found =
            hash::search_hash_index(&cfg, "bibliomap", "users", &email_def(), &json!("a@x.com"))
                .unwrap();
        assert_eq!(found, vec!["u1"]);
    }

    #[test]
    fn test_create_index_is_idempotent_but_rejects_redefinition() {
        let (_dir, cfg) = setup();
        init_users_meta(&cfg);

        let mgr = IndexManager::new(&cfg, "bibliomap");
        mgr.create_index("users", email_def()).unwrap();
        // Ré-exécution à l'identique : no-op
        mgr.create_index("users", email_def()).unwrap();
        assert_eq!(mgr.definitions("users").unwrap().len(), 1);

        // Même nom, définition différente : erreur de configuration
        let mut redefined = email_def();
        redefined.unique = false;
        let err = mgr.create_index("users", redefined).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_unique_build_fails_on_preexisting_duplicates() {
        let (_dir, cfg) = setup();
        init_users_meta(&cfg);

        let d1 = json!({"_id": "u1", "email": "dup@x.com"});
        let d2 = json!({"_id": "u2", "email": "dup@x.com"});
        collection::write_document(&cfg, "bibliomap", "users", "u1", &d1).unwrap();
        collection::write_document(&cfg, "bibliomap", "users", "u2", &d2).unwrap();

        let mgr = IndexManager::new(&cfg, "bibliomap");
        let err = mgr.create_index("users", email_def()).unwrap_err();

        // La contrainte fautive est nommée, l'index n'est pas enregistré
        assert!(err.to_string().contains("email"));
        assert!(mgr.definitions("users").unwrap().is_empty());
    }

    #[test]
    fn test_partial_rejection_leaves_no_phantom_entry() {
        let (_dir, cfg) = setup();
        init_users_meta(&cfg);

        let mgr = IndexManager::new(&cfg, "bibliomap");
        mgr.create_index("users", email_def()).unwrap();
        mgr.create_index(
            "users",
            IndexDefinition {
                name: "username".into(),
                field_path: "/username".into(),
                index_type: IndexType::Hash,
                unique: true,
            },
        )
        .unwrap();

        let u1 = json!({"_id": "u1", "email": "a@x.com", "username": "alice"});
        mgr.index_document("users", "u1", &u1).unwrap();

        // Email libre mais username dupliqué : rejet sur le second index
        let u2 = json!({"_id": "u2", "email": "b@x.com", "username": "alice"});
        let err = mgr.index_document("users", "u2", &u2).unwrap_err();
        assert!(err.to_string().contains("username"));

        // L'entrée email écrite avant le rejet a été retirée :
        // la valeur reste disponible pour un autre document
        let u3 = json!({"_id": "u3", "email": "b@x.com", "username": "bob"});
        mgr.index_document("users", "u3", &u3).unwrap();

        let found =
            hash::search_hash_index(&cfg, "bibliomap", "users", &email_def(), &json!("b@x.com"))
                .unwrap();
        assert_eq!(found, vec!["u3"]);
    }

    #[test]
    fn test_index_document_enforces_uniqueness() {
        let (_dir, cfg) = setup();
        init_users_meta(&cfg);

        let mgr = IndexManager::new(&cfg, "bibliomap");
        mgr.create_index("users", email_def()).unwrap();

        let d1 = json!({"_id": "u1", "email": "a@x.com"});
        mgr.index_document("users", "u1", &d1).unwrap();

        let d2 = json!({"_id": "u2", "email": "a@x.com"});
        let err = mgr.index_document("users", "u2", &d2).unwrap_err();
        assert!(err.to_string().contains("email"));
    }
}
