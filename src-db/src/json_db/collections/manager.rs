// FICHIER : src-db/src/json_db/collections/manager.rs

//! Façade de haut niveau sur une base : cycle de vie, validation à
//! l'écriture, index secondaires et manifeste `_system.json`.

use crate::json_db::indexes::manager::{
    read_collection_meta, write_collection_meta, CollectionMeta, IndexManager,
};
use crate::json_db::indexes::{geo, hash, IndexDefinition, IndexType};
use crate::json_db::schema::registry::SchemaRegistry;
use crate::json_db::schema::validator::SchemaValidator;
use crate::json_db::storage::{file_storage, JsonDbConfig};
use crate::utils::error::{AppError, Result};
use crate::utils::fs;
use serde_json::{json, Value};

pub struct CollectionsManager<'a> {
    pub cfg: &'a JsonDbConfig,
    pub db: String,
}

impl<'a> CollectionsManager<'a> {
    pub fn new(cfg: &'a JsonDbConfig, db: &str) -> Self {
        Self {
            cfg,
            db: db.to_string(),
        }
    }

    // === CYCLE DE VIE DE LA BASE ===

    /// Déploie la base : arborescence, schémas embarqués, manifeste.
    /// Ré-exécutable : une base déjà initialisée n'est pas modifiée.
    pub fn init_db(&self) -> Result<()> {
        file_storage::create_db(self.cfg, &self.db)?;
        self.ensure_manifest()?;
        Ok(())
    }

    /// Écrit `_system.json` s'il n'existe pas, et le valide contre son
    /// propre schéma déployé.
    fn ensure_manifest(&self) -> Result<()> {
        let reg = self.registry()?;
        let manifest_path = self.cfg.db_manifest_path(&self.db);
        let manifest_uri = reg.uri("db/index.schema.json");

        if !manifest_path.exists() {
            let now = chrono::Utc::now().to_rfc3339();
            let manifest = json!({
                "$schema": manifest_uri,
                "id": uuid::Uuid::new_v4().to_string(),
                "database": self.db,
                "version": "v1",
                "collections": [],
                "createdAt": now,
                "updatedAt": now,
            });
            fs::write_json_atomic(&manifest_path, &manifest)?;
        }

        let manifest: Value = fs::read_json(&manifest_path)?;
        let validator = SchemaValidator::compile_with_registry(&manifest_uri, &reg)?;
        validator.validate(&manifest).map_err(|e| {
            AppError::Config(format!("Manifeste _system.json invalide : {}", e))
        })?;

        Ok(())
    }

    /// Enregistre une collection dans le manifeste (tri stable, sans doublon).
    fn register_in_manifest(&self, collection: &str) -> Result<()> {
        let manifest_path = self.cfg.db_manifest_path(&self.db);
        let mut manifest: Value = fs::read_json(&manifest_path)?;

        let list = manifest
            .get_mut("collections")
            .and_then(|c| c.as_array_mut())
            .ok_or_else(|| {
                AppError::Config("Manifeste _system.json corrompu : 'collections' absent".into())
            })?;

        let entry = Value::String(collection.to_string());
        if !list.contains(&entry) {
            list.push(entry);
            list.sort_by(|a, b| a.as_str().unwrap_or("").cmp(b.as_str().unwrap_or("")));
            manifest["updatedAt"] = json!(chrono::Utc::now().to_rfc3339());
            fs::write_json_atomic(&manifest_path, &manifest)?;
        }
        Ok(())
    }

    pub fn registry(&self) -> Result<SchemaRegistry> {
        SchemaRegistry::from_db(self.cfg, &self.db)
    }

    fn index_manager(&self) -> IndexManager<'a> {
        IndexManager::new(self.cfg, &self.db)
    }

    // === COLLECTIONS ===

    /// Crée une collection attachée à un schéma validateur.
    ///
    /// Ré-exécution avec le même schéma : no-op. Un schéma différent sur
    /// une collection existante est une erreur de configuration remontée
    /// telle quelle, jamais une migration silencieuse.
    pub fn create_collection(&self, name: &str, schema_rel: &str) -> Result<()> {
        let reg = self.registry()?;
        let schema_uri = reg.uri(schema_rel);

        // Le schéma doit exister avant d'y attacher une collection
        if reg.get_by_uri(&schema_uri).is_none() {
            return Err(AppError::Config(format!(
                "Schéma validateur introuvable : {}",
                schema_uri
            )));
        }

        if let Some(meta) = read_collection_meta(self.cfg, &self.db, name)? {
            if meta.schema != schema_uri {
                return Err(AppError::Config(format!(
                    "Collection '{}' déjà attachée au schéma '{}', demandé : '{}'",
                    name, meta.schema, schema_uri
                )));
            }
            tracing::debug!("Collection '{}' déjà déployée, ignorée", name);
            return Ok(());
        }

        super::collection::create_collection_if_missing(self.cfg, &self.db, name)?;
        write_collection_meta(
            self.cfg,
            &self.db,
            name,
            &CollectionMeta {
                schema: schema_uri,
                indexes: vec![],
            },
        )?;
        self.register_in_manifest(name)?;
        Ok(())
    }

    pub fn create_index(&self, collection: &str, def: IndexDefinition) -> Result<()> {
        self.index_manager().create_index(collection, def)
    }

    pub fn collection_exists(&self, name: &str) -> Result<bool> {
        Ok(read_collection_meta(self.cfg, &self.db, name)?.is_some())
    }

    // === LECTURE ===

    pub fn get_document(&self, collection: &str, id: &str) -> Result<Value> {
        super::collection::read_document(self.cfg, &self.db, collection, id)
    }

    pub fn list_all(&self, collection: &str) -> Result<Vec<Value>> {
        super::collection::list_documents(self.cfg, &self.db, collection)
    }

    pub fn count(&self, collection: &str) -> Result<usize> {
        super::collection::count_documents(self.cfg, &self.db, collection)
    }

    /// Recherche exacte via un index hash existant.
    pub fn find_by_index(
        &self,
        collection: &str,
        index_name: &str,
        value: &Value,
    ) -> Result<Vec<String>> {
        let def = self.require_index(collection, index_name, IndexType::Hash)?;
        hash::search_hash_index(self.cfg, &self.db, collection, &def, value)
    }

    /// Requête de proximité via un index géospatial existant.
    pub fn find_near(
        &self,
        collection: &str,
        index_name: &str,
        center_lon: f64,
        center_lat: f64,
        radius_m: f64,
    ) -> Result<Vec<String>> {
        let def = self.require_index(collection, index_name, IndexType::Geo)?;
        geo::search_near(
            self.cfg, &self.db, collection, &def, center_lon, center_lat, radius_m,
        )
    }

    fn require_index(
        &self,
        collection: &str,
        index_name: &str,
        expected: IndexType,
    ) -> Result<IndexDefinition> {
        self.index_manager()
            .definitions(collection)?
            .into_iter()
            .find(|d| d.name == index_name && d.index_type == expected)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Index '{}' absent de la collection '{}'",
                    index_name, collection
                ))
            })
    }

    // === ÉCRITURE ===

    /// Insertion validée : schéma structurel strict, puis index (dont
    /// contraintes d'unicité), puis écriture atomique du document.
    pub fn insert(&self, collection: &str, document: &Value) -> Result<String> {
        let meta = read_collection_meta(self.cfg, &self.db, collection)?.ok_or_else(|| {
            AppError::Config(format!("Collection '{}' non déployée", collection))
        })?;

        let id = document
            .get("_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AppError::Validation("Champ '_id' manquant ou non textuel".to_string())
            })?;

        if !super::collection::is_valid_document_id(id) {
            return Err(AppError::Validation(format!(
                "Identifiant '_id' invalide : '{}' (segment de fichier simple attendu)",
                id
            )));
        }

        let reg = self.registry()?;
        let validator = SchemaValidator::compile_with_registry(&meta.schema, &reg)?;
        validator.validate(document)?;

        if super::collection::document_exists(self.cfg, &self.db, collection, id) {
            return Err(AppError::Database(format!(
                "Clé dupliquée '_id' : '{}' existe déjà dans '{}'",
                id, collection
            )));
        }

        // Les index d'abord : une violation d'unicité annule l'insertion
        self.index_manager().index_document(collection, id, document)?;
        super::collection::write_document(self.cfg, &self.db, collection, id, document)?;

        Ok(id.to_string())
    }

    /// Insertion ordonnée d'un lot : s'arrête à la première erreur en
    /// conservant les documents déjà insérés, comme un insertMany ordonné.
    /// Retourne le nombre de documents insérés.
    pub fn insert_many(&self, collection: &str, documents: &[Value]) -> Result<usize> {
        let mut inserted = 0usize;
        for doc in documents {
            match self.insert(collection, doc) {
                Ok(_) => inserted += 1,
                Err(e) => {
                    return Err(AppError::Database(format!(
                        "Insertion interrompue dans '{}' après {} document(s) : {}",
                        collection, inserted, e
                    )));
                }
            }
        }
        Ok(inserted)
    }
}
