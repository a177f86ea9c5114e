// FICHIER : src-db/src/json_db/storage/mod.rs

pub mod file_storage;

use crate::utils::env;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Variable d'environnement pointant vers la racine des données.
pub const ENV_DATA_ROOT: &str = "PATH_BIBLIOMAP_DATA";

// --- CONFIGURATION ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDbConfig {
    pub data_root: PathBuf,
}

impl JsonDbConfig {
    pub fn new(data_root: PathBuf) -> Self {
        Self { data_root }
    }

    /// Résout la racine des données depuis `PATH_BIBLIOMAP_DATA`.
    pub fn from_env() -> Result<Self> {
        let root = env::get(ENV_DATA_ROOT)?;
        Ok(Self::new(PathBuf::from(root)))
    }

    pub fn db_root(&self, db: &str) -> PathBuf {
        self.data_root.join(db)
    }

    /// Manifeste de la base : {db_root}/_system.json
    pub fn db_manifest_path(&self, db: &str) -> PathBuf {
        self.db_root(db).join("_system.json")
    }

    /// Racine des schémas déployés : {db_root}/schemas
    pub fn db_schemas_root(&self, db: &str) -> PathBuf {
        self.db_root(db).join("schemas")
    }

    pub fn db_collections_root(&self, db: &str) -> PathBuf {
        self.db_root(db).join("collections")
    }

    pub fn db_collection_path(&self, db: &str, collection: &str) -> PathBuf {
        self.db_collections_root(db).join(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_path_layout() {
        let cfg = JsonDbConfig::new(PathBuf::from("/data"));

        assert_eq!(cfg.db_root("bibliomap"), PathBuf::from("/data/bibliomap"));
        assert_eq!(
            cfg.db_collection_path("bibliomap", "users"),
            PathBuf::from("/data/bibliomap/collections/users")
        );
        assert!(cfg
            .db_manifest_path("bibliomap")
            .ends_with("bibliomap/_system.json"));
        assert!(cfg.db_schemas_root("bibliomap").ends_with("schemas"));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var(ENV_DATA_ROOT, "/tmp/bibliomap_data");
        let cfg = JsonDbConfig::from_env().unwrap();
        assert_eq!(cfg.data_root, PathBuf::from("/tmp/bibliomap_data"));
        std::env::remove_var(ENV_DATA_ROOT);

        assert!(JsonDbConfig::from_env().is_err());
    }
}
