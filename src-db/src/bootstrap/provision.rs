// FICHIER : src-db/src/bootstrap/provision.rs

//! Initialisation du schéma : déploie les six collections avec leurs
//! validateurs et leurs index, ré-exécutable sans effet de bord.

use crate::json_db::storage::JsonDbConfig;
use crate::json_db::CollectionsManager;
use crate::utils::error::Result;
use crate::{user_info, user_success};

use super::catalog::{CATALOG, DB_NAME};

/// Déploie la base complète décrite par le catalogue.
///
/// Chaque collection est créée avec son schéma validateur strict, puis
/// ses index. Une ré-exécution sur une base déjà conforme ne change
/// rien ; une collection existante attachée à un autre schéma, ou un
/// index redéfini différemment, fait remonter l'erreur de configuration
/// telle quelle.
pub fn apply_catalog(cfg: &JsonDbConfig) -> Result<()> {
    user_info!("🚀 Initialisation de la base '{}'", DB_NAME);

    let manager = CollectionsManager::new(cfg, DB_NAME);
    manager.init_db()?;

    for spec in CATALOG {
        manager.create_collection(spec.name, spec.schema_rel)?;

        for index in spec.indexes {
            manager.create_index(spec.name, index.to_definition())?;
        }

        user_success!(
            "Collection '{}' prête ({} index)",
            spec.name,
            spec.indexes.len()
        );
    }

    user_success!("Base '{}' initialisée", DB_NAME);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_db::indexes::manager::read_collection_meta;
    use crate::utils::fs::tempdir;
    use serde_json::json;

    #[test]
    fn test_apply_catalog_deploys_everything() {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().to_path_buf());

        apply_catalog(&cfg).unwrap();

        let manager = CollectionsManager::new(&cfg, DB_NAME);
        for spec in CATALOG {
            assert!(manager.collection_exists(spec.name).unwrap());
            let meta = read_collection_meta(&cfg, DB_NAME, spec.name)
                .unwrap()
                .unwrap();
            assert_eq!(meta.indexes.len(), spec.indexes.len());
        }

        // Le manifeste recense les six collections
        let manifest: serde_json::Value =
            crate::utils::fs::read_json(cfg.db_manifest_path(DB_NAME)).unwrap();
        assert_eq!(manifest["collections"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_apply_catalog_is_idempotent() {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().to_path_buf());

        apply_catalog(&cfg).unwrap();

        // Des données déjà présentes survivent à une ré-exécution
        let manager = CollectionsManager::new(&cfg, DB_NAME);
        manager
            .insert(
                "users",
                &json!({"_id": "u1", "email": "a@x.com", "username": "alice"}),
            )
            .unwrap();

        apply_catalog(&cfg).unwrap();
        assert_eq!(manager.count("users").unwrap(), 1);
    }
}
