// FICHIER : src-db/tests/schema_idempotent.rs

//! L'initialisation du schéma doit être ré-exécutable à volonté, et
//! refuser net toute divergence de configuration.

mod common;

use bibliomap::bootstrap::{self, CATALOG, DB_NAME};
use bibliomap::json_db::indexes::manager::{read_collection_meta, write_collection_meta};
use bibliomap::json_db::CollectionsManager;
use bibliomap::AppError;
use serde_json::{json, Value};

#[test]
fn reapplying_catalog_changes_nothing() {
    let (_dir, cfg) = common::provisioned();

    let manifest_before: Value =
        bibliomap::utils::fs::read_json(cfg.db_manifest_path(DB_NAME)).unwrap();

    // Données insérées entre deux exécutions
    let manager = CollectionsManager::new(&cfg, DB_NAME);
    manager
        .insert(
            "users",
            &json!({"_id": "u1", "email": "a@x.com", "username": "alice"}),
        )
        .unwrap();

    bootstrap::apply_catalog(&cfg).unwrap();
    bootstrap::apply_catalog(&cfg).unwrap();

    // Même identifiant de manifeste, données intactes, index conservés
    let manifest_after: Value =
        bibliomap::utils::fs::read_json(cfg.db_manifest_path(DB_NAME)).unwrap();
    assert_eq!(manifest_before["id"], manifest_after["id"]);
    assert_eq!(manager.count("users").unwrap(), 1);

    for spec in CATALOG {
        let meta = read_collection_meta(&cfg, DB_NAME, spec.name)
            .unwrap()
            .unwrap();
        assert_eq!(meta.indexes.len(), spec.indexes.len(), "{}", spec.name);
    }
}

#[test]
fn divergent_collection_schema_is_a_config_error() {
    let (_dir, cfg) = common::provisioned();

    // Sabotage : users pointe désormais vers un autre schéma
    let mut meta = read_collection_meta(&cfg, DB_NAME, "users")
        .unwrap()
        .unwrap();
    meta.schema = format!("db://{}/schemas/v1/books.schema.json", DB_NAME);
    write_collection_meta(&cfg, DB_NAME, "users", &meta).unwrap();

    let err = bootstrap::apply_catalog(&cfg).unwrap_err();
    assert!(matches!(err, AppError::Config(_)), "erreur : {}", err);
    assert!(err.to_string().contains("users"));
}

#[test]
fn divergent_index_definition_is_a_config_error() {
    let (_dir, cfg) = common::provisioned();

    // Sabotage : l'index email perd sa contrainte d'unicité
    let mut meta = read_collection_meta(&cfg, DB_NAME, "users")
        .unwrap()
        .unwrap();
    meta.indexes
        .iter_mut()
        .find(|d| d.name == "email")
        .unwrap()
        .unique = false;
    write_collection_meta(&cfg, DB_NAME, "users", &meta).unwrap();

    let err = bootstrap::apply_catalog(&cfg).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("email"));
}
