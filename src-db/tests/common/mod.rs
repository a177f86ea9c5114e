// FICHIER : src-db/tests/common/mod.rs

//! Aides partagées par les suites d'intégration.

use bibliomap::bootstrap;
use bibliomap::json_db::JsonDbConfig;
use tempfile::TempDir;

/// Racine de données jetable.
pub fn temp_cfg() -> (TempDir, JsonDbConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = JsonDbConfig::new(dir.path().join("data"));
    (dir, cfg)
}

/// Racine jetable avec la base bibliomap déjà initialisée.
pub fn provisioned() -> (TempDir, JsonDbConfig) {
    let (dir, cfg) = temp_cfg();
    bootstrap::apply_catalog(&cfg).expect("initialisation de la base");
    (dir, cfg)
}
