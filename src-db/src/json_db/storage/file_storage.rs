// FICHIER : src-db/src/json_db/storage/file_storage.rs

use crate::json_db::storage::JsonDbConfig;
use crate::utils::error::{AppError, Result};
use crate::utils::fs;
use include_dir::{include_dir, Dir};

// --- EMBARQUEMENT DES SCHÉMAS ---
static DEFAULT_SCHEMAS: Dir = include_dir!("$CARGO_MANIFEST_DIR/../schemas/v1");

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropMode {
    Soft,
    Hard,
}

/// Vérifie qu'une base existe (sans la modifier).
pub fn open_db(config: &JsonDbConfig, db: &str) -> Result<()> {
    let db_path = config.db_root(db);
    if !db_path.exists() {
        return Err(AppError::NotFound(format!(
            "Base de données inexistante : {}",
            db_path.display()
        )));
    }
    Ok(())
}

/// Crée l'arborescence physique ET déploie les schémas embarqués.
/// Ré-exécutable sans effet sur une base déjà déployée.
pub fn create_db(config: &JsonDbConfig, db: &str) -> Result<()> {
    let db_root = config.db_root(db);

    if !db_root.exists() {
        fs::ensure_dir(&db_root)?;
    }

    let schemas_dest = config.db_schemas_root(db).join("v1");

    if !schemas_dest.exists() {
        tracing::debug!("📦 Déploiement des schémas standards dans {:?}", schemas_dest);

        fs::ensure_dir(&schemas_dest)?;
        DEFAULT_SCHEMAS
            .extract(&schemas_dest)
            .map_err(AppError::Io)?;
    }

    Ok(())
}

pub fn drop_db(config: &JsonDbConfig, db: &str, mode: DropMode) -> Result<()> {
    let db_path = config.db_root(db);
    if !db_path.exists() {
        return Ok(());
    }

    match mode {
        DropMode::Hard => {
            fs::remove_dir_all(&db_path)?;
        }
        DropMode::Soft => {
            let timestamp = chrono::Utc::now().timestamp();
            let parent = db_path
                .parent()
                .ok_or_else(|| AppError::Config("Racine de données invalide".to_string()))?;
            let new_name = format!("{}.deleted-{}", db, timestamp);
            fs::rename(&db_path, parent.join(new_name))?;
        }
    }
    Ok(())
}
