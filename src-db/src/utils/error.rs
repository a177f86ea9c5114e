// FICHIER : src-db/src/utils/error.rs

use std::io;

// --- RE-EXPORTS ANYHOW (Pour la flexibilité du CLI) ---
pub use anyhow::{anyhow, Context};
// On renomme le Result de anyhow pour ne pas qu'il écrase le nôtre
pub use anyhow::Result as AnyResult;

/// Type de résultat standard pour la bibliothèque Bibliomap
pub type Result<T> = std::result::Result<T, AppError>;

/// Enumération centrale des erreurs.
/// Elle dérive `thiserror::Error` pour faciliter la conversion automatique.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] io::Error),

    #[error("Erreur Base de Données : {0}")]
    Database(String),

    #[error("Erreur de validation : {0}")]
    Validation(String),

    #[error("Introuvable : {0}")]
    NotFound(String),

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erreur Système : {0}")]
    System(#[from] anyhow::Error),
}

// Helpers pour convertir des erreurs string en AppError
// Permet de faire : return Err("Mon erreur".into());
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::System(anyhow::anyhow!(s))
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::System(anyhow::anyhow!(s.to_string()))
    }
}
