// FICHIER : src-db/src/utils/fs.rs

//! Couche d'accès disque : helpers synchrones et écriture atomique.
//! L'outillage d'administration est strictement séquentiel, tout est bloquant.

use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;

// --- RE-EXPORTS (Isolation de la couche OS) ---
pub use std::path::{Component, Path, PathBuf};
pub use tempfile::{tempdir, TempDir};

/// Crée récursivement un répertoire.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(path.as_ref())?;
    Ok(())
}

pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path.as_ref())?)
}

/// Lit et désérialise un fichier JSON.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

/// Écriture atomique sécurisée (write -> sync -> rename)
pub fn write_atomic(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content)?;
        // On force l'écriture physique sur le plateau du disque
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Sérialise en JSON pretty et écrit atomiquement.
pub fn write_json_atomic<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let content = super::json::stringify_pretty(value)?;
    write_atomic(path, content.as_bytes())
}

pub fn remove_dir_all(path: impl AsRef<Path>) -> Result<()> {
    fs::remove_dir_all(path.as_ref())?;
    Ok(())
}

pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    fs::rename(from.as_ref(), to.as_ref())?;
    Ok(())
}
