// FICHIER : src-db/src/json_db/indexes/mod.rs

pub mod driver;
pub mod geo;
pub mod hash;
pub mod manager;
pub mod paths;

use serde::{Deserialize, Serialize};

pub use manager::IndexManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    /// Index exact (HashMap). Idéal pour les emails, usernames, codes uniques.
    Hash,

    /// Index géospatial 2-sphère. Requêtes de proximité et de rayon
    /// sur des points GeoJSON.
    Geo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub field_path: String,
    pub index_type: IndexType,
    pub unique: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub key: String,
    pub document_id: String,
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================
