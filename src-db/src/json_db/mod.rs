// FICHIER : src-db/src/json_db/mod.rs

//! Moteur documentaire embarqué : stockage JSON sur fichiers, schémas
//! validateurs, index secondaires (hash unique et géospatial).

pub mod collections;
pub mod indexes;
pub mod schema;
pub mod storage;

pub use collections::CollectionsManager;
pub use storage::JsonDbConfig;
