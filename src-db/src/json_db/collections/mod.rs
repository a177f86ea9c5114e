// FICHIER : src-db/src/json_db/collections/mod.rs

pub mod collection;
pub mod manager;

pub use manager::CollectionsManager;
