// FICHIER : src-db/src/bootstrap/mod.rs

//! Outillage d'administration de la base : catalogue déclaratif,
//! initialisation du schéma et chargement des jeux de données.

pub mod catalog;
pub mod populate;
pub mod provision;

pub use catalog::{CATALOG, DB_NAME};
pub use populate::{load_fixtures, CollectionReport, LoadOutcome};
pub use provision::apply_catalog;
