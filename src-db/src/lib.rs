// FICHIER : src-db/src/lib.rs

//! Bibliomap — moteur documentaire et outillage d'administration :
//! initialisation du schéma de la base et chargement des jeux de données.

pub mod bootstrap;
pub mod json_db;
pub mod utils;

pub use utils::error::{AppError, Result};
