// FICHIER : src-db/src/utils/mod.rs

// =========================================================================
//  BIBLIOMAP UTILS - Foundation Layer
// =========================================================================

pub mod env;
pub mod error;
pub mod fs;
pub mod json;
pub mod logger;
pub mod macros;

// --- Exports directs (requis par json_db et bootstrap) ---
pub use error::{AppError, Result};
