// FICHIER : src-db/src/json_db/schema/mod.rs

pub mod registry;
pub mod validator;

pub use registry::SchemaRegistry;
pub use validator::SchemaValidator;
