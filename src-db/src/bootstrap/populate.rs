// FICHIER : src-db/src/bootstrap/populate.rs

//! Chargement des jeux de données : un fichier JSON par collection,
//! nommé bibliomap.<collection>.json, contenant un tableau de documents.

use crate::json_db::storage::JsonDbConfig;
use crate::json_db::CollectionsManager;
use crate::utils::error::{AppError, Result};
use crate::utils::fs;
use crate::{user_error, user_info, user_success, user_warn};
use serde_json::Value;
use std::path::Path;

use super::catalog::{CATALOG, DB_NAME};

/// Issue du chargement d'une collection. Un échec n'interrompt jamais
/// les collections suivantes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Documents insérés avec succès.
    Loaded(usize),
    /// Fichier de données absent : la collection reste telle quelle.
    SkippedMissing,
    /// Fichier présent mais tableau vide.
    SkippedEmpty,
    /// Chargement échoué (fichier illisible, document invalide,
    /// contrainte violée). La raison est conservée.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub collection: &'static str,
    pub outcome: LoadOutcome,
}

/// Charge les données depuis `fixtures_dir` dans la base, collection
/// par collection, dans l'ordre du catalogue.
///
/// Le dossier lui-même est obligatoire : son absence est une erreur de
/// configuration fatale. En revanche chaque fichier de collection est
/// optionnel, et chaque collection est traitée indépendamment.
pub fn load_fixtures(cfg: &JsonDbConfig, fixtures_dir: &Path) -> Result<Vec<CollectionReport>> {
    if !fixtures_dir.is_dir() {
        return Err(AppError::Config(format!(
            "Dossier de données introuvable : {}",
            fixtures_dir.display()
        )));
    }

    user_info!("📦 Chargement des données depuis {}", fixtures_dir.display());

    let manager = CollectionsManager::new(cfg, DB_NAME);
    let mut reports = Vec::with_capacity(CATALOG.len());

    for spec in CATALOG {
        let outcome = load_collection(&manager, spec.name, &fixtures_dir.join(spec.fixture_file));

        match &outcome {
            LoadOutcome::Loaded(n) => {
                user_success!("[OK] '{}' : {} document(s) inséré(s)", spec.name, n);
            }
            LoadOutcome::SkippedMissing => {
                user_warn!(
                    "[WARN] '{}' : fichier {} absent, collection ignorée",
                    spec.name,
                    spec.fixture_file
                );
            }
            LoadOutcome::SkippedEmpty => {
                user_info!("[INFO] '{}' : tableau vide, rien à insérer", spec.name);
            }
            LoadOutcome::Failed(reason) => {
                user_error!("[ERROR] '{}' : {}", spec.name, reason);
            }
        }

        reports.push(CollectionReport {
            collection: spec.name,
            outcome,
        });
    }

    Ok(reports)
}

fn load_collection(manager: &CollectionsManager, name: &str, file: &Path) -> LoadOutcome {
    if !file.exists() {
        return LoadOutcome::SkippedMissing;
    }

    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => return LoadOutcome::Failed(format!("lecture impossible : {}", e)),
    };

    let parsed: Value = match crate::utils::json::parse(&raw) {
        Ok(v) => v,
        Err(e) => return LoadOutcome::Failed(e.to_string()),
    };

    let Some(documents) = parsed.as_array() else {
        return LoadOutcome::Failed("tableau JSON attendu à la racine".to_string());
    };

    if documents.is_empty() {
        return LoadOutcome::SkippedEmpty;
    }

    match manager.insert_many(name, documents) {
        Ok(n) => LoadOutcome::Loaded(n),
        Err(e) => LoadOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::provision::apply_catalog;
    use crate::utils::fs::tempdir;
    use serde_json::json;

    fn write_fixture(dir: &Path, file: &str, content: &Value) {
        std::fs::write(dir.join(file), serde_json::to_string_pretty(content).unwrap()).unwrap();
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().to_path_buf());
        apply_catalog(&cfg).unwrap();

        let ghost = dir.path().join("nulle-part");
        let err = load_fixtures(&cfg, &ghost).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("nulle-part"));
    }

    #[test]
    fn test_missing_and_empty_files_are_skipped() {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().join("data"));
        apply_catalog(&cfg).unwrap();

        let fixtures = dir.path().join("json");
        std::fs::create_dir_all(&fixtures).unwrap();
        write_fixture(
            &fixtures,
            "bibliomap.users.json",
            &json!([{"_id": "u1", "email": "a@x.com", "username": "alice"}]),
        );
        write_fixture(&fixtures, "bibliomap.books.json", &json!([]));

        let reports = load_fixtures(&cfg, &fixtures).unwrap();
        assert_eq!(reports.len(), 6);

        let by_name = |n: &str| {
            reports
                .iter()
                .find(|r| r.collection == n)
                .unwrap()
                .outcome
                .clone()
        };
        assert_eq!(by_name("users"), LoadOutcome::Loaded(1));
        assert_eq!(by_name("books"), LoadOutcome::SkippedEmpty);
        assert_eq!(by_name("libraries"), LoadOutcome::SkippedMissing);
        assert_eq!(by_name("loans"), LoadOutcome::SkippedMissing);
    }

    #[test]
    fn test_failed_collection_does_not_abort_the_rest() {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().join("data"));
        apply_catalog(&cfg).unwrap();

        let fixtures = dir.path().join("json");
        std::fs::create_dir_all(&fixtures).unwrap();

        // Deux utilisateurs avec le même email : l'index unique rejette le lot
        write_fixture(
            &fixtures,
            "bibliomap.users.json",
            &json!([
                {"_id": "u1", "email": "dup@x.com", "username": "alice"},
                {"_id": "u2", "email": "dup@x.com", "username": "bob"}
            ]),
        );
        write_fixture(
            &fixtures,
            "bibliomap.books.json",
            &json!([{"_id": "978-88-452-0001-1", "author": "Eco", "title": "Il nome della rosa"}]),
        );

        let reports = load_fixtures(&cfg, &fixtures).unwrap();

        let users = &reports.iter().find(|r| r.collection == "users").unwrap().outcome;
        let LoadOutcome::Failed(reason) = users else {
            panic!("échec attendu pour users, obtenu {:?}", users);
        };
        assert!(reason.contains("email"));

        // Le premier document du lot est conservé, et books passe quand même
        let manager = CollectionsManager::new(&cfg, DB_NAME);
        assert_eq!(manager.count("users").unwrap(), 1);

        let books = &reports.iter().find(|r| r.collection == "books").unwrap().outcome;
        assert_eq!(*books, LoadOutcome::Loaded(1));
    }

    #[test]
    fn test_malformed_json_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let cfg = JsonDbConfig::new(dir.path().join("data"));
        apply_catalog(&cfg).unwrap();

        let fixtures = dir.path().join("json");
        std::fs::create_dir_all(&fixtures).unwrap();
        std::fs::write(fixtures.join("bibliomap.users.json"), "{pas du json").unwrap();
        std::fs::write(fixtures.join("bibliomap.books.json"), "{\"pas\": \"un tableau\"}")
            .unwrap();

        let reports = load_fixtures(&cfg, &fixtures).unwrap();
        assert!(matches!(
            reports.iter().find(|r| r.collection == "users").unwrap().outcome,
            LoadOutcome::Failed(_)
        ));
        assert!(matches!(
            reports.iter().find(|r| r.collection == "books").unwrap().outcome,
            LoadOutcome::Failed(_)
        ));
    }
}
