// FICHIER : src-db/src/bootstrap/catalog.rs

//! Catalogue déclaratif de la base bibliomap : collections, schémas
//! validateurs, index secondaires et fichiers de données associés.
//! Toute évolution du déploiement passe par ce tableau, pas par du code.

use crate::json_db::indexes::{IndexDefinition, IndexType};

pub const DB_NAME: &str = "bibliomap";

#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
    pub name: &'static str,
    pub field_path: &'static str,
    pub index_type: IndexType,
    pub unique: bool,
}

impl IndexSpec {
    pub fn to_definition(self) -> IndexDefinition {
        IndexDefinition {
            name: self.name.to_string(),
            field_path: self.field_path.to_string(),
            index_type: self.index_type,
            unique: self.unique,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub schema_rel: &'static str,
    /// Nom du fichier de données attendu : bibliomap.<collection>.json
    pub fixture_file: &'static str,
    pub indexes: &'static [IndexSpec],
}

/// Les six collections, dans l'ordre de chargement des données :
/// utilisateurs et bibliothèques d'abord, puis le catalogue, puis les
/// emprunts et les points géographiques.
pub const CATALOG: &[CollectionSpec] = &[
    CollectionSpec {
        name: "users",
        schema_rel: "users.schema.json",
        fixture_file: "bibliomap.users.json",
        indexes: &[
            IndexSpec {
                name: "email",
                field_path: "/email",
                index_type: IndexType::Hash,
                unique: true,
            },
            IndexSpec {
                name: "username",
                field_path: "/username",
                index_type: IndexType::Hash,
                unique: true,
            },
        ],
    },
    CollectionSpec {
        name: "libraries",
        schema_rel: "libraries.schema.json",
        fixture_file: "bibliomap.libraries.json",
        indexes: &[],
    },
    CollectionSpec {
        name: "books",
        schema_rel: "books.schema.json",
        fixture_file: "bibliomap.books.json",
        indexes: &[],
    },
    CollectionSpec {
        name: "copies",
        schema_rel: "copies.schema.json",
        fixture_file: "bibliomap.copies.json",
        indexes: &[],
    },
    CollectionSpec {
        name: "loans",
        schema_rel: "loans.schema.json",
        fixture_file: "bibliomap.loans.json",
        indexes: &[],
    },
    CollectionSpec {
        name: "locations",
        schema_rel: "locations.schema.json",
        fixture_file: "bibliomap.locations.json",
        indexes: &[IndexSpec {
            name: "geolocation",
            field_path: "/geolocation",
            index_type: IndexType::Geo,
            unique: false,
        }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let names: Vec<&str> = CATALOG.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["users", "libraries", "books", "copies", "loans", "locations"]
        );

        // Chaque fichier de données suit la convention bibliomap.<nom>.json
        for spec in CATALOG {
            assert_eq!(spec.fixture_file, format!("bibliomap.{}.json", spec.name));
            assert!(spec.schema_rel.ends_with(".schema.json"));
        }
    }

    #[test]
    fn test_unique_constraints_declared() {
        let users = CATALOG.iter().find(|c| c.name == "users").unwrap();
        let uniques: Vec<&str> = users
            .indexes
            .iter()
            .filter(|i| i.unique)
            .map(|i| i.name)
            .collect();
        assert_eq!(uniques, vec!["email", "username"]);

        let locations = CATALOG.iter().find(|c| c.name == "locations").unwrap();
        assert!(matches!(
            locations.indexes[0].index_type,
            IndexType::Geo
        ));
    }
}
