// FICHIER : src-db/src/json_db/indexes/geo.rs

//! Index géospatial 2-sphère sur des points GeoJSON.
//! Le fichier d'index stocke une entrée [lon, lat] par document ; les
//! requêtes de proximité utilisent la distance haversine sur la sphère.

use crate::json_db::storage::JsonDbConfig;
use crate::utils::error::{AppError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::{paths, IndexDefinition};

/// Rayon moyen de la Terre (mètres).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoRecord {
    pub document_id: String,
    pub lon: f64,
    pub lat: f64,
}

/// Extrait un point GeoJSON valide d'un document, ou échoue en nommant
/// le champ fautif. Le type doit valoir "Point" et coordinates être une
/// paire [longitude, latitude] numérique.
pub fn extract_point(doc: &Value, field_path: &str) -> Result<(f64, f64)> {
    let geom = doc.pointer(field_path).ok_or_else(|| {
        AppError::Validation(format!("Champ géospatial absent : '{}'", field_path))
    })?;

    let geom_type = geom.get("type").and_then(|t| t.as_str());
    if geom_type != Some("Point") {
        return Err(AppError::Validation(format!(
            "Géométrie non indexable à '{}' : type 'Point' attendu, reçu {:?}",
            field_path, geom_type
        )));
    }

    let coords = geom
        .get("coordinates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| {
            AppError::Validation(format!("Coordonnées manquantes à '{}'", field_path))
        })?;

    if coords.len() != 2 {
        return Err(AppError::Validation(format!(
            "Coordonnées invalides à '{}' : paire [lon, lat] attendue, {} élément(s) reçu(s)",
            field_path,
            coords.len()
        )));
    }

    let lon = coords[0].as_f64();
    let lat = coords[1].as_f64();
    match (lon, lat) {
        (Some(lon), Some(lat)) => Ok((lon, lat)),
        _ => Err(AppError::Validation(format!(
            "Coordonnées non numériques à '{}'",
            field_path
        ))),
    }
}

/// Distance haversine entre deux points (mètres).
pub fn haversine_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

fn load_records(path: &Path) -> Result<Vec<GeoRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    fs::read_json(path)
        .map_err(|e| AppError::Database(format!("Lecture index géo {} : {}", path.display(), e)))
}

pub fn update_geo_index(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    def: &IndexDefinition,
    doc_id: &str,
    old_doc: Option<&Value>,
    new_doc: Option<&Value>,
) -> Result<()> {
    let path = paths::index_path(cfg, db, collection, &def.name, def.index_type);
    let mut records = load_records(&path)?;
    let mut changed = false;

    if old_doc.is_some() {
        let before = records.len();
        records.retain(|r| r.document_id != doc_id);
        changed = records.len() != before;
    }

    if let Some(doc) = new_doc {
        let (lon, lat) = extract_point(doc, &def.field_path)?;
        records.push(GeoRecord {
            document_id: doc_id.to_string(),
            lon,
            lat,
        });
        changed = true;
    }

    if changed {
        fs::write_json_atomic(&path, &records)?;
    }
    Ok(())
}

/// Requête de rayon : IDs des documents dont le point indexé se trouve
/// à moins de `radius_m` mètres du centre donné.
pub fn search_near(
    cfg: &JsonDbConfig,
    db: &str,
    collection: &str,
    def: &IndexDefinition,
    center_lon: f64,
    center_lat: f64,
    radius_m: f64,
) -> Result<Vec<String>> {
    let path = paths::index_path(cfg, db, collection, &def.name, def.index_type);
    let records = load_records(&path)?;

    let mut out: Vec<(f64, String)> = records
        .into_iter()
        .filter_map(|r| {
            let d = haversine_m(center_lon, center_lat, r.lon, r.lat);
            if d <= radius_m {
                Some((d, r.document_id))
            } else {
                None
            }
        })
        .collect();

    // Du plus proche au plus lointain, comme une requête $near
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(out.into_iter().map(|(_, id)| id).collect())
}
