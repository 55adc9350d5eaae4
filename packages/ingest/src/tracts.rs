//! Census tract layer reader.
//!
//! Tracts arrive as a GeoJSON `FeatureCollection` whose features carry a
//! `CTUID` identifier and a `PopDen` population density (people per square
//! kilometer). Feature order is preserved; it drives report order.

use std::path::Path;

use air_risk_geography_models::CensusTract;
use air_risk_spatial::{TractGeometry, TractLayer};
use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;

use crate::IngestError;

/// Reads the census tract layer from `base_dir`.
///
/// Every feature must carry a string `CTUID` and a numeric `PopDen`
/// property. Features with non-polygon geometry are skipped with a
/// warning.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a GeoJSON
/// `FeatureCollection`, or a feature is missing a required property.
pub fn read_tracts(base_dir: &Path, file: &str) -> Result<TractLayer, IngestError> {
    let path = base_dir.join(file);
    let raw = std::fs::read_to_string(&path)?;
    let layer = parse_tracts(&raw, file)?;
    log::info!(
        "Read {} census tracts from {}",
        layer.tracts.len(),
        path.display()
    );
    Ok(layer)
}

fn parse_tracts(raw: &str, file: &str) -> Result<TractLayer, IngestError> {
    let geojson: GeoJson = raw.parse()?;
    let GeoJson::FeatureCollection(fc) = geojson else {
        return Err(IngestError::NotFeatureCollection {
            file: file.to_string(),
        });
    };

    let mut tracts = Vec::with_capacity(fc.features.len());

    for (index, feature) in fc.features.into_iter().enumerate() {
        let ctuid = match feature.property("CTUID").and_then(|v| v.as_str()) {
            Some(s) => s.to_string(),
            None => {
                return Err(IngestError::MissingProperty {
                    index,
                    property: "CTUID",
                });
            }
        };
        let Some(pop_den) = feature.property("PopDen").and_then(as_density) else {
            return Err(IngestError::MissingProperty {
                index,
                property: "PopDen",
            });
        };

        let Some(geometry) = feature.geometry else {
            return Err(IngestError::MissingProperty {
                index,
                property: "geometry",
            });
        };

        let geometry: Geometry<f64> = geometry.try_into()?;
        let polygon = match geometry {
            Geometry::Polygon(p) => MultiPolygon(vec![p]),
            Geometry::MultiPolygon(mp) => mp,
            _ => {
                log::warn!("Skipping tract {ctuid}: geometry is not a polygon");
                continue;
            }
        };

        tracts.push(TractGeometry {
            tract: CensusTract { ctuid, pop_den },
            polygon,
        });
    }

    Ok(TractLayer { tracts })
}

/// Densities are usually JSON numbers, but some exports quote them.
fn as_density(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tract_feature(ctuid: &str, pop_den: &str, x0: f64) -> String {
        format!(
            r#"{{
                "type": "Feature",
                "properties": {{"CTUID": "{ctuid}", "PopDen": {pop_den}}},
                "geometry": {{
                    "type": "Polygon",
                    "coordinates": [[[{x0}, 0.0], [{x1}, 0.0], [{x1}, 1.0], [{x0}, 1.0], [{x0}, 0.0]]]
                }}
            }}"#,
            x1 = x0 + 1.0,
        )
    }

    fn layer_of(features: &[String]) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(",")
        )
    }

    #[test]
    fn parses_tracts_in_feature_order() {
        let raw = layer_of(&[
            tract_feature("5050001.00", "1234.5", 0.0),
            tract_feature("5050002.00", "\"98.7\"", 2.0),
        ]);

        let layer = parse_tracts(&raw, "tracts.geojson").unwrap();
        assert_eq!(layer.tracts.len(), 2);
        assert_eq!(layer.tracts[0].tract.ctuid, "5050001.00");
        assert!((layer.tracts[0].tract.pop_den - 1234.5).abs() < f64::EPSILON);
        // Quoted density still parses.
        assert!((layer.tracts[1].tract.pop_den - 98.7).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_pop_den_is_an_error() {
        let raw = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"CTUID": "5050001.00"},
            "geometry": {"type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
        }]}"#;

        let err = parse_tracts(raw, "tracts.geojson").unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingProperty {
                property: "PopDen",
                ..
            }
        ));
    }

    #[test]
    fn non_feature_collection_is_rejected() {
        let raw = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(matches!(
            parse_tracts(raw, "tracts.geojson"),
            Err(IngestError::NotFeatureCollection { .. })
        ));
    }

    #[test]
    fn non_polygon_features_are_skipped() {
        let raw = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"CTUID": "5050001.00", "PopDen": 10.0},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
        }]}"#;

        let layer = parse_tracts(raw, "tracts.geojson").unwrap();
        assert!(layer.tracts.is_empty());
    }
}
