//! Region-of-interest geometry reader.
//!
//! The region arrives as a GeoJSON or KML file holding one polygon (or
//! multi-polygon). Neither format embeds a CRS; both are WGS84 by
//! definition, which is exactly the reference the pipeline assumes.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{Geometry, GeometryCollection, MultiPolygon};
use geojson::GeoJson;
use kml::KmlReader;

use crate::{IngestError, ReaderOptions};

/// Reads the region-of-interest polygon from `base_dir`.
///
/// Dispatches on extension: `.json`/`.geojson` are always readable, `.kml`
/// only when [`ReaderOptions::enable_kml`] is set. The returned geometry is
/// unvalidated; callers promote it to a `Region`, which rejects degenerate
/// shapes.
///
/// # Errors
///
/// Returns an error for unreadable or unparseable files, an unsupported
/// extension, a `.kml` file without the capability flag, or a file with no
/// polygon geometry.
pub fn read_region(
    base_dir: &Path,
    file: &str,
    options: &ReaderOptions,
) -> Result<MultiPolygon<f64>, IngestError> {
    let path = base_dir.join(file);

    let collection = match extension_of(file).as_deref() {
        Some("json" | "geojson") => {
            let raw = std::fs::read_to_string(&path)?;
            let geojson: GeoJson = raw.parse()?;
            geojson::quick_collection(&geojson)?
        }
        Some("kml") => {
            if !options.enable_kml {
                return Err(IngestError::KmlDisabled {
                    file: file.to_string(),
                });
            }
            let mut reader = KmlReader::<BufReader<File>, f64>::from_path(&path)?;
            kml::quick_collection(reader.read()?)?
        }
        _ => {
            return Err(IngestError::UnsupportedFormat {
                file: file.to_string(),
            });
        }
    };

    let polygon = collect_polygons(collection).ok_or_else(|| IngestError::NoPolygon {
        file: file.to_string(),
    })?;

    log::info!(
        "Read region of interest from {} ({} polygon(s))",
        path.display(),
        polygon.0.len()
    );
    Ok(polygon)
}

fn extension_of(file: &str) -> Option<String> {
    Path::new(file)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Gathers every polygon in a geometry collection into one `MultiPolygon`.
/// Returns `None` if the collection holds no polygons at all.
fn collect_polygons(collection: GeometryCollection<f64>) -> Option<MultiPolygon<f64>> {
    let mut polygons = Vec::new();
    gather(collection, &mut polygons);
    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon(polygons))
    }
}

fn gather(collection: GeometryCollection<f64>, out: &mut Vec<geo::Polygon<f64>>) {
    for geometry in collection {
        match geometry {
            Geometry::Polygon(p) => out.push(p),
            Geometry::MultiPolygon(mp) => out.extend(mp),
            Geometry::GeometryCollection(gc) => gather(gc, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION_JSON: &str = r#"{
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
        }
    }"#;

    #[test]
    fn collects_polygon_from_geojson_feature() {
        let geojson: GeoJson = REGION_JSON.parse().unwrap();
        let collection = geojson::quick_collection(&geojson).unwrap();
        let polygon = collect_polygons(collection).unwrap();
        assert_eq!(polygon.0.len(), 1);
    }

    #[test]
    fn rejects_collection_without_polygons() {
        let geojson: GeoJson = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#.parse().unwrap();
        let collection = geojson::quick_collection(&geojson).unwrap();
        assert!(collect_polygons(collection).is_none());
    }

    #[test]
    fn kml_requires_the_capability_flag() {
        let err = read_region(
            Path::new("/nonexistent"),
            "region.kml",
            &ReaderOptions { enable_kml: false },
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::KmlDisabled { .. }));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = read_region(
            Path::new("/nonexistent"),
            "region.shp",
            &ReaderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }
}
