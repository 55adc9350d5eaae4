#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Downstream aggregators over the filtered flight set.
//!
//! Two independent reports, both consuming the same filtered set:
//!
//! - **Air risk** (`AirRisk.txt`): flight count plus the region's area in
//!   square kilometers.
//! - **Population exposure** (`Density.txt`): population density of every
//!   census tract overflown at least once.
//!
//! Report files are plain text in a fixed wire format and are overwritten
//! unconditionally on each run.

use std::path::Path;

use air_risk_geography_models::{DensityMode, TractDensity};
use air_risk_spatial::{FlightPoint, FlightPointIndex, Region, TractLayer};
use geo::GeodesicArea;
use thiserror::Error;

/// Errors raised while writing report files.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The air-risk report: flight count and overflown area.
#[derive(Debug, Clone, PartialEq)]
pub struct AirRiskReport {
    /// Number of filtered flights inside the region.
    pub flight_count: usize,
    /// Region area in square kilometers.
    pub area_km2: f64,
}

/// Computes the air-risk report for a region and a filtered flight set.
///
/// The area is the geodesic area of the region on the WGS84 ellipsoid,
/// truncated to whole square meters and converted to square kilometers.
#[must_use]
pub fn air_risk(region: &Region, flights: &[FlightPoint]) -> AirRiskReport {
    let area_m2 = region.polygon().geodesic_area_unsigned().trunc();
    let area_km2 = area_m2 / 1.0e6;

    log::info!(
        "Air risk: {} flights over {area_km2} sq. km",
        flights.len()
    );

    AirRiskReport {
        flight_count: flights.len(),
        area_km2,
    }
}

impl AirRiskReport {
    /// Renders the fixed two-line wire format.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{} flights.\nArea: {} sq. km.",
            self.flight_count,
            fmt_float(self.area_km2)
        )
    }
}

/// Writes `AirRisk.txt` into `base_dir`, replacing any previous report.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_air_risk(base_dir: &Path, report: &AirRiskReport) -> Result<(), ReportError> {
    let path = base_dir.join("AirRisk.txt");
    std::fs::write(&path, report.render())?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Computes the population-exposure rows: one per tract overflown at least
/// once.
///
/// The tract layer is clipped to the region first, then joined against the
/// flight points by containment. `DensityMode::PerFlight` repeats a tract
/// once per matched flight (the historical behavior); `PerTract` lists it
/// once. Rows follow tract input order, matches within a tract follow
/// flight input order, so output is deterministic.
#[must_use]
pub fn population_exposure(
    layer: &TractLayer,
    region: &Region,
    flights: &[FlightPoint],
    mode: DensityMode,
) -> Vec<TractDensity> {
    let clipped = layer.clip_to(region);
    let index = FlightPointIndex::new(flights);

    let mut rows = Vec::new();
    for tract in &clipped.tracts {
        let matches = index.contained_by(&tract.polygon);
        if matches.is_empty() {
            continue;
        }

        let repeats = match mode {
            DensityMode::PerFlight => matches.len(),
            DensityMode::PerTract => 1,
        };
        for _ in 0..repeats {
            rows.push(TractDensity {
                ctuid: tract.tract.ctuid.clone(),
                pop_den: tract.tract.pop_den,
            });
        }
    }

    log::info!(
        "Population exposure: {} rows from {} clipped tracts",
        rows.len(),
        clipped.tracts.len()
    );
    rows
}

/// Renders the density report wire format: two header lines then one
/// `CTUID: PopDen` line per row.
#[must_use]
pub fn render_density(rows: &[TractDensity]) -> String {
    let mut out = String::from(
        "All census tracts that contain at least one flight\nCensus Tract CTUID: Population Density\n",
    );
    for row in rows {
        out.push_str(&row.ctuid);
        out.push_str(": ");
        out.push_str(&fmt_float(row.pop_den));
        out.push('\n');
    }
    out
}

/// Writes `Density.txt` into `base_dir`, replacing any previous report.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_density(base_dir: &Path, rows: &[TractDensity]) -> Result<(), ReportError> {
    let path = base_dir.join("Density.txt");
    std::fs::write(&path, render_density(rows))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Formats a float with at least one decimal digit (`10.0`, never `10`),
/// matching the report wire format.
fn fmt_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use air_risk_flight_models::FlightRecord;
    use air_risk_geography_models::CensusTract;
    use air_risk_spatial::TractGeometry;
    use chrono::NaiveDate;
    use geo::{Coord, LineString, MultiPolygon, Polygon};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                Coord { x: x0, y: y0 },
                Coord { x: x1, y: y0 },
                Coord { x: x1, y: y1 },
                Coord { x: x0, y: y1 },
                Coord { x: x0, y: y0 },
            ]),
            vec![],
        )])
    }

    fn flight(id: &str, lng: f64, lat: f64) -> FlightPoint {
        FlightPoint::from_record(FlightRecord {
            national_flight_id: id.to_string(),
            event_time: NaiveDate::from_ymd_opt(2021, 3, 17)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            altitude_ft: 1000,
            longitude_deg: lng,
            latitude_deg: lat,
        })
    }

    fn tract(ctuid: &str, pop_den: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> TractGeometry {
        TractGeometry {
            tract: CensusTract {
                ctuid: ctuid.to_string(),
                pop_den,
            },
            polygon: square(x0, y0, x1, y1),
        }
    }

    #[test]
    fn renders_air_risk_wire_format() {
        let report = AirRiskReport {
            flight_count: 5,
            area_km2: 10.0,
        };
        assert_eq!(report.render(), "5 flights.\nArea: 10.0 sq. km.");
    }

    #[test]
    fn renders_zero_flight_report() {
        let report = AirRiskReport {
            flight_count: 0,
            area_km2: 2.5,
        };
        assert_eq!(report.render(), "0 flights.\nArea: 2.5 sq. km.");
    }

    #[test]
    fn geodesic_area_of_a_small_equatorial_square() {
        // 0.01 x 0.01 degrees at the equator is roughly 1.105 x 1.113 km.
        let region = Region::new(square(0.0, 0.0, 0.01, 0.01)).unwrap();
        let report = air_risk(&region, &[]);
        assert!((report.area_km2 - 1.23).abs() < 0.03, "{}", report.area_km2);
    }

    #[test]
    fn area_conversion_round_trips() {
        let region = Region::new(square(0.0, 0.0, 0.01, 0.01)).unwrap();
        let m2 = region.polygon().geodesic_area_unsigned().trunc();
        let report = air_risk(&region, &[]);
        assert!((report.area_km2 * 1.0e6 - m2).abs() < 1e-6);
    }

    #[test]
    fn counts_filtered_flights() {
        let region = Region::new(square(0.0, 0.0, 1.0, 1.0)).unwrap();
        let flights = vec![flight("a", 0.1, 0.1), flight("b", 0.2, 0.2)];
        assert_eq!(air_risk(&region, &flights).flight_count, 2);
    }

    #[test]
    fn exposure_lists_only_overflown_tracts() {
        // Scenario: two tracts overlap the region, flights only in the first.
        let region = Region::new(square(0.0, 0.0, 2.0, 1.0)).unwrap();
        let layer = TractLayer {
            tracts: vec![
                tract("with-flights", 120.0, 0.0, 0.0, 1.0, 1.0),
                tract("empty", 80.0, 1.0, 0.0, 2.0, 1.0),
            ],
        };
        let flights = vec![flight("a", 0.5, 0.5)];

        let rows = population_exposure(&layer, &region, &flights, DensityMode::PerTract);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ctuid, "with-flights");
    }

    #[test]
    fn per_flight_mode_repeats_tracts() {
        let region = Region::new(square(0.0, 0.0, 1.0, 1.0)).unwrap();
        let layer = TractLayer {
            tracts: vec![tract("busy", 300.0, 0.0, 0.0, 1.0, 1.0)],
        };
        let flights = vec![flight("a", 0.2, 0.2), flight("b", 0.7, 0.7)];

        let per_flight = population_exposure(&layer, &region, &flights, DensityMode::PerFlight);
        assert_eq!(per_flight.len(), 2);

        let per_tract = population_exposure(&layer, &region, &flights, DensityMode::PerTract);
        assert_eq!(per_tract.len(), 1);
    }

    #[test]
    fn renders_density_wire_format() {
        let rows = vec![
            TractDensity {
                ctuid: "5050001.00".to_string(),
                pop_den: 1234.5,
            },
            TractDensity {
                ctuid: "5050002.00".to_string(),
                pop_den: 100.0,
            },
        ];
        assert_eq!(
            render_density(&rows),
            "All census tracts that contain at least one flight\n\
             Census Tract CTUID: Population Density\n\
             5050001.00: 1234.5\n\
             5050002.00: 100.0\n"
        );
    }

    #[test]
    fn density_report_headers_survive_empty_rows() {
        let rendered = render_density(&[]);
        assert!(rendered.ends_with("Population Density\n"));
    }

    #[test]
    fn report_files_are_overwritten() {
        let dir = std::env::temp_dir().join(format!("air-risk-report-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let first = AirRiskReport {
            flight_count: 5,
            area_km2: 10.0,
        };
        let second = AirRiskReport {
            flight_count: 0,
            area_km2: 10.0,
        };
        write_air_risk(&dir, &first).unwrap();
        write_air_risk(&dir, &second).unwrap();

        let contents = std::fs::read_to_string(dir.join("AirRisk.txt")).unwrap();
        assert_eq!(contents, "0 flights.\nArea: 10.0 sq. km.");

        std::fs::remove_dir_all(&dir).ok();
    }
}
