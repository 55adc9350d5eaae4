#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial primitives for overflight analysis.
//!
//! Holds the validated region of interest, flight fixes promoted to point
//! geometries, and the census tract layer with its polygons. Provides the
//! two spatial operations the pipeline needs: clipping points to the region
//! and an R-tree backed containment join between tract polygons and flight
//! points.
//!
//! Everything is WGS84 (EPSG:4326); sources without an embedded CRS are
//! assigned it at load time.

use air_risk_flight_models::FlightRecord;
use air_risk_geography_models::CensusTract;
use geo::{Area, BooleanOps, BoundingRect, Contains, Intersects, MultiPolygon, Point, Rect};
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

/// Errors raised by geometry validation.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The region of interest is empty or has zero area.
    #[error("Region of interest is empty or degenerate (zero area)")]
    DegenerateRegion,
}

/// The validated region of interest: a WGS84 polygon or multi-polygon.
///
/// Construction rejects empty and zero-area geometries so the aggregators
/// never silently report zeros for a broken input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    polygon: MultiPolygon<f64>,
    bounds: Rect<f64>,
}

impl Region {
    /// Validates and wraps a region geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DegenerateRegion`] if the geometry has no
    /// polygons or zero planar area.
    pub fn new(polygon: MultiPolygon<f64>) -> Result<Self, SpatialError> {
        if polygon.0.is_empty() || polygon.unsigned_area() == 0.0 {
            return Err(SpatialError::DegenerateRegion);
        }
        let bounds = polygon
            .bounding_rect()
            .ok_or(SpatialError::DegenerateRegion)?;
        Ok(Self { polygon, bounds })
    }

    /// The region geometry.
    #[must_use]
    pub const fn polygon(&self) -> &MultiPolygon<f64> {
        &self.polygon
    }

    /// Whether a point lies inside the region or on its boundary.
    ///
    /// Clip semantics: boundary points are kept, so `Intersects` rather
    /// than `Contains`. The bounding rectangle is checked before the full
    /// polygon test.
    #[must_use]
    pub fn covers(&self, point: Point<f64>) -> bool {
        self.bounds.intersects(&point) && self.polygon.intersects(&point)
    }
}

/// A flight record promoted to a WGS84 point geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPoint {
    /// The originating record with all its attributes.
    pub record: FlightRecord,
    /// `(longitude, latitude)` point geometry.
    pub point: Point<f64>,
}

impl FlightPoint {
    /// Promotes a record to a point using its fix coordinates.
    #[must_use]
    pub fn from_record(record: FlightRecord) -> Self {
        let point = Point::new(record.longitude_deg, record.latitude_deg);
        Self { record, point }
    }
}

/// One census tract with its polygon geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TractGeometry {
    /// Tract attributes (`CTUID`, population density).
    pub tract: CensusTract,
    /// Tract boundary in WGS84.
    pub polygon: MultiPolygon<f64>,
}

/// The census tract layer, in source file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TractLayer {
    /// Tracts in input order.
    pub tracts: Vec<TractGeometry>,
}

impl TractLayer {
    /// Clips every tract polygon to the region, dropping tracts whose
    /// intersection with the region is empty. Input order is preserved.
    #[must_use]
    pub fn clip_to(&self, region: &Region) -> Self {
        let tracts: Vec<TractGeometry> = self
            .tracts
            .iter()
            .filter_map(|t| {
                let clipped = t.polygon.intersection(region.polygon());
                if clipped.0.is_empty() {
                    None
                } else {
                    Some(TractGeometry {
                        tract: t.tract.clone(),
                        polygon: clipped,
                    })
                }
            })
            .collect();

        log::debug!(
            "Clipped tract layer: {} of {} tracts intersect the region",
            tracts.len(),
            self.tracts.len()
        );

        Self { tracts }
    }
}

/// A flight point stored in the R-tree with its input position.
struct PointEntry {
    index: usize,
    point: Point<f64>,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x(), self.point.y()])
    }
}

/// R-tree over filtered flight points, for polygon containment queries.
///
/// Built once per report; queried once per tract.
pub struct FlightPointIndex {
    tree: RTree<PointEntry>,
}

impl FlightPointIndex {
    /// Bulk-loads the index from a flight point set.
    #[must_use]
    pub fn new(points: &[FlightPoint]) -> Self {
        let entries: Vec<PointEntry> = points
            .iter()
            .enumerate()
            .map(|(index, fp)| PointEntry {
                index,
                point: fp.point,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Indices of the flight points a polygon contains, restored to flight
    /// input order so join results are deterministic.
    #[must_use]
    pub fn contained_by(&self, polygon: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = polygon.bounding_rect() else {
            return Vec::new();
        };
        let envelope = AABB::from_corners(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        );

        let mut matches: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| polygon.contains(&entry.point))
            .map(|entry| entry.index)
            .collect();
        matches.sort_unstable();
        matches
    }
}
