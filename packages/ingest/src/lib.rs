#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! File readers for the overflight pipeline.
//!
//! Thin wrappers around the `csv`, `geojson`, and `kml` crates. Every read
//! resolves against an explicit base directory supplied by the caller; the
//! process working directory is never touched.
//!
//! KML is a gated capability: region files with a `.kml` extension are only
//! read when [`ReaderOptions::enable_kml`] is set, mirroring the explicit
//! driver opt-in of the upstream geospatial stack.

pub mod flights;
pub mod region;
pub mod tracts;

use thiserror::Error;

pub use flights::read_flights;
pub use region::read_region;
pub use tracts::read_tracts;

/// Errors that can occur while reading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Flight CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// GeoJSON parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// KML parsing failed.
    #[error("KML error: {0}")]
    Kml(#[from] kml::Error),

    /// A `.kml` region file was supplied without the KML capability enabled.
    #[error("KML support is not enabled for {file}")]
    KmlDisabled {
        /// The offending file name.
        file: String,
    },

    /// The file extension maps to no supported reader.
    #[error("Unsupported geometry file format: {file}")]
    UnsupportedFormat {
        /// The offending file name.
        file: String,
    },

    /// The tract layer file is not a GeoJSON `FeatureCollection`.
    #[error("Tract layer {file} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection {
        /// The offending file name.
        file: String,
    },

    /// The file parsed but contained no polygon geometry.
    #[error("No polygon geometry found in {file}")]
    NoPolygon {
        /// The offending file name.
        file: String,
    },

    /// A tract feature is missing a required property.
    #[error("Tract feature {index} is missing property {property:?}")]
    MissingProperty {
        /// Zero-based feature index in the layer file.
        index: usize,
        /// The missing (or wrongly typed) property name.
        property: &'static str,
    },
}

/// Capability flags for the geometry readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Allow reading `.kml` region files.
    pub enable_kml: bool,
}
