#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census tract attribute and density report types.
//!
//! Tracts are static StatCan reference data: a `CTUID` identifier and a
//! population density (people per square kilometer). Their polygons live in
//! the spatial layer types, not here.

use serde::{Deserialize, Serialize};

/// Attributes of one census tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CensusTract {
    /// Census tract unique identifier (e.g. "5050012.01").
    pub ctuid: String,
    /// Population density in people per square kilometer.
    pub pop_den: f64,
}

/// One row of the population-exposure report: a tract overflown by at
/// least one filtered flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TractDensity {
    /// Census tract unique identifier.
    pub ctuid: String,
    /// Population density in people per square kilometer.
    pub pop_den: f64,
}

/// How the population-exposure report treats a tract overflown by more
/// than one flight.
///
/// `PerFlight` is the historical behavior: the tract appears once per
/// matched flight, weighting the listing by exposure count. `PerTract`
/// lists every matched tract exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DensityMode {
    /// One report row per (tract, flight) match.
    #[default]
    PerFlight,
    /// One report row per matched tract.
    PerTract,
}
