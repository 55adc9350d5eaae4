#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flight event record and selection window types.
//!
//! A flight log row is a single fix from a national surveillance extract:
//! an identifier, an event timestamp, a position, and an established
//! altitude. Extracts overlap, so the same `NATIONAL_FLIGHT_ID` can appear
//! more than once; deduplication happens downstream in the filter.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used by the flight log and the CLI (`26-03-15 14:30:00`).
pub const FLIGHT_DATE_FORMAT: &str = "%y-%m-%d %H:%M:%S";

/// A flight log row exactly as it appears in the CSV extract.
///
/// The event date stays a string here; parsing it (and rejecting malformed
/// values) is the filter's job. Columns beyond these five are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFlightRow {
    /// National flight identifier. Unique per flight, but duplicated across
    /// overlapping extracts.
    #[serde(rename = "NATIONAL_FLIGHT_ID")]
    pub national_flight_id: String,
    /// Event timestamp, unparsed (`FLIGHT_DATE_FORMAT`).
    #[serde(rename = "FLIGHT_EVENT_DATE")]
    pub event_date: String,
    /// Established altitude in feet.
    #[serde(rename = "FLIGHT_FIX_ALTITUDE_ESTAB_FT")]
    pub altitude_ft: i64,
    /// Fix longitude in degrees (WGS84).
    #[serde(rename = "FLIGHT_FIX_LONGITUDE_DEG")]
    pub longitude_deg: f64,
    /// Fix latitude in degrees (WGS84).
    #[serde(rename = "FLIGHT_FIX_LATITUDE_DEG")]
    pub latitude_deg: f64,
}

/// A parsed, immutable flight event.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    /// National flight identifier.
    pub national_flight_id: String,
    /// Parsed event timestamp.
    pub event_time: NaiveDateTime,
    /// Established altitude in feet.
    pub altitude_ft: i64,
    /// Fix longitude in degrees (WGS84).
    pub longitude_deg: f64,
    /// Fix latitude in degrees (WGS84).
    pub latitude_deg: f64,
}

/// The user's selection: a date window and an altitude band.
///
/// The date window is exclusive at the start and inclusive at the end
/// (`start < t <= end`); the altitude band is inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Start of the date window (exclusive).
    pub start: NaiveDateTime,
    /// End of the date window (inclusive).
    pub end: NaiveDateTime,
    /// Lowest altitude to keep, in feet.
    pub min_altitude_ft: i64,
    /// Highest altitude to keep, in feet.
    pub max_altitude_ft: i64,
}

impl Selection {
    /// Whether a timestamp falls inside the `(start, end]` window.
    #[must_use]
    pub fn in_window(&self, t: NaiveDateTime) -> bool {
        t > self.start && t <= self.end
    }

    /// Whether an altitude falls inside the inclusive band.
    #[must_use]
    pub const fn in_band(&self, altitude_ft: i64) -> bool {
        altitude_ft >= self.min_altitude_ft && altitude_ft <= self.max_altitude_ft
    }
}
