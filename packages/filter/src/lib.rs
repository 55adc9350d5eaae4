#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The spatial-temporal flight filter.
//!
//! Narrows a raw flight log to the records that fall inside a date window,
//! an altitude band, and the region of interest, then deduplicates by
//! national flight identifier. A pure function over already-loaded data:
//! both downstream aggregators share one computed result.

use air_risk_flight_models::{FLIGHT_DATE_FORMAT, FlightRecord, RawFlightRow, Selection};
use air_risk_spatial::{FlightPoint, Region};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while filtering the flight log.
#[derive(Debug, Error)]
pub enum FilterError {
    /// An event date column value does not match `FLIGHT_DATE_FORMAT`.
    #[error("Malformed flight event date {value:?} (expected YY-MM-DD HH:MM:SS)")]
    Timestamp {
        /// The offending column value.
        value: String,
    },
}

/// Filters a raw flight log down to the selection and the region.
///
/// Steps, in order: parse every event date, deduplicate by national
/// flight id keeping the last occurrence in input order (later records in
/// an extract supersede earlier partial or duplicate entries, so the last
/// copy is the one the predicates see), then apply the `(start, end]`
/// date window, the inclusive altitude band, and the region clip
/// (boundary points kept).
///
/// An empty result is not an error; it is logged as a warning and
/// returned as-is. Deterministic: identical inputs produce an identical
/// output set, in the same order.
///
/// # Errors
///
/// Returns [`FilterError::Timestamp`] if any `FLIGHT_EVENT_DATE` value
/// fails to parse.
pub fn filter_flights(
    region: &Region,
    rows: &[RawFlightRow],
    selection: &Selection,
) -> Result<Vec<FlightPoint>, FilterError> {
    let records = rows
        .iter()
        .map(|row| {
            Ok(FlightRecord {
                national_flight_id: row.national_flight_id.clone(),
                event_time: parse_event_date(&row.event_date)?,
                altitude_ft: row.altitude_ft,
                longitude_deg: row.longitude_deg,
                latitude_deg: row.latitude_deg,
            })
        })
        .collect::<Result<Vec<_>, FilterError>>()?;

    let kept: Vec<FlightPoint> = dedup_keep_last(records)
        .into_iter()
        .filter(|r| selection.in_window(r.event_time) && selection.in_band(r.altitude_ft))
        .map(FlightPoint::from_record)
        .filter(|fp| region.covers(fp.point))
        .collect();

    if kept.is_empty() {
        log::warn!("No flights within selected area, altitude and date");
    } else {
        log::info!("{} flights match the selection", kept.len());
    }

    Ok(kept)
}

/// Parses a `FLIGHT_EVENT_DATE` value (`YY-MM-DD HH:MM:SS`).
///
/// # Errors
///
/// Returns [`FilterError::Timestamp`] if the value does not conform.
pub fn parse_event_date(value: &str) -> Result<NaiveDateTime, FilterError> {
    NaiveDateTime::parse_from_str(value, FLIGHT_DATE_FORMAT).map_err(|_| FilterError::Timestamp {
        value: value.to_string(),
    })
}

/// Deduplicates by national flight id, keeping the last occurrence.
///
/// Survivors keep their relative input order.
fn dedup_keep_last(records: Vec<FlightRecord>) -> Vec<FlightRecord> {
    use std::collections::BTreeMap;

    let mut last_index: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, r) in records.iter().enumerate() {
        last_index.insert(r.national_flight_id.as_str(), i);
    }

    let keep: Vec<bool> = records
        .iter()
        .enumerate()
        .map(|(i, r)| last_index.get(r.national_flight_id.as_str()) == Some(&i))
        .collect();

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, keep)| keep.then_some(r))
        .collect()
}
