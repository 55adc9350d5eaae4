//! Flight log CSV reader.

use std::io::Read;
use std::path::Path;

use air_risk_flight_models::RawFlightRow;

use crate::IngestError;

/// Reads a flight log CSV from `base_dir`.
///
/// The file must carry a header row with at least the five flight columns
/// (`NATIONAL_FLIGHT_ID`, `FLIGHT_EVENT_DATE`, `FLIGHT_FIX_ALTITUDE_ESTAB_FT`,
/// `FLIGHT_FIX_LONGITUDE_DEG`, `FLIGHT_FIX_LATITUDE_DEG`); extra columns are
/// ignored. Event dates are returned unparsed.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row fails to
/// deserialize.
pub fn read_flights(base_dir: &Path, file: &str) -> Result<Vec<RawFlightRow>, IngestError> {
    let path = base_dir.join(file);
    let reader = csv::Reader::from_path(&path)?;
    let rows = parse_flights(reader)?;
    log::info!("Read {} flight rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn parse_flights<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawFlightRow>, IngestError> {
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}
