#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the overflight risk reporting tool.
//!
//! One-shot batch run: load the region of interest, the flight log, and
//! the census tract layer from a base directory, filter the flights once,
//! then write `AirRisk.txt` and `Density.txt` back into that directory.

use std::path::PathBuf;

use air_risk_filter::filter_flights;
use air_risk_flight_models::{FLIGHT_DATE_FORMAT, Selection};
use air_risk_geography_models::DensityMode;
use air_risk_ingest::{ReaderOptions, read_flights, read_region, read_tracts};
use air_risk_report::{air_risk, population_exposure, write_air_risk, write_density};
use air_risk_spatial::Region;
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(
    name = "air_risk",
    about = "Flight overflight and population exposure risk reports for a region of interest"
)]
struct Cli {
    /// Base directory holding the input files; reports are written here too
    path: PathBuf,
    /// Flights CSV file name (with extension)
    flights: String,
    /// Population density layer file name (GeoJSON with `CTUID` and `PopDen`)
    pop: String,
    /// Area of interest geometry file name (GeoJSON or KML)
    aoi: String,
    /// Start of the date window, `YY-MM-DD HH:MM:SS` (exclusive)
    #[arg(value_parser = parse_selection_time)]
    start_date_time: NaiveDateTime,
    /// End of the date window, `YY-MM-DD HH:MM:SS` (inclusive)
    #[arg(value_parser = parse_selection_time)]
    end_date_time: NaiveDateTime,
    /// Minimum altitude in feet (inclusive)
    min_altitude: i64,
    /// Maximum altitude in feet (inclusive)
    max_altitude: i64,
    /// Whether the density report repeats a tract per matched flight
    #[arg(long, value_enum, default_value_t = DensityModeArg::PerFlight)]
    density_mode: DensityModeArg,
}

/// CLI surface for [`DensityMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DensityModeArg {
    /// One density row per (tract, flight) match
    PerFlight,
    /// One density row per overflown tract
    PerTract,
}

impl From<DensityModeArg> for DensityMode {
    fn from(arg: DensityModeArg) -> Self {
        match arg {
            DensityModeArg::PerFlight => Self::PerFlight,
            DensityModeArg::PerTract => Self::PerTract,
        }
    }
}

fn parse_selection_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, FLIGHT_DATE_FORMAT)
        .map_err(|e| format!("expected YY-MM-DD HH:MM:SS: {e}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let selection = Selection {
        start: cli.start_date_time,
        end: cli.end_date_time,
        min_altitude_ft: cli.min_altitude,
        max_altitude_ft: cli.max_altitude,
    };
    log::info!(
        "Selection: ({} .. {}], {}-{} ft",
        selection.start.format(FLIGHT_DATE_FORMAT),
        selection.end.format(FLIGHT_DATE_FORMAT),
        selection.min_altitude_ft,
        selection.max_altitude_ft
    );

    // KML regions are allowed from the CLI; the flag exists so library
    // consumers can keep the driver off.
    let options = ReaderOptions { enable_kml: true };
    let region = Region::new(read_region(&cli.path, &cli.aoi, &options)?)?;
    let rows = read_flights(&cli.path, &cli.flights)?;
    let tracts = read_tracts(&cli.path, &cli.pop)?;

    // Filter once; both reports share the same set.
    let flights = filter_flights(&region, &rows, &selection)?;

    let density_rows = population_exposure(&tracts, &region, &flights, cli.density_mode.into());
    write_density(&cli.path, &density_rows)?;

    let report = air_risk(&region, &flights);
    write_air_risk(&cli.path, &report)?;

    Ok(())
}
