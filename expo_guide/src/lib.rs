//! Core exhibition toolkit: venue taxi-stand lookup and booth ROI calculations.
//!
//! Everything in this crate is a pure function of its inputs. Front ends (the
//! command line and the browser app) own rendering; this crate hands them the
//! markers, links, chart specs and summary rows to draw.

use thiserror::Error;

pub mod chart;
pub mod links;
pub mod report;
pub mod roi;
pub mod venue;

pub use chart::{comparison_chart, roi_gauge, BarSeries, ComparisonChart, GaugeSpec, GaugeZone};
pub use links::{NavLinks, TAXI_STAND_LABEL};
pub use report::{
    summary_table, SummaryRow, SummaryTable, SummaryValue, EXPORT_FILENAME, EXPORT_MIME,
};
pub use roi::{compute_metrics, RoiInputs, RoiMetrics};
pub use venue::{
    Coordinate, MapMarker, MarkerColor, Venue, VenueSelection, VenueTable, DEFAULT_ZOOM,
    TAXI_MARKER_LABEL,
};

#[derive(Error, Debug)]
pub enum ExpoError {
    #[error("unknown venue: {0}")]
    UnknownVenue(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid venue table: {0}")]
    InvalidVenueTable(String),
    #[error("failed to encode CSV: {0}")]
    Csv(String),
}
