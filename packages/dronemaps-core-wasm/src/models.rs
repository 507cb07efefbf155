// Shared payloads passed back to JavaScript
use serde::Serialize;

use crate::config::{RestrictedBounds, SurveyConfig};
use crate::geodesic::GeoPoint;
use crate::raster::{ElevationPreview, RasterInfo};
use crate::session::{MeasurementMode, MeasurementReport, OverlayLayer};

/// Everything the page needs to re-render after a session call.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate<'a> {
    pub mode: MeasurementMode,
    pub points: &'a [GeoPoint],
    pub overlays: &'a OverlayLayer,
    pub report: MeasurementReport,
    /// Result panel text, one entry per line; empty while idle.
    pub lines: Vec<String>,
    pub dem_loaded: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemLoadStatus {
    pub loaded: bool,
    pub source: Option<String>,
    pub info: Option<RasterInfo>,
    pub preview: Option<ElevationPreview>,
    /// Candidates that were tried and why each one was skipped.
    pub failures: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationResponse {
    pub point: GeoPoint,
    /// `None` when no DEM is loaded or the point has no valid sample.
    pub elevation: Option<f64>,
    pub dem_loaded: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub config: SurveyConfig,
    pub restricted_bounds: RestrictedBounds,
}
