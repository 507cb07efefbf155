// Terrain-aware distance and area measurement over clicked points
use serde::Serialize;
use std::sync::Arc;

use crate::geodesic::{geodesic_area, horizontal_distance, GeoPoint};
use crate::raster::{sample, GeoRaster};

pub const DISTANCE_MIN_POINTS: usize = 2;
pub const AREA_MIN_POINTS: usize = 3;

/// One segment measured against the DEM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    pub horizontal_distance: f64,
    pub vertical_delta: f64,
    #[serde(rename = "distance3D")]
    pub distance_3d: f64,
    pub has_elevation: bool,
}

/// Either a computed summary or how many more clicks are needed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Summary<T> {
    #[serde(rename_all = "camelCase")]
    NeedMorePoints {
        placed: usize,
        required: usize,
        remaining: usize,
    },
    Ready(T),
}

impl<T> Summary<T> {
    fn need_more(placed: usize, required: usize) -> Self {
        Summary::NeedMorePoints {
            placed,
            required,
            remaining: required.saturating_sub(placed),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Summary::Ready(summary) => Some(summary),
            Summary::NeedMorePoints { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceSummary {
    pub point_count: usize,
    #[serde(rename = "totalDistance2D")]
    pub total_distance_2d: f64,
    #[serde(rename = "totalDistance3D")]
    pub total_distance_3d: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    pub has_elevation: bool,
    pub dem_present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    pub point_count: usize,
    #[serde(rename = "area2D")]
    pub area_2d: f64,
    #[serde(rename = "perimeter2D")]
    pub perimeter_2d: f64,
    #[serde(rename = "perimeter3D")]
    pub perimeter_3d: f64,
    pub average_elevation: f64,
    pub has_elevation: bool,
    pub dem_present: bool,
}

/// Horizontal great-circle distance plus the DEM height difference b - a.
/// Missing elevations count as 0 m; `has_elevation` is only set when a DEM is
/// present and at least one endpoint sampled non-zero.
pub fn measure_segment(dem: Option<&GeoRaster>, a: GeoPoint, b: GeoPoint) -> MeasurementResult {
    let horizontal = horizontal_distance(a, b);
    let elev_a = sample(dem, a).or_zero();
    let elev_b = sample(dem, b).or_zero();
    let vertical = elev_b - elev_a;

    MeasurementResult {
        horizontal_distance: horizontal,
        vertical_delta: vertical,
        distance_3d: (horizontal * horizontal + vertical * vertical).sqrt(),
        has_elevation: dem.is_some() && (elev_a != 0.0 || elev_b != 0.0),
    }
}

/// Ordered click sequence plus the DEM it is measured against.
///
/// Summaries are recomputed from scratch on every call; point counts come
/// from interactive clicking and stay small.
#[derive(Debug, Clone, Default)]
pub struct MeasurementEngine {
    points: Vec<GeoPoint>,
    dem: Option<Arc<GeoRaster>>,
}

impl MeasurementEngine {
    pub fn new(dem: Option<Arc<GeoRaster>>) -> Self {
        MeasurementEngine {
            points: Vec::new(),
            dem,
        }
    }

    /// Swap the DEM reference. Summaries computed earlier keep whatever
    /// raster they were computed against.
    pub fn set_dem(&mut self, dem: Option<Arc<GeoRaster>>) {
        self.dem = dem;
    }

    pub fn dem(&self) -> Option<&GeoRaster> {
        self.dem.as_deref()
    }

    pub fn has_dem(&self) -> bool {
        self.dem.is_some()
    }

    pub fn add_point(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn distance_summary(&self) -> Summary<DistanceSummary> {
        let placed = self.points.len();
        if placed < DISTANCE_MIN_POINTS {
            return Summary::need_more(placed, DISTANCE_MIN_POINTS);
        }

        let dem = self.dem();
        let mut total_2d = 0.0;
        let mut total_3d = 0.0;
        let mut gain = 0.0;
        let mut loss = 0.0;
        let mut has_elevation = false;

        for pair in self.points.windows(2) {
            let segment = measure_segment(dem, pair[0], pair[1]);
            total_2d += segment.horizontal_distance;
            total_3d += segment.distance_3d;
            if segment.vertical_delta > 0.0 {
                gain += segment.vertical_delta;
            } else {
                loss += segment.vertical_delta.abs();
            }
            has_elevation |= segment.has_elevation;
        }

        Summary::Ready(DistanceSummary {
            point_count: placed,
            total_distance_2d: total_2d,
            total_distance_3d: total_3d,
            elevation_gain: gain,
            elevation_loss: loss,
            has_elevation,
            dem_present: dem.is_some(),
        })
    }

    pub fn area_summary(&self) -> Summary<AreaSummary> {
        let placed = self.points.len();
        if placed < AREA_MIN_POINTS {
            return Summary::need_more(placed, AREA_MIN_POINTS);
        }

        let dem = self.dem();
        let mut perimeter_2d = 0.0;
        let mut perimeter_3d = 0.0;
        let mut has_elevation = false;

        // Closing edge last -> first included
        for i in 0..placed {
            let next = (i + 1) % placed;
            let segment = measure_segment(dem, self.points[i], self.points[next]);
            perimeter_2d += segment.horizontal_distance;
            perimeter_3d += segment.distance_3d;
            has_elevation |= segment.has_elevation;
        }

        let total_elevation: f64 = self
            .points
            .iter()
            .map(|p| sample(dem, *p).or_zero())
            .sum();

        Summary::Ready(AreaSummary {
            point_count: placed,
            area_2d: geodesic_area(&self.points),
            perimeter_2d,
            perimeter_3d,
            average_elevation: total_elevation / placed as f64,
            has_elevation,
            dem_present: dem.is_some(),
        })
    }
}
