// Measurement mode state machine and the overlays it keeps in sync
use serde::Serialize;
use std::sync::Arc;

use crate::console_log;
use crate::geodesic::GeoPoint;
use crate::measurement::{AreaSummary, DistanceSummary, MeasurementEngine, Summary};
use crate::raster::GeoRaster;

const DISTANCE_COLOR: &str = "#3b82f6";
const AREA_COLOR: &str = "#16a34a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementMode {
    Idle,
    Distance,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_color: Option<&'static str>,
    pub fill_opacity: Option<f64>,
}

impl MarkerStyle {
    pub fn vertex() -> Self {
        MarkerStyle {
            radius: 5.0,
            color: DISTANCE_COLOR,
            fill_color: DISTANCE_COLOR,
            fill_opacity: 0.8,
        }
    }
}

impl PathStyle {
    pub fn distance_line() -> Self {
        PathStyle {
            color: DISTANCE_COLOR,
            weight: 3.0,
            opacity: 0.7,
            fill_color: None,
            fill_opacity: None,
        }
    }

    pub fn area_polygon() -> Self {
        PathStyle {
            color: AREA_COLOR,
            weight: 3.0,
            opacity: 1.0,
            fill_color: Some(AREA_COLOR),
            fill_opacity: Some(0.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub at: GeoPoint,
    pub style: MarkerStyle,
}

/// Connecting geometry drawn between markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    Line { from: GeoPoint, to: GeoPoint, style: PathStyle },
    Polygon { ring: Vec<GeoPoint>, style: PathStyle },
}

/// Map drawing surface the controller mirrors its points onto.
pub trait DrawSurface {
    fn add_marker(&mut self, marker: Marker);

    /// Remove previously drawn lines/polygons and draw `shapes` instead.
    fn replace_shapes(&mut self, shapes: Vec<Shape>);

    /// Remove every marker and shape at once.
    fn clear_all(&mut self);
}

/// Draw surface that records overlays so the host can render them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    pub markers: Vec<Marker>,
    pub shapes: Vec<Shape>,
}

impl OverlayLayer {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.shapes.is_empty()
    }
}

impl DrawSurface for OverlayLayer {
    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    fn clear_all(&mut self) {
        self.markers.clear();
        self.shapes.clear();
    }
}

/// What the result panel should show after a state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "summary", rename_all = "camelCase")]
pub enum MeasurementReport {
    Idle,
    Distance(Summary<DistanceSummary>),
    Area(Summary<AreaSummary>),
}

/// Drives mode selection and click handling for one map page.
///
/// Every operation finishes its point update, redraw and summary in the same
/// call, so the point list and the drawn markers never diverge.
pub struct SessionController<S: DrawSurface> {
    mode: MeasurementMode,
    engine: MeasurementEngine,
    surface: S,
}

impl<S: DrawSurface> SessionController<S> {
    pub fn new(surface: S, dem: Option<Arc<GeoRaster>>) -> Self {
        SessionController {
            mode: MeasurementMode::Idle,
            engine: MeasurementEngine::new(dem),
            surface,
        }
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn points(&self) -> &[GeoPoint] {
        self.engine.points()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn dem(&self) -> Option<&GeoRaster> {
        self.engine.dem()
    }

    pub fn set_dem(&mut self, dem: Option<Arc<GeoRaster>>) {
        self.engine.set_dem(dem);
    }

    /// Enter `mode` from a clean slate. Selecting any mode, including the
    /// current one, drops all points and overlays first.
    pub fn select(&mut self, mode: MeasurementMode) -> MeasurementReport {
        self.clear();
        self.mode = mode;
        if mode != MeasurementMode::Idle {
            console_log!(
                "Measurement mode {:?} selected ({})",
                mode,
                if self.engine.has_dem() { "3D" } else { "2D only" }
            );
        }
        self.report()
    }

    /// Drop points and overlays and return to `Idle`.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.surface.clear_all();
        self.mode = MeasurementMode::Idle;
    }

    /// Handle a map click. Ignored while idle.
    pub fn click(&mut self, point: GeoPoint) -> MeasurementReport {
        if self.mode == MeasurementMode::Idle {
            return MeasurementReport::Idle;
        }

        self.engine.add_point(point);
        self.surface.add_marker(Marker {
            at: point,
            style: MarkerStyle::vertex(),
        });
        self.redraw();
        self.report()
    }

    pub fn report(&self) -> MeasurementReport {
        match self.mode {
            MeasurementMode::Idle => MeasurementReport::Idle,
            MeasurementMode::Distance => MeasurementReport::Distance(self.engine.distance_summary()),
            MeasurementMode::Area => MeasurementReport::Area(self.engine.area_summary()),
        }
    }

    // Shapes only appear once the mode has enough points to measure
    fn redraw(&mut self) {
        let points = self.engine.points();
        let shapes = match self.mode {
            MeasurementMode::Idle => return,
            MeasurementMode::Distance if points.len() >= 2 => points
                .windows(2)
                .map(|pair| Shape::Line {
                    from: pair[0],
                    to: pair[1],
                    style: PathStyle::distance_line(),
                })
                .collect(),
            MeasurementMode::Area if points.len() >= 3 => vec![Shape::Polygon {
                ring: points.to_vec(),
                style: PathStyle::area_polygon(),
            }],
            _ => return,
        };
        self.surface.replace_shapes(shapes);
    }
}
