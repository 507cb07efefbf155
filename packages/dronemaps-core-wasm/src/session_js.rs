use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

use crate::format::{mode_prompt, report_lines};
use crate::geodesic::GeoPoint;
use crate::models::SessionUpdate;
use crate::module_state::ModuleState;
use crate::session::{MeasurementMode, MeasurementReport, OverlayLayer, SessionController};

/// Measurement controller for one map page, exposed to JavaScript.
///
/// Construct once per page and route the measure/clear buttons and map clicks
/// to it; each call returns the overlays and result text to render.
#[wasm_bindgen]
pub struct MeasurementSession {
    controller: SessionController<OverlayLayer>,
    dem_generation: u64,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        MeasurementSession::new()
    }
}

#[wasm_bindgen]
impl MeasurementSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MeasurementSession {
        let (dem, generation) = ModuleState::with(|state| (state.dem_handle(), state.dem_generation()));
        MeasurementSession {
            controller: SessionController::new(OverlayLayer::default(), dem),
            dem_generation: generation,
        }
    }

    #[wasm_bindgen(js_name = selectDistance)]
    pub fn select_distance(&mut self) -> Result<JsValue, JsValue> {
        self.select(MeasurementMode::Distance)
    }

    #[wasm_bindgen(js_name = selectArea)]
    pub fn select_area(&mut self) -> Result<JsValue, JsValue> {
        self.select(MeasurementMode::Area)
    }

    pub fn clear(&mut self) -> Result<JsValue, JsValue> {
        self.controller.clear();
        self.update(MeasurementReport::Idle, Vec::new())
    }

    #[wasm_bindgen(js_name = addPoint)]
    pub fn add_point(&mut self, lat: f64, lng: f64) -> Result<JsValue, JsValue> {
        self.refresh_dem();
        let report = self.controller.click(GeoPoint::new(lat, lng));
        let lines = report_lines(&report);
        self.update(report, lines)
    }

    pub fn mode(&self) -> String {
        match self.controller.mode() {
            MeasurementMode::Idle => "idle",
            MeasurementMode::Distance => "distance",
            MeasurementMode::Area => "area",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.controller.points().len()
    }

    pub fn overlays(&self) -> Result<JsValue, JsValue> {
        Ok(to_value(self.controller.surface())?)
    }

    /// Current report without changing any state.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        let report = self.controller.report();
        let lines = report_lines(&report);
        self.update(report, lines)
    }
}

impl MeasurementSession {
    fn select(&mut self, mode: MeasurementMode) -> Result<JsValue, JsValue> {
        self.refresh_dem();
        let report = self.controller.select(mode);
        let info = self.controller.dem().map(|dem| dem.info());
        let lines = mode_prompt(mode, info.as_ref()).into_iter().collect();
        self.update(report, lines)
    }

    // Pick up a newly published or withdrawn DEM; the Arc swap is the only
    // thing that happens here.
    fn refresh_dem(&mut self) {
        let seen = self.dem_generation;
        let latest = ModuleState::with(|state| {
            (state.dem_generation() != seen).then(|| (state.dem_handle(), state.dem_generation()))
        });
        if let Some((dem, generation)) = latest {
            self.controller.set_dem(dem);
            self.dem_generation = generation;
        }
    }

    fn update(&self, report: MeasurementReport, lines: Vec<String>) -> Result<JsValue, JsValue> {
        let update = SessionUpdate {
            mode: self.controller.mode(),
            points: self.controller.points(),
            overlays: self.controller.surface(),
            report,
            lines,
            dem_loaded: self.controller.dem().is_some(),
        };
        Ok(to_value(&update)?)
    }
}
