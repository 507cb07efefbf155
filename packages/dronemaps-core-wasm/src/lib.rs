use wasm_bindgen::prelude::*;
use serde_wasm_bindgen::to_value;

// Create a console module for logging
pub mod console;
// Survey area and data source settings
pub mod config;
// Decoded DEM raster and point sampling
pub mod raster;
// Great-circle distance and polygon area
pub mod geodesic;
// Terrain-aware distance/area engine
pub mod measurement;
// Mode state machine and drawn overlays
pub mod session;
// Result panel text
pub mod format;
// Orthophoto pixel colouring
pub mod orthophoto;
// Published DEM shared by the exports
mod module_state;
// Payloads returned to JS
mod models;
// DEM discovery and publication
mod dem_loader;
// JS wrapper around the session controller
mod session_js;

use config::SurveyConfig;
use geodesic::GeoPoint;
use models::{ElevationResponse, ResolvedConfig};
use module_state::ModuleState;

pub use dem_loader::{clear_dem, dem_info, load_dem, set_dem};
pub use session_js::MeasurementSession;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

#[wasm_bindgen]
extern "C" {
    // JavaScript helper: fetch a GeoTIFF and resolve with the decoded georaster
    #[wasm_bindgen(js_namespace = wasmJsHelpers, js_name = fetchGeoRaster, catch)]
    pub fn fetch_geo_raster(url: &str) -> Result<js_sys::Promise, JsValue>;
}

// Use the macros from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => (crate::console::log(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => (crate::console::warn(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => (crate::console::error(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("WASM module initialized successfully");
    });
}

/// Resolve the survey config, optionally replacing the active one with a JSON
/// override, and return it with the restricted map bounds.
#[wasm_bindgen]
pub fn survey_config(config_json: Option<String>) -> Result<JsValue, JsValue> {
    let config = match config_json {
        Some(json) => {
            let config = SurveyConfig::from_json(&json).map_err(|e| JsValue::from_str(&e))?;
            ModuleState::with_mut(|state| state.config = config.clone());
            config
        }
        None => ModuleState::with(|state| state.config.clone()),
    };

    let bounds = config.restricted_bounds();
    console_log!(
        "Map restricted to [{:.5}, {:.5}] - [{:.5}, {:.5}]",
        bounds.south_west.lat,
        bounds.south_west.lng,
        bounds.north_east.lat,
        bounds.north_east.lng
    );

    let resolved = ResolvedConfig {
        config,
        restricted_bounds: bounds,
    };
    Ok(to_value(&resolved)?)
}

/// True when `zoom` is high enough to warn about rendering cost.
#[wasm_bindgen]
pub fn is_high_zoom(zoom: u8) -> bool {
    ModuleState::with(|state| state.config.is_high_zoom(zoom))
}

/// Elevation under a point from the published DEM.
#[wasm_bindgen]
pub fn sample_elevation(lat: f64, lng: f64) -> Result<JsValue, JsValue> {
    let dem = ModuleState::current_dem();
    let point = GeoPoint::new(lat, lng);
    let response = ElevationResponse {
        point,
        elevation: raster::sample(dem.as_deref(), point).value(),
        dem_loaded: dem.is_some(),
    };
    Ok(to_value(&response)?)
}

/// Segment measurement between two points against the published DEM.
#[wasm_bindgen]
pub fn measure_segment(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<JsValue, JsValue> {
    let dem = ModuleState::current_dem();
    let result = measurement::measure_segment(
        dem.as_deref(),
        GeoPoint::new(lat1, lng1),
        GeoPoint::new(lat2, lng2),
    );
    Ok(to_value(&result)?)
}

/// Area in m² of a ring given as flat `[lat, lng, lat, lng, ...]`.
#[wasm_bindgen]
pub fn geodesic_area_direct(coordinates: &[f64]) -> f64 {
    if coordinates.len() % 2 != 0 {
        return 0.0;
    }

    let ring: Vec<GeoPoint> = coordinates
        .chunks_exact(2)
        .map(|chunk| GeoPoint::new(chunk[0], chunk[1]))
        .collect();
    geodesic::geodesic_area(&ring)
}

#[wasm_bindgen]
pub fn orthophoto_pixel_color(values: &[f64]) -> Option<String> {
    orthophoto::pixel_color(values)
}

#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    format::format_bytes(bytes.max(0.0) as u64)
}
