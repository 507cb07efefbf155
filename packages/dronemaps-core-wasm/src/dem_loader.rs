use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::SurveyConfig;
use crate::fetch_geo_raster;
use crate::models::DemLoadStatus;
use crate::module_state::ModuleState;
use crate::raster::{DecodedRaster, ElevationPreview, GeoRaster};
use crate::{console_error, console_log, console_warn};

fn describe_js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

// Fetch + decode happen in JS; we only validate what comes back
async fn fetch_dem_candidate(url: &str) -> Result<GeoRaster, String> {
    let promise = fetch_geo_raster(url).map_err(describe_js_error)?;
    let js_result = JsFuture::from(promise).await.map_err(describe_js_error)?;
    if js_result.is_null() || js_result.is_undefined() {
        return Err("not available".to_string());
    }

    let decoded: DecodedRaster = serde_wasm_bindgen::from_value(js_result)
        .map_err(|e| format!("Failed to read decoded raster: {}", e))?;
    GeoRaster::from_decoded(decoded).map_err(|e| format!("Malformed DEM: {}", e))
}

/// Log bounds, the CRS guess and preview statistics for a freshly loaded DEM.
pub fn log_dem_diagnostics(raster: &GeoRaster) -> Option<ElevationPreview> {
    let info = raster.info();
    console_log!(
        "DEM info: {}x{} px, x=[{}, {}], y=[{}, {}], pixel {} x {}",
        info.width,
        info.height,
        info.xmin,
        info.xmax,
        info.ymin,
        info.ymax,
        info.pixel_width,
        info.pixel_height
    );
    if info.is_projected {
        console_warn!("Coordinate system looks PROJECTED (|xmin| > 360); sampling with lat/lng anyway");
    } else {
        console_log!("Coordinate system looks GEOGRAPHIC (lat/lng)");
    }

    let preview = raster.preview_stats();
    match &preview {
        Some(stats) => console_log!(
            "Sampled {} valid elevation values: min {:.2} m, max {:.2} m, range {:.2} m",
            stats.valid_samples,
            stats.min_elevation,
            stats.max_elevation,
            stats.range
        ),
        None => console_error!("No valid elevation values found in DEM preview"),
    }
    preview
}

fn publish(raster: GeoRaster, source: &str, failures: Vec<String>) -> DemLoadStatus {
    let info = raster.info();
    let preview = log_dem_diagnostics(&raster);
    ModuleState::with_mut(|state| state.publish_dem(raster, source));
    DemLoadStatus {
        loaded: true,
        source: Some(source.to_string()),
        info: Some(info),
        preview,
        failures,
    }
}

/// Try each configured DEM location in order and publish the first one that
/// decodes. Never rejects: with no usable DEM the measurements run 2D only.
#[wasm_bindgen]
pub async fn load_dem(config_json: Option<String>) -> Result<JsValue, JsValue> {
    let urls = match config_json.as_deref().map(SurveyConfig::from_json) {
        Some(Ok(config)) => config.dem_urls,
        Some(Err(e)) => {
            console_warn!("{}; using the active config", e);
            ModuleState::with(|state| state.config.dem_urls.clone())
        }
        None => ModuleState::with(|state| state.config.dem_urls.clone()),
    };

    let mut failures = Vec::new();
    for url in &urls {
        console_log!("Trying DEM at {}...", url);
        match fetch_dem_candidate(url).await {
            Ok(raster) => {
                let status = publish(raster, url, failures);
                return Ok(to_value(&status)?);
            }
            Err(reason) => {
                console_log!("{} not usable: {}", url, reason);
                failures.push(format!("{}: {}", url, reason));
            }
        }
    }

    console_warn!("No DEM file found - measurements will be 2D only");
    ModuleState::with_mut(|state| state.withdraw_dem());
    let status = DemLoadStatus {
        loaded: false,
        source: None,
        info: None,
        preview: None,
        failures,
    };
    Ok(to_value(&status)?)
}

/// Publish a raster the page already decoded. A malformed payload withdraws
/// any current DEM and reports `loaded: false` instead of failing.
#[wasm_bindgen]
pub fn set_dem(raster: JsValue, source: Option<String>) -> Result<JsValue, JsValue> {
    let source = source.unwrap_or_else(|| "inline".to_string());
    let parsed = serde_wasm_bindgen::from_value::<DecodedRaster>(raster)
        .map_err(|e| format!("Failed to read decoded raster: {}", e))
        .and_then(|decoded| GeoRaster::from_decoded(decoded).map_err(|e| format!("Malformed DEM: {}", e)));

    let status = match parsed {
        Ok(raster) => publish(raster, &source, Vec::new()),
        Err(reason) => {
            console_warn!("Could not load DEM ({}); measurements will be 2D only", reason);
            ModuleState::with_mut(|state| state.withdraw_dem());
            DemLoadStatus {
                loaded: false,
                source: None,
                info: None,
                preview: None,
                failures: vec![format!("{}: {}", source, reason)],
            }
        }
    };
    Ok(to_value(&status)?)
}

#[wasm_bindgen]
pub fn clear_dem() -> bool {
    ModuleState::with_mut(|state| state.withdraw_dem());
    true
}

/// Metadata of the published DEM, or `null` when measurements are 2D only.
#[wasm_bindgen]
pub fn dem_info() -> Result<JsValue, JsValue> {
    match ModuleState::with(|state| state.dem().map(|dem| dem.info())) {
        Some(info) => Ok(to_value(&info)?),
        None => Ok(JsValue::NULL),
    }
}
