// Survey area and data source settings
use serde::{Deserialize, Serialize};

use crate::geodesic::GeoPoint;

// Rough length of one degree of latitude
const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomLimits {
    pub min: u8,
    pub initial: u8,
    pub max: u8,
    pub orthophoto: u8,
    pub warn_above: u8,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        ZoomLimits {
            min: 13,
            initial: 16,
            max: 22,
            orthophoto: 18,
            warn_above: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyConfig {
    pub center: GeoPoint,
    pub half_extent_km: f64,
    pub zoom: ZoomLimits,
    /// Tried in order; the first one that decodes wins.
    pub dem_urls: Vec<String>,
    pub orthophoto_urls: Vec<String>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            center: GeoPoint::new(-36.8830, 174.7804),
            half_extent_km: 1.5,
            zoom: ZoomLimits::default(),
            dem_urls: vec![
                "all/odm_dem/dsm_web.tif".to_string(),
                "all/odm_dem/dsm.tif".to_string(),
            ],
            orthophoto_urls: vec![
                "all/odm_orthophoto/odm_orthophoto_web.tif".to_string(),
                "all/odm_orthophoto/odm_orthophoto.tif".to_string(),
                "all/odm_orthophoto/odm_orthophoto_original.tif".to_string(),
            ],
        }
    }
}

/// South-west and north-east corners of the viewable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl SurveyConfig {
    /// Parse a JSON override; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(SurveyConfig::default());
        }
        serde_json::from_str(json).map_err(|e| format!("Invalid survey config: {}", e))
    }

    /// `center ± half_extent_km / 111` degrees on both axes.
    pub fn restricted_bounds(&self) -> RestrictedBounds {
        let offset = self.half_extent_km / KM_PER_DEGREE;
        RestrictedBounds {
            south_west: GeoPoint::new(self.center.lat - offset, self.center.lng - offset),
            north_east: GeoPoint::new(self.center.lat + offset, self.center.lng + offset),
        }
    }

    pub fn is_high_zoom(&self, zoom: u8) -> bool {
        zoom > self.zoom.warn_above
    }
}
