// Decoded elevation raster and nearest-pixel sampling
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geodesic::GeoPoint;

// Bounds beyond any longitude suggest projected (metric) coordinates
const PROJECTED_BOUND_THRESHOLD: f64 = 360.0;

// Sparse preview used for load diagnostics: rows/cols 0, 2, 4, 6, 8
const PREVIEW_EXTENT: usize = 10;
const PREVIEW_STRIDE: usize = 2;

/// Raster payload as produced by the host-side GeoTIFF decoder.
///
/// `values` is band-major: `values[band][row][col]`, with `null` for cells the
/// decoder could not fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRaster {
    pub width: u32,
    pub height: u32,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub values: Vec<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RasterError {
    EmptyDimensions { width: u32, height: u32 },
    TooManyCells { width: usize, height: usize },
    InvalidPixelSize { pixel_width: f64, pixel_height: f64 },
    InvalidBounds,
    MissingBand,
    RowCountMismatch { expected: usize, found: usize },
    RowLengthMismatch { row: usize, expected: usize, found: usize },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::EmptyDimensions { width, height } => {
                write!(f, "raster has no cells ({}x{})", width, height)
            }
            RasterError::TooManyCells { width, height } => {
                write!(f, "raster of {}x{} cells is too large to address", width, height)
            }
            RasterError::InvalidPixelSize { pixel_width, pixel_height } => write!(
                f,
                "pixel size must be positive and finite, got {} x {}",
                pixel_width, pixel_height
            ),
            RasterError::InvalidBounds => write!(f, "raster bounds are not finite or inverted"),
            RasterError::MissingBand => write!(f, "raster has no value bands"),
            RasterError::RowCountMismatch { expected, found } => {
                write!(f, "expected {} rows in band 0, found {}", expected, found)
            }
            RasterError::RowLengthMismatch { row, expected, found } => write!(
                f,
                "row {} has {} columns, expected {}",
                row, found, expected
            ),
        }
    }
}

impl std::error::Error for RasterError {}

/// Result of sampling the DEM at one location.
///
/// `NoData` covers every "no valid sample here" case: no DEM, point outside
/// the bounding box, pixel out of range, or an invalid cell value. It is
/// distinct from a legitimate elevation of 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Elevation(f64),
    NoData,
}

impl Sample {
    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Elevation(v) => Some(v),
            Sample::NoData => None,
        }
    }

    /// Elevation used for arithmetic; missing data counts as 0 m.
    pub fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

/// Immutable north-up elevation grid (band 0 of the decoded DEM).
#[derive(Debug, Clone)]
pub struct GeoRaster {
    width: usize,
    height: usize,
    pixel_width: f64,
    pixel_height: f64,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    // Row-major, NaN marks an invalid cell
    values: Vec<f64>,
    is_projected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterInfo {
    pub width: usize,
    pub height: usize,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub is_projected: bool,
}

/// Elevation statistics over the sparse top-left preview of band 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationPreview {
    pub valid_samples: usize,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub range: f64,
}

impl GeoRaster {
    /// Build a raster from a row-major value grid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: usize,
        height: usize,
        pixel_width: f64,
        pixel_height: f64,
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        values: Vec<f64>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        if !(pixel_width.is_finite() && pixel_height.is_finite())
            || pixel_width <= 0.0
            || pixel_height <= 0.0
        {
            return Err(RasterError::InvalidPixelSize { pixel_width, pixel_height });
        }
        if ![xmin, xmax, ymin, ymax].iter().all(|b| b.is_finite()) || xmin > xmax || ymin > ymax {
            return Err(RasterError::InvalidBounds);
        }
        let cells = width
            .checked_mul(height)
            .ok_or(RasterError::TooManyCells { width, height })?;
        if values.len() != cells {
            return Err(RasterError::RowCountMismatch {
                expected: cells,
                found: values.len(),
            });
        }

        Ok(GeoRaster {
            width,
            height,
            pixel_width,
            pixel_height,
            xmin,
            xmax,
            ymin,
            ymax,
            values,
            is_projected: xmin.abs() > PROJECTED_BOUND_THRESHOLD,
        })
    }

    /// Validate a decoder payload and keep band 0.
    pub fn from_decoded(decoded: DecodedRaster) -> Result<Self, RasterError> {
        let width = decoded.width as usize;
        let height = decoded.height as usize;
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions {
                width: decoded.width,
                height: decoded.height,
            });
        }

        let band = decoded
            .values
            .into_iter()
            .next()
            .ok_or(RasterError::MissingBand)?;
        if band.len() != height {
            return Err(RasterError::RowCountMismatch {
                expected: height,
                found: band.len(),
            });
        }

        let cells = width
            .checked_mul(height)
            .ok_or(RasterError::TooManyCells { width, height })?;
        // Header dimensions are untrusted until every row matches them
        if let Some((row, found)) = band
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(RasterError::RowLengthMismatch {
                row,
                expected: width,
                found,
            });
        }

        let mut values = Vec::with_capacity(cells);
        for row in band {
            values.extend(row.into_iter().map(|v| v.unwrap_or(f64::NAN)));
        }

        GeoRaster::new(
            width,
            height,
            decoded.pixel_width,
            decoded.pixel_height,
            decoded.xmin,
            decoded.xmax,
            decoded.ymin,
            decoded.ymax,
            values,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Heuristic only: |xmin| > 360 is taken to mean projected coordinates.
    /// Sampling is still attempted with the raw lat/lng either way.
    pub fn is_projected(&self) -> bool {
        self.is_projected
    }

    pub fn info(&self) -> RasterInfo {
        RasterInfo {
            width: self.width,
            height: self.height,
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
            xmin: self.xmin,
            xmax: self.xmax,
            ymin: self.ymin,
            ymax: self.ymax,
            is_projected: self.is_projected,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lng >= self.xmin
            && point.lng <= self.xmax
            && point.lat >= self.ymin
            && point.lat <= self.ymax
    }

    /// Map a location to (col, row); row 0 is the northern edge.
    pub fn pixel_of(&self, point: GeoPoint) -> Option<(usize, usize)> {
        if !point.is_finite() || !self.contains(point) {
            return None;
        }

        let col = ((point.lng - self.xmin) / self.pixel_width).floor();
        let row = ((self.ymax - point.lat) / self.pixel_height).floor();
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }

        Some((col as usize, row as usize))
    }

    /// Raw cell value; `None` for out-of-range indices or invalid cells.
    pub fn value_at(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let v = self.values[row * self.width + col];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Nearest-pixel (truncating) lookup, no interpolation.
    pub fn sample(&self, point: GeoPoint) -> Sample {
        self.pixel_of(point)
            .and_then(|(col, row)| self.value_at(col, row))
            .map_or(Sample::NoData, Sample::Elevation)
    }

    pub fn preview_stats(&self) -> Option<ElevationPreview> {
        let mut count = 0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for row in (0..self.height.min(PREVIEW_EXTENT)).step_by(PREVIEW_STRIDE) {
            for col in (0..self.width.min(PREVIEW_EXTENT)).step_by(PREVIEW_STRIDE) {
                if let Some(v) = self.value_at(col, row) {
                    count += 1;
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }

        if count == 0 {
            return None;
        }
        Some(ElevationPreview {
            valid_samples: count,
            min_elevation: min,
            max_elevation: max,
            range: max - min,
        })
    }
}

/// Sample an optional DEM. An absent raster is the expected 2D-only path and
/// always yields `NoData`.
pub fn sample(dem: Option<&GeoRaster>, point: GeoPoint) -> Sample {
    match dem {
        Some(raster) => raster.sample(point),
        None => Sample::NoData,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 4x3 grid over lng [174.0, 174.4], lat [-37.3, -37.0], 0.1 deg pixels.
    /// Cell value = row * 10 + col, except (col 3, row 2) which is invalid.
    pub(crate) fn grid_raster() -> GeoRaster {
        let mut values = Vec::new();
        for row in 0..3 {
            for col in 0..4 {
                values.push((row * 10 + col) as f64);
            }
        }
        values[2 * 4 + 3] = f64::NAN;
        GeoRaster::new(4, 3, 0.1, 0.1, 174.0, 174.4, -37.3, -37.0, values).unwrap()
    }

    #[test]
    fn samples_north_up_pixels() {
        let dem = grid_raster();

        // Top-left cell
        assert_eq!(dem.sample(GeoPoint::new(-37.01, 174.01)), Sample::Elevation(0.0));
        // Row 1, col 2
        assert_eq!(dem.sample(GeoPoint::new(-37.15, 174.25)), Sample::Elevation(12.0));
        // Row 2, col 0 (southern row)
        assert_eq!(dem.sample(GeoPoint::new(-37.29, 174.05)), Sample::Elevation(20.0));
    }

    #[test]
    fn legitimate_zero_is_not_no_data() {
        let dem = grid_raster();
        let s = dem.sample(GeoPoint::new(-37.01, 174.01));
        assert_ne!(s, Sample::NoData);
        assert_eq!(s.value(), Some(0.0));
    }

    #[test]
    fn outside_bounding_box_is_no_data() {
        let dem = grid_raster();
        let outside = [
            GeoPoint::new(-36.99, 174.2),
            GeoPoint::new(-37.31, 174.2),
            GeoPoint::new(-37.1, 173.99),
            GeoPoint::new(-37.1, 174.41),
            GeoPoint::new(f64::NAN, 174.2),
        ];
        for p in outside {
            assert_eq!(dem.sample(p), Sample::NoData, "{:?}", p);
        }
    }

    #[test]
    fn east_and_south_edges_fall_off_the_grid() {
        let dem = GeoRaster::new(2, 2, 1.0, 1.0, 0.0, 2.0, 0.0, 2.0, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        // Exactly on xmax maps to col == width
        assert_eq!(dem.sample(GeoPoint::new(1.5, 2.0)), Sample::NoData);
        // Exactly on ymin maps to row == height
        assert_eq!(dem.sample(GeoPoint::new(0.0, 0.5)), Sample::NoData);
        // North-west corner is the first cell
        assert_eq!(dem.sample(GeoPoint::new(2.0, 0.0)), Sample::Elevation(1.0));
    }

    #[test]
    fn invalid_cell_is_no_data() {
        let dem = grid_raster();
        assert_eq!(dem.sample(GeoPoint::new(-37.25, 174.35)), Sample::NoData);
        assert_eq!(Sample::NoData.or_zero(), 0.0);
    }

    #[test]
    fn absent_raster_never_fails() {
        assert_eq!(sample(None, GeoPoint::new(-36.883, 174.7804)), Sample::NoData);
    }

    #[test]
    fn decoded_payload_keeps_band_zero() {
        let decoded = DecodedRaster {
            width: 2,
            height: 2,
            pixel_width: 1.0,
            pixel_height: 1.0,
            xmin: 0.0,
            xmax: 2.0,
            ymin: 0.0,
            ymax: 2.0,
            values: vec![
                vec![vec![Some(5.0), None], vec![Some(7.0), Some(8.0)]],
                vec![vec![Some(99.0), Some(99.0)], vec![Some(99.0), Some(99.0)]],
            ],
        };
        let dem = GeoRaster::from_decoded(decoded).unwrap();

        assert_eq!(dem.sample(GeoPoint::new(1.5, 0.5)), Sample::Elevation(5.0));
        assert_eq!(dem.sample(GeoPoint::new(1.5, 1.5)), Sample::NoData);
        assert_eq!(dem.sample(GeoPoint::new(0.5, 1.5)), Sample::Elevation(8.0));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        let base = DecodedRaster {
            width: 2,
            height: 1,
            pixel_width: 1.0,
            pixel_height: 1.0,
            xmin: 0.0,
            xmax: 2.0,
            ymin: 0.0,
            ymax: 1.0,
            values: vec![vec![vec![Some(1.0), Some(2.0)]]],
        };

        let mut no_bands = base.clone();
        no_bands.values.clear();
        assert_eq!(GeoRaster::from_decoded(no_bands).unwrap_err(), RasterError::MissingBand);

        let mut short_row = base.clone();
        short_row.values[0][0].pop();
        assert!(matches!(
            GeoRaster::from_decoded(short_row),
            Err(RasterError::RowLengthMismatch { row: 0, .. })
        ));

        let mut zero_pixel = base.clone();
        zero_pixel.pixel_width = 0.0;
        assert!(matches!(
            GeoRaster::from_decoded(zero_pixel),
            Err(RasterError::InvalidPixelSize { .. })
        ));

        let mut empty = base;
        empty.width = 0;
        assert!(matches!(
            GeoRaster::from_decoded(empty),
            Err(RasterError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn oversized_header_is_rejected_before_allocating() {
        let decoded = DecodedRaster {
            width: u32::MAX,
            height: 1,
            pixel_width: 1.0,
            pixel_height: 1.0,
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            values: vec![vec![vec![Some(1.0)]]],
        };
        // 32-bit targets overflow the cell count, 64-bit ones hit the row check
        assert!(matches!(
            GeoRaster::from_decoded(decoded),
            Err(RasterError::RowLengthMismatch { row: 0, found: 1, .. })
                | Err(RasterError::TooManyCells { .. })
        ));
    }

    #[test]
    fn cell_count_overflow_is_an_error() {
        let err = GeoRaster::new(usize::MAX, 2, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, Vec::new()).unwrap_err();
        assert_eq!(err, RasterError::TooManyCells { width: usize::MAX, height: 2 });

        let err = GeoRaster::new(65536, 65536, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            RasterError::RowCountMismatch { found: 0, .. } | RasterError::TooManyCells { .. }
        ));
    }

    #[test]
    fn projected_heuristic_uses_xmin_magnitude() {
        assert!(!grid_raster().is_projected());

        let utm = GeoRaster::new(1, 1, 1.0, 1.0, 300_000.0, 300_001.0, 5_900_000.0, 5_900_001.0, vec![3.0])
            .unwrap();
        assert!(utm.is_projected());
        // Lat/lng clicks still get a lookup attempt, which misses
        assert_eq!(utm.sample(GeoPoint::new(-36.88, 174.78)), Sample::NoData);
    }

    #[test]
    fn preview_stats_skip_invalid_cells() {
        let stats = grid_raster().preview_stats().unwrap();
        // rows 0,2 x cols 0,2 -> 0, 2, 20, 22
        assert_eq!(stats.valid_samples, 4);
        assert_eq!(stats.min_elevation, 0.0);
        assert_eq!(stats.max_elevation, 22.0);
        assert_eq!(stats.range, 22.0);

        let empty = GeoRaster::new(1, 1, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, vec![f64::NAN]).unwrap();
        assert!(empty.preview_stats().is_none());
    }
}
