// Human-readable measurement text for the result panel
use crate::measurement::{AreaSummary, DistanceSummary, Summary};
use crate::raster::RasterInfo;
use crate::session::{MeasurementMode, MeasurementReport};

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.2} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

pub fn format_area(square_meters: f64) -> String {
    if square_meters < SQUARE_METERS_PER_HECTARE {
        format!("{:.2} m²", square_meters)
    } else {
        format!("{:.2} hectares", square_meters / SQUARE_METERS_PER_HECTARE)
    }
}

/// Byte count scaled by 1024, at most two decimals, trailing zeros dropped.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

fn elevation_suffix(dem_present: bool) -> &'static str {
    if dem_present {
        "(3D mode enabled)"
    } else {
        "(2D mode - no elevation data)"
    }
}

/// Prompt shown right after a mode is selected.
pub fn mode_prompt(mode: MeasurementMode, dem: Option<&RasterInfo>) -> Option<String> {
    match mode {
        MeasurementMode::Idle => None,
        MeasurementMode::Distance => {
            let mut text = format!(
                "Click on the map to start measuring distance. {}",
                elevation_suffix(dem.is_some())
            );
            if let Some(info) = dem {
                text.push_str(&format!(
                    "\nDEM: {}x{}, bounds: {:.2} to {:.2}",
                    info.width, info.height, info.xmin, info.xmax
                ));
            }
            Some(text)
        }
        MeasurementMode::Area => Some(format!(
            "Click on the map to start measuring area (minimum 3 points). {}",
            elevation_suffix(dem.is_some())
        )),
    }
}

pub fn awaiting_points(mode: MeasurementMode, placed: usize) -> Option<String> {
    match mode {
        MeasurementMode::Idle => None,
        MeasurementMode::Distance => Some(format!(
            "Click on the map to place points. {}/2 points placed.",
            placed
        )),
        MeasurementMode::Area => Some(format!(
            "Click on the map to place points. {}/3+ points placed.",
            placed
        )),
    }
}

/// Result panel lines; the 3D layout needs at least one sampled elevation.
pub fn distance_report(summary: &DistanceSummary) -> Vec<String> {
    if summary.has_elevation {
        vec![
            format!("3D Distance: {}", format_distance(summary.total_distance_3d)),
            format!("2D Distance: {}", format_distance(summary.total_distance_2d)),
            format!("Elevation Gain: {:.2} m", summary.elevation_gain),
            format!("Elevation Loss: {:.2} m", summary.elevation_loss),
            format!(
                "Points: {} | Click to add more or press Clear to finish",
                summary.point_count
            ),
        ]
    } else {
        vec![
            format!("Distance: {}", format_distance(summary.total_distance_2d)),
            format!("Points: {} | 2D only (no elevation data)", summary.point_count),
        ]
    }
}

pub fn area_report(summary: &AreaSummary) -> Vec<String> {
    if summary.has_elevation {
        vec![
            format!("Area (2D): {}", format_area(summary.area_2d)),
            format!("Perimeter (3D): {}", format_distance(summary.perimeter_3d)),
            format!("Perimeter (2D): {}", format_distance(summary.perimeter_2d)),
            format!("Avg Elevation: {:.2} m", summary.average_elevation),
            format!("Points: {} | Click to add more", summary.point_count),
        ]
    } else {
        vec![
            format!("Area: {}", format_area(summary.area_2d)),
            format!("Perimeter: {}", format_distance(summary.perimeter_2d)),
            format!("Points: {} | 2D only (no elevation data)", summary.point_count),
        ]
    }
}

/// Result panel lines for a report produced after a click.
pub fn report_lines(report: &MeasurementReport) -> Vec<String> {
    match report {
        MeasurementReport::Idle => Vec::new(),
        MeasurementReport::Distance(Summary::NeedMorePoints { placed, .. }) => {
            awaiting_points(MeasurementMode::Distance, *placed).into_iter().collect()
        }
        MeasurementReport::Distance(Summary::Ready(summary)) => distance_report(summary),
        MeasurementReport::Area(Summary::NeedMorePoints { placed, .. }) => {
            awaiting_points(MeasurementMode::Area, *placed).into_iter().collect()
        }
        MeasurementReport::Area(Summary::Ready(summary)) => area_report(summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_switch_to_kilometers_at_one_thousand() {
        assert_eq!(format_distance(0.0), "0.00 m");
        assert_eq!(format_distance(999.994), "999.99 m");
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(2345.678), "2.35 km");
    }

    #[test]
    fn slope_distance_rounds_to_two_places() {
        let distance_3d = (50.0_f64 * 50.0 + 15.0 * 15.0).sqrt();
        assert_eq!(format_distance(distance_3d), "52.20 m");
    }

    #[test]
    fn areas_switch_to_hectares() {
        assert_eq!(format_area(9999.5), "9999.50 m²");
        assert_eq!(format_area(10_000.0), "1.00 hectares");
        assert_eq!(format_area(123_456.0), "12.35 hectares");
    }

    #[test]
    fn bytes_scale_by_1024() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 + 1024 * 1024 * 1024 / 4), "3.25 GB");
    }

    #[test]
    fn reports_follow_sampled_elevation() {
        let summary = DistanceSummary {
            point_count: 2,
            total_distance_2d: 50.0,
            total_distance_3d: 52.2,
            elevation_gain: 15.0,
            elevation_loss: 0.0,
            has_elevation: true,
            dem_present: true,
        };
        let lines = distance_report(&summary);
        assert_eq!(lines[0], "3D Distance: 52.20 m");
        assert_eq!(lines[2], "Elevation Gain: 15.00 m");

        let flat = DistanceSummary {
            dem_present: false,
            has_elevation: false,
            ..summary.clone()
        };
        let lines = distance_report(&flat);
        assert_eq!(lines, vec![
            "Distance: 50.00 m".to_string(),
            "Points: 2 | 2D only (no elevation data)".to_string(),
        ]);

        // DEM loaded but every click fell outside it
        let off_dem = DistanceSummary {
            total_distance_3d: 50.0,
            elevation_gain: 0.0,
            has_elevation: false,
            ..summary
        };
        assert_eq!(distance_report(&off_dem), lines);
    }

    #[test]
    fn area_report_with_dem_but_no_samples_is_2d() {
        let summary = AreaSummary {
            point_count: 3,
            area_2d: 500.0,
            perimeter_2d: 100.0,
            perimeter_3d: 100.0,
            average_elevation: 0.0,
            has_elevation: false,
            dem_present: true,
        };
        assert_eq!(area_report(&summary)[0], "Area: 500.00 m²");
        assert_eq!(area_report(&summary).len(), 3);

        let sampled = AreaSummary {
            has_elevation: true,
            average_elevation: 12.5,
            ..summary
        };
        let lines = area_report(&sampled);
        assert_eq!(lines[0], "Area (2D): 500.00 m²");
        assert_eq!(lines[3], "Avg Elevation: 12.50 m");
    }

    #[test]
    fn area_report_without_dem_has_three_lines() {
        let summary = AreaSummary {
            point_count: 4,
            area_2d: 20_000.0,
            perimeter_2d: 600.0,
            perimeter_3d: 600.0,
            average_elevation: 0.0,
            has_elevation: false,
            dem_present: false,
        };
        assert_eq!(area_report(&summary), vec![
            "Area: 2.00 hectares".to_string(),
            "Perimeter: 600.00 m".to_string(),
            "Points: 4 | 2D only (no elevation data)".to_string(),
        ]);
    }

    #[test]
    fn prompts_mention_elevation_mode() {
        assert_eq!(mode_prompt(MeasurementMode::Idle, None), None);
        assert_eq!(
            mode_prompt(MeasurementMode::Area, None).unwrap(),
            "Click on the map to start measuring area (minimum 3 points). (2D mode - no elevation data)"
        );
        assert_eq!(
            awaiting_points(MeasurementMode::Distance, 1).unwrap(),
            "Click on the map to place points. 1/2 points placed."
        );
    }

    #[test]
    fn report_lines_cover_each_state() {
        assert!(report_lines(&MeasurementReport::Idle).is_empty());

        let waiting = MeasurementReport::Area(Summary::NeedMorePoints { placed: 1, required: 3, remaining: 2 });
        assert_eq!(
            report_lines(&waiting),
            vec!["Click on the map to place points. 1/3+ points placed.".to_string()]
        );
    }
}
