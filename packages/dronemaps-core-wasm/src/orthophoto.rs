// Orthophoto pixel values to CSS colors for the raster layer
fn in_byte_range(v: f64) -> bool {
    (0.0..=255.0).contains(&v)
}

/// CSS color for one orthophoto pixel, or `None` for a transparent
/// (no-data) pixel.
///
/// Three or more bands are read as RGB, black being the no-data value. A
/// single band is drawn as grey with 0 as no-data. Channels outside 0..=255
/// also mark the pixel as no-data.
pub fn pixel_color(values: &[f64]) -> Option<String> {
    match values {
        [r, g, b, ..] => {
            let (r, g, b) = (*r, *g, *b);
            if (r == 0.0 && g == 0.0 && b == 0.0) || ![r, g, b].iter().all(|c| in_byte_range(*c)) {
                return None;
            }
            Some(format!("rgb({}, {}, {})", r.round(), g.round(), b.round()))
        }
        [v, ..] => {
            let v = *v;
            if v == 0.0 || !in_byte_range(v) {
                return None;
            }
            let grey = v.round();
            Some(format!("rgb({}, {}, {})", grey, grey, grey))
        }
        [] => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_pixels() {
        assert_eq!(pixel_color(&[12.4, 200.0, 99.6]).as_deref(), Some("rgb(12, 200, 100)"));
        // Alpha band ignored
        assert_eq!(pixel_color(&[1.0, 2.0, 3.0, 255.0]).as_deref(), Some("rgb(1, 2, 3)"));
    }

    #[test]
    fn black_and_out_of_range_are_transparent() {
        assert_eq!(pixel_color(&[0.0, 0.0, 0.0]), None);
        assert_eq!(pixel_color(&[256.0, 10.0, 10.0]), None);
        assert_eq!(pixel_color(&[10.0, -1.0, 10.0]), None);
        assert_eq!(pixel_color(&[f64::NAN, 10.0, 10.0]), None);
    }

    #[test]
    fn single_band_is_grey() {
        assert_eq!(pixel_color(&[127.6]).as_deref(), Some("rgb(128, 128, 128)"));
        assert_eq!(pixel_color(&[0.0]), None);
        assert_eq!(pixel_color(&[300.0]), None);
        assert_eq!(pixel_color(&[]), None);
    }
}
