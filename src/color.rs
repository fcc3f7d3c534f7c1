use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

/// Comparison bar colours, in the order of `ColumnRoles::comparison_metrics`.
pub const METRIC_COLORS: [&str; 3] = ["#3F8FC4", "#E74C3C", "#08306B"];
pub const HISTOGRAM_COLOR: &str = "#3498DB";
pub const SCATTER_COLOR: &str = "#E74C3C";
/// Heatmap cells whose correlation is undefined.
pub const UNDEFINED_COLOR: Color32 = Color32::from_gray(200);

/// Parse `#rrggbb`. Unparseable input falls back to grey.
pub fn hex(code: &str) -> Color32 {
    match code.parse::<Srgb<u8>>() {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("bad colour {code:?}: {e}");
            Color32::GRAY
        }
    }
}

/// Colour of the `index`-th comparison metric.
pub fn metric_color(index: usize) -> Color32 {
    METRIC_COLORS
        .get(index)
        .map_or(Color32::GRAY, |code| hex(code))
}

// ---------------------------------------------------------------------------
// Continuous colour scale
// ---------------------------------------------------------------------------

/// ColorBrewer "Blues", light to dark.
const BLUES: [(u8, u8, u8); 9] = [
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

/// Maps a numeric range onto evenly spaced colour stops, interpolating in
/// linear sRGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    min: f64,
    max: f64,
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    pub fn blues(min: f64, max: f64) -> Self {
        let stops = BLUES
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { min, max, stops }
    }

    /// Colour for `value`; values outside the range are clamped and `NaN`
    /// gets [`UNDEFINED_COLOR`].
    pub fn color_for(&self, value: f64) -> Color32 {
        if value.is_nan() {
            return UNDEFINED_COLOR;
        }
        let span = self.max - self.min;
        let t = if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let last = self.stops.len() - 1;
        let pos = t as f32 * last as f32;
        let i = (pos.floor() as usize).min(last.saturating_sub(1));
        let mixed = self.stops[i].mix(self.stops[i + 1], pos - i as f32);

        let srgb: Srgb = Srgb::from_linear(mixed);
        let rgb: Srgb<u8> = srgb.into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metric_hex_codes() {
        assert_eq!(hex("#3F8FC4"), Color32::from_rgb(0x3F, 0x8F, 0xC4));
        assert_eq!(metric_color(2), Color32::from_rgb(0x08, 0x30, 0x6B));
        assert_eq!(metric_color(7), Color32::GRAY);
        assert_eq!(hex("not a colour"), Color32::GRAY);
    }

    #[test]
    fn scale_endpoints_and_clamping() {
        let scale = ColorScale::blues(-1.0, 1.0);
        assert_eq!(scale.color_for(-1.0), Color32::from_rgb(247, 251, 255));
        assert_eq!(scale.color_for(1.0), Color32::from_rgb(8, 48, 107));
        assert_eq!(scale.color_for(5.0), scale.color_for(1.0));
        assert_eq!(scale.color_for(f64::NAN), UNDEFINED_COLOR);
    }

    #[test]
    fn darker_for_larger_values() {
        let scale = ColorScale::blues(0.0, 100.0);
        let light = scale.color_for(10.0);
        let dark = scale.color_for(90.0);
        assert!(dark.r() < light.r());
        assert!(dark.b() < light.b());
    }
}
