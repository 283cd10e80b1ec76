use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::options::{RATING_ORDER, rating_rank};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(hue, 0.75, 0.55)
        })
        .collect()
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Rating colours
// ---------------------------------------------------------------------------

/// Colour for a credit rating: green for the best grade fading to red for
/// the worst; grey for grades outside the scale.
pub fn rating_color(rating: &str) -> Color32 {
    match rating_rank(rating) {
        Some(rank) => {
            let t = rank as f32 / (RATING_ORDER.len() - 1) as f32;
            // 130° (green) → 0° (red)
            hsl_to_color32(130.0 * (1.0 - t), 0.65, 0.45)
        }
        None => Color32::GRAY,
    }
}

/// Colour of the `i`-th series of a chart. Single-series charts use the
/// accent colour so bars look alike across charts.
pub fn series_color(i: usize, n: usize) -> Color32 {
    if n <= 1 {
        return ACCENT;
    }
    generate_palette(n).get(i).copied().unwrap_or(ACCENT)
}

/// Royal blue, the bar colour of the company charts.
pub const ACCENT: Color32 = Color32::from_rgb(65, 105, 225);

/// KPI card background.
pub const KPI_FILL: Color32 = Color32::from_rgb(102, 126, 234);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[2]);
    }

    #[test]
    fn ratings_run_from_green_to_red() {
        let best = rating_color("AAA");
        let worst = rating_color("B-");
        assert!(best.g() > best.r());
        assert!(worst.r() > worst.g());
        assert_eq!(rating_color("SC"), Color32::GRAY);
    }

    #[test]
    fn single_series_uses_accent() {
        assert_eq!(series_color(0, 1), ACCENT);
        assert_ne!(series_color(0, 2), series_color(1, 2));
    }
}
