use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Number of distinct line colours before the palette wraps around.
pub const SERIES_PALETTE_SIZE: usize = 12;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Selection position → Color32
// ---------------------------------------------------------------------------

/// Qualitative palette indexed by selection position.
///
/// Position `i` gets `colors[i % len]`, so a series keeps its colour as long
/// as its place in the selection does.
#[derive(Debug, Clone)]
pub struct SeriesPalette {
    colors: Vec<Color32>,
}

impl Default for SeriesPalette {
    fn default() -> Self {
        Self::new(SERIES_PALETTE_SIZE)
    }
}

impl SeriesPalette {
    pub fn new(size: usize) -> Self {
        // Interleave hues so neighbours in the selection are far apart on the wheel.
        let (even, odd): (Vec<_>, Vec<_>) = generate_palette(size.max(1))
            .into_iter()
            .enumerate()
            .partition(|(i, _)| i % 2 == 0);
        let colors = even.into_iter().chain(odd).map(|(_, c)| c).collect();
        SeriesPalette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour for the series at `position` in the selection.
    pub fn color_for(&self, position: usize) -> Color32 {
        self.colors[position % self.colors.len()]
    }
}
