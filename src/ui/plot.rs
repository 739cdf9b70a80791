use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::SeriesPalette;
use crate::data::model::DatasetKind;
use crate::data::projector::{ProjectedSeries, SeriesPoint};

const LEGEND_MAX_CHARS: usize = 30;
const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Probability charts (central panel)
// ---------------------------------------------------------------------------

/// Legend label: titles longer than 30 characters are cut and suffixed `...`.
pub fn legend_name(title: &str) -> String {
    if title.chars().count() > LEGEND_MAX_CHARS {
        let cut: String = title.chars().take(LEGEND_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

/// Render one chart for the given side of the projection.
pub fn probability_plot(
    ui: &mut Ui,
    kind: DatasetKind,
    series: &[ProjectedSeries],
    palette: &SeriesPalette,
) {
    let (heading, y_label) = match kind {
        DatasetKind::Cdf => (
            "Cumulative Distribution Function (CDF) - Automation Probability Over Time",
            "Cumulative Probability",
        ),
        DatasetKind::Pdf => (
            "Probability Density Function (PDF) - Annual Automation Probability",
            "Annual Probability",
        ),
    };
    ui.strong(heading);

    Plot::new(format!("{kind}_plot"))
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Colour follows selection position, even when a side is missing.
            for (position, entry) in series.iter().enumerate() {
                let samples: &[SeriesPoint] = match kind {
                    DatasetKind::Cdf => &entry.cdf,
                    DatasetKind::Pdf => &entry.pdf,
                };
                if samples.is_empty() {
                    continue;
                }

                let color = palette.color_for(position);
                let name = legend_name(entry.title());
                let points: Vec<[f64; 2]> = samples
                    .iter()
                    .filter(|(_, v)| v.is_finite())
                    .map(|&(year, v)| [year as f64, v])
                    .collect();

                plot_ui.line(
                    Line::new(points.iter().copied().collect::<PlotPoints>())
                        .name(&name)
                        .color(color)
                        .width(2.5),
                );
                plot_ui.points(
                    Points::new(points.into_iter().collect::<PlotPoints>())
                        .name(&name)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}
