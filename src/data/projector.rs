use super::model::{Dataset, DatasetKind, OccupationRecord};
use crate::session::Selection;

/// One `(year, value)` sample of a chart line.
pub type SeriesPoint = (i32, f64);

/// Chart-ready series for one selected occupation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSeries {
    pub record: OccupationRecord,
    pub cdf: Vec<SeriesPoint>,
    pub pdf: Vec<SeriesPoint>,
}

impl ProjectedSeries {
    pub fn title(&self) -> &str {
        &self.record.title
    }

    /// Datasets in which the title was not found (the side is left empty).
    pub fn misses(&self) -> Vec<DatasetKind> {
        let mut out = Vec::new();
        if self.cdf.is_empty() {
            out.push(DatasetKind::Cdf);
        }
        if self.pdf.is_empty() {
            out.push(DatasetKind::Pdf);
        }
        out
    }
}

/// Join the selection against both datasets, in selection order.
///
/// Each side is looked up by title independently; a miss yields an empty
/// series for that side and never an error.
pub fn project(selection: &Selection, cdf: &Dataset, pdf: &Dataset) -> Vec<ProjectedSeries> {
    selection
        .iter()
        .map(|record| ProjectedSeries {
            record: record.clone(),
            cdf: series_for(cdf, &record.title),
            pdf: series_for(pdf, &record.title),
        })
        .collect()
}

/// Positional year mapping: value column `k` → `first_year + k`.
fn series_for(dataset: &Dataset, title: &str) -> Vec<SeriesPoint> {
    match dataset.find_by_title(title) {
        Some(row) => row
            .values
            .iter()
            .enumerate()
            .map(|(k, &v)| (dataset.kind.year_at(k), v))
            .collect(),
        None => {
            log::debug!("Lookup miss: '{title}' not in {} dataset", dataset.kind);
            Vec::new()
        }
    }
}
