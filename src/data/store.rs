use crate::config::Config;

use super::loader::{self, DataSource, LoadError};
use super::model::{Dataset, DatasetKind};

/// Both tables, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    pub cdf: Dataset,
    pub pdf: Dataset,
    /// Where each table came from, for the overview panel.
    pub cdf_source: String,
    pub pdf_source: String,
}

impl DatasetStore {
    /// Resolve both sources from `config` and load them.
    pub fn open(config: &Config) -> Result<Self, LoadError> {
        let cdf = config.resolve_source(DatasetKind::Cdf)?;
        let pdf = config.resolve_source(DatasetKind::Pdf)?;
        Self::from_sources(&cdf, &pdf)
    }

    pub fn from_sources(cdf: &DataSource, pdf: &DataSource) -> Result<Self, LoadError> {
        let (cdf_data, pdf_data) = loader::load(cdf, pdf)?;
        log::info!(
            "Dataset store ready: {} CDF rows, {} PDF rows",
            cdf_data.len(),
            pdf_data.len()
        );
        Ok(Self {
            cdf: cdf_data,
            pdf: pdf_data,
            cdf_source: cdf.name(),
            pdf_source: pdf.name(),
        })
    }

    pub fn dataset(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Cdf => &self.cdf,
            DatasetKind::Pdf => &self.pdf,
        }
    }
}
