use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::data::discovery::Resolver;
use crate::data::loader::{DataSource, LoadError};
use crate::data::model::DatasetKind;
use crate::data::paging::DEFAULT_ITEMS_PER_PAGE;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "automation-dashboard.json";

/// Where the datasets live and how the browse view pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Explicit CDF file; discovery runs in `data_dir` when unset.
    pub cdf_path: Option<PathBuf>,
    /// Explicit PDF file; discovery runs in `data_dir` when unset.
    pub pdf_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub items_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cdf_path: None,
            pdf_path: None,
            data_dir: PathBuf::from("."),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading config {}", path_ref.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path_ref.display()))?;
        anyhow::ensure!(
            config.items_per_page > 0,
            "itemsPerPage must be at least 1 in {}",
            path_ref.display()
        );
        Ok(config)
    }

    /// Explicit file if given, else `DEFAULT_CONFIG_FILE` if present, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Layer command-line values over the file values.
    pub fn with_overrides(
        mut self,
        cdf: Option<PathBuf>,
        pdf: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        if cdf.is_some() {
            self.cdf_path = cdf;
        }
        if pdf.is_some() {
            self.pdf_path = pdf;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    fn explicit_path(&self, kind: DatasetKind) -> Option<&PathBuf> {
        match kind {
            DatasetKind::Cdf => self.cdf_path.as_ref(),
            DatasetKind::Pdf => self.pdf_path.as_ref(),
        }
    }

    /// Configured path, or the discovery result in `data_dir`.
    pub fn resolve_source(&self, kind: DatasetKind) -> Result<DataSource, LoadError> {
        let path = match self.explicit_path(kind) {
            Some(path) => path.clone(),
            None => Resolver::default_for(kind).resolve(&self.data_dir)?,
        };
        Ok(DataSource::File(path))
    }
}
