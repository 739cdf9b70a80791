//! Resolve dataset files in a directory when no explicit path is configured.
//!
//! Resolution runs an ordered list of [`Matcher`]s; the first one that
//! yields a file wins. The defaults try a fixed set of exact names first and
//! then fall back to a substring match over the spreadsheet files present.

use std::path::{Path, PathBuf};

use super::loader::LoadError;
use super::model::DatasetKind;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// One step of the resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// A file with exactly this name exists in the directory.
    Exact(String),
    /// First spreadsheet file (sorted by name) whose lowercase name contains the needle.
    Contains(String),
}

impl Matcher {
    fn describe(&self) -> String {
        match self {
            Matcher::Exact(name) => name.clone(),
            Matcher::Contains(needle) => format!("*{needle}*.xlsx|xls"),
        }
    }

    fn pick(&self, dir: &Path, spreadsheets: &[String]) -> Option<PathBuf> {
        match self {
            Matcher::Exact(name) => {
                let path = dir.join(name);
                path.is_file().then_some(path)
            }
            Matcher::Contains(needle) => {
                let needle = needle.to_lowercase();
                spreadsheets
                    .iter()
                    .find(|f| f.to_lowercase().contains(&needle))
                    .map(|f| dir.join(f))
            }
        }
    }
}

/// Ordered resolution strategy for one dataset.
#[derive(Debug, Clone)]
pub struct Resolver {
    pub kind: DatasetKind,
    pub matchers: Vec<Matcher>,
}

impl Resolver {
    pub fn new(kind: DatasetKind, matchers: Vec<Matcher>) -> Self {
        Self { kind, matchers }
    }

    /// Default strategy: the known file-name variants, then a substring fallback.
    pub fn default_for(kind: DatasetKind) -> Self {
        let (stem, needle) = match kind {
            DatasetKind::Cdf => ("CDFs", "cdf"),
            DatasetKind::Pdf => ("PDFs", "pdf"),
        };
        let upper = stem.to_uppercase();
        let lower = stem.to_lowercase();
        let mut matchers: Vec<Matcher> = [
            format!("Probas {stem}.xlsx"),
            format!("Probas_{stem}.xlsx"),
            format!("probas {lower}.xlsx"),
            format!("probas_{lower}.xlsx"),
            format!("PROBAS {upper}.xlsx"),
        ]
        .into_iter()
        .map(Matcher::Exact)
        .collect();
        matchers.push(Matcher::Contains(needle.to_string()));
        Self::new(kind, matchers)
    }

    /// Run the matchers against `dir` in order.
    pub fn resolve(&self, dir: &Path) -> Result<PathBuf, LoadError> {
        let spreadsheets = list_spreadsheets(dir);
        for matcher in &self.matchers {
            if let Some(path) = matcher.pick(dir, &spreadsheets) {
                log::debug!("{} resolved by {:?} → {}", self.kind, matcher, path.display());
                return Ok(path);
            }
        }
        Err(LoadError::NotFound {
            kind: self.kind,
            tried: self.matchers.iter().map(Matcher::describe).collect(),
            found: spreadsheets,
            searched: dir.to_path_buf(),
        })
    }
}

/// Spreadsheet file names in `dir`, sorted. Unreadable directories list as empty.
pub fn list_spreadsheets(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::warn!("Cannot list {}", dir.display());
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn exact_name_wins_over_substring() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a_cdf_backup.xlsx");
        touch(dir.path(), "Probas_CDFs.xlsx");
        let path = Resolver::default_for(DatasetKind::Cdf).resolve(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Probas_CDFs.xlsx");
    }

    #[test]
    fn substring_fallback_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "My_PDF_Table.XLSX");
        let path = Resolver::default_for(DatasetKind::Pdf).resolve(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "My_PDF_Table.XLSX");
    }

    #[test]
    fn substring_fallback_ignores_non_spreadsheets() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cdf.csv");
        assert!(Resolver::default_for(DatasetKind::Cdf).resolve(dir.path()).is_err());
    }

    #[test]
    fn not_found_reports_tried_and_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "other.xlsx");
        match Resolver::default_for(DatasetKind::Cdf).resolve(dir.path()) {
            Err(LoadError::NotFound { kind, tried, found, searched }) => {
                assert_eq!(kind, DatasetKind::Cdf);
                assert_eq!(searched, dir.path());
                assert_eq!(tried.len(), 6);
                assert_eq!(tried[0], "Probas CDFs.xlsx");
                assert_eq!(found, vec!["other.xlsx".to_string()]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn custom_matchers_run_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.xlsx");
        touch(dir.path(), "a.xlsx");
        let resolver = Resolver::new(
            DatasetKind::Cdf,
            vec![Matcher::Exact("b.xlsx".into()), Matcher::Contains("a".into())],
        );
        let path = resolver.resolve(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "b.xlsx");
    }
}
