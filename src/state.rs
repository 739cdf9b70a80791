use std::ops::Range;

use crate::color::SeriesPalette;
use crate::config::Config;
use crate::data::filter::search_indices;
use crate::data::loader::LoadError;
use crate::data::model::{DatasetKind, OccupationRecord};
use crate::data::paging::{page_bounds, page_count};
use crate::data::projector::{project, ProjectedSeries};
use crate::data::store::DatasetStore;
use crate::export::{self, ExportError, ExportFormat, ExportScope, Exported};
use crate::session::Session;

// ---------------------------------------------------------------------------
// User intents
// ---------------------------------------------------------------------------

/// Which main view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Search,
    Browse,
}

/// One export button: which table, whole or selected, which encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub kind: DatasetKind,
    pub scope: ExportScope,
    pub format: ExportFormat,
}

/// Something the user did during a frame; applied after rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search(String),
    Add(OccupationRecord),
    Remove(String),
    Clear,
    SetPage(usize),
    SetTab(Tab),
    Export(ExportRequest),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded tables (None when startup loading failed).
    pub store: Option<DatasetStore>,

    /// Startup failure; rendering halts on the diagnostic while set.
    pub load_error: Option<LoadError>,

    /// Per-user selection, search term and browse page.
    pub session: Session,

    /// Indices into the CDF table matching the current search term (cached).
    pub search_hits: Vec<usize>,

    pub palette: SeriesPalette,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config, loaded: Result<DatasetStore, LoadError>) -> Self {
        let (store, load_error) = match loaded {
            Ok(store) => (Some(store), None),
            Err(e) => {
                log::error!("Failed to load datasets: {e}");
                (None, Some(e))
            }
        };
        let mut state = Self {
            config,
            store,
            load_error,
            session: Session::default(),
            search_hits: Vec::new(),
            palette: SeriesPalette::default(),
            tab: Tab::default(),
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Apply a user intent.
    ///
    /// Exports need the save dialog, which the caller owns, so they are handed
    /// back instead of being applied here.
    #[must_use = "export requests are returned for the caller to run"]
    pub fn apply(&mut self, action: Action) -> Option<ExportRequest> {
        match action {
            Action::Search(term) => self.set_search_term(term),
            Action::Add(record) => self.session.update_selection(|s| s.add(record)),
            Action::Remove(title) => self.session.update_selection(|s| s.remove(&title)),
            Action::Clear => self.session.update_selection(|s| s.clear()),
            Action::SetPage(page) => self.set_page(page),
            Action::SetTab(tab) => self.tab = tab,
            Action::Export(req) => return Some(req),
        }
        None
    }

    pub fn set_search_term(&mut self, term: String) {
        self.session.search_term = term;
        self.refilter();
    }

    /// Recompute `search_hits` after the term changed.
    pub fn refilter(&mut self) {
        if let Some(store) = &self.store {
            let term = self.session.search_term.as_str();
            self.search_hits = search_indices(&store.cdf, Some(term));
            log::debug!("Search '{term}': {} hit(s)", self.search_hits.len());
        }
    }

    /// Total CDF records (the browse view lists the CDF table).
    pub fn total_records(&self) -> usize {
        self.store.as_ref().map(|s| s.cdf.len()).unwrap_or(0)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total_records(), self.config.items_per_page)
    }

    pub fn set_page(&mut self, page: usize) {
        let last = self.page_count().saturating_sub(1);
        self.session.page = page.min(last);
    }

    /// Row indices shown on the current browse page.
    pub fn page_range(&self) -> Range<usize> {
        page_bounds(
            self.total_records(),
            self.config.items_per_page,
            self.session.page,
        )
    }

    /// Chart series for the current selection.
    pub fn projection(&self) -> Vec<ProjectedSeries> {
        match &self.store {
            Some(store) => project(&self.session.selection, &store.cdf, &store.pdf),
            None => Vec::new(),
        }
    }

    /// Selected titles that are absent from the CDF table.
    pub fn stale_titles(&self) -> Vec<String> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        self.session
            .selection
            .missing_from(&store.cdf)
            .into_iter()
            .map(|r| r.title.clone())
            .collect()
    }

    /// Encode the table an export button refers to.
    pub fn export(&self, req: ExportRequest) -> Result<Option<Exported>, ExportError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let dataset = store.dataset(req.kind);
        let exported = match req.scope {
            ExportScope::Full => export::serialize(dataset, req.scope, req.format)?,
            ExportScope::Selected => {
                export::export_selected(dataset, &self.session.selection, req.format)?
            }
        };
        Ok(Some(exported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dataset, Row};

    fn store(n: usize) -> DatasetStore {
        let rows = |kind: DatasetKind| {
            (0..n)
                .map(|i| Row {
                    record: OccupationRecord::new(format!("11-{i:04}"), format!("Occupation {i}")),
                    values: vec![0.0; kind.expected_points()],
                })
                .collect::<Vec<_>>()
        };
        let headers = |kind: DatasetKind| {
            let mut h = vec!["SOC Code".to_string(), "Title".to_string()];
            h.extend((0..kind.expected_points()).map(|k| kind.year_at(k).to_string()));
            h
        };
        DatasetStore {
            cdf: Dataset::new(DatasetKind::Cdf, headers(DatasetKind::Cdf), rows(DatasetKind::Cdf)),
            pdf: Dataset::new(DatasetKind::Pdf, headers(DatasetKind::Pdf), rows(DatasetKind::Pdf)),
            cdf_source: "cdf".into(),
            pdf_source: "pdf".into(),
        }
    }

    fn apply_all(state: &mut AppState, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            assert_eq!(state.apply(action), None);
        }
    }

    #[test]
    fn selection_survives_repeated_searches() {
        let mut state = AppState::new(Config::default(), Ok(store(5)));
        apply_all(
            &mut state,
            [
                Action::Search("occupation 1".into()),
                Action::Add(OccupationRecord::new("11-0001", "Occupation 1")),
                Action::Search("occupation 3".into()),
                Action::Add(OccupationRecord::new("11-0003", "Occupation 3")),
                Action::Search(String::new()),
            ],
        );
        let titles: Vec<_> = state.session.selection.titles().collect();
        assert_eq!(titles, vec!["Occupation 1", "Occupation 3"]);
        assert_eq!(state.search_hits.len(), 5);
    }

    #[test]
    fn page_is_clamped_to_last_page() {
        let mut state = AppState::new(Config::default(), Ok(store(41)));
        apply_all(&mut state, [Action::SetPage(99)]);
        assert_eq!(state.session.page, 2);
        assert_eq!(state.page_range(), 40..41);
    }

    #[test]
    fn selected_export_names_file_by_scope() {
        let mut state = AppState::new(Config::default(), Ok(store(3)));
        apply_all(
            &mut state,
            [Action::Add(OccupationRecord::new("11-0002", "Occupation 2"))],
        );
        let out = state
            .export(ExportRequest {
                kind: DatasetKind::Pdf,
                scope: ExportScope::Selected,
                format: ExportFormat::Csv,
            })
            .unwrap()
            .unwrap();
        assert_eq!(out.filename, "Selected_PDF_Data.csv");
        assert_eq!(String::from_utf8(out.bytes).unwrap().lines().count(), 2);
    }

    #[test]
    fn export_action_is_handed_back() {
        let mut state = AppState::new(Config::default(), Ok(store(2)));
        let req = ExportRequest {
            kind: DatasetKind::Cdf,
            scope: ExportScope::Full,
            format: ExportFormat::Spreadsheet,
        };
        assert_eq!(state.apply(Action::Export(req)), Some(req));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn stale_selection_is_reported_but_still_projected() {
        let mut state = AppState::new(Config::default(), Ok(store(3)));
        apply_all(
            &mut state,
            [
                Action::Add(OccupationRecord::new("99-9999", "Retired Occupation")),
                Action::Add(OccupationRecord::new("11-0001", "Occupation 1")),
            ],
        );
        assert_eq!(state.stale_titles(), vec!["Retired Occupation".to_string()]);

        let projected = state.projection();
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].title(), "Retired Occupation");
        assert!(projected[0].cdf.is_empty() && projected[0].pdf.is_empty());
        assert_eq!(projected[1].cdf.len(), DatasetKind::Cdf.expected_points());
    }

    #[test]
    fn failed_load_keeps_error_and_no_store() {
        let err = LoadError::NotFound {
            kind: DatasetKind::Cdf,
            tried: vec!["Probas CDFs.xlsx".into()],
            found: Vec::new(),
            searched: ".".into(),
        };
        let state = AppState::new(Config::default(), Err(err));
        assert!(state.store.is_none());
        assert!(state.load_error.is_some());
        assert!(state.projection().is_empty());
    }
}
