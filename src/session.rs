//! Selection bookkeeping for one interactive session.
//!
//! [`Selection`] is a value: every transition consumes it and returns the
//! next one, so handlers thread it through explicitly instead of sharing a
//! mutable global. [`Session`] bundles it with the rest of the per-user
//! view state (search term, browse page).

use crate::data::model::{Dataset, OccupationRecord};

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Ordered set of chosen occupations, unique by title.
///
/// Position in the list drives display order and chart colour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<OccupationRecord>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` unless an entry with the same title is already present.
    #[must_use]
    pub fn add(mut self, record: OccupationRecord) -> Self {
        if !self.is_selected(&record.title) {
            log::debug!("Selection: add '{}'", record.title);
            self.entries.push(record);
        }
        self
    }

    /// Drop the entry with this title, if any.
    #[must_use]
    pub fn remove(mut self, title: &str) -> Self {
        if let Some(pos) = self.position(title) {
            log::debug!("Selection: remove '{title}'");
            self.entries.remove(pos);
        }
        self
    }

    #[must_use]
    pub fn clear(self) -> Self {
        Self::default()
    }

    pub fn is_selected(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    /// Index of the entry with this title.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|r| r.title == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OccupationRecord> {
        self.entries.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose title no longer exists in `dataset`. They are kept, not pruned.
    pub fn missing_from(&self, dataset: &Dataset) -> Vec<&OccupationRecord> {
        self.entries
            .iter()
            .filter(|r| dataset.find_by_title(&r.title).is_none())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Per-user interaction context. One instance per interactive user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub selection: Selection,
    pub search_term: String,
    /// 0-based browse page.
    pub page: usize,
}

impl Session {
    /// Apply a selection transition in place.
    pub fn update_selection(&mut self, f: impl FnOnce(Selection) -> Selection) {
        let current = std::mem::take(&mut self.selection);
        self.selection = f(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str) -> OccupationRecord {
        OccupationRecord::new(format!("code-{title}"), title)
    }

    fn order(sel: &Selection) -> Vec<&str> {
        sel.titles().collect()
    }

    #[test]
    fn add_is_idempotent_by_title() {
        let sel = Selection::new()
            .add(rec("A"))
            .add(OccupationRecord::new("other-code", "A"));
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.iter().next().unwrap().code, "code-A");
    }

    #[test]
    fn remove_then_add_moves_to_end() {
        let sel = Selection::new().add(rec("A")).add(rec("B"));
        let sel = sel.remove("A").add(rec("A"));
        assert_eq!(order(&sel), vec!["B", "A"]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let sel = Selection::new().add(rec("A"));
        assert_eq!(sel.clone().remove("Z"), sel);
    }

    #[test]
    fn clear_empties() {
        let sel = Selection::new().add(rec("A")).add(rec("B")).clear();
        assert!(sel.is_empty());
        assert!(!sel.is_selected("A"));
    }

    #[test]
    fn titles_stay_unique_under_mixed_operations() {
        let ops = ["A", "B", "A", "-A", "C", "B", "-C", "A", "C", "-B", "A"];
        let mut sel = Selection::new();
        for op in ops {
            sel = match op.strip_prefix('-') {
                Some(title) => sel.remove(title),
                None => sel.add(rec(op)),
            };
            let mut titles: Vec<_> = order(&sel);
            titles.sort();
            titles.dedup();
            assert_eq!(titles.len(), sel.len());
        }
        assert_eq!(order(&sel), vec!["A", "C"]);
    }

    #[test]
    fn missing_from_keeps_selection_order() {
        use crate::data::model::{DatasetKind, Row};

        let dataset = Dataset::new(
            DatasetKind::Cdf,
            vec!["SOC Code".into(), "Title".into(), "2017".into()],
            vec![Row {
                record: rec("Present"),
                values: vec![0.5],
            }],
        );
        let sel = Selection::new()
            .add(rec("Gone B"))
            .add(rec("Present"))
            .add(rec("Gone A"));

        let missing: Vec<_> = sel
            .missing_from(&dataset)
            .into_iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(missing, vec!["Gone B", "Gone A"]);
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn session_threads_selection_through_closure() {
        let mut session = Session::default();
        session.update_selection(|s| s.add(rec("A")));
        session.update_selection(|s| s.add(rec("B")).remove("A"));
        assert_eq!(order(&session.selection), vec!["B"]);
    }
}
