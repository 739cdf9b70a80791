use super::model::{Dataset, OccupationRecord};

// ---------------------------------------------------------------------------
// Text query over the identifier columns
// ---------------------------------------------------------------------------

/// Return indices of rows whose code or title contains `term`, ignoring case.
///
/// * `None` or an empty term → every row, in dataset order
/// * otherwise → plain substring match (no pattern syntax), dataset order kept
pub fn search_indices(dataset: &Dataset, term: Option<&str>) -> Vec<usize> {
    let needle = match term {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return (0..dataset.len()).collect(),
    };

    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.record.code.to_lowercase().contains(&needle)
                || row.record.title.to_lowercase().contains(&needle)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Matching records in dataset order.
pub fn search<'a>(dataset: &'a Dataset, term: Option<&str>) -> Vec<&'a OccupationRecord> {
    search_indices(dataset, term)
        .into_iter()
        .map(|i| &dataset.rows[i].record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DatasetKind, Row};

    fn dataset() -> Dataset {
        let rows = [
            ("11-1011", "Chief Executives"),
            ("15-1252", "Software Developers"),
            ("29-1141", "Registered Nurses (RN)"),
            ("11-3031", "Financial Managers"),
        ]
        .into_iter()
        .map(|(code, title)| Row {
            record: OccupationRecord::new(code, title),
            values: vec![0.5],
        })
        .collect();
        Dataset::new(DatasetKind::Cdf, Vec::new(), rows)
    }

    fn titles(records: Vec<&OccupationRecord>) -> Vec<&str> {
        records.into_iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn empty_term_returns_everything_in_order() {
        let ds = dataset();
        let all: Vec<_> = ds.records().collect();
        assert_eq!(search(&ds, None), all);
        assert_eq!(search(&ds, Some("")), all);
    }

    #[test]
    fn matches_title_ignoring_case() {
        let ds = dataset();
        assert_eq!(titles(search(&ds, Some("CHIEF"))), vec!["Chief Executives"]);
        assert_eq!(titles(search(&ds, Some("developers"))), vec!["Software Developers"]);
    }

    #[test]
    fn matches_code_prefix_and_keeps_order() {
        let ds = dataset();
        assert_eq!(
            titles(search(&ds, Some("11-"))),
            vec!["Chief Executives", "Financial Managers"]
        );
    }

    #[test]
    fn metacharacters_are_literal() {
        let ds = dataset();
        assert_eq!(titles(search(&ds, Some("(rn)"))), vec!["Registered Nurses (RN)"]);
        assert!(search(&ds, Some(".*")).is_empty());
        assert!(search(&ds, Some("[a-z]")).is_empty());
    }

    #[test]
    fn every_substring_of_a_title_finds_its_row() {
        let ds = dataset();
        for (i, row) in ds.rows.iter().enumerate() {
            let title = &row.record.title;
            for start in 0..title.len() {
                for end in start + 1..=title.len() {
                    let Some(sub) = title.get(start..end) else { continue };
                    assert!(search_indices(&ds, Some(&sub.to_uppercase())).contains(&i));
                }
            }
        }
    }
}
