use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// DatasetKind – cumulative vs. incremental series
// ---------------------------------------------------------------------------

/// Which of the two probability tables a dataset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Cumulative probability, one value per year starting 2017.
    Cdf,
    /// Year-over-year increment, one value per year starting 2018.
    Pdf,
}

impl DatasetKind {
    pub const LAST_YEAR: i32 = 2086;

    /// Year of the first value column.
    pub fn first_year(self) -> i32 {
        match self {
            DatasetKind::Cdf => 2017,
            DatasetKind::Pdf => 2018,
        }
    }

    /// Number of yearly values a well-formed row carries.
    pub fn expected_points(self) -> usize {
        (Self::LAST_YEAR - self.first_year() + 1) as usize
    }

    /// Year for value column `k` (0-indexed after the two identifier columns).
    pub fn year_at(self, k: usize) -> i32 {
        self.first_year() + k as i32
    }

    /// Short label used in file names and UI captions.
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Cdf => "CDF",
            DatasetKind::Pdf => "PDF",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// OccupationRecord – the identifier pair of a row
// ---------------------------------------------------------------------------

/// Identifier columns of a row. Rows are looked up by `title`, not `code`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccupationRecord {
    /// SOC code (column 0).
    pub code: String,
    /// Occupation title (column 1).
    pub title: String,
}

impl OccupationRecord {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one line of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub record: OccupationRecord,
    /// Yearly values in column order. Empty cells are kept as NaN.
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Dataset – one loaded table
// ---------------------------------------------------------------------------

/// A loaded table. Never mutated after loading; subsets are new values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub kind: DatasetKind,
    /// Header row as found in the source (code, title, then one per year).
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(kind: DatasetKind, headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            kind,
            headers,
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Identifier pairs in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &OccupationRecord> {
        self.rows.iter().map(|r| &r.record)
    }

    /// First row whose title matches exactly.
    pub fn find_by_title(&self, title: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.record.title == title)
    }

    /// Rows whose title is in `titles`, in dataset order, with the same headers.
    pub fn subset_by_titles<'a, I>(&self, titles: I) -> Dataset
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = titles.into_iter().collect();
        let rows = self
            .rows
            .iter()
            .filter(|r| wanted.contains(r.record.title.as_str()))
            .cloned()
            .collect();
        Dataset {
            kind: self.kind,
            headers: self.headers.clone(),
            rows,
        }
    }

    /// First and last year covered by the widest row, if any row has values.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let width = self.rows.iter().map(|r| r.values.len()).max()?;
        if width == 0 {
            return None;
        }
        Some((self.kind.first_year(), self.kind.year_at(width - 1)))
    }
}
