use std::error::Error as StdError;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::discovery::list_spreadsheets;
use super::model::{Dataset, DatasetKind, OccupationRecord, Row};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Startup failure while bringing the two tables into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No file could be resolved for a dataset.
    #[error("could not find the {kind} file")]
    NotFound {
        kind: DatasetKind,
        /// Candidate names (or explicit paths) that were tried, in order.
        tried: Vec<String>,
        /// Spreadsheet files actually present in `searched`.
        found: Vec<String>,
        /// Directory that was listed for `found`.
        searched: PathBuf,
    },

    /// The source exists but could not be read or decoded.
    #[error("could not read {source_name}: {cause}")]
    Unreadable {
        source_name: String,
        #[source]
        cause: Box<dyn StdError + Send + Sync>,
    },

    /// The source decoded but does not have the code/title/values layout.
    #[error("{source_name}: {reason}")]
    SchemaMismatch {
        source_name: String,
        /// 1-based data row (header excluded), when the problem is row-local.
        row: Option<usize>,
        reason: String,
    },
}

impl LoadError {
    fn unreadable(
        source_name: &str,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        LoadError::Unreadable {
            source_name: source_name.to_string(),
            cause: cause.into(),
        }
    }

    fn mismatch(source_name: &str, row: Option<usize>, reason: impl Into<String>) -> Self {
        LoadError::SchemaMismatch {
            source_name: source_name.to_string(),
            row,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Encoding of a dataset source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.xlsx` / `.xls`, first worksheet.
    Spreadsheet,
    Csv,
    Parquet,
}

impl SourceFormat {
    /// Dispatch by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "xlsx" | "xls" => Some(SourceFormat::Spreadsheet),
            "csv" => Some(SourceFormat::Csv),
            "parquet" | "pq" => Some(SourceFormat::Parquet),
            _ => None,
        }
    }
}

/// An opaque byte source for one dataset.
#[derive(Debug, Clone)]
pub enum DataSource {
    File(PathBuf),
    Memory {
        name: String,
        format: SourceFormat,
        bytes: Vec<u8>,
    },
}

impl DataSource {
    /// Human-readable name used in diagnostics.
    pub fn name(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Memory { name, .. } => name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables. Either failing aborts the whole load.
pub fn load(cdf: &DataSource, pdf: &DataSource) -> Result<(Dataset, Dataset), LoadError> {
    let cdf = load_source(DatasetKind::Cdf, cdf)?;
    let pdf = load_source(DatasetKind::Pdf, pdf)?;
    Ok((cdf, pdf))
}

/// Load a single table from a source.
pub fn load_source(kind: DatasetKind, source: &DataSource) -> Result<Dataset, LoadError> {
    match source {
        DataSource::File(path) => {
            let name = path.display().to_string();
            if !path.is_file() {
                let searched = match path.parent() {
                    Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                return Err(LoadError::NotFound {
                    kind,
                    tried: vec![name],
                    found: list_spreadsheets(&searched),
                    searched,
                });
            }
            let format = SourceFormat::from_path(path).ok_or_else(|| {
                LoadError::unreadable(&name, format!("unsupported file extension: {name}"))
            })?;
            let bytes = std::fs::read(path).map_err(|e| LoadError::unreadable(&name, e))?;
            let dataset = parse_bytes(kind, &name, format, bytes)?;
            log::info!("Loaded {} {kind} rows from {name}", dataset.len());
            Ok(dataset)
        }
        DataSource::Memory {
            name,
            format,
            bytes,
        } => parse_bytes(kind, name, *format, bytes.clone()),
    }
}

/// Decode an in-memory table of the given format.
pub fn parse_bytes(
    kind: DatasetKind,
    source_name: &str,
    format: SourceFormat,
    bytes: Vec<u8>,
) -> Result<Dataset, LoadError> {
    let grid = match format {
        SourceFormat::Csv => read_csv_grid(source_name, &bytes)?,
        SourceFormat::Spreadsheet => read_sheet_grid(source_name, bytes)?,
        SourceFormat::Parquet => read_parquet_grid(source_name, bytes)?,
    };
    build_dataset(kind, source_name, grid)
}

// ---------------------------------------------------------------------------
// Grid → Dataset
// ---------------------------------------------------------------------------

/// A single decoded cell, before the layout is validated.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    fn to_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(v) => v.to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) => false,
        }
    }

    fn to_value(&self) -> Option<f64> {
        match self {
            RawCell::Empty => Some(f64::NAN),
            RawCell::Number(v) => Some(*v),
            RawCell::Text(s) if s.trim().is_empty() => Some(f64::NAN),
            RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// Validate the code/title/values layout. First row is the header row.
fn build_dataset(
    kind: DatasetKind,
    source_name: &str,
    grid: Vec<Vec<RawCell>>,
) -> Result<Dataset, LoadError> {
    let mut lines = grid.into_iter();
    let header_cells = lines
        .next()
        .ok_or_else(|| LoadError::mismatch(source_name, None, "missing header row"))?;
    let headers: Vec<String> = header_cells.iter().map(RawCell::to_text).collect();

    if headers.len() < 3 {
        return Err(LoadError::mismatch(
            source_name,
            None,
            format!(
                "expected code, title and at least one value column, found {} column(s)",
                headers.len()
            ),
        ));
    }
    let width = headers.len() - 2;
    if width != kind.expected_points() {
        log::warn!(
            "{source_name}: {width} value columns, expected {} for {kind}",
            kind.expected_points()
        );
    }

    let mut rows = Vec::new();
    for (i, cells) in lines.enumerate() {
        let row_no = i + 1;
        if cells.iter().all(RawCell::is_blank) {
            continue;
        }

        let cell = |j: usize| cells.get(j).cloned().unwrap_or(RawCell::Empty);
        let title = cell(1);
        if title.is_blank() {
            return Err(LoadError::mismatch(source_name, Some(row_no), "empty title"));
        }
        if cells.iter().skip(headers.len()).any(|c| !c.is_blank()) {
            return Err(LoadError::mismatch(
                source_name,
                Some(row_no),
                format!("more cells than the {} header columns", headers.len()),
            ));
        }

        let values = (0..width)
            .map(|k| {
                let c = cell(k + 2);
                c.to_value().ok_or_else(|| {
                    LoadError::mismatch(
                        source_name,
                        Some(row_no),
                        format!("column '{}': '{}' is not a number", headers[k + 2], c.to_text()),
                    )
                })
            })
            .collect::<Result<Vec<f64>, LoadError>>()?;

        rows.push(Row {
            record: OccupationRecord::new(cell(0).to_text(), title.to_text()),
            values,
        });
    }

    Ok(Dataset::new(kind, headers, rows))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv_grid(source_name: &str, bytes: &[u8]) -> Result<Vec<Vec<RawCell>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .map(|result| {
            let record = result.map_err(|e| LoadError::unreadable(source_name, e))?;
            Ok(record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

fn read_sheet_grid(source_name: &str, bytes: Vec<u8>) -> Result<Vec<Vec<RawCell>>, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| LoadError::unreadable(source_name, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::mismatch(source_name, None, "workbook has no worksheets"))?
        .map_err(|e| LoadError::unreadable(source_name, e))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(sheet_cell).collect())
        .collect())
}

fn sheet_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Float(v) => RawCell::Number(*v),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::String(s) => RawCell::Text(s.clone()),
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Column names become the header row; one grid row per table row.
fn read_parquet_grid(source_name: &str, bytes: Vec<u8>) -> Result<Vec<Vec<RawCell>>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(bytes))
        .map_err(|e| LoadError::unreadable(source_name, e))?;
    let headers: Vec<RawCell> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| RawCell::Text(f.name().clone()))
        .collect();
    let reader = builder
        .build()
        .map_err(|e| LoadError::unreadable(source_name, e))?;

    let mut grid = vec![headers];
    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::unreadable(source_name, e))?;
        for row in 0..batch.num_rows() {
            grid.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }
    Ok(grid)
}

fn arrow_cell(col: &ArrayRef, row: usize) -> RawCell {
    if col.is_null(row) {
        return RawCell::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => RawCell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawCell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Float64 => RawCell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => RawCell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => RawCell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => RawCell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        other => RawCell::Text(format!("{other:?}")),
    }
}
