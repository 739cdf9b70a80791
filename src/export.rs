//! Encode a table (full dataset or selected subset) for download.

use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use crate::data::loader::SourceFormat;
use crate::data::model::Dataset;
use crate::session::Selection;

pub const SHEET_NAME: &str = "Data";

/// Column limit of an xlsx worksheet.
pub const XLSX_MAX_COLS: usize = 16_384;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("spreadsheet encoding failed: {0}")]
    Spreadsheet(#[from] XlsxError),
    #[error("table has {0} columns, more than a worksheet can hold")]
    TooWide(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Spreadsheet,
}

impl ExportFormat {
    pub fn ext(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Loader format that reads this encoding back.
    pub fn source_format(self) -> SourceFormat {
        match self {
            ExportFormat::Csv => SourceFormat::Csv,
            ExportFormat::Spreadsheet => SourceFormat::Spreadsheet,
        }
    }
}

/// Whether the table is a whole dataset or the rows of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Full,
    Selected,
}

/// An encoded table ready to be handed to the user.
#[derive(Debug, Clone)]
pub struct Exported {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

impl Exported {
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.bytes)?;
        log::info!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

/// `{Label}_Data.ext` or `Selected_{Label}_Data.ext`.
pub fn file_name(label: &str, scope: ExportScope, format: ExportFormat) -> String {
    let prefix = match scope {
        ExportScope::Full => "",
        ExportScope::Selected => "Selected_",
    };
    format!("{prefix}{label}_Data.{}", format.ext())
}

/// Encode `table` with its header row and no index column.
pub fn serialize(
    table: &Dataset,
    scope: ExportScope,
    format: ExportFormat,
) -> Result<Exported, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(table)?,
        ExportFormat::Spreadsheet => to_xlsx(table)?,
    };
    Ok(Exported {
        bytes,
        filename: file_name(table.kind.label(), scope, format),
        mime: format.mime(),
    })
}

/// Rows of `dataset` whose title is selected, in dataset order.
pub fn export_selected(
    dataset: &Dataset,
    selection: &Selection,
    format: ExportFormat,
) -> Result<Exported, ExportError> {
    let subset = dataset.subset_by_titles(selection.titles());
    serialize(&subset, ExportScope::Selected, format)
}

// ---------------------------------------------------------------------------
// Encoders
// ---------------------------------------------------------------------------

/// Shortest representation that parses back to the same `f64`. NaN → empty.
fn format_value(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

fn to_csv(table: &Dataset) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 2);
        record.push(row.record.code.clone());
        record.push(row.record.title.clone());
        record.extend(row.values.iter().map(|&v| format_value(v)));
        writer.write_record(&record)?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn to_xlsx(table: &Dataset) -> Result<Vec<u8>, ExportError> {
    let width = table
        .rows
        .iter()
        .map(|r| r.values.len() + 2)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);
    if width > XLSX_MAX_COLS {
        return Err(ExportError::TooWide(width));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (c, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, c as u16, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let r = r as u32 + 1;
        sheet.write_string(r, 0, &row.record.code)?;
        sheet.write_string(r, 1, &row.record.title)?;
        for (k, &v) in row.values.iter().enumerate() {
            if !v.is_nan() {
                sheet.write_number(r, k as u16 + 2, v)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_bytes;
    use crate::data::model::{DatasetKind, OccupationRecord, Row};

    fn table() -> Dataset {
        Dataset::new(
            DatasetKind::Pdf,
            vec!["SOC Code".into(), "Title".into(), "2018".into(), "2019".into()],
            vec![
                Row {
                    record: OccupationRecord::new("11-1011", "Chief Executives"),
                    values: vec![0.1, 0.000123456789],
                },
                Row {
                    record: OccupationRecord::new("43-9021", "Data Entry Keyers, \"general\""),
                    values: vec![1.0 / 3.0, 0.25],
                },
            ],
        )
    }

    #[test]
    fn names_and_mime_types() {
        let out = serialize(&table(), ExportScope::Full, ExportFormat::Csv).unwrap();
        assert_eq!(out.filename, "PDF_Data.csv");
        assert_eq!(out.mime, "text/csv");
        assert_eq!(
            file_name("CDF", ExportScope::Selected, ExportFormat::Spreadsheet),
            "Selected_CDF_Data.xlsx"
        );
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let out = serialize(&table(), ExportScope::Full, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(out.bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("SOC Code,Title,2018,2019"));
        assert_eq!(lines.next(), Some("11-1011,Chief Executives,0.1,0.000123456789"));
    }

    #[test]
    fn csv_reads_back_identically() {
        let t = table();
        let out = serialize(&t, ExportScope::Full, ExportFormat::Csv).unwrap();
        let back = parse_bytes(t.kind, &out.filename, SourceFormat::Csv, out.bytes).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn spreadsheet_reads_back_identically() {
        let t = table();
        let out = serialize(&t, ExportScope::Full, ExportFormat::Spreadsheet).unwrap();
        let back =
            parse_bytes(t.kind, &out.filename, SourceFormat::Spreadsheet, out.bytes).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn selected_export_uses_dataset_order() {
        let t = table();
        let sel = Selection::new()
            .add(OccupationRecord::new("43-9021", "Data Entry Keyers, \"general\""))
            .add(OccupationRecord::new("11-1011", "Chief Executives"));
        let out = export_selected(&t, &sel, ExportFormat::Csv).unwrap();
        assert_eq!(out.filename, "Selected_PDF_Data.csv");
        let back = parse_bytes(t.kind, "x", SourceFormat::Csv, out.bytes).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn spreadsheet_width_is_capped_at_worksheet_limit() {
        let wide = |cols: usize| {
            Dataset::new(
                DatasetKind::Cdf,
                (0..cols).map(|c| format!("c{c}")).collect(),
                Vec::new(),
            )
        };
        assert!(serialize(&wide(XLSX_MAX_COLS), ExportScope::Full, ExportFormat::Spreadsheet).is_ok());
        assert!(matches!(
            serialize(&wide(XLSX_MAX_COLS + 1), ExportScope::Full, ExportFormat::Spreadsheet),
            Err(ExportError::TooWide(16_385))
        ));
    }
}
