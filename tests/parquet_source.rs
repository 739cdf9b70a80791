use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use automation_dashboard::data::loader::{load_source, DataSource, LoadError};
use automation_dashboard::data::model::DatasetKind;
use parquet::arrow::ArrowWriter;

fn write_batch(path: &std::path::Path, fields: Vec<Field>, columns: Vec<ArrayRef>) {
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_columns_map_to_code_title_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cdf.parquet");
    write_batch(
        &path,
        vec![
            Field::new("SOC Code", DataType::Utf8, false),
            Field::new("Occupation", DataType::Utf8, false),
            Field::new("2017", DataType::Float64, true),
            Field::new("2018", DataType::Float32, true),
            Field::new("2019", DataType::Int64, true),
        ],
        vec![
            Arc::new(StringArray::from(vec!["11-1011", "41-2011"])),
            Arc::new(StringArray::from(vec!["Chief Executives", "Cashiers"])),
            Arc::new(Float64Array::from(vec![Some(0.125), None])),
            Arc::new(Float32Array::from(vec![0.5f32, 0.25])),
            Arc::new(Int64Array::from(vec![1, 0])),
        ],
    );

    let ds = load_source(DatasetKind::Cdf, &DataSource::File(path)).unwrap();
    assert_eq!(ds.headers, vec!["SOC Code", "Occupation", "2017", "2018", "2019"]);
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.rows[0].record.title, "Chief Executives");
    assert_eq!(ds.rows[0].values, vec![0.125, 0.5, 1.0]);
    assert!(ds.rows[1].values[0].is_nan());
    assert_eq!(ds.rows[1].values[1..], [0.25, 0.0]);
}

#[test]
fn parquet_with_null_title_is_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pdf.parquet");
    write_batch(
        &path,
        vec![
            Field::new("code", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, true),
            Field::new("2018", DataType::Float64, false),
        ],
        vec![
            Arc::new(StringArray::from(vec!["11-1011"])),
            Arc::new(StringArray::from(vec![None::<&str>])),
            Arc::new(Float64Array::from(vec![0.1])),
        ],
    );

    assert!(matches!(
        load_source(DatasetKind::Pdf, &DataSource::File(path)),
        Err(LoadError::SchemaMismatch { row: Some(1), .. })
    ));
}
