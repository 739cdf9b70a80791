use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use automation_dashboard::data::model::{Dataset, DatasetKind, OccupationRecord, Row};
use automation_dashboard::export::{serialize, ExportFormat, ExportScope};
use parquet::arrow::ArrowWriter;

const OCCUPATIONS: &[(&str, &str)] = &[
    ("11-1011", "Chief Executives"),
    ("11-3031", "Financial Managers"),
    ("13-2011", "Accountants and Auditors"),
    ("15-1252", "Software Developers"),
    ("25-2021", "Elementary School Teachers, Except Special Education"),
    ("29-1141", "Registered Nurses"),
    ("35-2014", "Cooks, Restaurant"),
    ("41-2011", "Cashiers"),
    ("43-4051", "Customer Service Representatives"),
    ("43-9021", "Data Entry Keyers"),
    ("47-2111", "Electricians"),
    ("51-2092", "Team Assemblers"),
    ("53-3032", "Heavy and Tractor-Trailer Truck Drivers"),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Logistic adoption curve scaled to a ceiling: monotone, in [0, ceiling].
fn cumulative_curve(rng: &mut SimpleRng) -> Vec<f64> {
    let midpoint = rng.range(2030.0, 2075.0);
    let steepness = rng.range(0.05, 0.25);
    let ceiling = rng.range(0.3, 0.99);
    (0..DatasetKind::Cdf.expected_points())
        .map(|k| {
            let year = DatasetKind::Cdf.year_at(k) as f64;
            ceiling / (1.0 + (-(year - midpoint) * steepness).exp())
        })
        .collect()
}

fn headers(kind: DatasetKind) -> Vec<String> {
    let mut h = vec!["SOC Code".to_string(), "Occupation".to_string()];
    h.extend((0..kind.expected_points()).map(|k| kind.year_at(k).to_string()));
    h
}

fn build_datasets(seed: u64) -> (Dataset, Dataset) {
    let mut rng = SimpleRng::new(seed);
    let mut cdf_rows = Vec::new();
    let mut pdf_rows = Vec::new();

    for &(code, title) in OCCUPATIONS {
        let record = OccupationRecord::new(code, title);
        let cdf = cumulative_curve(&mut rng);
        let pdf: Vec<f64> = cdf.windows(2).map(|w| w[1] - w[0]).collect();
        cdf_rows.push(Row {
            record: record.clone(),
            values: cdf,
        });
        pdf_rows.push(Row {
            record,
            values: pdf,
        });
    }

    (
        Dataset::new(DatasetKind::Cdf, headers(DatasetKind::Cdf), cdf_rows),
        Dataset::new(DatasetKind::Pdf, headers(DatasetKind::Pdf), pdf_rows),
    )
}

/// One Utf8 column per identifier, one Float64 column per year.
fn write_parquet(dataset: &Dataset, path: &Path) -> anyhow::Result<()> {
    let fields: Vec<Field> = dataset
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let dtype = if i < 2 { DataType::Utf8 } else { DataType::Float64 };
            Field::new(name, dtype, i >= 2)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            dataset.rows.iter().map(|r| r.record.code.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            dataset.rows.iter().map(|r| r.record.title.as_str()),
        )),
    ];
    for k in 0..dataset.headers.len() - 2 {
        columns.push(Arc::new(Float64Array::from_iter(
            dataset.rows.iter().map(|r| r.values.get(k).copied()),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let out_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let (cdf, pdf) = build_datasets(42);
    for (dataset, stem) in [(&cdf, "Probas CDFs"), (&pdf, "Probas PDFs")] {
        let exported = serialize(dataset, ExportScope::Full, ExportFormat::Spreadsheet)
            .with_context(|| format!("encoding {stem}"))?;
        let xlsx_path = out_dir.join(format!("{stem}.xlsx"));
        exported
            .save(&xlsx_path)
            .with_context(|| format!("writing {}", xlsx_path.display()))?;

        let parquet_path = out_dir.join(format!("{}.parquet", stem.replace(' ', "_").to_lowercase()));
        write_parquet(dataset, &parquet_path)?;
    }

    println!(
        "Wrote {} occupations ({} CDF years, {} PDF years) to {}",
        cdf.len(),
        DatasetKind::Cdf.expected_points(),
        DatasetKind::Pdf.expected_points(),
        out_dir.display()
    );
    Ok(())
}
