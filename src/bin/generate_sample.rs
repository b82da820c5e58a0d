use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Counties with a rough centre point and a typical fire size.
const COUNTIES: [(&str, f64, f64, f64); 8] = [
    ("Butte", 39.67, -121.60, 4_000.0),
    ("Napa", 38.50, -122.33, 2_500.0),
    ("Los Angeles", 34.32, -118.22, 1_800.0),
    ("Riverside", 33.74, -116.73, 900.0),
    ("Shasta", 40.76, -122.04, 6_000.0),
    ("San Diego", 32.97, -116.74, 1_200.0),
    ("Fresno", 36.76, -119.65, 3_000.0),
    ("Colusa", 39.18, -122.24, 12_000.0),
];

const YEARS: std::ops::RangeInclusive<i64> = 2013..=2019;

/// Deterministic linear congruential generator; enough for plausible spread.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct Columns {
    name: Vec<String>,
    county: Vec<String>,
    acres: Vec<Option<f64>>,
    year: Vec<i64>,
    crews: Vec<Option<i64>>,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
}

fn generate() -> Columns {
    let mut rng = Lcg(42);
    let mut cols = Columns {
        name: Vec::new(),
        county: Vec::new(),
        acres: Vec::new(),
        year: Vec::new(),
        crews: Vec::new(),
        latitude: Vec::new(),
        longitude: Vec::new(),
    };

    for (county, lat, lon, typical_acres) in COUNTIES {
        for year in YEARS {
            let fires = 1 + (rng.next_f64() * 6.0) as usize;
            for n in 0..fires {
                cols.name.push(format!("{county} {year} Fire #{}", n + 1));
                cols.county.push(county.to_string());
                // Roughly one in ten rows has a blank acreage or crew count,
                // like the public dataset.
                cols.acres.push((rng.next_f64() > 0.1).then(|| {
                    (typical_acres * rng.next_f64() * 2.0).round().max(1.0)
                }));
                cols.year.push(year);
                cols.crews
                    .push((rng.next_f64() > 0.1).then(|| (rng.next_f64() * 25.0) as i64));
                cols.latitude.push(lat + (rng.next_f64() - 0.5) * 0.6);
                cols.longitude.push(lon + (rng.next_f64() - 0.5) * 0.6);
            }
        }
    }
    cols
}

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Name",
        "Counties",
        "AcresBurned",
        "ArchiveYear",
        "CrewsInvolved",
        "Latitude",
        "Longitude",
    ])?;
    for i in 0..cols.name.len() {
        writer.write_record([
            cols.name[i].clone(),
            cols.county[i].clone(),
            cols.acres[i].map(|a| a.to_string()).unwrap_or_default(),
            cols.year[i].to_string(),
            cols.crews[i].map(|c| c.to_string()).unwrap_or_default(),
            format!("{:.5}", cols.latitude[i]),
            format!("{:.5}", cols.longitude[i]),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Counties", DataType::Utf8, false),
        Field::new("AcresBurned", DataType::Float64, true),
        Field::new("ArchiveYear", DataType::Int64, false),
        Field::new("CrewsInvolved", DataType::Int64, true),
        Field::new("Latitude", DataType::Float64, false),
        Field::new("Longitude", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(cols.name.clone())),
            Arc::new(StringArray::from(cols.county.clone())),
            Arc::new(Float64Array::from(cols.acres.clone())),
            Arc::new(Int64Array::from(cols.year.clone())),
            Arc::new(Int64Array::from(cols.crews.clone())),
            Arc::new(Float64Array::from(cols.latitude.clone())),
            Arc::new(Float64Array::from(cols.longitude.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let cols = generate();

    write_csv(&cols, "California_Fire_Incidents.csv")?;
    write_parquet(&cols, "California_Fire_Incidents.parquet")?;

    println!(
        "Wrote {} incidents across {} counties to California_Fire_Incidents.{{csv,parquet}}",
        cols.name.len(),
        COUNTIES.len()
    );
    Ok(())
}
