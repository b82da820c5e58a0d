use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::DashboardError;

use super::model::{
    COL_ACRES, COL_COUNTY, COL_CREWS, COL_LATITUDE, COL_LONGITUDE, COL_NAME, COL_YEAR,
    Incident, IncidentDataset, REQUIRED_COLUMNS,
};

/// File read at startup, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "California_Fire_Incidents.csv";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the incident file at [`DEFAULT_DATA_PATH`].
pub fn load() -> Result<IncidentDataset, DashboardError> {
    load_file(Path::new(DEFAULT_DATA_PATH))
}

/// Load an incident dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the required columns
/// * `.json`    – `[{ "Counties": "...", "AcresBurned": 12.0, ... }, ...]`
/// * `.parquet` – one column per required field
pub fn load_file(path: &Path) -> Result<IncidentDataset, DashboardError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let incidents = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    }
    .map_err(|e| DashboardError::DataUnavailable {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    Ok(IncidentDataset::new(incidents, path))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Columns are matched by header name; extra columns are ignored and blank
/// `AcresBurned` / `CrewsInvolved` cells load as missing.
fn load_csv(path: &Path) -> Result<Vec<Incident>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    reader
        .deserialize::<Incident>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, i.e. what `df.to_json(orient='records')` writes.
/// Blank numeric fields may be `null` or left out.
fn load_json(path: &Path) -> Result<Vec<Incident>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON incident records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Numeric columns may be stored as any of Int32/Int64/Float32/Float64, as
/// Pandas promotes integer columns with gaps to floats.
fn load_parquet(path: &Path) -> Result<Vec<Incident>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut incidents = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = IncidentColumns::from_batch(&batch)?;
        for row in 0..batch.num_rows() {
            incidents.push(columns.incident(row).with_context(|| format!("Row {row}"))?);
        }
    }

    Ok(incidents)
}

/// The required columns of one record batch.
struct IncidentColumns<'a> {
    county: &'a ArrayRef,
    acres: &'a ArrayRef,
    year: &'a ArrayRef,
    crews: &'a ArrayRef,
    name: &'a ArrayRef,
    latitude: &'a ArrayRef,
    longitude: &'a ArrayRef,
}

impl<'a> IncidentColumns<'a> {
    fn from_batch(batch: &'a RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let column = move |name: &str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        Ok(IncidentColumns {
            county: column(COL_COUNTY)?,
            acres: column(COL_ACRES)?,
            year: column(COL_YEAR)?,
            crews: column(COL_CREWS)?,
            name: column(COL_NAME)?,
            latitude: column(COL_LATITUDE)?,
            longitude: column(COL_LONGITUDE)?,
        })
    }

    fn incident(&self, row: usize) -> Result<Incident> {
        Ok(Incident {
            county: string_at(self.county, row)?,
            acres_burned: f64_at(self.acres, row)?,
            archive_year: f64_at(self.year, row)?.context("missing ArchiveYear")? as i32,
            crews_involved: f64_at(self.crews, row)?.map(|c| c as u32),
            name: string_at(self.name, row)?,
            latitude: f64_at(self.latitude, row)?.context("missing Latitude")?,
            longitude: f64_at(self.longitude, row)?.context("missing Longitude")?,
        })
    }
}

// -- Parquet / Arrow helpers --

fn string_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected a string column, got {other:?}"),
    }
}

/// Read any numeric cell as `f64`; nulls become `None`.
fn f64_at(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row) as f64
    } else {
        bail!("Expected a numeric column, got {:?}", col.data_type())
    };
    Ok(if value.is_nan() { None } else { Some(value) })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fire_panda_{}_{name}", std::process::id()))
    }

    const CSV: &str = "\
Name,Counties,AcresBurned,ArchiveYear,CrewsInvolved,Latitude,Longitude,Started
Camp Fire,Butte,153336,2018,,39.81,-121.43,2018-11-08
Atlas Fire,Napa,51624,2017,12,38.39,-122.24,2017-10-08
Small Fire,Napa,,2017,1.0,38.30,-122.20,2017-07-01
";

    #[test]
    fn csv_loads_with_blank_cells_and_extra_columns() {
        let path = temp_path("ok.csv");
        std::fs::write(&path, CSV).unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.counties, vec!["Butte", "Napa"]);
        assert_eq!(ds.incidents[0].crews_involved, None);
        assert_eq!(ds.incidents[1].crews_involved, Some(12));
        assert_eq!(ds.incidents[2].acres_burned, None);
        assert_eq!(ds.incidents[2].crews_involved, Some(1));
        assert_eq!(ds.incidents[1].name, "Atlas Fire");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn csv_missing_column_is_data_unavailable() {
        let path = temp_path("missing.csv");
        std::fs::write(&path, "Name,Counties\nCamp Fire,Butte\n").unwrap();

        match load_file(&path) {
            Err(DashboardError::DataUnavailable { reason, .. }) => {
                assert!(reason.contains("AcresBurned"), "{reason}");
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = load_file(&temp_path("nope.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("incidents.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn json_records_load() {
        let path = temp_path("ok.json");
        std::fs::write(
            &path,
            r#"[
                {"Counties": "Napa", "AcresBurned": 100.0, "ArchiveYear": 2017,
                 "CrewsInvolved": 3.0, "Name": "A", "Latitude": 38.3, "Longitude": -122.2},
                {"Counties": "Butte", "AcresBurned": null, "ArchiveYear": 2018,
                 "Name": "B", "Latitude": 39.8, "Longitude": -121.4}
            ]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.incidents[0].crews_involved, Some(3));
        assert_eq!(ds.incidents[1].acres_burned, None);
        assert_eq!(ds.incidents[1].crews_involved, None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_missing_field_is_data_unavailable() {
        let path = temp_path("missing.json");
        std::fs::write(
            &path,
            r#"[{"Counties": "Napa", "AcresBurned": 1.0, "CrewsInvolved": 2.0,
                 "Name": "A", "Latitude": 38.3, "Longitude": -122.2}]"#,
        )
        .unwrap();

        match load_file(&path) {
            Err(DashboardError::DataUnavailable { reason, .. }) => {
                assert!(reason.contains("ArchiveYear"), "{reason}");
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn fractional_crew_count_is_data_unavailable() {
        let path = temp_path("fraction.csv");
        std::fs::write(
            &path,
            "Name,Counties,AcresBurned,ArchiveYear,CrewsInvolved,Latitude,Longitude\n\
             A,Napa,10,2017,2.5,38.3,-122.2\n",
        )
        .unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn parquet_missing_column_is_data_unavailable() {
        let path = temp_path("missing.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_COUNTY, DataType::Utf8, false),
            Field::new(COL_NAME, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Napa"])),
                Arc::new(StringArray::from(vec!["A"])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        match load_file(&path) {
            Err(DashboardError::DataUnavailable { reason, .. }) => {
                assert!(reason.contains("AcresBurned"), "{reason}");
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn parquet_loads_mixed_numeric_types() {
        let path = temp_path("ok.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_COUNTY, DataType::Utf8, false),
            Field::new(COL_ACRES, DataType::Float64, true),
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_CREWS, DataType::Float64, true),
            Field::new(COL_NAME, DataType::Utf8, false),
            Field::new(COL_LATITUDE, DataType::Float64, false),
            Field::new(COL_LONGITUDE, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Napa", "Butte"])),
                Arc::new(Float64Array::from(vec![Some(100.0), None])),
                Arc::new(Int64Array::from(vec![2017, 2018])),
                Arc::new(Float64Array::from(vec![None, Some(4.0)])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![38.3, 39.8])),
                Arc::new(Float64Array::from(vec![-122.2, -121.4])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.incidents[0].archive_year, 2017);
        assert_eq!(ds.incidents[0].crews_involved, None);
        assert_eq!(ds.incidents[1].crews_involved, Some(4));
        assert_eq!(ds.incidents[1].acres_burned, None);

        std::fs::remove_file(&path).ok();
    }
}
