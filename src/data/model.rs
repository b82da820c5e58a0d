use std::path::PathBuf;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use super::aggregate;

// ---------------------------------------------------------------------------
// Column names of the source file
// ---------------------------------------------------------------------------

pub const COL_COUNTY: &str = "Counties";
pub const COL_ACRES: &str = "AcresBurned";
pub const COL_YEAR: &str = "ArchiveYear";
pub const COL_CREWS: &str = "CrewsInvolved";
pub const COL_NAME: &str = "Name";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

/// Columns every loader insists on. Anything else in the file is ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_COUNTY,
    COL_ACRES,
    COL_YEAR,
    COL_CREWS,
    COL_NAME,
    COL_LATITUDE,
    COL_LONGITUDE,
];

// ---------------------------------------------------------------------------
// Incident – one row of the source file
// ---------------------------------------------------------------------------

/// A single recorded wildfire.
///
/// `acres_burned` and `crews_involved` are blank for many rows of the public
/// dataset, so they load as `None` instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Incident {
    #[serde(rename = "Counties")]
    pub county: String,
    #[serde(rename = "AcresBurned", default)]
    pub acres_burned: Option<f64>,
    #[serde(rename = "ArchiveYear")]
    pub archive_year: i32,
    #[serde(rename = "CrewsInvolved", default, deserialize_with = "crew_count")]
    pub crews_involved: Option<u32>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Pandas writes an integer column with gaps as floats (`3.0`), so accept any
/// whole, non-negative number.
fn crew_count<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(de)?
        .map(|v| {
            if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
                Ok(v as u32)
            } else {
                Err(D::Error::custom(format!(
                    "expected a whole non-negative crew count, got {v}"
                )))
            }
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// IncidentDataset – the complete loaded file
// ---------------------------------------------------------------------------

/// Every incident read at startup. Never mutated afterwards; filters only
/// produce index views into `incidents`.
#[derive(Debug, Clone)]
pub struct IncidentDataset {
    pub incidents: Vec<Incident>,
    /// Distinct county names in first-occurrence order (multi-select options).
    pub counties: Vec<String>,
    /// Where the rows came from, for the status bar.
    pub source: PathBuf,
}

impl IncidentDataset {
    pub fn new(incidents: Vec<Incident>, source: impl Into<PathBuf>) -> Self {
        let counties = aggregate::distinct_counties(&incidents.iter().collect::<Vec<_>>());
        IncidentDataset {
            incidents,
            counties,
            source: source.into(),
        }
    }

    /// Number of incidents.
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn incident(county: &str, acres: f64, year: i32, crews: u32) -> Incident {
    Incident {
        county: county.to_string(),
        acres_burned: Some(acres),
        archive_year: year,
        crews_involved: Some(crews),
        name: format!("{county} Fire {year}"),
        latitude: 37.0,
        longitude: -120.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(crews: &str) -> serde_json::Result<Incident> {
        serde_json::from_str(&format!(
            r#"{{"Counties": "Napa", "AcresBurned": 1.0, "ArchiveYear": 2017,
                "CrewsInvolved": {crews}, "Name": "A", "Latitude": 38.3, "Longitude": -122.2}}"#
        ))
    }

    #[test]
    fn crew_count_accepts_whole_floats() {
        assert_eq!(parse("3").unwrap().crews_involved, Some(3));
        assert_eq!(parse("3.0").unwrap().crews_involved, Some(3));
        assert_eq!(parse("null").unwrap().crews_involved, None);
    }

    #[test]
    fn crew_count_rejects_fractions_and_negatives() {
        assert!(parse("2.5").is_err());
        assert!(parse("-1").is_err());
    }

    #[test]
    fn dataset_lists_counties_in_file_order() {
        let ds = IncidentDataset::new(
            vec![
                incident("Napa", 10.0, 2017, 1),
                incident("Butte", 20.0, 2018, 2),
                incident("Napa", 30.0, 2018, 3),
            ],
            "test.csv",
        );
        assert_eq!(ds.counties, vec!["Napa".to_string(), "Butte".to_string()]);
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
    }
}
