use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::DashboardError;

use super::model::Incident;

/// County → acreage values, in first-occurrence order of the county.
pub type CountyAcres = Vec<(String, Vec<f64>)>;

/// County → mean acreage, same order as the [`CountyAcres`] it came from.
pub type CountyAverages = Vec<(String, f64)>;

// ---------------------------------------------------------------------------
// Distinct values
// ---------------------------------------------------------------------------

/// Unique county names in first-occurrence order.
pub fn distinct_counties(rows: &[&Incident]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    rows.iter()
        .filter(|inc| seen.insert(inc.county.as_str()))
        .map(|inc| inc.county.clone())
        .collect()
}

/// Unique acreage values in first-occurrence order. Values compare by exact
/// bit pattern; rows without an acreage are skipped.
pub fn distinct_acreage_values(rows: &[&Incident]) -> Vec<f64> {
    let mut seen = BTreeSet::new();
    rows.iter()
        .filter_map(|inc| inc.acres_burned)
        .filter(|acres| seen.insert(acres.to_bits()))
        .collect()
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Which incident field [`count_by`] compares keys against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    County,
    Year,
}

/// A key to count. A county key never matches the year field and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountKey {
    County(String),
    Year(i32),
}

/// For each key, the number of rows whose `field` equals it. Output is
/// parallel to `keys`.
pub fn count_by(rows: &[&Incident], keys: &[CountKey], field: CountField) -> Vec<usize> {
    keys.iter()
        .map(|key| {
            rows.iter()
                .filter(|inc| match (field, key) {
                    (CountField::County, CountKey::County(c)) => inc.county == *c,
                    (CountField::Year, CountKey::Year(y)) => inc.archive_year == *y,
                    _ => false,
                })
                .count()
        })
        .collect()
}

/// Incident count per county name, parallel to `counties`.
pub fn count_counties(rows: &[&Incident], counties: &[String]) -> Vec<usize> {
    let keys: Vec<CountKey> = counties.iter().cloned().map(CountKey::County).collect();
    count_by(rows, &keys, CountField::County)
}

/// Incident count per archive year, parallel to `years`.
pub fn count_years(rows: &[&Incident], years: &[i32]) -> Vec<usize> {
    let keys: Vec<CountKey> = years.iter().copied().map(CountKey::Year).collect();
    count_by(rows, &keys, CountField::Year)
}

// ---------------------------------------------------------------------------
// Acreage per county
// ---------------------------------------------------------------------------

/// Group acreage values by county, keeping row order inside each group.
///
/// Every county in `rows` gets an entry, even when none of its rows carry an
/// acreage; such entries hold an empty list.
pub fn acres_by_county(rows: &[&Incident]) -> CountyAcres {
    let mut groups: CountyAcres = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for inc in rows {
        let idx = *slot.entry(inc.county.as_str()).or_insert_with(|| {
            groups.push((inc.county.clone(), Vec::new()));
            groups.len() - 1
        });
        if let Some(acres) = inc.acres_burned {
            groups[idx].1.push(acres);
        }
    }
    groups
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Arithmetic mean per county. Fails on the first empty group.
pub fn average_by_county(groups: &CountyAcres) -> Result<CountyAverages, DashboardError> {
    groups
        .iter()
        .map(|(county, values)| {
            mean(values)
                .map(|avg| (county.clone(), avg))
                .ok_or_else(|| DashboardError::EmptyGroup {
                    county: county.clone(),
                })
        })
        .collect()
}

/// Like [`average_by_county`] but leaves out counties with no values.
pub fn average_by_county_lossy(groups: &CountyAcres) -> CountyAverages {
    groups
        .iter()
        .filter_map(|(county, values)| match mean(values) {
            Some(avg) => Some((county.clone(), avg)),
            None => {
                log::debug!("Skipping {county}: no acreage values to average");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pivot: county × year → sum of crews involved
// ---------------------------------------------------------------------------

/// Two-axis summary of crews involved. Rows and columns are sorted
/// ascending; every (county, year) cell exists and defaults to 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub counties: Vec<String>,
    pub years: Vec<i32>,
    cells: Vec<Vec<u64>>,
}

impl PivotTable {
    /// Sum for `(county, year)`, 0 when either is absent from the table.
    pub fn get(&self, county: &str, year: i32) -> u64 {
        let Some(r) = self.counties.iter().position(|c| c == county) else {
            return 0;
        };
        let Some(c) = self.years.iter().position(|y| *y == year) else {
            return 0;
        };
        self.cells[r][c]
    }

    /// One row of cells, parallel to `years`.
    pub fn row(&self, index: usize) -> &[u64] {
        self.cells.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row_total(&self, index: usize) -> u64 {
        self.row(index).iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }
}

/// Sum crews involved per (county, year). Missing crew counts add nothing.
pub fn pivot_crews(rows: &[&Incident]) -> PivotTable {
    let mut sums: BTreeMap<&str, BTreeMap<i32, u64>> = BTreeMap::new();
    let mut years = BTreeSet::new();

    for inc in rows {
        years.insert(inc.archive_year);
        *sums
            .entry(inc.county.as_str())
            .or_default()
            .entry(inc.archive_year)
            .or_insert(0) += u64::from(inc.crews_involved.unwrap_or(0));
    }

    let years: Vec<i32> = years.into_iter().collect();
    let (counties, cells): (Vec<String>, Vec<Vec<u64>>) = sums
        .into_iter()
        .map(|(county, by_year)| {
            let row: Vec<u64> = years
                .iter()
                .map(|y| by_year.get(y).copied().unwrap_or(0))
                .collect();
            (county.to_string(), row)
        })
        .unzip();

    PivotTable {
        counties,
        years,
        cells,
    }
}
