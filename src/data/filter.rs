use std::collections::BTreeSet;

use super::model::{Incident, IncidentDataset};

/// Upper end of the acreage slider.
pub const ACRES_SLIDER_MAX: u32 = 80_000;

/// Archive years offered by the year multi-select.
pub const YEAR_OPTIONS: [i32; 7] = [2013, 2014, 2015, 2016, 2017, 2018, 2019];

// ---------------------------------------------------------------------------
// Selection: what the viewer picked in the sidebar
// ---------------------------------------------------------------------------

/// Widget state handed to the pipeline on every render pass.
///
/// An empty `counties` or `years` puts no constraint on that dimension, and
/// `max_acres == None` means the acreage limit is switched off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Selected counties in the order they were picked, without duplicates.
    pub counties: Vec<String>,
    /// Incidents must have burned strictly fewer acres than this.
    pub max_acres: Option<u32>,
    pub years: BTreeSet<i32>,
}

impl Selection {
    /// The acreage threshold as used by [`filter_incidents`].
    pub fn acres_threshold(&self) -> f64 {
        self.max_acres.map_or(f64::INFINITY, f64::from)
    }

    /// Add `county` if absent, remove it otherwise.
    pub fn toggle_county(&mut self, county: &str) {
        if let Some(pos) = self.counties.iter().position(|c| c == county) {
            self.counties.remove(pos);
        } else {
            self.counties.push(county.to_string());
        }
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of incidents passing all three predicates.
///
/// An incident passes when:
/// * `counties` is empty, or its county is listed
/// * its acreage is known and `< max_acres`
/// * `years` is empty, or its archive year is listed
pub fn filter_incidents(
    dataset: &IncidentDataset,
    counties: &[String],
    max_acres: f64,
    years: &BTreeSet<i32>,
) -> Vec<usize> {
    dataset
        .incidents
        .iter()
        .enumerate()
        .filter(|(_, inc)| {
            if !counties.is_empty() && !counties.iter().any(|c| *c == inc.county) {
                return false;
            }
            if max_acres.is_finite() {
                // Unknown acreage compares like NaN: never below a finite limit.
                match inc.acres_burned {
                    Some(acres) if acres < max_acres => {}
                    _ => return false,
                }
            }
            years.is_empty() || years.contains(&inc.archive_year)
        })
        .map(|(i, _)| i)
        .collect()
}

/// [`filter_incidents`] driven by a [`Selection`].
pub fn filtered_indices(dataset: &IncidentDataset, selection: &Selection) -> Vec<usize> {
    filter_incidents(
        dataset,
        &selection.counties,
        selection.acres_threshold(),
        &selection.years,
    )
}

/// Resolve a list of indices into borrowed rows.
pub fn filtered_view<'a>(dataset: &'a IncidentDataset, indices: &[usize]) -> Vec<&'a Incident> {
    indices
        .iter()
        .filter_map(|&i| dataset.incidents.get(i))
        .collect()
}
