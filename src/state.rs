use crate::color::ColorMap;
use crate::data::chart::Dashboard;
use crate::data::filter::{Selection, filtered_indices};
use crate::data::model::IncidentDataset;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None when the startup load failed).
    pub dataset: Option<IncidentDataset>,

    /// Current sidebar choices.
    pub selection: Selection,

    /// Indices of incidents passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Chart data for the current selection.
    pub dashboard: Dashboard,

    /// Per-county colours, built from the dataset's county list.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// State after the startup load, successful or not.
    pub fn from_load(result: Result<IncidentDataset, DashboardError>) -> Self {
        let mut state = AppState::default();
        match result {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load incidents: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
        state
    }

    /// Ingest a newly loaded dataset and reset the selection.
    pub fn set_dataset(&mut self, dataset: IncidentDataset) {
        log::info!(
            "Loaded {} incidents across {} counties from {}",
            dataset.len(),
            dataset.counties.len(),
            dataset.source.display()
        );
        self.color_map = Some(ColorMap::new(&dataset.counties));
        self.selection = Selection::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and the dashboard after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.selection);
        self.dashboard = Dashboard::build(ds, &self.selection, &self.visible_indices);
        log::debug!(
            "Selection {:?} matches {} incidents",
            self.selection,
            self.visible_indices.len()
        );
    }

    pub fn toggle_county(&mut self, county: &str) {
        self.selection.toggle_county(county);
        self.refilter();
    }

    /// Select every county, in dataset order.
    pub fn select_all_counties(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.counties = ds.counties.clone();
            self.refilter();
        }
    }

    pub fn clear_counties(&mut self) {
        self.selection.counties.clear();
        self.refilter();
    }

    pub fn toggle_year(&mut self, year: i32) {
        self.selection.toggle_year(year);
        self.refilter();
    }

    pub fn set_max_acres(&mut self, max_acres: Option<u32>) {
        if self.selection.max_acres != max_acres {
            self.selection.max_acres = max_acres;
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::incident;

    fn state() -> AppState {
        AppState::from_load(Ok(IncidentDataset::new(
            vec![
                incident("Napa", 100.0, 2017, 2),
                incident("Butte", 5_000.0, 2018, 7),
                incident("Napa", 40.0, 2018, 1),
            ],
            "test.csv",
        )))
    }

    #[test]
    fn fresh_state_shows_everything_without_charts() {
        let st = state();
        assert_eq!(st.visible_indices, vec![0, 1, 2]);
        assert!(st.dashboard.pie.is_none());
        assert!(st.status_message.is_none());
    }

    #[test]
    fn selecting_a_county_refilters_and_draws_charts() {
        let mut st = state();
        st.toggle_county("Napa");
        assert_eq!(st.visible_indices, vec![0, 2]);
        assert!(st.dashboard.pie.is_some());
        assert_eq!(st.dashboard.bars[0].average, 70.0);

        st.set_max_acres(Some(50));
        assert_eq!(st.visible_indices, vec![2]);

        st.toggle_year(2017);
        assert!(st.visible_indices.is_empty());
        assert_eq!(st.dashboard.map.as_ref().map(|m| m.center), Some(None));
    }

    #[test]
    fn select_all_and_clear() {
        let mut st = state();
        st.select_all_counties();
        assert_eq!(st.selection.counties, vec!["Napa", "Butte"]);
        st.clear_counties();
        assert!(st.selection.counties.is_empty());
        assert!(st.dashboard.pie.is_none());
    }

    #[test]
    fn failed_load_keeps_message() {
        let st = AppState::from_load(Err(DashboardError::DataUnavailable {
            path: "missing.csv".into(),
            reason: "No such file".to_string(),
        }));
        assert!(st.dataset.is_none());
        assert!(st.status_message.unwrap().contains("missing.csv"));
    }
}
