use crate::error::DashboardError;

use super::aggregate::{self, CountyAverages, PivotTable};
use super::filter::{self, Selection, YEAR_OPTIONS};
use super::model::{Incident, IncidentDataset};

/// Offset (fraction of the radius) of the emphasised pie slice.
pub const PIE_EXPLODE: f64 = 0.25;

/// Initial map zoom, slippy-map convention (0 = whole world).
pub const DEFAULT_MAP_ZOOM: u8 = 5;

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    /// Share of the total, 0.0 when every count is zero.
    pub fraction: f64,
    /// Radial offset as a fraction of the radius; non-zero only on the
    /// largest slice.
    pub explode: f64,
}

impl PieSlice {
    pub fn is_emphasized(&self) -> bool {
        self.explode > 0.0
    }

    /// Percentage text drawn on the slice.
    pub fn percent_label(&self) -> String {
        format!("{:.2}", self.fraction * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// Index of the largest count; ties go to the earliest.
pub fn emphasis_index(counts: &[usize]) -> Option<usize> {
    counts
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, &c)| match best {
            Some((_, top)) if top >= c => best,
            _ => Some((i, c)),
        })
        .map(|(i, _)| i)
}

/// Pair parallel `counts` and `labels` into slices, exploding the largest.
pub fn pie_data(counts: &[usize], labels: &[String]) -> Result<PieChart, DashboardError> {
    let emphasis = emphasis_index(counts).ok_or(DashboardError::EmptySelection("counties"))?;
    let total: usize = counts.iter().sum();

    let slices = counts
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (&value, label))| PieSlice {
            label: label.clone(),
            value,
            fraction: if total == 0 {
                0.0
            } else {
                value as f64 / total as f64
            },
            explode: if i == emphasis { PIE_EXPLODE } else { 0.0 },
        })
        .collect();

    Ok(PieChart {
        title: format!("Fires by County: {}", labels.join(", ")),
        slices,
    })
}

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub county: String,
    pub average: f64,
}

/// One bar per county, in the averages' order.
pub fn bar_data(averages: &CountyAverages) -> Vec<BarDatum> {
    averages
        .iter()
        .map(|(county, average)| BarDatum {
            county: county.clone(),
            average: *average,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub points: Vec<MapPoint>,
    /// `(latitude, longitude)` mean of all points; `None` for an empty view.
    pub center: Option<(f64, f64)>,
    pub zoom: u8,
}

impl MapData {
    /// Initial `([lon_min, lon_max], [lat_min, lat_max])` window around the
    /// centre. A zoom level halves the visible longitude span per step.
    pub fn view_bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let (lat, lon) = self.center?;
        let lon_span = 360.0 / f64::from(1u32 << self.zoom.min(20));
        let lat_span = lon_span / 2.0;
        Some((
            [lon - lon_span / 2.0, lon + lon_span / 2.0],
            [lat - lat_span / 2.0, lat + lat_span / 2.0],
        ))
    }

    /// Point closest to `(longitude, latitude)`, for hover labels.
    pub fn nearest(&self, longitude: f64, latitude: f64) -> Option<&MapPoint> {
        self.points.iter().min_by(|a, b| {
            let da = (a.longitude - longitude).powi(2) + (a.latitude - latitude).powi(2);
            let db = (b.longitude - longitude).powi(2) + (b.latitude - latitude).powi(2);
            da.total_cmp(&db)
        })
    }
}

/// Mean latitude and longitude of `points`.
pub fn centroid(points: &[MapPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    Some((lat, lon))
}

pub fn map_data(rows: &[&Incident]) -> MapData {
    let points: Vec<MapPoint> = rows
        .iter()
        .map(|inc| MapPoint {
            name: inc.name.clone(),
            latitude: inc.latitude,
            longitude: inc.longitude,
        })
        .collect();
    let center = centroid(&points);
    MapData {
        points,
        center,
        zoom: DEFAULT_MAP_ZOOM,
    }
}

// ---------------------------------------------------------------------------
// Dashboard – everything one render pass draws
// ---------------------------------------------------------------------------

/// Chart-ready results for the current [`Selection`]. Rebuilt from scratch
/// whenever the selection or dataset changes.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub visible_rows: usize,
    pub pivot: PivotTable,
    /// Incidents per entry of [`YEAR_OPTIONS`].
    pub year_counts: Vec<(i32, usize)>,
    /// Distinct acreage values among the visible incidents.
    pub distinct_acreages: usize,
    /// Only present when at least one county is selected.
    pub pie: Option<PieChart>,
    pub bars: Vec<BarDatum>,
    pub map: Option<MapData>,
}

impl Dashboard {
    pub fn build(dataset: &IncidentDataset, selection: &Selection, indices: &[usize]) -> Self {
        let rows = filter::filtered_view(dataset, indices);

        let year_counts = YEAR_OPTIONS
            .iter()
            .copied()
            .zip(aggregate::count_years(&rows, &YEAR_OPTIONS))
            .collect();

        let mut dashboard = Dashboard {
            visible_rows: rows.len(),
            pivot: aggregate::pivot_crews(&rows),
            year_counts,
            distinct_acreages: aggregate::distinct_acreage_values(&rows).len(),
            ..Dashboard::default()
        };

        if selection.counties.is_empty() {
            return dashboard;
        }

        let counts = aggregate::count_counties(&rows, &selection.counties);
        dashboard.pie = match pie_data(&counts, &selection.counties) {
            Ok(pie) => Some(pie),
            Err(e) => {
                log::warn!("Pie chart skipped: {e}");
                None
            }
        };
        let groups = aggregate::acres_by_county(&rows);
        let averages = match aggregate::average_by_county(&groups) {
            Ok(averages) => averages,
            Err(e) => {
                log::debug!("{e}; leaving such counties out of the bar chart");
                aggregate::average_by_county_lossy(&groups)
            }
        };
        dashboard.bars = bar_data(&averages);
        dashboard.map = Some(map_data(&rows));
        dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::incident;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn emphasis_goes_to_first_maximum() {
        assert_eq!(emphasis_index(&[3, 5, 5]), Some(1));
        assert_eq!(emphasis_index(&[9, 1]), Some(0));
        assert_eq!(emphasis_index(&[0, 0, 0]), Some(0));
        assert_eq!(emphasis_index(&[]), None);
    }

    #[test]
    fn pie_explodes_only_the_largest_slice() {
        let pie = pie_data(&[3, 5, 5], &labels(&["Napa", "Butte", "Shasta"])).unwrap();
        let flags: Vec<bool> = pie.slices.iter().map(PieSlice::is_emphasized).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(pie.slices[1].explode, PIE_EXPLODE);
        assert_eq!(pie.title, "Fires by County: Napa, Butte, Shasta");
        assert_eq!(pie.slices[0].percent_label(), "23.08");
    }

    #[test]
    fn pie_of_zero_counts_has_zero_fractions() {
        let pie = pie_data(&[0, 0], &labels(&["Napa", "Butte"])).unwrap();
        assert!(pie.slices.iter().all(|s| s.fraction == 0.0));
        assert!(pie.slices[0].is_emphasized());
    }

    #[test]
    fn pie_without_counties_is_empty_selection() {
        assert!(matches!(
            pie_data(&[], &[]),
            Err(DashboardError::EmptySelection("counties"))
        ));
    }

    #[test]
    fn bars_keep_average_order() {
        let averages = vec![("Napa".to_string(), 200.0), ("Butte".to_string(), 7.5)];
        let bars = bar_data(&averages);
        assert_eq!(bars[0].county, "Napa");
        assert_eq!(bars[0].average, 200.0);
        assert_eq!(bars[1].county, "Butte");
    }

    #[test]
    fn map_centroid_is_mean_position() {
        let mut a = incident("Los Angeles", 1.0, 2018, 0);
        a.latitude = 34.0;
        a.longitude = -118.0;
        let mut b = incident("Fresno", 1.0, 2018, 0);
        b.latitude = 36.0;
        b.longitude = -120.0;

        let map = map_data(&[&a, &b]);
        assert_eq!(map.center, Some((35.0, -119.0)));
        assert_eq!(map.zoom, DEFAULT_MAP_ZOOM);
        assert_eq!(map.points[1].name, b.name);

        let (lon, lat) = map.view_bounds().unwrap();
        assert_eq!(lon, [-119.0 - 5.625, -119.0 + 5.625]);
        assert_eq!(lat, [35.0 - 2.8125, 35.0 + 2.8125]);

        assert_eq!(map.nearest(-118.2, 34.1).unwrap().name, a.name);
    }

    #[test]
    fn empty_map_has_no_center() {
        let map = map_data(&[]);
        assert_eq!(map.center, None);
        assert_eq!(map.view_bounds(), None);
        assert!(map.nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn dashboard_without_counties_has_only_table() {
        let ds = IncidentDataset::new(
            vec![incident("Napa", 10.0, 2017, 3), incident("Butte", 20.0, 2018, 4)],
            "test.csv",
        );
        let selection = Selection::default();
        let idx = filter::filtered_indices(&ds, &selection);
        let dash = Dashboard::build(&ds, &selection, &idx);

        assert_eq!(dash.visible_rows, 2);
        assert_eq!(dash.pivot.get("Butte", 2018), 4);
        assert!(dash.pie.is_none());
        assert!(dash.map.is_none());
        assert!(dash.bars.is_empty());
        assert!(dash.year_counts.contains(&(2017, 1)));
        assert_eq!(dash.distinct_acreages, 2);
    }

    #[test]
    fn dashboard_with_counties_builds_charts() {
        let ds = IncidentDataset::new(
            vec![
                incident("Napa", 100.0, 2017, 3),
                incident("Napa", 300.0, 2018, 1),
                incident("Butte", 20.0, 2018, 4),
                incident("Shasta", 5.0, 2018, 9),
            ],
            "test.csv",
        );
        let selection = Selection {
            counties: labels(&["Napa", "Butte"]),
            ..Selection::default()
        };
        let idx = filter::filtered_indices(&ds, &selection);
        let dash = Dashboard::build(&ds, &selection, &idx);

        let pie = dash.pie.unwrap();
        assert_eq!(pie.slices[0].value, 2);
        assert!(pie.slices[0].is_emphasized());
        assert_eq!(
            dash.bars,
            vec![
                BarDatum {
                    county: "Napa".to_string(),
                    average: 200.0,
                },
                BarDatum {
                    county: "Butte".to_string(),
                    average: 20.0,
                },
            ]
        );
        assert_eq!(dash.map.unwrap().points.len(), 3);
        assert_eq!(dash.pivot.get("Shasta", 2018), 0);
    }
}
