use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::ColorMap;
use crate::data::chart::{BarDatum, MapData, PieChart};

/// Distance of county labels and percentages from the pie centre, in radii.
const PIE_LABEL_DISTANCE: f64 = 1.1;
const PIE_PCT_DISTANCE: f64 = 0.6;

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Arc vertices of a wedge, split so each polygon spans at most a quarter
/// turn. egui only fills convex shapes correctly.
fn wedge_segments(cx: f64, cy: f64, start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f64;

    (0..pieces)
        .map(|p| {
            let a0 = start + p as f64 * piece_sweep;
            let steps = ((piece_sweep / TAU) * 96.0).ceil().max(2.0) as usize;
            let mut points = vec![[cx, cy]];
            points.extend((0..=steps).map(|s| {
                let a = a0 + piece_sweep * s as f64 / steps as f64;
                [cx + a.cos(), cy + a.sin()]
            }));
            points
        })
        .collect()
}

/// Fire counts per selected county, largest slice pulled out.
pub fn pie_chart(ui: &mut Ui, pie: &PieChart, colors: Option<&ColorMap>) {
    ui.strong(pie.title.as_str());

    if pie.slices.iter().all(|s| s.value == 0) {
        ui.label("No fires recorded for the selected counties.");
        return;
    }

    Plot::new("pie_chart")
        .height(340.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.7)
        .include_x(1.7)
        .include_y(-1.5)
        .include_y(1.5)
        .show(ui, |plot_ui| {
            // Counter-clockwise from the positive x axis.
            let mut start = 0.0;
            for slice in &pie.slices {
                let sweep = slice.fraction * TAU;
                let mid = start + sweep / 2.0;
                let (dx, dy) = (slice.explode * mid.cos(), slice.explode * mid.sin());
                let color = colors.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(&slice.label));

                if sweep > 0.0 {
                    for points in wedge_segments(dx, dy, start, sweep) {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::new(points))
                                .fill_color(color)
                                .stroke(Stroke::new(
                                    if slice.is_emphasized() { 2.0 } else { 1.0 },
                                    Color32::WHITE,
                                ))
                                .name(&slice.label),
                        );
                    }
                    plot_ui.text(Text::new(
                        PlotPoint::new(
                            dx + PIE_PCT_DISTANCE * mid.cos(),
                            dy + PIE_PCT_DISTANCE * mid.sin(),
                        ),
                        slice.percent_label(),
                    ));
                }

                plot_ui.text(Text::new(
                    PlotPoint::new(
                        dx + PIE_LABEL_DISTANCE * mid.cos(),
                        dy + PIE_LABEL_DISTANCE * mid.sin(),
                    ),
                    slice.label.clone(),
                ));

                start += sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Average acres burned per county.
pub fn bar_chart(ui: &mut Ui, bars: &[BarDatum], colors: Option<&ColorMap>) {
    ui.strong("Average Acres Burned by County");

    if bars.is_empty() {
        ui.label("No acreage recorded for the selected counties.");
        return;
    }

    let labels: Vec<String> = bars.iter().map(|b| b.county.clone()).collect();
    let chart = BarChart::new(
        bars.iter()
            .enumerate()
            .map(|(i, b)| {
                Bar::new(i as f64, b.average)
                    .name(&b.county)
                    .width(0.7)
                    .fill(colors.map_or(Color32::from_rgb(100, 150, 255), |cm| {
                        cm.color_for(&b.county)
                    }))
            })
            .collect(),
    )
    .element_formatter(Box::new(|bar: &Bar, _: &BarChart| {
        format!("{}\n{:.1} acres", bar.name, bar.value)
    }));

    Plot::new("bar_chart")
        .height(280.0)
        .x_axis_label("Counties")
        .y_axis_label("Acres Burned")
        .allow_drag(false)
        .allow_scroll(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Fire locations as a longitude/latitude scatter, centred on their mean.
pub fn fire_map(ui: &mut Ui, map: &MapData) {
    if map.points.is_empty() {
        ui.label("No fire locations to show.");
        return;
    }

    let points: PlotPoints = map
        .points
        .iter()
        .map(|p| [p.longitude, p.latitude])
        .collect();

    let mut plot = Plot::new("fire_map")
        .height(420.0)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|name, value| {
            // Only label when hovering a fire, not empty map.
            if name.is_empty() {
                return String::new();
            }
            map.nearest(value.x, value.y)
                .map(|p| format!("Fires:\n{}", p.name))
                .unwrap_or_default()
        });

    if let Some(([lon_min, lon_max], [lat_min, lat_max])) = map.view_bounds() {
        plot = plot
            .include_x(lon_min)
            .include_x(lon_max)
            .include_y(lat_min)
            .include_y(lat_max);
    }

    plot.show(ui, |plot_ui| {
        plot_ui.points(
            Points::new(points)
                .radius(3.0)
                .color(Color32::from_rgb(255, 0, 0))
                .name("Fires"),
        );
    });
}
