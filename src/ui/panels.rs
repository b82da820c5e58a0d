use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::{ACRES_SLIDER_MAX, YEAR_OPTIONS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the sidebar: county multi-select, acreage slider, year multi-select.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.label("Choose options to display data");
    ui.separator();

    let counties = match &state.dataset {
        Some(ds) => ds.counties.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            acres_slider(ui, state);
            ui.separator();
            year_select(ui, state);
            ui.separator();
            county_select(ui, state, &counties);
        });
}

fn county_select(ui: &mut Ui, state: &mut AppState, counties: &[String]) {
    let header_text = format!(
        "Select Counties  ({}/{})",
        state.selection.counties.len(),
        counties.len()
    );

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("county_select")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_counties();
                }
                if ui.small_button("None").clicked() {
                    state.clear_counties();
                }
            });

            for county in counties {
                let mut checked = state.selection.counties.contains(county);

                // Selected counties show in their chart colour.
                let mut text = RichText::new(county.as_str());
                if checked {
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(county));
                    }
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_county(county);
                }
            }
        });
}

fn acres_slider(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Number of Acres");

    let mut limited = state.selection.max_acres.is_some();
    let mut value = state.selection.max_acres.unwrap_or(ACRES_SLIDER_MAX);

    ui.checkbox(&mut limited, "Only fires smaller than");
    ui.add_enabled(
        limited,
        Slider::new(&mut value, 0..=ACRES_SLIDER_MAX).suffix(" acres"),
    );
    state.set_max_acres(limited.then_some(value));

    ui.weak(format!(
        "{} distinct acreage values in view",
        state.dashboard.distinct_acreages
    ));
}

fn year_select(ui: &mut Ui, state: &mut AppState) {
    let header_text = format!("Year  ({}/{})", state.selection.years.len(), YEAR_OPTIONS.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("year_select")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for year in YEAR_OPTIONS {
                let mut checked = state.selection.years.contains(&year);
                if ui.checkbox(&mut checked, year.to_string()).changed() {
                    state.toggle_year(year);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} incidents loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open fire incident data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
