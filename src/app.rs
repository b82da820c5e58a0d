use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FirePandaApp {
    pub state: AppState,
}

impl FirePandaApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for FirePandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("dashboard_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Exploring Data: California Fires");
    ui.label("Explore this data of California Fires. Use the sidebar to begin.");
    ui.add_space(8.0);

    if state.dataset.is_none() {
        ui.label("Open a file to view incidents  (File → Open…)");
        return;
    }

    if state.dataset.as_ref().is_some_and(|ds| ds.is_empty()) {
        ui.label("The loaded file contains no incidents.");
        return;
    }

    let dash = &state.dashboard;
    ui.weak(format!("{} incidents match the current selection", dash.visible_rows));

    ui.heading(
        "Crews involved in putting out fires each year in each county of California",
    );
    table::year_counts(ui, &dash.year_counts);
    ui.add_space(4.0);
    table::pivot_table(ui, &dash.pivot);

    if state.selection.counties.is_empty() {
        return;
    }

    ui.add_space(12.0);
    ui.separator();
    ui.heading("Fires in California");

    if let Some(map) = &dash.map {
        ui.label("View a map of California Fires");
        charts::fire_map(ui, map);
    }

    ui.add_space(12.0);
    if let Some(pie) = &dash.pie {
        ui.label("Share of fires by county among the counties selected");
        charts::pie_chart(ui, pie, state.color_map.as_ref());
    }

    ui.add_space(12.0);
    ui.label("Average acres burned per fire, by county");
    charts::bar_chart(ui, &dash.bars, state.color_map.as_ref());
}
