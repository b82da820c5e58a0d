use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::PivotTable;

/// County × year table of crews involved, with a total column.
pub fn pivot_table(ui: &mut Ui, table: &PivotTable) {
    if table.is_empty() {
        ui.label("No incidents match the current selection.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(48.0), table.years.len())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("County");
            });
            for year in &table.years {
                header.col(|ui| {
                    ui.strong(year.to_string());
                });
            }
            header.col(|ui| {
                ui.strong("Total");
            });
        })
        .body(|mut body| {
            for (i, county) in table.counties.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(county.as_str());
                    });
                    for year in &table.years {
                        row.col(|ui| {
                            ui.label(table.get(county, *year).to_string());
                        });
                    }
                    row.col(|ui| {
                        ui.label(table.row_total(i).to_string());
                    });
                });
            }
        });
}

/// One-line summary of incidents per archive year.
pub fn year_counts(ui: &mut Ui, counts: &[(i32, usize)]) {
    ui.horizontal_wrapped(|ui| {
        ui.strong("Fires per year:");
        for (year, count) in counts {
            ui.label(format!("{year}: {count}"));
        }
    });
}
