use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::CellValue;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Ranking table
// ---------------------------------------------------------------------------

/// "Top regions by average": dimension, country, mean and point count.
pub fn ranking_table(ui: &mut Ui, state: &AppState) {
    let (Some(variable), Some(dimension)) = (&state.variable, state.dimension) else {
        return;
    };
    let headers = [
        dimension.to_string(),
        "country".to_string(),
        format!("mean_{variable}"),
        "n_points".to_string(),
    ];

    ui.push_id("ranking_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(90.0), headers.len())
            .header(HEADER_HEIGHT, |mut header| {
                for h in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, state.ranking.len(), |mut row| {
                    let r = &state.ranking[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(r.dimension_value.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        let color = state.color_map.color_for(&r.label);
                        ui.label(RichText::new(r.label.to_string()).color(color));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.3}", r.mean));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.count.to_string());
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Every row of the assembled dataset.
pub fn raw_table(ui: &mut Ui, state: &AppState, max_height: f32) {
    let table = &state.dataset;
    let columns = table.columns();
    if columns.is_empty() {
        return;
    }

    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(70.0).clip(true), columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let i = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label(i.to_string());
                    });
                    for cell in &table.rows()[i] {
                        row.col(|ui: &mut Ui| {
                            cell_label(ui, cell);
                        });
                    }
                });
            });
    });
}

fn cell_label(ui: &mut Ui, cell: &CellValue) {
    match cell {
        CellValue::Null => {
            ui.weak("—");
        }
        CellValue::Float(v) => {
            ui.label(format!("{v:.3}"));
        }
        other => {
            ui.label(other.to_string());
        }
    }
}
