use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::TOP_N_RANGE;
use crate::data::assemble::{REGIONS_RANGE, ROW_COUNT_RANGE};
use crate::state::{AppState, UploadStatus};

// ---------------------------------------------------------------------------
// Left side panel – data sources and filters
// ---------------------------------------------------------------------------

/// Render the left "Data & Filters" panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data & Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            group_selector(ui, state);
            ui.separator();
            upload_controls(ui, state);
            ui.separator();
            generator_controls(ui, state);
            ui.separator();
            analysis_controls(ui, state);
            ui.separator();
            export_controls(ui, state);
        });
}

fn group_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Countries");
    if state.group_selection.is_empty() {
        ui.colored_label(
            Color32::YELLOW,
            format!(
                "No CSV files found in `{}`. Add CSVs and rescan.",
                state.data_dir().display()
            ),
        );
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_groups();
        }
        if ui.small_button("None").clicked() {
            state.select_no_groups();
        }
        if ui.small_button("Rescan").clicked() {
            state.rescan();
        }
    });

    let mut toggled: Option<(String, bool)> = None;
    for (group, selected) in &state.group_selection {
        let mut checked = *selected;
        let n_files = state.catalog.get(group).map_or(0, |files| files.len());
        let text = RichText::new(format!("{group}  ({n_files})"))
            .color(state.color_map.color_for(&group.as_str().into()));
        if ui.checkbox(&mut checked, text).changed() {
            toggled = Some((group.clone(), checked));
        }
    }
    if let Some((group, checked)) = toggled {
        state.set_group_selected(&group, checked);
    }
}

fn upload_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Upload a CSV to use as data source");
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Upload…").clicked() {
            open_upload_dialog(state);
        }
        if state.upload.is_some() && ui.button("Clear").clicked() {
            state.clear_upload();
        }
    });
    match &state.upload_status {
        Some(UploadStatus::Loaded(msg)) => {
            ui.colored_label(Color32::GREEN, msg);
        }
        Some(UploadStatus::Failed(msg)) => {
            ui.colored_label(Color32::RED, msg);
        }
        None => {}
    }
}

fn generator_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Or generate a random dataset");
    egui::Grid::new("generator_grid")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Rows");
            ui.add(
                egui::DragValue::new(&mut state.gen_rows)
                    .range(ROW_COUNT_RANGE)
                    .speed(10),
            );
            ui.end_row();

            ui.label("Countries");
            ui.text_edit_singleline(&mut state.gen_countries);
            ui.end_row();

            ui.label("Regions per country");
            ui.add(egui::DragValue::new(&mut state.gen_regions).range(REGIONS_RANGE));
            ui.end_row();
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Generate random dataset").clicked() {
            state.generate();
        }
        if state.generated.is_some() && ui.button("Clear").clicked() {
            state.clear_generated();
        }
    });
}

fn analysis_controls(ui: &mut Ui, state: &mut AppState) {
    if !state.numeric_columns.is_empty() {
        variable_controls(ui, state);
    }
    ui.checkbox(&mut state.show_raw, "Show raw data");
}

fn variable_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Variable (numeric)");
    let current = state.variable.clone().unwrap_or_default();
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("variable")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &state.numeric_columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    chosen = Some(col.clone());
                }
            }
        });
    if let Some(col) = chosen {
        state.set_variable(col);
    }

    let mut top_n = state.top_n;
    if ui
        .add(egui::Slider::new(&mut top_n, TOP_N_RANGE).text("Top N regions"))
        .changed()
    {
        state.set_top_n(top_n);
    }
}

fn export_controls(ui: &mut Ui, state: &mut AppState) {
    ui.add_enabled_ui(!state.dataset.is_empty(), |ui: &mut Ui| {
        ui.checkbox(&mut state.export_metadata, "Include source/country columns");
        if ui.button("Download loaded data as CSV").clicked() {
            save_file_dialog(state);
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with dataset summary and status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload CSV…").clicked() {
                open_upload_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Solar Data — Interactive Dashboard");
        ui.separator();

        if !state.dataset.is_empty() {
            ui.label(format!(
                "{} rows from {}",
                state.dataset.len(),
                state.source
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_upload_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload a CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.upload_file(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    if state.dataset.is_empty() {
        state.status_message = Some("Error: nothing to export".to_string());
        return;
    }
    let file = rfd::FileDialog::new()
        .set_title("Download loaded data")
        .add_filter("CSV", &["csv"])
        .set_file_name(&state.config.display.export_file_name)
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
