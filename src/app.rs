use eframe::egui::{self, Color32, ScrollArea, Ui};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

const PLOT_HEIGHT: f32 = 420.0;
const RAW_TABLE_HEIGHT: f32 = 400.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sources and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot, ranking, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    central(ui, &self.state);
                });
        });
    }
}

fn central(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(
                "No data loaded. Upload a CSV, generate random data, or choose countries \
                 from the sidebar (CSV files in the data directory required).",
            );
        });
        return;
    }

    if state.numeric_columns.is_empty() {
        ui.colored_label(
            Color32::RED,
            "No numeric columns found in loaded data to visualize.",
        );
        if state.show_raw {
            table::raw_table(ui, state, RAW_TABLE_HEIGHT);
        }
        return;
    }

    if let Some(err) = &state.analysis_error {
        ui.colored_label(Color32::RED, err);
    }

    if let (Some(variable), Some(dimension)) = (&state.variable, state.dimension) {
        ui.heading(format!("Distribution of {variable} by {dimension}"));
        plot::distribution_plot(ui, state, PLOT_HEIGHT);
        ui.add_space(8.0);

        ui.heading("Top regions by average");
        table::ranking_table(ui, state);
        ui.add_space(8.0);
    }

    if state.show_raw {
        ui.heading("Raw data");
        table::raw_table(ui, state, RAW_TABLE_HEIGHT);
    }
}
