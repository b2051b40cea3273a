use anyhow::anyhow;
use clap::Parser;
use eframe::egui;

use solar_dashboard::app::DashboardApp;
use solar_dashboard::cli::Args;
use solar_dashboard::config::{AppConfig, ConfigManager};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = ConfigManager::for_args(&args)?.write_default_config(args.force)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = match AppConfig::load(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}; using defaults");
            let mut config = AppConfig::default();
            config.apply_args(&args);
            config.validate();
            config
        }
    };
    log::info!("Scanning {} for CSV files", config.data.dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Solar Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
