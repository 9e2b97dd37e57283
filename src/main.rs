#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use vrp_schedule::app::ScheduleApp;
use vrp_schedule::config::AppSettings;
use vrp_schedule::telemetry;

fn main() -> eframe::Result<()> {
    let _ = telemetry::init_tracing();

    let settings_path = AppSettings::default_path();
    let settings = AppSettings::load(&settings_path);
    tracing::info!(path = %settings_path.display(), "settings resolved");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("VRP Schedule Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "VRP Schedule Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(ScheduleApp::new(cc, settings, settings_path)))),
    )
}
