use crate::app::ScheduleApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top menu bar.
pub fn show_toolbar(app: &mut ScheduleApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Scenario").clicked() {
                app.new_scenario();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_scenario();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_scenario();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_scenario_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import Shipments CSV...").clicked() {
                app.import_shipments();
                ui.close_menu();
            }
            if ui.button("  Export Schedule CSV...").clicked() {
                app.export_schedule();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Load Result...").clicked() {
                app.load_result();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.scenario.result.is_some(), egui::Button::new("  Clear Result"))
                .clicked()
            {
                app.clear_result();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In").clicked() {
                app.timeline.timeline_mut().zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out").clicked() {
                app.timeline.timeline_mut().zoom_out();
                ui.close_menu();
            }
            if ui.button("  Reset Zoom").clicked() {
                app.timeline.timeline_mut().reset_zoom();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Reload Settings").clicked() {
                app.reload_settings();
                ui.close_menu();
            }
            if ui.button("  Open Settings Folder").clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned scenario name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let unsaved = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.scenario.name, unsaved))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
