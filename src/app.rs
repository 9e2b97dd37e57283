use std::path::PathBuf;

use crate::config::AppSettings;
use crate::model::{build_rows, Scenario};
use crate::timeline::BarEdit;
use crate::ui;
use crate::ui::row_panel::RowPanelAction;
use crate::ui::ScheduleTimeline;

const TIMELINE_ID: &str = "schedule-timeline";

/// Main application state.
pub struct ScheduleApp {
    pub scenario: Scenario,
    pub settings: AppSettings,
    pub settings_path: PathBuf,
    pub timeline: ScheduleTimeline,
    pub file_path: Option<PathBuf>,
    pub selected_row: Option<String>,

    pub show_about: bool,
    pub status_message: String,
}

impl ScheduleApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings, settings_path: PathBuf) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        Self::with_scenario(Scenario::sample(), settings, settings_path)
    }

    /// Build the app state without a window, around a given scenario.
    pub fn with_scenario(scenario: Scenario, settings: AppSettings, settings_path: PathBuf) -> Self {
        let horizon = build_rows(&scenario, &settings.timeline).horizon;
        let timeline = ScheduleTimeline::new(TIMELINE_ID, horizon, &settings.timeline);
        Self {
            scenario,
            settings,
            settings_path,
            timeline,
            file_path: None,
            selected_row: None,
            show_about: false,
            status_message: "Ready".to_string(),
        }
    }

    /// Replace the scenario and start over with a fully zoomed-out timeline.
    fn replace_scenario(&mut self, scenario: Scenario, file_path: Option<PathBuf>) {
        let horizon = build_rows(&scenario, &self.settings.timeline).horizon;
        self.timeline = ScheduleTimeline::new(TIMELINE_ID, horizon, &self.settings.timeline);
        self.scenario = scenario;
        self.file_path = file_path;
        self.selected_row = None;
    }

    // --- File operations ---

    pub fn new_scenario(&mut self) {
        self.replace_scenario(Scenario::default(), None);
        self.status_message = "New scenario created".to_string();
    }

    pub fn open_scenario(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Scenario", &["json"])
            .pick_file()
        {
            match crate::io::load_scenario(&path) {
                Ok(scenario) => {
                    self.replace_scenario(scenario, Some(path));
                    self.status_message = "Scenario loaded".to_string();
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to open scenario");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_scenario(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.scenario.touch();
            match crate::io::save_scenario(&self.scenario, &path) {
                Ok(()) => self.status_message = "Scenario saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_scenario_as();
        }
    }

    pub fn save_scenario_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Scenario", &["json"])
            .set_file_name(format!("{}.json", self.scenario.name))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.scenario.touch();
            match crate::io::save_scenario(&self.scenario, &path) {
                Ok(()) => self.status_message = "Scenario saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_shipments(&mut self) {
        if !self.scenario.shipments.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import Shipments")
                .set_description("This replaces the current shipments and clears the solver result. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match crate::io::csv_import::import_shipments(&path, &self.scenario.sites) {
                Ok((shipments, skipped)) => {
                    let count = shipments.len();
                    self.scenario.shipments = shipments;
                    self.scenario.set_result(None);
                    self.selected_row = None;
                    self.status_message = if skipped > 0 {
                        format!("Imported {} shipments ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} shipments", count)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_schedule(&mut self) {
        let rows = build_rows(&self.scenario, &self.settings.timeline);
        if rows.bar_count() == 0 {
            self.status_message = "Nothing to export, the timeline is empty".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}-schedule.csv", self.scenario.name))
            .save_file()
        {
            match crate::io::csv_export::export_schedule(&rows.rows, &path) {
                Ok(count) => self.status_message = format!("Exported {} bars to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    pub fn load_result(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Solver Result", &["json"])
            .pick_file()
        {
            match crate::io::load_result(&path) {
                Ok(result) => {
                    let routes = result.routes.len();
                    self.scenario.set_result(Some(result));
                    self.selected_row = None;
                    self.status_message = format!("Loaded result with {} routes", routes);
                }
                Err(e) => {
                    self.status_message = format!("Error loading result: {}", e);
                }
            }
        }
    }

    pub fn clear_result(&mut self) {
        self.scenario.set_result(None);
        self.selected_row = None;
        self.status_message = "Result cleared, shipment windows are editable again".to_string();
    }

    // --- Settings ---

    /// Show the settings folder, writing a default `settings.json` first so
    /// there is something to edit.
    pub fn open_settings_folder(&mut self) {
        if !self.settings_path.exists() {
            if let Err(e) = self.settings.save(&self.settings_path) {
                self.status_message = format!("Could not write settings: {}", e);
                return;
            }
        }
        let dir = self
            .settings_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(AppSettings::config_dir);
        if let Err(e) = open::that(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to open settings folder");
            self.status_message = format!("Could not open {}", dir.display());
        }
    }

    pub fn reload_settings(&mut self) {
        self.settings = AppSettings::load(&self.settings_path);
        self.timeline.timeline_mut().set_config(&self.settings.timeline);
        self.status_message = "Settings reloaded".to_string();
    }

    /// Apply a bar edit from the timeline to the scenario.
    pub fn apply_edit(&mut self, edit: &BarEdit) {
        apply_edit(&mut self.scenario, &mut self.status_message, edit);
    }
}

fn apply_edit(scenario: &mut Scenario, status: &mut String, edit: &BarEdit) {
    match scenario.update_shipment_window(&edit.row_id, edit.bar_index, edit.start, edit.end) {
        Ok(()) => {
            let which = if edit.bar_index == 0 { "pickup" } else { "delivery" };
            let name = scenario
                .shipment(&edit.row_id)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            *status = format!(
                "Moved {} window of '{}' to {} → {}",
                which,
                name,
                crate::timeline::ticks::format_tick_label(edit.start),
                crate::timeline::ticks::format_tick_label(edit.end),
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejected timeline edit");
            *status = format!("Edit rejected: {}", e);
        }
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_scenario();
        }

        let rows = build_rows(&self.scenario, &self.settings.timeline);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::STATUS_BAR_BG)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let zoom = self.timeline.timeline().viewport().zoom_ratio();
                        ui.label(
                            egui::RichText::new(format!("Zoom: {:.0}%", zoom * 100.0))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!("Rows: {}", rows.rows.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: row list
        let mut panel_action = RowPanelAction::None;
        egui::SidePanel::left("row_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(180.0)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                panel_action = ui::row_panel::show_row_panel(&rows, self.selected_row.as_deref(), ui);
            });
        match panel_action {
            RowPanelAction::Select(id) => self.selected_row = Some(id),
            RowPanelAction::ClearSelection => self.selected_row = None,
            RowPanelAction::None => {}
        }

        // Central panel: timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let scenario = &mut self.scenario;
            let status = &mut self.status_message;
            let mut apply = |edit: BarEdit| apply_edit(scenario, status, &edit);
            let on_edit: Option<&mut dyn FnMut(BarEdit)> = if rows.is_editable() {
                Some(&mut apply)
            } else {
                None
            };
            let output = self.timeline.show(ui, &rows, on_edit);
            if let Some(id) = output.clicked_row {
                self.selected_row = Some(id);
            }
        });

        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ScheduleApp {
        ScheduleApp::with_scenario(
            Scenario::sample(),
            AppSettings::default(),
            std::env::temp_dir().join("vrp-schedule-app-test.json"),
        )
    }

    #[test]
    fn edit_moves_the_shipment_window() {
        let mut app = app();
        app.apply_edit(&BarEdit {
            row_id: "ship_1".into(),
            bar_index: 1,
            start: 150,
            end: 330,
        });
        let ship = app.scenario.shipment("ship_1").unwrap();
        assert_eq!(ship.delivery_window.start, 150);
        assert_eq!(ship.delivery_window.end, 330);
        assert!(app.status_message.starts_with("Moved delivery window"));
    }

    #[test]
    fn edit_for_unknown_row_is_reported() {
        let mut app = app();
        app.apply_edit(&BarEdit {
            row_id: "nope".into(),
            bar_index: 0,
            start: 0,
            end: 10,
        });
        assert!(app.status_message.starts_with("Edit rejected"));
    }

    #[test]
    fn clearing_result_makes_rows_editable_again() {
        let mut app = app();
        app.scenario.set_result(Some(crate::model::OptimizeResult {
            status: crate::model::schedule::SolveStatus::Feasible,
            routes: Vec::new(),
            unserved_shipments: Vec::new(),
            total_cost: 0.0,
        }));
        assert!(!build_rows(&app.scenario, &app.settings.timeline).is_editable());
        app.clear_result();
        assert!(build_rows(&app.scenario, &app.settings.timeline).is_editable());
    }

    #[test]
    fn new_scenario_resets_timeline_and_selection() {
        let mut app = app();
        app.selected_row = Some("ship_1".into());
        app.timeline.timeline_mut().zoom_in();
        app.new_scenario();
        assert!(app.selected_row.is_none());
        assert!(app.timeline.timeline().viewport().is_fully_zoomed_out());
        assert!(app.scenario.shipments.is_empty());
    }
}
