use crate::model::{Row, RowSource, ScheduleRows};
use crate::timeline::ticks::format_tick_label;
use crate::ui::theme;
use egui::{Color32, RichText, Ui};

/// Actions that the row panel can request.
pub enum RowPanelAction {
    None,
    Select(String),
    ClearSelection,
}

/// Render the left-side list of timeline rows, with the bars of the
/// selected row expanded underneath.
pub fn show_row_panel(rows: &ScheduleRows, selected_row: Option<&str>, ui: &mut Ui) -> RowPanelAction {
    let mut action = RowPanelAction::None;

    let title = match rows.source {
        RowSource::ShipmentWindows => "Shipments",
        RowSource::VehicleRoutes => "Routes",
    };

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(title).strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", rows.rows.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        if !rows.is_editable() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(egui_phosphor::regular::LOCK_SIMPLE)
                        .color(theme::TEXT_DIM),
                )
                .on_hover_text("Solver routes are read-only");
            });
        }
    });
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, row) in rows.rows.iter().enumerate() {
                let is_selected = selected_row == Some(row.id.as_str());

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;

                        let dot = row.bars.first().map_or(theme::TEXT_DIM, |b| b.color);
                        let (dot_rect, _) =
                            ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot_rect.center(), 3.0, dot);

                        let name_text = RichText::new(&row.name).size(12.0).color(if is_selected {
                            Color32::WHITE
                        } else {
                            theme::TEXT_PRIMARY
                        });
                        ui.add(egui::Label::new(name_text).truncate());

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if row.bars.iter().any(|b| b.late) {
                                ui.label(
                                    RichText::new(egui_phosphor::regular::WARNING)
                                        .color(theme::LATE_RING),
                                )
                                .on_hover_text("Has late stops");
                            }
                            ui.label(
                                RichText::new(span_label(row))
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                            );
                        });
                    });

                    if is_selected {
                        show_bar_details(row, ui);
                    }
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("row-panel", &row.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = if is_selected {
                        RowPanelAction::ClearSelection
                    } else {
                        RowPanelAction::Select(row.id.clone())
                    };
                }

                ui.add_space(1.0);
            }
        });

    action
}

/// Earliest start to latest end of a row, e.g. `01:00 → 05:00`.
fn span_label(row: &Row) -> String {
    let start = row.bars.iter().map(|b| b.interval.start).fold(f64::INFINITY, f64::min);
    let end = row.bars.iter().map(|b| b.interval.end).fold(f64::NEG_INFINITY, f64::max);
    if !start.is_finite() || !end.is_finite() {
        return "-".to_string();
    }
    format!(
        "{} → {}",
        format_tick_label(start.max(0.0) as u32),
        format_tick_label(end.max(0.0) as u32)
    )
}

fn show_bar_details(row: &Row, ui: &mut Ui) {
    ui.add_space(2.0);
    egui::Grid::new(("bar-details", &row.id))
        .num_columns(2)
        .spacing([10.0, 2.0])
        .show(ui, |ui| {
            for bar in &row.bars {
                let color = if bar.late { theme::LATE_RING } else { theme::TEXT_SECONDARY };
                ui.label(RichText::new(&bar.label).size(11.0).color(color));
                ui.label(
                    RichText::new(format!(
                        "{} → {}",
                        format_tick_label(bar.interval.start.max(0.0) as u32),
                        format_tick_label(bar.interval.end.max(0.0) as u32),
                    ))
                    .size(10.5)
                    .color(theme::TEXT_DIM),
                );
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bar, TimeInterval};

    fn bar(start: f64, end: f64) -> Bar {
        Bar {
            interval: TimeInterval::new(start, end),
            label: "x".into(),
            color: Color32::WHITE,
            late: false,
        }
    }

    #[test]
    fn span_covers_all_bars() {
        let row = Row {
            id: "r".into(),
            name: "R".into(),
            bars: vec![bar(120.0, 180.0), bar(60.0, 90.0)],
        };
        assert_eq!(span_label(&row), "01:00 → 03:00");
    }

    #[test]
    fn empty_row_has_placeholder_span() {
        let row = Row {
            id: "r".into(),
            name: "R".into(),
            bars: Vec::new(),
        };
        assert_eq!(span_label(&row), "-");
    }
}
