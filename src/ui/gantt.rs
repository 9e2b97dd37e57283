use egui::{Align2, Color32, CursorIcon, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::config::TimelineConfig;
use crate::model::{Bar, Row, RowSource, ScheduleRows};
use crate::timeline::{
    layout, ticks, BarEdit, BarTarget, Timeline, Transform, WheelDelta, WheelRegion,
};
use crate::ui::theme;

/// What happened in the timeline this frame, besides edits.
#[derive(Debug, Clone, Default)]
pub struct TimelineOutput {
    /// Row whose name was clicked.
    pub clicked_row: Option<String>,
}

/// The schedule Gantt widget: ruler, scrollable rows and zoom controls.
///
/// Rows are passed in every frame. Bars are only draggable when an edit
/// callback is supplied; the callback receives the rescheduled interval and
/// the widget waits for the next frame's rows to show the new position.
/// Scale and ticks shared by the ruler and every row in one frame.
struct FrameGrid {
    transform: Transform,
    interval: u32,
    /// Tick time and its x offset from the lane's left edge.
    ticks: Vec<(u32, f64)>,
    label_stride: usize,
}

impl FrameGrid {
    fn new(timeline: &Timeline) -> Self {
        let transform = timeline.transform();
        let interval = timeline.tick_interval();
        let ticks = layout::tick_positions(&transform, &timeline.tick_times());
        let label_stride = ticks::label_stride(
            transform.px_per_min(),
            interval,
            timeline.config().min_tick_spacing_px,
        );
        Self {
            transform,
            interval,
            ticks,
            label_stride,
        }
    }
}

pub struct ScheduleTimeline {
    id: Id,
    timeline: Timeline,
    /// Screen x of the lane's left edge in the last frame.
    lane_left: f32,
}

impl ScheduleTimeline {
    pub fn new(id_salt: impl std::hash::Hash, horizon: u32, config: &TimelineConfig) -> Self {
        Self {
            id: Id::new(id_salt),
            timeline: Timeline::new(horizon, config),
            lane_left: 0.0,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        rows: &ScheduleRows,
        mut on_edit: Option<&mut dyn FnMut(BarEdit)>,
    ) -> TimelineOutput {
        let mut output = TimelineOutput::default();
        self.timeline.sync_horizon(rows.horizon);
        let config = self.timeline.config().clone();

        if rows.rows.is_empty() {
            self.timeline.cancel();
            let text = match rows.source {
                RowSource::ShipmentWindows => &config.labels.empty_shipments,
                RowSource::VehicleRoutes => &config.labels.empty_routes,
            };
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(text).color(theme::TEXT_DIM));
            });
            return output;
        }

        let editable = on_edit.is_some();
        let name_w = config.name_column_width;
        let full = ui.available_rect_before_wrap();
        self.lane_left = full.left() + name_w;
        self.timeline.set_width(f64::from(full.width() - name_w));

        self.route_wheel(ui, full, config.header_height);
        let grid = FrameGrid::new(&self.timeline);

        // ── Header ──────────────────────────────────────────────
        let (header_rect, _) =
            ui.allocate_exact_size(Vec2::new(full.width(), config.header_height), Sense::hover());
        let ruler_rect = Rect::from_min_max(
            Pos2::new(self.lane_left, header_rect.top()),
            header_rect.max,
        );
        let ruler = ui.interact(ruler_rect, self.id.with("ruler"), Sense::drag());
        if ruler.drag_started() {
            self.press_background(ui);
        }
        let column_title = match rows.source {
            RowSource::ShipmentWindows => &config.labels.shipments_column,
            RowSource::VehicleRoutes => &config.labels.routes_column,
        };
        self.draw_header(ui, header_rect, ruler_rect, column_title, &grid);

        // ── Body ────────────────────────────────────────────────
        let body_height = (ui.available_height() - theme::FOOTER_HEIGHT).max(config.row_height);
        egui::ScrollArea::vertical()
            .id_salt(self.id.with("rows"))
            .auto_shrink([false, false])
            .max_height(body_height)
            .show_rows(ui, config.row_height, rows.rows.len(), |ui, range| {
                ui.spacing_mut().item_spacing.y = 0.0;
                for idx in range {
                    let row = &rows.rows[idx];
                    if self.show_row(ui, idx, row, editable, &grid) {
                        output.clicked_row = Some(row.id.clone());
                    }
                }
            });

        // ── Footer: zoom controls + legend ─────────────────────
        let legend = match rows.source {
            RowSource::ShipmentWindows => &config.labels.shipments_legend,
            RowSource::VehicleRoutes => &config.labels.routes_legend,
        };
        self.draw_footer(ui, legend);

        // Pointer state is polled globally while a gesture is active, so a
        // release outside the widget still ends it.
        if !self.timeline.is_idle() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            let lane_left = self.lane_left;
            let (x, down, escape) = ui.input(|i| {
                (
                    i.pointer.latest_pos().map(|pos| f64::from(pos.x - lane_left)),
                    i.pointer.primary_down(),
                    i.key_pressed(egui::Key::Escape),
                )
            });
            if let Some(edit) = follow_pointer(&mut self.timeline, x, down, escape) {
                if let Some(on_edit) = on_edit.as_mut() {
                    on_edit(edit);
                }
            }
            ui.ctx().request_repaint();
        }

        output
    }

    /// Wheel events are taken out of the frame's input when the timeline
    /// handles them, so the row list does not scroll as well.
    fn route_wheel(&mut self, ui: &mut Ui, area: Rect, header_height: f32) {
        let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !area.contains(pos) {
            return;
        }
        let scroll = ui.input(|i| i.smooth_scroll_delta);
        if scroll == Vec2::ZERO {
            return;
        }
        let region = if pos.y < area.top() + header_height {
            WheelRegion::Header
        } else {
            WheelRegion::Body
        };
        // egui reports content movement; wheel deltas point the other way.
        let delta = WheelDelta::new(-f64::from(scroll.x), -f64::from(scroll.y));
        let action = self.timeline.handle_wheel(delta, region);
        if action.consumes_event() {
            ui.input_mut(|i| i.smooth_scroll_delta = Vec2::ZERO);
        }
    }

    fn press_background(&mut self, ui: &Ui) {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            self.timeline
                .press_background(f64::from(origin.x - self.lane_left));
        }
    }

    /// Draw one row and wire its interactions. Returns `true` when the
    /// row name was clicked.
    fn show_row(&mut self, ui: &mut Ui, idx: usize, row: &Row, editable: bool, grid: &FrameGrid) -> bool {
        let config = self.timeline.config();
        let name_w = config.name_column_width;
        let min_bar_w = config.min_bar_width_px;
        let (row_rect, _) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), config.row_height),
            Sense::hover(),
        );
        let name_rect = Rect::from_min_size(row_rect.min, Vec2::new(name_w, row_rect.height()));
        let lane_rect = Rect::from_min_max(Pos2::new(row_rect.left() + name_w, row_rect.top()), row_rect.max);

        let painter = ui.painter_at(row_rect);
        let bg = if idx % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
        painter.rect_filled(row_rect, 0.0, bg);
        painter.line_segment(
            [row_rect.left_bottom(), row_rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
        painter.line_segment(
            [name_rect.right_top(), name_rect.right_bottom()],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );

        let name_resp = ui
            .interact(name_rect, self.id.with(("row-name", idx, &row.id)), Sense::click())
            .on_hover_text(&row.name);
        let name_painter = ui.painter_at(name_rect.shrink(6.0));
        name_painter.text(
            Pos2::new(name_rect.left() + 8.0, name_rect.center().y),
            Align2::LEFT_CENTER,
            &row.name,
            theme::font_row_name(),
            if name_resp.hovered() { theme::TEXT_PRIMARY } else { theme::TEXT_SECONDARY },
        );

        // Background lane first so bars registered after it win the pointer.
        let lane = ui.interact(lane_rect, self.id.with(("lane", idx, &row.id)), Sense::drag());
        if lane.drag_started() {
            self.press_background(ui);
        }

        let transform = grid.transform;
        let lane_painter = ui.painter_at(lane_rect);
        for &(tick, x) in &grid.ticks {
            let x = lane_rect.left() + x as f32;
            let stroke = if tick % 60 == 0 { 0.8 } else { 0.4 };
            lane_painter.line_segment(
                [Pos2::new(x, lane_rect.top()), Pos2::new(x, lane_rect.bottom())],
                Stroke::new(stroke, theme::GRID_LINE),
            );
        }

        for (bar_idx, bar) in row.bars.iter().enumerate() {
            let target = BarTarget::new(row.id.clone(), bar_idx);
            let shown = self.timeline.displayed_interval(&target, bar.interval);
            let Some(span) = layout::bar_span(&transform, shown, min_bar_w) else {
                continue;
            };
            let bar_rect = Rect::from_min_size(
                Pos2::new(lane_rect.left() + span.left as f32, lane_rect.top() + theme::BAR_INSET),
                Vec2::new(span.width as f32, lane_rect.height() - theme::BAR_INSET * 2.0),
            );
            let dragging = self.timeline.drag_offset(&target).is_some();
            draw_bar(&lane_painter, bar_rect, bar, dragging);

            let sense = if editable { Sense::click_and_drag() } else { Sense::hover() };
            let resp = ui.interact(
                bar_rect.intersect(lane_rect),
                self.id.with(("bar", idx, &row.id, bar_idx)),
                sense,
            );
            if editable && resp.hovered() && self.timeline.is_idle() {
                ui.ctx().set_cursor_icon(CursorIcon::Grab);
            }
            if resp.drag_started() {
                if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                    let x = f64::from(origin.x - self.lane_left);
                    self.timeline.press_bar(target, bar.interval, x, editable);
                }
            }
            if self.timeline.is_idle() {
                resp.on_hover_ui_at_pointer(|ui| {
                    ui.strong(&bar.label);
                    ui.label(format!(
                        "{} → {}",
                        ticks::format_tick_label(bar.interval.start.max(0.0) as u32),
                        ticks::format_tick_label(bar.interval.end.max(0.0) as u32),
                    ));
                    if bar.late {
                        ui.colored_label(theme::LATE_RING, "Late arrival");
                    }
                });
            }
        }

        name_resp.clicked()
    }

    fn draw_header(&self, ui: &Ui, header_rect: Rect, ruler_rect: Rect, title: &str, grid: &FrameGrid) {
        let painter = ui.painter_at(header_rect);
        painter.rect_filled(header_rect, 0.0, theme::BG_HEADER);
        painter.line_segment(
            [header_rect.left_bottom(), header_rect.right_bottom()],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        painter.line_segment(
            [
                Pos2::new(ruler_rect.left(), header_rect.top()),
                Pos2::new(ruler_rect.left(), header_rect.bottom()),
            ],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        painter.text(
            Pos2::new(header_rect.left() + 8.0, header_rect.center().y),
            Align2::LEFT_CENTER,
            title,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );

        let ruler = ui.painter_at(ruler_rect);
        for &(tick, x) in &grid.ticks {
            let x = ruler_rect.left() + x as f32;
            ruler.line_segment(
                [Pos2::new(x, ruler_rect.bottom() - 6.0), Pos2::new(x, ruler_rect.bottom())],
                Stroke::new(1.0, theme::TEXT_DIM),
            );
            if !ticks::is_labelled(tick, grid.interval, grid.label_stride) {
                continue;
            }
            ruler.text(
                Pos2::new(x + 3.0, ruler_rect.center().y - 2.0),
                Align2::LEFT_CENTER,
                ticks::format_tick_label(tick),
                theme::font_tick(),
                theme::TEXT_SECONDARY,
            );
        }
    }

    fn draw_footer(&mut self, ui: &mut Ui, legend: &str) {
        ui.horizontal(|ui| {
            ui.set_height(theme::FOOTER_HEIGHT);
            let vp = *self.timeline.viewport();
            if ui
                .add_enabled(vp.duration() < vp.horizon(), egui::Button::new(egui_phosphor::regular::MAGNIFYING_GLASS_MINUS))
                .on_hover_text("Zoom out")
                .clicked()
            {
                self.timeline.zoom_out();
            }
            if ui
                .add_enabled(vp.duration() > vp.min_duration(), egui::Button::new(egui_phosphor::regular::MAGNIFYING_GLASS_PLUS))
                .on_hover_text("Zoom in")
                .clicked()
            {
                self.timeline.zoom_in();
            }
            if ui
                .add_enabled(!vp.is_fully_zoomed_out(), egui::Button::new(egui_phosphor::regular::ARROWS_OUT_LINE_HORIZONTAL))
                .on_hover_text("Show the whole day")
                .clicked()
            {
                self.timeline.reset_zoom();
            }
            ui.label(
                egui::RichText::new(legend)
                    .font(theme::font_status())
                    .color(theme::TEXT_DIM),
            );
        });
    }
}

fn draw_bar(painter: &egui::Painter, rect: Rect, bar: &Bar, dragging: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    if dragging {
        painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(60));
    }
    painter.rect_filled(rect, rounding, bar.color);
    if bar.late {
        painter.rect_stroke(rect.expand(1.0), rounding, Stroke::new(2.0, theme::LATE_RING));
    }
    if dragging {
        painter.rect_stroke(rect.expand(1.5), rounding, Stroke::new(2.0, theme::BORDER_ACCENT));
    }

    if rect.width() > 24.0 {
        let galley = painter.layout_no_wrap(bar.label.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
        let text_y = rect.center().y - galley.size().y / 2.0;
        clipped.galley(Pos2::new(rect.left() + 4.0, text_y), galley, Color32::TRANSPARENT);
    }
}

/// Advance an active gesture from this frame's global pointer state.
///
/// `x` is the pointer's lane-relative position, `None` once it has left the
/// window. A release there still ends the gesture at the last seen position.
fn follow_pointer(timeline: &mut Timeline, x: Option<f64>, down: bool, escape: bool) -> Option<BarEdit> {
    if escape {
        timeline.cancel();
        return None;
    }
    match (x, down) {
        (Some(x), true) => {
            timeline.pointer_move(x);
            None
        }
        (Some(x), false) => timeline.release(x),
        (None, true) => None,
        (None, false) => timeline.release_in_place(),
    }
}
