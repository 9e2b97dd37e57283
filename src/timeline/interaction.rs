use tracing::debug;

use super::gesture::{classify_wheel, WheelAction, WheelDelta, WheelRegion};
use super::ticks;
use super::viewport::{Transform, Viewport};
use crate::config::{EditBounds, TimelineConfig};
use crate::model::TimeInterval;

/// Identifies one bar by its row and position in that row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarTarget {
    pub row_id: String,
    pub bar_index: usize,
}

impl BarTarget {
    pub fn new(row_id: impl Into<String>, bar_index: usize) -> Self {
        Self {
            row_id: row_id.into(),
            bar_index,
        }
    }
}

/// A reschedule produced by releasing a dragged bar, in whole minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarEdit {
    pub row_id: String,
    pub bar_index: usize,
    pub start: u32,
    pub end: u32,
}

/// The single pointer gesture in progress, if any.
///
/// Pan and drag are variants of one value, so both can never be active
/// at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    /// Background or ruler grabbed; the view follows the pointer.
    Panning { origin_x: f64, origin_start: f64 },
    /// A bar grabbed; it is drawn shifted by the pointer offset until release.
    Dragging {
        target: BarTarget,
        original: TimeInterval,
        origin_x: f64,
        current_x: f64,
    },
}

/// Viewport, lane width and gesture state of one mounted timeline.
///
/// Rows never live here: callers pass them in on every frame and receive
/// edits back, so the data has exactly one owner.
#[derive(Debug, Clone)]
pub struct Timeline {
    viewport: Viewport,
    gesture: Gesture,
    width: f64,
    config: TimelineConfig,
}

impl Timeline {
    /// Mount over `horizon` minutes, fully zoomed out.
    pub fn new(horizon: u32, config: &TimelineConfig) -> Self {
        Self {
            viewport: Viewport::new(f64::from(horizon), config.min_view_duration),
            gesture: Gesture::Idle,
            width: config.default_width_px,
            config: config.clone(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn transform(&self) -> Transform {
        self.viewport.transform(self.width)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Swap in new settings. The viewport keeps its window, reclamped.
    pub fn set_config(&mut self, config: &TimelineConfig) {
        if self.config.min_view_duration != config.min_view_duration {
            let horizon = self.viewport.horizon();
            let (start, duration) = (self.viewport.start(), self.viewport.duration());
            self.viewport = Viewport::new(horizon, config.min_view_duration);
            self.viewport.zoom(duration / self.viewport.duration());
            self.viewport.pan_to(start);
        }
        self.config = config.clone();
    }

    /// Reclamp after the source data produced a new horizon.
    pub fn sync_horizon(&mut self, horizon: u32) {
        let horizon = f64::from(horizon);
        if horizon != self.viewport.horizon() {
            debug!(horizon, "timeline horizon changed");
            self.viewport.set_horizon(horizon);
        }
    }

    /// Record the latest measured lane width. Unusable measurements fall
    /// back to the configured default.
    pub fn set_width(&mut self, measured: f64) {
        self.width = if measured.is_finite() && measured > 0.0 {
            measured
        } else {
            self.config.default_width_px
        };
    }

    // ── Zoom ────────────────────────────────────────────────────

    pub fn zoom(&mut self, factor: f64) {
        self.viewport.zoom(factor);
    }

    pub fn zoom_in(&mut self) {
        self.zoom(self.config.button_zoom_in);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(self.config.button_zoom_out);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    /// Ruler granularity for the current zoom and width.
    pub fn tick_interval(&self) -> u32 {
        ticks::tick_interval(self.transform().px_per_min(), self.config.min_tick_spacing_px)
    }

    pub fn tick_times(&self) -> Vec<u32> {
        ticks::tick_times(&self.viewport, self.tick_interval())
    }

    // ── Wheel ───────────────────────────────────────────────────

    /// Classify and apply a wheel event. The returned action tells the
    /// caller whether the event was consumed.
    pub fn handle_wheel(&mut self, delta: WheelDelta, region: WheelRegion) -> WheelAction {
        let action = classify_wheel(delta, region, &self.transform(), self.config.wheel_zoom());
        match action {
            WheelAction::Pan { minutes } => self.viewport.pan_by(minutes),
            WheelAction::Zoom { factor } => self.viewport.zoom(factor),
            WheelAction::Passthrough => {}
        }
        action
    }

    // ── Pointer ─────────────────────────────────────────────────

    /// Pointer pressed on the row background or the ruler.
    pub fn press_background(&mut self, x: f64) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.gesture = Gesture::Panning {
            origin_x: x,
            origin_start: self.viewport.start(),
        };
        debug!(x, start = self.viewport.start(), "pan started");
        true
    }

    /// Pointer pressed on a bar. Read-only timelines pass
    /// `editable = false` and never leave `Idle`.
    pub fn press_bar(&mut self, target: BarTarget, interval: TimeInterval, x: f64, editable: bool) -> bool {
        if !editable || !self.is_idle() {
            return false;
        }
        debug!(row = %target.row_id, bar = target.bar_index, "bar drag started");
        self.gesture = Gesture::Dragging {
            target,
            original: interval,
            origin_x: x,
            current_x: x,
        };
        true
    }

    pub fn pointer_move(&mut self, x: f64) {
        let transform = self.transform();
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning {
                origin_x,
                origin_start,
            } => {
                let start = *origin_start - transform.pixels_to_minutes(x - *origin_x);
                self.viewport.pan_to(start);
            }
            Gesture::Dragging { current_x, .. } => *current_x = x,
        }
    }

    /// Pointer released anywhere. Ends the gesture and returns the edit a
    /// bar drag produced, if it moved by at least one whole minute.
    pub fn release(&mut self, x: f64) -> Option<BarEdit> {
        self.pointer_move(x);
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => None,
            Gesture::Panning { .. } => {
                debug!(start = self.viewport.start(), "pan finished");
                None
            }
            Gesture::Dragging {
                target,
                original,
                origin_x,
                current_x,
            } => {
                let delta = self
                    .transform()
                    .pixels_to_minutes(current_x - origin_x)
                    .round();
                let edit = self.reschedule(target, original, delta);
                debug!(?edit, delta, "bar drag finished");
                edit
            }
        }
    }

    /// Pointer released while its position is unknown (it left the window).
    /// A drag commits at the last position it saw; a pan stays where it is.
    pub fn release_in_place(&mut self) -> Option<BarEdit> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Panning { .. } => {
                self.gesture = Gesture::Idle;
                debug!(start = self.viewport.start(), "pan finished off-screen");
                None
            }
            Gesture::Dragging { current_x, .. } => self.release(current_x),
        }
    }

    /// Abandon the current gesture without emitting an edit. A pan returns
    /// the view to where it started.
    pub fn cancel(&mut self) {
        if let Gesture::Panning { origin_start, .. } = self.gesture {
            self.viewport.pan_to(origin_start);
        }
        if !self.is_idle() {
            debug!("gesture cancelled");
        }
        self.gesture = Gesture::Idle;
    }

    /// Minutes the given bar is currently displaced by an active drag.
    pub fn drag_offset(&self, target: &BarTarget) -> Option<f64> {
        match &self.gesture {
            Gesture::Dragging {
                target: dragged,
                origin_x,
                current_x,
                ..
            } if dragged == target => {
                Some(self.transform().pixels_to_minutes(current_x - origin_x))
            }
            _ => None,
        }
    }

    /// Where a bar should be drawn this frame.
    pub fn displayed_interval(&self, target: &BarTarget, interval: TimeInterval) -> TimeInterval {
        match self.drag_offset(target) {
            Some(offset) => interval.shifted(offset),
            None => interval,
        }
    }

    fn reschedule(&self, target: BarTarget, original: TimeInterval, delta: f64) -> Option<BarEdit> {
        if delta == 0.0 {
            return None;
        }
        let (start, end) = match self.config.edit_bounds {
            EditBounds::ExtendHorizon => (
                (original.start + delta).max(0.0),
                (original.end + delta).max(0.0),
            ),
            EditBounds::ClampToHorizon => {
                let len = original.duration().max(0.0);
                let latest = (self.viewport.horizon() - len).max(0.0);
                let start = (original.start + delta).clamp(0.0, latest);
                (start, start + len)
            }
        };
        let (start, end) = (start.round() as u32, end.round() as u32);
        if f64::from(start) == original.start.round() && f64::from(end) == original.end.round() {
            return None;
        }
        Some(BarEdit {
            row_id: target.row_id,
            bar_index: target.bar_index,
            start,
            end,
        })
    }
}
