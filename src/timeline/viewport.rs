/// Smallest visible window, in minutes.
pub const MIN_VIEW_DURATION: f64 = 60.0;

/// The visible time window over `[0, horizon]`.
///
/// All values are minutes from the shared origin. Every mutation goes
/// through [`Viewport::commit`], so `0 <= start`, `start + duration <= horizon`
/// and `min_duration <= duration <= horizon` hold after any call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    start: f64,
    duration: f64,
    horizon: f64,
    min_duration: f64,
}

impl Viewport {
    /// Fully zoomed out over `horizon`.
    pub fn new(horizon: f64, min_duration: f64) -> Self {
        let min_duration = if min_duration.is_finite() && min_duration > 0.0 {
            min_duration
        } else {
            MIN_VIEW_DURATION
        };
        let horizon = sanitize_horizon(horizon, min_duration);
        Self {
            start: 0.0,
            duration: horizon,
            horizon,
            min_duration,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }

    /// Largest admissible `start` for the current duration.
    pub fn max_start(&self) -> f64 {
        (self.horizon - self.duration).max(0.0)
    }

    /// How far in we are relative to the fully zoomed-out view (1.0 = whole horizon).
    pub fn zoom_ratio(&self) -> f64 {
        self.horizon / self.duration
    }

    pub fn is_fully_zoomed_out(&self) -> bool {
        self.duration >= self.horizon && self.start <= 0.0
    }

    /// Apply a new horizon after the source data changed, reclamping the window.
    pub fn set_horizon(&mut self, horizon: f64) {
        let horizon = sanitize_horizon(horizon, self.min_duration);
        if horizon == self.horizon {
            return;
        }
        self.horizon = horizon;
        self.commit(self.start, self.duration);
    }

    /// Multiply the visible duration by `factor`, keeping `start` where it is
    /// unless the new window would overflow the horizon.
    pub fn zoom(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.commit(self.start, self.duration * factor);
    }

    pub fn pan_to(&mut self, start: f64) {
        self.commit(start, self.duration);
    }

    pub fn pan_by(&mut self, minutes: f64) {
        self.commit(self.start + minutes, self.duration);
    }

    /// Back to the fully zoomed-out view.
    pub fn reset(&mut self) {
        self.commit(0.0, self.horizon);
    }

    /// Screen mapping for a lane `width` pixels wide.
    pub fn transform(&self, width: f64) -> Transform {
        Transform {
            width,
            view_start: self.start,
            px_per_min: width / self.duration,
        }
    }

    fn commit(&mut self, start: f64, duration: f64) {
        let duration = if duration.is_finite() {
            duration.clamp(self.min_duration, self.horizon)
        } else {
            self.horizon
        };
        let max_start = (self.horizon - duration).max(0.0);
        let start = if start.is_finite() {
            start.clamp(0.0, max_start)
        } else {
            0.0
        };
        self.start = start;
        self.duration = duration;
    }
}

fn sanitize_horizon(horizon: f64, min_duration: f64) -> f64 {
    if horizon.is_finite() {
        horizon.max(min_duration)
    } else {
        min_duration
    }
}

/// Minutes ⇄ pixels for one frame. Pixel x is relative to the lane's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    width: f64,
    view_start: f64,
    px_per_min: f64,
}

impl Transform {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn px_per_min(&self) -> f64 {
        self.px_per_min
    }

    pub fn minutes_to_pixels(&self, minutes: f64) -> f64 {
        minutes * self.px_per_min
    }

    pub fn pixels_to_minutes(&self, px: f64) -> f64 {
        if self.px_per_min > 0.0 {
            px / self.px_per_min
        } else {
            0.0
        }
    }

    /// Lane x of an absolute time.
    pub fn time_to_x(&self, minutes: f64) -> f64 {
        self.minutes_to_pixels(minutes - self.view_start)
    }

    /// Absolute time under a lane x.
    pub fn x_to_time(&self, x: f64) -> f64 {
        self.view_start + self.pixels_to_minutes(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_fully_zoomed_out() {
        let vp = Viewport::new(720.0, MIN_VIEW_DURATION);
        assert_eq!(vp.start(), 0.0);
        assert_eq!(vp.duration(), 720.0);
        assert!(vp.is_fully_zoomed_out());
    }

    #[test]
    fn zoom_clamps_to_minimum_duration() {
        let mut vp = Viewport::new(720.0, MIN_VIEW_DURATION);
        for _ in 0..50 {
            vp.zoom(0.5);
        }
        assert_eq!(vp.duration(), MIN_VIEW_DURATION);
    }

    #[test]
    fn zoom_out_pulls_start_back_inside_horizon() {
        let mut vp = Viewport::new(720.0, MIN_VIEW_DURATION);
        vp.zoom(0.25);
        vp.pan_to(540.0);
        assert_eq!(vp.start(), 540.0);
        vp.zoom(2.0);
        assert_eq!(vp.duration(), 360.0);
        assert_eq!(vp.start(), 360.0);
    }

    #[test]
    fn invalid_zoom_factor_is_ignored() {
        let mut vp = Viewport::new(720.0, MIN_VIEW_DURATION);
        vp.zoom(0.5);
        let before = vp;
        vp.zoom(f64::NAN);
        vp.zoom(0.0);
        vp.zoom(-3.0);
        assert_eq!(vp, before);
    }

    #[test]
    fn horizon_shrink_reclamps_start() {
        let mut vp = Viewport::new(1200.0, MIN_VIEW_DURATION);
        vp.zoom(200.0 / 1200.0);
        vp.pan_to(500.0);
        assert_abs_diff_eq!(vp.duration(), 200.0, epsilon = 1e-9);
        vp.set_horizon(600.0);
        assert!(vp.start() <= 400.0);
        assert!(vp.end() <= 600.0 + 1e-9);
    }

    #[test]
    fn horizon_below_minimum_duration_is_raised() {
        let vp = Viewport::new(10.0, MIN_VIEW_DURATION);
        assert_eq!(vp.horizon(), MIN_VIEW_DURATION);
        assert_eq!(vp.duration(), MIN_VIEW_DURATION);
    }

    #[test]
    fn transform_maps_both_ways() {
        let mut vp = Viewport::new(720.0, MIN_VIEW_DURATION);
        vp.zoom(0.5);
        vp.pan_to(100.0);
        let t = vp.transform(720.0);
        assert_abs_diff_eq!(t.px_per_min(), 2.0);
        assert_abs_diff_eq!(t.time_to_x(130.0), 60.0);
        assert_abs_diff_eq!(t.x_to_time(60.0), 130.0);
        assert_abs_diff_eq!(t.pixels_to_minutes(t.minutes_to_pixels(37.5)), 37.5);
    }
}
