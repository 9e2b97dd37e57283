use super::viewport::Transform;
use crate::model::TimeInterval;

/// Horizontal placement of a bar inside its lane, in lane pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpan {
    pub left: f64,
    pub width: f64,
}

impl BarSpan {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Place `interval` in the lane, or `None` when it lies entirely outside
/// `[0, width]`. Very short bars are widened to `min_width` so they stay
/// grabbable.
pub fn bar_span(transform: &Transform, interval: TimeInterval, min_width: f64) -> Option<BarSpan> {
    let left = transform.time_to_x(interval.start);
    let right = transform.time_to_x(interval.end);
    if right < 0.0 || left > transform.width() {
        return None;
    }
    Some(BarSpan {
        left,
        width: (right - left).max(min_width),
    })
}

/// Lane x positions of the given tick times.
pub fn tick_positions(transform: &Transform, ticks: &[u32]) -> Vec<(u32, f64)> {
    ticks
        .iter()
        .map(|&t| (t, transform.time_to_x(f64::from(t))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::viewport::{Viewport, MIN_VIEW_DURATION};

    fn zoomed() -> Transform {
        // window [100, 280] over 360 px: 2 px/min
        let mut vp = Viewport::new(720.0, MIN_VIEW_DURATION);
        vp.zoom(0.25);
        vp.pan_to(100.0);
        vp.transform(360.0)
    }

    #[test]
    fn visible_bar_is_placed_relative_to_view_start() {
        let span = bar_span(&zoomed(), TimeInterval::new(130.0, 160.0), 4.0).unwrap();
        assert_eq!(span.left, 60.0);
        assert_eq!(span.width, 60.0);
        assert_eq!(span.right(), 120.0);
    }

    #[test]
    fn bars_outside_lane_are_culled() {
        let t = zoomed();
        assert!(bar_span(&t, TimeInterval::new(0.0, 90.0), 4.0).is_none());
        assert!(bar_span(&t, TimeInterval::new(300.0, 400.0), 4.0).is_none());
    }

    #[test]
    fn partially_visible_bar_is_kept() {
        let span = bar_span(&zoomed(), TimeInterval::new(50.0, 120.0), 4.0).unwrap();
        assert_eq!(span.left, -100.0);
        assert_eq!(span.right(), 40.0);
    }

    #[test]
    fn zero_length_bar_gets_minimum_width() {
        let span = bar_span(&zoomed(), TimeInterval::new(150.0, 150.0), 4.0).unwrap();
        assert_eq!(span.width, 4.0);
    }

    #[test]
    fn tick_positions_follow_transform() {
        let positions = tick_positions(&zoomed(), &[120, 150]);
        assert_eq!(positions, vec![(120, 40.0), (150, 100.0)]);
    }
}
