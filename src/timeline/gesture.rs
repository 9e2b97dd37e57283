use super::viewport::Transform;

/// Where a wheel event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelRegion {
    /// The time ruler row.
    Header,
    /// The scrollable list of rows.
    Body,
}

/// Wheel deltas in pixels. Positive `dx` scrolls towards later times,
/// positive `dy` is a wheel turned towards the user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

impl WheelDelta {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// What the timeline does with one wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    /// Shift the window by this many minutes.
    Pan { minutes: f64 },
    /// Multiply the visible duration.
    Zoom { factor: f64 },
    /// Leave the event to the row list's own scrolling.
    Passthrough,
}

impl WheelAction {
    /// Whether the event must be withheld from enclosing scroll handling.
    pub fn consumes_event(&self) -> bool {
        !matches!(self, WheelAction::Passthrough)
    }
}

/// Zoom factors applied per wheel notch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelZoom {
    pub zoom_in: f64,
    pub zoom_out: f64,
}

/// Resolve a wheel event into exactly one action.
///
/// Horizontal intent always pans. Vertical intent zooms only over the
/// ruler; over the body it is handed back to native scrolling.
pub fn classify_wheel(
    delta: WheelDelta,
    region: WheelRegion,
    transform: &Transform,
    zoom: WheelZoom,
) -> WheelAction {
    if delta.dx.abs() > delta.dy.abs() {
        return WheelAction::Pan {
            minutes: transform.pixels_to_minutes(delta.dx),
        };
    }
    if delta.dy != 0.0 && region == WheelRegion::Header {
        let factor = if delta.dy > 0.0 {
            zoom.zoom_out
        } else {
            zoom.zoom_in
        };
        return WheelAction::Zoom { factor };
    }
    WheelAction::Passthrough
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::viewport::{Viewport, MIN_VIEW_DURATION};

    const ZOOM: WheelZoom = WheelZoom {
        zoom_in: 0.9,
        zoom_out: 1.1,
    };

    fn transform() -> Transform {
        Viewport::new(600.0, MIN_VIEW_DURATION).transform(1200.0)
    }

    #[test]
    fn horizontal_dominant_pans_anywhere() {
        let t = transform();
        for region in [WheelRegion::Header, WheelRegion::Body] {
            let action = classify_wheel(WheelDelta::new(40.0, 10.0), region, &t, ZOOM);
            assert_eq!(action, WheelAction::Pan { minutes: 20.0 });
            assert!(action.consumes_event());
        }
    }

    #[test]
    fn vertical_over_header_zooms() {
        let t = transform();
        let out = classify_wheel(WheelDelta::new(0.0, 5.0), WheelRegion::Header, &t, ZOOM);
        assert_eq!(out, WheelAction::Zoom { factor: 1.1 });
        let zin = classify_wheel(WheelDelta::new(1.0, -5.0), WheelRegion::Header, &t, ZOOM);
        assert_eq!(zin, WheelAction::Zoom { factor: 0.9 });
    }

    #[test]
    fn vertical_over_body_passes_through() {
        let t = transform();
        let action = classify_wheel(WheelDelta::new(0.0, 30.0), WheelRegion::Body, &t, ZOOM);
        assert_eq!(action, WheelAction::Passthrough);
        assert!(!action.consumes_event());
    }

    #[test]
    fn equal_axes_are_vertical() {
        let t = transform();
        let action = classify_wheel(WheelDelta::new(8.0, 8.0), WheelRegion::Body, &t, ZOOM);
        assert_eq!(action, WheelAction::Passthrough);
    }

    #[test]
    fn empty_delta_does_nothing() {
        let t = transform();
        let action = classify_wheel(WheelDelta::default(), WheelRegion::Header, &t, ZOOM);
        assert_eq!(action, WheelAction::Passthrough);
    }
}
