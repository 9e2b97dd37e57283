//! Headless core of the schedule timeline.
//!
//! Everything here works in plain minutes and lane pixels so it can be
//! driven from egui or from tests alike:
//!
//! - [`viewport`]: the visible window and the minute/pixel transform
//! - [`ticks`]: ruler granularity and tick times
//! - [`gesture`]: wheel classification
//! - [`interaction`]: pan and bar-drag state machine
//! - [`layout`]: bar placement and culling

pub mod gesture;
pub mod interaction;
pub mod layout;
pub mod ticks;
pub mod viewport;

pub use gesture::{WheelAction, WheelDelta, WheelRegion};
pub use interaction::{BarEdit, BarTarget, Gesture, Timeline};
pub use viewport::{Transform, Viewport};
