//! Schedule viewer for vehicle routing scenarios.
//!
//! [`model`] holds the scenario and derives timeline rows from it,
//! [`timeline`] is the toolkit-independent pan/zoom/drag core and [`ui`]
//! renders it with egui.

pub mod app;
pub mod config;
pub mod io;
pub mod model;
pub mod telemetry;
pub mod timeline;
pub mod ui;
