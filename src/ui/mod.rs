pub mod dialogs;
pub mod gantt;
pub mod row_panel;
pub mod theme;
pub mod toolbar;

pub use gantt::{ScheduleTimeline, TimelineOutput};
