pub mod rows;
pub mod schedule;

pub use rows::{build_rows, Bar, Row, RowSource, ScheduleRows, TimeInterval};
pub use schedule::{OptimizeResult, Scenario, ScenarioError, Shipment, Site, TimeWindow};
