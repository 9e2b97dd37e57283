use egui::Color32;

use super::schedule::{OptimizeResult, Scenario};
use crate::config::TimelineConfig;

/// Horizon shown when the data ends earlier: a 12 hour day.
pub const DEFAULT_HORIZON: u32 = 720;

/// Service time assumed for a stop whose site is unknown.
const FALLBACK_SERVICE_MINUTES: u32 = 10;

/// Half-open span of minutes from the shared origin.
///
/// Callers guarantee `start <= end`; the timeline does not validate it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInterval {
    pub start: f64,
    pub end: f64,
}

impl TimeInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn shifted(&self, minutes: f64) -> Self {
        Self::new(self.start + minutes, self.end + minutes)
    }
}

/// One rendered time span inside a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub interval: TimeInterval,
    pub label: String,
    pub color: Color32,
    pub late: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub name: String,
    pub bars: Vec<Bar>,
}

/// Which part of the scenario the rows were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    /// Pickup and delivery windows per shipment (editable).
    ShipmentWindows,
    /// Stops per vehicle from the solver result (read-only).
    VehicleRoutes,
}

/// Rows plus the horizon they need.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRows {
    pub source: RowSource,
    pub rows: Vec<Row>,
    pub horizon: u32,
}

impl ScheduleRows {
    pub fn is_editable(&self) -> bool {
        self.source == RowSource::ShipmentWindows
    }

    pub fn bar_count(&self) -> usize {
        self.rows.iter().map(|r| r.bars.len()).sum()
    }
}

/// Derive the timeline rows from the current scenario.
pub fn build_rows(scenario: &Scenario, config: &TimelineConfig) -> ScheduleRows {
    let (source, rows) = match &scenario.result {
        None => (RowSource::ShipmentWindows, shipment_rows(scenario, config)),
        Some(result) => (RowSource::VehicleRoutes, route_rows(scenario, result, config)),
    };
    let horizon = horizon(&rows);
    ScheduleRows {
        source,
        rows,
        horizon,
    }
}

/// Latest bar end (at least [`DEFAULT_HORIZON`]), rounded up to a whole hour.
pub fn horizon(rows: &[Row]) -> u32 {
    let latest = rows
        .iter()
        .flat_map(|r| r.bars.iter())
        .map(|b| b.interval.end)
        .fold(f64::from(DEFAULT_HORIZON), f64::max);
    let hours = (latest / 60.0).ceil();
    (hours * 60.0) as u32
}

fn shipment_rows(scenario: &Scenario, config: &TimelineConfig) -> Vec<Row> {
    scenario
        .shipments
        .iter()
        .enumerate()
        .map(|(idx, ship)| {
            let color = config.row_color(idx);
            let pickup = Bar {
                interval: TimeInterval::new(
                    f64::from(ship.pickup_window.start),
                    f64::from(ship.pickup_window.end),
                ),
                label: format!(
                    "↑ {}",
                    site_label(scenario, &ship.pickup_site_id).unwrap_or_else(|| "Pickup".into())
                ),
                color,
                late: false,
            };
            let delivery = Bar {
                interval: TimeInterval::new(
                    f64::from(ship.delivery_window.start),
                    f64::from(ship.delivery_window.end),
                ),
                label: format!(
                    "↓ {}",
                    site_label(scenario, &ship.delivery_site_id)
                        .unwrap_or_else(|| "Delivery".into())
                ),
                color: translucent(color),
                late: false,
            };
            Row {
                id: ship.id.clone(),
                name: non_empty_or(&ship.name, || format!("Order {}", idx + 1)),
                bars: vec![pickup, delivery],
            }
        })
        .collect()
}

fn route_rows(scenario: &Scenario, result: &OptimizeResult, config: &TimelineConfig) -> Vec<Row> {
    result
        .routes
        .iter()
        .enumerate()
        .map(|(v_idx, route)| {
            let color = config.row_color(v_idx);
            let bars = route
                .stops
                .iter()
                .enumerate()
                .map(|(s_idx, stop)| {
                    let service = scenario
                        .site(&stop.site_id)
                        .map(|s| s.service_duration)
                        .unwrap_or(FALLBACK_SERVICE_MINUTES);
                    let start = f64::from(stop.arrival_time);
                    Bar {
                        interval: TimeInterval::new(start, start + f64::from(service)),
                        label: site_label(scenario, &stop.site_id)
                            .unwrap_or_else(|| format!("Stop {}", s_idx + 1)),
                        color: if stop.is_late { config.late_color } else { color },
                        late: stop.is_late,
                    }
                })
                .collect();
            let name = scenario
                .vehicle(&route.vehicle_id)
                .map(|v| v.name.as_str())
                .unwrap_or("");
            Row {
                id: route.vehicle_id.clone(),
                name: non_empty_or(name, || format!("Vehicle {}", v_idx + 1)),
                bars,
            }
        })
        .collect()
}

/// Short bar caption: the first six characters of the site name.
fn site_label(scenario: &Scenario, site_id: &str) -> Option<String> {
    scenario
        .site(site_id)
        .filter(|s| !s.name.is_empty())
        .map(|s| s.name.chars().take(6).collect())
}

fn non_empty_or(name: &str, fallback: impl FnOnce() -> String) -> String {
    if name.is_empty() {
        fallback()
    } else {
        name.to_string()
    }
}

fn translucent(color: Color32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, 0x80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schedule::{RouteStop, SolveStatus, StopType, VehicleRoute};

    fn stop(site: &str, arrival: u32, late: bool) -> RouteStop {
        RouteStop {
            site_id: site.into(),
            arrival_time: arrival,
            is_late: late,
            stop_type: StopType::Delivery,
            shipment_id: None,
        }
    }

    #[test]
    fn shipment_rows_have_pickup_and_delivery_bars() {
        let scenario = Scenario::sample();
        let rows = build_rows(&scenario, &TimelineConfig::default());
        assert_eq!(rows.source, RowSource::ShipmentWindows);
        assert!(rows.is_editable());
        assert_eq!(rows.rows.len(), scenario.shipments.len());
        let first = &rows.rows[0];
        assert_eq!(first.id, "ship_1");
        assert_eq!(first.bars[0].interval, TimeInterval::new(60.0, 180.0));
        assert_eq!(first.bars[1].interval, TimeInterval::new(120.0, 300.0));
        assert_eq!(first.bars[0].label, "↑ North ");
        assert_eq!(first.bars[1].label, "↓ Centra");
    }

    #[test]
    fn horizon_defaults_to_twelve_hours() {
        assert_eq!(horizon(&[]), DEFAULT_HORIZON);
    }

    #[test]
    fn horizon_rounds_up_to_the_hour() {
        let mut scenario = Scenario::sample();
        scenario.update_shipment_window("ship_1", 1, 700, 781).unwrap();
        let rows = build_rows(&scenario, &TimelineConfig::default());
        assert_eq!(rows.horizon, 840);
    }

    #[test]
    fn route_rows_use_service_duration_and_late_color() {
        let mut scenario = Scenario::sample();
        scenario.set_result(Some(OptimizeResult {
            status: SolveStatus::Optimal,
            routes: vec![VehicleRoute {
                vehicle_id: "truck_1".into(),
                stops: vec![stop("site_market", 100, false), stop("unknown", 200, true)],
                total_distance: 0.0,
                total_time: 0.0,
            }],
            unserved_shipments: vec![],
            total_cost: 0.0,
        }));
        let config = TimelineConfig::default();
        let rows = build_rows(&scenario, &config);
        assert_eq!(rows.source, RowSource::VehicleRoutes);
        assert!(!rows.is_editable());
        let row = &rows.rows[0];
        assert_eq!(row.name, "Truck 1 (small)");
        assert_eq!(row.bars[0].interval, TimeInterval::new(100.0, 120.0));
        assert_eq!(row.bars[1].interval, TimeInterval::new(200.0, 210.0));
        assert_eq!(row.bars[1].label, "Stop 2");
        assert!(row.bars[1].late);
        assert_eq!(row.bars[1].color, config.late_color);
    }

    #[test]
    fn unnamed_shipment_gets_ordinal_name() {
        let mut scenario = Scenario::sample();
        scenario.shipments[2].name.clear();
        let rows = build_rows(&scenario, &TimelineConfig::default());
        assert_eq!(rows.rows[2].name, "Order 3");
    }
}
