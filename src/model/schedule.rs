use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A time window in minutes from the planning origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

impl TimeWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    Depot,
    Customer,
    Hub,
}

/// A location vehicles can visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub kind: SiteKind,
    pub lat: f64,
    pub lng: f64,
    /// Minutes spent on site per visit.
    pub service_duration: u32,
    pub zone_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub start_site_id: String,
    pub end_site_id: String,
    pub capacity_weight: f64,
    pub capacity_volume: f64,
    pub shift_start: u32,
    pub shift_max_duration: u32,
}

/// A pickup-and-delivery order with its own time windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    pub name: String,
    pub pickup_site_id: String,
    pub delivery_site_id: String,
    pub pickup_window: TimeWindow,
    pub delivery_window: TimeWindow,
    pub weight: f64,
    pub volume: f64,
    pub priority: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    DepotStart,
    Pickup,
    Delivery,
    DepotEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub site_id: String,
    pub arrival_time: u32,
    #[serde(default)]
    pub is_late: bool,
    pub stop_type: StopType,
    #[serde(default)]
    pub shipment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle_id: String,
    pub stops: Vec<RouteStop>,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub total_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
}

/// Solver output as returned by the optimization service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub status: SolveStatus,
    pub routes: Vec<VehicleRoute>,
    #[serde(default)]
    pub unserved_shipments: Vec<String>,
    #[serde(default)]
    pub total_cost: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("unknown shipment '{0}'")]
    UnknownShipment(String),
    #[error("shipment bar index {0} is out of range (0 = pickup, 1 = delivery)")]
    BarIndexOutOfRange(usize),
    #[error("shipment id '{0}' is used more than once")]
    DuplicateShipmentId(String),
}

/// The editable routing inputs plus the latest solver result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub sites: Vec<Site>,
    pub vehicles: Vec<Vehicle>,
    pub shipments: Vec<Shipment>,
    #[serde(default)]
    pub result: Option<OptimizeResult>,
    pub modified: DateTime<Utc>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "Untitled Scenario".to_string(),
            sites: Vec::new(),
            vehicles: Vec::new(),
            shipments: Vec::new(),
            result: None,
            modified: Utc::now(),
        }
    }
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn shipment(&self, id: &str) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.id == id)
    }

    /// Timeline rows and edits address shipments by id, so ids must be unique.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut seen = HashSet::new();
        for shipment in &self.shipments {
            if !seen.insert(shipment.id.as_str()) {
                return Err(ScenarioError::DuplicateShipmentId(shipment.id.clone()));
            }
        }
        Ok(())
    }

    /// Attach or clear the solver result. Any input edit invalidates it.
    pub fn set_result(&mut self, result: Option<OptimizeResult>) {
        self.result = result;
        self.touch();
    }

    /// Move one of a shipment's windows. Bar 0 is the pickup window,
    /// bar 1 the delivery window, matching the shipment timeline rows.
    pub fn update_shipment_window(
        &mut self,
        shipment_id: &str,
        bar_index: usize,
        start: u32,
        end: u32,
    ) -> Result<(), ScenarioError> {
        let shipment = self
            .shipments
            .iter_mut()
            .find(|s| s.id == shipment_id)
            .ok_or_else(|| ScenarioError::UnknownShipment(shipment_id.to_string()))?;
        let window = match bar_index {
            0 => &mut shipment.pickup_window,
            1 => &mut shipment.delivery_window,
            other => return Err(ScenarioError::BarIndexOutOfRange(other)),
        };
        *window = TimeWindow::new(start, end);
        self.touch();
        Ok(())
    }

    /// Demo scenario: two depots and a handful of city customers.
    pub fn sample() -> Self {
        let site = |id: &str, name: &str, kind, lat, lng, service, zone| Site {
            id: id.into(),
            name: name.into(),
            kind,
            lat,
            lng,
            service_duration: service,
            zone_id: zone,
        };
        let vehicle = |id: &str, name: &str, depot: &str, weight| Vehicle {
            id: id.into(),
            name: name.into(),
            start_site_id: depot.into(),
            end_site_id: depot.into(),
            capacity_weight: weight,
            capacity_volume: weight,
            shift_start: 0,
            shift_max_duration: 600,
        };
        let shipment = |id: &str, name: &str, from: &str, to: &str, pickup, delivery| Shipment {
            id: id.into(),
            name: name.into(),
            pickup_site_id: from.into(),
            delivery_site_id: to.into(),
            pickup_window: pickup,
            delivery_window: delivery,
            weight: 5.0,
            volume: 5.0,
            priority: 1,
        };

        let mut scenario = Scenario::new("Sample Scenario");
        scenario.sites = vec![
            site("depot_north", "North Depot", SiteKind::Depot, 37.3616, 126.9352, 0, 0),
            site("depot_east", "East Depot", SiteKind::Depot, 37.2720, 127.4350, 0, 0),
            site("site_station", "Central Station", SiteKind::Customer, 37.5547, 126.9707, 10, 4),
            site("site_market", "Market Hall", SiteKind::Customer, 37.4925, 127.1180, 20, 2),
            site("site_park", "Olympic Park", SiteKind::Customer, 37.5209, 127.1215, 10, 2),
            site("site_harbor", "Harbor Front", SiteKind::Customer, 37.5219, 126.9245, 10, 3),
            site("site_campus", "Campus Gate", SiteKind::Customer, 37.5563, 126.9237, 15, 3),
            site("site_hub", "Cross Dock", SiteKind::Hub, 37.4837, 127.0324, 15, 1),
        ];
        scenario.vehicles = vec![
            vehicle("truck_1", "Truck 1 (small)", "depot_north", 30.0),
            vehicle("truck_2", "Truck 2 (small)", "depot_north", 30.0),
            vehicle("truck_3", "Truck 3 (large)", "depot_east", 60.0),
        ];
        scenario.shipments = vec![
            shipment("ship_1", "Order 1", "depot_north", "site_station", TimeWindow::new(60, 180), TimeWindow::new(120, 300)),
            shipment("ship_2", "Order 2", "depot_north", "site_market", TimeWindow::new(30, 120), TimeWindow::new(180, 360)),
            shipment("ship_3", "Order 3", "site_hub", "site_park", TimeWindow::new(240, 330), TimeWindow::new(300, 480)),
            shipment("ship_4", "Order 4", "depot_east", "site_harbor", TimeWindow::new(90, 150), TimeWindow::new(360, 540)),
            shipment("ship_5", "Order 5", "site_campus", "site_hub", TimeWindow::new(420, 480), TimeWindow::new(480, 660)),
        ];
        scenario
    }
}
