use std::path::PathBuf;

use vrp_schedule::config::{AppSettings, EditBounds};
use vrp_schedule::io::{self, csv_export, csv_import, IoError};
use vrp_schedule::model::{build_rows, RowSource, Scenario, ScenarioError};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vrp-schedule-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn scenario_survives_save_and_load() {
    let dir = scratch_dir("scenario");
    let path = dir.join("sample.json");
    let mut scenario = Scenario::sample();
    scenario
        .update_shipment_window("ship_2", 0, 15, 75)
        .expect("known shipment");

    io::save_scenario(&scenario, &path).expect("save");
    let loaded = io::load_scenario(&path).expect("load");

    assert_eq!(loaded.name, scenario.name);
    assert_eq!(loaded.shipments, scenario.shipments);
    assert_eq!(loaded.sites, scenario.sites);
    assert_eq!(loaded.vehicles, scenario.vehicles);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn loaded_result_switches_rows_to_routes() {
    let dir = scratch_dir("result");
    let path = dir.join("result.json");
    std::fs::write(
        &path,
        r#"{
            "status": "feasible",
            "routes": [{
                "vehicle_id": "truck_1",
                "stops": [
                    {"site_id": "depot_north", "arrival_time": 0, "stop_type": "depot_start"},
                    {"site_id": "site_station", "arrival_time": 95, "stop_type": "pickup", "shipment_id": "ship_1"},
                    {"site_id": "site_market", "arrival_time": 790, "is_late": true, "stop_type": "delivery", "shipment_id": "ship_1"}
                ]
            }]
        }"#,
    )
    .expect("write result");

    let result = io::load_result(&path).expect("load result");
    let mut scenario = Scenario::sample();
    scenario.set_result(Some(result));

    let rows = build_rows(&scenario, &AppSettings::default().timeline);
    assert_eq!(rows.source, RowSource::VehicleRoutes);
    assert!(!rows.is_editable());
    assert_eq!(rows.rows.len(), 1);
    assert_eq!(rows.rows[0].bars.len(), 3);
    assert!(rows.rows[0].bars[2].late);
    assert!(rows.horizon >= 840);
    assert_eq!(rows.horizon % 60, 0);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn malformed_json_is_reported() {
    let dir = scratch_dir("broken");
    let path = dir.join("broken.json");
    std::fs::write(&path, "{ not json").expect("write");
    assert!(matches!(io::load_scenario(&path), Err(IoError::Json(_))));
    assert!(matches!(
        io::load_scenario(&dir.join("missing.json")),
        Err(IoError::Io(_))
    ));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn scenario_with_repeated_shipment_ids_is_rejected() {
    let dir = scratch_dir("duplicates");
    let path = dir.join("duplicates.json");
    let mut scenario = Scenario::sample();
    scenario.shipments[1].id = "ship_1".into();
    io::save_scenario(&scenario, &path).expect("save");

    match io::load_scenario(&path) {
        Err(IoError::Scenario(ScenarioError::DuplicateShipmentId(id))) => assert_eq!(id, "ship_1"),
        other => panic!("expected a duplicate id error, got {other:?}"),
    }
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn imported_shipments_with_clashing_ids_stay_addressable() {
    let dir = scratch_dir("clash");
    let input = dir.join("clash.csv");
    std::fs::write(
        &input,
        "id;pickup;delivery;pickup start;pickup end;delivery start;delivery end\n\
         ship_2;depot_north;site_park;60;120;130;140\n\
         ;depot_north;site_park;300;360;400;420\n",
    )
    .expect("write csv");

    let mut scenario = Scenario::sample();
    let (shipments, _) = csv_import::import_shipments(&input, &scenario.sites).expect("import");
    scenario.shipments = shipments;
    scenario.validate().expect("ids are unique");

    let rows = build_rows(&scenario, &AppSettings::default().timeline);
    let second = rows.rows[1].id.clone();
    scenario.update_shipment_window(&second, 0, 330, 390).expect("edit");
    assert_eq!(scenario.shipments[0].pickup_window.start, 60);
    assert_eq!(scenario.shipments[1].pickup_window.start, 330);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn imported_shipments_export_as_schedule_lines() {
    let dir = scratch_dir("csv");
    let input = dir.join("shipments.csv");
    std::fs::write(
        &input,
        "id,name,pickup,delivery,pickup start,pickup end,delivery start,delivery end\n\
         a1,Flowers,depot_east,site_park,08:00,09:00,09:30,10:00\n\
         a2,Books,depot_north,site_campus,60,120,150,240\n",
    )
    .expect("write csv");

    let mut scenario = Scenario::sample();
    let (shipments, skipped) = csv_import::import_shipments(&input, &scenario.sites).expect("import");
    assert_eq!(skipped, 0);
    scenario.shipments = shipments;

    let rows = build_rows(&scenario, &AppSettings::default().timeline);
    let output = dir.join("schedule.csv");
    let written = csv_export::export_schedule(&rows.rows, &output).expect("export");
    assert_eq!(written, 4);

    let text = std::fs::read_to_string(&output).expect("read export");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("a1;Flowers;0;"));
    assert!(lines[1].ends_with(";480;540;no"));
    assert!(lines[4].starts_with("a2;Books;1;"));
    assert!(lines[4].ends_with(";150;240;no"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn settings_round_trip_and_partial_files() {
    let dir = scratch_dir("settings");
    let path = dir.join("nested").join("settings.json");

    let mut settings = AppSettings::default();
    settings.timeline.edit_bounds = EditBounds::ClampToHorizon;
    settings.timeline.min_tick_spacing_px = 80.0;
    settings.save(&path).expect("save settings");
    assert_eq!(AppSettings::load(&path), settings);

    std::fs::write(&path, r#"{"timeline": {"row_height": 30.0}}"#).expect("write partial");
    let partial = AppSettings::load(&path);
    assert_eq!(partial.timeline.row_height, 30.0);
    assert_eq!(partial.timeline.edit_bounds, EditBounds::ExtendHorizon);

    std::fs::write(&path, "garbage").expect("write garbage");
    assert_eq!(AppSettings::load(&path), AppSettings::default());
    let _ = std::fs::remove_dir_all(dir);
}
