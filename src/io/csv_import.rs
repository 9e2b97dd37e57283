use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{NaiveTime, Timelike};
use tracing::warn;

use super::{IoError, IoResult};
use crate::model::{Shipment, Site, TimeWindow};

/// Column slots a header can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Id,
    Name,
    PickupSite,
    DeliverySite,
    PickupStart,
    PickupEnd,
    DeliveryStart,
    DeliveryEnd,
    Weight,
    Volume,
    Priority,
}

const REQUIRED: &str =
    "pickup site, delivery site, pickup start, pickup end, delivery start, delivery end";

/// Parse a time cell: plain minutes (`90`) or a clock time (`01:30`).
fn parse_minutes(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(m) = s.parse::<u32>() {
        return Some(m);
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .ok()
        .map(|t| t.hour() * 60 + t.minute())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs && semicolons > 0 {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "shipmentid" | "orderid" => Some(Column::Id),
        "name" | "shipment" | "order" | "ordername" | "label" => Some(Column::Name),
        "pickup" | "pickupsite" | "pickupsiteid" | "from" | "origin" => Some(Column::PickupSite),
        "delivery" | "deliverysite" | "deliverysiteid" | "to" | "destination" => {
            Some(Column::DeliverySite)
        }
        "pickupstart" | "pickupfrom" | "pickupopen" => Some(Column::PickupStart),
        "pickupend" | "pickupto" | "pickupclose" => Some(Column::PickupEnd),
        "deliverystart" | "deliveryfrom" | "deliveryopen" => Some(Column::DeliveryStart),
        "deliveryend" | "deliveryto" | "deliveryclose" => Some(Column::DeliveryEnd),
        "weight" | "kg" => Some(Column::Weight),
        "volume" | "cbm" => Some(Column::Volume),
        "priority" | "pri" => Some(Column::Priority),
        _ => None,
    }
}

/// Import shipments from a CSV file. See [`import_shipments_str`].
pub fn import_shipments(path: &Path, sites: &[Site]) -> IoResult<(Vec<Shipment>, usize)> {
    let content = std::fs::read_to_string(path)?;
    import_shipments_str(&content, sites)
}

/// Parse shipments from CSV text.
///
/// The delimiter is auto-detected and headers are matched loosely. Site
/// cells may hold a site id or a site name. Rows with an unknown site or an
/// unparsable window are skipped. Returns `(shipments, skipped_count)`.
pub fn import_shipments_str(content: &str, sites: &[Site]) -> IoResult<(Vec<Shipment>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let required = [
        Column::PickupSite,
        Column::DeliverySite,
        Column::PickupStart,
        Column::PickupEnd,
        Column::DeliveryStart,
        Column::DeliveryEnd,
    ];
    if !required.iter().all(|c| col_map.contains(&Some(*c))) {
        return Err(IoError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
            required: REQUIRED,
        });
    }

    let site_ids: HashMap<String, String> = sites
        .iter()
        .flat_map(|s| {
            [
                (s.id.to_lowercase(), s.id.clone()),
                (s.name.to_lowercase(), s.id.clone()),
            ]
        })
        .collect();

    let mut shipments = Vec::new();
    let mut skipped = 0usize;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) => records.push((i + 2, record)),
            Err(e) => {
                warn!(line = i + 2, error = %e, "skipping CSV row");
                skipped += 1;
            }
        }
    }

    // Explicit ids are reserved up front so generated ones never take them.
    let id_col = col_map.iter().position(|c| *c == Some(Column::Id));
    let reserved: HashSet<String> = id_col
        .map(|idx| {
            records
                .iter()
                .filter_map(|(_, r)| r.get(idx))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let mut used: HashSet<String> = HashSet::new();
    let mut next_generated = 1usize;

    for (line, record) in &records {
        let line = *line;
        let fields: HashMap<Column, &str> = record
            .iter()
            .zip(col_map.iter())
            .filter_map(|(field, col)| col.map(|c| (c, field)))
            .collect();
        let get = |c: Column| fields.get(&c).copied().unwrap_or("");

        let explicit_id = get(Column::Id);
        if !explicit_id.is_empty() && used.contains(explicit_id) {
            warn!(line, id = explicit_id, "skipping row with repeated shipment id");
            skipped += 1;
            continue;
        }

        let resolve_site = |c: Column| site_ids.get(&get(c).to_lowercase()).cloned();
        let (Some(pickup_site_id), Some(delivery_site_id)) =
            (resolve_site(Column::PickupSite), resolve_site(Column::DeliverySite))
        else {
            warn!(line, pickup = get(Column::PickupSite), delivery = get(Column::DeliverySite), "skipping row with unknown site");
            skipped += 1;
            continue;
        };

        let window = |from: Column, to: Column| {
            let start = parse_minutes(get(from))?;
            let end = parse_minutes(get(to))?;
            (start <= end).then(|| TimeWindow::new(start, end))
        };
        let (Some(pickup_window), Some(delivery_window)) = (
            window(Column::PickupStart, Column::PickupEnd),
            window(Column::DeliveryStart, Column::DeliveryEnd),
        ) else {
            warn!(line, "skipping row with invalid time window");
            skipped += 1;
            continue;
        };

        let n = shipments.len() + 1;
        let id = match explicit_id {
            "" => loop {
                let candidate = format!("ship_{next_generated}");
                next_generated += 1;
                if !reserved.contains(&candidate) && !used.contains(&candidate) {
                    break candidate;
                }
            },
            id => id.to_string(),
        };
        used.insert(id.clone());
        let name = match get(Column::Name) {
            "" => format!("Order {n}"),
            name => name.to_string(),
        };

        shipments.push(Shipment {
            id,
            name,
            pickup_site_id,
            delivery_site_id,
            pickup_window,
            delivery_window,
            weight: get(Column::Weight).parse().unwrap_or(0.0),
            volume: get(Column::Volume).parse().unwrap_or(0.0),
            priority: get(Column::Priority).parse().unwrap_or(1),
        });
    }

    if shipments.is_empty() {
        return Err(IoError::NoRows { skipped });
    }
    Ok((shipments, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scenario;

    #[test]
    fn imports_semicolon_file_with_names_and_clock_times() {
        let sites = Scenario::sample().sites;
        let csv = "Name;Pickup Site;Delivery Site;Pickup Start;Pickup End;Delivery Start;Delivery End;Weight\n\
                   Bread;North Depot;site_market;01:00;02:30;180;240;3.5\n";
        let (shipments, skipped) = import_shipments_str(csv, &sites).unwrap();
        assert_eq!(skipped, 0);
        let ship = &shipments[0];
        assert_eq!(ship.id, "ship_1");
        assert_eq!(ship.name, "Bread");
        assert_eq!(ship.pickup_site_id, "depot_north");
        assert_eq!(ship.delivery_site_id, "site_market");
        assert_eq!(ship.pickup_window, TimeWindow::new(60, 150));
        assert_eq!(ship.delivery_window, TimeWindow::new(180, 240));
        assert_eq!(ship.weight, 3.5);
        assert_eq!(ship.priority, 1);
    }

    #[test]
    fn skips_bad_rows_and_counts_them() {
        let sites = Scenario::sample().sites;
        let csv = "pickup,delivery,pickup_start,pickup_end,delivery_start,delivery_end\n\
                   depot_north,site_park,10,20,30,40\n\
                   nowhere,site_park,10,20,30,40\n\
                   depot_north,site_park,50,20,30,40\n\
                   depot_north,site_park,abc,20,30,40\n";
        let (shipments, skipped) = import_shipments_str(csv, &sites).unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(skipped, 3);
    }

    #[test]
    fn generated_ids_never_collide_with_explicit_ones() {
        let sites = Scenario::sample().sites;
        let csv = "id;pickup;delivery;pickup start;pickup end;delivery start;delivery end\n\
                   ;depot_north;site_park;300;360;400;420\n\
                   ship_1;depot_north;site_park;60;120;130;140\n\
                   ;depot_east;site_hub;10;20;30;40\n";
        let (shipments, skipped) = import_shipments_str(csv, &sites).unwrap();
        assert_eq!(skipped, 0);
        let ids: Vec<&str> = shipments.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["ship_2", "ship_1", "ship_3"]);
    }

    #[test]
    fn repeated_explicit_id_is_skipped() {
        let sites = Scenario::sample().sites;
        let csv = "id;pickup;delivery;pickup start;pickup end;delivery start;delivery end\n\
                   ship_2;depot_north;site_park;60;120;130;140\n\
                   ship_2;depot_north;site_park;300;360;400;420\n\
                   ;depot_north;site_park;300;360;400;420\n";
        let (shipments, skipped) = import_shipments_str(csv, &sites).unwrap();
        assert_eq!(skipped, 1);
        let ids: Vec<&str> = shipments.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["ship_2", "ship_1"]);
        assert_eq!(shipments[0].pickup_window, TimeWindow::new(60, 120));
    }

    #[test]
    fn missing_columns_is_an_error() {
        let err = import_shipments_str("name,weight\nx,1\n", &[]).unwrap_err();
        assert!(matches!(err, IoError::MissingColumns { .. }));
    }

    #[test]
    fn no_valid_rows_is_an_error() {
        let csv = "pickup,delivery,pickup_start,pickup_end,delivery_start,delivery_end\n\
                   a,b,1,2,3,4\n";
        let err = import_shipments_str(csv, &[]).unwrap_err();
        assert!(matches!(err, IoError::NoRows { skipped: 1 }));
    }

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("single"), b',');
    }
}
