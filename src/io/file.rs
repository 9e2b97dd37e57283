use std::path::Path;

use super::IoResult;
use crate::model::{OptimizeResult, Scenario};

/// Save a scenario to a JSON file.
pub fn save_scenario(scenario: &Scenario, path: &Path) -> IoResult<()> {
    let json = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "scenario saved");
    Ok(())
}

/// Load a scenario from a JSON file. Scenarios with repeated shipment ids
/// are rejected.
pub fn load_scenario(path: &Path) -> IoResult<Scenario> {
    let json = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&json)?;
    scenario.validate()?;
    tracing::info!(path = %path.display(), "scenario loaded");
    Ok(scenario)
}

/// Load a solver result as returned by the optimization service.
pub fn load_result(path: &Path) -> IoResult<OptimizeResult> {
    let json = std::fs::read_to_string(path)?;
    let result: OptimizeResult = serde_json::from_str(&json)?;
    tracing::info!(path = %path.display(), routes = result.routes.len(), "solver result loaded");
    Ok(result)
}
