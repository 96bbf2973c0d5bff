//! Scenario loading and simulator input rendering.

use std::path::Path;

use fc_scenario::{RenderSummary, Scenario};

use crate::error::{AppError, AppResult};

/// Load and validate a scenario YAML file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::InvalidInput(format!(
            "scenario file not found: {}",
            path.display()
        )));
    }
    Ok(fc_scenario::load_yaml(path)?)
}

/// Render the scenario at `scenario_path` into the simulator input at `output`.
///
/// Reactors from an optional tabular list are appended to the scenario's own.
pub fn render_scenario(
    scenario_path: &Path,
    reactors_csv: Option<&Path>,
    output: &Path,
) -> AppResult<RenderSummary> {
    let mut scenario = load_scenario(scenario_path)?;
    if let Some(path) = reactors_csv {
        if !path.exists() {
            return Err(AppError::InvalidInput(format!(
                "reactor list not found: {}",
                path.display()
            )));
        }
        scenario
            .reactors
            .extend(fc_scenario::load_reactors_csv(path)?);
        fc_scenario::validate_scenario(&scenario).map_err(fc_scenario::ScenarioError::from)?;
    }
    let summary = fc_scenario::render_to_path(&scenario, output)?;
    for reactor_type in &summary.fallback_types {
        tracing::warn!(%reactor_type, "rendered with default reactor specification");
    }
    Ok(summary)
}
