//! fc-scenario: scenario file format, fleet planning and simulator input rendering.

pub mod dates;
pub mod fleet;
pub mod reactor;
pub mod reactor_list;
pub mod render;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use dates::{DEFAULT_LIFETIME_MONTHS, DateError, YearMonth};
pub use fleet::{FleetPlan, plan_fleet, refine_name};
pub use reactor::{ReactorSpec, ReactorType};
pub use reactor_list::{load_reactors_csv, read_reactors_csv};
pub use render::{RenderSummary, render_input, render_to_path};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Nuclide error: {0}")]
    Nuclide(#[from] fc_core::FcError),

    #[error("Date error: {0}")]
    Date(#[from] DateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Reactor list error: {0}")]
    Csv(#[from] csv::Error),
}

pub fn load_yaml(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    tracing::debug!(
        path = %path.display(),
        reactors = scenario.reactors.len(),
        "loaded scenario"
    );
    Ok(scenario)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}
