//! Scenario schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub simulation: SimulationParameters,
    #[serde(default)]
    pub reactors: Vec<ReactorDef>,
    #[serde(default)]
    pub infrastructure: InfrastructureDef,
    #[serde(default)]
    pub recipes: RecipesDef,
    #[serde(default)]
    pub options: RenderOptions,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationParameters {
    /// Number of monthly timesteps.
    pub duration: u32,
    pub start_month: u32,
    pub start_year: i32,
    #[serde(default)]
    pub decay: DecayMode,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecayMode {
    #[default]
    Never,
    Manual,
    Lazy,
}

impl DecayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DecayMode::Never => "never",
            DecayMode::Manual => "manual",
            DecayMode::Lazy => "lazy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactorDef {
    pub country: String,
    pub name: String,
    #[serde(rename = "type")]
    pub reactor_type: String,
    pub capacity_mwe: f64,
    pub operator: String,
    /// First criticality, `yyyymmdd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_criticality: Option<u32>,
    /// Shutdown date, `yyyymmdd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown: Option<u32>,
}

/// Fuel-cycle support facilities deployed at the start of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfrastructureDef {
    #[serde(default = "default_support_region")]
    pub region: String,
    #[serde(default = "default_one")]
    pub mines: u32,
    #[serde(default = "default_one")]
    pub enrichment: u32,
    #[serde(default = "default_one")]
    pub repositories: u32,
    /// Deploy a separations facility that reprocesses spent fuel.
    #[serde(default)]
    pub reprocessing: bool,
}

impl Default for InfrastructureDef {
    fn default() -> Self {
        Self {
            region: default_support_region(),
            mines: 1,
            enrichment: 1,
            repositories: 1,
            reprocessing: false,
        }
    }
}

fn default_support_region() -> String {
    "support".to_string()
}

fn default_one() -> u32 {
    1
}

/// Mass-basis recipes keyed by nuclide label (`U235`) or id (`922350000`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipesDef {
    #[serde(default)]
    pub fresh: BTreeMap<String, f64>,
    #[serde(default)]
    pub spent: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RenderOptions {
    /// Reactors below this net capacity are treated as test reactors and skipped.
    #[serde(default = "default_min_capacity")]
    pub min_capacity_mwe: f64,
    #[serde(default = "default_cycle_time")]
    pub cycle_time_months: u32,
    #[serde(default = "default_refuel_time")]
    pub refuel_time_months: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_capacity_mwe: default_min_capacity(),
            cycle_time_months: default_cycle_time(),
            refuel_time_months: default_refuel_time(),
        }
    }
}

fn default_min_capacity() -> f64 {
    100.0
}

fn default_cycle_time() -> u32 {
    18
}

fn default_refuel_time() -> u32 {
    1
}
