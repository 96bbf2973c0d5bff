//! Row and metadata types read from the result store.

use chrono::{Months, NaiveDate};
use fc_core::{AgentId, QualId, Real, Timestep};

/// Contents of the single-row `info` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationInfo {
    pub initial_year: i32,
    pub initial_month: u32,
    /// Number of timesteps; valid times are `0..duration`.
    pub duration: usize,
}

impl SimulationInfo {
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.initial_year, self.initial_month, 1)
    }

    /// Calendar month that timestep `t` falls in (one timestep per month).
    pub fn date_of(&self, t: usize) -> Option<NaiveDate> {
        let months = u32::try_from(t).ok()?;
        self.start_date()?.checked_add_months(Months::new(months))
    }
}

/// How a facility name is matched against `agententry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentLookup {
    /// Case-insensitive equality on `prototype`.
    Prototype(String),
    /// Case-insensitive substring of `spec` (the archetype path).
    Archetype(String),
}

impl AgentLookup {
    pub fn name(&self) -> &str {
        match self {
            AgentLookup::Prototype(name) | AgentLookup::Archetype(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxDirection {
    /// Material received by the facility.
    Incoming,
    /// Material sent by the facility.
    Outgoing,
}

impl FluxDirection {
    /// `transactions` column matched against the agent ids.
    pub fn match_column(self) -> &'static str {
        match self {
            FluxDirection::Incoming => "transactions.receiverid",
            FluxDirection::Outgoing => "transactions.senderid",
        }
    }
}

/// One row of `agententry`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentEntry {
    pub agent_id: AgentId,
    pub kind: String,
    pub spec: String,
    pub prototype: String,
    pub parent_id: Option<AgentId>,
    pub lifetime: Option<i64>,
    pub enter_time: Timestep,
}

/// Transferred mass per `(time, quality class)` group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxRow {
    pub time: Timestep,
    pub quantity: Real,
    pub qual_id: QualId,
}
