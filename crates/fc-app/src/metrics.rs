//! Fuel-cycle metrics read from the auxiliary result tables.

use std::collections::BTreeMap;
use std::fmt;

use fc_core::{AgentId, MassUnit, Real, Timestep, ratio_or_zero};
use fc_results::{AgentLookup, ResultStore, SimulationInfo};
use fc_series::{AggregationMode, DisplayPolicy, Series, cumulative, densify_scaled, reconstruct};

use crate::error::AppResult;
use crate::export::SeriesTable;

/// Per-step SWU above this is a simulator sentinel, not separative work.
pub const SWU_CEILING: Real = 1e25;

const ENRICHMENT: &str = "Enrichment";
const REACTOR: &str = "Reactor";

/// `Enrichment_7`, `Reactor_12`: ordered by agent id within a prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgentKey {
    pub prefix: &'static str,
    pub id: AgentId,
}

impl fmt::Display for AgentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.prefix, self.id)
    }
}

/// Natural uranium fed to enrichment, in tonnes.
pub fn natural_u_feed(store: &ResultStore, is_cumulative: bool) -> AppResult<SeriesTable> {
    let info = store.simulation_info()?;
    let series = feed_series(store, info, is_cumulative)?;
    let mut table = SeriesTable::new("natural uranium feed", "t", mode(is_cumulative), info);
    table.push("natural_u", series);
    Ok(table)
}

/// Mass received by reactor agents, in tonnes.
pub fn fuel_received(store: &ResultStore, is_cumulative: bool) -> AppResult<SeriesTable> {
    let info = store.simulation_info()?;
    let series = fuel_series(store, info, is_cumulative)?;
    let mut table = SeriesTable::new("fuel into reactors", "t", mode(is_cumulative), info);
    table.push("fuel", series);
    Ok(table)
}

pub fn swu_by_enrichment(store: &ResultStore, mode: AggregationMode) -> AppResult<SeriesTable> {
    let table = per_agent_table(store, ENRICHMENT, mode, "SWU", |id| store.enrichment_swu(id))?;
    Ok(table.with_policy(swu_policy(mode)))
}

/// Sentinels are only masked per step; a running total stays connected.
fn swu_policy(mode: AggregationMode) -> DisplayPolicy {
    let policy = DisplayPolicy::for_mode(mode);
    if mode.cumulative {
        policy
    } else {
        policy.with_ceiling(SWU_CEILING)
    }
}

pub fn power_by_reactor(store: &ResultStore, mode: AggregationMode) -> AppResult<SeriesTable> {
    per_agent_table(store, REACTOR, mode, "MWe", |id| store.power(id))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utilization {
    /// Cumulative fuel over cumulative natural uranium, 0 where undefined.
    pub series: Series,
    pub average: Real,
}

impl Utilization {
    pub fn into_table(self, info: SimulationInfo) -> SeriesTable {
        let mut table = SeriesTable::new("uranium utilization", "", mode(true), info);
        table.push("utilization", self.series);
        table
    }
}

pub fn uranium_utilization(store: &ResultStore) -> AppResult<Utilization> {
    let info = store.simulation_info()?;
    let feed = feed_series(store, info, true)?;
    let fuel = fuel_series(store, info, true)?;

    let series: Series = fuel
        .iter()
        .zip(&feed)
        .map(|(&f, &u)| ratio_or_zero(f, u))
        .collect();
    let average = ratio_or_zero(series.iter().sum(), series.len() as Real);
    tracing::debug!(average, "uranium utilization");
    Ok(Utilization { series, average })
}

fn mode(is_cumulative: bool) -> AggregationMode {
    AggregationMode {
        cumulative: is_cumulative,
        total: false,
    }
}

fn feed_series(store: &ResultStore, info: SimulationInfo, is_cumulative: bool) -> AppResult<Series> {
    let records = store.enrichment_feed()?;
    dense_tonnes(&records, info, is_cumulative)
}

fn fuel_series(store: &ResultStore, info: SimulationInfo, is_cumulative: bool) -> AppResult<Series> {
    let records = store.mass_received_by_archetype(REACTOR)?;
    dense_tonnes(&records, info, is_cumulative)
}

fn dense_tonnes(
    records: &[(Timestep, Real)],
    info: SimulationInfo,
    is_cumulative: bool,
) -> AppResult<Series> {
    let series = densify_scaled(records, info.duration, MassUnit::Tonne.factor_from_kg())?;
    Ok(if is_cumulative {
        cumulative(&series)
    } else {
        series
    })
}

fn per_agent_table<F>(
    store: &ResultStore,
    archetype: &'static str,
    mode: AggregationMode,
    unit: &str,
    fetch: F,
) -> AppResult<SeriesTable>
where
    F: Fn(AgentId) -> fc_results::ResultsResult<Vec<(Timestep, Real)>>,
{
    let info = store.simulation_info()?;
    let ids = store.resolve_agent_ids(&AgentLookup::Archetype(archetype.to_string()))?;

    let mut records = BTreeMap::new();
    for id in ids {
        records.insert(AgentKey { prefix: archetype, id }, fetch(id)?);
    }
    if records.is_empty() {
        tracing::warn!(archetype, "no agents of this archetype in the result store");
    }

    let aggregated = reconstruct(&records, info.duration, 1.0, mode)?;
    let title = format!("{} {}", mode.label(), archetype.to_lowercase());
    let total_key = format!("{archetype}_total");
    Ok(SeriesTable::from_aggregated(
        title, unit, mode, info, aggregated, &total_key,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_keys_order_numerically() {
        let a = AgentKey {
            prefix: REACTOR,
            id: AgentId::new(9),
        };
        let b = AgentKey {
            prefix: REACTOR,
            id: AgentId::new(10),
        };
        assert!(a < b);
        assert_eq!(b.to_string(), "Reactor_10");
    }

    #[test]
    fn swu_ceiling_masks_only_per_step_values() {
        let per_step = [120.0, 1e30, 60.0, 60.0];

        let shown = swu_policy(AggregationMode::PER_STEP).apply(&per_step);
        assert_eq!(shown, vec![Some(120.0), None, Some(60.0), Some(60.0)]);

        let running = cumulative(&per_step);
        let shown = swu_policy(AggregationMode {
            cumulative: true,
            total: false,
        })
        .apply(&running);
        assert!(shown.iter().all(Option::is_some));
    }

    #[test]
    fn dense_tonnes_converts_and_accumulates() {
        let info = SimulationInfo {
            initial_year: 2000,
            initial_month: 1,
            duration: 3,
        };
        let out = dense_tonnes(&[(0, 1000.0), (2, 500.0)], info, true).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 1.0).abs() < 1e-12);
        assert!((out[2] - 1.5).abs() < 1e-12);
    }
}
