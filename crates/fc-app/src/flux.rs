//! Per-nuclide material flux into or out of a facility.

use fc_core::{MassUnit, Nuclide};
use fc_results::{AgentLookup, FluxDirection, ResultStore, SimulationInfo, join_to_transactions};
use fc_series::{Aggregated, AggregationMode, reconstruct};

use crate::error::AppResult;
use crate::export::SeriesTable;

/// Which facility, which side of its transactions, and how to present it.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxRequest {
    pub lookup: AgentLookup,
    pub direction: FluxDirection,
    pub mode: AggregationMode,
    pub unit: MassUnit,
}

/// Dense nuclide series for the request.
///
/// A facility that matches no agents surfaces as
/// [`fc_results::ResultsError::InvalidQuery`].
pub fn flux_series(store: &ResultStore, request: &FluxRequest) -> AppResult<Aggregated<Nuclide>> {
    let info = store.simulation_info()?;
    reconstruct_flux(store, request, info)
}

fn reconstruct_flux(
    store: &ResultStore,
    request: &FluxRequest,
    info: SimulationInfo,
) -> AppResult<Aggregated<Nuclide>> {
    let ids = store.resolve_agent_ids(&request.lookup)?;
    let flux = store.query_flux(&ids, request.direction)?;
    let compositions = store.query_compositions()?;
    let transactions = join_to_transactions(&flux, &compositions);

    tracing::debug!(
        facility = request.lookup.name(),
        agents = ids.len(),
        rows = flux.len(),
        nuclides = transactions.len(),
        mode = request.mode.label(),
        "reconstructing flux"
    );

    let series = reconstruct(
        &transactions,
        info.duration,
        request.unit.factor_from_kg(),
        request.mode,
    )?;
    Ok(series)
}

pub fn flux_table(store: &ResultStore, request: &FluxRequest) -> AppResult<SeriesTable> {
    let info = store.simulation_info()?;
    let series = reconstruct_flux(store, request, info)?;
    let direction = match request.direction {
        FluxDirection::Incoming => "into",
        FluxDirection::Outgoing => "out of",
    };
    let title = format!("{} flux {} {}", request.mode.label(), direction, request.lookup.name());
    Ok(SeriesTable::from_aggregated(
        title,
        request.unit.symbol(),
        request.mode,
        info,
        series,
        "total",
    ))
}
