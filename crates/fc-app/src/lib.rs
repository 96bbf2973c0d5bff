//! Shared service layer for the fuel-cycle command-line tools.
//!
//! Ties the result store, the series reconstructor and the scenario crate
//! together: flux series in the four aggregation modes, fuel-cycle metrics,
//! simulator invocation and table export.

pub mod error;
pub mod export;
pub mod flux;
pub mod metrics;
pub mod scenario_service;
pub mod simulator;

pub use error::{AppError, AppResult};
pub use export::{ExportFormat, NamedSeries, SeriesTable, write_table, write_table_to};
pub use flux::{FluxRequest, flux_series, flux_table};
pub use metrics::{
    AgentKey, SWU_CEILING, Utilization, fuel_received, natural_u_feed, power_by_reactor,
    swu_by_enrichment, uranium_utilization,
};
pub use scenario_service::{load_scenario, render_scenario};
pub use simulator::{SimulatorRun, run_simulator};
