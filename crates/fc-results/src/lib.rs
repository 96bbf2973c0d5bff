//! fc-results: read-only query layer over the simulator's SQLite output.

pub mod store;
pub mod transactions;
pub mod types;

pub use store::ResultStore;
pub use transactions::{CompositionTable, TransactionMap, join_to_transactions};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Result store not found: {path}")]
    StoreNotFound { path: String },

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("Missing simulation metadata in table '{table}': {reason}")]
    MissingSimulationMetadata { table: &'static str, reason: String },
}
