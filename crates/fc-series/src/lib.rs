//! fc-series: dense time-series reconstruction from sparse transfer records.
//!
//! Raw `(time, quantity)` pairs arrive grouped by key (nuclide, agent, ...).
//! This crate expands them into zero-filled series covering every timestep
//! of the simulation and derives the cumulative and summed-over-keys forms.

pub mod aggregate;
pub mod dense;
pub mod display;
pub mod mode;

pub use aggregate::{cumulative, total_across_keys};
pub use dense::{densify, densify_scaled};
pub use display::DisplayPolicy;
pub use mode::{AggregationMode, Aggregated, reconstruct};

/// Dense series: one value per timestep, index `t` is timestep `t`.
pub type Series = Vec<fc_core::Real>;

pub type SeriesResult<T> = Result<T, SeriesError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Timestep {time} outside [0, {duration}){}", key_suffix(.key))]
    OutOfRangeTimestep {
        key: Option<String>,
        time: i64,
        duration: usize,
    },

    #[error("Series length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

impl SeriesError {
    /// Attach the key whose records produced this error.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        match self {
            SeriesError::OutOfRangeTimestep { time, duration, .. } => {
                SeriesError::OutOfRangeTimestep {
                    key: Some(key.into()),
                    time,
                    duration,
                }
            }
            other => other,
        }
    }
}

fn key_suffix(key: &Option<String>) -> String {
    match key {
        Some(k) => format!(" for key {k}"),
        None => String::new(),
    }
}
