//! The four presentation modes: {cumulative, per-step} x {per-key, total}.

use std::collections::BTreeMap;
use std::fmt::Display;

use fc_core::{Real, Timestep};

use crate::{Series, SeriesResult, cumulative, densify_scaled, total_across_keys};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregationMode {
    /// Running total along the time axis.
    pub cumulative: bool,
    /// Sum across keys at each timestep.
    pub total: bool,
}

impl AggregationMode {
    pub const PER_STEP: Self = Self {
        cumulative: false,
        total: false,
    };

    pub fn label(self) -> &'static str {
        match (self.cumulative, self.total) {
            (false, false) => "per-step",
            (true, false) => "cumulative",
            (false, true) => "total per-step",
            (true, true) => "total cumulative",
        }
    }
}

/// Result of [`reconstruct`]: one series per key, or one summed series.
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregated<K> {
    PerKey(BTreeMap<K, Series>),
    Total(Series),
}

impl<K> Aggregated<K> {
    pub fn as_total(&self) -> Option<&Series> {
        match self {
            Aggregated::Total(series) => Some(series),
            Aggregated::PerKey(_) => None,
        }
    }

    pub fn as_per_key(&self) -> Option<&BTreeMap<K, Series>> {
        match self {
            Aggregated::PerKey(map) => Some(map),
            Aggregated::Total(_) => None,
        }
    }
}

/// Densify every key's records, scale once, then aggregate per `mode`.
///
/// The key set of a per-key result is exactly the key set of `records`.
pub fn reconstruct<K>(
    records: &BTreeMap<K, Vec<(Timestep, Real)>>,
    duration: usize,
    scale: Real,
    mode: AggregationMode,
) -> SeriesResult<Aggregated<K>>
where
    K: Ord + Clone + Display,
{
    let mut dense = BTreeMap::new();
    for (key, rows) in records {
        let series =
            densify_scaled(rows, duration, scale).map_err(|e| e.with_key(key.to_string()))?;
        dense.insert(key.clone(), series);
    }

    if mode.total {
        let total = total_across_keys(dense.values().map(Vec::as_slice), duration)?;
        let total = if mode.cumulative {
            cumulative(&total)
        } else {
            total
        };
        return Ok(Aggregated::Total(total));
    }

    if mode.cumulative {
        for series in dense.values_mut() {
            *series = cumulative(series);
        }
    }
    Ok(Aggregated::PerKey(dense))
}
