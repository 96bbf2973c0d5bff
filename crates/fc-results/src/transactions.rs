//! Flux rows x compositions -> per-nuclide transaction records.

use std::collections::{BTreeMap, BTreeSet};

use fc_core::{Nuclide, QualId, Real, Timestep};

use crate::types::FluxRow;

/// Mass fractions per quality class, as listed in `compositions`.
pub type CompositionTable = BTreeMap<QualId, Vec<(Nuclide, Real)>>;

/// Per-nuclide `(time, mass)` records, time-ordered, one entry per time.
pub type TransactionMap = BTreeMap<Nuclide, Vec<(Timestep, Real)>>;

/// Split each flux row into nuclide masses and merge them per time.
///
/// A nuclide carried by several quality classes at the same timestep gets
/// the sum of their contributions, so the output never holds two records
/// for one `(nuclide, time)` pair. Only nuclides that actually appear in a
/// matched composition become keys.
pub fn join_to_transactions(flux: &[FluxRow], compositions: &CompositionTable) -> TransactionMap {
    let mut merged: BTreeMap<Nuclide, BTreeMap<Timestep, Real>> = BTreeMap::new();
    let mut unknown = BTreeSet::new();

    for row in flux {
        let Some(fractions) = compositions.get(&row.qual_id) else {
            unknown.insert(row.qual_id);
            continue;
        };
        for &(nuclide, mass_frac) in fractions {
            *merged
                .entry(nuclide)
                .or_default()
                .entry(row.time)
                .or_insert(0.0) += row.quantity * mass_frac;
        }
    }

    if !unknown.is_empty() {
        tracing::warn!(
            count = unknown.len(),
            "flux rows reference quality classes without a composition; skipped"
        );
    }

    merged
        .into_iter()
        .map(|(nuclide, by_time)| (nuclide, by_time.into_iter().collect()))
        .collect()
}
