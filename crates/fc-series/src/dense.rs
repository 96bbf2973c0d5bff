//! Zero-filled expansion of sparse `(time, quantity)` records.

use fc_core::{Real, Timestep};

use crate::{Series, SeriesError, SeriesResult};

/// Expand `records` into a series of exactly `duration` entries.
///
/// A timestep without a record holds `0.0` (no flux). Records sharing a
/// timestep are added together. Any record outside `[0, duration)` fails the
/// whole call; clipping it would corrupt cumulative totals.
pub fn densify(records: &[(Timestep, Real)], duration: usize) -> SeriesResult<Series> {
    let mut series = vec![0.0; duration];
    for &(time, quantity) in records {
        let index = slot(time, duration)?;
        series[index] += quantity;
    }
    Ok(series)
}

/// [`densify`] followed by one element-wise multiplication by `scale`.
pub fn densify_scaled(
    records: &[(Timestep, Real)],
    duration: usize,
    scale: Real,
) -> SeriesResult<Series> {
    let mut series = densify(records, duration)?;
    if scale != 1.0 {
        for value in &mut series {
            *value *= scale;
        }
    }
    Ok(series)
}

fn slot(time: Timestep, duration: usize) -> SeriesResult<usize> {
    match usize::try_from(time) {
        Ok(index) if index < duration => Ok(index),
        _ => Err(SeriesError::OutOfRangeTimestep {
            key: None,
            time,
            duration,
        }),
    }
}
