//! Running totals and sums across keys.

use fc_core::Real;

use crate::{Series, SeriesError, SeriesResult};

/// Running prefix sum: `out[t] = series[0] + ... + series[t]`.
pub fn cumulative(series: &[Real]) -> Series {
    series
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Element-wise sum of dense series that all span `duration` timesteps.
///
/// No series at all yields an all-zero series.
pub fn total_across_keys<'a, I>(series: I, duration: usize) -> SeriesResult<Series>
where
    I: IntoIterator<Item = &'a [Real]>,
{
    let mut total = vec![0.0; duration];
    for s in series {
        if s.len() != duration {
            return Err(SeriesError::LengthMismatch {
                expected: duration,
                found: s.len(),
            });
        }
        for (acc, v) in total.iter_mut().zip(s) {
            *acc += v;
        }
    }
    Ok(total)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::densify;
    use fc_core::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cumulative_never_decreases(values in prop::collection::vec(0.0_f64..1.0e6, 0..64)) {
            let cum = cumulative(&values);
            prop_assert_eq!(cum.len(), values.len());
            for pair in cum.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
            if let Some(&last) = cum.last() {
                let sum: f64 = values.iter().sum();
                let tol = Tolerances { abs: 1e-6, rel: 1e-9 };
                prop_assert!(nearly_equal(last, sum, tol));
            }
        }

        #[test]
        fn cumulative_final_value_conserves_raw_total(
            records in prop::collection::vec((0_i64..24, 0.0_f64..1.0e4), 1..40)
        ) {
            let dense = densify(&records, 24).unwrap();
            let cum = cumulative(&dense);
            let raw: f64 = records.iter().map(|(_, q)| q).sum();
            let tol = Tolerances { abs: 1e-6, rel: 1e-9 };
            prop_assert!(nearly_equal(*cum.last().unwrap(), raw, tol));
        }
    }
}
