//! Point-rendering policy: which values are drawn and which are "no value".

use fc_core::Real;

use crate::AggregationMode;

/// Maps a dense series onto drawable points.
///
/// In a per-step series an exact zero means no transfer happened, so it is
/// hidden instead of drawn as a point on the axis. Cumulative plateaus are
/// real values and are always kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayPolicy {
    pub hide_zeros: bool,
    /// Values strictly above this are simulator sentinels, not data.
    pub ceiling: Option<Real>,
}

impl DisplayPolicy {
    pub const KEEP_ALL: Self = Self {
        hide_zeros: false,
        ceiling: None,
    };

    pub fn for_mode(mode: AggregationMode) -> Self {
        Self {
            hide_zeros: !mode.cumulative,
            ceiling: None,
        }
    }

    pub fn with_ceiling(mut self, ceiling: Real) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    pub fn apply(&self, series: &[Real]) -> Vec<Option<Real>> {
        series.iter().map(|&v| self.point(v)).collect()
    }

    pub fn point(&self, value: Real) -> Option<Real> {
        if self.hide_zeros && value == 0.0 {
            return None;
        }
        match self.ceiling {
            Some(limit) if value > limit => None,
            _ => Some(value),
        }
    }
}
