//! Month-granularity calendar arithmetic for deployment schedules.

/// Lifetime assigned to reactors without a known shutdown date (60 years).
pub const DEFAULT_LIFETIME_MONTHS: u32 = 720;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("not a yyyymmdd date: {0}")]
    Invalid(u32),

    #[error("shutdown {end} precedes first criticality {start}")]
    Reversed { start: u32, end: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse `yyyymmdd`, rounding to the nearest month start: a day after the
    /// 16th counts as the following month.
    pub fn from_yyyymmdd(date: u32) -> Result<Self, DateError> {
        let year = (date / 10_000) as i32;
        let month = (date / 100) % 100;
        let day = date % 100;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(DateError::Invalid(date));
        }
        let ym = Self { year, month };
        Ok(if day > 16 { ym.next() } else { ym })
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whole months from `self` to `later` (negative if `later` is earlier).
    pub fn months_until(self, later: YearMonth) -> i64 {
        (i64::from(later.year) - i64::from(self.year)) * 12
            + (i64::from(later.month) - i64::from(self.month))
    }
}

/// Operating lifetime in months between first criticality and shutdown.
pub fn prototype_lifetime(start: u32, end: Option<u32>) -> Result<u32, DateError> {
    let Some(end) = end else {
        return Ok(DEFAULT_LIFETIME_MONTHS);
    };
    let months = YearMonth::from_yyyymmdd(start)?.months_until(YearMonth::from_yyyymmdd(end)?);
    u32::try_from(months).map_err(|_| DateError::Reversed { start, end })
}

/// Timestep at which a reactor critical on `start` enters a simulation
/// beginning at `sim_start`. Negative for reactors older than the simulation.
pub fn entry_time(sim_start: YearMonth, start: u32) -> Result<i64, DateError> {
    Ok(sim_start.months_until(YearMonth::from_yyyymmdd(start)?))
}
