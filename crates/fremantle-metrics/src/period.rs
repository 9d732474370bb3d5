//! Quarterly calendar and per-ticker period index.
//!
//! A [`QuarterPeriod`] maps to the ordinal `year * 4 + (quarter - 1)`, so
//! stepping forward or backward a quarter is plain integer arithmetic and
//! year boundaries need no special case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Quarters per fiscal year.
pub const QUARTERS_PER_YEAR: i64 = 4;

/// Fiscal years accepted as real reporting periods. Rows outside this window
/// are malformed and never reach a period index, which keeps every index
/// bounded in size.
pub const FISCAL_YEARS: RangeInclusive<i32> = 1900..=2200;

/// A fiscal `(year, quarter)` pair, ordered by year then quarter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct QuarterPeriod {
    year: i32,
    quarter: u8,
}

impl QuarterPeriod {
    /// Build a period, returning `None` unless `quarter` is in `1..=4` and
    /// `year` is in [`FISCAL_YEARS`].
    pub fn new(year: i32, quarter: i32) -> Option<Self> {
        if !FISCAL_YEARS.contains(&year) {
            return None;
        }
        let quarter = u8::try_from(quarter).ok().filter(|q| (1..=4).contains(q))?;
        Some(Self { year, quarter })
    }

    /// Build a period from an optional quarter as stored on a statement row.
    pub fn from_parts(year: i32, quarter: Option<i32>) -> Option<Self> {
        quarter.and_then(|q| Self::new(year, q))
    }

    /// Fiscal year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Fiscal quarter, 1 to 4.
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Position on the quarterly calendar.
    pub const fn ordinal(&self) -> i64 {
        self.year as i64 * QUARTERS_PER_YEAR + (self.quarter as i64 - 1)
    }

    /// Inverse of [`Self::ordinal`]. `None` outside [`FISCAL_YEARS`].
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        let year = i32::try_from(ordinal.div_euclid(QUARTERS_PER_YEAR))
            .ok()
            .filter(|y| FISCAL_YEARS.contains(y))?;
        let quarter = ordinal.rem_euclid(QUARTERS_PER_YEAR) as u8 + 1;
        Some(Self { year, quarter })
    }

    /// The period `quarters` steps away (negative steps go back in time).
    pub fn offset(&self, quarters: i64) -> Option<Self> {
        Self::from_ordinal(self.ordinal().checked_add(quarters)?)
    }

    /// The following quarter.
    pub fn next(&self) -> Option<Self> {
        self.offset(1)
    }
}

impl fmt::Display for QuarterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

/// Gap-free ordered run of quarters from a ticker's earliest to latest
/// observed period.
///
/// Every line item of a ticker is aligned to the same index, so "four
/// quarters back" means four positions back here rather than four stored
/// rows back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodIndex {
    periods: Vec<QuarterPeriod>,
}

impl PeriodIndex {
    /// An index with no periods.
    pub const fn empty() -> Self {
        Self {
            periods: Vec::new(),
        }
    }

    /// Build the index spanning the minimum to maximum of `periods`.
    pub fn from_periods<I>(periods: I) -> Self
    where
        I: IntoIterator<Item = QuarterPeriod>,
    {
        let bounds = periods
            .into_iter()
            .fold(None, |acc: Option<(QuarterPeriod, QuarterPeriod)>, p| {
                Some(match acc {
                    None => (p, p),
                    Some((lo, hi)) => (lo.min(p), hi.max(p)),
                })
            });

        match bounds {
            Some((start, end)) => Self::spanning(start, end),
            None => Self::empty(),
        }
    }

    /// Every quarter from `start` to `end` inclusive. Empty if `start > end`.
    pub fn spanning(start: QuarterPeriod, end: QuarterPeriod) -> Self {
        let periods = (start.ordinal()..=end.ordinal())
            .filter_map(QuarterPeriod::from_ordinal)
            .collect();
        Self { periods }
    }

    /// Number of periods.
    pub const fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the index has no periods.
    pub const fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Periods in ascending order.
    pub fn periods(&self) -> &[QuarterPeriod] {
        &self.periods
    }

    /// Earliest period.
    pub fn first(&self) -> Option<QuarterPeriod> {
        self.periods.first().copied()
    }

    /// Latest period.
    pub fn last(&self) -> Option<QuarterPeriod> {
        self.periods.last().copied()
    }

    /// Position of `period` in the index.
    pub fn position(&self, period: QuarterPeriod) -> Option<usize> {
        let start = self.first()?;
        let offset = usize::try_from(period.ordinal() - start.ordinal()).ok()?;
        (offset < self.len()).then_some(offset)
    }
}
