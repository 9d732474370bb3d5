//! Line item values aligned to a ticker's period index.

use crate::observations::TickerObservations;
use crate::period::PeriodIndex;
use std::collections::HashMap;
use std::rc::Rc;

/// One optional value per period of a [`PeriodIndex`].
///
/// The series always has exactly one slot per index period; a quarter with no
/// report is an explicit `None`, never a missing slot or a zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    values: Vec<Option<f64>>,
}

impl AlignedSeries {
    /// Wrap values that are already aligned to an index.
    pub const fn from_values(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// A series of `len` absent values.
    pub fn absent(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    /// Align the rows of `line_item` to `index`.
    ///
    /// When a period is reported more than once the last row wins, even if
    /// its value is absent.
    pub fn resolve(index: &PeriodIndex, observations: &TickerObservations, line_item: &str) -> Self {
        let mut series = Self::absent(index.len());
        for (period, value) in observations.line_item(line_item) {
            if let Some(slot) = index
                .position(*period)
                .and_then(|pos| series.values.get_mut(pos))
            {
                *slot = *value;
            }
        }
        series
    }

    /// Number of periods.
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series covers no periods.
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at position `pos`.
    pub fn get(&self, pos: usize) -> Option<f64> {
        self.values.get(pos).copied().flatten()
    }

    /// All slots in index order.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// The last `n` slots, or `None` if the series is shorter than `n`.
    pub fn trailing(&self, n: usize) -> Option<&[Option<f64>]> {
        let start = self.values.len().checked_sub(n)?;
        self.values.get(start..)
    }

    /// Sum of the last `n` slots. `None` unless all of them are present.
    pub fn trailing_sum(&self, n: usize) -> Option<f64> {
        self.trailing(n)?.iter().copied().sum()
    }

    /// Most recent present value, scanning backward from the end.
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }

    /// Number of present values.
    pub fn present(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Resolves and caches aligned series for one ticker during a pass.
#[derive(Debug)]
pub struct SeriesResolver<'a> {
    index: PeriodIndex,
    observations: Option<&'a TickerObservations>,
    cache: HashMap<&'a str, Rc<AlignedSeries>>,
}

impl<'a> SeriesResolver<'a> {
    /// Create a resolver. A ticker with no rows gets an empty index.
    pub fn new(observations: Option<&'a TickerObservations>) -> Self {
        let index = observations
            .map(TickerObservations::period_index)
            .unwrap_or_default();
        Self {
            index,
            observations,
            cache: HashMap::new(),
        }
    }

    /// The ticker's shared period index.
    pub const fn index(&self) -> &PeriodIndex {
        &self.index
    }

    /// Aligned series for `line_item`, computed at most once per resolver.
    pub fn series(&mut self, line_item: &'a str) -> Rc<AlignedSeries> {
        if let Some(cached) = self.cache.get(line_item) {
            return Rc::clone(cached);
        }

        let series = Rc::new(match self.observations {
            Some(obs) => AlignedSeries::resolve(&self.index, obs, line_item),
            None => AlignedSeries::default(),
        });
        self.cache.insert(line_item, Rc::clone(&series));
        series
    }

    /// Number of distinct line items resolved so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
