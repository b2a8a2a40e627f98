//! Running statistic kinds and their merge rules.
//!
//! Two kinds exist:
//! - [`NumericStatistic`]: average/max/min of a sampled metric. It keeps no
//!   sample count, so merging takes the midpoint of the two averages.
//! - [`BooleanStatistic`]: a count-weighted fraction of `true` observations.
//!   This is the only kind with a real sample count and it drives every
//!   win-rate comparison.

use serde::{Deserialize, Serialize};

/// Running aggregate of one numeric metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistic {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl NumericStatistic {
    /// Wrap a single observation.
    ///
    /// Zero and non-finite observations are "no data" and yield `None`, so a
    /// metric that is legitimately zero is indistinguishable from a missing one.
    pub fn new(value: f64) -> Option<Self> {
        if value == 0.0 || !value.is_finite() {
            return None;
        }
        Some(Self {
            average: value,
            max: value,
            min: value,
        })
    }

    /// Merge two optional statistics.
    ///
    /// The average is the midpoint of both sides, not a weighted mean, which
    /// makes repeated merging sensitive to grouping. Absence is the identity.
    pub fn merge(a: Option<&Self>, b: Option<&Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Self {
                average: (a.average + b.average) / 2.0,
                max: if a.max > b.max { a.max } else { b.max },
                min: if a.min > b.min { b.min } else { a.min },
            }),
            (Some(only), None) | (None, Some(only)) => Some(*only),
            (None, None) => None,
        }
    }
}

/// Running weighted fraction of `true` observations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BooleanStatistic {
    pub count: u32,
    pub percent: f64,
}

impl BooleanStatistic {
    /// Wrap a single observation.
    pub fn new(value: bool) -> Self {
        Self {
            count: 1,
            percent: if value { 1.0 } else { 0.0 },
        }
    }

    /// Build from an existing rate and sample size.
    pub fn with_count(percent: f64, count: u32) -> Self {
        Self { count, percent }
    }

    /// Count-weighted merge; commutative and associative.
    pub fn merge(&self, other: &Self) -> Self {
        let count = self.count + other.count;
        if count == 0 {
            return Self::default();
        }
        Self {
            count,
            percent: (self.percent * f64::from(self.count) + other.percent * f64::from(other.count))
                / f64::from(count),
        }
    }
}

impl std::iter::Sum for BooleanStatistic {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc.merge(&s))
    }
}

/// Merge rule shared by every statistic field of a player record.
pub trait Merge {
    fn merge_with(&self, other: &Self) -> Self;
}

impl Merge for BooleanStatistic {
    fn merge_with(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Merge for Option<NumericStatistic> {
    fn merge_with(&self, other: &Self) -> Self {
        NumericStatistic::merge(self.as_ref(), other.as_ref())
    }
}
