// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An ordered, disjoint set of half-open instant ranges.

use crate::instant::Instant;

/// A normalized set of non-overlapping, non-touching, half-open
/// `[start, stop)` ranges, kept sorted by `start`.
///
/// "Normalized" means: no two ranges overlap or touch (adjacent ranges are
/// always merged), every range has `start < stop`, and the ranges are sorted.
/// All constructors and combinators preserve this invariant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseInterval {
    ranges: Vec<(Instant, Instant)>,
}

impl SparseInterval {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Builds a `SparseInterval` from arbitrary (possibly overlapping,
    /// touching, unsorted) ranges, normalizing them.
    #[must_use]
    pub fn new(mut ranges: Vec<(Instant, Instant)>) -> Self {
        ranges.retain(|(start, stop)| start < stop);
        ranges.sort_by_key(|&(start, _)| start);

        let mut merged: Vec<(Instant, Instant)> = Vec::with_capacity(ranges.len());
        for (start, stop) in ranges {
            if let Some(last) = merged.last_mut() {
                if start <= last.1 {
                    last.1 = last.1.max(stop);
                    continue;
                }
            }
            merged.push((start, stop));
        }
        Self { ranges: merged }
    }

    /// A set containing exactly one range.
    #[must_use]
    pub fn single(start: Instant, stop: Instant) -> Self {
        Self::new(vec![(start, stop)])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The normalized ranges, in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[(Instant, Instant)] {
        &self.ranges
    }

    #[must_use]
    pub fn contains(&self, t: Instant) -> bool {
        self.ranges
            .binary_search_by(|&(start, stop)| {
                if t < start {
                    std::cmp::Ordering::Greater
                } else if t >= stop {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// The set union of `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut all = self.ranges.clone();
        all.extend_from_slice(&other.ranges);
        Self::new(all)
    }

    /// The set intersection of `self` and `other`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a_start, a_stop) = self.ranges[i];
            let (b_start, b_stop) = other.ranges[j];
            let start = a_start.max(b_start);
            let stop = a_stop.min(b_stop);
            if start < stop {
                out.push((start, stop));
            }
            if a_stop < b_stop {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { ranges: out }
    }

    /// `self` with every range in `other` removed.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for &(mut start, stop) in &self.ranges {
            for &(b_start, b_stop) in &other.ranges {
                if b_stop <= start || b_start >= stop {
                    continue;
                }
                if b_start > start {
                    out.push((start, b_start));
                }
                start = start.max(b_stop);
                if start >= stop {
                    break;
                }
            }
            if start < stop {
                out.push((start, stop));
            }
        }
        Self { ranges: out }
    }

    /// The complement of `self` within `[lo, hi)`.
    #[must_use]
    pub fn complement_within(&self, lo: Instant, hi: Instant) -> Self {
        Self::single(lo, hi).difference(self)
    }

    /// `self` with everything entirely outside `[lo, hi]` discarded, clipping
    /// any range straddling either bound rather than dropping it outright.
    /// Either bound may be omitted to leave that side unconstrained.
    #[must_use]
    pub fn trim(&self, lo: Option<Instant>, hi: Option<Instant>) -> Self {
        let mut out = Vec::with_capacity(self.ranges.len());
        for &(mut start, mut stop) in &self.ranges {
            if let Some(lo) = lo {
                if stop <= lo {
                    continue;
                }
                start = start.max(lo);
            }
            if let Some(hi) = hi {
                if start >= hi {
                    continue;
                }
                stop = stop.min(hi);
            }
            if start < stop {
                out.push((start, stop));
            }
        }
        Self { ranges: out }
    }

    /// The earliest range, if any.
    #[must_use]
    pub fn first(&self) -> Option<(Instant, Instant)> {
        self.ranges.first().copied()
    }
}
