// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A boolean combination of [`RecurrentEvent`]s, queryable for containment
//! and forward enumeration.

use std::cell::Cell;

use tracing::trace;

use crate::error::{Error, Result};
use crate::expression::{self, Node};
use crate::instant::{self, Instant};
use crate::recurrent_event::{Forward as LeafForward, RecurrentEvent};
use crate::sparse_interval::SparseInterval;

/// A temporal expression with a validated root: always an `And`/`Or`/`Not`
/// node, never a bare leaf, so that every set is itself a composable
/// boolean expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrentEventSet {
    root: Node,
}

impl RecurrentEventSet {
    /// Wraps `root`, failing if it is a bare leaf.
    pub fn new(root: Node) -> Result<Self> {
        if !root.is_operator() {
            return Err(Error::structural(
                "a RecurrentEventSet's root must be AND/OR/NOT, not a bare leaf",
            ));
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Tests whether `t` satisfies the expression.
    #[must_use]
    pub fn contains(&self, t: Instant) -> bool {
        expression::walk(
            &self.root,
            &mut |event| Some(event.contains(t)),
            &mut |args: Vec<bool>| Some(args.into_iter().all(|v| v)),
            &mut |args: Vec<bool>| Some(args.into_iter().any(|v| v)),
            &mut |arg: Option<bool>| Some(!arg.unwrap_or(false)),
        )
        .unwrap_or(false)
    }

    /// Tests whether the closed interval `[lo, hi]` lies entirely within a
    /// single satisfying run of the expression.
    #[must_use]
    pub fn contains_interval(&self, lo: Instant, hi: Instant) -> bool {
        expression::walk(
            &self.root,
            &mut |event| Some(event.contains_interval(lo, hi)),
            &mut |args: Vec<bool>| Some(args.into_iter().all(|v| v)),
            &mut |args: Vec<bool>| Some(args.into_iter().any(|v| v)),
            &mut |arg: Option<bool>| Some(!arg.unwrap_or(false)),
        )
        .unwrap_or(false)
    }

    /// Produces the forward sequence of maximal disjoint runs, starting no
    /// earlier than `start`, during which the expression holds.
    #[must_use]
    pub fn forward(&self, start: Instant, trim: bool) -> Forward<'_> {
        self.forward_with_compaction(start, trim, true)
    }

    /// As [`RecurrentEventSet::forward`], but with per-leaf accumulator
    /// compaction (§5's permitted, behaviorally-neutral optimization) either
    /// enabled or disabled. `forward` always compacts; `compact = false`
    /// exists so tests can compare a compacting run against a non-compacting
    /// one and confirm they produce identical output.
    #[must_use]
    fn forward_with_compaction(&self, start: Instant, trim: bool, compact: bool) -> Forward<'_> {
        let leaves: Vec<LeafState> = self
            .root
            .leaves()
            .into_iter()
            .map(|event| LeafState {
                gen: event.forward(start, trim),
                acc: SparseInterval::empty(),
                known_until: start,
                exhausted: false,
            })
            .collect();

        Forward {
            root: &self.root,
            start,
            leaves,
            cursor: start,
            queue: std::collections::VecDeque::new(),
            done: false,
            compact,
        }
    }
}

struct LeafState {
    gen: LeafForward,
    acc: SparseInterval,
    known_until: Instant,
    exhausted: bool,
}

impl LeafState {
    fn advance(&mut self) {
        match self.gen.next() {
            Some((a, b)) => {
                self.acc = self.acc.union(&SparseInterval::single(a, b));
                self.known_until = b;
                if b >= instant::max() {
                    self.exhausted = true;
                }
            }
            None => self.exhausted = true,
        }
    }

    fn known_until_or_max(&self) -> Instant {
        if self.exhausted {
            instant::max()
        } else {
            self.known_until
        }
    }
}

/// Lazy forward iterator over a [`RecurrentEventSet`]'s satisfying runs.
pub struct Forward<'a> {
    root: &'a Node,
    start: Instant,
    leaves: Vec<LeafState>,
    cursor: Instant,
    queue: std::collections::VecDeque<(Instant, Instant)>,
    done: bool,
    /// Whether each leaf's `acc` is trimmed to `cursor` after every emission
    /// round. Purely a memory optimization (§5); disabled only by the
    /// `forward_with_compaction` test helper to verify it has no effect on
    /// observable output.
    compact: bool,
}

impl Forward<'_> {
    fn evaluate(&self, bound: Instant) -> SparseInterval {
        let idx = Cell::new(0usize);
        expression::walk(
            self.root,
            &mut |_event| {
                let i = idx.get();
                idx.set(i + 1);
                Some(self.leaves[i].acc.clone())
            },
            &mut |args: Vec<SparseInterval>| {
                Some(
                    args.into_iter()
                        .reduce(|a, b| a.intersection(&b))
                        .unwrap_or_else(SparseInterval::empty),
                )
            },
            &mut |args: Vec<SparseInterval>| {
                Some(
                    args.into_iter()
                        .reduce(|a, b| a.union(&b))
                        .unwrap_or_else(SparseInterval::empty),
                )
            },
            &mut |arg: Option<SparseInterval>| {
                Some(
                    arg.unwrap_or_else(SparseInterval::empty)
                        .complement_within(self.start, bound),
                )
            },
        )
        .unwrap_or_else(SparseInterval::empty)
    }

    fn refill(&mut self) {
        while self.queue.is_empty() && !self.done {
            let min_known = self
                .leaves
                .iter()
                .map(LeafState::known_until_or_max)
                .min()
                .unwrap_or_else(instant::max);

            if min_known < instant::max() {
                let advance_idx = self
                    .leaves
                    .iter()
                    .enumerate()
                    .filter(|(_, leaf)| !leaf.exhausted && leaf.known_until == min_known)
                    .map(|(i, _)| i)
                    .next();
                if let Some(i) = advance_idx {
                    self.leaves[i].advance();
                }
            }

            let bound = self
                .leaves
                .iter()
                .map(LeafState::known_until_or_max)
                .min()
                .unwrap_or_else(instant::max);
            let final_round = bound >= instant::max();

            let evaluated = self.evaluate(bound);
            trace!(?bound, final_round, "reevaluated recurrent event set");

            for &(a, b) in evaluated.ranges() {
                if b < self.cursor {
                    continue;
                }
                if final_round || b < bound {
                    let a = a.max(self.cursor);
                    if a < b {
                        self.queue.push_back((a, b));
                    }
                    self.cursor = b;
                }
            }

            if self.compact {
                for leaf in &mut self.leaves {
                    leaf.acc = leaf.acc.trim(Some(self.cursor), None);
                }
            }

            if final_round {
                self.done = true;
            }
        }
    }
}

impl Iterator for Forward<'_> {
    type Item = (Instant, Instant);

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.is_empty() {
            self.refill();
        }
        self.queue.pop_front()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::unit::Unit;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32) -> Instant {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn month_of_year(start: i64, stop: i64) -> Node {
        Node::leaf(RecurrentEvent::new(start, stop, Unit::Month, Some(Unit::Year)).unwrap())
    }

    fn day_of_month(start: i64, stop: i64) -> Node {
        Node::leaf(RecurrentEvent::new(start, stop, Unit::Day, Some(Unit::Month)).unwrap())
    }

    #[test]
    fn root_must_be_an_operator() {
        let leaf = month_of_year(1, 2);
        assert!(RecurrentEventSet::new(leaf).is_err());
    }

    #[test]
    fn contains_combines_and_or_not() {
        let set = RecurrentEventSet::new(Node::and(vec![
            month_of_year(6, 9),
            Node::not(month_of_year(7, 8)),
        ]))
        .unwrap();
        assert!(set.contains(dt(2000, 6, 15)));
        assert!(!set.contains(dt(2000, 7, 15)));
        assert!(set.contains(dt(2000, 8, 15)));
        assert!(!set.contains(dt(2000, 10, 15)));
    }

    #[test]
    fn forward_of_or_merges_overlapping_leaves() {
        let set = RecurrentEventSet::new(Node::or(vec![
            day_of_month(1, 10),
            day_of_month(5, 15),
        ]))
        .unwrap();
        let first = set.forward(dt(2000, 1, 1), true).next().unwrap();
        assert_eq!(first, (dt(2000, 1, 1), dt(2000, 1, 15)));
    }

    #[test]
    fn forward_of_and_intersects_leaves() {
        let set =
            RecurrentEventSet::new(Node::and(vec![day_of_month(1, 20), day_of_month(10, 30)]))
                .unwrap();
        let first = set.forward(dt(2000, 1, 1), true).next().unwrap();
        assert_eq!(first, (dt(2000, 1, 10), dt(2000, 1, 20)));
    }

    #[test]
    fn forward_never_precedes_start_and_stays_disjoint() {
        let set = RecurrentEventSet::new(Node::or(vec![
            day_of_month(1, 5),
            day_of_month(20, 25),
        ]))
        .unwrap();
        let start = dt(2000, 3, 10);
        let pairs: Vec<_> = set.forward(start, true).take(10).collect();
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].0);
        }
        assert!(pairs[0].0 >= start);
    }

    #[test]
    fn not_of_a_never_true_leaf_yields_a_single_unbounded_run() {
        // start == stop is always false, so its complement is always true.
        let always_false =
            RecurrentEvent::new(5, 5, Unit::Day, Some(Unit::Month)).unwrap();
        let set = RecurrentEventSet::new(Node::not(Node::leaf(always_false))).unwrap();
        let mut fwd = set.forward(dt(2000, 1, 1), true);
        assert_eq!(fwd.next(), Some((dt(2000, 1, 1), instant::max())));
        assert_eq!(fwd.next(), None);
    }

    #[test]
    fn leaves_returns_every_leaf_in_the_tree() {
        let set = RecurrentEventSet::new(Node::and(vec![day_of_month(1, 5), day_of_month(10, 15)]))
            .unwrap();
        assert_eq!(set.root().leaves().len(), 2);
    }

    #[test]
    fn compaction_does_not_change_observable_output() {
        // An OR with an AND/NOT exception carved out of it, so per-leaf `acc`
        // accumulates several sub-intervals before any pair is emitted.
        let set = RecurrentEventSet::new(Node::or(vec![
            Node::and(vec![
                day_of_month(1, 26),
                Node::not(day_of_month(10, 15)),
            ])
            .unwrap(),
            day_of_month(27, 30),
        ]))
        .unwrap();
        let start = dt(2000, 1, 1);

        let compacting: Vec<_> = set.forward_with_compaction(start, true, true).take(20).collect();
        let non_compacting: Vec<_> = set
            .forward_with_compaction(start, true, false)
            .take(20)
            .collect();

        assert!(!compacting.is_empty());
        assert_eq!(compacting, non_compacting);
    }
}
