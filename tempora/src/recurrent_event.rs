// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A single range-in-unit, optionally recurring in a coarser unit.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::instant::{self, Instant};
use crate::unit::Unit;

/// One `(start, stop)` range measured in `unit`, recurring every
/// `recurrence` window (or never recurring, when `recurrence` is `None`).
///
/// `start`/`stop` are positions within a recurrence window, in the
/// one-based-or-zero-based convention fixed by [`Unit::base`]. `start` may
/// equal `stop`, denoting an event that is never contained and never
/// produces anything from [`RecurrentEvent::forward`]; `start` must not
/// exceed `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrentEvent {
    pub start: i64,
    pub stop: i64,
    pub unit: Unit,
    pub recurrence: Option<Unit>,
}

impl RecurrentEvent {
    /// Builds a `RecurrentEvent`, failing if `start > stop` or if
    /// `recurrence` is not strictly coarser than `unit`.
    pub fn new(start: i64, stop: i64, unit: Unit, recurrence: Option<Unit>) -> Result<Self> {
        if start > stop {
            return Err(Error::structural(format!(
                "start ({start}) must not exceed stop ({stop})"
            )));
        }
        if let Some(recurrence) = recurrence {
            if unit >= recurrence {
                return Err(Error::structural(format!(
                    "\"{unit} of {recurrence}\" is not a valid recurrence: \
                     {unit} is not coarser than {recurrence}"
                )));
            }
        }
        Ok(Self {
            start,
            stop,
            unit,
            recurrence,
        })
    }

    fn position(&self, t: Instant) -> i64 {
        let anchor = match self.recurrence {
            Some(recurrence) => crate::instant::floor(t, recurrence),
            None => instant::min(),
        };
        crate::instant::delta(anchor, crate::instant::floor(t, self.unit), self.unit)
            + self.unit.base()
    }

    /// Tests whether the instant `t` lies inside this event.
    #[must_use]
    pub fn contains(&self, t: Instant) -> bool {
        if self.start >= self.stop {
            return false;
        }
        let p = self.position(t);
        self.start <= p && p < self.stop
    }

    /// Tests whether the closed interval `[lo, hi]` lies entirely inside
    /// this event and within a single recurrence window.
    #[must_use]
    pub fn contains_interval(&self, lo: Instant, hi: Instant) -> bool {
        if self.start >= self.stop || lo > hi {
            return false;
        }
        let p_lo = self.position(lo);
        let p_hi = self.position(hi);
        let in_range = |p: i64| self.start <= p && p < self.stop;
        if !in_range(p_lo) || !in_range(p_hi) {
            return false;
        }
        match self.recurrence {
            Some(recurrence) => {
                crate::instant::floor(lo, recurrence) == crate::instant::floor(hi, recurrence)
            }
            None => true,
        }
    }

    /// Produces the forward sequence of closed-open pairs during which this
    /// event is "on", starting no earlier than `start`.
    ///
    /// When `trim` is true, a pair straddling `start` is clipped to begin at
    /// `start`; when false, the untrimmed window is still yielded in full
    /// provided any part of it is still ahead of `start`.
    #[must_use]
    pub fn forward(&self, start: Instant, trim: bool) -> Forward {
        let state = if self.start >= self.stop {
            State::Empty
        } else {
            match self.recurrence {
                None => State::NonRecurring { emitted: false },
                Some(recurrence) => State::Recurring {
                    anchor: Some(crate::instant::floor(start, recurrence)),
                    first_iteration: true,
                },
            }
        };
        Forward {
            event: *self,
            trim,
            start,
            state,
        }
    }
}

/// The exact number of `unit` positions inside every window of `recurrence`,
/// or `None` when that count varies by which window it happens to be (days
/// in a month, weeks in a year, ...). The gapless shortcut in
/// [`Forward::next`] only ever fires for pairs where this is constant: a
/// single fully-covered window never licenses assuming every later window is
/// fully covered too unless the window's span can't change.
const fn units_per_window(unit: Unit, recurrence: Unit) -> Option<i64> {
    use Unit::{Day, Hour, Minute, Month, Second, Week, Year};
    match (unit, recurrence) {
        (Second, Minute) => Some(60),
        (Second, Hour) => Some(3_600),
        (Second, Day) => Some(86_400),
        (Second, Week) => Some(604_800),
        (Minute, Hour) => Some(60),
        (Minute, Day) => Some(1_440),
        (Minute, Week) => Some(10_080),
        (Hour, Day) => Some(24),
        (Hour, Week) => Some(168),
        (Day, Week) => Some(7),
        (Month, Year) => Some(12),
        _ => None,
    }
}

enum State {
    /// `start == stop`: this event is never true, so `forward` never yields.
    Empty,
    NonRecurring {
        emitted: bool,
    },
    Recurring {
        anchor: Option<Instant>,
        first_iteration: bool,
    },
}

/// Lazy forward iterator over a [`RecurrentEvent`]'s occurrences.
///
/// Finite (at most one pair) for non-recurring events; otherwise infinite
/// until clamping would push past [`instant::MAX`].
pub struct Forward {
    event: RecurrentEvent,
    trim: bool,
    start: Instant,
    state: State,
}

impl Iterator for Forward {
    type Item = (Instant, Instant);

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.event;
        let unit = event.unit;
        let base = unit.base();

        match &mut self.state {
            State::Empty => None,
            State::NonRecurring { emitted } => {
                if *emitted {
                    return None;
                }
                *emitted = true;

                let first = crate::instant::floor(
                    crate::instant::add(instant::min(), event.start - base, unit).ok()?,
                    unit,
                );
                let second = crate::instant::floor(
                    crate::instant::add(instant::min(), event.stop - base, unit).ok()?,
                    unit,
                );

                if self.start >= second {
                    return None;
                }
                let first = if self.trim && self.start > first {
                    self.start
                } else {
                    first
                };
                Some((first, second))
            }
            State::Recurring {
                anchor,
                first_iteration,
            } => {
                let recurrence = event.recurrence?;
                let mut cur = (*anchor)?;

                loop {
                    let next_anchor = match crate::instant::add(cur, 1, recurrence) {
                        Ok(v) => v,
                        Err(_) => {
                            trace!(?cur, "recurrence anchor exhausted the instant range");
                            *anchor = None;
                            return None;
                        }
                    };
                    let window_end = crate::instant::floor(next_anchor, recurrence);

                    let mut first = match crate::instant::add(cur, event.start - base, unit) {
                        Ok(v) => crate::instant::floor(v, unit),
                        Err(_) => {
                            *anchor = None;
                            return None;
                        }
                    };
                    let mut second = match crate::instant::add(cur, event.stop - base, unit) {
                        Ok(v) => crate::instant::floor(v, unit),
                        Err(_) => {
                            *anchor = None;
                            return None;
                        }
                    };

                    // Week boundaries aren't aligned to month boundaries (or
                    // any coarser unit), so flooring by week can land earlier
                    // than the window's own anchor.
                    if first < cur {
                        first = cur;
                    }
                    first = first.min(window_end);
                    second = second.min(window_end);

                    if *first_iteration {
                        if self.start > first {
                            if self.trim {
                                first = self.start;
                            } else if first < cur {
                                first = cur;
                            }
                        }
                        *first_iteration = false;
                    }

                    // The shortcut only applies when every window of this
                    // `(unit, recurrence)` pair has the same span (60 seconds
                    // to a minute, 24 hours to a day, ...). Calendar-variable
                    // pairs (days in a month, weeks in a year, ...) have no
                    // such constant: this window being fully covered says
                    // nothing about the next one, so `units_per_window`
                    // returns `None` and the shortcut never fires for them,
                    // falling through to the ordinary clamped pair below.
                    if event.start - base == 0
                        && units_per_window(unit, recurrence) == Some(event.stop - base)
                    {
                        *anchor = None;
                        return Some((first, instant::max()));
                    }

                    if first < second {
                        *anchor = Some(next_anchor);
                        return Some((first, second));
                    }

                    trace!(?cur, ?window_end, "window clamped to nothing, advancing");
                    cur = next_anchor;
                }
            }
        }
    }
}
