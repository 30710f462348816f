// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A unit of time a [`crate::recurrent_event::RecurrentEvent`] range is
/// expressed in, or recurs by.
///
/// Declaration order is significant: it *is* the granularity order
/// `second < minute < hour < day < week < month < year`, relied on by
/// `PartialOrd`/`Ord` wherever a recurrence must be coarser than the unit it
/// recurs a range in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// The additive correction that maps a zero-based unit count to the
    /// "position" convention `RecurrentEvent` measures ranges in.
    ///
    /// `second`/`minute`/`hour` are zero-based; `day`/`week`/`month`/`year`
    /// are one-based.
    #[must_use]
    pub const fn base(self) -> i64 {
        match self {
            Self::Second | Self::Minute | Self::Hour => 0,
            Self::Day | Self::Week | Self::Month | Self::Year => 1,
        }
    }

    /// Canonical lowercase wire name, as used by the JSON codec.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parses a wire name back into a `Unit`.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "second" => Some(Self::Second),
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
