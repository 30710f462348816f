// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! A library for describing recurring temporal event sets and answering
//! containment and forward-enumeration queries against them.
//!
//! A [`recurrent_event::RecurrentEvent`] is a range measured in one
//! [`unit::Unit`], optionally recurring every window of a coarser unit (`day
//! 1..25 of month`, `month 6..9 of year`). Events combine into a boolean
//! expression tree (AND/OR/NOT, see [`expression`]) wrapped by a
//! [`recurrent_event_set::RecurrentEventSet`], which is the crate's public
//! entry point for `contains`/`forward` queries. [`json`] is the wire
//! encoding used to persist and transmit a set.
//!
//! This crate never initializes logging itself — it only emits `tracing`
//! events for callers who've set up a subscriber, matching how binaries in
//! this workspace own that decision.

pub mod error;
pub mod expression;
pub mod instant;
pub mod json;
pub mod recurrent_event;
pub mod recurrent_event_set;
pub mod sparse_interval;
pub mod unit;

pub use error::{Error, Result};
pub use expression::Node;
pub use instant::Instant;
pub use recurrent_event::RecurrentEvent;
pub use recurrent_event_set::RecurrentEventSet;
pub use sparse_interval::SparseInterval;
pub use unit::Unit;
