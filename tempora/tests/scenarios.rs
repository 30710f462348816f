// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The worked scenarios from the crate's design docs, reproduced verbatim as
//! integration tests against the public `RecurrentEventSet` API.

use chrono::NaiveDate;
use tempora::{Instant, Node, RecurrentEvent, RecurrentEventSet, Unit};

fn dt(y: i32, m: u32, d: u32) -> Instant {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
}

fn dt_h(y: i32, m: u32, d: u32, h: u32) -> Instant {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, 0, 0)
        .expect("valid hour")
}

fn leaf(start: i64, stop: i64, unit: Unit, recurrence: Option<Unit>) -> Node {
    Node::leaf(RecurrentEvent::new(start, stop, unit, recurrence).expect("valid leaf"))
}

/// Working-hours set: weekdays (Mon..Thu, half-open) intersected with hours
/// 10..19 of each day.
#[test]
fn working_hours_set_forward() {
    let set = RecurrentEventSet::new(Node::and(vec![
        leaf(1, 5, Unit::Day, Some(Unit::Week)),
        leaf(10, 19, Unit::Hour, Some(Unit::Day)),
    ]))
    .expect("AND root is an operator");

    let pairs: Vec<_> = set.forward(dt(2000, 1, 1), true).take(3).collect();
    assert_eq!(
        pairs,
        vec![
            (dt_h(2000, 1, 3, 10), dt_h(2000, 1, 3, 19)),
            (dt_h(2000, 1, 4, 10), dt_h(2000, 1, 4, 19)),
            (dt_h(2000, 1, 5, 10), dt_h(2000, 1, 5, 19)),
        ]
    );
}

/// Union of two day-of-month ranges with a gap between them.
#[test]
fn union_with_gap_forward() {
    let set = RecurrentEventSet::new(Node::or(vec![
        leaf(1, 16, Unit::Day, Some(Unit::Month)),
        leaf(20, 26, Unit::Day, Some(Unit::Month)),
    ]))
    .expect("OR root is an operator");

    let pairs: Vec<_> = set.forward(dt(2000, 1, 1), true).take(2).collect();
    assert_eq!(
        pairs,
        vec![
            (dt(2000, 1, 1), dt(2000, 1, 16)),
            (dt(2000, 1, 20), dt(2000, 1, 26)),
        ]
    );
}

/// An AND of a day-of-month range with the NOT of a narrower exception range.
#[test]
fn exception_via_not_forward() {
    let set = RecurrentEventSet::new(Node::and(vec![
        leaf(1, 26, Unit::Day, Some(Unit::Month)),
        Node::not(leaf(10, 15, Unit::Day, Some(Unit::Month))),
    ]))
    .expect("AND root is an operator");

    let pairs: Vec<_> = set.forward(dt(2000, 1, 1), true).take(2).collect();
    assert_eq!(
        pairs,
        vec![
            (dt(2000, 1, 1), dt(2000, 1, 10)),
            (dt(2000, 1, 15), dt(2000, 1, 26)),
        ]
    );
}
