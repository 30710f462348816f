// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The boolean-algebra tree over [`RecurrentEvent`] leaves, and the
//! iterative walker that evaluates it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recurrent_event::RecurrentEvent;

/// A node in a temporal expression tree.
///
/// This derives `Serialize`/`Deserialize` for an internal, struct-shaped
/// representation (tagged enum variants) used by cache/debug paths; it is
/// distinct from the canonical tagged-array wire grammar `json` produces and
/// parses, which has shape constraints (arity, leaf-vs-node disambiguation)
/// this derive can't express on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Leaf(RecurrentEvent),
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
}

impl Node {
    /// Builds an `And` node, failing if given no operands.
    pub fn and(nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::structural("AND requires at least one operand"));
        }
        Ok(Self::And(nodes))
    }

    /// Builds an `Or` node, failing if given no operands.
    pub fn or(nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::structural("OR requires at least one operand"));
        }
        Ok(Self::Or(nodes))
    }

    /// Builds a `Not` node.
    #[must_use]
    pub fn not(node: Node) -> Self {
        Self::Not(Box::new(node))
    }

    #[must_use]
    pub fn leaf(event: RecurrentEvent) -> Self {
        Self::Leaf(event)
    }

    /// Whether this node is an operator (`And`/`Or`/`Not`) rather than a bare leaf.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        !matches!(self, Self::Leaf(_))
    }

    /// All leaves in this subtree, in left-to-right order (duplicates kept).
    pub fn leaves(&self) -> Vec<&RecurrentEvent> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a Node, out: &mut Vec<&'a RecurrentEvent>) {
    match node {
        Node::Leaf(event) => out.push(event),
        Node::And(children) | Node::Or(children) => {
            for child in children {
                collect_leaves(child, out);
            }
        }
        Node::Not(child) => collect_leaves(child, out),
    }
}

/// The operator a non-leaf node applies once its children have been
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
    Not,
}

enum Task<'a> {
    Expand(&'a Node),
    Reduce(Op, usize),
}

/// Evaluates `root` bottom-up without recursion, mapping each leaf with
/// `leaf_fn` and reducing each operator with the matching closure in `ops`.
///
/// A leaf mapping to `None` ("void") is dropped from its parent's argument
/// list rather than passed through: this lets callers short-circuit
/// evaluation for leaves that cannot contribute, without special-casing it at
/// every call site. If an `And`/`Or` ends up with zero surviving arguments,
/// the reducer still runs on an empty slice; reducers that cannot sensibly
/// handle that should return `None`.
#[allow(clippy::expect_used)]
pub fn walk<T>(
    root: &Node,
    leaf_fn: &mut impl FnMut(&RecurrentEvent) -> Option<T>,
    and_fn: &mut impl FnMut(Vec<T>) -> Option<T>,
    or_fn: &mut impl FnMut(Vec<T>) -> Option<T>,
    not_fn: &mut impl FnMut(Option<T>) -> Option<T>,
) -> Option<T> {
    let mut tasks: Vec<Task> = vec![Task::Expand(root)];
    let mut values: Vec<Option<T>> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Expand(Node::Leaf(event)) => values.push(leaf_fn(event)),
            Task::Expand(Node::And(children)) => {
                tasks.push(Task::Reduce(Op::And, children.len()));
                for child in children.iter().rev() {
                    tasks.push(Task::Expand(child));
                }
            }
            Task::Expand(Node::Or(children)) => {
                tasks.push(Task::Reduce(Op::Or, children.len()));
                for child in children.iter().rev() {
                    tasks.push(Task::Expand(child));
                }
            }
            Task::Expand(Node::Not(child)) => {
                tasks.push(Task::Reduce(Op::Not, 1));
                tasks.push(Task::Expand(child));
            }
            Task::Reduce(Op::Not, n) => {
                debug_assert_eq!(n, 1);
                let arg = values.pop().expect("Not always pushes exactly one value");
                values.push(not_fn(arg));
            }
            Task::Reduce(op, n) => {
                let split_at = values.len() - n;
                let args: Vec<T> = values.split_off(split_at).into_iter().flatten().collect();
                let result = match op {
                    Op::And => and_fn(args),
                    Op::Or => or_fn(args),
                    Op::Not => unreachable!("Not is handled above"),
                };
                values.push(result);
            }
        }
    }

    values
        .pop()
        .expect("the walk always produces exactly one root value")
}
