// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Transformation (spec.md §4.6): given two concurrent operations `A` and `B`
//! defined against the same document, produce `A' = transform(A, B, side)`
//! such that `apply(B, d)` followed by `A'` reaches the same document as
//! `apply(A, d)` followed by `transform(B, A, side.flip())` (the TP1
//! convergence law).
//!
//! Unlike composition, `A` and `B` here are both indexed against the *same*
//! original document — so an `Insert` on either side is the one component
//! that does *not* share that coordinate space (it introduces content with no
//! original-document position at all) and always passes straight through
//! without being length-aligned against the other side. What remains
//! (`Retain`/`Delete` against `Retain`/`Delete`) genuinely shares that
//! coordinate space and is aligned by length exactly as in
//! [`compose`](crate::compose), splitting the longer side with
//! [`Component::split`].
//!
//! Grounded on `transform_through_operations` and its test
//! `ot_transform_does_what_we_think` in the teacher's `daemon/src/ot.rs`, and
//! on the side-aware tie-break in
//! `other_examples/69f7c7dd_glacyr-kyte__src-transform.rs.rs`.

use crate::component::{Component, Kind};
use crate::operation::Operation;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::trace;

/// Which concurrent operation this port is transforming: needed only to break
/// the tie when both operations insert at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The side `transform(B, A, ...)` must be called with to satisfy TP1
    /// alongside `transform(A, B, side)`.
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl Operation {
    /// Transforms `self` so it can be applied after `other` already has been.
    /// `side` breaks ties when both operations insert at the same position.
    pub fn transform(&self, other: &Operation, side: Side) -> Operation {
        let mut a: VecDeque<Component> = self.components().iter().cloned().collect();
        let mut b: VecDeque<Component> = other.components().iter().cloned().collect();
        let mut result = Operation::new();

        loop {
            let Some(head_a) = a.front() else {
                // A drained: the transform terminates here even if B still has
                // components left (spec.md's second open question — the
                // caller is responsible for composing a trailing retain if it
                // needs the result's length to match B's target length).
                break;
            };
            if head_a.is_no_op() {
                a.pop_front();
                continue;
            }

            let Some(head_b) = b.front() else {
                // B drained: emit the rest of A's tail in order.
                let component = a.pop_front().expect("checked Some above");
                trace!(?component, "transform: draining remainder of A");
                result.append(component);
                continue;
            };
            if head_b.is_no_op() {
                b.pop_front();
                continue;
            }

            if head_a.kind() == Kind::Insert && head_b.kind() == Kind::Insert {
                match side {
                    Side::Left => {
                        let component = a.pop_front().expect("checked Some above");
                        result.append(component);
                    }
                    Side::Right => {
                        let len = head_b.length();
                        b.pop_front();
                        result.append(Component::Retain(len));
                    }
                }
                continue;
            }
            if head_a.kind() == Kind::Insert {
                let component = a.pop_front().expect("checked Some above");
                result.append(component);
                continue;
            }
            if head_b.kind() == Kind::Insert {
                let len = head_b.length();
                b.pop_front();
                result.append(Component::Retain(len));
                continue;
            }

            // Remaining domain: A, B ∈ {Retain, Delete}, both indexing the
            // same original-document span.
            let head_a = a.pop_front().expect("checked Some above");
            let head_b = b.pop_front().expect("checked Some above");
            match head_a.compare(&head_b) {
                Ordering::Equal => emit_transform_cell(&mut result, head_a, head_b),
                Ordering::Less => {
                    let (b_prefix, b_rest) = head_b.split(head_a.length());
                    emit_transform_cell(&mut result, head_a, b_prefix);
                    b.push_front(b_rest);
                }
                Ordering::Greater => {
                    let (a_prefix, a_rest) = head_a.split(head_b.length());
                    emit_transform_cell(&mut result, a_prefix, head_b);
                    a.push_front(a_rest);
                }
            }
        }

        result.strip_trailing_retain()
    }
}

/// The four decision-table cells reachable once either side's inserts have
/// already passed through: `a` and `b` always have equal length here.
fn emit_transform_cell(result: &mut Operation, a: Component, b: Component) {
    match (a, b) {
        (Component::Retain(n), Component::Retain(_)) => result.append(Component::Retain(n)),
        (Component::Retain(_), Component::Delete(_)) => {
            // B deleted what A would have retained: nothing to retain anymore.
        }
        (Component::Delete(n), Component::Retain(_)) => result.append(Component::Delete(n)),
        (Component::Delete(_), Component::Delete(_)) => {
            // Both delete the same span: A' has nothing left to do here.
        }
        (a, b) => unreachable!(
            "transform only aligns Retain/Delete against Retain/Delete here, got {a:?}/{b:?}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::RawComponent;
    use pretty_assertions::assert_eq;

    fn raw(json: &str) -> Operation {
        let raw: Vec<RawComponent> = serde_json::from_str(json).unwrap();
        Operation::from_raw(raw)
    }

    #[test]
    fn scenario_6_left_insert_wins_the_tie() {
        let a = raw(r#"["AA"]"#);
        let b = raw(r#"["BB"]"#);
        assert_eq!(a.transform(&b, Side::Left), raw(r#"["AA"]"#));
    }

    #[test]
    fn scenario_7_right_insert_retains_past_the_other_sides_text() {
        let a = raw(r#"["AA"]"#);
        let b = raw(r#"["BB"]"#);
        assert_eq!(a.transform(&b, Side::Right), raw(r#"[2, "AA"]"#));
    }

    #[test]
    fn identity_modulo_trailing_retain() {
        let a = Operation::from_components(vec![
            Component::Retain(2),
            Component::Insert("x".to_string()),
            Component::Delete(1),
        ]);
        let empty = Operation::new();
        assert_eq!(a.transform(&empty, Side::Left), a);
    }

    #[test]
    fn transform_never_ends_with_a_trailing_retain() {
        let a = Operation::from_components(vec![Component::Retain(5)]);
        let b = Operation::from_components(vec![Component::Retain(5)]);
        let transformed = a.transform(&b, Side::Left);
        assert!(!matches!(
            transformed.components().last(),
            Some(Component::Retain(_))
        ));
    }

    #[test]
    fn tp1_convergence_holds_for_concurrent_delete_and_insert() {
        let doc = "hello world";
        let a = Operation::from_components(vec![
            Component::Retain(6),
            Component::Insert("there, ".to_string()),
            Component::Retain(5),
        ]);
        let b = Operation::from_components(vec![Component::Delete(6), Component::Retain(5)]);

        let a_prime = a.transform(&b, Side::Left);
        let b_prime = b.transform(&a, Side::Right);

        let via_a_then_b_prime = a.apply(doc).unwrap();
        let via_a_then_b_prime = b_prime.apply(&via_a_then_b_prime).unwrap();

        let via_b_then_a_prime = b.apply(doc).unwrap();
        let via_b_then_a_prime = a_prime.apply(&via_b_then_a_prime).unwrap();

        assert_eq!(via_a_then_b_prime, via_b_then_a_prime);
    }

    #[test]
    fn tp1_convergence_holds_for_overlapping_concurrent_deletes() {
        let doc = "abcdef";
        let a = Operation::from_components(vec![Component::Retain(1), Component::Delete(3), Component::Retain(2)]);
        let b = Operation::from_components(vec![Component::Retain(2), Component::Delete(3), Component::Retain(1)]);

        let a_prime = a.transform(&b, Side::Left);
        let b_prime = b.transform(&a, Side::Right);

        let via_a_then_b_prime = b_prime.apply(&a.apply(doc).unwrap()).unwrap();
        let via_b_then_a_prime = a_prime.apply(&b.apply(doc).unwrap()).unwrap();
        assert_eq!(via_a_then_b_prime, via_b_then_a_prime);
    }
}
