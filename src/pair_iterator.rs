// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A reusable two-operation scanner: walks two operations in lockstep and
//! yields length-aligned component slices, splitting the longer side as
//! needed. [`compose`](crate::compose) and [`transform`](crate::transform)
//! each need a variant of this alignment, but also need to treat one or two
//! kinds as entirely exempt from alignment (an insert that doesn't share the
//! other operand's coordinate space at all, not just one that shouldn't be
//! split) — so they inline their own kind-dispatch-then-align loops rather
//! than driving this type directly. It's kept here as the general-purpose,
//! independently tested building block spec.md §1 calls out as "the hard
//! part," and as the easiest place to exercise the alignment rules in
//! isolation from either decision table.
//!
//! Neither the teacher crate nor any dependency it pulls in implements this
//! scanner explicitly — `ethersync` hands composition and transformation off
//! entirely to the external `operational-transform` crate. This module is
//! this port's own construction, built as an explicit step function (a
//! struct plus an [`Iterator`] impl) rather than a generator, so it stays a
//! plain, restartable value like the rest of the core.

use crate::component::{Component, Kind};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// One aligned slice pair. Either side is `None` exactly when that operand is
/// exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairStep {
    pub a: Option<Component>,
    pub b: Option<Component>,
}

/// Scans two operations in lockstep, yielding length-aligned component
/// slices. `skip_kind`, if set, names the one kind of component on the `a`
/// side that must never be split — used to preserve either a delete's exact
/// consumption (composition) or an insert's literal text (transformation).
pub struct PairIterator {
    a: VecDeque<Component>,
    b: VecDeque<Component>,
    skip_kind: Option<Kind>,
}

impl PairIterator {
    pub fn new(a: &crate::operation::Operation, b: &crate::operation::Operation, skip_kind: Option<Kind>) -> Self {
        Self {
            a: a.components().iter().cloned().collect(),
            b: b.components().iter().cloned().collect(),
            skip_kind,
        }
    }
}

impl Iterator for PairIterator {
    type Item = PairStep;

    fn next(&mut self) -> Option<PairStep> {
        loop {
            let a_exhausted = self.a.is_empty();
            let b_exhausted = self.b.is_empty();

            if a_exhausted && b_exhausted {
                return None;
            }
            if a_exhausted {
                return Some(PairStep {
                    a: None,
                    b: self.b.pop_front(),
                });
            }
            if b_exhausted {
                return Some(PairStep {
                    a: self.a.pop_front(),
                    b: None,
                });
            }

            if self.a.front().is_some_and(Component::is_no_op) {
                self.a.pop_front();
                continue;
            }
            if self.b.front().is_some_and(Component::is_no_op) {
                self.b.pop_front();
                continue;
            }

            let head_a = self.a.front().expect("checked non-empty above");
            let head_b = self.b.front().expect("checked non-empty above");

            match head_a.compare(head_b) {
                Ordering::Equal => {
                    return Some(PairStep {
                        a: self.a.pop_front(),
                        b: self.b.pop_front(),
                    });
                }
                Ordering::Less => {
                    let a = self.a.pop_front().expect("checked non-empty above");
                    let b_head = self.b.pop_front().expect("checked non-empty above");
                    let (prefix, remainder) = b_head.split(a.length());
                    self.b.push_front(remainder);
                    return Some(PairStep {
                        a: Some(a),
                        b: Some(prefix),
                    });
                }
                Ordering::Greater => {
                    if Some(head_a.kind()) == self.skip_kind {
                        return Some(PairStep {
                            a: self.a.pop_front(),
                            b: self.b.pop_front(),
                        });
                    }
                    let a_head = self.a.pop_front().expect("checked non-empty above");
                    let b = self.b.pop_front().expect("checked non-empty above");
                    let (prefix, remainder) = a_head.split(b.length());
                    self.a.push_front(remainder);
                    return Some(PairStep {
                        a: Some(prefix),
                        b: Some(b),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use pretty_assertions::assert_eq;

    fn op(components: Vec<Component>) -> Operation {
        Operation::from_components(components)
    }

    #[test]
    fn equal_length_heads_advance_together() {
        let a = op(vec![Component::Retain(3)]);
        let b = op(vec![Component::Delete(3)]);
        let mut it = PairIterator::new(&a, &b, None);
        assert_eq!(
            it.next(),
            Some(PairStep {
                a: Some(Component::Retain(3)),
                b: Some(Component::Delete(3))
            })
        );
        assert_eq!(it.next(), None);
    }

    #[test]
    fn shorter_a_splits_b() {
        let a = op(vec![Component::Retain(2)]);
        let b = op(vec![Component::Delete(5)]);
        let mut it = PairIterator::new(&a, &b, None);
        assert_eq!(
            it.next(),
            Some(PairStep {
                a: Some(Component::Retain(2)),
                b: Some(Component::Delete(2))
            })
        );
        assert_eq!(
            it.next(),
            Some(PairStep {
                a: None,
                b: Some(Component::Delete(3))
            })
        );
    }

    #[test]
    fn shorter_b_splits_a_unless_skip_kind_protects_it() {
        let a = op(vec![Component::Insert("hello".to_string())]);
        let b = op(vec![Component::Retain(2)]);

        let mut split = PairIterator::new(&a, &b, None);
        assert_eq!(
            split.next(),
            Some(PairStep {
                a: Some(Component::Insert("he".to_string())),
                b: Some(Component::Retain(2))
            })
        );

        let mut protected = PairIterator::new(&a, &b, Some(Kind::Insert));
        assert_eq!(
            protected.next(),
            Some(PairStep {
                a: Some(Component::Insert("hello".to_string())),
                b: Some(Component::Retain(2))
            })
        );
    }

    #[test]
    fn no_ops_are_dropped_and_skipped_over() {
        let a = op(vec![Component::Retain(3)]);
        // Retain(0) can't survive Operation::append, so build the VecDeque by hand
        // to exercise the defensive no-op drop directly.
        let mut it = PairIterator {
            a: vec![Component::Retain(0), Component::Retain(3)].into(),
            b: vec![Component::Delete(3)].into(),
            skip_kind: None,
        };
        assert_eq!(
            it.next(),
            Some(PairStep {
                a: Some(Component::Retain(3)),
                b: Some(Component::Delete(3))
            })
        );
    }

    #[test]
    fn one_sided_exhaustion_drains_the_remainder() {
        let a = op(vec![Component::Retain(2), Component::Insert("x".to_string())]);
        let b = op(vec![Component::Retain(2)]);
        let mut it = PairIterator::new(&a, &b, None);
        assert_eq!(
            it.next(),
            Some(PairStep {
                a: Some(Component::Retain(2)),
                b: Some(Component::Retain(2))
            })
        );
        assert_eq!(
            it.next(),
            Some(PairStep {
                a: Some(Component::Insert("x".to_string())),
                b: None
            })
        );
        assert_eq!(it.next(), None);
    }
}
