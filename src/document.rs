// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Application (spec.md §4.4): executing an [`Operation`] against a document.
//!
//! A document is an immutable sequence of Unicode code points. We back it
//! with a [`ropey::Rope`], already a dependency of the teacher crate and of
//! `helix-core`, so that code-point counting and code-point slicing are
//! native operations rather than hand-rolled `char_indices` bookkeeping.

use crate::component::Component;
use crate::error::ApplyError;
use crate::operation::Operation;
use ropey::Rope;
use tracing::warn;

impl Operation {
    /// Executes this operation against `document`, returning the resulting
    /// document or the first violated invariant.
    ///
    /// The first out-of-bounds `Retain`/`Delete` returns its error
    /// immediately; no partial output is surfaced. An operation that consumes
    /// less than the full document is accepted — its undescribed tail is
    /// carried over unchanged (spec.md §4.4).
    pub fn apply(&self, document: &str) -> Result<String, ApplyError> {
        let rope = Rope::from_str(document);
        let total = rope.len_chars();
        let mut offset = 0usize;
        let mut output = String::with_capacity(document.len());

        for component in self.components() {
            match component {
                Component::Retain(n) => {
                    let remaining = total - offset;
                    if *n > remaining {
                        warn!(offset, requested = n, remaining, "retain extends past end of document");
                        return Err(ApplyError::RetainTooLong {
                            offset,
                            requested: *n,
                            remaining,
                        });
                    }
                    output.push_str(&rope.slice(offset..offset + n).to_string());
                    offset += n;
                }
                Component::Delete(n) => {
                    let remaining = total - offset;
                    if *n > remaining {
                        warn!(offset, requested = n, remaining, "delete exceeds remaining document");
                        return Err(ApplyError::DeleteMismatch {
                            offset,
                            requested: *n,
                            remaining,
                        });
                    }
                    offset += n;
                }
                Component::Insert(s) => {
                    output.push_str(s);
                }
            }
        }

        output.push_str(&rope.slice(offset..total).to_string());
        Ok(output)
    }

    /// Convenience sugar around [`Operation::apply`] for callers that know
    /// the operation is well-formed for `document` and would rather panic
    /// than thread a `Result` through. Named after, and grounded on,
    /// `OTServer::force_apply` in the teacher crate's `ot.rs`.
    ///
    /// # Panics
    ///
    /// Panics if `apply` returns an [`ApplyError`].
    pub fn force_apply(&self, document: &str) -> String {
        self.apply(document).unwrap_or_else(|e| {
            panic!("could not apply operation {self:?} to document {document:?}: {e}")
        })
    }

    /// Given the document this operation was applied *to* (its pre-image),
    /// produces the operation that undoes it: `apply(apply(d, op).unwrap(),
    /// op.invert(d)).unwrap() == d`.
    ///
    /// This is a small, natural complement to apply/compose/transform built
    /// from the same per-component walk; it is not an undo *history* (out of
    /// scope per spec.md §1) — just a single inverse operation.
    pub fn invert(&self, pre_image: &str) -> Operation {
        let rope = Rope::from_str(pre_image);
        let mut offset = 0usize;
        let mut inverse = Operation::new();

        for component in self.components() {
            match component {
                Component::Retain(n) => {
                    inverse.append(Component::Retain(*n));
                    offset += n;
                }
                Component::Insert(s) => {
                    inverse.append(Component::Delete(s.chars().count()));
                }
                Component::Delete(n) => {
                    let deleted = rope.slice(offset..offset + n).to_string();
                    inverse.append(Component::Insert(deleted));
                    offset += n;
                }
            }
        }

        inverse
    }
}
