// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! An ordered sequence of [`Component`]s, kept canonical by construction.

use crate::component::{Component, Merged};
use serde::{Deserialize, Serialize};

/// The serde-facing shape of a single raw edit-list entry (spec.md §6):
///
/// - a non-negative integer deserializes to `Retain`
/// - a string deserializes to `Insert`
/// - a single-field object `{"d": n}` deserializes to `Delete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawComponent {
    Retain(usize),
    Insert(String),
    Delete {
        /// Rust JSON has no string-key/symbolic-key duality to preserve (that
        /// distinction in the system this was ported from is an artifact of
        /// atoms vs. binaries); a single field name covers both input shapes.
        d: usize,
    },
}

impl From<RawComponent> for Component {
    fn from(raw: RawComponent) -> Self {
        match raw {
            RawComponent::Retain(n) => Component::Retain(n),
            RawComponent::Insert(s) => Component::Insert(s),
            RawComponent::Delete { d } => Component::Delete(d),
        }
    }
}

impl From<Component> for RawComponent {
    fn from(component: Component) -> Self {
        match component {
            Component::Retain(n) => RawComponent::Retain(n),
            Component::Insert(s) => RawComponent::Insert(s),
            Component::Delete(n) => RawComponent::Delete { d: n },
        }
    }
}

/// A canonical, ordered sequence of edit components: no no-op components, and
/// no two adjacent components of the same kind.
///
/// All public constructors and combinators on `Operation` return canonical
/// operations; this is a structural invariant, not a convention — the
/// component list is private and only ever grown through [`Operation::append`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "Vec<RawComponent>", from = "Vec<RawComponent>")]
pub struct Operation {
    components: Vec<Component>,
}

impl From<Vec<RawComponent>> for Operation {
    fn from(raw: Vec<RawComponent>) -> Self {
        Operation::from_raw(raw)
    }
}

impl From<Operation> for Vec<RawComponent> {
    fn from(op: Operation) -> Self {
        op.components.into_iter().map(RawComponent::from).collect()
    }
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a canonical operation out of raw, possibly non-canonical,
    /// edit-list entries (empty list, zero-valued retain/delete, empty-string
    /// insert, and adjacent same-kind entries are all accepted).
    pub fn from_raw(raw: Vec<RawComponent>) -> Self {
        let mut op = Operation::new();
        for raw_component in raw {
            op.append(raw_component.into());
        }
        op
    }

    /// Builds a canonical operation directly out of typed components, for
    /// callers that already have `Component` values rather than wire data.
    pub fn from_components(components: Vec<Component>) -> Self {
        let mut op = Operation::new();
        for component in components {
            op.append(component);
        }
        op
    }

    /// A no-edit operation that simply retains the whole of a document of
    /// length `len`. Handy as a starting point for folding other operations
    /// through [`Operation::append`], and for the identity law
    /// (`compose(A, identity) == A`).
    pub fn identity(len: usize) -> Self {
        Operation::from_components(vec![Component::Retain(len)])
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Appends `component`, canonicalizing as it goes: a no-op is dropped; a
    /// component sharing a kind with the current last component is merged
    /// into it; otherwise the component is pushed as a new, final entry.
    pub fn append(&mut self, component: Component) {
        if component.is_no_op() {
            return;
        }
        match self.components.pop() {
            None => self.components.push(component),
            Some(last) => match last.merge(component) {
                Merged::Merged(merged) => self.components.push(merged),
                Merged::Separate(last, component) => {
                    self.components.push(last);
                    self.components.push(component);
                }
            },
        }
    }

    /// Appends every component of `other` onto `self`, canonicalizing as it
    /// goes. Handles empty operands on either side.
    pub fn join(mut self, other: Operation) -> Operation {
        for component in other.components {
            self.append(component);
        }
        self
    }

    /// Sum of the lengths of `Retain` and `Delete` components: the length of
    /// document this operation is defined on.
    pub fn base_len(&self) -> usize {
        self.components
            .iter()
            .map(|c| match c {
                Component::Retain(n) | Component::Delete(n) => *n,
                Component::Insert(_) => 0,
            })
            .sum()
    }

    /// Sum of the lengths of `Retain` and `Insert` components: the length of
    /// document this operation produces.
    pub fn target_len(&self) -> usize {
        self.components
            .iter()
            .map(|c| match c {
                Component::Retain(n) => *n,
                Component::Insert(s) => s.chars().count(),
                Component::Delete(_) => 0,
            })
            .sum()
    }

    /// Drops a trailing `Retain`, if any. It carries no semantic effect at
    /// the end of an operation; used by `transform` (spec.md §4.6) but not by
    /// `apply`/`compose`, which tolerate but do not require it (spec.md §9).
    pub(crate) fn strip_trailing_retain(mut self) -> Operation {
        if matches!(self.components.last(), Some(Component::Retain(_))) {
            self.components.pop();
        }
        self
    }
}
