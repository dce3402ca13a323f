// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A pure algebra for plain-text operational transformation: apply, compose,
//! and transform over canonical retain/insert/delete operations. The core
//! (`component`, `operation`, `pair_iterator`, `document`, `compose`,
//! `transform`) touches no I/O; `fixtures` and `cli` are its callers. See
//! each module for its layer of the algebra.

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(feature = "executable-deps")]
pub mod cli;
pub mod component;
pub mod compose;
pub mod document;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod operation;
pub mod pair_iterator;
pub mod transform;

pub use component::{Component, Kind};
pub use error::ApplyError;
pub use operation::{Operation, RawComponent};
pub use transform::Side;
