// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The two error kinds `apply` can report (spec.md §7).

/// `compose`, `transform`, and the lower layers are total; only `apply` can
/// fail, and only in these two ways.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// A `Delete(n)` could not consume `n` code points: the document ran out
    /// first.
    #[error(
        "delete of {requested} code point(s) at offset {offset} exceeds remaining document length {remaining}"
    )]
    DeleteMismatch {
        offset: usize,
        requested: usize,
        remaining: usize,
    },
    /// A `Retain(n)` extended past the end of the document.
    #[error(
        "retain of {requested} code point(s) at offset {offset} exceeds remaining document length {remaining}"
    )]
    RetainTooLong {
        offset: usize,
        requested: usize,
        remaining: usize,
    },
}
