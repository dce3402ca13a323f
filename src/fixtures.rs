// SPDX-FileCopyrightText: 2024 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2024 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Loading and replaying JSON-Lines fixture files against the core.
//!
//! Fixture loading, decoding, and replay are callers of the core, not part of
//! it (spec.md's Non-goals explicitly exclude "test-fixture loading/JSON
//! decoding" from the algebra itself) — this module, the `fixtures`
//! subcommand, and `tests/fixtures.rs` are exactly that caller. The record
//! shapes below mirror the untagged-enum coercion style of
//! `editor_protocol.rs` in the teacher crate.

use crate::operation::Operation;
use crate::transform::Side;
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyFixture {
    pub str: String,
    pub op: Operation,
    pub result: ApplyOutcome,
}

/// An apply fixture's expected outcome: either the resulting document, or the
/// name of the error kind `apply` should report.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApplyOutcome {
    Document(String),
    Error { error: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComposeFixture {
    pub op1: Operation,
    pub op2: Operation,
    pub result: Operation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformFixture {
    pub op: Operation,
    #[serde(rename = "otherOp")]
    pub other_op: Operation,
    pub side: FixtureSide,
    pub result: Operation,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureSide {
    Left,
    Right,
}

impl From<FixtureSide> for Side {
    fn from(side: FixtureSide) -> Self {
        match side {
            FixtureSide::Left => Side::Left,
            FixtureSide::Right => Side::Right,
        }
    }
}

/// Streams one JSON value per line out of `reader`, the way the teacher's
/// daemon streams JSON-RPC frames off a socket.
fn load<T: serde::de::DeserializeOwned>(reader: impl Read) -> Result<Vec<T>, serde_json::Error> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<T>()
        .collect()
}

pub fn load_apply_fixtures(reader: impl Read) -> Result<Vec<ApplyFixture>, serde_json::Error> {
    load(reader)
}

pub fn load_compose_fixtures(reader: impl Read) -> Result<Vec<ComposeFixture>, serde_json::Error> {
    load(reader)
}

pub fn load_transform_fixtures(reader: impl Read) -> Result<Vec<TransformFixture>, serde_json::Error> {
    load(reader)
}

/// Runs every fixture, returning the descriptions of the ones that didn't
/// match. An empty return means every fixture passed.
pub fn run_apply_fixtures(fixtures: &[ApplyFixture]) -> Vec<String> {
    let mut failures = Vec::new();
    for (i, fixture) in fixtures.iter().enumerate() {
        debug!(index = i, "running apply fixture");
        match (&fixture.result, fixture.op.apply(&fixture.str)) {
            (ApplyOutcome::Document(expected), Ok(actual)) if expected == &actual => {}
            (ApplyOutcome::Error { error }, Err(actual)) if error_matches(error, &actual) => {}
            (expected, actual) => failures.push(format!(
                "fixture {i}: expected {expected:?}, got {actual:?}"
            )),
        }
    }
    failures
}

pub fn run_compose_fixtures(fixtures: &[ComposeFixture]) -> Vec<String> {
    let mut failures = Vec::new();
    for (i, fixture) in fixtures.iter().enumerate() {
        debug!(index = i, "running compose fixture");
        let actual = fixture.op1.compose(&fixture.op2);
        if actual != fixture.result {
            failures.push(format!(
                "fixture {i}: expected {:?}, got {actual:?}",
                fixture.result
            ));
        }
    }
    failures
}

pub fn run_transform_fixtures(fixtures: &[TransformFixture]) -> Vec<String> {
    let mut failures = Vec::new();
    for (i, fixture) in fixtures.iter().enumerate() {
        debug!(index = i, "running transform fixture");
        let actual = fixture.op.transform(&fixture.other_op, fixture.side.into());
        if actual != fixture.result {
            failures.push(format!(
                "fixture {i}: expected {:?}, got {actual:?}",
                fixture.result
            ));
        }
    }
    failures
}

fn error_matches(name: &str, error: &crate::error::ApplyError) -> bool {
    match (name, error) {
        ("delete_mismatch", crate::error::ApplyError::DeleteMismatch { .. }) => true,
        ("retain_too_long", crate::error::ApplyError::RetainTooLong { .. }) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_apply_fixtures_from_jsonl() {
        let jsonl = concat!(
            "{\"str\": \"Foo\", \"op\": [3, \" Bar\"], \"result\": \"Foo Bar\"}\n",
            "{\"str\": \"Foo\", \"op\": [{\"d\": 4}], \"result\": {\"error\": \"delete_mismatch\"}}\n",
        );
        let fixtures = load_apply_fixtures(jsonl.as_bytes()).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert!(run_apply_fixtures(&fixtures).is_empty());
    }

    #[test]
    fn reports_apply_fixture_mismatches() {
        let jsonl = "{\"str\": \"Foo\", \"op\": [3], \"result\": \"wrong\"}\n";
        let fixtures = load_apply_fixtures(jsonl.as_bytes()).unwrap();
        let failures = run_apply_fixtures(&fixtures);
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn loads_compose_fixtures_from_jsonl() {
        let jsonl = "{\"op1\": [\"Bar\"], \"op2\": [\"Foo\"], \"result\": [\"FooBar\"]}\n";
        let fixtures = load_compose_fixtures(jsonl.as_bytes()).unwrap();
        assert!(run_compose_fixtures(&fixtures).is_empty());
    }

    #[test]
    fn loads_transform_fixtures_from_jsonl() {
        let jsonl =
            "{\"op\": [\"AA\"], \"otherOp\": [\"BB\"], \"side\": \"left\", \"result\": [\"AA\"]}\n";
        let fixtures = load_transform_fixtures(jsonl.as_bytes()).unwrap();
        assert!(run_transform_fixtures(&fixtures).is_empty());
    }
}
