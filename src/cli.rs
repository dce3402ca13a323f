// SPDX-FileCopyrightText: 2025 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2025 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print debug-level logs.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON-Lines fixture file against the core and report any
    /// mismatches.
    Fixtures {
        /// Which operation the fixture file exercises.
        #[command(subcommand)]
        kind: FixtureKind,
        /// Path to the JSON-Lines fixture file.
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum FixtureKind {
    Apply,
    Compose,
    Transform,
}

/// Runs the `fixtures` subcommand, returning the number of failing fixtures.
pub fn run_fixtures(kind: &FixtureKind, path: &PathBuf) -> anyhow::Result<usize> {
    let file = File::open(path)?;
    let failures = match kind {
        FixtureKind::Apply => {
            let fixtures = crate::fixtures::load_apply_fixtures(file)?;
            crate::fixtures::run_apply_fixtures(&fixtures)
        }
        FixtureKind::Compose => {
            let fixtures = crate::fixtures::load_compose_fixtures(file)?;
            crate::fixtures::run_compose_fixtures(&fixtures)
        }
        FixtureKind::Transform => {
            let fixtures = crate::fixtures::load_transform_fixtures(file)?;
            crate::fixtures::run_transform_fixtures(&fixtures)
        }
    };
    for failure in &failures {
        tracing::warn!("{failure}");
    }
    Ok(failures.len())
}

#[test]
fn verify() {
    use clap::CommandFactory as _;
    Cli::command().debug_assert();
}
