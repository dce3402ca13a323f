// SPDX-FileCopyrightText: 2025 blinry <mail@blinry.org>
// SPDX-FileCopyrightText: 2025 zormit <nt4u@kpvn.de>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap::Parser;
use text_ot::cli::{run_fixtures, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    text_ot::logging::initialize(cli.debug);

    match &cli.command {
        Commands::Fixtures { kind, path } => {
            let failures = run_fixtures(kind, path)?;
            if failures > 0 {
                anyhow::bail!("{failures} fixture(s) failed");
            }
        }
    }

    Ok(())
}
