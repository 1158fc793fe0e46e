// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for stackforge.

use std::process;

use clap::Parser;

use stackforge::assembler::{self, cli::Cli};

fn main() {
    let cli = Cli::parse();
    match assembler::run_with_cli(&cli) {
        Ok(_report) => {}
        Err(err) => {
            for diag in err.diagnostics() {
                eprintln!("{}", diag.format_with_context(err.source_lines()));
            }
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
