// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::core::assembler::error::{AsmError, AsmErrorKind, AsmRunError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const DEFAULT_UPLOADER: &str = "./perturbo";

const LONG_ABOUT: &str = "Two-pass assembler for a small stack-based virtual machine.

Reads a single source file and, on success, writes three sibling files next
to the output base: <base>.data (the flat binary stream), <base>.bss (a
zero-filled reserved segment) and <base>.json (loader metadata).
The output base defaults to the input filename with its last extension
removed; use -o/--outfile to override it.
When an uploader tool is present on disk, a y/n prompt offers to send the
generated artifacts to an attached device.";

#[derive(Parser, Debug)]
#[command(
    name = "stackforge",
    version = VERSION,
    about = "Assembler for a small stack-based VM (flat binary + loader metadata)",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        value_name = "SOURCE",
        long_help = "Input assembly source file. Required; reported as a usage error when omitted."
    )]
    pub input: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "BASE",
        long_help = "Output filename base for the .data/.bss/.json artifacts. Defaults to the input filename with its last extension removed."
    )]
    pub outfile: Option<String>,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress the banner, success line and hex dump for successful runs. Errors are still reported."
    )]
    pub quiet: bool,
    #[arg(
        long = "no-upload",
        action = ArgAction::SetTrue,
        long_help = "Never offer the interactive device upload step, even when the uploader tool is present."
    )]
    pub no_upload: bool,
    #[arg(
        long = "uploader",
        value_name = "PATH",
        long_help = "Location of the device uploader tool. Defaults to ./perturbo; the upload prompt only appears when the tool exists."
    )]
    pub uploader: Option<PathBuf>,
}

/// Validated CLI configuration consumed by the run driver.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_path: PathBuf,
    pub output_base: String,
    pub quiet: bool,
    pub no_upload: bool,
    pub uploader: PathBuf,
}

pub fn validate_cli(cli: &Cli) -> Result<CliConfig, AsmRunError> {
    let Some(input_path) = cli.input.clone() else {
        return Err(cli_error(
            "Missing source file. Usage: stackforge [OPTIONS] <SOURCE>",
        ));
    };
    let output_base = match &cli.outfile {
        Some(base) if base.is_empty() => {
            return Err(cli_error("-o/--outfile requires a non-empty base name"))
        }
        Some(base) => base.clone(),
        None => input_base_from_path(&input_path),
    };
    Ok(CliConfig {
        input_path,
        output_base,
        quiet: cli.quiet,
        no_upload: cli.no_upload,
        uploader: cli
            .uploader
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADER)),
    })
}

/// Input path with its last extension removed; directories are untouched.
pub(crate) fn input_base_from_path(path: &Path) -> String {
    path.with_extension("").to_string_lossy().to_string()
}

fn cli_error(message: &str) -> AsmRunError {
    AsmRunError::new(
        AsmError::new(AsmErrorKind::Cli, message, None),
        Vec::new(),
        Vec::new(),
    )
}
