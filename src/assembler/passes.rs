//! Assembler run/pass orchestration.
//!
//! This module owns CLI-driven run flow and the sequencing of the three
//! passes: label discovery, encoding, relocation fixup. Output files are
//! written only once every pass has completed cleanly.

use clap::Parser;

use super::*;

/// Run the assembler with command-line arguments.
pub(super) fn run() -> Result<AsmRunReport, AsmRunError> {
    let cli = Cli::parse();
    run_with_cli(&cli)
}

pub(super) fn run_with_cli(cli: &Cli) -> Result<AsmRunReport, AsmRunError> {
    let config = validate_cli(cli)?;
    run_one(&config)
}

pub(super) fn run_one(config: &CliConfig) -> Result<AsmRunReport, AsmRunError> {
    if !config.quiet {
        println!("stackforge v{VERSION}");
    }

    let source = fs::read_to_string(&config.input_path).map_err(|err| {
        let path_text = config.input_path.to_string_lossy().to_string();
        AsmRunError::new(
            AsmError::new(
                AsmErrorKind::Io,
                &format!("Error reading source file: {err}"),
                Some(&path_text),
            ),
            Vec::new(),
            Vec::new(),
        )
    })?;
    let raw_lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    let lines: Vec<String> = raw_lines
        .iter()
        .map(|line| clean_line(line).to_string())
        .collect();
    let source_lines = Arc::new(raw_lines);

    let mut assembler = Assembler::new();
    let pass1 = assembler.pass1(&lines);
    if pass1.errors > 0 {
        return Err(run_error(&mut assembler, source_lines));
    }
    let pass2 = assembler.pass2(&lines);
    if pass2.errors > 0 {
        return Err(run_error(&mut assembler, source_lines));
    }
    let pass3 = assembler.fixup();
    if pass3.errors > 0 {
        return Err(run_error(&mut assembler, source_lines));
    }

    let outputs = output::resolve_output_paths(&config.output_base);
    output::write_outputs(assembler.image(), &outputs)
        .map_err(|err| AsmRunError::new(err, Vec::new(), source_lines.clone()))?;

    let binary_size = assembler.image().len();
    let hex_dump = assembler.image().hex_dump();
    if !config.quiet {
        println!("Success, generated binary is {binary_size} bytes long");
        println!("Hex dump: {hex_dump}");
    }

    if !config.no_upload {
        uploader::offer_upload(&config.uploader, &outputs);
    }

    Ok(AsmRunReport::new(
        assembler.take_diagnostics(),
        source_lines,
        binary_size,
        hex_dump,
    ))
}

fn run_error(assembler: &mut Assembler, source_lines: Arc<Vec<String>>) -> AsmRunError {
    AsmRunError::new(
        AsmError::new(
            AsmErrorKind::Assembler,
            "Errors detected in source. No output files written.",
            None,
        ),
        assembler.take_diagnostics(),
        source_lines,
    )
}
