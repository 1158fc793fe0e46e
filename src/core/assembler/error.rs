// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types, diagnostics, and reporting for the assembler.

use std::fmt;
use std::sync::Arc;

/// Categories of assembler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmErrorKind {
    Assembler,
    Cli,
    Directive,
    Immediate,
    Instruction,
    Internal,
    Io,
    Label,
}

/// An assembler error with a kind and message.
#[derive(Debug, Clone)]
pub struct AsmError {
    kind: AsmErrorKind,
    message: String,
}

impl AsmError {
    pub fn new(kind: AsmErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.kind
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AsmError {}

/// A diagnostic message with the 1-based source line it refers to.
///
/// Every detected defect is fatal for the run; there is no warning tier.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub(crate) line: u32,
    pub(crate) code: String,
    pub(crate) error: AsmError,
}

impl Diagnostic {
    pub fn new(line: u32, error: AsmError) -> Self {
        Self {
            line,
            code: default_diagnostic_code(error.kind()).to_string(),
            error,
        }
    }

    pub fn format(&self) -> String {
        format!("{}: ERROR [{}] - {}", self.line, self.code, self.error.message())
    }

    /// Render with the offending source line, when it is available.
    ///
    /// Line numbers refer to the original (pre-strip) source positions.
    pub fn format_with_context(&self, lines: &[String]) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}: ERROR [{}]\n", self.line, self.code));
        let line_idx = self.line.saturating_sub(1) as usize;
        match lines.get(line_idx) {
            Some(line) => out.push_str(&format!("{:>5} | {}\n", self.line, line)),
            None => out.push_str(&format!("{:>5} | <source unavailable>\n", self.line)),
        }
        out.push_str(&format!("ERROR: {}", self.error.message()));
        out
    }

    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn message(&self) -> &str {
        self.error.message()
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.error.kind()
    }
}

/// Report from a successful assembly run.
#[derive(Debug)]
pub struct AsmRunReport {
    diagnostics: Vec<Diagnostic>,
    source_lines: Arc<Vec<String>>,
    binary_size: usize,
    hex_dump: String,
}

impl AsmRunReport {
    pub fn new(
        diagnostics: Vec<Diagnostic>,
        source_lines: impl Into<Arc<Vec<String>>>,
        binary_size: usize,
        hex_dump: String,
    ) -> Self {
        Self {
            diagnostics,
            source_lines: source_lines.into(),
            binary_size,
            hex_dump,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    pub fn binary_size(&self) -> usize {
        self.binary_size
    }

    pub fn hex_dump(&self) -> &str {
        &self.hex_dump
    }
}

/// Error from a failed assembly run.
#[derive(Debug)]
pub struct AsmRunError {
    error: AsmError,
    diagnostics: Vec<Diagnostic>,
    source_lines: Arc<Vec<String>>,
}

impl AsmRunError {
    pub fn new(
        error: AsmError,
        diagnostics: Vec<Diagnostic>,
        source_lines: impl Into<Arc<Vec<String>>>,
    ) -> Self {
        Self {
            error,
            diagnostics,
            source_lines: source_lines.into(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for AsmRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for AsmRunError {}

/// Pass statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassCounts {
    pub lines: u32,
    pub errors: u32,
}

impl PassCounts {
    pub fn new() -> Self {
        Self::default()
    }
}

fn default_diagnostic_code(kind: AsmErrorKind) -> &'static str {
    match kind {
        AsmErrorKind::Assembler => "sfg001",
        AsmErrorKind::Cli => "sfg101",
        AsmErrorKind::Directive => "sfg201",
        AsmErrorKind::Immediate => "sfg401",
        AsmErrorKind::Instruction => "sfg402",
        AsmErrorKind::Internal => "sfg901",
        AsmErrorKind::Io => "sfg501",
        AsmErrorKind::Label => "sfg301",
    }
}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}
