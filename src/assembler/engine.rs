// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::asmline::{encode_line, EncodedLine};
use super::Relocation;

use crate::core::assembler::error::{AsmError, AsmErrorKind, Diagnostic, PassCounts};
use crate::core::image::ImageBuffer;
use crate::core::label_table::{LabelTable, LabelTableResult};

/// Assembler context threaded through the three passes: label table, output
/// image, relocation list and collected diagnostics. One instance per run.
pub(crate) struct Assembler {
    pub(crate) labels: LabelTable,
    pub(crate) image: ImageBuffer,
    pub(crate) relocations: Vec<Relocation>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Assembler {
    pub(crate) fn new() -> Self {
        Self {
            labels: LabelTable::new(),
            image: ImageBuffer::new(),
            relocations: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub(crate) fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Pass 1: reserve every label name. Addresses stay at the placeholder
    /// value; they depend on byte lengths only pass 2 knows.
    ///
    /// Handoff contract: on a clean return the table is name-complete and
    /// address-incomplete.
    pub(crate) fn pass1(&mut self, lines: &[String]) -> PassCounts {
        let mut counts = PassCounts::new();
        for (ix, line) in lines.iter().enumerate() {
            let line_num = ix as u32 + 1;
            counts.lines = line_num;
            if line.is_empty() || line.contains(' ') {
                continue;
            }
            let Some(name) = line.strip_suffix(':') else {
                continue;
            };
            if self.labels.define(name) == LabelTableResult::Duplicate {
                let err = AsmError::new(AsmErrorKind::Label, "Label redefined", Some(name));
                self.diagnostics.push(Diagnostic::new(line_num, err));
                counts.errors += 1;
                return counts;
            }
        }
        counts
    }

    /// Pass 2: encode each line in source order, assigning label addresses
    /// as declaration lines are reached and recording relocations for
    /// label-referencing operands.
    ///
    /// Handoff contract: on a clean return the table is address-complete.
    pub(crate) fn pass2(&mut self, lines: &[String]) -> PassCounts {
        let mut counts = PassCounts::new();
        for (ix, line) in lines.iter().enumerate() {
            let line_num = ix as u32 + 1;
            counts.lines = line_num;
            match encode_line(line, &self.labels) {
                Ok(EncodedLine::Empty) => {}
                Ok(EncodedLine::Label(name)) => {
                    // Now that the preceding code is emitted, the label's
                    // address is the current output length.
                    let addr = self.image.len() as u32;
                    self.labels.assign(&name, addr);
                }
                Ok(EncodedLine::Bytes(bytes)) => self.image.append(&bytes),
                Ok(EncodedLine::OperandRef { opcode, label }) => {
                    self.relocations.push(Relocation {
                        offset: self.image.len() + 1,
                        label,
                        line: line_num,
                    });
                    self.image.append(&[opcode, 0, 0, 0, 0]);
                }
                Err(err) => {
                    self.diagnostics.push(Diagnostic::new(line_num, err));
                    counts.errors += 1;
                    return counts;
                }
            }
        }
        counts
    }

    /// Pass 3: patch every recorded 4-byte window with the resolved address
    /// of its target label. Pass 1 reserved every name pass 2 can
    /// reference, so a miss here is an internal fault, not a user error.
    pub(crate) fn fixup(&mut self) -> PassCounts {
        let mut counts = PassCounts::new();
        for reloc in &self.relocations {
            let Some(addr) = self.labels.lookup(&reloc.label) else {
                let err = AsmError::new(
                    AsmErrorKind::Internal,
                    "Relocation references unknown label",
                    Some(&reloc.label),
                );
                self.diagnostics.push(Diagnostic::new(reloc.line, err));
                counts.errors += 1;
                return counts;
            };
            if !self.image.patch_u32_be(reloc.offset, addr) {
                let err = AsmError::new(
                    AsmErrorKind::Internal,
                    "Relocation window out of range",
                    Some(&reloc.label),
                );
                self.diagnostics.push(Diagnostic::new(reloc.line, err));
                counts.errors += 1;
                return counts;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::Assembler;
    use crate::assembler::clean_line;
    use crate::core::assembler::error::AsmErrorKind;

    fn normalized(source: &str) -> Vec<String> {
        source
            .split('\n')
            .map(|line| clean_line(line).to_string())
            .collect()
    }

    #[test]
    fn pass1_reserves_names_with_placeholder_addresses() {
        let mut assembler = Assembler::new();
        let lines = normalized("start:\nIMM 0x5\nloop:\n");
        let counts = assembler.pass1(&lines);
        assert_eq!(counts.errors, 0);
        assert_eq!(assembler.labels().len(), 2);
        assert_eq!(assembler.labels().lookup("start"), Some(0));
        assert_eq!(assembler.labels().lookup("loop"), Some(0));
    }

    #[test]
    fn pass1_skips_lines_with_spaces_and_without_colon() {
        let mut assembler = Assembler::new();
        let lines = normalized("JMP loop\nnot a label:\nplain\n");
        let counts = assembler.pass1(&lines);
        assert_eq!(counts.errors, 0);
        assert!(assembler.labels().is_empty());
    }

    #[test]
    fn pass1_stops_at_the_first_duplicate() {
        let mut assembler = Assembler::new();
        let lines = normalized("a:\na:\n");
        let counts = assembler.pass1(&lines);
        assert_eq!(counts.errors, 1);
        let diag = &assembler.diagnostics[0];
        assert_eq!(diag.line(), 2);
        assert_eq!(diag.kind(), AsmErrorKind::Label);
        assert_eq!(diag.message(), "Label redefined: a");
    }

    #[test]
    fn pass2_assigns_addresses_at_declaration_points() {
        let mut assembler = Assembler::new();
        let lines = normalized("start:\nIMM 0x5\nPSH\nloop:\nPOP\n");
        assert_eq!(assembler.pass1(&lines).errors, 0);
        assert_eq!(assembler.pass2(&lines).errors, 0);
        assert_eq!(assembler.labels().lookup("start"), Some(0));
        // IMM contributes 5 bytes, PSH one: loop sits at offset 6.
        assert_eq!(assembler.labels().lookup("loop"), Some(6));
    }

    #[test]
    fn pass2_records_relocations_after_the_opcode_byte() {
        let mut assembler = Assembler::new();
        let lines = normalized("PSH\nJMP end\nend:\n");
        assert_eq!(assembler.pass1(&lines).errors, 0);
        assert_eq!(assembler.pass2(&lines).errors, 0);
        assert_eq!(assembler.relocations.len(), 1);
        assert_eq!(assembler.relocations[0].offset, 2);
        assert_eq!(assembler.relocations[0].label, "end");
        // Placeholder bytes until fixup runs.
        assert_eq!(assembler.image().bytes(), &[0x11, 0x06, 0, 0, 0, 0]);
    }

    #[test]
    fn fixup_patches_resolved_addresses() {
        let mut assembler = Assembler::new();
        let lines = normalized("PSH\nJMP end\nend:\n");
        assert_eq!(assembler.pass1(&lines).errors, 0);
        assert_eq!(assembler.pass2(&lines).errors, 0);
        assert_eq!(assembler.fixup().errors, 0);
        assert_eq!(assembler.image().bytes(), &[0x11, 0x06, 0, 0, 0, 6]);
    }

    #[test]
    fn fixup_reports_unknown_labels_as_internal() {
        let mut assembler = Assembler::new();
        assembler.image.append(&[0x06, 0, 0, 0, 0]);
        assembler.relocations.push(super::Relocation {
            offset: 1,
            label: "ghost".to_string(),
            line: 1,
        });
        let counts = assembler.fixup();
        assert_eq!(counts.errors, 1);
        assert_eq!(assembler.diagnostics[0].kind(), AsmErrorKind::Internal);
    }

    #[test]
    fn pass2_stops_at_the_first_error() {
        let mut assembler = Assembler::new();
        let lines = normalized("PSH\nNOPE\nALSO BAD BAD\n");
        assert_eq!(assembler.pass1(&lines).errors, 0);
        let counts = assembler.pass2(&lines);
        assert_eq!(counts.errors, 1);
        assert_eq!(assembler.diagnostics.len(), 1);
        assert_eq!(assembler.diagnostics[0].line(), 2);
    }
}
