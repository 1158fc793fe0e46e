// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Per-line instruction encoding.
//!
//! Operates on normalized lines only; the split is on the single-space
//! delimiter, so runs of spaces produce empty words and fail the arity
//! check rather than being collapsed.

use crate::core::assembler::error::{AsmError, AsmErrorKind};
use crate::core::label_table::LabelTable;
use crate::core::opcodes::{one_operand_opcode, zero_operand_opcode, DB_MNEMONIC};

/// What a single normalized line contributes to the output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum EncodedLine {
    /// Nothing to emit.
    Empty,
    /// Label declaration; the engine assigns the current output length.
    Label(String),
    /// Finished bytes, appended verbatim.
    Bytes(Vec<u8>),
    /// One-operand instruction referencing a label: the opcode byte plus a
    /// 4-byte placeholder, with a relocation recorded for the placeholder.
    OperandRef { opcode: u8, label: String },
}

pub(super) fn encode_line(line: &str, labels: &LabelTable) -> Result<EncodedLine, AsmError> {
    if line.is_empty() {
        return Ok(EncodedLine::Empty);
    }

    let words: Vec<&str> = line.split(' ').collect();
    match words.as_slice() {
        [word] => {
            if let Some(name) = word.strip_suffix(':') {
                return Ok(EncodedLine::Label(name.to_string()));
            }
            match zero_operand_opcode(word) {
                Some(opcode) => Ok(EncodedLine::Bytes(vec![opcode])),
                None => Err(AsmError::new(
                    AsmErrorKind::Instruction,
                    "Unknown instruction",
                    Some(word),
                )),
            }
        }
        [op, imm] => {
            if *op == DB_MNEMONIC {
                return match parse_db_bytes(imm) {
                    Some(bytes) => Ok(EncodedLine::Bytes(bytes)),
                    None => Err(AsmError::new(
                        AsmErrorKind::Directive,
                        "Invalid hex literal immediate",
                        Some(imm),
                    )),
                };
            }

            let Some(opcode) = one_operand_opcode(op) else {
                return Err(AsmError::new(
                    AsmErrorKind::Instruction,
                    "Unknown instruction",
                    Some(op),
                ));
            };

            // Digit-first tokens are always numeric, even when a label of
            // that exact name exists.
            let digit_first = imm.chars().next().is_some_and(|ch| ch.is_ascii_digit());
            if !digit_first && labels.contains(imm) {
                return Ok(EncodedLine::OperandRef {
                    opcode,
                    label: imm.to_string(),
                });
            }

            match parse_imm32(imm) {
                Some(value) => {
                    let mut bytes = Vec::with_capacity(5);
                    bytes.push(opcode);
                    bytes.extend_from_slice(&value.to_be_bytes());
                    Ok(EncodedLine::Bytes(bytes))
                }
                None => Err(AsmError::new(
                    AsmErrorKind::Immediate,
                    "Invalid immediate (and not a label)",
                    Some(imm),
                )),
            }
        }
        _ => Err(AsmError::new(
            AsmErrorKind::Assembler,
            "Too many operands",
            None,
        )),
    }
}

/// Parse a hexadecimal immediate into its 32-bit two's-complement encoding.
///
/// Accepts an optional sign and an optional `0x`/`0X` prefix. Magnitudes up
/// to 2^32 are accepted and reduced modulo 2^32.
pub(super) fn parse_imm32(token: &str) -> Option<u32> {
    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let magnitude = u64::from_str_radix(digits, 16).ok()?;
    if magnitude > 1 << 32 {
        return None;
    }
    let value = if negative {
        (1u64 << 32) - magnitude
    } else {
        magnitude
    };
    Some((value % (1 << 32)) as u32)
}

/// Parse a `DB` operand into the literal bytes it denotes: an optional `0x`
/// prefix is stripped, then each hex digit pair becomes one byte, with an
/// odd leading digit padded by a zero nibble.
pub(super) fn parse_db_bytes(token: &str) -> Option<Vec<u8>> {
    let digits = token.strip_prefix("0x").unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut bytes = Vec::with_capacity(digits.len().div_ceil(2));
    let mut rest = digits;
    if rest.len() % 2 == 1 {
        let (head, tail) = rest.split_at(1);
        bytes.push(u8::from_str_radix(head, 16).ok()?);
        rest = tail;
    }
    for pair in rest.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(pair).ok()?;
        bytes.push(u8::from_str_radix(pair, 16).ok()?);
    }
    Some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn empty_labels() -> LabelTable {
        LabelTable::new()
    }

    fn labels_with(name: &str) -> LabelTable {
        let mut table = LabelTable::new();
        let _ = table.define(name);
        table
    }

    #[test]
    fn empty_line_emits_nothing() {
        assert_eq!(
            encode_line("", &empty_labels()).unwrap(),
            EncodedLine::Empty
        );
    }

    #[test]
    fn label_declaration_is_reported_not_encoded() {
        assert_eq!(
            encode_line("start:", &empty_labels()).unwrap(),
            EncodedLine::Label("start".to_string())
        );
    }

    #[test]
    fn zero_operand_encodes_one_byte() {
        assert_eq!(
            encode_line("PSH", &empty_labels()).unwrap(),
            EncodedLine::Bytes(vec![0x11])
        );
    }

    #[test]
    fn unknown_zero_operand_mnemonic_fails() {
        let err = encode_line("NOPE", &empty_labels()).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Instruction);
        assert_eq!(err.message(), "Unknown instruction: NOPE");
    }

    #[test]
    fn one_operand_numeric_encodes_five_bytes() {
        assert_eq!(
            encode_line("IMM 0x5", &empty_labels()).unwrap(),
            EncodedLine::Bytes(vec![0x05, 0x00, 0x00, 0x00, 0x05])
        );
        assert_eq!(
            encode_line("JMP 1f", &empty_labels()).unwrap(),
            EncodedLine::Bytes(vec![0x06, 0x00, 0x00, 0x00, 0x1f])
        );
    }

    #[test]
    fn label_operand_becomes_a_relocation() {
        assert_eq!(
            encode_line("JMP loop", &labels_with("loop")).unwrap(),
            EncodedLine::OperandRef {
                opcode: 0x06,
                label: "loop".to_string()
            }
        );
    }

    #[test]
    fn digit_first_operand_is_never_a_label() {
        // A label literally named "5" exists, but digit-first tokens stay
        // numeric.
        assert_eq!(
            encode_line("JMP 5", &labels_with("5")).unwrap(),
            EncodedLine::Bytes(vec![0x06, 0x00, 0x00, 0x00, 0x05])
        );
    }

    #[test]
    fn non_label_non_numeric_operand_fails() {
        let err = encode_line("JMP nowhere", &empty_labels()).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Immediate);
        assert_eq!(err.message(), "Invalid immediate (and not a label): nowhere");
    }

    #[test]
    fn unknown_one_operand_mnemonic_fails() {
        let err = encode_line("MOV 0x1", &empty_labels()).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Instruction);
    }

    #[test]
    fn three_words_are_too_many() {
        let err = encode_line("IMM 0x1 0x2", &empty_labels()).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Assembler);
        assert_eq!(err.message(), "Too many operands");
    }

    #[test]
    fn doubled_space_counts_as_an_extra_word() {
        let err = encode_line("JMP  loop", &labels_with("loop")).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Assembler);
    }

    #[test]
    fn db_emits_minimal_byte_count() {
        assert_eq!(
            encode_line("DB 0x1", &empty_labels()).unwrap(),
            EncodedLine::Bytes(vec![0x01])
        );
        assert_eq!(
            encode_line("DB 12AB", &empty_labels()).unwrap(),
            EncodedLine::Bytes(vec![0x12, 0xab])
        );
        assert_eq!(
            encode_line("DB 0012", &empty_labels()).unwrap(),
            EncodedLine::Bytes(vec![0x00, 0x12])
        );
    }

    #[test]
    fn db_rejects_bad_literals() {
        for bad in ["DB xyz", "DB -5", "DB 0x", "DB 1.5"] {
            let err = encode_line(bad, &empty_labels()).unwrap_err();
            assert_eq!(err.kind(), AsmErrorKind::Directive, "{bad}");
        }
    }

    #[test]
    fn db_is_not_subject_to_opcode_tables() {
        // DB with one word is not the directive, and falls through to the
        // zero-operand lookup.
        let err = encode_line("DB", &empty_labels()).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Instruction);
    }

    #[test]
    fn imm32_prefix_and_sign_handling() {
        assert_eq!(parse_imm32("ff"), Some(0xff));
        assert_eq!(parse_imm32("0xff"), Some(0xff));
        assert_eq!(parse_imm32("0XFF"), Some(0xff));
        assert_eq!(parse_imm32("+5"), Some(5));
        assert_eq!(parse_imm32("-1"), Some(0xffff_ffff));
        assert_eq!(parse_imm32("-0x10"), Some(0xffff_fff0));
    }

    #[test]
    fn imm32_range_is_reduced_modulo_2_to_32() {
        assert_eq!(parse_imm32("100000000"), Some(0));
        assert_eq!(parse_imm32("-100000000"), Some(0));
        assert_eq!(parse_imm32("100000001"), None);
        assert_eq!(parse_imm32("ffffffffffffffffff"), None);
    }

    #[test]
    fn imm32_rejects_garbage() {
        for bad in ["", "-", "0x", "zz", "1 2", "--1", "-+1"] {
            assert_eq!(parse_imm32(bad), None, "{bad}");
        }
    }

    proptest! {
        #[test]
        fn imm32_round_trips_u32(value in any::<u32>()) {
            let text = format!("{value:x}");
            prop_assert_eq!(parse_imm32(&text), Some(value));
            let prefixed = format!("0x{value:X}");
            prop_assert_eq!(parse_imm32(&prefixed), Some(value));
        }

        #[test]
        fn imm32_negation_wraps(value in any::<u32>()) {
            let text = format!("-{value:x}");
            prop_assert_eq!(parse_imm32(&text), Some(value.wrapping_neg()));
        }

        #[test]
        fn db_round_trips_bytes(bytes in proptest::collection::vec(any::<u8>(), 1..16)) {
            let mut text = String::new();
            for byte in &bytes {
                text.push_str(&format!("{byte:02x}"));
            }
            prop_assert_eq!(parse_db_bytes(&text), Some(bytes));
        }

        #[test]
        fn db_length_is_ceil_of_digit_count(digits in "[0-9a-fA-F]{1,15}") {
            let bytes = parse_db_bytes(&digits).expect("valid hex digits");
            prop_assert_eq!(bytes.len(), digits.len().div_ceil(2));
        }
    }
}
