// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Compiled-in opcode tables for the target stack VM.
//!
//! The numeric values are part of the VM's binary interface and must not
//! change between releases.

pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub opcode: u8,
}

/// Mnemonic for the raw-byte directive. Bypasses both opcode tables.
pub const DB_MNEMONIC: &str = "DB";

/// Instructions encoded as a single opcode byte.
pub static ZERO_OPERAND_TABLE: &[OpcodeEntry] = &[
    OpcodeEntry { mnemonic: "BACK", opcode: 0x01 },
    OpcodeEntry { mnemonic: "SWAP", opcode: 0x03 },
    OpcodeEntry { mnemonic: "POP", opcode: 0x04 },
    OpcodeEntry { mnemonic: "RET", opcode: 0x0c },
    OpcodeEntry { mnemonic: "LI", opcode: 0x0d },
    OpcodeEntry { mnemonic: "LC", opcode: 0x0e },
    OpcodeEntry { mnemonic: "SI", opcode: 0x0f },
    OpcodeEntry { mnemonic: "SC", opcode: 0x10 },
    OpcodeEntry { mnemonic: "PSH", opcode: 0x11 },
    OpcodeEntry { mnemonic: "OR", opcode: 0x12 },
    OpcodeEntry { mnemonic: "XOR", opcode: 0x13 },
    OpcodeEntry { mnemonic: "AND", opcode: 0x14 },
    OpcodeEntry { mnemonic: "EQ", opcode: 0x15 },
    OpcodeEntry { mnemonic: "NE", opcode: 0x16 },
    OpcodeEntry { mnemonic: "LT", opcode: 0x17 },
    OpcodeEntry { mnemonic: "GT", opcode: 0x18 },
    OpcodeEntry { mnemonic: "LE", opcode: 0x19 },
    OpcodeEntry { mnemonic: "GE", opcode: 0x1a },
    OpcodeEntry { mnemonic: "SHL", opcode: 0x1b },
    OpcodeEntry { mnemonic: "SHR", opcode: 0x1c },
    OpcodeEntry { mnemonic: "ADD", opcode: 0x1d },
    OpcodeEntry { mnemonic: "SUB", opcode: 0x1e },
    OpcodeEntry { mnemonic: "MUL", opcode: 0x1f },
    OpcodeEntry { mnemonic: "DIV", opcode: 0x20 },
    OpcodeEntry { mnemonic: "MOD", opcode: 0x21 },
    OpcodeEntry { mnemonic: "PUSHARG", opcode: 0x34 },
    OpcodeEntry { mnemonic: "RETP", opcode: 0x38 },
];

/// Instructions encoded as an opcode byte followed by a 4-byte big-endian
/// operand.
pub static ONE_OPERAND_TABLE: &[OpcodeEntry] = &[
    OpcodeEntry { mnemonic: "REL", opcode: 0x02 },
    OpcodeEntry { mnemonic: "IMM", opcode: 0x05 },
    OpcodeEntry { mnemonic: "JMP", opcode: 0x06 },
    OpcodeEntry { mnemonic: "JSR", opcode: 0x07 },
    OpcodeEntry { mnemonic: "BZ", opcode: 0x08 },
    OpcodeEntry { mnemonic: "BNZ", opcode: 0x09 },
    OpcodeEntry { mnemonic: "ENT", opcode: 0x0a },
    OpcodeEntry { mnemonic: "ADJ", opcode: 0x0b },
    OpcodeEntry { mnemonic: "INT", opcode: 0x22 },
    OpcodeEntry { mnemonic: "JSRP", opcode: 0x37 },
];

#[must_use]
pub fn zero_operand_opcode(mnemonic: &str) -> Option<u8> {
    ZERO_OPERAND_TABLE
        .iter()
        .find(|entry| entry.mnemonic == mnemonic)
        .map(|entry| entry.opcode)
}

#[must_use]
pub fn one_operand_opcode(mnemonic: &str) -> Option<u8> {
    ONE_OPERAND_TABLE
        .iter()
        .find(|entry| entry.mnemonic == mnemonic)
        .map(|entry| entry.opcode)
}
