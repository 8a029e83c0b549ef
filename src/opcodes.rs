//! Per-version mnemonic tables: given an instruction's name, what its
//! Z-Machine opcode category and raw opcode number are, the version it
//! first appears in, and whether it takes a store/branch. Adapted from
//! `grue_compiler::opcodes`'s raw-opcode-number constant modules — that
//! file documents *encoded* bytes one opcode at a time; this one is
//! shaped for lookup by the instruction encoder, keyed by mnemonic.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::zvalue::ZMachineVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandCountCategory {
    Op0,
    Op1,
    Op2,
    Var,
}

#[derive(Debug, Clone, Copy)]
pub struct OpcodeSpec {
    pub mnemonic: &'static str,
    pub category: OperandCountCategory,
    /// Raw opcode number within its category (0x00-0x1F for 2OP/VAR,
    /// 0x00-0x0F for 0OP/1OP) — not the encoded instruction byte.
    pub opcode: u8,
    pub min_version: ZMachineVersion,
    pub has_store: bool,
    pub has_branch: bool,
    /// Some(n) for instructions that move to extended form (0xBE) in
    /// v5+ rather than keeping their 0OP encoding — SAVE and RESTORE.
    pub extended_opcode: Option<u8>,
}

const fn spec(
    mnemonic: &'static str,
    category: OperandCountCategory,
    opcode: u8,
    min_version: ZMachineVersion,
    has_store: bool,
    has_branch: bool,
) -> OpcodeSpec {
    OpcodeSpec {
        mnemonic,
        category,
        opcode,
        min_version,
        has_store,
        has_branch,
        extended_opcode: None,
    }
}

lazy_static! {
    pub static ref OPCODES: HashMap<&'static str, OpcodeSpec> = {
        use OperandCountCategory::*;
        use ZMachineVersion::*;

        let mut m = HashMap::new();
        let mut insert = |s: OpcodeSpec| {
            m.insert(s.mnemonic, s);
        };

        // 0OP
        insert(spec("RTRUE", Op0, 0x00, V3, false, false));
        insert(spec("RFALSE", Op0, 0x01, V3, false, false));
        insert(spec("PRINT", Op0, 0x02, V3, false, false));
        insert(spec("PRINT_RET", Op0, 0x03, V3, false, false));
        insert(spec("NOP", Op0, 0x04, V3, false, false));
        insert(OpcodeSpec {
            extended_opcode: Some(0x00),
            ..spec("SAVE", Op0, 0x05, V3, true, true)
        });
        insert(OpcodeSpec {
            extended_opcode: Some(0x01),
            ..spec("RESTORE", Op0, 0x06, V3, true, true)
        });
        insert(spec("RESTART", Op0, 0x07, V3, false, false));
        insert(spec("RET_POPPED", Op0, 0x08, V3, false, false));
        insert(spec("POP", Op0, 0x09, V3, false, false));
        insert(spec("CATCH", Op0, 0x09, V5, true, false));
        insert(spec("QUIT", Op0, 0x0A, V3, false, false));
        insert(spec("NEW_LINE", Op0, 0x0B, V3, false, false));
        insert(spec("SHOW_STATUS", Op0, 0x0C, V3, false, false));
        insert(spec("VERIFY", Op0, 0x0D, V3, false, true));
        insert(spec("PIRACY", Op0, 0x0F, V5, false, true));

        // 1OP
        insert(spec("JZ", Op1, 0x00, V3, false, true));
        insert(spec("GET_SIBLING", Op1, 0x01, V3, true, true));
        insert(spec("GET_CHILD", Op1, 0x02, V3, true, true));
        insert(spec("GET_PARENT", Op1, 0x03, V3, true, false));
        insert(spec("GET_PROP_LEN", Op1, 0x04, V3, true, false));
        insert(spec("INC", Op1, 0x05, V3, false, false));
        insert(spec("DEC", Op1, 0x06, V3, false, false));
        insert(spec("PRINT_ADDR", Op1, 0x07, V3, false, false));
        insert(spec("CALL_1S", Op1, 0x08, V4, true, false));
        insert(spec("REMOVE_OBJ", Op1, 0x09, V3, false, false));
        insert(spec("PRINT_OBJ", Op1, 0x0A, V3, false, false));
        insert(spec("RET", Op1, 0x0B, V3, false, false));
        insert(spec("JUMP", Op1, 0x0C, V3, false, false));
        insert(spec("PRINT_PADDR", Op1, 0x0D, V3, false, false));
        insert(spec("LOAD", Op1, 0x0E, V3, true, false));
        insert(spec("NOT", Op1, 0x0F, V3, true, false));
        insert(spec("CALL_1N", Op1, 0x0F, V5, false, false));

        // 2OP
        insert(spec("JE", Op2, 0x01, V3, false, true));
        insert(spec("JL", Op2, 0x02, V3, false, true));
        insert(spec("JG", Op2, 0x03, V3, false, true));
        insert(spec("DEC_CHK", Op2, 0x04, V3, false, true));
        insert(spec("INC_CHK", Op2, 0x05, V3, false, true));
        insert(spec("JIN", Op2, 0x06, V3, false, true));
        insert(spec("TEST", Op2, 0x07, V3, false, true));
        insert(spec("OR", Op2, 0x08, V3, true, false));
        insert(spec("AND", Op2, 0x09, V3, true, false));
        insert(spec("TEST_ATTR", Op2, 0x0A, V3, false, true));
        insert(spec("SET_ATTR", Op2, 0x0B, V3, false, false));
        insert(spec("CLEAR_ATTR", Op2, 0x0C, V3, false, false));
        insert(spec("STORE", Op2, 0x0D, V3, false, false));
        insert(spec("INSERT_OBJ", Op2, 0x0E, V3, false, false));
        insert(spec("LOADW", Op2, 0x0F, V3, true, false));
        insert(spec("LOADB", Op2, 0x10, V3, true, false));
        insert(spec("GET_PROP", Op2, 0x11, V3, true, false));
        insert(spec("GET_PROP_ADDR", Op2, 0x12, V3, true, false));
        insert(spec("GET_NEXT_PROP", Op2, 0x13, V3, true, false));
        insert(spec("ADD", Op2, 0x14, V3, true, false));
        insert(spec("SUB", Op2, 0x15, V3, true, false));
        insert(spec("MUL", Op2, 0x16, V3, true, false));
        insert(spec("DIV", Op2, 0x17, V3, true, false));
        insert(spec("MOD", Op2, 0x18, V3, true, false));
        insert(spec("CALL_2S", Op2, 0x19, V4, true, false));
        insert(spec("CALL_2N", Op2, 0x1A, V5, false, false));
        insert(spec("SET_COLOUR", Op2, 0x1B, V5, false, false));
        insert(spec("THROW", Op2, 0x1C, V5, false, false));

        // VAR
        insert(spec("CALL_VS", Var, 0x00, V3, true, false));
        insert(spec("STOREW", Var, 0x01, V3, false, false));
        insert(spec("STOREB", Var, 0x02, V3, false, false));
        insert(spec("PUT_PROP", Var, 0x03, V3, false, false));
        insert(spec("SREAD", Var, 0x04, V3, false, false));
        insert(spec("AREAD", Var, 0x04, V5, true, false));
        insert(spec("PRINT_CHAR", Var, 0x05, V3, false, false));
        insert(spec("PRINT_NUM", Var, 0x06, V3, false, false));
        insert(spec("RANDOM", Var, 0x07, V3, true, false));
        insert(spec("PUSH", Var, 0x08, V3, false, false));
        insert(spec("PULL", Var, 0x09, V3, false, false));
        insert(spec("SPLIT_WINDOW", Var, 0x0A, V3, false, false));
        insert(spec("SET_WINDOW", Var, 0x0B, V3, false, false));
        insert(spec("CALL_VS2", Var, 0x0C, V4, true, false));
        insert(spec("ERASE_WINDOW", Var, 0x0D, V4, false, false));
        insert(spec("ERASE_LINE", Var, 0x0E, V4, false, false));
        insert(spec("SET_CURSOR", Var, 0x0F, V4, false, false));
        insert(spec("GET_CURSOR", Var, 0x10, V4, false, false));
        insert(spec("SET_TEXT_STYLE", Var, 0x11, V4, false, false));
        insert(spec("BUFFER_MODE", Var, 0x12, V4, false, false));
        insert(spec("OUTPUT_STREAM", Var, 0x13, V3, false, false));
        insert(spec("INPUT_STREAM", Var, 0x14, V3, false, false));
        insert(spec("SOUND_EFFECT", Var, 0x15, V4, false, false));
        insert(spec("READ_CHAR", Var, 0x16, V4, true, false));
        insert(spec("SCAN_TABLE", Var, 0x17, V4, true, true));
        insert(spec("NOT_VAR", Var, 0x18, V5, true, false));
        insert(spec("CALL_VN", Var, 0x19, V5, false, false));
        insert(spec("CALL_VN2", Var, 0x1A, V5, false, false));
        insert(spec("TOKENISE", Var, 0x1B, V5, false, false));
        insert(spec("ENCODE_TEXT", Var, 0x1C, V5, false, false));
        insert(spec("COPY_TABLE", Var, 0x1D, V5, false, false));
        insert(spec("PRINT_TABLE", Var, 0x1E, V5, false, false));
        insert(spec("CHECK_ARG_COUNT", Var, 0x1F, V5, false, true));

        m
    };
}

pub fn lookup(mnemonic: &str) -> Option<&'static OpcodeSpec> {
    OPCODES.get(mnemonic)
}
