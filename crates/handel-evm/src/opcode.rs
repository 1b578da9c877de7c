//! EVM opcode definitions

/// Frontier/Homestead opcodes (see Yellow Paper Appendix H)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    // Stop and Arithmetic
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,

    // Comparison & Bitwise Logic
    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,

    // SHA3
    SHA3 = 0x20,

    // Environmental Information
    ADDRESS = 0x30,
    BALANCE = 0x31,
    ORIGIN = 0x32,
    CALLER = 0x33,
    CALLVALUE = 0x34,
    CALLDATALOAD = 0x35,
    CALLDATASIZE = 0x36,
    CALLDATACOPY = 0x37,
    CODESIZE = 0x38,
    CODECOPY = 0x39,
    GASPRICE = 0x3A,
    EXTCODESIZE = 0x3B,
    EXTCODECOPY = 0x3C,

    // Block Information
    BLOCKHASH = 0x40,
    COINBASE = 0x41,
    TIMESTAMP = 0x42,
    NUMBER = 0x43,
    DIFFICULTY = 0x44,
    GASLIMIT = 0x45,

    // Stack, Memory, Storage and Flow Operations
    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    SLOAD = 0x54,
    SSTORE = 0x55,
    JUMP = 0x56,
    JUMPI = 0x57,
    PC = 0x58,
    MSIZE = 0x59,
    GAS = 0x5A,
    JUMPDEST = 0x5B,

    // Push Operations
    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,
    PUSH9 = 0x68,
    PUSH10 = 0x69,
    PUSH11 = 0x6A,
    PUSH12 = 0x6B,
    PUSH13 = 0x6C,
    PUSH14 = 0x6D,
    PUSH15 = 0x6E,
    PUSH16 = 0x6F,
    PUSH17 = 0x70,
    PUSH18 = 0x71,
    PUSH19 = 0x72,
    PUSH20 = 0x73,
    PUSH21 = 0x74,
    PUSH22 = 0x75,
    PUSH23 = 0x76,
    PUSH24 = 0x77,
    PUSH25 = 0x78,
    PUSH26 = 0x79,
    PUSH27 = 0x7A,
    PUSH28 = 0x7B,
    PUSH29 = 0x7C,
    PUSH30 = 0x7D,
    PUSH31 = 0x7E,
    PUSH32 = 0x7F,

    // Dup Operations
    DUP1 = 0x80,
    DUP2 = 0x81,
    DUP3 = 0x82,
    DUP4 = 0x83,
    DUP5 = 0x84,
    DUP6 = 0x85,
    DUP7 = 0x86,
    DUP8 = 0x87,
    DUP9 = 0x88,
    DUP10 = 0x89,
    DUP11 = 0x8A,
    DUP12 = 0x8B,
    DUP13 = 0x8C,
    DUP14 = 0x8D,
    DUP15 = 0x8E,
    DUP16 = 0x8F,

    // Swap Operations
    SWAP1 = 0x90,
    SWAP2 = 0x91,
    SWAP3 = 0x92,
    SWAP4 = 0x93,
    SWAP5 = 0x94,
    SWAP6 = 0x95,
    SWAP7 = 0x96,
    SWAP8 = 0x97,
    SWAP9 = 0x98,
    SWAP10 = 0x99,
    SWAP11 = 0x9A,
    SWAP12 = 0x9B,
    SWAP13 = 0x9C,
    SWAP14 = 0x9D,
    SWAP15 = 0x9E,
    SWAP16 = 0x9F,

    // Logging
    LOG0 = 0xA0,
    LOG1 = 0xA1,
    LOG2 = 0xA2,
    LOG3 = 0xA3,
    LOG4 = 0xA4,

    // System Operations
    CREATE = 0xF0,
    CALL = 0xF1,
    CALLCODE = 0xF2,
    RETURN = 0xF3,
    INVALID = 0xFE,
    SELFDESTRUCT = 0xFF,
}

impl Opcode {
    /// Try to convert from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        use Opcode::*;
        let opcode = match byte {
            0x00 => STOP,
            0x01 => ADD,
            0x02 => MUL,
            0x03 => SUB,
            0x04 => DIV,
            0x05 => SDIV,
            0x06 => MOD,
            0x07 => SMOD,
            0x08 => ADDMOD,
            0x09 => MULMOD,
            0x0A => EXP,
            0x0B => SIGNEXTEND,
            0x10 => LT,
            0x11 => GT,
            0x12 => SLT,
            0x13 => SGT,
            0x14 => EQ,
            0x15 => ISZERO,
            0x16 => AND,
            0x17 => OR,
            0x18 => XOR,
            0x19 => NOT,
            0x1A => BYTE,
            0x20 => SHA3,
            0x30 => ADDRESS,
            0x31 => BALANCE,
            0x32 => ORIGIN,
            0x33 => CALLER,
            0x34 => CALLVALUE,
            0x35 => CALLDATALOAD,
            0x36 => CALLDATASIZE,
            0x37 => CALLDATACOPY,
            0x38 => CODESIZE,
            0x39 => CODECOPY,
            0x3A => GASPRICE,
            0x3B => EXTCODESIZE,
            0x3C => EXTCODECOPY,
            0x40 => BLOCKHASH,
            0x41 => COINBASE,
            0x42 => TIMESTAMP,
            0x43 => NUMBER,
            0x44 => DIFFICULTY,
            0x45 => GASLIMIT,
            0x50 => POP,
            0x51 => MLOAD,
            0x52 => MSTORE,
            0x53 => MSTORE8,
            0x54 => SLOAD,
            0x55 => SSTORE,
            0x56 => JUMP,
            0x57 => JUMPI,
            0x58 => PC,
            0x59 => MSIZE,
            0x5A => GAS,
            0x5B => JUMPDEST,
            0x60 => PUSH1,
            0x61 => PUSH2,
            0x62 => PUSH3,
            0x63 => PUSH4,
            0x64 => PUSH5,
            0x65 => PUSH6,
            0x66 => PUSH7,
            0x67 => PUSH8,
            0x68 => PUSH9,
            0x69 => PUSH10,
            0x6A => PUSH11,
            0x6B => PUSH12,
            0x6C => PUSH13,
            0x6D => PUSH14,
            0x6E => PUSH15,
            0x6F => PUSH16,
            0x70 => PUSH17,
            0x71 => PUSH18,
            0x72 => PUSH19,
            0x73 => PUSH20,
            0x74 => PUSH21,
            0x75 => PUSH22,
            0x76 => PUSH23,
            0x77 => PUSH24,
            0x78 => PUSH25,
            0x79 => PUSH26,
            0x7A => PUSH27,
            0x7B => PUSH28,
            0x7C => PUSH29,
            0x7D => PUSH30,
            0x7E => PUSH31,
            0x7F => PUSH32,
            0x80 => DUP1,
            0x81 => DUP2,
            0x82 => DUP3,
            0x83 => DUP4,
            0x84 => DUP5,
            0x85 => DUP6,
            0x86 => DUP7,
            0x87 => DUP8,
            0x88 => DUP9,
            0x89 => DUP10,
            0x8A => DUP11,
            0x8B => DUP12,
            0x8C => DUP13,
            0x8D => DUP14,
            0x8E => DUP15,
            0x8F => DUP16,
            0x90 => SWAP1,
            0x91 => SWAP2,
            0x92 => SWAP3,
            0x93 => SWAP4,
            0x94 => SWAP5,
            0x95 => SWAP6,
            0x96 => SWAP7,
            0x97 => SWAP8,
            0x98 => SWAP9,
            0x99 => SWAP10,
            0x9A => SWAP11,
            0x9B => SWAP12,
            0x9C => SWAP13,
            0x9D => SWAP14,
            0x9E => SWAP15,
            0x9F => SWAP16,
            0xA0 => LOG0,
            0xA1 => LOG1,
            0xA2 => LOG2,
            0xA3 => LOG3,
            0xA4 => LOG4,
            0xF0 => CREATE,
            0xF1 => CALL,
            0xF2 => CALLCODE,
            0xF3 => RETURN,
            0xFE => INVALID,
            0xFF => SELFDESTRUCT,
            _ => return None,
        };
        Some(opcode)
    }

    /// Mnemonic
    pub fn name(self) -> &'static str {
        use Opcode::*;
        match self {
            STOP => "STOP",
            ADD => "ADD",
            MUL => "MUL",
            SUB => "SUB",
            DIV => "DIV",
            SDIV => "SDIV",
            MOD => "MOD",
            SMOD => "SMOD",
            ADDMOD => "ADDMOD",
            MULMOD => "MULMOD",
            EXP => "EXP",
            SIGNEXTEND => "SIGNEXTEND",
            LT => "LT",
            GT => "GT",
            SLT => "SLT",
            SGT => "SGT",
            EQ => "EQ",
            ISZERO => "ISZERO",
            AND => "AND",
            OR => "OR",
            XOR => "XOR",
            NOT => "NOT",
            BYTE => "BYTE",
            SHA3 => "SHA3",
            ADDRESS => "ADDRESS",
            BALANCE => "BALANCE",
            ORIGIN => "ORIGIN",
            CALLER => "CALLER",
            CALLVALUE => "CALLVALUE",
            CALLDATALOAD => "CALLDATALOAD",
            CALLDATASIZE => "CALLDATASIZE",
            CALLDATACOPY => "CALLDATACOPY",
            CODESIZE => "CODESIZE",
            CODECOPY => "CODECOPY",
            GASPRICE => "GASPRICE",
            EXTCODESIZE => "EXTCODESIZE",
            EXTCODECOPY => "EXTCODECOPY",
            BLOCKHASH => "BLOCKHASH",
            COINBASE => "COINBASE",
            TIMESTAMP => "TIMESTAMP",
            NUMBER => "NUMBER",
            DIFFICULTY => "DIFFICULTY",
            GASLIMIT => "GASLIMIT",
            POP => "POP",
            MLOAD => "MLOAD",
            MSTORE => "MSTORE",
            MSTORE8 => "MSTORE8",
            SLOAD => "SLOAD",
            SSTORE => "SSTORE",
            JUMP => "JUMP",
            JUMPI => "JUMPI",
            PC => "PC",
            MSIZE => "MSIZE",
            GAS => "GAS",
            JUMPDEST => "JUMPDEST",
            PUSH1 => "PUSH1",
            PUSH2 => "PUSH2",
            PUSH3 => "PUSH3",
            PUSH4 => "PUSH4",
            PUSH5 => "PUSH5",
            PUSH6 => "PUSH6",
            PUSH7 => "PUSH7",
            PUSH8 => "PUSH8",
            PUSH9 => "PUSH9",
            PUSH10 => "PUSH10",
            PUSH11 => "PUSH11",
            PUSH12 => "PUSH12",
            PUSH13 => "PUSH13",
            PUSH14 => "PUSH14",
            PUSH15 => "PUSH15",
            PUSH16 => "PUSH16",
            PUSH17 => "PUSH17",
            PUSH18 => "PUSH18",
            PUSH19 => "PUSH19",
            PUSH20 => "PUSH20",
            PUSH21 => "PUSH21",
            PUSH22 => "PUSH22",
            PUSH23 => "PUSH23",
            PUSH24 => "PUSH24",
            PUSH25 => "PUSH25",
            PUSH26 => "PUSH26",
            PUSH27 => "PUSH27",
            PUSH28 => "PUSH28",
            PUSH29 => "PUSH29",
            PUSH30 => "PUSH30",
            PUSH31 => "PUSH31",
            PUSH32 => "PUSH32",
            DUP1 => "DUP1",
            DUP2 => "DUP2",
            DUP3 => "DUP3",
            DUP4 => "DUP4",
            DUP5 => "DUP5",
            DUP6 => "DUP6",
            DUP7 => "DUP7",
            DUP8 => "DUP8",
            DUP9 => "DUP9",
            DUP10 => "DUP10",
            DUP11 => "DUP11",
            DUP12 => "DUP12",
            DUP13 => "DUP13",
            DUP14 => "DUP14",
            DUP15 => "DUP15",
            DUP16 => "DUP16",
            SWAP1 => "SWAP1",
            SWAP2 => "SWAP2",
            SWAP3 => "SWAP3",
            SWAP4 => "SWAP4",
            SWAP5 => "SWAP5",
            SWAP6 => "SWAP6",
            SWAP7 => "SWAP7",
            SWAP8 => "SWAP8",
            SWAP9 => "SWAP9",
            SWAP10 => "SWAP10",
            SWAP11 => "SWAP11",
            SWAP12 => "SWAP12",
            SWAP13 => "SWAP13",
            SWAP14 => "SWAP14",
            SWAP15 => "SWAP15",
            SWAP16 => "SWAP16",
            LOG0 => "LOG0",
            LOG1 => "LOG1",
            LOG2 => "LOG2",
            LOG3 => "LOG3",
            LOG4 => "LOG4",
            CREATE => "CREATE",
            CALL => "CALL",
            CALLCODE => "CALLCODE",
            RETURN => "RETURN",
            INVALID => "INVALID",
            SELFDESTRUCT => "SELFDESTRUCT",
        }
    }

    /// Get PUSH operand size (1-32 for PUSH1-PUSH32, 0 otherwise)
    pub fn push_size(self) -> usize {
        let byte = self as u8;
        if (0x60..=0x7F).contains(&byte) {
            (byte - 0x5F) as usize
        } else {
            0
        }
    }

    /// Get DUP depth (1-16 for DUP1-DUP16, 0 otherwise)
    pub fn dup_depth(self) -> usize {
        let byte = self as u8;
        if (0x80..=0x8F).contains(&byte) {
            (byte - 0x7F) as usize
        } else {
            0
        }
    }

    /// Get SWAP depth (1-16 for SWAP1-SWAP16, 0 otherwise)
    pub fn swap_depth(self) -> usize {
        let byte = self as u8;
        if (0x90..=0x9F).contains(&byte) {
            (byte - 0x8F) as usize
        } else {
            0
        }
    }

    /// Check if this is a LOG opcode
    pub fn is_log(self) -> bool {
        (0xA0..=0xA4).contains(&(self as u8))
    }

    /// Get LOG topic count (0-4 for LOG0-LOG4, 0 otherwise)
    pub fn log_topics(self) -> usize {
        if self.is_log() {
            (self as u8 - 0xA0) as usize
        } else {
            0
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_size() {
        assert_eq!(Opcode::PUSH1.push_size(), 1);
        assert_eq!(Opcode::PUSH16.push_size(), 16);
        assert_eq!(Opcode::PUSH32.push_size(), 32);
        assert_eq!(Opcode::ADD.push_size(), 0);
    }

    #[test]
    fn test_dup_depth() {
        assert_eq!(Opcode::DUP1.dup_depth(), 1);
        assert_eq!(Opcode::DUP16.dup_depth(), 16);
        assert_eq!(Opcode::ADD.dup_depth(), 0);
    }

    #[test]
    fn test_swap_depth() {
        assert_eq!(Opcode::SWAP1.swap_depth(), 1);
        assert_eq!(Opcode::SWAP16.swap_depth(), 16);
        assert_eq!(Opcode::ADD.swap_depth(), 0);
    }

    #[test]
    fn test_log_topics() {
        assert_eq!(Opcode::LOG0.log_topics(), 0);
        assert_eq!(Opcode::LOG4.log_topics(), 4);
        assert_eq!(Opcode::ADD.log_topics(), 0);
        assert!(Opcode::LOG2.is_log());
        assert!(!Opcode::CREATE.is_log());
    }

    #[test]
    fn test_from_byte_roundtrip() {
        let mut defined = 0;
        for byte in 0..=255u8 {
            if let Some(opcode) = Opcode::from_byte(byte) {
                assert_eq!(opcode as u8, byte, "{}", opcode);
                defined += 1;
            }
        }
        // 12 + 11 + 1 + 13 + 6 + 12 + 32 + 16 + 16 + 5 + 6
        assert_eq!(defined, 130);
    }

    #[test]
    fn test_undefined_bytes() {
        // later-fork opcodes are not part of this instruction set
        for byte in [0x0C, 0x1B, 0x1D, 0x3D, 0x3F, 0x46, 0x5C, 0x5F, 0xF4, 0xF5, 0xFA, 0xFD] {
            assert_eq!(Opcode::from_byte(byte), None, "0x{:02x}", byte);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Opcode::SHA3.name(), "SHA3");
        assert_eq!(Opcode::PUSH32.to_string(), "PUSH32");
        assert_eq!(Opcode::SELFDESTRUCT.name(), "SELFDESTRUCT");
    }
}
