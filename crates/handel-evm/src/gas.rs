//! Gas cost calculations

use crate::error::{EvmError, EvmResult};
use crate::opcode::Opcode;
use crate::word;
use primitive_types::U256;

/// Gas costs for EVM operations (Frontier/Homestead schedule)
pub mod cost {
    /// Zero gas
    pub const ZERO: u64 = 0;
    /// Base gas
    pub const BASE: u64 = 2;
    /// Very low gas
    pub const VERYLOW: u64 = 3;
    /// Low gas
    pub const LOW: u64 = 5;
    /// Mid gas
    pub const MID: u64 = 8;
    /// High gas
    pub const HIGH: u64 = 10;

    /// Exp gas
    pub const EXP: u64 = 10;
    /// Exp gas per significant exponent byte
    pub const EXP_BYTE: u64 = 10;
    /// SHA3 base gas
    pub const SHA3: u64 = 30;
    /// SHA3 word gas
    pub const SHA3_WORD: u64 = 6;

    /// Sload gas
    pub const SLOAD: u64 = 50;
    /// Sstore of a non-zero value into a zero slot
    pub const SSET: u64 = 20000;
    /// Every other sstore
    pub const SRESET: u64 = 5000;

    /// Call gas
    pub const CALL: u64 = 40;
    /// Callcode gas
    pub const CALLCODE: u64 = 40;
    /// Call value transfer gas
    pub const CALL_VALUE: u64 = 9000;
    /// Call stipend
    pub const CALL_STIPEND: u64 = 2300;
    /// Creating an account as a side effect of a call
    pub const NEW_ACCOUNT: u64 = 25000;

    /// Ext code copy base
    pub const EXTCODE: u64 = 20;
    /// Ext code size
    pub const EXTCODESIZE: u64 = 20;
    /// Balance gas
    pub const BALANCE: u64 = 20;
    /// Blockhash gas
    pub const BLOCKHASH: u64 = 20;

    /// Log gas
    pub const LOG: u64 = 375;
    /// Log topic gas
    pub const LOG_TOPIC: u64 = 375;
    /// Log data gas (per byte)
    pub const LOG_DATA: u64 = 8;

    /// Create gas
    pub const CREATE: u64 = 32000;
    /// Selfdestruct gas before Tangerine Whistle
    pub const SELFDESTRUCT: u64 = 0;
    /// Jump dest gas
    pub const JUMPDEST: u64 = 1;
    /// Code deposit gas per byte
    pub const CODE_DEPOSIT: u64 = 200;
    /// Memory gas per word
    pub const MEMORY: u64 = 3;

    /// Max call depth
    pub const MAX_CALL_DEPTH: usize = 1024;
}

/// Gas refunds credited at the end of a transaction
pub mod refund {
    /// Clearing a storage slot
    pub const SCLEAR: u64 = 15000;
    /// Destroying an account
    pub const DESTROY: u64 = 24000;
}

/// Get the fixed part of an opcode's cost.
///
/// CALL, CALLCODE, CREATE, SSTORE and SELFDESTRUCT are priced entirely
/// by their handlers.
pub fn static_gas(opcode: Opcode) -> u64 {
    match opcode {
        // Zero cost
        Opcode::STOP | Opcode::RETURN | Opcode::INVALID |
        Opcode::SSTORE | Opcode::SELFDESTRUCT |
        Opcode::CALL | Opcode::CALLCODE | Opcode::CREATE => cost::ZERO,

        // Base cost (2)
        Opcode::ADDRESS | Opcode::ORIGIN | Opcode::CALLER | Opcode::CALLVALUE |
        Opcode::CALLDATASIZE | Opcode::CODESIZE | Opcode::GASPRICE |
        Opcode::COINBASE | Opcode::TIMESTAMP | Opcode::NUMBER |
        Opcode::DIFFICULTY | Opcode::GASLIMIT | Opcode::POP | Opcode::PC |
        Opcode::MSIZE | Opcode::GAS => cost::BASE,

        // Very low cost (3)
        Opcode::ADD | Opcode::SUB | Opcode::NOT | Opcode::LT | Opcode::GT |
        Opcode::SLT | Opcode::SGT | Opcode::EQ | Opcode::ISZERO |
        Opcode::AND | Opcode::OR | Opcode::XOR | Opcode::BYTE |
        Opcode::CALLDATALOAD | Opcode::MLOAD | Opcode::MSTORE | Opcode::MSTORE8 |
        Opcode::CALLDATACOPY | Opcode::CODECOPY => cost::VERYLOW,
        op if op.push_size() > 0 || op.dup_depth() > 0 || op.swap_depth() > 0 => cost::VERYLOW,

        // Low cost (5)
        Opcode::MUL | Opcode::DIV | Opcode::SDIV | Opcode::MOD |
        Opcode::SMOD | Opcode::SIGNEXTEND => cost::LOW,

        // Mid cost (8)
        Opcode::ADDMOD | Opcode::MULMOD | Opcode::JUMP => cost::MID,

        // High cost (10)
        Opcode::JUMPI => cost::HIGH,

        Opcode::JUMPDEST => cost::JUMPDEST,
        Opcode::EXP => cost::EXP,
        Opcode::SHA3 => cost::SHA3,
        Opcode::BALANCE => cost::BALANCE,
        Opcode::EXTCODESIZE => cost::EXTCODESIZE,
        Opcode::EXTCODECOPY => cost::EXTCODE,
        Opcode::BLOCKHASH => cost::BLOCKHASH,
        Opcode::SLOAD => cost::SLOAD,
        op if op.is_log() => cost::LOG,

        _ => cost::ZERO,
    }
}

/// Number of 32-byte words covering `length` bytes
pub fn words(length: u64) -> u64 {
    length.div_ceil(32)
}

fn checked(value: Option<u64>) -> EvmResult<u64> {
    value.ok_or(EvmError::OutOfGas)
}

/// Per-word part of SHA3
pub fn sha3_word_cost(length: u64) -> EvmResult<u64> {
    checked(cost::SHA3_WORD.checked_mul(words(length)))
}

/// Per-word part of CALLDATACOPY, CODECOPY and EXTCODECOPY
pub fn copy_cost(length: u64) -> EvmResult<u64> {
    checked(cost::MEMORY.checked_mul(words(length)))
}

/// Topic and data part of LOG0..LOG4
pub fn log_cost(topics: usize, length: u64) -> EvmResult<u64> {
    let data = checked(cost::LOG_DATA.checked_mul(length))?;
    checked(data.checked_add(cost::LOG_TOPIC * topics as u64))
}

/// Exponent-size part of EXP
pub fn exp_cost(exponent: &U256) -> u64 {
    cost::EXP_BYTE * word::byte_length(exponent)
}

/// SSTORE cost for a write changing a slot from `previous` to `new`
pub fn sstore_cost(previous_is_zero: bool, new_is_zero: bool) -> u64 {
    if !new_is_zero && previous_is_zero {
        cost::SSET
    } else {
        cost::SRESET
    }
}

/// Remaining gas of a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GasMeter {
    remaining: u64,
}

impl GasMeter {
    /// Meter holding `gas`
    pub fn new(gas: u64) -> Self {
        Self { remaining: gas }
    }

    /// Gas left
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Deduct `amount`, leaving the meter untouched when it cannot be paid
    pub fn charge(&mut self, amount: u64) -> EvmResult<()> {
        if self.remaining < amount {
            return Err(EvmError::OutOfGas);
        }
        self.remaining -= amount;
        Ok(())
    }

    /// Return unused gas
    pub fn refund(&mut self, amount: u64) {
        self.remaining = self.remaining.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_gas() {
        assert_eq!(static_gas(Opcode::STOP), 0);
        assert_eq!(static_gas(Opcode::ADD), 3);
        assert_eq!(static_gas(Opcode::MUL), 5);
        assert_eq!(static_gas(Opcode::JUMP), 8);
        assert_eq!(static_gas(Opcode::JUMPI), 10);
    }

    #[test]
    fn test_static_gas_all_categories() {
        for op in [Opcode::ADDRESS, Opcode::COINBASE, Opcode::DIFFICULTY, Opcode::PC, Opcode::MSIZE, Opcode::GAS] {
            assert_eq!(static_gas(op), cost::BASE, "{:?}", op);
        }
        for op in [Opcode::PUSH1, Opcode::PUSH32, Opcode::DUP1, Opcode::DUP16, Opcode::SWAP1, Opcode::SWAP16] {
            assert_eq!(static_gas(op), cost::VERYLOW, "{:?}", op);
        }
        assert_eq!(static_gas(Opcode::SIGNEXTEND), cost::LOW);
        assert_eq!(static_gas(Opcode::MULMOD), cost::MID);
        assert_eq!(static_gas(Opcode::JUMPDEST), 1);
        assert_eq!(static_gas(Opcode::SLOAD), 50);
        assert_eq!(static_gas(Opcode::BALANCE), 20);
        assert_eq!(static_gas(Opcode::EXTCODECOPY), 20);
        assert_eq!(static_gas(Opcode::BLOCKHASH), 20);
        assert_eq!(static_gas(Opcode::SHA3), 30);
        assert_eq!(static_gas(Opcode::LOG0), 375);
        assert_eq!(static_gas(Opcode::LOG4), 375);
    }

    #[test]
    fn test_static_gas_handler_priced() {
        for op in [Opcode::SSTORE, Opcode::CALL, Opcode::CALLCODE, Opcode::CREATE, Opcode::SELFDESTRUCT] {
            assert_eq!(static_gas(op), 0, "{:?}", op);
        }
    }

    #[test]
    fn test_words_rounding() {
        assert_eq!(words(0), 0);
        assert_eq!(words(1), 1);
        assert_eq!(words(32), 1);
        assert_eq!(words(33), 2);
        assert_eq!(words(u64::MAX), u64::MAX / 32 + 1);
    }

    #[test]
    fn test_dynamic_costs() {
        assert_eq!(sha3_word_cost(64).unwrap(), 12);
        assert_eq!(copy_cost(33).unwrap(), 6);
        assert_eq!(log_cost(2, 10).unwrap(), 2 * 375 + 80);
        assert!(matches!(log_cost(0, u64::MAX), Err(EvmError::OutOfGas)));
    }

    #[test]
    fn test_exp_gas_byte_count() {
        assert_eq!(exp_cost(&U256::zero()), 0);
        assert_eq!(exp_cost(&U256::from(0xff)), 10);
        assert_eq!(exp_cost(&U256::from(0x100)), 20);
        assert_eq!(exp_cost(&U256::MAX), 320);
    }

    #[test]
    fn test_sstore_costs() {
        assert_eq!(sstore_cost(true, false), cost::SSET);
        assert_eq!(sstore_cost(false, false), cost::SRESET);
        assert_eq!(sstore_cost(false, true), cost::SRESET);
        assert_eq!(sstore_cost(true, true), cost::SRESET);
    }

    #[test]
    fn test_gas_meter_is_atomic() {
        let mut meter = GasMeter::new(10);
        meter.charge(4).unwrap();
        assert_eq!(meter.remaining(), 6);
        assert!(matches!(meter.charge(7), Err(EvmError::OutOfGas)));
        assert_eq!(meter.remaining(), 6);
        meter.charge(6).unwrap();
        assert_eq!(meter.remaining(), 0);
        meter.refund(3);
        assert_eq!(meter.remaining(), 3);
    }
}
