//! EVM operand stack
//!
//! Slots keep the representation they were pushed with. PUSH data and
//! memory loads arrive as bytes, arithmetic results as integers, and the
//! conversion to the other form happens only when an opcode pops it.

use crate::error::{EvmError, EvmResult};
use crate::word;
use handel_primitives::Address;
use primitive_types::U256;

/// Max stack size
pub const STACK_LIMIT: usize = 1024;

/// One stack entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Integer form
    Int(U256),
    /// Big-endian bytes, at most 32 significant
    Bytes(Vec<u8>),
}

impl Slot {
    /// Unsigned value of the slot
    pub fn to_u256(&self) -> U256 {
        match self {
            Slot::Int(value) => *value,
            Slot::Bytes(bytes) => word::from_bytes(bytes),
        }
    }

    /// Bytes without leading zeros
    pub fn to_trimmed_bytes(&self) -> Vec<u8> {
        word::to_trimmed_bytes(&self.to_u256())
    }

    /// 32-byte zero-padded form
    pub fn to_word(&self) -> [u8; 32] {
        word::to_word_bytes(&self.to_u256())
    }
}

/// EVM stack (max 1024 items)
#[derive(Clone, Debug)]
pub struct Stack {
    data: Vec<Slot>,
}

impl Stack {
    /// Create a new empty stack
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(STACK_LIMIT),
        }
    }

    fn push(&mut self, slot: Slot) -> EvmResult<()> {
        if self.data.len() >= STACK_LIMIT {
            return Err(EvmError::StackOverflow);
        }
        self.data.push(slot);
        Ok(())
    }

    fn pop(&mut self) -> EvmResult<Slot> {
        self.data.pop().ok_or(EvmError::StackUnderflow)
    }

    /// Push an integer
    pub fn push_int(&mut self, value: U256) -> EvmResult<()> {
        self.push(Slot::Int(value))
    }

    /// Push raw big-endian bytes
    pub fn push_bytes(&mut self, bytes: Vec<u8>) -> EvmResult<()> {
        self.push(Slot::Bytes(bytes))
    }

    /// Push an address as a 20-byte value
    pub fn push_address(&mut self, address: &Address) -> EvmResult<()> {
        self.push_bytes(address.as_bytes().to_vec())
    }

    /// Push 1 or 0
    pub fn push_bool(&mut self, flag: bool) -> EvmResult<()> {
        self.push_int(word::from_bool(flag))
    }

    /// Pop as bytes without leading zeros
    pub fn pop_bytes(&mut self) -> EvmResult<Vec<u8>> {
        Ok(match self.pop()? {
            Slot::Int(value) => word::to_trimmed_bytes(&value),
            Slot::Bytes(bytes) => word::to_trimmed_bytes(&word::from_bytes(&bytes)),
        })
    }

    /// Pop as a 32-byte zero-padded word
    pub fn pop_word(&mut self) -> EvmResult<[u8; 32]> {
        Ok(self.pop()?.to_word())
    }

    /// Pop as an unsigned integer
    pub fn pop_unsigned(&mut self) -> EvmResult<U256> {
        Ok(self.pop()?.to_u256())
    }

    /// Pop as a signed integer
    pub fn pop_signed(&mut self) -> EvmResult<word::Signed> {
        Ok(word::Signed::from_word(self.pop_unsigned()?))
    }

    /// Pop as an address (low 20 bytes of the word)
    pub fn pop_address(&mut self) -> EvmResult<Address> {
        Ok(Address::from_word(&self.pop_word()?))
    }

    /// Discard the top item
    pub fn drop(&mut self) -> EvmResult<()> {
        self.pop().map(|_| ())
    }

    /// Peek at a specific depth (0 = top)
    pub fn peek(&self, depth: usize) -> EvmResult<&Slot> {
        if depth >= self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        Ok(&self.data[self.data.len() - 1 - depth])
    }

    /// Swap top with item at depth (1 = swap with second item)
    pub fn swap(&mut self, depth: usize) -> EvmResult<()> {
        if depth == 0 || depth >= self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        let len = self.data.len();
        self.data.swap(len - 1, len - 1 - depth);
        Ok(())
    }

    /// Duplicate item at depth to top (1 = dup top)
    pub fn dup(&mut self, depth: usize) -> EvmResult<()> {
        if depth == 0 || depth > self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        let slot = self.data[self.data.len() - depth].clone();
        self.push(slot)
    }

    /// Get current stack size
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
