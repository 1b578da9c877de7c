//! EVM memory implementation
//!
//! Memory is word-addressed for pricing: `active_words` only grows, and
//! growing from `a` to `b` words costs `memory_cost(b) - memory_cost(a)`.
//! Callers price an access with [`expansion_cost`] and call
//! [`Memory::grow`] once the gas is paid.

use crate::error::{EvmError, EvmResult};
use crate::gas::cost;
use primitive_types::U256;

/// Total cost of holding `words` words: `Memory * w + w^2 / 512`
pub fn memory_cost(words: u64) -> EvmResult<u64> {
    let words = words as u128;
    let total = cost::MEMORY as u128 * words + words * words / 512;
    u64::try_from(total).map_err(|_| EvmError::OutOfGas)
}

/// Words needed to cover `offset..offset + length`, and the gas owed for
/// growing from `active_words` to that size.
///
/// A zero-length access needs nothing. Ranges that cannot be addressed in
/// 64 bits are priced as unaffordable.
pub fn expansion_cost(active_words: u64, offset: U256, length: U256) -> EvmResult<(u64, u64)> {
    if length.is_zero() {
        return Ok((active_words, 0));
    }
    if offset.bits() > 64 || length.bits() > 64 {
        return Err(EvmError::OutOfGas);
    }
    let end = offset.low_u64() as u128 + length.low_u64() as u128;
    let required = u64::try_from(end.div_ceil(32)).map_err(|_| EvmError::OutOfGas)?;
    if required <= active_words {
        return Ok((active_words, 0));
    }
    let charge = memory_cost(required)? - memory_cost(active_words)?;
    Ok((required, charge))
}

/// EVM memory (byte-addressable, expandable)
#[derive(Clone, Debug, Default)]
pub struct Memory {
    data: Vec<u8>,
    active_words: u64,
}

impl Memory {
    /// Create new empty memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest word touched so far
    pub fn active_words(&self) -> u64 {
        self.active_words
    }

    /// Current memory size in bytes (the MSIZE value)
    pub fn size(&self) -> u64 {
        self.active_words * 32
    }

    /// Price an access against the current size
    pub fn expansion_cost(&self, offset: U256, length: U256) -> EvmResult<(u64, u64)> {
        expansion_cost(self.active_words, offset, length)
    }

    /// Raise the active size to `words`; never shrinks
    pub fn grow(&mut self, words: u64) {
        if words > self.active_words {
            self.active_words = words;
            self.data.resize(words as usize * 32, 0);
        }
    }

    fn ensure(&mut self, end: usize) {
        if end > self.data.len() {
            self.data.resize(end.div_ceil(32) * 32, 0);
        }
    }

    /// Load a byte range, zero-filled past the written area
    pub fn load(&self, offset: usize, length: usize) -> Vec<u8> {
        if length == 0 {
            return Vec::new();
        }

        let mut result = vec![0u8; length];
        if offset < self.data.len() {
            let end = offset.saturating_add(length).min(self.data.len());
            result[..end - offset].copy_from_slice(&self.data[offset..end]);
        }
        result
    }

    /// Load a 32-byte word
    pub fn load_word(&self, offset: usize) -> [u8; 32] {
        let mut word = [0u8; 32];
        word.copy_from_slice(&self.load(offset, 32));
        word
    }

    /// Store a byte slice
    pub fn save(&mut self, offset: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.ensure(offset + data.len());
        self.data[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Store exactly 32 bytes
    pub fn save_word(&mut self, offset: usize, word: &[u8; 32]) {
        self.save(offset, word);
    }

    /// Store a single byte
    pub fn save_byte(&mut self, offset: usize, value: u8) {
        self.ensure(offset + 1);
        self.data[offset] = value;
    }

    /// Get raw data slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
