//! Block hash lookup for BLOCKHASH

use crate::traits::BlockhashProvider;
use handel_crypto::keccak256;
use handel_primitives::H256;
use std::collections::HashMap;

/// Oldest block reachable from the current one
pub const MAX_LOOKBACK: u64 = 256;

/// Block hashes from an explicit table, falling back to
/// `keccak256(decimal block number)` for blocks not in the table.
#[derive(Clone, Debug, Default)]
pub struct FixedBlockhashProvider {
    hashes: HashMap<u64, H256>,
}

impl FixedBlockhashProvider {
    /// Provider with no explicit entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the hash of block `number`
    pub fn with_hash(mut self, number: u64, hash: H256) -> Self {
        self.hashes.insert(number, hash);
        self
    }
}

impl BlockhashProvider for FixedBlockhashProvider {
    fn block_hash(&self, current_number: u64, lookback: u64) -> H256 {
        if lookback == 0 || lookback > MAX_LOOKBACK || lookback > current_number {
            return H256::ZERO;
        }
        let number = current_number - lookback;
        self.hashes
            .get(&number)
            .copied()
            .unwrap_or_else(|| keccak256(number.to_string().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_hash() {
        let provider = FixedBlockhashProvider::new();
        assert_eq!(provider.block_hash(10, 1), keccak256(b"9"));
        assert_eq!(provider.block_hash(300, 256), keccak256(b"44"));
    }

    #[test]
    fn test_out_of_range_is_zero() {
        let provider = FixedBlockhashProvider::new();
        assert_eq!(provider.block_hash(1000, 257), H256::ZERO);
        assert_eq!(provider.block_hash(1000, 0), H256::ZERO);
        assert_eq!(provider.block_hash(3, 4), H256::ZERO);
    }

    #[test]
    fn test_pinned_hash() {
        let pinned = H256::from_bytes([7u8; 32]);
        let provider = FixedBlockhashProvider::new().with_hash(99, pinned);
        assert_eq!(provider.block_hash(100, 1), pinned);
    }
}
