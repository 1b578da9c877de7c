//! Interfaces the interpreter consumes for world state, storage and block hashes

use crate::error::StateResult;
use handel_primitives::{Address, H256, U256};

/// Account data
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Account nonce
    pub nonce: u64,
    /// Account balance
    pub balance: U256,
    /// Code hash (keccak256 of code, or EMPTY_CODE_HASH if no code)
    pub code_hash: H256,
    /// Storage root reported by the storage provider
    pub storage_root: H256,
}

/// Empty code hash (keccak256 of empty bytes)
pub const EMPTY_CODE_HASH: H256 = H256::from_bytes([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c,
    0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b,
    0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Empty storage root (keccak256 of RLP encoded empty string)
pub const EMPTY_STORAGE_ROOT: H256 = H256::from_bytes([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6,
    0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0,
    0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
]);

impl Account {
    /// Create a fresh account holding `balance`
    pub fn with_balance(balance: U256) -> Self {
        Self {
            nonce: 0,
            balance,
            code_hash: EMPTY_CODE_HASH,
            storage_root: EMPTY_STORAGE_ROOT,
        }
    }

    /// No nonce, no balance, no code
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && self.code_hash == EMPTY_CODE_HASH
    }

    /// Check if account has code
    pub fn has_code(&self) -> bool {
        self.code_hash != EMPTY_CODE_HASH
    }
}

/// Signed balance adjustment. Arithmetic wraps modulo 2^256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceDelta {
    /// Add to the balance
    Credit(U256),
    /// Subtract from the balance
    Debit(U256),
}

impl BalanceDelta {
    /// Apply the delta to `balance`
    pub fn apply(self, balance: U256) -> U256 {
        match self {
            BalanceDelta::Credit(amount) => balance.overflowing_add(amount).0,
            BalanceDelta::Debit(amount) => balance.overflowing_sub(amount).0,
        }
    }
}

/// Opaque restore point handed out by a provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Snapshot(pub(crate) usize);

impl Snapshot {
    /// Position of the restore point in the provider's journal
    pub fn position(&self) -> usize {
        self.0
    }
}

/// Balances, nonces and code of every account
pub trait WorldStateProvider {
    /// Current balance, zero for a missing account
    fn balance(&self, address: &Address) -> StateResult<U256>;

    /// Adjust a balance, creating the account if needed
    fn update_balance(&mut self, address: &Address, delta: BalanceDelta) -> StateResult<()>;

    /// Check whether the account is present at all
    fn account_exists(&self, address: &Address) -> StateResult<bool>;

    /// Check whether the account is missing or empty
    fn is_empty_account(&self, address: &Address) -> StateResult<bool>;

    /// Create (or reset) an account with the given balance
    fn create_account(&mut self, address: &Address, balance: U256) -> StateResult<()>;

    /// Bump the account nonce by one
    fn increment_nonce(&mut self, address: &Address) -> StateResult<()>;

    /// Current nonce, zero for a missing account
    fn nonce(&self, address: &Address) -> StateResult<u64>;

    /// Code of the account, empty for a missing account
    fn code(&self, address: &Address) -> StateResult<Vec<u8>>;

    /// Store code by content and return its hash
    fn update_code(&mut self, code: &[u8]) -> StateResult<H256>;

    /// Point an account at previously stored code
    fn update_code_hash(&mut self, address: &Address, code_hash: H256) -> StateResult<()>;

    /// Record a new storage root for the account
    fn update_storage_root(&mut self, address: &Address, storage_root: H256) -> StateResult<()>;

    /// Capture a restore point
    fn take_snapshot(&mut self) -> Snapshot;

    /// Rewind every change made after `snapshot`
    fn restore(&mut self, snapshot: Snapshot) -> StateResult<()>;
}

/// Key-value storage of a single account
pub trait Storage {
    /// Stored bytes for `index`, empty when unset
    fn get(&self, index: &U256) -> StateResult<Vec<u8>>;

    /// Overwrite the value at `index`
    fn set(&mut self, index: U256, value: Vec<u8>) -> StateResult<()>;

    /// Commitment over the current contents
    fn root(&self) -> H256;
}

/// Per-account storage with snapshot/restore
pub trait StorageProvider {
    /// Storage of `address`, created empty on first use
    fn get_or_create_storage<'a>(&'a mut self, address: &Address) -> StateResult<Box<dyn Storage + 'a>>;

    /// Capture a restore point covering `address`
    fn take_snapshot(&mut self, address: &Address) -> Snapshot;

    /// Rewind storage of `address` to `snapshot`
    fn restore(&mut self, address: &Address, snapshot: Snapshot) -> StateResult<()>;
}

/// Historical block hashes
pub trait BlockhashProvider {
    /// Hash of the block `lookback` blocks before `current_number`.
    ///
    /// Distances beyond 256, or reaching before genesis, yield a zero hash.
    fn block_hash(&self, current_number: u64, lookback: u64) -> H256;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_account() {
        let account = Account::with_balance(U256::zero());
        assert!(account.is_empty());
        assert!(!account.has_code());
    }

    #[test]
    fn test_account_with_balance() {
        let account = Account::with_balance(U256::from(100));
        assert!(!account.is_empty());
    }

    #[test]
    fn test_account_with_nonce_is_not_empty() {
        let mut account = Account::with_balance(U256::zero());
        account.nonce = 1;
        assert!(!account.is_empty());
    }

    #[test]
    fn test_balance_delta_wraps() {
        assert_eq!(BalanceDelta::Credit(U256::from(5)).apply(U256::from(10)), U256::from(15));
        assert_eq!(BalanceDelta::Debit(U256::from(5)).apply(U256::from(10)), U256::from(5));
        assert_eq!(BalanceDelta::Debit(U256::one()).apply(U256::zero()), U256::MAX);
        assert_eq!(BalanceDelta::Credit(U256::one()).apply(U256::MAX), U256::zero());
    }
}
