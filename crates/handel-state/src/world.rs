//! In-memory world state with a rollback journal

use crate::error::{StateError, StateResult};
use crate::traits::{Account, BalanceDelta, Snapshot, WorldStateProvider, EMPTY_CODE_HASH};
use handel_crypto::keccak256;
use handel_primitives::{Address, H256, U256};
use std::collections::HashMap;

/// World state kept in hash maps.
///
/// Every account mutation records the previous account value in a journal;
/// a snapshot is the journal length, and restoring pops entries back to it.
/// Code is content-addressed and never rolled back.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorldState {
    accounts: HashMap<Address, Account>,
    code: HashMap<H256, Vec<u8>>,
    journal: Vec<(Address, Option<Account>)>,
}

impl MemoryWorldState {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without journaling
    pub fn insert_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Seed code for an account without journaling, creating the account if needed
    pub fn insert_code(&mut self, address: Address, code: Vec<u8>) {
        let code_hash = keccak256(&code);
        self.code.insert(code_hash, code);
        self.accounts
            .entry(address)
            .or_insert_with(|| Account::with_balance(U256::zero()))
            .code_hash = code_hash;
    }

    /// Look up an account
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Iterate over all accounts
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Number of journal entries since creation
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    fn modify(&mut self, address: &Address, f: impl FnOnce(&mut Account)) {
        let previous = self.accounts.get(address).cloned();
        self.journal.push((*address, previous));
        let account = self
            .accounts
            .entry(*address)
            .or_insert_with(|| Account::with_balance(U256::zero()));
        f(account);
    }
}

impl WorldStateProvider for MemoryWorldState {
    fn balance(&self, address: &Address) -> StateResult<U256> {
        Ok(self.accounts.get(address).map(|a| a.balance).unwrap_or_default())
    }

    fn update_balance(&mut self, address: &Address, delta: BalanceDelta) -> StateResult<()> {
        self.modify(address, |account| account.balance = delta.apply(account.balance));
        Ok(())
    }

    fn account_exists(&self, address: &Address) -> StateResult<bool> {
        Ok(self.accounts.contains_key(address))
    }

    fn is_empty_account(&self, address: &Address) -> StateResult<bool> {
        Ok(self.accounts.get(address).map_or(true, Account::is_empty))
    }

    fn create_account(&mut self, address: &Address, balance: U256) -> StateResult<()> {
        self.modify(address, |account| *account = Account::with_balance(balance));
        Ok(())
    }

    fn increment_nonce(&mut self, address: &Address) -> StateResult<()> {
        self.modify(address, |account| account.nonce = account.nonce.wrapping_add(1));
        Ok(())
    }

    fn nonce(&self, address: &Address) -> StateResult<u64> {
        Ok(self.accounts.get(address).map(|a| a.nonce).unwrap_or(0))
    }

    fn code(&self, address: &Address) -> StateResult<Vec<u8>> {
        let code_hash = match self.accounts.get(address) {
            Some(account) if account.code_hash != EMPTY_CODE_HASH => account.code_hash,
            _ => return Ok(Vec::new()),
        };
        self.code
            .get(&code_hash)
            .cloned()
            .ok_or(StateError::UnknownCode(code_hash))
    }

    fn update_code(&mut self, code: &[u8]) -> StateResult<H256> {
        let code_hash = keccak256(code);
        self.code.entry(code_hash).or_insert_with(|| code.to_vec());
        Ok(code_hash)
    }

    fn update_code_hash(&mut self, address: &Address, code_hash: H256) -> StateResult<()> {
        if !self.accounts.contains_key(address) {
            return Err(StateError::AccountNotFound(*address));
        }
        if code_hash != EMPTY_CODE_HASH && !self.code.contains_key(&code_hash) {
            return Err(StateError::UnknownCode(code_hash));
        }
        self.modify(address, |account| account.code_hash = code_hash);
        Ok(())
    }

    fn update_storage_root(&mut self, address: &Address, storage_root: H256) -> StateResult<()> {
        self.modify(address, |account| account.storage_root = storage_root);
        Ok(())
    }

    fn take_snapshot(&mut self) -> Snapshot {
        Snapshot(self.journal.len())
    }

    fn restore(&mut self, snapshot: Snapshot) -> StateResult<()> {
        if snapshot.0 > self.journal.len() {
            return Err(StateError::UnknownSnapshot {
                position: snapshot.0,
                journal_len: self.journal.len(),
            });
        }
        while self.journal.len() > snapshot.0 {
            if let Some((address, previous)) = self.journal.pop() {
                match previous {
                    Some(account) => self.accounts.insert(address, account),
                    None => self.accounts.remove(&address),
                };
            }
        }
        tracing::trace!(position = snapshot.0, "world state restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn test_missing_account_defaults() {
        let world = MemoryWorldState::new();
        assert_eq!(world.balance(&addr(1)).unwrap(), U256::zero());
        assert_eq!(world.nonce(&addr(1)).unwrap(), 0);
        assert!(world.code(&addr(1)).unwrap().is_empty());
        assert!(!world.account_exists(&addr(1)).unwrap());
        assert!(world.is_empty_account(&addr(1)).unwrap());
    }

    #[test]
    fn test_balance_updates() {
        let mut world = MemoryWorldState::new();
        world.create_account(&addr(1), U256::from(100)).unwrap();
        world.update_balance(&addr(1), BalanceDelta::Debit(U256::from(30))).unwrap();
        world.update_balance(&addr(2), BalanceDelta::Credit(U256::from(30))).unwrap();

        assert_eq!(world.balance(&addr(1)).unwrap(), U256::from(70));
        assert_eq!(world.balance(&addr(2)).unwrap(), U256::from(30));
        assert!(world.account_exists(&addr(2)).unwrap());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut world = MemoryWorldState::new();
        world.create_account(&addr(1), U256::from(100)).unwrap();

        let snapshot = world.take_snapshot();
        world.update_balance(&addr(1), BalanceDelta::Debit(U256::from(40))).unwrap();
        world.create_account(&addr(2), U256::from(40)).unwrap();
        world.increment_nonce(&addr(1)).unwrap();

        world.restore(snapshot).unwrap();
        assert_eq!(world.balance(&addr(1)).unwrap(), U256::from(100));
        assert_eq!(world.nonce(&addr(1)).unwrap(), 0);
        assert!(!world.account_exists(&addr(2)).unwrap());
    }

    #[test]
    fn test_nested_snapshots() {
        let mut world = MemoryWorldState::new();
        world.create_account(&addr(1), U256::from(10)).unwrap();

        let outer = world.take_snapshot();
        world.update_balance(&addr(1), BalanceDelta::Credit(U256::from(1))).unwrap();
        let inner = world.take_snapshot();
        world.update_balance(&addr(1), BalanceDelta::Credit(U256::from(1))).unwrap();

        world.restore(inner).unwrap();
        assert_eq!(world.balance(&addr(1)).unwrap(), U256::from(11));
        world.restore(outer).unwrap();
        assert_eq!(world.balance(&addr(1)).unwrap(), U256::from(10));
    }

    #[test]
    fn test_restore_unknown_snapshot() {
        let mut world = MemoryWorldState::new();
        let err = world.restore(Snapshot(5)).unwrap_err();
        assert_eq!(err, StateError::UnknownSnapshot { position: 5, journal_len: 0 });
    }

    #[test]
    fn test_code_roundtrip() {
        let mut world = MemoryWorldState::new();
        world.create_account(&addr(1), U256::zero()).unwrap();
        let hash = world.update_code(&[0x60, 0x00]).unwrap();
        world.update_code_hash(&addr(1), hash).unwrap();

        assert_eq!(world.code(&addr(1)).unwrap(), vec![0x60, 0x00]);
        assert!(!world.is_empty_account(&addr(1)).unwrap());
    }

    #[test]
    fn test_update_code_hash_requires_account() {
        let mut world = MemoryWorldState::new();
        let hash = world.update_code(&[0x00]).unwrap();
        assert_eq!(
            world.update_code_hash(&addr(9), hash),
            Err(StateError::AccountNotFound(addr(9)))
        );
    }

    #[test]
    fn test_seeded_code_is_not_journaled() {
        let mut world = MemoryWorldState::new();
        world.insert_code(addr(3), vec![0x00]);
        assert_eq!(world.journal_len(), 0);
        assert_eq!(world.code(&addr(3)).unwrap(), vec![0x00]);
    }
}
