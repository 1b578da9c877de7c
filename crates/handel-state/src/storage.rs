//! In-memory account storage with a shared rollback journal

use crate::error::{StateError, StateResult};
use crate::traits::{Snapshot, Storage, StorageProvider, EMPTY_STORAGE_ROOT};
use handel_crypto::keccak256;
use handel_primitives::{Address, H256, U256};
use std::collections::{BTreeMap, HashMap};

type Slots = BTreeMap<U256, Vec<u8>>;

/// A single journaled write: which slot, and what it held before
#[derive(Clone, Debug)]
struct StorageChange {
    address: Address,
    index: U256,
    previous: Option<Vec<u8>>,
}

/// Storage for every account in one place.
///
/// All accounts share one journal, so restoring a snapshot taken for one
/// account also rewinds writes that nested frames made to other accounts
/// after that point.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorageProvider {
    accounts: HashMap<Address, Slots>,
    journal: Vec<StorageChange>,
}

impl MemoryStorageProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot without journaling
    pub fn insert(&mut self, address: Address, index: U256, value: U256) {
        self.accounts
            .entry(address)
            .or_default()
            .insert(index, trimmed(value));
    }

    /// Numeric value of a slot, zero when unset
    pub fn value(&self, address: &Address, index: &U256) -> U256 {
        self.accounts
            .get(address)
            .and_then(|slots| slots.get(index))
            .map(|bytes| U256::from_big_endian(tail32(bytes)))
            .unwrap_or_default()
    }

    /// Non-zero slots of an account, in key order
    pub fn non_zero_slots(&self, address: &Address) -> Vec<(U256, U256)> {
        self.accounts
            .get(address)
            .map(|slots| {
                slots
                    .iter()
                    .map(|(k, v)| (*k, U256::from_big_endian(tail32(v))))
                    .filter(|(_, v)| !v.is_zero())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn get_or_create_storage<'a>(&'a mut self, address: &Address) -> StateResult<Box<dyn Storage + 'a>> {
        let slots = self.accounts.entry(*address).or_default();
        Ok(Box::new(AccountStorage {
            address: *address,
            slots,
            journal: &mut self.journal,
        }))
    }

    fn take_snapshot(&mut self, _address: &Address) -> Snapshot {
        Snapshot(self.journal.len())
    }

    fn restore(&mut self, address: &Address, snapshot: Snapshot) -> StateResult<()> {
        if snapshot.0 > self.journal.len() {
            return Err(StateError::UnknownSnapshot {
                position: snapshot.0,
                journal_len: self.journal.len(),
            });
        }
        while self.journal.len() > snapshot.0 {
            if let Some(change) = self.journal.pop() {
                let slots = self.accounts.entry(change.address).or_default();
                match change.previous {
                    Some(bytes) => slots.insert(change.index, bytes),
                    None => slots.remove(&change.index),
                };
            }
        }
        tracing::trace!(%address, position = snapshot.0, "storage restored");
        Ok(())
    }
}

/// Borrowed view of one account's slots
struct AccountStorage<'a> {
    address: Address,
    slots: &'a mut Slots,
    journal: &'a mut Vec<StorageChange>,
}

impl Storage for AccountStorage<'_> {
    fn get(&self, index: &U256) -> StateResult<Vec<u8>> {
        Ok(self.slots.get(index).cloned().unwrap_or_default())
    }

    fn set(&mut self, index: U256, value: Vec<u8>) -> StateResult<()> {
        let previous = self.slots.insert(index, value);
        self.journal.push(StorageChange {
            address: self.address,
            index,
            previous,
        });
        Ok(())
    }

    fn root(&self) -> H256 {
        storage_root(self.slots)
    }
}

/// Keccak-256 over the sorted non-zero `(key, value)` pairs, each as 32-byte words
fn storage_root(slots: &Slots) -> H256 {
    let mut preimage = Vec::new();
    for (index, value) in slots {
        let value = U256::from_big_endian(tail32(value));
        if value.is_zero() {
            continue;
        }
        preimage.extend_from_slice(H256::from_u256(*index).as_bytes());
        preimage.extend_from_slice(H256::from_u256(value).as_bytes());
    }
    if preimage.is_empty() {
        EMPTY_STORAGE_ROOT
    } else {
        keccak256(&preimage)
    }
}

fn tail32(bytes: &[u8]) -> &[u8] {
    &bytes[bytes.len().saturating_sub(32)..]
}

fn trimmed(value: U256) -> Vec<u8> {
    let word = H256::from_u256(value);
    let start = word.as_bytes().iter().position(|b| *b != 0).unwrap_or(31);
    word.as_bytes()[start..].to_vec()
}
