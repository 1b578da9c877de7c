//! Precompiled contracts
//!
//! Built-in contracts live at addresses 1 to 4 and run natively instead of
//! bytecode. The registry is built once and owned by the interpreter.

use handel_crypto::{recover_address, ripemd160, sha256, Signature};
use handel_primitives::{Address, H256};
use std::collections::BTreeMap;

/// A natively implemented contract
pub trait Precompile: Send + Sync {
    /// Gas charged for running on `input`
    fn cost(&self, input: &[u8]) -> u64;

    /// Output for `input`
    fn execute(&self, input: &[u8]) -> Vec<u8>;
}

/// `base + word * ceil(len / 32)` pricing
#[derive(Clone, Copy, Debug)]
struct Linear {
    base: u64,
    word: u64,
}

impl Linear {
    fn cost(&self, input: &[u8]) -> u64 {
        let words = (input.len() as u64).div_ceil(32);
        self.base.saturating_add(self.word.saturating_mul(words))
    }
}

/// Signer recovery from `hash ‖ v ‖ r ‖ s`
#[derive(Debug)]
pub struct EcRecover;

/// SHA-256 digest
#[derive(Debug)]
pub struct Sha256;

/// RIPEMD-160 digest, left-padded to 32 bytes
#[derive(Debug)]
pub struct Ripemd160;

/// Returns its input
#[derive(Debug)]
pub struct Identity;

impl Precompile for EcRecover {
    fn cost(&self, _input: &[u8]) -> u64 {
        3000
    }

    fn execute(&self, input: &[u8]) -> Vec<u8> {
        let mut padded = [0u8; 128];
        let len = input.len().min(128);
        padded[..len].copy_from_slice(&input[..len]);

        let v = &padded[32..64];
        let recovery = match v[31] {
            27 | 28 if v[..31].iter().all(|b| *b == 0) => v[31],
            _ => return Vec::new(),
        };

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&padded[..32]);
        let mut r = [0u8; 32];
        r.copy_from_slice(&padded[64..96]);
        let mut s = [0u8; 32];
        s.copy_from_slice(&padded[96..128]);

        match recover_address(&H256::from_bytes(hash), &Signature::new(r, s, recovery)) {
            Ok(address) => {
                let mut output = vec![0u8; 12];
                output.extend_from_slice(address.as_bytes());
                output
            }
            Err(err) => {
                tracing::debug!(%err, "ecrecover failed");
                Vec::new()
            }
        }
    }
}

impl Precompile for Sha256 {
    fn cost(&self, input: &[u8]) -> u64 {
        Linear { base: 60, word: 12 }.cost(input)
    }

    fn execute(&self, input: &[u8]) -> Vec<u8> {
        sha256(input).to_vec()
    }
}

impl Precompile for Ripemd160 {
    fn cost(&self, input: &[u8]) -> u64 {
        Linear { base: 600, word: 120 }.cost(input)
    }

    fn execute(&self, input: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; 12];
        output.extend_from_slice(&ripemd160(input));
        output
    }
}

impl Precompile for Identity {
    fn cost(&self, input: &[u8]) -> u64 {
        Linear { base: 15, word: 3 }.cost(input)
    }

    fn execute(&self, input: &[u8]) -> Vec<u8> {
        input.to_vec()
    }
}

/// Immutable address-to-contract mapping
pub struct PrecompileRegistry {
    contracts: BTreeMap<Address, Box<dyn Precompile>>,
}

impl PrecompileRegistry {
    /// Registry with no contracts
    pub fn empty() -> Self {
        Self {
            contracts: BTreeMap::new(),
        }
    }

    /// ecrecover, sha256, ripemd160 and identity at addresses 1 to 4
    pub fn standard() -> Self {
        Self::empty()
            .with(Address::from_low_u64(1), EcRecover)
            .with(Address::from_low_u64(2), Sha256)
            .with(Address::from_low_u64(3), Ripemd160)
            .with(Address::from_low_u64(4), Identity)
    }

    /// Add a contract at `address`
    pub fn with(mut self, address: Address, contract: impl Precompile + 'static) -> Self {
        self.contracts.insert(address, Box::new(contract));
        self
    }

    /// Contract at `address`, if any
    pub fn get(&self, address: &Address) -> Option<&dyn Precompile> {
        self.contracts.get(address).map(|contract| contract.as_ref())
    }

    /// Check whether `address` is a precompile
    pub fn contains(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// Registered addresses in ascending order
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.contracts.keys()
    }
}

impl Default for PrecompileRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for PrecompileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.contracts.keys()).finish()
    }
}
