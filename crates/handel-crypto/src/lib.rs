//! # handel-crypto
//!
//! Cryptographic primitives used by the interpreter and its precompiles.
//!
//! - Keccak-256 hashing
//! - SHA-256 and RIPEMD-160 digests
//! - secp256k1 public key recovery and address derivation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;
mod signature;
mod error;

pub use hash::{keccak256, ripemd160, sha256};
pub use signature::{public_key_to_address, recover_address, recover_public_key, PublicKey, Signature};
pub use error::CryptoError;
