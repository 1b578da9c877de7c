//! # handel-primitives
//!
//! Primitive types shared by the Handel interpreter crates.
//!
//! This crate provides the fundamental data types used throughout the system.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
mod error;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};
pub use error::PrimitiveError;

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Block number type
pub type BlockNumber = u64;

/// Account nonce type
pub type Nonce = u64;

/// Gas type
pub type Gas = u64;
