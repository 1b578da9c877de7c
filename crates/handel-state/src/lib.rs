//! # handel-state
//!
//! World state, account storage and block-hash collaborators of the interpreter.
//!
//! This crate provides:
//! - The provider traits the interpreter is written against
//! - In-memory implementations with journaled snapshot/restore
//! - A block-hash table with a derived fallback

#![warn(missing_docs)]
#![warn(clippy::all)]

mod blockhash;
mod error;
mod storage;
mod traits;
mod world;

pub use blockhash::{FixedBlockhashProvider, MAX_LOOKBACK};
pub use error::{StateError, StateResult};
pub use storage::MemoryStorageProvider;
pub use traits::{
    Account, BalanceDelta, BlockhashProvider, Snapshot, Storage, StorageProvider,
    WorldStateProvider, EMPTY_CODE_HASH, EMPTY_STORAGE_ROOT,
};
pub use world::MemoryWorldState;
