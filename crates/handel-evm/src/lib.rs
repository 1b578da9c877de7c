//! # handel-evm
//!
//! Frontier-era EVM bytecode interpreter.
//!
//! This crate provides:
//! - The instruction set, gas schedule and memory model
//! - Nested CALL, CALLCODE and CREATE frames with snapshot rollback
//! - Precompiled contracts at addresses 1 to 4
//! - Per-fork rule switches
//!
//! World state, storage and block hashes are supplied by the caller through
//! the traits in `handel-state`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod env;
pub mod error;
pub mod gas;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod precompile;
pub mod spec;
pub mod stack;
pub mod state;
pub mod word;

pub use env::{BlockHeader, ExecutionEnvironment};
pub use error::{EvmError, EvmResult};
pub use gas::GasMeter;
pub use interpreter::{contract_address, jump_destinations, Interpreter};
pub use memory::Memory;
pub use opcode::Opcode;
pub use precompile::{Precompile, PrecompileRegistry};
pub use spec::{ProtocolSpec, SpecError};
pub use stack::{Slot, Stack};
pub use state::{EvmState, LogEntry, Substate};

use handel_state::{BlockhashProvider, StorageProvider, WorldStateProvider};

/// Run `env.machine_code` with the standard precompiles.
///
/// See [`Interpreter::run`].
pub fn run<B, W, S>(
    env: &ExecutionEnvironment,
    state: &mut EvmState,
    blockhash_provider: &B,
    world_state: &mut W,
    storage_provider: &mut S,
    spec: &ProtocolSpec,
) -> EvmResult<(Vec<u8>, Substate)>
where
    B: BlockhashProvider + ?Sized,
    W: WorldStateProvider + ?Sized,
    S: StorageProvider + ?Sized,
{
    Interpreter::new().run(env, state, blockhash_provider, world_state, storage_provider, spec)
}
