//! EVM error types

use handel_state::StateError;
use primitive_types::U256;
use thiserror::Error;

/// EVM execution errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    /// Out of gas
    #[error("out of gas")]
    OutOfGas,

    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max 1024)")]
    StackOverflow,

    /// Jump target is not a JUMPDEST
    #[error("invalid jump destination: {0}")]
    InvalidJumpDestination(U256),

    /// Undefined or reserved opcode
    #[error("invalid instruction: 0x{0:02x}")]
    InvalidInstruction(u8),

    /// Call depth exceeded
    #[error("call depth exceeded (max 1024)")]
    CallDepthExceeded,

    /// CREATE onto an existing non-empty account
    #[error("contract address collision")]
    TransactionCollision,

    /// Fault reported by a state collaborator
    #[error("state error: {0}")]
    State(#[from] StateError),
}

/// Result type for EVM operations
pub type EvmResult<T> = Result<T, EvmError>;
