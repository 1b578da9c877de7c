//! Aggregate parsing error for primitives

use thiserror::Error;
use crate::address::AddressError;
use crate::hash::HashError;

/// Any failure while decoding a primitive from text or bytes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Hash error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),
}
