//! # handel-vmtests
//!
//! JSON VM-test fixtures for the Handel interpreter.
//!
//! This crate provides:
//! - Serde types for the ethereum/tests `VMTests` shape
//! - A runner that seeds in-memory state, executes and checks expectations
//! - Directory traversal and result aggregation
//!
//! A fixture without `gas` and `post` expects execution to fail. Otherwise the
//! remaining gas, output, logs hash and listed post-state accounts must match.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod runner;
mod types;

pub use error::{TestError, TestResult};
pub use runner::{TestRunner, TestStats};
pub use types::*;
pub use vm_test::{logs_hash, VmTestResults, VmTestRunner};
